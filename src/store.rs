//! Ledger store - explicit handle over all session accounts
//!
//! Replaces an implicit process-wide registry: the host constructs the store,
//! hands it to callers, and tears it down with the session. Accounts are
//! keyed by email; each exclusively owns its ledger.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

use crate::account::Account;
use crate::core::{Error, Result};
use crate::otp::OtpSession;

#[derive(Default)]
pub struct LedgerStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, email: &str) -> bool {
        self.accounts.read().contains_key(email)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Promote a verified OTP session into an active account.
    ///
    /// The caller must have verified the code first; this only guards
    /// against finalizing the same email twice.
    pub fn finalize_registration(&self, session: OtpSession) -> Result<()> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&session.email) {
            return Err(Error::Registration(format!(
                "email already registered: {}",
                session.email
            )));
        }
        let account = Account::from_profile(session.profile);
        info!(email = %account.email, "account activated");
        accounts.insert(account.email.clone(), account);
        Ok(())
    }

    /// Credential check against a stored, verified account.
    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        let accounts = self.accounts.read();
        let account = accounts
            .get(email)
            .ok_or_else(|| Error::Registration(format!("email not registered: {}", email)))?;
        if !account.verified {
            return Err(Error::Registration("account not verified".into()));
        }
        if !account.check_password(password) {
            return Err(Error::Registration("invalid password".into()));
        }
        Ok(())
    }

    /// Read access to one account.
    pub fn with_account<R>(&self, email: &str, f: impl FnOnce(&Account) -> R) -> Option<R> {
        self.accounts.read().get(email).map(f)
    }

    /// Mutable access to one account. Serializes all mutation of that
    /// account behind the store lock.
    pub fn with_account_mut<R>(&self, email: &str, f: impl FnOnce(&mut Account) -> R) -> Option<R> {
        self.accounts.write().get_mut(email).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RegistrationProfile;
    use crate::otp::OtpGate;
    use rust_decimal::Decimal;

    fn profile(email: &str) -> RegistrationProfile {
        RegistrationProfile::new("Ravi Kumar", email, "9876543210", "secret123", "ABCDE1234F")
            .unwrap()
    }

    fn verified_session(email: &str) -> OtpSession {
        let mut gate = OtpGate::new(300);
        let code = gate.issue(profile(email)).to_string();
        gate.verify(&code).unwrap();
        gate.consume().unwrap()
    }

    #[test]
    fn test_finalize_then_login() {
        let store = LedgerStore::new();
        store
            .finalize_registration(verified_session("ravi@example.com"))
            .unwrap();

        assert!(store.is_registered("ravi@example.com"));
        assert!(store.login("ravi@example.com", "secret123").is_ok());
        assert!(store.login("ravi@example.com", "wrong").is_err());
        assert!(store.login("other@example.com", "secret123").is_err());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = LedgerStore::new();
        store
            .finalize_registration(verified_session("ravi@example.com"))
            .unwrap();
        let err = store
            .finalize_registration(verified_session("ravi@example.com"))
            .unwrap_err();
        assert!(matches!(err, Error::Registration(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_account_mutation_through_handle() {
        let store = LedgerStore::new();
        store
            .finalize_registration(verified_session("ravi@example.com"))
            .unwrap();

        store
            .with_account_mut("ravi@example.com", |account| {
                account.ledger.deposit(Decimal::from(1_000), "UPI", None)
            })
            .unwrap()
            .unwrap();

        let balance = store
            .with_account("ravi@example.com", |account| account.ledger.balance())
            .unwrap();
        assert_eq!(balance, Decimal::from(1_000));
    }
}
