//! Account - verified identity, linked bank accounts, and the owned ledger

use serde::{Deserialize, Serialize};

use crate::auth::{hash_credential, RegistrationProfile};
use crate::core::{Error, Result};
use crate::ledger::Ledger;

/// Bank account number: digits only, 9-18 characters.
pub fn validate_account_number(number: &str) -> Result<()> {
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Registration(
            "Account number must contain only digits".into(),
        ));
    }
    if number.len() < 9 || number.len() > 18 {
        return Err(Error::Registration(
            "Account number must be 9-18 digits".into(),
        ));
    }
    Ok(())
}

/// IFSC: 11 characters, 4 alphabetic + literal '0' + 6 alphanumeric.
pub fn validate_ifsc(ifsc: &str) -> Result<()> {
    if ifsc.len() != 11 {
        return Err(Error::Registration("IFSC code must be 11 characters".into()));
    }
    let bytes = ifsc.as_bytes();
    let ok = bytes[..4].iter().all(|b| b.is_ascii_alphabetic())
        && bytes[4] == b'0'
        && bytes[5..].iter().all(|b| b.is_ascii_alphanumeric());
    if !ok {
        return Err(Error::Registration("Invalid IFSC format".into()));
    }
    Ok(())
}

/// A linked payout destination. Validated at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub holder: String,
    pub number: String,
    pub ifsc: String,
    pub bank_name: String,
    pub verified: bool,
}

impl BankAccount {
    pub fn new(
        holder: impl Into<String>,
        number: impl Into<String>,
        ifsc: impl Into<String>,
        bank_name: impl Into<String>,
    ) -> Result<Self> {
        let number = number.into();
        let ifsc = ifsc.into();
        validate_account_number(&number)?;
        validate_ifsc(&ifsc)?;
        Ok(Self {
            holder: holder.into(),
            number,
            ifsc: ifsc.to_uppercase(),
            bank_name: bank_name.into(),
            verified: true,
        })
    }

    /// Masked rendering for logs and transaction descriptions.
    pub fn masked_number(&self) -> String {
        let last4 = &self.number[self.number.len().saturating_sub(4)..];
        format!("XXXX{}", last4)
    }
}

/// A verified brokerage account.
///
/// Exclusively owns its ledger (positions, holdings, orders, transactions);
/// those collections are only ever mutated through the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pan: String,
    pub credential_hash: String,
    pub verified: bool,
    pub bank_accounts: Vec<BankAccount>,
    pub ledger: Ledger,
}

impl Account {
    /// Promote a pending registration to an active account. Only called
    /// after OTP verification succeeds.
    pub fn from_profile(profile: RegistrationProfile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            pan: profile.pan,
            credential_hash: profile.credential_hash,
            verified: true,
            bank_accounts: Vec::new(),
            ledger: Ledger::new(),
        }
    }

    /// Login check: digest comparison, verified accounts only.
    pub fn check_password(&self, password: &str) -> bool {
        self.verified && hash_credential(password) == self.credential_hash
    }

    pub fn link_bank_account(&mut self, account: BankAccount) {
        self.bank_accounts.push(account);
    }

    /// First linked bank account, the default withdrawal destination.
    pub fn primary_bank_account(&self) -> Option<&BankAccount> {
        self.bank_accounts.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> RegistrationProfile {
        RegistrationProfile::new(
            "Ravi Kumar",
            "ravi@example.com",
            "9876543210",
            "secret123",
            "ABCDE1234F",
        )
        .unwrap()
    }

    #[test]
    fn test_account_number_rules() {
        assert!(validate_account_number("123456789").is_ok());
        assert!(validate_account_number("123456789012345678").is_ok());
        assert!(validate_account_number("12345678").is_err()); // too short
        assert!(validate_account_number("1234567890123456789").is_err()); // too long
        assert!(validate_account_number("12345678X").is_err());
        assert!(validate_account_number("").is_err());
    }

    #[test]
    fn test_ifsc_rules() {
        assert!(validate_ifsc("HDFC0001234").is_ok());
        assert!(validate_ifsc("SBIN0CH1234").is_ok());
        assert!(validate_ifsc("HDFC1001234").is_err()); // fifth char must be '0'
        assert!(validate_ifsc("HD3C0001234").is_err());
        assert!(validate_ifsc("HDFC000123").is_err()); // 10 chars
    }

    #[test]
    fn test_masked_number() {
        let bank = BankAccount::new("Ravi Kumar", "1234567890", "HDFC0001234", "HDFC Bank").unwrap();
        assert_eq!(bank.masked_number(), "XXXX7890");
    }

    #[test]
    fn test_ifsc_uppercased_on_link() {
        let bank = BankAccount::new("Ravi Kumar", "1234567890", "hdfc0001234", "HDFC Bank").unwrap();
        assert_eq!(bank.ifsc, "HDFC0001234");
    }

    #[test]
    fn test_login_check() {
        let mut account = Account::from_profile(profile());
        assert!(account.check_password("secret123"));
        assert!(!account.check_password("wrong"));

        account.verified = false;
        assert!(!account.check_password("secret123"));
    }
}
