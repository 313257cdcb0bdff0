//! OTP gate - time-boxed confirmation of contact-point ownership
//!
//! At most one live session exists at a time: issuing (or resending) a code
//! replaces whatever came before, so an old code can never verify after a
//! resend.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::auth::RegistrationProfile;
use crate::core::{Error, Result};

/// A live OTP session bound to a pending registration.
#[derive(Debug, Clone)]
pub struct OtpSession {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub email: String,
    pub phone: String,
    pub profile: RegistrationProfile,
}

/// Issues and verifies one-time passcodes.
///
/// Verification does not consume the session; the caller finalizes the
/// registration and calls [`OtpGate::consume`] on success. There is no
/// attempt counter or lockout in this model.
pub struct OtpGate {
    session: Option<OtpSession>,
    validity: Duration,
}

impl OtpGate {
    pub fn new(validity_secs: u64) -> Self {
        Self {
            session: None,
            validity: Duration::seconds(validity_secs as i64),
        }
    }

    /// Issue a fresh 6-digit code for the pending profile, replacing any
    /// prior session.
    pub fn issue(&mut self, profile: RegistrationProfile) -> &str {
        let code = rand::random_range(100_000..=999_999u32).to_string();
        debug!(email = %profile.email, "issuing OTP");
        self.session = Some(OtpSession {
            code,
            issued_at: Utc::now(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            profile,
        });
        &self.session.as_ref().unwrap().code
    }

    /// Re-issue a code for the same flow. The previous code is invalidated.
    pub fn resend(&mut self, profile: RegistrationProfile) -> &str {
        self.issue(profile)
    }

    /// Check a submitted code against the live session at `now`.
    pub fn verify_at(&self, entered: &str, now: DateTime<Utc>) -> Result<()> {
        let session = self.session.as_ref().ok_or(Error::OtpMismatch)?;
        if now - session.issued_at > self.validity {
            return Err(Error::OtpExpired);
        }
        if entered != session.code {
            return Err(Error::OtpMismatch);
        }
        Ok(())
    }

    /// Check a submitted code against the live session now.
    pub fn verify(&self, entered: &str) -> Result<()> {
        self.verify_at(entered, Utc::now())
    }

    /// Take the session for finalization, leaving the gate empty.
    pub fn consume(&mut self) -> Option<OtpSession> {
        self.session.take()
    }

    pub fn session(&self) -> Option<&OtpSession> {
        self.session.as_ref()
    }
}
