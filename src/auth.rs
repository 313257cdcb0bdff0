//! Identity validation and credential hashing
//!
//! Registration input is validated here, at construction, so the rest of the
//! engine only ever sees a well-formed [`RegistrationProfile`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::{Error, Result};

/// SHA-256 hex digest of a plaintext credential.
pub fn hash_credential(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// local@domain.tld shape check.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Indian mobile number: 10 digits, leading digit 6-9.
pub fn validate_phone(phone: &str) -> bool {
    phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.as_bytes()[0], b'6'..=b'9')
}

/// PAN: 5 letters, 4 digits, 1 letter (case-insensitive).
pub fn validate_pan(pan: &str) -> bool {
    let bytes = pan.as_bytes();
    bytes.len() == 10
        && bytes[..5].iter().all(|b| b.is_ascii_alphabetic())
        && bytes[5..9].iter().all(|b| b.is_ascii_digit())
        && bytes[9].is_ascii_alphabetic()
}

const MIN_PASSWORD_LEN: usize = 6;

/// Validated registration payload, pending OTP confirmation.
///
/// The plaintext password never leaves this constructor; only its digest is
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub credential_hash: String,
    pub pan: String,
}

impl RegistrationProfile {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: &str,
        pan: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let email = email.into();
        let phone = phone.into();
        let pan = pan.into();

        if name.trim().is_empty() {
            return Err(Error::Registration("name is required".into()));
        }
        if !validate_email(&email) {
            return Err(Error::Registration(format!("invalid email: {}", email)));
        }
        if !validate_phone(&phone) {
            return Err(Error::Registration(format!("invalid phone number: {}", phone)));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Registration(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if !validate_pan(&pan) {
            return Err(Error::Registration(format!("invalid PAN: {}", pan)));
        }

        Ok(Self {
            name,
            email,
            phone,
            credential_hash: hash_credential(password),
            pan: pan.to_uppercase(),
        })
    }
}
