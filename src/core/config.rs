//! Configuration - Type-safe, validated config

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,

    /// Withdrawal fee schedule
    pub fees: FeeConfig,

    /// OTP settings
    pub otp: OtpConfig,

    /// Audit-trail settings
    pub audit: AuditConfig,

    /// Simulated market feed settings
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level
    pub log_level: String,
}

/// Flat fee charged on withdrawals below a threshold; free at or above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Flat fee for withdrawals below the threshold
    pub withdrawal_flat_fee: Decimal,

    /// Withdrawals at or above this amount are free
    pub withdrawal_fee_threshold: Decimal,
}

impl FeeConfig {
    /// Fee for a given withdrawal amount.
    pub fn withdrawal_fee(&self, amount: Decimal) -> Decimal {
        if amount < self.withdrawal_fee_threshold {
            self.withdrawal_flat_fee
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Seconds an issued code stays valid
    pub validity_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Keep a log of rejected order attempts (the upstream model drops them)
    pub record_rejected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Max simulated price/NAV movement per refresh (fraction, e.g. 0.02 = 2%)
    pub jitter: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                log_level: "info".to_string(),
            },
            fees: FeeConfig {
                withdrawal_flat_fee: Decimal::from(10),
                withdrawal_fee_threshold: Decimal::from(5000),
            },
            otp: OtpConfig { validity_secs: 300 },
            audit: AuditConfig {
                record_rejected: false,
            },
            feed: FeedConfig { jitter: 0.02 },
        }
    }
}

impl Config {
    /// Load from TOML file
    pub fn load(path: &PathBuf) -> crate::core::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::core::Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| crate::core::Error::Config(format!("Failed to parse config: {}", e)))
    }
}
