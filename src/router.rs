//! Order router - validating facade over the ledger
//!
//! The only component that invokes ledger mutators. Rejects malformed
//! requests before any state is touched; a rejected attempt never creates
//! an Order or a Transaction. Recording of rejected attempts is a
//! configuration switch because the upstream model silently drops them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::account::BankAccount;
use crate::core::config::FeeConfig;
use crate::core::types::{Exchange, FundId, Order, Symbol, Transaction};
use crate::core::{Config, Error, Result};
use crate::ledger::Ledger;

/// Outcome of a routed withdrawal: the ledger debits the gross amount; the
/// fee and net payout are reported alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub transaction: Transaction,
    pub fee: Decimal,
    pub net: Decimal,
}

/// A rejected attempt, kept only when `audit.record_rejected` is enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedAttempt {
    pub at: DateTime<Utc>,
    pub action: String,
    pub reason: String,
}

/// Validating facade in front of [`Ledger`].
pub struct OrderRouter {
    fees: FeeConfig,
    record_rejected: bool,
    rejected: Vec<RejectedAttempt>,
}

impl OrderRouter {
    pub fn new(config: &Config) -> Self {
        Self {
            fees: config.fees.clone(),
            record_rejected: config.audit.record_rejected,
            rejected: Vec::new(),
        }
    }

    /// Rejected attempts observed so far (empty unless recording is on).
    pub fn rejected(&self) -> &[RejectedAttempt] {
        &self.rejected
    }

    fn reject(&mut self, action: impl Into<String>, err: Error) -> Error {
        let action = action.into();
        warn!(%action, reason = %err, "attempt rejected");
        if self.record_rejected {
            self.rejected.push(RejectedAttempt {
                at: Utc::now(),
                action,
                reason: err.to_string(),
            });
        }
        err
    }

    fn ensure_positive(value: Decimal, what: &str) -> Result<()> {
        if value <= Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "{} must be positive, got {}",
                what, value
            )));
        }
        Ok(())
    }

    pub fn deposit(
        &mut self,
        ledger: &mut Ledger,
        amount: Decimal,
        method: &str,
        reference: Option<&str>,
    ) -> Result<Transaction> {
        if let Err(e) = Self::ensure_positive(amount, "deposit amount") {
            return Err(self.reject(format!("DEPOSIT {}", amount), e));
        }
        ledger
            .deposit(amount, method, reference)
            .map_err(|e| self.reject(format!("DEPOSIT {}", amount), e))
    }

    /// Withdraw to a linked bank account, applying the fee schedule.
    pub fn withdraw(
        &mut self,
        ledger: &mut Ledger,
        amount: Decimal,
        destination: &BankAccount,
    ) -> Result<WithdrawalReceipt> {
        if let Err(e) = Self::ensure_positive(amount, "withdrawal amount") {
            return Err(self.reject(format!("WITHDRAW {}", amount), e));
        }
        let transaction = ledger
            .withdraw(amount, destination)
            .map_err(|e| self.reject(format!("WITHDRAW {}", amount), e))?;
        let fee = self.fees.withdrawal_fee(amount);
        Ok(WithdrawalReceipt {
            transaction,
            fee,
            net: amount - fee,
        })
    }

    pub fn buy(
        &mut self,
        ledger: &mut Ledger,
        symbol: &Symbol,
        exchange: Exchange,
        name: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<(Order, Transaction)> {
        let action = || format!("BUY {} {} @ {}", quantity, symbol, price);
        if let Err(e) = Self::ensure_positive(quantity, "quantity")
            .and_then(|_| Self::ensure_positive(price, "price"))
        {
            return Err(self.reject(action(), e));
        }
        ledger
            .apply_buy(symbol, exchange, name, quantity, price)
            .map_err(|e| self.reject(action(), e))
    }

    pub fn sell(
        &mut self,
        ledger: &mut Ledger,
        symbol: &Symbol,
        exchange: Exchange,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<(Order, Transaction)> {
        let action = || format!("SELL {} {} @ {}", quantity, symbol, price);
        if let Err(e) = Self::ensure_positive(quantity, "quantity")
            .and_then(|_| Self::ensure_positive(price, "price"))
        {
            return Err(self.reject(action(), e));
        }
        ledger
            .apply_sell(symbol, exchange, quantity, price)
            .map_err(|e| self.reject(action(), e))
    }

    pub fn invest(
        &mut self,
        ledger: &mut Ledger,
        fund: &FundId,
        amount: Decimal,
        nav: Decimal,
    ) -> Result<(Order, Transaction)> {
        let action = || format!("INVEST {} in {}", amount, fund);
        if let Err(e) = Self::ensure_positive(amount, "amount")
            .and_then(|_| Self::ensure_positive(nav, "NAV"))
        {
            return Err(self.reject(action(), e));
        }
        ledger
            .invest_fund(fund, amount, nav)
            .map_err(|e| self.reject(action(), e))
    }

    pub fn redeem(
        &mut self,
        ledger: &mut Ledger,
        fund: &FundId,
        units: Decimal,
        nav: Decimal,
    ) -> Result<(Order, Transaction)> {
        let action = || format!("REDEEM {} units of {}", units, fund);
        if let Err(e) = Self::ensure_positive(units, "units")
            .and_then(|_| Self::ensure_positive(nav, "NAV"))
        {
            return Err(self.reject(action(), e));
        }
        ledger
            .redeem_fund(fund, units, nav)
            .map_err(|e| self.reject(action(), e))
    }
}
