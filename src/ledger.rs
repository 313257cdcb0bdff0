//! Account ledger - cash, positions, fund holdings, and the audit trail
//!
//! Every operation is synchronous and atomic with respect to its caller: it
//! either applies fully or returns an error with state untouched. Order and
//! transaction logs are append-only, most recent first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::account::BankAccount;
use crate::core::types::{
    Exchange, FundHolding, FundId, Order, OrderSide, Position, Symbol, Transaction, TxnDirection,
};
use crate::core::{Error, Result};
use crate::feeds::PriceLookup;

/// Fund units are fractional, tracked to 4 decimal places.
pub const FUND_UNIT_DP: u32 = 4;

fn ensure_positive(value: Decimal, what: &str) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::InvalidInput(format!(
            "{} must be positive, got {}",
            what, value
        )));
    }
    Ok(())
}

/// The stateful bookkeeping engine for one account.
///
/// Invariants held at all times: balance >= 0; every position has
/// quantity > 0; every holding has units > 0; the newest transaction's
/// balance snapshot equals the live balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    balance: Decimal,
    positions: Vec<Position>,
    funds: Vec<FundHolding>,
    orders: Vec<Order>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn fund_holdings(&self) -> &[FundHolding] {
        &self.funds
    }

    /// Order log, most recent first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Transaction log, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn position(&self, symbol: &Symbol, exchange: Exchange) -> Option<&Position> {
        self.positions
            .iter()
            .find(|p| p.symbol == *symbol && p.exchange == exchange)
    }

    pub fn holding(&self, fund: &FundId) -> Option<&FundHolding> {
        self.funds.iter().find(|h| h.fund == *fund)
    }

    pub fn latest_transaction(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    /// Sum of current position values.
    pub fn portfolio_value(&self) -> Decimal {
        self.positions.iter().map(|p| p.current_value()).sum()
    }

    /// Sum of current fund holding values.
    pub fn funds_value(&self) -> Decimal {
        self.funds.iter().map(|h| h.current_value()).sum()
    }

    /// Unrealized P&L across positions and holdings.
    pub fn unrealized_pnl(&self) -> Decimal {
        self.positions
            .iter()
            .map(|p| p.unrealized_pnl())
            .sum::<Decimal>()
            + self.funds.iter().map(|h| h.unrealized_pnl()).sum::<Decimal>()
    }

    fn record(&mut self, direction: TxnDirection, amount: Decimal, description: String) -> Transaction {
        let txn = Transaction::new(direction, amount, description, self.balance);
        self.transactions.insert(0, txn.clone());
        txn
    }

    /// Credit the balance.
    pub fn deposit(
        &mut self,
        amount: Decimal,
        method: &str,
        reference: Option<&str>,
    ) -> Result<Transaction> {
        ensure_positive(amount, "deposit amount")?;
        self.balance += amount;
        let description = match reference {
            Some(r) => format!("Funds added via {} - {}", method, r),
            None => format!("Funds added via {}", method),
        };
        let txn = self.record(TxnDirection::Credit, amount, description);
        info!(%amount, method, balance = %self.balance, "deposit accepted");
        Ok(txn)
    }

    /// Debit the balance toward a linked bank account.
    pub fn withdraw(&mut self, amount: Decimal, destination: &BankAccount) -> Result<Transaction> {
        ensure_positive(amount, "withdrawal amount")?;
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        let description = format!(
            "Withdrawal to {} - {}",
            destination.bank_name,
            destination.masked_number()
        );
        let txn = self.record(TxnDirection::Debit, amount, description);
        info!(%amount, balance = %self.balance, "withdrawal accepted");
        Ok(txn)
    }

    /// Execute an equity buy: debit cash, create or re-average the position.
    ///
    /// An existing position's cost becomes the quantity-weighted mean of the
    /// old lot and the new fill.
    pub fn apply_buy(
        &mut self,
        symbol: &Symbol,
        exchange: Exchange,
        name: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<(Order, Transaction)> {
        ensure_positive(quantity, "quantity")?;
        ensure_positive(price, "price")?;
        let total = quantity * price;
        if total > self.balance {
            return Err(Error::InsufficientFunds {
                required: total,
                available: self.balance,
            });
        }

        self.balance -= total;
        match self
            .positions
            .iter_mut()
            .find(|p| p.symbol == *symbol && p.exchange == exchange)
        {
            Some(pos) => {
                let new_qty = pos.quantity + quantity;
                pos.avg_cost = (pos.quantity * pos.avg_cost + quantity * price) / new_qty;
                pos.quantity = new_qty;
                pos.last_price = price;
            }
            None => self.positions.push(Position {
                symbol: symbol.clone(),
                name: name.to_string(),
                exchange,
                quantity,
                avg_cost: price,
                last_price: price,
            }),
        }

        let order = Order::equity(symbol, exchange, OrderSide::Buy, quantity, price);
        self.orders.insert(0, order.clone());
        let txn = self.record(
            TxnDirection::Debit,
            total,
            format!("Bought {} shares of {}", quantity, symbol),
        );
        info!(%symbol, %exchange, %quantity, %price, balance = %self.balance, "buy executed");
        Ok((order, txn))
    }

    /// Execute an equity sell: credit cash, reduce or remove the position.
    ///
    /// The remaining lot keeps its prior weighted-average cost; realized
    /// P&L is not tracked separately.
    pub fn apply_sell(
        &mut self,
        symbol: &Symbol,
        exchange: Exchange,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<(Order, Transaction)> {
        ensure_positive(quantity, "quantity")?;
        ensure_positive(price, "price")?;
        let idx = self
            .positions
            .iter()
            .position(|p| p.symbol == *symbol && p.exchange == exchange)
            .ok_or_else(|| Error::NoPosition(symbol.to_string()))?;
        let held = self.positions[idx].quantity;
        if quantity > held {
            return Err(Error::InsufficientQuantity {
                requested: quantity,
                held,
            });
        }

        let proceeds = quantity * price;
        self.balance += proceeds;
        if quantity == held {
            self.positions.remove(idx);
        } else {
            let pos = &mut self.positions[idx];
            pos.quantity -= quantity;
            pos.last_price = price;
        }

        let order = Order::equity(symbol, exchange, OrderSide::Sell, quantity, price);
        self.orders.insert(0, order.clone());
        let txn = self.record(
            TxnDirection::Credit,
            proceeds,
            format!("Sold {} shares of {}", quantity, symbol),
        );
        info!(%symbol, %exchange, %quantity, %price, balance = %self.balance, "sell executed");
        Ok((order, txn))
    }

    /// Invest a cash amount into a mutual fund at the given NAV.
    pub fn invest_fund(
        &mut self,
        fund: &FundId,
        amount: Decimal,
        nav: Decimal,
    ) -> Result<(Order, Transaction)> {
        ensure_positive(amount, "amount")?;
        ensure_positive(nav, "NAV")?;
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }

        let units = (amount / nav).round_dp(FUND_UNIT_DP);
        self.balance -= amount;
        match self.funds.iter_mut().find(|h| h.fund == *fund) {
            Some(holding) => {
                holding.units += units;
                holding.invested += amount;
                holding.last_nav = nav;
            }
            None => self.funds.push(FundHolding {
                fund: fund.clone(),
                units,
                invested: amount,
                last_nav: nav,
            }),
        }

        let order = Order::fund(fund, OrderSide::Invest, units, nav);
        self.orders.insert(0, order.clone());
        let txn = self.record(
            TxnDirection::Debit,
            amount,
            format!("Invested in {}", fund),
        );
        info!(%fund, %amount, %nav, %units, balance = %self.balance, "fund investment executed");
        Ok((order, txn))
    }

    /// Redeem fund units at the given NAV.
    ///
    /// A partial redemption releases cost basis proportionally, so the
    /// remaining units keep their prior per-unit cost.
    pub fn redeem_fund(
        &mut self,
        fund: &FundId,
        units: Decimal,
        nav: Decimal,
    ) -> Result<(Order, Transaction)> {
        ensure_positive(units, "units")?;
        ensure_positive(nav, "NAV")?;
        let idx = self
            .funds
            .iter()
            .position(|h| h.fund == *fund)
            .ok_or_else(|| Error::NoHolding(fund.to_string()))?;
        let held = self.funds[idx].units;
        if units > held {
            return Err(Error::InsufficientUnits {
                requested: units,
                held,
            });
        }

        let proceeds = units * nav;
        self.balance += proceeds;
        if units == held {
            self.funds.remove(idx);
        } else {
            let holding = &mut self.funds[idx];
            let released = holding.invested * units / held;
            holding.invested -= released;
            holding.units -= units;
            holding.last_nav = nav;
        }

        let order = Order::fund(fund, OrderSide::Redeem, units, nav);
        self.orders.insert(0, order.clone());
        let txn = self.record(
            TxnDirection::Credit,
            proceeds,
            format!("Redeemed {} units of {}", units, fund),
        );
        info!(%fund, %units, %nav, balance = %self.balance, "fund redemption executed");
        Ok((order, txn))
    }

    /// Refresh marks from the pricing lookup.
    ///
    /// Instruments the lookup does not cover keep their stale mark; that is
    /// the contract with an untrusted oracle, not a failure.
    pub fn mark_to_market(&mut self, prices: &dyn PriceLookup) {
        for pos in &mut self.positions {
            if let Some(price) = prices.price(&pos.symbol, pos.exchange) {
                pos.last_price = price;
            }
        }
        for holding in &mut self.funds {
            if let Some(nav) = prices.nav(&holding.fund) {
                holding.last_nav = nav;
            }
        }
    }
}
