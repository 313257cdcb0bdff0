//! Core types - Strong typing for the brokerage domain

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Equity ticker symbol (e.g., "RELIANCE", "TCS")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutual fund identifier (e.g., "SBI Bluechip Fund")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FundId(String);

impl FundId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listing exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Nse,
    Bse,
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::Nse => write!(f, "NSE"),
            Exchange::Bse => write!(f, "BSE"),
        }
    }
}

/// Order side across both instrument kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
    Invest,
    Redeem,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
            OrderSide::Invest => write!(f, "INVEST"),
            OrderSide::Redeem => write!(f, "REDEEM"),
        }
    }
}

/// Instrument kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Equity,
    MutualFund,
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentKind::Equity => write!(f, "Stock"),
            InstrumentKind::MutualFund => write!(f, "Mutual Fund"),
        }
    }
}

/// Order status
///
/// Accepted orders always execute in full; rejected attempts never become
/// orders (the router short-circuits them), so no rejected state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Executed,
}

/// Immutable order record. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub kind: InstrumentKind,
    /// Ticker symbol for equities, fund identifier for mutual funds
    pub instrument: String,
    pub exchange: Option<Exchange>,
    pub side: OrderSide,
    /// Share quantity for equities, units for mutual funds
    pub quantity: Decimal,
    /// Execution price for equities, NAV for mutual funds
    pub price: Decimal,
    pub status: OrderStatus,
}

impl Order {
    pub fn equity(
        symbol: &Symbol,
        exchange: Exchange,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            kind: InstrumentKind::Equity,
            instrument: symbol.as_str().to_string(),
            exchange: Some(exchange),
            side,
            quantity,
            price,
            status: OrderStatus::Executed,
        }
    }

    pub fn fund(fund: &FundId, side: OrderSide, units: Decimal, nav: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            kind: InstrumentKind::MutualFund,
            instrument: fund.as_str().to_string(),
            exchange: None,
            side,
            quantity: units,
            price: nav,
            status: OrderStatus::Executed,
        }
    }

    /// Gross value of the order (quantity x price).
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// Cash movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnDirection {
    Credit,
    Debit,
}

impl std::fmt::Display for TxnDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnDirection::Credit => write!(f, "Credit"),
            TxnDirection::Debit => write!(f, "Debit"),
        }
    }
}

/// Immutable cash transaction record.
///
/// `balance` snapshots the ledger balance immediately after the movement;
/// the most recent transaction's snapshot always equals the live balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub direction: TxnDirection,
    pub amount: Decimal,
    pub description: String,
    pub balance: Decimal,
}

impl Transaction {
    pub fn new(
        direction: TxnDirection,
        amount: Decimal,
        description: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            direction,
            amount,
            description: description.into(),
            balance,
        }
    }
}

/// Equity position. Present only while quantity > 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub name: String,
    pub exchange: Exchange,
    pub quantity: Decimal,
    /// Weighted-average cost across all buys of this symbol
    pub avg_cost: Decimal,
    /// Last mark from the pricing provider (stale until refreshed)
    pub last_price: Decimal,
}

impl Position {
    pub fn investment(&self) -> Decimal {
        self.quantity * self.avg_cost
    }

    pub fn current_value(&self) -> Decimal {
        self.quantity * self.last_price
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.current_value() - self.investment()
    }

    pub fn pnl_percent(&self) -> Decimal {
        let investment = self.investment();
        if investment.is_zero() {
            return Decimal::ZERO;
        }
        self.unrealized_pnl() / investment * Decimal::from(100)
    }
}

/// Mutual fund holding. Present only while units > 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundHolding {
    pub fund: FundId,
    /// Fractional units, 4 decimal places
    pub units: Decimal,
    /// Total amount invested across all purchases
    pub invested: Decimal,
    /// Last NAV mark from the pricing provider
    pub last_nav: Decimal,
}

impl FundHolding {
    pub fn current_value(&self) -> Decimal {
        self.units * self.last_nav
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.current_value() - self.invested
    }

    pub fn pnl_percent(&self) -> Decimal {
        if self.invested.is_zero() {
            return Decimal::ZERO;
        }
        self.unrealized_pnl() / self.invested * Decimal::from(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_uppercased() {
        assert_eq!(Symbol::new("reliance").as_str(), "RELIANCE");
    }

    #[test]
    fn test_pnl_percent_zero_investment() {
        let pos = Position {
            symbol: Symbol::new("TCS"),
            name: "Tata Consultancy Services Ltd".into(),
            exchange: Exchange::Nse,
            quantity: Decimal::ZERO,
            avg_cost: Decimal::ZERO,
            last_price: Decimal::from(4000),
        };
        assert_eq!(pos.pnl_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_order_serde_roundtrip() {
        let order = Order::equity(
            &Symbol::new("INFY"),
            Exchange::Nse,
            OrderSide::Buy,
            Decimal::from(5),
            Decimal::from(1500),
        );
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, order.id);
        assert_eq!(back.notional(), Decimal::from(7500));
    }
}
