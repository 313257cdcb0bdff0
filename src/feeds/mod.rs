//! Market data feeds - pluggable pricing providers
//!
//! The ledger never fetches prices itself: a [`MarketDataSource`] is polled
//! by the host, materialized into a [`PriceSnapshot`], and injected into
//! `Ledger::mark_to_market`.

pub mod sim;

pub use sim::SimulatedFeed;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::core::{Exchange, FundId, Result, Symbol};

/// Pricing provider trait - implemented by market-data sources.
///
/// Treated as an untrusted, possibly-unavailable oracle: a missing quote is
/// `Ok(None)`, not an error.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Current traded price for a listed symbol, if the source has one
    async fn quote(&self, symbol: &Symbol, exchange: Exchange) -> Result<Option<Decimal>>;

    /// Current NAV for a mutual fund, if the source tracks it
    async fn nav(&self, fund: &FundId) -> Result<Option<Decimal>>;

    /// Source name
    fn name(&self) -> &str;
}

/// Synchronous lookup the ledger consumes during mark-to-market.
///
/// Absence of an instrument means "keep the stale mark".
pub trait PriceLookup {
    fn price(&self, symbol: &Symbol, exchange: Exchange) -> Option<Decimal>;
    fn nav(&self, fund: &FundId) -> Option<Decimal>;
}

/// Materialized point-in-time price map.
#[derive(Debug, Clone, Default)]
pub struct PriceSnapshot {
    quotes: HashMap<(Symbol, Exchange), Decimal>,
    navs: HashMap<FundId, Decimal>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_quote(&mut self, symbol: Symbol, exchange: Exchange, price: Decimal) {
        self.quotes.insert((symbol, exchange), price);
    }

    pub fn set_nav(&mut self, fund: FundId, nav: Decimal) {
        self.navs.insert(fund, nav);
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.navs.is_empty()
    }
}

impl PriceLookup for PriceSnapshot {
    fn price(&self, symbol: &Symbol, exchange: Exchange) -> Option<Decimal> {
        self.quotes.get(&(symbol.clone(), exchange)).copied()
    }

    fn nav(&self, fund: &FundId) -> Option<Decimal> {
        self.navs.get(fund).copied()
    }
}
