//! Simulated pricing provider - static tables with pseudo-random drift
//!
//! Stands in for a live market feed: each poll nudges the stored price/NAV
//! by a bounded random factor. Swap in a real [`MarketDataSource`] to feed
//! the engine from an actual venue.

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{MarketDataSource, PriceSnapshot};
use crate::core::{Exchange, FundId, Result, Symbol};

/// In-memory feed with drifting quotes and NAVs.
pub struct SimulatedFeed {
    quotes: RwLock<HashMap<(Symbol, Exchange), Decimal>>,
    navs: RwLock<HashMap<FundId, Decimal>>,
    /// Max movement per poll, as a fraction (0.02 = +/-2%)
    jitter: f64,
}

impl SimulatedFeed {
    /// Seeded with the default NSE quote table and mutual-fund NAV table.
    pub fn new(jitter: f64) -> Self {
        let mut quotes = HashMap::new();
        for (symbol, paise) in [
            ("RELIANCE", 2950_00),
            ("TCS", 4100_00),
            ("HDFCBANK", 1650_00),
            ("INFY", 1550_00),
            ("ICICIBANK", 1100_00),
            ("SBIN", 820_00),
        ] {
            quotes.insert(
                (Symbol::new(symbol), Exchange::Nse),
                Decimal::new(paise, 2),
            );
        }

        let mut navs = HashMap::new();
        for (fund, nav_paise) in [
            ("SBI Bluechip Fund", 75_50),
            ("HDFC Mid-Cap Fund", 125_30),
            ("ICICI Balanced Fund", 52_80),
            ("Axis ELSS Fund", 68_90),
        ] {
            navs.insert(FundId::new(fund), Decimal::new(nav_paise, 2));
        }

        Self {
            quotes: RwLock::new(quotes),
            navs: RwLock::new(navs),
            jitter,
        }
    }

    /// Feed with caller-supplied tables.
    pub fn with_tables(
        quotes: HashMap<(Symbol, Exchange), Decimal>,
        navs: HashMap<FundId, Decimal>,
        jitter: f64,
    ) -> Self {
        Self {
            quotes: RwLock::new(quotes),
            navs: RwLock::new(navs),
            jitter,
        }
    }

    fn drift(&self, value: Decimal) -> Decimal {
        if self.jitter <= 0.0 {
            return value;
        }
        let factor = 1.0 + rand::random_range(-self.jitter..=self.jitter);
        let factor = Decimal::try_from(factor).unwrap_or(Decimal::ONE);
        (value * factor).round_dp(2)
    }

    /// Poll the whole universe into a snapshot for mark-to-market.
    pub async fn snapshot(&self) -> PriceSnapshot {
        let mut snapshot = PriceSnapshot::new();
        let quotes: Vec<_> = {
            let guard = self.quotes.read();
            guard.keys().cloned().collect()
        };
        for (symbol, exchange) in quotes {
            if let Ok(Some(price)) = self.quote(&symbol, exchange).await {
                snapshot.set_quote(symbol, exchange, price);
            }
        }
        let funds: Vec<_> = {
            let guard = self.navs.read();
            guard.keys().cloned().collect()
        };
        for fund in funds {
            if let Ok(Some(nav)) = self.nav(&fund).await {
                snapshot.set_nav(fund, nav);
            }
        }
        snapshot
    }
}

#[async_trait]
impl MarketDataSource for SimulatedFeed {
    async fn quote(&self, symbol: &Symbol, exchange: Exchange) -> Result<Option<Decimal>> {
        let current = {
            let guard = self.quotes.read();
            guard.get(&(symbol.clone(), exchange)).copied()
        };
        Ok(current.map(|price| {
            let moved = self.drift(price);
            self.quotes
                .write()
                .insert((symbol.clone(), exchange), moved);
            moved
        }))
    }

    async fn nav(&self, fund: &FundId) -> Result<Option<Decimal>> {
        let current = {
            let guard = self.navs.read();
            guard.get(fund).copied()
        };
        Ok(current.map(|nav| {
            let moved = self.drift(nav);
            self.navs.write().insert(fund.clone(), moved);
            moved
        }))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::PriceLookup;

    #[tokio::test]
    async fn test_unknown_symbol_has_no_quote() {
        let feed = SimulatedFeed::new(0.02);
        let quote = feed
            .quote(&Symbol::new("NOSUCH"), Exchange::Nse)
            .await
            .unwrap();
        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_zero_jitter_returns_table_value() {
        let feed = SimulatedFeed::new(0.0);
        let nav = feed
            .nav(&FundId::new("SBI Bluechip Fund"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(nav, Decimal::new(75_50, 2));
    }

    #[tokio::test]
    async fn test_drift_bounded_per_step() {
        let feed = SimulatedFeed::new(0.02);
        let mut prev = Decimal::new(2950_00, 2);
        for _ in 0..50 {
            let quote = feed
                .quote(&Symbol::new("RELIANCE"), Exchange::Nse)
                .await
                .unwrap()
                .unwrap();
            let low = (prev * Decimal::new(98, 2)).round_dp(2) - Decimal::new(1, 2);
            let high = (prev * Decimal::new(102, 2)).round_dp(2) + Decimal::new(1, 2);
            assert!(quote >= low && quote <= high, "{} outside [{}, {}]", quote, low, high);
            prev = quote;
        }
    }

    #[tokio::test]
    async fn test_snapshot_covers_both_tables() {
        let feed = SimulatedFeed::new(0.0);
        let snapshot = feed.snapshot().await;
        assert!(snapshot
            .price(&Symbol::new("TCS"), Exchange::Nse)
            .is_some());
        assert!(snapshot.nav(&FundId::new("Axis ELSS Fund")).is_some());
        assert!(snapshot
            .price(&Symbol::new("UNKNOWN"), Exchange::Bse)
            .is_none());
    }
}
