//! Market session clock - pure classification of wall-clock time
//!
//! Fixed NSE/BSE trading calendar, no holiday table. Every instant maps to
//! exactly one phase, so there are no error conditions here.

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// IST offset (UTC+05:30). The trading calendar is fixed to one region, so a
/// constant offset is enough and no timezone database is needed.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Market session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPhase {
    Closed,
    PreMarket,
    Open,
    PostMarket,
}

impl std::fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketPhase::Closed => write!(f, "CLOSED"),
            MarketPhase::PreMarket => write!(f, "PRE-MARKET"),
            MarketPhase::Open => write!(f, "OPEN"),
            MarketPhase::PostMarket => write!(f, "POST-MARKET"),
        }
    }
}

/// Classification result: phase plus human-readable context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub phase: MarketPhase,
    pub reason: String,
    pub next_open: String,
}

impl MarketStatus {
    fn new(phase: MarketPhase, reason: &str, next_open: &str) -> Self {
        Self {
            phase,
            reason: reason.to_string(),
            next_open: next_open.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase == MarketPhase::Open
    }
}

/// Classify an instant against the trading calendar.
///
/// Session boundaries (IST): pre-market [09:00, 09:15), open [09:15, 15:30),
/// post-market [15:30, 16:00), closed otherwise; weekends fully closed.
pub fn classify(now: DateTime<Utc>) -> MarketStatus {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS).unwrap();
    let local = now.with_timezone(&ist);

    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return MarketStatus::new(
            MarketPhase::Closed,
            "Weekend - Market Closed",
            "Monday 09:15 AM",
        );
    }

    let t = local.time();
    let pre_open = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let open = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
    let close = NaiveTime::from_hms_opt(15, 30, 0).unwrap();
    let post_close = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

    if t < pre_open {
        MarketStatus::new(
            MarketPhase::Closed,
            "Pre-Market opens at 09:00 AM",
            "09:00 AM",
        )
    } else if t < open {
        MarketStatus::new(MarketPhase::PreMarket, "Pre-Market Session", "09:15 AM")
    } else if t < close {
        MarketStatus::new(MarketPhase::Open, "Market is Live", "03:30 PM")
    } else if t < post_close {
        MarketStatus::new(MarketPhase::PostMarket, "Post-Market Session", "Closed")
    } else {
        MarketStatus::new(MarketPhase::Closed, "Market Closed", "Tomorrow 09:15 AM")
    }
}

/// Convenience wrapper over the current wall clock.
pub fn current_status() -> MarketStatus {
    classify(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Build an IST instant and hand it to classify() as UTC.
    fn ist(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(IST_OFFSET_SECS)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_saturday_closed_any_time() {
        // 2025-06-14 is a Saturday
        for hour in [0, 9, 12, 15, 23] {
            assert_eq!(classify(ist(2025, 6, 14, hour, 20)).phase, MarketPhase::Closed);
        }
    }

    #[test]
    fn test_monday_open_hours() {
        // 2025-06-16 is a Monday
        assert_eq!(classify(ist(2025, 6, 16, 8, 59)).phase, MarketPhase::Closed);
        assert_eq!(classify(ist(2025, 6, 16, 9, 20)).phase, MarketPhase::Open);
        assert_eq!(classify(ist(2025, 6, 16, 15, 45)).phase, MarketPhase::PostMarket);
    }

    #[test]
    fn test_session_boundaries() {
        assert_eq!(classify(ist(2025, 6, 16, 9, 0)).phase, MarketPhase::PreMarket);
        assert_eq!(classify(ist(2025, 6, 16, 9, 15)).phase, MarketPhase::Open);
        assert_eq!(classify(ist(2025, 6, 16, 15, 30)).phase, MarketPhase::PostMarket);
        assert_eq!(classify(ist(2025, 6, 16, 16, 0)).phase, MarketPhase::Closed);
    }

    #[test]
    fn test_weekend_hint_points_to_monday() {
        let status = classify(ist(2025, 6, 15, 11, 0)); // Sunday
        assert_eq!(status.phase, MarketPhase::Closed);
        assert_eq!(status.next_open, "Monday 09:15 AM");
    }
}
