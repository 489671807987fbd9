//! Display formatting for fundamentals

use crate::model::FundamentalsSnapshot;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;

/// Rendered in place of any value that is absent
pub const UNKNOWN: &str = "N/A";

const TRILLION: f64 = 1e12;
const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Display-ready fundamentals, one string per stat row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMetrics {
    pub market_cap: String,
    pub average_volume: String,
    pub pe_ratio: String,
    pub dividend_yield: String,
    pub fifty_two_week_range: String,
}

impl FormattedMetrics {
    /// Label/value pairs in display order
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Market Cap", &self.market_cap),
            ("Volume (Avg)", &self.average_volume),
            ("P/E Ratio", &self.pe_ratio),
            ("Dividend Yield", &self.dividend_yield),
            ("52-Week Range", &self.fifty_two_week_range),
        ]
    }
}

impl Default for FormattedMetrics {
    fn default() -> Self {
        MetricsProjector::project(None)
    }
}

/// Stateless projection from a snapshot to display strings
pub struct MetricsProjector;

impl MetricsProjector {
    pub fn project(snapshot: Option<&FundamentalsSnapshot>) -> FormattedMetrics {
        let snapshot = snapshot.copied().unwrap_or_default();
        FormattedMetrics {
            market_cap: Self::market_cap(snapshot.market_cap),
            average_volume: Self::volume(snapshot.average_volume),
            pe_ratio: Self::ratio(snapshot.trailing_pe),
            dividend_yield: Self::dividend_yield(snapshot.dividend_yield),
            fifty_two_week_range: Self::range(snapshot.fifty_two_week_low, snapshot.fifty_two_week_high),
        }
    }

    /// Largest of T/B/M in which the value is at least one, two decimals
    pub fn market_cap(value: Option<f64>) -> String {
        let Some(cap) = known(value) else {
            return UNKNOWN.to_string();
        };
        if cap.abs() >= TRILLION {
            format!("${:.2}T", cap / TRILLION)
        } else if cap.abs() >= BILLION {
            format!("${:.2}B", cap / BILLION)
        } else {
            format!("${:.2}M", cap / MILLION)
        }
    }

    /// Fraction rendered as a percentage
    pub fn dividend_yield(value: Option<f64>) -> String {
        known(value).map_or_else(|| UNKNOWN.to_string(), |v| format!("{:.2}%", v * 100.0))
    }

    /// `$low - $high`, or unknown if either bound is missing
    pub fn range(low: Option<f64>, high: Option<f64>) -> String {
        match (known(low), known(high)) {
            (Some(low), Some(high)) => format!("${low:.2} - ${high:.2}"),
            _ => UNKNOWN.to_string(),
        }
    }

    pub fn ratio(value: Option<f64>) -> String {
        known(value).map_or_else(|| UNKNOWN.to_string(), |v| format!("{v:.2}"))
    }

    /// Whole number with thousands separators
    pub fn volume(value: Option<f64>) -> String {
        match known(value) {
            Some(v) if v >= 0.0 => (v.round() as u64).to_formatted_string(&Locale::en),
            _ => UNKNOWN.to_string(),
        }
    }
}

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_cap_units() {
        assert_eq!(MetricsProjector::market_cap(Some(2.5e12)), "$2.50T");
        assert_eq!(MetricsProjector::market_cap(Some(7.3e9)), "$7.30B");
        assert_eq!(MetricsProjector::market_cap(Some(450e6)), "$450.00M");
        assert_eq!(MetricsProjector::market_cap(Some(1e12)), "$1.00T");
        assert_eq!(MetricsProjector::market_cap(Some(0.0)), "$0.00M");
        assert_eq!(MetricsProjector::market_cap(None), UNKNOWN);
        assert_eq!(MetricsProjector::market_cap(Some(f64::NAN)), UNKNOWN);
    }

    #[test]
    fn test_dividend_yield() {
        assert_eq!(MetricsProjector::dividend_yield(Some(0.0051)), "0.51%");
        assert_eq!(MetricsProjector::dividend_yield(Some(0.0)), "0.00%");
        assert_eq!(MetricsProjector::dividend_yield(None), UNKNOWN);
    }

    #[test]
    fn test_range_is_whole_or_unknown() {
        assert_eq!(MetricsProjector::range(Some(124.17), Some(199.62)), "$124.17 - $199.62");
        assert_eq!(MetricsProjector::range(Some(124.17), None), UNKNOWN);
        assert_eq!(MetricsProjector::range(None, Some(199.62)), UNKNOWN);
    }

    #[test]
    fn test_volume_grouping() {
        assert_eq!(MetricsProjector::volume(Some(1_234_567.0)), "1,234,567");
        assert_eq!(MetricsProjector::volume(Some(999.0)), "999");
        assert_eq!(MetricsProjector::volume(Some(1000.4)), "1,000");
        assert_eq!(MetricsProjector::volume(Some(0.0)), "0");
        assert_eq!(MetricsProjector::volume(Some(-5.0)), UNKNOWN);
        assert_eq!(MetricsProjector::volume(None), UNKNOWN);
    }

    #[test]
    fn test_project_full_and_empty() {
        let snapshot = FundamentalsSnapshot {
            market_cap: Some(2.5e12),
            average_volume: Some(52_000_000.0),
            trailing_pe: Some(29.456),
            dividend_yield: Some(0.0044),
            fifty_two_week_low: Some(164.08),
            fifty_two_week_high: Some(199.62),
        };
        let metrics = MetricsProjector::project(Some(&snapshot));
        assert_eq!(metrics.market_cap, "$2.50T");
        assert_eq!(metrics.average_volume, "52,000,000");
        assert_eq!(metrics.pe_ratio, "29.46");
        assert_eq!(metrics.dividend_yield, "0.44%");
        assert_eq!(metrics.fifty_two_week_range, "$164.08 - $199.62");

        let empty = MetricsProjector::project(None);
        assert!(empty.rows().iter().all(|(_, value)| *value == UNKNOWN));
        assert_eq!(empty, FormattedMetrics::default());
    }
}
