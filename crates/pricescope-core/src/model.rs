//! Domain types shared by every dashboard component

use crate::error::{DashboardError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A company known to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyRef {
    /// Display name, used for lookups
    pub name: String,
    /// Ticker symbol; empty when the service did not report one
    #[serde(default)]
    pub ticker: String,
}

impl CompanyRef {
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
        }
    }
}

impl fmt::Display for CompanyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ticker.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.ticker)
        }
    }
}

/// One closing price of the historical series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "market_date")]
    pub date: NaiveDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDateTime, close: f64) -> Self {
        Self { date, close }
    }
}

/// One forecast close produced by the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    #[serde(with = "market_date")]
    pub date: NaiveDateTime,
    pub close: f64,
}

impl PredictionPoint {
    pub fn new(date: NaiveDateTime, close: f64) -> Self {
        Self { date, close }
    }
}

/// Fundamentals returned alongside the initial history.
///
/// Every field is optional; a missing field means "unknown", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsSnapshot {
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub average_volume: Option<f64>,
    #[serde(default, rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// Fraction, e.g. `0.0051` for 0.51%
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_high: Option<f64>,
}

/// A successful resolution: the canonical company plus its initial data
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub company: CompanyRef,
    pub history: Vec<PricePoint>,
    pub fundamentals: FundamentalsSnapshot,
}

/// Outcome of resolving a free-text query
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// The query named exactly one company
    Resolved(Resolution),
    /// The query was ambiguous; candidates in server order
    Suggestions(Vec<CompanyRef>),
}

/// How chart date labels are rendered for a timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelGranularity {
    /// `3:45 PM`
    ClockTime,
    /// `Jan 5`
    MonthDay,
    /// `Jan 2024`
    MonthYear,
}

impl LabelGranularity {
    pub fn format(self, date: &NaiveDateTime) -> String {
        match self {
            Self::ClockTime => date.format("%-I:%M %p").to_string(),
            Self::MonthDay => date.format("%b %-d").to_string(),
            Self::MonthYear => date.format("%b %Y").to_string(),
        }
    }
}

/// History window selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "Max")]
    Max,
}

impl Timeframe {
    /// All timeframes in display order
    pub const ALL: [Timeframe; 7] = [
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::SixMonths,
        Self::OneYear,
        Self::FiveYears,
        Self::Max,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::Max => "Max",
        }
    }

    /// Calendar days the server looks back from the latest point; `None` is unbounded
    pub fn lookback_days(self) -> Option<u32> {
        match self {
            Self::OneDay => Some(1),
            Self::OneWeek => Some(7),
            Self::OneMonth => Some(30),
            Self::SixMonths => Some(182),
            Self::OneYear => Some(365),
            Self::FiveYears => Some(1825),
            Self::Max => None,
        }
    }

    pub fn label_granularity(self) -> LabelGranularity {
        match self {
            Self::OneDay => LabelGranularity::ClockTime,
            Self::OneWeek | Self::OneMonth => LabelGranularity::MonthDay,
            _ => LabelGranularity::MonthYear,
        }
    }

    pub fn format_label(self, date: &NaiveDateTime) -> String {
        self.label_granularity().format(date)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownTimeframe(s.to_string()))
    }
}

/// Forecast horizon, the subset of [`Timeframe`] the prediction service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1D")]
    OneDay,
    #[default]
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Self::OneDay, Self::OneWeek, Self::OneMonth];

    pub fn as_str(self) -> &'static str {
        Timeframe::from(self).as_str()
    }

    /// Number of business days the service forecasts
    pub fn business_days(self) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
        }
    }
}

impl From<Horizon> for Timeframe {
    fn from(horizon: Horizon) -> Self {
        match horizon {
            Horizon::OneDay => Timeframe::OneDay,
            Horizon::OneWeek => Timeframe::OneWeek,
            Horizon::OneMonth => Timeframe::OneMonth,
        }
    }
}

impl TryFrom<Timeframe> for Horizon {
    type Error = DashboardError;

    fn try_from(timeframe: Timeframe) -> Result<Self> {
        match timeframe {
            Timeframe::OneDay => Ok(Self::OneDay),
            Timeframe::OneWeek => Ok(Self::OneWeek),
            Timeframe::OneMonth => Ok(Self::OneMonth),
            other => Err(DashboardError::UnknownHorizon(other.to_string())),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownHorizon(s.to_string()))
    }
}

/// Forecast model identifier, forwarded to the service verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub const LINEAR: &'static str = "linear";
    pub const TREE: &'static str = "tree";

    /// Create a model id; any non-empty identifier is accepted
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DashboardError::UnknownModel("empty model id".to_string()));
        }
        Ok(Self(id))
    }

    pub fn linear() -> Self {
        Self(Self::LINEAR.to_string())
    }

    pub fn tree() -> Self {
        Self(Self::TREE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name for the well-known models
    pub fn label(&self) -> &str {
        match self.0.as_str() {
            Self::LINEAR => "Linear Regression",
            Self::TREE => "Decision Tree",
            other => other,
        }
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::linear()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Serde adapter for the date strings the service emits.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` (also with a space
/// separator) and RFC 3339 with an offset, which keeps its wall-clock time.
pub mod market_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(WIRE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised date: {raw}")))
    }
}
