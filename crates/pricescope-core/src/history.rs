//! The displayed price series and its derived price change

use crate::api::MarketDataService;
use crate::error::Result;
use crate::model::{CompanyRef, FundamentalsSnapshot, PricePoint, Timeframe};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

/// Sign of a price change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn is_non_negative(self) -> bool {
        self != Self::Down
    }
}

/// Change between the first and last point of the visible series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub absolute_delta: f64,
    pub percent_delta: f64,
    pub direction: Direction,
}

impl PriceChange {
    /// `None` for fewer than two points or a non-positive opening close
    pub fn from_series(series: &[PricePoint]) -> Option<Self> {
        let (first, last) = match series {
            [first, .., last] => (first, last),
            _ => return None,
        };
        if first.close <= 0.0 {
            return None;
        }

        let absolute_delta = last.close - first.close;
        let direction = match absolute_delta.partial_cmp(&0.0) {
            Some(Ordering::Greater) => Direction::Up,
            Some(Ordering::Less) => Direction::Down,
            _ => Direction::Flat,
        };

        Some(Self {
            absolute_delta,
            percent_delta: absolute_delta / first.close * 100.0,
            direction,
        })
    }

    /// `+1.23 (0.45%) 1Y`
    pub fn display(&self, timeframe: Timeframe) -> String {
        let sign = if self.direction.is_non_negative() { "+" } else { "" };
        format!(
            "{sign}{:.2} ({:.2}%) {timeframe}",
            self.absolute_delta, self.percent_delta
        )
    }
}

/// Selected company and exactly one current series.
///
/// The company, timeframe and series only ever change together, so no
/// reader sees one company's series under another company's name.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    company: Option<CompanyRef>,
    timeframe: Timeframe,
    series: Vec<PricePoint>,
    fundamentals: Option<FundamentalsSnapshot>,
}

impl HistoryStore {
    /// Fetch a series; the store itself is updated by the controller
    pub async fn load(
        service: &dyn MarketDataService,
        company: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<PricePoint>> {
        service.get_history(company, timeframe).await
    }

    /// Install a newly selected company with its initial series and fundamentals
    pub fn select(
        &mut self,
        company: CompanyRef,
        timeframe: Timeframe,
        series: Vec<PricePoint>,
        fundamentals: FundamentalsSnapshot,
    ) {
        *self = Self {
            company: Some(company),
            timeframe,
            series,
            fundamentals: Some(fundamentals),
        };
    }

    /// Swap the series of the already-selected company
    pub fn replace_series(&mut self, timeframe: Timeframe, series: Vec<PricePoint>) {
        self.timeframe = timeframe;
        self.series = series;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn company(&self) -> Option<&CompanyRef> {
        self.company.as_ref()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.company.as_ref().is_some_and(|c| c.name == name)
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn series(&self) -> &[PricePoint] {
        &self.series
    }

    pub fn fundamentals(&self) -> Option<&FundamentalsSnapshot> {
        self.fundamentals.as_ref()
    }

    pub fn current_price(&self) -> Option<f64> {
        self.series.last().map(|p| p.close)
    }

    pub fn last_date(&self) -> Option<NaiveDateTime> {
        self.series.last().map(|p| p.date)
    }

    pub fn price_change(&self) -> Option<PriceChange> {
        PriceChange::from_series(&self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn test_price_change_needs_two_points() {
        assert!(PriceChange::from_series(&[]).is_none());
        assert!(PriceChange::from_series(&fixtures::series(&[10.0])).is_none());
    }

    #[test]
    fn test_price_change_uses_first_and_last() {
        let change = PriceChange::from_series(&fixtures::series(&[200.0, 50.0, 250.0])).unwrap();
        assert_eq!(change.absolute_delta, 250.0 - 200.0);
        assert_eq!(change.percent_delta, (250.0 - 200.0) / 200.0 * 100.0);
        assert_eq!(change.direction, Direction::Up);
        assert_eq!(change.display(Timeframe::OneYear), "+50.00 (25.00%) 1Y");
    }

    #[test]
    fn test_price_change_down_and_flat() {
        let down = PriceChange::from_series(&fixtures::series(&[100.0, 98.5])).unwrap();
        assert_eq!(down.direction, Direction::Down);
        assert_eq!(down.display(Timeframe::OneMonth), "-1.50 (-1.50%) 1M");

        let flat = PriceChange::from_series(&fixtures::series(&[42.0, 40.0, 42.0])).unwrap();
        assert_eq!(flat.direction, Direction::Flat);
        assert_eq!(flat.display(Timeframe::OneDay), "+0.00 (0.00%) 1D");
    }

    #[test]
    fn test_price_change_exact_for_awkward_values() {
        let closes = [0.1, 0.7, 0.3];
        let change = PriceChange::from_series(&fixtures::series(&closes)).unwrap();
        assert_eq!(change.absolute_delta, 0.3 - 0.1);
        assert_eq!(change.percent_delta, (0.3 - 0.1) / 0.1 * 100.0);
    }

    #[test]
    fn test_price_change_guards_zero_open() {
        assert!(PriceChange::from_series(&fixtures::series(&[0.0, 5.0])).is_none());
    }

    #[test]
    fn test_store_select_and_replace() {
        let mut store = HistoryStore::default();
        store.select(
            CompanyRef::new("Acme Corp", "ACME"),
            Timeframe::OneYear,
            fixtures::series(&[1.0, 2.0, 3.0]),
            FundamentalsSnapshot::default(),
        );
        assert!(store.is_selected("Acme Corp"));
        assert_eq!(store.current_price(), Some(3.0));

        store.replace_series(Timeframe::OneMonth, fixtures::series(&[5.0, 6.0]));
        assert_eq!(store.timeframe(), Timeframe::OneMonth);
        assert_eq!(store.series().len(), 2);
        assert!(store.is_selected("Acme Corp"));
        assert!(store.fundamentals().is_some());

        store.replace_series(Timeframe::OneMonth, fixtures::series(&[5.0, 6.0]));
        assert_eq!(store.series().len(), 2);

        store.clear();
        assert!(store.company().is_none());
        assert!(store.series().is_empty());
        assert!(store.price_change().is_none());
    }
}
