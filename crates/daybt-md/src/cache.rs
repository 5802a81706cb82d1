//! Indicator manager: memoizes indicator computer output
//! keyed by `(symbol, spec, date)`, tracks provisional vs. finalized
//! values, and evicts provisional entries once their period closes.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use daybt_status::Result;
use daybt_types::{Cadence, IndicatorCacheEntry, IndicatorSpec};
use tracing::trace;

use crate::indicator;
use crate::store::PriceStore;

/// How far back to fetch bars before computing an indicator at `period`
/// on `cadence`, generous enough to seed the EMA plus some slack for
/// non-trading days.
fn lookback_days(period: u32, cadence: Cadence) -> i64 {
    let period = period as i64;
    match cadence {
        Cadence::Daily => period + 10,
        Cadence::Weekly => 7 * period + 50,
        Cadence::Monthly => 30 * period + 100,
    }
}

#[derive(Default)]
pub struct IndicatorManager {
    cache: RefCell<HashMap<(String, IndicatorSpec, NaiveDate), IndicatorCacheEntry>>,
}

impl IndicatorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of indicator `name(period, cadence)` for `symbol` as of
    /// `date`. `Ok(None)` means the symbol has no price data yet (too
    /// early in the backtest, or an unknown symbol) — a benign miss, not
    /// a failure. An unknown indicator name still propagates as
    /// `InvalidArgument`.
    pub fn get(
        &self,
        store: &PriceStore,
        symbol: &str,
        name: &str,
        period: u32,
        cadence: Cadence,
        date: NaiveDate,
    ) -> Result<Option<f64>> {
        let spec = IndicatorSpec::new(name, period, cadence);
        let key = (symbol.to_string(), spec.clone(), date);
        if let Some(entry) = self.cache.borrow().get(&key) {
            return Ok(entry.value);
        }

        let lookback = lookback_days(period, cadence);
        let start = date - chrono::Duration::days(lookback);
        let bars = match store.get_prices(symbol, Some(start), Some(date)) {
            Ok(bars) => bars,
            Err(e) if e.code == daybt_status::Code::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let is_provisional = !cadence.is_period_end(date);
        let as_of = if is_provisional { Some(date) } else { None };
        let points = indicator::compute(name, &bars, period, cadence, as_of)?;
        let value = points.last().map(|p| p.value);

        trace!(symbol, name, date = %date, is_provisional, "computed indicator");
        self.cache
            .borrow_mut()
            .insert(key, IndicatorCacheEntry { value, is_provisional });
        Ok(value)
    }

    /// Evict provisional entries for `cadence` whose date falls within a
    /// period that closed at or before `end_date`. Called once a period
    /// boundary is crossed so the next request for that period recomputes
    /// a finalized value instead of returning a stale provisional one.
    pub fn finalize_period(&self, cadence: Cadence, end_date: NaiveDate) {
        self.cache.borrow_mut().retain(|(_, spec, date), entry| {
            !(spec.cadence == cadence && entry.is_provisional && *date <= end_date)
        });
    }

    /// `(total entries, provisional entries)`.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        let total = cache.len();
        let provisional = cache.values().filter(|e| e.is_provisional).count();
        (total, provisional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybt_types::{Bar, PriceSeries};

    fn bar(y: i32, m: u32, d: u32, close: f64) -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            close,
            close + 1.0,
            close - 1.0,
            close,
            close,
            100,
        )
        .unwrap()
    }

    fn store_with(dir: &std::path::Path, symbol: &str, bars: Vec<Bar>) -> PriceStore {
        let series = PriceSeries::new(bars).unwrap();
        crate::csv::save(dir, symbol, &series, false).unwrap();
        PriceStore::new(dir)
    }

    #[test]
    fn missing_symbol_is_benign_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PriceStore::new(dir.path());
        let mgr = IndicatorManager::new();
        let v = mgr
            .get(&store, "ZZZZ", "ema", 3, Cadence::Daily, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .unwrap();
        assert!(v.is_none());
    }

    #[test]
    fn unknown_name_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            dir.path(),
            "AAPL",
            vec![bar(2024, 1, 2, 10.0), bar(2024, 1, 3, 11.0), bar(2024, 1, 4, 12.0)],
        );
        let mgr = IndicatorManager::new();
        let err = mgr
            .get(&store, "AAPL", "rsi", 3, Cadence::Daily, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap())
            .unwrap_err();
        assert_eq!(err.code, daybt_status::Code::InvalidArgument);
    }

    #[test]
    fn repeated_calls_hit_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            dir.path(),
            "AAPL",
            vec![bar(2024, 1, 2, 10.0), bar(2024, 1, 3, 11.0), bar(2024, 1, 4, 12.0)],
        );
        let mgr = IndicatorManager::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let first = mgr.get(&store, "AAPL", "ema", 3, Cadence::Daily, date).unwrap();
        let (total_before, _) = mgr.cache_stats();
        let second = mgr.get(&store, "AAPL", "ema", 3, Cadence::Daily, date).unwrap();
        let (total_after, _) = mgr.cache_stats();
        assert_eq!(first, second);
        assert_eq!(total_before, total_after);
    }

    #[test]
    fn finalize_period_evicts_provisional_entries() {
        let dir = tempfile::tempdir().unwrap();
        // 2024-03-04 (Mon) .. 2024-03-06 (Wed): week not yet closed (ends Fri).
        let store = store_with(
            dir.path(),
            "AAPL",
            vec![bar(2024, 3, 4, 10.0), bar(2024, 3, 5, 11.0), bar(2024, 3, 6, 12.0)],
        );
        let mgr = IndicatorManager::new();
        let wed = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        mgr.get(&store, "AAPL", "ema", 2, Cadence::Weekly, wed).unwrap();
        let (_, provisional_before) = mgr.cache_stats();
        assert_eq!(provisional_before, 1);

        mgr.finalize_period(Cadence::Weekly, wed);
        let (total_after, provisional_after) = mgr.cache_stats();
        assert_eq!(total_after, 0);
        assert_eq!(provisional_after, 0);
    }
}
