//! Market-data adapter: the single read surface a
//! strategy or the simulator is handed. Wraps the price store and
//! indicator manager behind `&self` methods and enforces that nothing
//! beyond the requested date is ever visible — the anti-lookahead
//! boundary for the whole engine.

use std::path::PathBuf;

use chrono::NaiveDate;
use daybt_status::Result;
use daybt_types::{Bar, Cadence};

use crate::cache::IndicatorManager;
use crate::store::PriceStore;

pub struct MarketDataAdapter {
    store: PriceStore,
    indicators: IndicatorManager,
}

impl MarketDataAdapter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: PriceStore::new(data_dir),
            indicators: IndicatorManager::new(),
        }
    }

    /// The bar for `symbol` on exactly `date`, or `None` if there's no
    /// data for that day (holiday, pre-listing, unknown symbol).
    pub fn price(&self, symbol: &str, date: NaiveDate) -> Option<Bar> {
        self.store
            .get_prices(symbol, Some(date), Some(date))
            .ok()
            .and_then(|bars| bars.into_iter().next())
    }

    /// Indicator value for `symbol` as of `date`, computed only from bars
    /// `<= date`. See [`IndicatorManager::get`] for the `Ok(None)` vs
    /// `Err` distinction.
    pub fn indicator(
        &self,
        symbol: &str,
        name: &str,
        period: u32,
        cadence: Cadence,
        date: NaiveDate,
    ) -> Result<Option<f64>> {
        self.indicators.get(&self.store, symbol, name, period, cadence, date)
    }

    /// Drop cached indicator values whose period closed at or before
    /// `end_date`. The simulator calls this once per step, after
    /// determining which cadences just closed a period.
    pub fn finalize_period(&self, cadence: Cadence, end_date: NaiveDate) {
        self.indicators.finalize_period(cadence, end_date);
    }

    pub fn cache_stats(&self) -> (usize, usize) {
        self.indicators.cache_stats()
    }

    pub fn preload(&self, symbols: &[String]) -> Result<()> {
        self.store.preload(symbols)
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}
