//! Price store & cache.
//!
//! Single-threaded, lazily-loaded, memoized by symbol. `RefCell` gives the
//! store `&self` read methods without a lock, matching the rest of this
//! workspace's "single process, no concurrency" stance.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use daybt_status::Result;
use daybt_types::Bar;
use tracing::debug;

use crate::csv;

pub struct PriceStore {
    data_dir: PathBuf,
    cache: RefCell<HashMap<String, daybt_types::PriceSeries>>,
}

impl PriceStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn ensure_loaded(&self, symbol: &str) -> Result<()> {
        if self.cache.borrow().contains_key(symbol) {
            return Ok(());
        }
        debug!(symbol, "loading price series from disk");
        let series = csv::load(&self.data_dir, symbol)?;
        self.cache.borrow_mut().insert(symbol.to_string(), series);
        Ok(())
    }

    /// Fetch bars for `symbol` within the inclusive `[start, end]` window.
    /// Loads from disk on first access and memoizes; `NotFound` if the
    /// symbol has no data file, `Internal` if the file is malformed.
    pub fn get_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Bar>> {
        self.ensure_loaded(symbol)?;
        let cache = self.cache.borrow();
        let series = cache.get(symbol).expect("just loaded");
        Ok(series.slice(start, end))
    }

    /// Warm the cache for a batch of symbols up front. Fails fast on the
    /// first symbol that can't be loaded.
    pub fn preload(&self, symbols: &[String]) -> Result<()> {
        for symbol in symbols {
            self.ensure_loaded(symbol)?;
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
