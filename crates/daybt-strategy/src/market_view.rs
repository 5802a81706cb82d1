//! The read-only, date-scoped view handed to a strategy. Wrapping the
//! adapter like this, rather than handing out the adapter directly,
//! keeps "no lookahead" a property of the type the strategy holds
//! instead of a convention callers must remember to honor.

use chrono::NaiveDate;
use daybt_md::MarketDataAdapter;
use daybt_status::Result;
use daybt_types::{Bar, Cadence};

pub struct MarketView<'a> {
    adapter: &'a MarketDataAdapter,
    date: NaiveDate,
}

impl<'a> MarketView<'a> {
    pub fn new(adapter: &'a MarketDataAdapter, date: NaiveDate) -> Self {
        Self { adapter, date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn get_price(&self, symbol: &str) -> Option<Bar> {
        self.adapter.price(symbol, self.date)
    }

    pub fn get_indicator(
        &self,
        symbol: &str,
        name: &str,
        period: u32,
        cadence: Cadence,
    ) -> Result<Option<f64>> {
        self.adapter.indicator(symbol, name, period, cadence, self.date)
    }
}
