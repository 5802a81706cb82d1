use chrono::NaiveDate;
use daybt_status::{Result, Status};
use serde::{Deserialize, Serialize};

/// One day's OHLC summary for one symbol.
///
/// Invariant: `low <= min(open, close) <= max(open, close) <= high` and
/// `volume >= 0`. Bars are constructed through [`Bar::new`], which enforces
/// this; there is no public way to build an invalid one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
}

impl Bar {
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adjusted_close: f64,
        volume: i64,
    ) -> Result<Self> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            adjusted_close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    pub fn validate(&self) -> Result<()> {
        let lo = self.open.min(self.close);
        let hi = self.open.max(self.close);
        if !(self.low <= lo && lo <= hi && hi <= self.high) {
            return Err(Status::invalid_argument(format!(
                "bar {} violates low<=min(open,close)<=max(open,close)<=high \
                 (open={}, high={}, low={}, close={})",
                self.date, self.open, self.high, self.low, self.close
            )));
        }
        if self.volume < 0 {
            return Err(Status::invalid_argument(format!(
                "bar {} has negative volume {}",
                self.date, self.volume
            )));
        }
        Ok(())
    }
}

/// An ordered sequence of bars for one symbol: strictly increasing by date,
/// no duplicates. Enforced once at construction time so every downstream
/// reader can assume the invariant holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        for w in bars.windows(2) {
            if w[1].date <= w[0].date {
                return Err(Status::invalid_argument(format!(
                    "price series not strictly increasing: {} then {}",
                    w[0].date, w[1].date
                )));
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Inclusive `[start, end]` slice by date. Either bound may be omitted.
    pub fn slice(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Bar> {
        self.bars
            .iter()
            .copied()
            .filter(|b| start.map_or(true, |s| b.date >= s) && end.map_or(true, |e| b.date <= e))
            .collect()
    }

    /// The single bar dated exactly `date`, if any.
    pub fn bar_on(&self, date: NaiveDate) -> Option<Bar> {
        // Bars are sorted by date: binary search is valid and avoids an
        // O(n) scan on wide series.
        self.bars
            .binary_search_by(|b| b.date.cmp(&date))
            .ok()
            .map(|i| self.bars[i])
    }

    /// All bars with `date <= as_of`, in order.
    pub fn up_to(&self, as_of: NaiveDate) -> &[Bar] {
        let idx = self.bars.partition_point(|b| b.date <= as_of);
        &self.bars[..idx]
    }
}
