use crate::cadence::Cadence;
use chrono::NaiveDate;

/// Identifies one indicator computation: a named function at a period and
/// cadence. Used as the cache key by the indicator manager.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndicatorSpec {
    pub name: String,
    pub period: u32,
    pub cadence: Cadence,
}

impl IndicatorSpec {
    pub fn new(name: impl Into<String>, period: u32, cadence: Cadence) -> Self {
        Self {
            name: name.into(),
            period,
            cadence,
        }
    }
}

/// A single computed indicator point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A cached indicator value: the value itself, and whether it was computed
/// before its period closed (provisional) or after (finalized).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorCacheEntry {
    pub value: Option<f64>,
    pub is_provisional: bool,
}
