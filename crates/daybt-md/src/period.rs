//! Period conversion: roll daily bars up into weekly or
//! monthly period bars.

use chrono::NaiveDate;
use daybt_status::Result;
use daybt_types::{Bar, Cadence};

fn fold_period(bucket: &[Bar]) -> Bar {
    let first = bucket.first().expect("fold_period called with empty bucket");
    let last = bucket.last().unwrap();
    let high = bucket.iter().fold(f64::MIN, |acc, b| acc.max(b.high));
    let low = bucket.iter().fold(f64::MAX, |acc, b| acc.min(b.low));
    let volume = bucket.iter().map(|b| b.volume).sum();
    Bar {
        date: last.date,
        open: first.open,
        high,
        low,
        close: last.close,
        adjusted_close: last.adjusted_close,
        volume,
    }
}

/// Roll `bars` (assumed daily, date-ascending) up to `cadence`.
///
/// With `as_of = None`, only fully closed periods are emitted; a trailing
/// partial bucket is dropped. With `as_of = Some(d)`, bars beyond `d` are
/// ignored first, and if the remaining bars end mid-period, one extra
/// provisional period bar is appended whose close is the close of the
/// latest bar `<= d`. Daily cadence is the identity
/// transform — every bar is its own period.
pub fn convert(bars: &[Bar], cadence: Cadence, as_of: Option<NaiveDate>) -> Result<Vec<Bar>> {
    if cadence == Cadence::Daily {
        let bars: Vec<Bar> = match as_of {
            Some(d) => bars.iter().copied().filter(|b| b.date <= d).collect(),
            None => bars.to_vec(),
        };
        return Ok(bars);
    }

    let restricted: Vec<Bar> = match as_of {
        Some(d) => bars.iter().copied().filter(|b| b.date <= d).collect(),
        None => bars.to_vec(),
    };

    let mut out = Vec::new();
    let mut bucket: Vec<Bar> = Vec::new();
    for bar in &restricted {
        bucket.push(*bar);
        if cadence.is_period_end(bar.date) {
            out.push(fold_period(&bucket));
            bucket.clear();
        }
    }

    if !bucket.is_empty() && as_of.is_some() {
        out.push(fold_period(&bucket));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn daily_is_identity() {
        let bars = vec![bar(2024, 3, 4, 10.0), bar(2024, 3, 5, 11.0)];
        let out = convert(&bars, Cadence::Daily, None).unwrap();
        assert_eq!(out, bars);
    }

    #[test]
    fn weekly_folds_mon_through_fri() {
        // 2024-03-04 (Mon) .. 2024-03-08 (Fri)
        let bars = vec![
            bar(2024, 3, 4, 10.0),
            bar(2024, 3, 5, 11.0),
            bar(2024, 3, 6, 9.0),
            bar(2024, 3, 7, 12.0),
            bar(2024, 3, 8, 13.0),
        ];
        let out = convert(&bars, Cadence::Weekly, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].open, 10.0);
        assert_eq!(out[0].close, 13.0);
        assert_eq!(out[0].high, 14.0);
        assert_eq!(out[0].low, 8.0);
        assert_eq!(out[0].volume, 500);
    }

    #[test]
    fn weekly_drops_partial_trailing_bucket_without_as_of() {
        let bars = vec![bar(2024, 3, 4, 10.0), bar(2024, 3, 5, 11.0)];
        let out = convert(&bars, Cadence::Weekly, None).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn weekly_appends_provisional_bucket_with_as_of() {
        let bars = vec![bar(2024, 3, 4, 10.0), bar(2024, 3, 5, 11.0)];
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let out = convert(&bars, Cadence::Weekly, Some(as_of)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].close, 11.0);
        assert_eq!(out[0].date, as_of);
    }

    #[test]
    fn as_of_excludes_future_bars() {
        let bars = vec![
            bar(2024, 3, 4, 10.0),
            bar(2024, 3, 5, 11.0),
            bar(2024, 3, 6, 999.0),
        ];
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let out = convert(&bars, Cadence::Daily, Some(as_of)).unwrap();
        assert_eq!(out.len(), 2);
    }
}
