//! Indicator computer: pure functions from a bar slice to
//! a series of indicator points. No caching or lookahead logic lives
//! here — that's the indicator manager's job (`cache.rs`).

use chrono::NaiveDate;
use daybt_status::{Result, Status};
use daybt_types::{Bar, Cadence, IndicatorPoint};

use crate::period;

/// Simple-moving-average seed followed by the standard EMA recurrence:
/// `ema_t = (close_t - ema_{t-1}) * (2 / (period + 1)) + ema_{t-1}`.
///
/// Operates on period bars (after rolling `bars` up to `cadence`), not
/// raw daily bars. Returns one point per period from the seed period
/// onward; an empty vector if there are fewer periods than `period`.
pub fn compute_ema(
    bars: &[Bar],
    period_len: u32,
    cadence: Cadence,
    as_of: Option<NaiveDate>,
) -> Result<Vec<IndicatorPoint>> {
    if period_len == 0 {
        return Err(Status::invalid_argument("indicator period must be > 0"));
    }
    if bars.is_empty() {
        return Err(Status::invalid_argument("indicator requires at least one bar"));
    }

    let period_bars = period::convert(bars, cadence, as_of)?;
    let n = period_len as usize;
    if period_bars.len() < n {
        return Ok(Vec::new());
    }

    let closes: Vec<f64> = period_bars.iter().map(|b| b.close).collect();
    let dates: Vec<NaiveDate> = period_bars.iter().map(|b| b.date).collect();

    let seed: f64 = closes[..n].iter().sum::<f64>() / n as f64;
    let mut points = vec![IndicatorPoint {
        date: dates[n - 1],
        value: seed,
    }];

    let k = 2.0 / (period_len as f64 + 1.0);
    let mut ema = seed;
    for i in n..closes.len() {
        ema = (closes[i] - ema) * k + ema;
        points.push(IndicatorPoint { date: dates[i], value: ema });
    }

    Ok(points)
}

/// Dispatch by indicator name. `"ema"` is the only built-in; new names
/// are added here behind the same signature.
pub fn compute(
    name: &str,
    bars: &[Bar],
    period_len: u32,
    cadence: Cadence,
    as_of: Option<NaiveDate>,
) -> Result<Vec<IndicatorPoint>> {
    match name {
        "ema" => compute_ema(bars, period_len, cadence, as_of),
        other => Err(Status::invalid_argument(format!("unknown indicator '{other}'"))),
    }
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
    fn rejects_zero_period() {
        let bars = vec![bar(2024, 1, 2, 10.0)];
        let err = compute_ema(&bars, 0, Cadence::Daily, None).unwrap_err();
        assert_eq!(err.code, daybt_status::Code::InvalidArgument);
    }

    #[test]
    fn rejects_empty_bars() {
        let err = compute_ema(&[], 3, Cadence::Daily, None).unwrap_err();
        assert_eq!(err.code, daybt_status::Code::InvalidArgument);
    }

    #[test]
    fn insufficient_periods_yields_empty_series() {
        let bars = vec![bar(2024, 1, 2, 10.0), bar(2024, 1, 3, 11.0)];
        let points = compute_ema(&bars, 5, Cadence::Daily, None).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn seed_is_simple_average_of_first_period() {
        let bars = vec![
            bar(2024, 1, 2, 10.0),
            bar(2024, 1, 3, 20.0),
            bar(2024, 1, 4, 30.0),
        ];
        let points = compute_ema(&bars, 3, Cadence::Daily, None).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn recurrence_applies_after_seed() {
        let bars = vec![
            bar(2024, 1, 2, 10.0),
            bar(2024, 1, 3, 10.0),
            bar(2024, 1, 4, 10.0),
            bar(2024, 1, 5, 40.0),
        ];
        let points = compute_ema(&bars, 3, Cadence::Daily, None).unwrap();
        assert_eq!(points.len(), 2);
        // seed = 10, k = 0.5: ema = (40-10)*0.5 + 10 = 25
        assert!((points[1].value - 25.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_indicator_name_is_invalid_argument() {
        let bars = vec![bar(2024, 1, 2, 10.0)];
        let err = compute("rsi", &bars, 3, Cadence::Daily, None).unwrap_err();
        assert_eq!(err.code, daybt_status::Code::InvalidArgument);
    }
}
