//! Intraday path synthesis: turn one daily bar into the
//! minimal 4-point path that touches O, H, L, C while respecting the
//! day's direction.

use daybt_types::Bar;

/// One observed point on the synthesized intraday path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPoint {
    pub fraction_of_day: f64,
    pub price: f64,
}

/// `close >= open` days go O, H, L, C; down days go O, L, H, C. Either
/// way this is the shortest path touching all four OHLC values without
/// contradicting the day's direction.
pub fn intraday_path(bar: &Bar) -> [PathPoint; 4] {
    let o = PathPoint { fraction_of_day: 0.0, price: bar.open };
    let c = PathPoint { fraction_of_day: 1.0, price: bar.close };
    if bar.close >= bar.open {
        [
            o,
            PathPoint { fraction_of_day: 0.33, price: bar.high },
            PathPoint { fraction_of_day: 0.66, price: bar.low },
            c,
        ]
    } else {
        [
            o,
            PathPoint { fraction_of_day: 0.33, price: bar.low },
            PathPoint { fraction_of_day: 0.66, price: bar.high },
            c,
        ]
    }
}
