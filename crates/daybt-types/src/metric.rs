/// A tagged metric kind. New built-ins extend this enum; match
/// exhaustively rather than introducing a dynamic name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    SharpeRatio,
    MaxDrawdown,
    TotalPnl,
    WinRate,
    WinCount,
    LossCount,
    AvgHoldingDays,
}

/// Units are used only for formatting; they carry no computation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Dollars,
    Percent,
    Days,
    Count,
    Ratio,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Metric {
    pub kind: MetricKind,
    pub value: f64,
    pub unit: Unit,
}

impl Metric {
    pub fn new(kind: MetricKind, value: f64, unit: Unit) -> Self {
        Self { kind, value, unit }
    }
}
