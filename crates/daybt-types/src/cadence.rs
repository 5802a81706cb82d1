use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The time granularity at which an indicator is computed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    /// Weekly periods end Friday, monthly periods end on the last calendar
    /// day of the month. Daily periods always end.
    pub fn is_period_end(self, date: NaiveDate) -> bool {
        match self {
            Cadence::Daily => true,
            Cadence::Weekly => date.weekday() == chrono::Weekday::Fri,
            Cadence::Monthly => {
                let next_day = date.succ_opt();
                match next_day {
                    Some(next) => next.month() != date.month(),
                    None => true,
                }
            }
        }
    }
}
