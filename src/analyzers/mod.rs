//! Trip aggregations.
//!
//! Each aggregation takes the full trip sequence and a [`TimeFilter`],
//! makes its own filtered pass over the trips and keeps no state between
//! calls. Ties always resolve to the first candidate in calendar or input order.
//!
//! [`TimeFilter`]: crate::filter::TimeFilter

pub mod duration;
pub mod riders;
pub mod stations;
pub mod time_of_day;
pub mod types;
pub mod utility;

#[cfg(test)]
pub(crate) mod test_support;

pub use duration::trip_duration;
pub use riders::{birth_years, gender_counts, user_types};
pub use stations::{popular_stations, popular_trip};
pub use time_of_day::{popular_hour, popular_month, popular_weekday};
pub use types::{BirthYearStats, DurationSummary, Stat, StationLeaders, StationPair};
