//! When trips start: most popular month, weekday and hour.

use chrono::{Datelike, Timelike, Weekday};

use crate::analyzers::utility::first_max_index;
use crate::error::FilterError;
use crate::filter::{TimeFilter, TripMonth};
use crate::trip::TripRecord;

/// Weekdays in Monday-first order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Month in which the most trips start, over the whole dataset.
///
/// Trips outside January..June are not counted. Ties go to the earlier month.
///
/// # Errors
///
/// Only meaningful without a time restriction; any other filter is rejected
/// with [`FilterError::Unsupported`].
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn popular_month(trips: &[TripRecord], filter: TimeFilter) -> Result<TripMonth, FilterError> {
    if filter != TimeFilter::All {
        return Err(unsupported("popular month", filter));
    }

    let mut counts = [0usize; TripMonth::ALL.len()];
    for trip in trips {
        if let Some(month) = TripMonth::from_number(trip.start_time.month()) {
            counts[month as usize] += 1;
        }
    }

    Ok(TripMonth::ALL[first_max_index(&counts)])
}

/// Weekday on which the most filtered trips start. Ties go to the day closest to Monday.
///
/// # Errors
///
/// A date filter pins a single weekday, so [`TimeFilter::ByDate`] is rejected.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn popular_weekday(trips: &[TripRecord], filter: TimeFilter) -> Result<Weekday, FilterError> {
    if matches!(filter, TimeFilter::ByDate(_)) {
        return Err(unsupported("popular weekday", filter));
    }

    let mut counts = [0usize; 7];
    for trip in filter.apply(trips) {
        counts[trip.start_time.weekday().num_days_from_monday() as usize] += 1;
    }

    Ok(WEEKDAYS[first_max_index(&counts)])
}

/// Hour of day (0-23) in which the most filtered trips start. Ties go to the earlier hour.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn popular_hour(trips: &[TripRecord], filter: TimeFilter) -> u32 {
    let mut counts = [0usize; 24];
    for trip in filter.apply(trips) {
        counts[trip.start_time.hour() as usize] += 1;
    }

    first_max_index(&counts) as u32
}

fn unsupported(statistic: &'static str, filter: TimeFilter) -> FilterError {
    FilterError::Unsupported {
        statistic,
        filter: filter.to_string(),
    }
}
