use crate::analyzers::types::{DurationSummary, Stat};
use crate::analyzers::utility::format_elapsed;
use crate::filter::TimeFilter;
use crate::trip::TripRecord;

/// Total and average trip time of the filtered trips.
///
/// Time is measured from the start and end timestamps rather than the stored
/// duration column. Returns [`Stat::NoData`] when no trip matches.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn trip_duration(trips: &[TripRecord], filter: TimeFilter) -> Stat<DurationSummary> {
    let mut total_seconds = 0.0;
    let mut count = 0usize;

    for trip in filter.apply(trips) {
        total_seconds += trip.elapsed_seconds();
        count += 1;
    }

    if count == 0 {
        return Stat::NoData;
    }

    let average_seconds = total_seconds / count as f64;
    Stat::Value(DurationSummary {
        trips: count,
        total_seconds,
        average_seconds,
        total: format_elapsed(total_seconds),
        average: format_elapsed(average_seconds),
    })
}
