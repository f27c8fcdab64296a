//! Station popularity.
//!
//! Both aggregations resolve ties in favour of whichever station (or pair)
//! first appears in the input, not lexical order.

use crate::analyzers::types::{Stat, StationLeaders, StationPair};
use crate::analyzers::utility::Tally;
use crate::filter::TimeFilter;
use crate::trip::TripRecord;

/// Most used start station and most used end station among filtered trips.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn popular_stations(trips: &[TripRecord], filter: TimeFilter) -> Stat<StationLeaders> {
    let mut starts: Tally<&str> = Tally::new();
    let mut ends: Tally<&str> = Tally::new();

    for trip in filter.apply(trips) {
        starts.add(&trip.start_station);
        ends.add(&trip.end_station);
    }

    match (starts.into_leader(), ends.into_leader()) {
        (Some(start), Some(end)) => Stat::Value(StationLeaders {
            start_station: start.to_string(),
            end_station: end.to_string(),
        }),
        _ => Stat::NoData,
    }
}

/// Most frequent directed start → end pair among filtered trips.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn popular_trip(trips: &[TripRecord], filter: TimeFilter) -> Stat<StationPair> {
    let pairs: Tally<(&str, &str)> = filter
        .apply(trips)
        .map(|t| (t.start_station.as_str(), t.end_station.as_str()))
        .collect();

    pairs
        .into_leader()
        .map(|(start, end)| StationPair {
            start_station: start.to_string(),
            end_station: end.to_string(),
        })
        .into()
}
