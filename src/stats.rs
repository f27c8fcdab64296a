use chrono::{DateTime, Utc, Weekday};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::analyzers::time_of_day::weekday_name;
use crate::analyzers::{
    BirthYearStats, DurationSummary, Stat, StationLeaders, StationPair, birth_years,
    gender_counts, popular_hour, popular_month, popular_stations, popular_trip, popular_weekday,
    trip_duration, user_types,
};
use crate::filter::{TimeFilter, TripMonth};
use crate::trip::Dataset;

/// Every statistic for one dataset under one [`TimeFilter`].
///
/// Statistics the filter cannot scope are left as `None`: the popular month
/// is only computed without a filter, the popular weekday without a date filter.
#[derive(Debug, Clone, Serialize)]
pub struct TripStats {
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub filter: TimeFilter,
    pub total_trips: usize,
    pub matching_trips: usize,

    // when
    pub popular_month: Option<TripMonth>,
    #[serde(serialize_with = "serialize_weekday")]
    pub popular_weekday: Option<Weekday>,
    pub popular_hour: u32,

    // how long, where
    pub duration: Stat<DurationSummary>,
    pub stations: Stat<StationLeaders>,
    pub trip: Stat<StationPair>,

    // who
    pub user_types: IndexMap<String, usize>,
    pub genders: Stat<IndexMap<String, usize>>,
    pub birth_years: Stat<BirthYearStats>,
}

impl TripStats {
    #[tracing::instrument(skip(dataset, filter), fields(trips = dataset.len(), filter = %filter))]
    pub fn from_dataset(dataset: &Dataset, filter: TimeFilter) -> Self {
        let trips = dataset.trips.as_slice();

        let stats = TripStats {
            generated_at: Utc::now(),
            source: None,
            filter,
            total_trips: trips.len(),
            matching_trips: filter.apply(trips).count(),
            popular_month: popular_month(trips, filter).ok(),
            popular_weekday: popular_weekday(trips, filter).ok(),
            popular_hour: popular_hour(trips, filter),
            duration: trip_duration(trips, filter),
            stations: popular_stations(trips, filter),
            trip: popular_trip(trips, filter),
            user_types: user_types(trips, filter),
            genders: gender_counts(dataset, filter),
            birth_years: birth_years(dataset, filter),
        };

        tracing::debug!(matching = stats.matching_trips, "Statistics computed");
        stats
    }

    /// Set the name of the dataset the statistics describe
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}

fn serialize_weekday<S: Serializer>(day: &Option<Weekday>, serializer: S) -> Result<S::Ok, S::Error> {
    match day {
        Some(d) => serializer.serialize_some(weekday_name(*d)),
        None => serializer.serialize_none(),
    }
}
