//! Who rides: rider types, gender and birth years.

use indexmap::IndexMap;

use crate::analyzers::types::{BirthYearStats, Stat};
use crate::analyzers::utility::Tally;
use crate::filter::TimeFilter;
use crate::trip::{Dataset, TripRecord};

/// Label used for riders who left gender blank.
pub const UNKNOWN_GENDER: &str = "Unknown";

/// Number of filtered trips per rider type, in order of first appearance.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn user_types(trips: &[TripRecord], filter: TimeFilter) -> IndexMap<String, usize> {
    filter
        .apply(trips)
        .map(|t| t.user_type.clone())
        .collect::<Tally<_>>()
        .into_counts()
}

/// Number of filtered trips per gender.
///
/// [`Stat::NotApplicable`] when the dataset has no gender column,
/// [`Stat::NoData`] when it has one but no trip matches the filter.
#[tracing::instrument(skip(dataset), fields(trips = dataset.len()))]
pub fn gender_counts(dataset: &Dataset, filter: TimeFilter) -> Stat<IndexMap<String, usize>> {
    if !dataset.schema.has_gender {
        return Stat::NotApplicable;
    }

    let tally: Tally<String> = filter
        .apply(&dataset.trips)
        .map(|t| match t.gender.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => UNKNOWN_GENDER.to_string(),
        })
        .collect();

    if tally.is_empty() {
        Stat::NoData
    } else {
        Stat::Value(tally.into_counts())
    }
}

/// Earliest, latest and most common reported birth year among filtered trips.
///
/// Trips without a birth year are skipped. Ties for most common go to the year
/// seen first.
#[tracing::instrument(skip(dataset), fields(trips = dataset.len()))]
pub fn birth_years(dataset: &Dataset, filter: TimeFilter) -> Stat<BirthYearStats> {
    if !dataset.schema.has_birth_year {
        return Stat::NotApplicable;
    }

    let years: Tally<i32> = filter
        .apply(&dataset.trips)
        .filter_map(TripRecord::known_birth_year)
        .collect();

    let (Some(earliest), Some(latest)) = (years.keys().min(), years.keys().max()) else {
        return Stat::NoData;
    };
    let (earliest, latest) = (*earliest, *latest);

    years
        .into_leader()
        .map(|most_common| BirthYearStats {
            earliest,
            latest,
            most_common,
        })
        .into()
}
