//! Result types returned by the aggregations.

use serde::Serialize;

/// Outcome of an aggregation that may have nothing to report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Stat<T> {
    Value(T),
    /// The field exists but no trip survived the filter.
    NoData,
    /// The dataset does not carry the field at all.
    NotApplicable,
}

impl<T> Stat<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Stat::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Stat::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Stat::NoData)
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Stat::NotApplicable)
    }
}

impl<T> From<Option<T>> for Stat<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Stat::NoData, Stat::Value)
    }
}

/// Total and average elapsed time of the filtered trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSummary {
    pub trips: usize,
    pub total_seconds: f64,
    pub average_seconds: f64,
    /// `total_seconds` rendered as an elapsed-time span.
    pub total: String,
    /// `average_seconds` rendered as an elapsed-time span.
    pub average: String,
}

/// Most used start station and most used end station, counted independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationLeaders {
    pub start_station: String,
    pub end_station: String,
}

/// A directed start → end station trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationPair {
    pub start_station: String,
    pub end_station: String,
}

/// Extremes and mode of the reported birth years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
}
