//! Trip records and the dataset they are loaded into.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Birth year marking a rider who did not report one.
pub const NO_BIRTH_YEAR: i32 = 0;

/// One trip observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// Row id from the export's unnamed index column, when it has one.
    pub trip_id: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: String,
    /// `None` when the source has no gender column; blank cells stay empty.
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    /// Elapsed seconds between the start and end timestamps. Negative when the
    /// source data has them out of order.
    pub fn elapsed_seconds(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }

    /// Birth year, or `None` for a missing value or the [`NO_BIRTH_YEAR`] sentinel.
    pub fn known_birth_year(&self) -> Option<i32> {
        self.birth_year.filter(|y| *y != NO_BIRTH_YEAR)
    }
}

/// Which optional demographic columns a dataset carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    pub fn full() -> Self {
        Schema {
            has_gender: true,
            has_birth_year: true,
        }
    }
}

/// Trips in source order, together with the columns their source exposed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub trips: Vec<TripRecord>,
    pub schema: Schema,
}

impl Dataset {
    pub fn new(trips: Vec<TripRecord>, schema: Schema) -> Self {
        Self { trips, schema }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
