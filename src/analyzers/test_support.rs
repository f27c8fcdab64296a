//! Trip builders shared by the aggregation unit tests.

use chrono::NaiveDateTime;

use crate::trip::TripRecord;

fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn trip_between(start: &str, end: &str) -> TripRecord {
    let start_time = ts(start);
    let end_time = ts(end);
    TripRecord {
        trip_id: None,
        start_time,
        end_time,
        duration_seconds: (end_time - start_time).num_seconds() as f64,
        start_station: "Canal St & Madison St".to_string(),
        end_station: "Clinton St & Washington Blvd".to_string(),
        user_type: "Subscriber".to_string(),
        gender: None,
        birth_year: None,
    }
}

pub fn trip_at(start: &str) -> TripRecord {
    let mut trip = trip_between(start, start);
    trip.end_time += chrono::Duration::minutes(10);
    trip.duration_seconds = 600.0;
    trip
}

pub fn trip_from_to(start: &str, from: &str, to: &str) -> TripRecord {
    TripRecord {
        start_station: from.to_string(),
        end_station: to.to_string(),
        ..trip_at(start)
    }
}

pub fn rider(
    start: &str,
    user_type: &str,
    gender: Option<&str>,
    birth_year: Option<i32>,
) -> TripRecord {
    TripRecord {
        user_type: user_type.to_string(),
        gender: gender.map(str::to_string),
        birth_year,
        ..trip_at(start)
    }
}
