//! CSV loader for trip exports.
//!
//! Reads the bikeshare CSV layout (`Start Time`, `End Time`, `Trip Duration`,
//! `Start Station`, `End Station`, `User Type`, and optionally `Gender` and
//! `Birth Year`) into a [`Dataset`]. Files ending in `.gz` are decompressed
//! on the fly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::trip::{Dataset, Schema, TripRecord};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The unnamed leading column holding the exporter's row id.
pub const INDEX_COLUMN: &str = "";
pub const GENDER_COLUMN: &str = "Gender";
pub const BIRTH_YEAR_COLUMN: &str = "Birth Year";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "", default)]
    trip_id: Option<String>,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

impl RawTrip {
    fn into_trip(self, line: u64, schema: Schema) -> Result<TripRecord, IngestError> {
        let duration_seconds =
            self.trip_duration
                .parse::<f64>()
                .map_err(|_| IngestError::Number {
                    line,
                    column: "Trip Duration",
                    value: self.trip_duration.clone(),
                })?;

        let gender = schema.has_gender.then(|| self.gender.unwrap_or_default());

        let birth_year = match self.birth_year.filter(|y| !y.is_empty()) {
            Some(value) => Some(parse_year(&value, line)?),
            None => None,
        };

        Ok(TripRecord {
            trip_id: self.trip_id,
            start_time: parse_timestamp(&self.start_time, "Start Time", line)?,
            end_time: parse_timestamp(&self.end_time, "End Time", line)?,
            duration_seconds,
            start_station: self.start_station,
            end_station: self.end_station,
            user_type: self.user_type.unwrap_or_default(),
            gender,
            birth_year,
        })
    }
}

fn parse_timestamp(
    value: &str,
    column: &'static str,
    line: u64,
) -> Result<NaiveDateTime, IngestError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| IngestError::Timestamp {
        line,
        column,
        value: value.to_string(),
    })
}

/// Birth years are exported as floats (`1989.0`) by some systems.
fn parse_year(value: &str, line: u64) -> Result<i32, IngestError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite())
        .map(|y| y.trunc() as i32)
        .ok_or_else(|| IngestError::Number {
            line,
            column: "Birth Year",
            value: value.to_string(),
        })
}

/// Parses trip CSV data from any reader.
///
/// The [`Schema`] is taken from the header row, so a dataset either has a
/// gender/birth-year value for every trip or for none.
///
/// # Errors
///
/// Returns an error if a required column is missing or a row holds a
/// malformed timestamp or number.
pub fn parse_trips<R: Read>(reader: R) -> Result<Dataset, IngestError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|&c| !has_column(c)) {
        return Err(IngestError::MissingColumn(missing));
    }

    let schema = Schema {
        has_gender: has_column(GENDER_COLUMN),
        has_birth_year: has_column(BIRTH_YEAR_COLUMN),
    };
    debug!(?schema, columns = headers.len(), "CSV header read");

    let mut trips = Vec::new();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());
        let raw: RawTrip = record.deserialize(Some(&headers))?;
        trips.push(raw.into_trip(line, schema)?);
    }

    Ok(Dataset::new(trips, schema))
}

/// Loads a trip CSV from disk, decompressing it when the name ends in `.gz`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset, IngestError> {
    let file = BufReader::new(File::open(path)?);

    let dataset = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        parse_trips(GzDecoder::new(file))?
    } else {
        parse_trips(file)?
    };

    info!(
        trips = dataset.len(),
        has_gender = dataset.schema.has_gender,
        has_birth_year = dataset.schema.has_birth_year,
        "Trips loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::riders::{UNKNOWN_GENDER, gender_counts};
    use crate::filter::TimeFilter;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,,
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer, Female, 1981
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_parse_full_schema() {
        let dataset = parse_trips(CHICAGO.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.schema, Schema::full());

        let first = &dataset.trips[0];
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.duration_seconds, 321.0);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.elapsed_seconds(), 321.0);
    }

    #[test]
    fn test_blank_demographics() {
        let dataset = parse_trips(CHICAGO.as_bytes()).unwrap();

        let blank = &dataset.trips[1];
        assert_eq!(blank.trip_id.as_deref(), Some("955915"));
        assert_eq!(blank.gender.as_deref(), Some(""));
        assert_eq!(blank.birth_year, None);

        let genders = gender_counts(&dataset, TimeFilter::All).into_value().unwrap();
        assert_eq!(genders[UNKNOWN_GENDER], 1);

        let padded = &dataset.trips[2];
        assert_eq!(padded.gender.as_deref(), Some("Female"));
        assert_eq!(padded.birth_year, Some(1981));
    }

    #[test]
    fn test_parse_without_demographic_columns() {
        let dataset = parse_trips(WASHINGTON.as_bytes()).unwrap();

        assert_eq!(dataset.schema, Schema::default());
        assert_eq!(dataset.trips[0].gender, None);
        assert_eq!(dataset.trips[0].duration_seconds, 489.066);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Start Time,End Time\n2017-01-01 00:00:00,2017-01-01 00:01:00\n";
        let err = parse_trips(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("Trip Duration")));
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:00:00,2017-01-01 00:01:00,60,A,B,Subscriber
yesterday,2017-01-01 00:01:00,60,A,B,Subscriber
";
        let err = parse_trips(csv.as_bytes()).unwrap_err();
        match err {
            IngestError::Timestamp { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Start Time");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_duration() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:00:00,2017-01-01 00:01:00,abc,A,B,Subscriber
";
        assert!(matches!(
            parse_trips(csv.as_bytes()),
            Err(IngestError::Number { column: "Trip Duration", .. })
        ));
    }

    #[test]
    fn test_load_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("washington.csv.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(WASHINGTON.as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.trips[0].end_station, "15th & K St NW");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
