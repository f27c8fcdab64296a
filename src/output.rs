//! Output formatting and persistence for trip statistics.
//!
//! Supports a plain-text report, JSON serialization, CSV summary append and
//! paged CSV display of raw trips.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::Stat;
use crate::analyzers::time_of_day::weekday_name;
use crate::filter::TimeFilter;
use crate::parser::{
    BIRTH_YEAR_COLUMN, GENDER_COLUMN, INDEX_COLUMN, REQUIRED_COLUMNS, TIMESTAMP_FORMAT,
};
use crate::stats::TripStats;
use crate::trip::{Schema, TripRecord};

/// Logs statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &TripStats) {
    debug!("{:#?}", stats);
}

/// Writes statistics as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, stats: &TripStats) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, stats)?;
    writeln!(out)?;
    Ok(())
}

/// Renders the human-readable report.
pub fn render_text(stats: &TripStats) -> String {
    let mut lines = Vec::new();

    let scope = match stats.filter {
        TimeFilter::All => "all trips".to_string(),
        TimeFilter::ByMonth(m) => format!("trips in {m}"),
        TimeFilter::ByDate(d) => format!("trips on {}", d.format("%B %-d, %Y")),
    };
    match &stats.source {
        Some(source) => lines.push(format!(
            "{source}: {} of {} {scope}",
            stats.matching_trips, stats.total_trips
        )),
        None => lines.push(format!(
            "{} of {} {scope}",
            stats.matching_trips, stats.total_trips
        )),
    }

    if let Some(month) = stats.popular_month {
        lines.push(format!("Most popular month: {month}"));
    }
    if let Some(day) = stats.popular_weekday {
        lines.push(format!("Most popular day of week: {}", weekday_name(day)));
    }
    lines.push(format!("Most popular hour of day: {}", stats.popular_hour));

    match &stats.duration {
        Stat::Value(d) => {
            lines.push(format!("Average trip duration: {}", d.average));
            lines.push(format!("Total trip duration: {}", d.total));
        }
        _ => lines.push("No trip data found.".to_string()),
    }

    match &stats.stations {
        Stat::Value(s) => {
            lines.push(format!("Most popular start station: \"{}\"", s.start_station));
            lines.push(format!("Most popular end station: \"{}\"", s.end_station));
        }
        _ => lines.push("No station data found.".to_string()),
    }

    match &stats.trip {
        Stat::Value(t) => lines.push(format!(
            "Most popular trip: \"{}\" to \"{}\"",
            t.start_station, t.end_station
        )),
        _ => lines.push("No trip data found.".to_string()),
    }

    for (user_type, count) in &stats.user_types {
        lines.push(format!("{user_type}s: {count}"));
    }

    match &stats.genders {
        Stat::Value(genders) => {
            for (gender, count) in genders {
                lines.push(format!("{gender}s: {count}"));
            }
        }
        Stat::NoData => lines.push("No gender data found.".to_string()),
        Stat::NotApplicable => lines.push("Gender info not in data file.".to_string()),
    }

    match &stats.birth_years {
        Stat::Value(b) => {
            lines.push(format!("Earliest birth year: {}", b.earliest));
            lines.push(format!("Most recent birth year: {}", b.latest));
            lines.push(format!("Most popular birth year: {}", b.most_common));
        }
        Stat::NoData => lines.push("No birth year data found.".to_string()),
        Stat::NotApplicable => lines.push("Birth year info not in data file.".to_string()),
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// One flattened CSV row per statistics run.
#[derive(Debug, Serialize)]
pub struct SummaryRow<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: Option<&'a str>,
    pub filter: String,
    pub total_trips: usize,
    pub matching_trips: usize,
    pub popular_month: Option<&'static str>,
    pub popular_weekday: Option<&'static str>,
    pub popular_hour: u32,
    pub total_duration: Option<&'a str>,
    pub average_duration: Option<&'a str>,
    pub popular_start_station: Option<&'a str>,
    pub popular_end_station: Option<&'a str>,
    pub popular_trip_start: Option<&'a str>,
    pub popular_trip_end: Option<&'a str>,
    pub earliest_birth_year: Option<i32>,
    pub latest_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

impl<'a> From<&'a TripStats> for SummaryRow<'a> {
    fn from(stats: &'a TripStats) -> Self {
        let duration = stats.duration.value();
        let stations = stats.stations.value();
        let trip = stats.trip.value();
        let births = stats.birth_years.value();

        SummaryRow {
            generated_at: stats.generated_at,
            source: stats.source.as_deref(),
            filter: stats.filter.to_string(),
            total_trips: stats.total_trips,
            matching_trips: stats.matching_trips,
            popular_month: stats.popular_month.map(|m| m.name()),
            popular_weekday: stats.popular_weekday.map(weekday_name),
            popular_hour: stats.popular_hour,
            total_duration: duration.map(|d| d.total.as_str()),
            average_duration: duration.map(|d| d.average.as_str()),
            popular_start_station: stations.map(|s| s.start_station.as_str()),
            popular_end_station: stations.map(|s| s.end_station.as_str()),
            popular_trip_start: trip.map(|t| t.start_station.as_str()),
            popular_trip_end: trip.map(|t| t.end_station.as_str()),
            earliest_birth_year: births.map(|b| b.earliest),
            latest_birth_year: births.map(|b| b.latest),
            most_common_birth_year: births.map(|b| b.most_common),
        }
    }
}

/// Appends a [`SummaryRow`] for `stats` to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, stats: &TripStats) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(SummaryRow::from(stats))?;
    writer.flush()?;

    Ok(())
}

/// A slice of the filtered trips for paged display.
#[derive(Debug)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    pub trips: Vec<&'a TripRecord>,
    /// No filtered trips remain after this page.
    pub is_last: bool,
}

/// Selects page `number` (1-based, clamped to at least 1) of `page_size`
/// filtered trips, preserving input order.
pub fn paginate(
    trips: &[TripRecord],
    filter: TimeFilter,
    number: usize,
    page_size: usize,
) -> Page<'_> {
    let number = number.max(1);
    let page_size = page_size.max(1);

    let mut remaining = filter.apply(trips).skip((number - 1) * page_size);
    let page: Vec<_> = remaining.by_ref().take(page_size).collect();
    let is_last = remaining.next().is_none();

    Page {
        number,
        trips: page,
        is_last,
    }
}

/// Writes trips as CSV in their source layout: the export's column names,
/// its timestamp format, and only the demographic columns `schema` carries.
///
/// The output can be loaded again with [`crate::parser::parse_trips`].
pub fn write_records<'a, W, I>(out: W, schema: Schema, trips: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut header = vec![INDEX_COLUMN];
    header.extend(REQUIRED_COLUMNS);
    if schema.has_gender {
        header.push(GENDER_COLUMN);
    }
    if schema.has_birth_year {
        header.push(BIRTH_YEAR_COLUMN);
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(&header)?;
    for trip in trips {
        writer.write_record(source_fields(trip, schema))?;
    }
    writer.flush()?;
    Ok(())
}

fn source_fields(trip: &TripRecord, schema: Schema) -> Vec<String> {
    let mut fields = vec![
        trip.trip_id.clone().unwrap_or_default(),
        trip.start_time.format(TIMESTAMP_FORMAT).to_string(),
        trip.end_time.format(TIMESTAMP_FORMAT).to_string(),
        trip.duration_seconds.to_string(),
        trip.start_station.clone(),
        trip.end_station.clone(),
        trip.user_type.clone(),
    ];
    if schema.has_gender {
        fields.push(trip.gender.clone().unwrap_or_default());
    }
    if schema.has_birth_year {
        fields.push(trip.birth_year.map(|y| y.to_string()).unwrap_or_default());
    }
    fields
}
