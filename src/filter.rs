//! Time scoping for trip statistics.
//!
//! A [`TimeFilter`] is built once per statistics run and handed unchanged to
//! every aggregation, which applies [`TimeFilter::includes`] to each trip
//! during its own scan.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::FilterError;
use crate::trip::TripRecord;

/// Year that day-of-month selections are validated against and anchored to.
pub const REFERENCE_YEAR: i32 = 2017;

/// The six calendar months covered by the trip datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TripMonth {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl TripMonth {
    /// Every supported month in calendar order.
    pub const ALL: [TripMonth; 6] = [
        TripMonth::January,
        TripMonth::February,
        TripMonth::March,
        TripMonth::April,
        TripMonth::May,
        TripMonth::June,
    ];

    /// Calendar month number, January = 1.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            TripMonth::January => "January",
            TripMonth::February => "February",
            TripMonth::March => "March",
            TripMonth::April => "April",
            TripMonth::May => "May",
            TripMonth::June => "June",
        }
    }
}

impl fmt::Display for TripMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TripMonth {
    type Err = FilterError;

    /// Accepts full month names or three-letter abbreviations, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TripMonth::ALL
            .into_iter()
            .find(|m| {
                let name = m.name().to_ascii_lowercase();
                wanted == name || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| FilterError::UnsupportedMonth(s.to_string()))
    }
}

/// Which trips participate in an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TimeFilter {
    #[default]
    All,
    /// Trips starting in this month of any year.
    ByMonth(TripMonth),
    /// Trips starting on exactly this date.
    ByDate(NaiveDate),
}

impl TimeFilter {
    pub fn by_month(month: TripMonth) -> Self {
        TimeFilter::ByMonth(month)
    }

    /// Builds a date filter for `day` of `month` in [`REFERENCE_YEAR`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDay`] when the day does not exist in that
    /// month of the reference year.
    pub fn by_date(month: TripMonth, day: u32) -> Result<Self, FilterError> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month.number(), day)
            .map(TimeFilter::ByDate)
            .ok_or(FilterError::InvalidDay {
                day,
                month: month.name(),
                year: REFERENCE_YEAR,
            })
    }

    /// Month the filter is scoped to, if any.
    pub fn month(&self) -> Option<TripMonth> {
        match self {
            TimeFilter::All => None,
            TimeFilter::ByMonth(m) => Some(*m),
            TimeFilter::ByDate(d) => TripMonth::from_number(d.month()),
        }
    }

    pub fn matches(&self, start_time: NaiveDateTime) -> bool {
        match self {
            TimeFilter::All => true,
            TimeFilter::ByMonth(m) => start_time.month() == m.number(),
            TimeFilter::ByDate(d) => start_time.date() == *d,
        }
    }

    pub fn includes(&self, trip: &TripRecord) -> bool {
        self.matches(trip.start_time)
    }

    /// Iterates over the trips this filter admits, in input order.
    pub fn apply(self, trips: &[TripRecord]) -> impl Iterator<Item = &TripRecord> {
        trips.iter().filter(move |t| self.includes(t))
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::All => f.write_str("none"),
            TimeFilter::ByMonth(m) => write!(f, "month={m}"),
            TimeFilter::ByDate(d) => write!(f, "date={}", d.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_month_parsing_accepts_names_and_abbreviations() {
        assert_eq!("March".parse::<TripMonth>(), Ok(TripMonth::March));
        assert_eq!("june".parse::<TripMonth>(), Ok(TripMonth::June));
        assert_eq!(" feb ".parse::<TripMonth>(), Ok(TripMonth::February));
    }

    #[test]
    fn test_month_parsing_rejects_second_half_of_year() {
        assert!(matches!(
            "July".parse::<TripMonth>(),
            Err(FilterError::UnsupportedMonth(_))
        ));
        assert!("Ju".parse::<TripMonth>().is_err());
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(TripMonth::January.number(), 1);
        assert_eq!(TripMonth::June.number(), 6);
        assert_eq!(TripMonth::from_number(4), Some(TripMonth::April));
        assert_eq!(TripMonth::from_number(0), None);
        assert_eq!(TripMonth::from_number(7), None);
    }

    #[test]
    fn test_by_date_validates_against_reference_year() {
        assert!(TimeFilter::by_date(TripMonth::February, 28).is_ok());
        assert_eq!(
            TimeFilter::by_date(TripMonth::February, 29),
            Err(FilterError::InvalidDay {
                day: 29,
                month: "February",
                year: 2017
            })
        );
        assert!(TimeFilter::by_date(TripMonth::April, 31).is_err());
        assert!(TimeFilter::by_date(TripMonth::May, 0).is_err());
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(TimeFilter::All.matches(at(2017, 1, 1, 0)));
        assert!(TimeFilter::All.matches(at(1999, 12, 31, 23)));
    }

    #[test]
    fn test_by_month_ignores_year() {
        let filter = TimeFilter::by_month(TripMonth::March);
        assert!(filter.matches(at(2017, 3, 5, 9)));
        assert!(filter.matches(at(2018, 3, 31, 23)));
        assert!(!filter.matches(at(2017, 4, 1, 0)));
    }

    #[test]
    fn test_by_date_matches_exact_date_only() {
        let filter = TimeFilter::by_date(TripMonth::January, 15).unwrap();
        assert!(filter.matches(at(2017, 1, 15, 0)));
        assert!(filter.matches(at(2017, 1, 15, 23)));
        assert!(!filter.matches(at(2017, 1, 16, 0)));
        assert!(!filter.matches(at(2018, 1, 15, 12)));
    }

    #[test]
    fn test_filter_month() {
        assert_eq!(TimeFilter::All.month(), None);
        assert_eq!(
            TimeFilter::by_date(TripMonth::May, 2).unwrap().month(),
            Some(TripMonth::May)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeFilter::All.to_string(), "none");
        assert_eq!(
            TimeFilter::by_month(TripMonth::June).to_string(),
            "month=June"
        );
        assert_eq!(
            TimeFilter::by_date(TripMonth::June, 3).unwrap().to_string(),
            "date=2017-06-03"
        );
    }
}
