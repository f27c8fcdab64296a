//! Cities with published trip exports and where to find them on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    #[value(alias = "nyc", alias = "new-york")]
    NewYorkCity,
    Washington,
}

impl City {
    /// File name of the export without extension, e.g. `new_york_city`.
    pub fn file_stem(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new_york_city",
            City::Washington => "washington",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// Candidate paths inside `data_dir`, plain CSV before gzip.
    pub fn candidates(self, data_dir: &Path) -> [PathBuf; 2] {
        let stem = self.file_stem();
        [
            data_dir.join(format!("{stem}.csv")),
            data_dir.join(format!("{stem}.csv.gz")),
        ]
    }

    /// First existing export for this city in `data_dir`.
    pub fn resolve(self, data_dir: &Path) -> Option<PathBuf> {
        self.candidates(data_dir).into_iter().find(|p| p.is_file())
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_stems() {
        assert_eq!(City::Chicago.file_stem(), "chicago");
        assert_eq!(City::NewYorkCity.file_stem(), "new_york_city");
        assert_eq!(City::Washington.file_stem(), "washington");
    }

    #[test]
    fn test_value_enum_names_and_aliases() {
        assert_eq!(City::from_str("chicago", true), Ok(City::Chicago));
        assert_eq!(City::from_str("new-york-city", true), Ok(City::NewYorkCity));
        assert_eq!(City::from_str("NYC", true), Ok(City::NewYorkCity));
        assert!(City::from_str("boston", true).is_err());
    }

    #[test]
    fn test_resolve_prefers_plain_csv() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(City::Chicago.resolve(dir.path()), None);

        fs::write(dir.path().join("chicago.csv.gz"), b"").unwrap();
        assert_eq!(
            City::Chicago.resolve(dir.path()),
            Some(dir.path().join("chicago.csv.gz"))
        );

        fs::write(dir.path().join("chicago.csv"), b"").unwrap();
        assert_eq!(
            City::Chicago.resolve(dir.path()),
            Some(dir.path().join("chicago.csv"))
        );
    }
}
