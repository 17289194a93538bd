//! File-date resolution.
//!
//! Teardown lines carry a year-less syslog timestamp, so every record is
//! attributed to the calendar date embedded in its file's name instead
//! (e.g. `gw-11_2016-10-10.log.gz`). A file whose name carries no usable
//! date is rejected; the run continues with the remaining files.

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{ConnstatsError, Result};

// ── FileDateResolver ──────────────────────────────────────────────────────────

/// Extracts the `YYYY-MM-DD` date embedded in a log file's name.
pub struct FileDateResolver {
    pattern: Regex,
}

impl Default for FileDateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDateResolver {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("file date pattern must compile"),
        }
    }

    /// Resolve the calendar date to attribute to all records of `path`.
    ///
    /// The first `YYYY-MM-DD` occurrence anywhere in the file name wins.
    /// A name without one, or with an impossible date such as
    /// `2021-13-40`, is a [`ConnstatsError::FileDate`].
    pub fn resolve(&self, path: &Path) -> Result<NaiveDate> {
        let name = path.to_string_lossy();

        let date = self.pattern.captures(&name).and_then(|caps| {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        });

        date.ok_or_else(|| ConnstatsError::FileDate(path.to_path_buf()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolve(name: &str) -> Result<NaiveDate> {
        FileDateResolver::new().resolve(&PathBuf::from(name))
    }

    #[test]
    fn test_resolves_date_in_file_name() {
        let date = resolve("/logs/gw-11_2016-10-10.log").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2016, 10, 10).unwrap());
    }

    #[test]
    fn test_resolves_date_in_gz_file_name() {
        let date = resolve("de-mbh-mucall-gw-11_2016-10-10.gz").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2016, 10, 10).unwrap());
    }

    #[test]
    fn test_first_date_occurrence_wins() {
        let date = resolve("backup-2021-01-05/host_2021-02-06.log").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 1, 5).unwrap());
    }

    #[test]
    fn test_missing_date_is_an_error() {
        let err = resolve("/logs/teardown.log").unwrap_err();
        assert!(matches!(err, ConnstatsError::FileDate(_)));
        assert!(err.to_string().contains("teardown.log"));
    }

    #[test]
    fn test_impossible_date_is_an_error() {
        let err = resolve("host_2021-13-40.log").unwrap_err();
        assert!(matches!(err, ConnstatsError::FileDate(_)));
    }

    #[test]
    fn test_leap_day_resolves() {
        let date = resolve("host_2020-02-29.log").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    }
}
