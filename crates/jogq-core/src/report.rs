//! Weekly distance and speed averages over jog records.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::record::{Record, Value};

/// Errors that can occur while building a weekly report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The jogs in the week add up to zero time, so no speed exists.
    #[error("cannot calculate average speed: total time for the week is zero")]
    ZeroTime,

    /// A record is missing a usable `date`, `distance` or `time`.
    #[error("record at index {index} cannot be used in a report: {reason}")]
    InvalidRecord {
        /// Position of the record in the input.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The week containing the date runs past the supported calendar range.
    #[error("the week containing {date} is outside the supported date range")]
    DateOutOfRange {
        /// The requested date.
        date: NaiveDate,
    },
}

impl ReportError {
    fn invalid(index: usize, reason: impl Into<String>) -> Self {
        ReportError::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }
}

/// Averages for the Monday to Sunday week containing a given date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub start_of_week: NaiveDate,
    pub end_of_week: NaiveDate,
    /// Total distance divided by total time.
    pub average_speed: f64,
    /// Total distance divided by the number of jogs.
    pub average_distance: f64,
}

impl WeeklyReport {
    /// Builds the report for the week containing `date`.
    ///
    /// Only records whose `date` falls within the week (inclusive) count.
    /// A week without jogs reports zero for both averages.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRecord` if a record has no readable
    /// `date`, or if a record in the week has a non-numeric `distance` or
    /// `time`. Returns `ReportError::ZeroTime` if the week's jogs have a
    /// total time of zero, and `ReportError::DateOutOfRange` if the week
    /// reaches past the first or last representable day.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use jogq_core::{Record, WeeklyReport};
    ///
    /// let jogs = vec![
    ///     Record::new().with("date", "2016-05-02").with("distance", 10).with("time", 1),
    ///     Record::new().with("date", "2016-05-05").with("distance", 20).with("time", 1),
    /// ];
    /// let date = NaiveDate::from_ymd_opt(2016, 5, 4).unwrap();
    /// let report = WeeklyReport::for_date(date, &jogs).unwrap();
    /// assert_eq!(report.average_speed, 15.0);
    /// ```
    pub fn for_date(date: NaiveDate, records: &[Record]) -> Result<Self, ReportError> {
        let out_of_range = || ReportError::DateOutOfRange { date };
        let start_of_week = date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .ok_or_else(out_of_range)?;
        let end_of_week = start_of_week
            .checked_add_days(Days::new(6))
            .ok_or_else(out_of_range)?;

        let mut count = 0usize;
        let mut total_distance = 0.0;
        let mut total_time = 0.0;

        for (index, record) in records.iter().enumerate() {
            let day = record_date(index, record)?;
            if day < start_of_week || day > end_of_week {
                continue;
            }
            total_distance += numeric_field(index, record, "distance")?;
            total_time += numeric_field(index, record, "time")?;
            count += 1;
        }

        tracing::debug!(
            %start_of_week,
            %end_of_week,
            jogs = count,
            total_distance,
            total_time,
            "weekly totals"
        );

        if count == 0 {
            return Ok(Self {
                start_of_week,
                end_of_week,
                average_speed: 0.0,
                average_distance: 0.0,
            });
        }
        if total_time == 0.0 {
            return Err(ReportError::ZeroTime);
        }

        Ok(Self {
            start_of_week,
            end_of_week,
            average_speed: round2(total_distance / total_time),
            average_distance: round2(total_distance / count as f64),
        })
    }
}

fn record_date(index: usize, record: &Record) -> Result<NaiveDate, ReportError> {
    match record.get("date") {
        Some(Value::Timestamp(ts)) => Ok(ts.date_naive()),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| ReportError::invalid(index, format!("'{s}' is not a YYYY-MM-DD date"))),
        Some(other) => Err(ReportError::invalid(
            index,
            format!("date is a {}", other.type_name()),
        )),
        None => Err(ReportError::invalid(index, "missing field 'date'")),
    }
}

/// Reads a number, accepting numeric text as serialized for decimal columns.
fn numeric_field(index: usize, record: &Record, field: &str) -> Result<f64, ReportError> {
    let value = record
        .get(field)
        .ok_or_else(|| ReportError::invalid(index, format!("missing field '{field}'")))?;
    let parsed = value.as_f64().or_else(|| {
        value
            .as_str()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    });
    parsed.ok_or_else(|| ReportError::invalid(index, format!("field '{field}' is not numeric")))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
