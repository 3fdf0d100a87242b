use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UptimeError;

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

/// How an uptime requirement repeats: weekly (ISO weekday 1-7), monthly
/// (day-of-month 1-31) or on one exact calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Recurrence {
    #[serde(rename = "DOW")]
    DayOfWeek(u8),
    #[serde(rename = "DOM")]
    DayOfMonth(u8),
    #[serde(rename = "DATE")]
    Date(NaiveDate),
}

impl Recurrence {
    /// Parse the textual (type, value) pair of an `add` request.
    ///
    /// `DATE` values are day/month/year with an arbitrary single-character
    /// separator taken from position 2 (e.g. `13.02.26` or `13/02/2026`);
    /// two-digit years expand to 20YY.
    pub fn parse(rtype: &str, value: &str) -> Result<Self, UptimeError> {
        match rtype.to_ascii_uppercase().as_str() {
            "DOW" => match value.parse::<u8>() {
                Ok(v @ 1..=7) => Ok(Recurrence::DayOfWeek(v)),
                _ => Err(invalid_value("DOW", value)),
            },
            "DOM" => match value.parse::<u8>() {
                Ok(v @ 1..=31) => Ok(Recurrence::DayOfMonth(v)),
                _ => Err(invalid_value("DOM", value)),
            },
            "DATE" => parse_dmy(value).map(Recurrence::Date),
            other => Err(UptimeError::UnknownRecurrenceType(other.to_string())),
        }
    }

    /// Reconstruct from the stored (type, value) columns.
    /// Stored dates are ISO `YYYY-MM-DD`.
    pub fn from_stored(rtype: &str, value: &str) -> Result<Self, UptimeError> {
        match rtype {
            "DATE" => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Recurrence::Date)
                .map_err(|_| UptimeError::InvalidDate(value.to_string())),
            _ => Recurrence::parse(rtype, value),
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Recurrence::DayOfWeek(_) => "DOW",
            Recurrence::DayOfMonth(_) => "DOM",
            Recurrence::Date(_) => "DATE",
        }
    }

    /// The stored value column: the number, or the ISO date.
    pub fn value_str(&self) -> String {
        match self {
            Recurrence::DayOfWeek(v) | Recurrence::DayOfMonth(v) => v.to_string(),
            Recurrence::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// The recurrence value of the following day, used for the second
    /// boundary pair of an interval that crosses midnight.
    pub fn successor(&self) -> Recurrence {
        match self {
            Recurrence::DayOfWeek(v) => Recurrence::DayOfWeek(v % 7 + 1),
            Recurrence::DayOfMonth(v) => Recurrence::DayOfMonth(v % 31 + 1),
            Recurrence::Date(d) => Recurrence::Date(d.succ_opt().unwrap_or(*d)),
        }
    }

    /// Does this recurrence fire on `date`?
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Recurrence::DayOfWeek(v) => u32::from(*v) == date.weekday().number_from_monday(),
            Recurrence::DayOfMonth(v) => u32::from(*v) == date.day(),
            Recurrence::Date(d) => *d == date,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_str(), self.value_str())
    }
}

fn invalid_value(rtype: &str, value: &str) -> UptimeError {
    UptimeError::InvalidRecurrenceValue {
        rtype: rtype.to_string(),
        value: value.to_string(),
    }
}

/// Parse a day/month/year date with an arbitrary single-character separator
/// taken from position 2; two-digit years expand to 20YY.
pub fn parse_dmy(value: &str) -> Result<NaiveDate, UptimeError> {
    let sep = value
        .chars()
        .nth(2)
        .ok_or_else(|| UptimeError::InvalidDate(value.to_string()))?;
    let parts: Vec<&str> = value.split(sep).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(UptimeError::InvalidDate(value.to_string()));
    };
    let year = if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    };
    let (d, m, y) = match (day.parse(), month.parse(), year.parse()) {
        (Ok(d), Ok(m), Ok(y)) => (d, m, y),
        _ => return Err(UptimeError::InvalidDate(value.to_string())),
    };
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| UptimeError::InvalidDate(value.to_string()))
}

/// English name for an ISO weekday number (1 = Monday).
pub fn weekday_name(dow: u8) -> &'static str {
    match dow {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "?",
    }
}

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// One edge of an uptime window: demand rises at the start, falls at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Rise,
    Fall,
}

impl EdgeKind {
    /// Storage encoding: 1 = rise (up), 0 = fall (down). Falls sort before
    /// rises at equal times so that back-to-back windows read correctly.
    pub fn state(self) -> i64 {
        match self {
            EdgeKind::Rise => 1,
            EdgeKind::Fall => 0,
        }
    }

    pub fn from_state(state: i64) -> EdgeKind {
        if state == 0 {
            EdgeKind::Fall
        } else {
            EdgeKind::Rise
        }
    }
}

// ---------------------------------------------------------------------------
// BoundaryRecord
// ---------------------------------------------------------------------------

/// One stored edge of a registered uptime request. A request decomposes into
/// one rise/fall pair, or two pairs when it crosses midnight; all records of
/// one request share `group_id` and are replaced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub owner: String,
    pub label: String,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    pub kind: EdgeKind,
    pub time: NaiveTime,
    pub group_id: i64,
}

// ---------------------------------------------------------------------------
// TransitionEvent
// ---------------------------------------------------------------------------

/// A moment the aggregate demand count crosses to or from zero.
/// `demand == 0` means the machine may halt here; `demand >= 1` means it
/// must be up from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub demand: u32,
}

impl TransitionEvent {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn is_halt(&self) -> bool {
        self.demand == 0
    }

    pub fn is_boot(&self) -> bool {
        self.demand >= 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
