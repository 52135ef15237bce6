//! Domain types shared between the API layer and its consumers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The authenticated user as recorded in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

/// A household the current user belongs to.
///
/// Backend records carry more fields (member lists); only the
/// client-relevant ones are decoded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
}

/// How often a task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceUnit {
    Days,
    Weeks,
    Months,
}

impl RecurrenceUnit {
    /// Returns all units for iteration (e.g., in a picker).
    pub fn all() -> &'static [RecurrenceUnit] {
        &[
            RecurrenceUnit::Days,
            RecurrenceUnit::Weeks,
            RecurrenceUnit::Months,
        ]
    }

    /// Returns the wire/display name for this unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceUnit::Days => "Days",
            RecurrenceUnit::Weeks => "Weeks",
            RecurrenceUnit::Months => "Months",
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecurrenceUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Self::Days),
            "week" | "weeks" => Ok(Self::Weeks),
            "month" | "months" => Ok(Self::Months),
            _ => Err(format!("Unknown recurrence unit: {value}")),
        }
    }
}

/// Body for `POST /api/household`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHousehold {
    pub name: String,
}

/// Body for `POST /api/household/{id}/task`.
///
/// The backend expects camelCase field names here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub recurrence_unit: RecurrenceUnit,
    pub recurrence_interval: u16,
}

/// A task record as returned by the backend.
///
/// `recurrent_interval` is the backend's field spelling, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub recurrence_unit: RecurrenceUnit,
    pub recurrent_interval: u16,
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
}
