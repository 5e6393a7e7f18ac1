//! Data types shared by the aggregator, the course sheet and the loaders.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One course as typed by the user.
///
/// Every field is kept as raw text so that validation, not deserialization,
/// decides what is acceptable. Position in the list is the only identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(
        default,
        alias = "credit",
        alias = "creditHours",
        deserialize_with = "credit_text"
    )]
    pub credit_hours: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub grade: String,
}

impl CourseEntry {
    pub fn new(
        name: impl Into<String>,
        credit_hours: impl ToString,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            credit_hours: credit_hours.to_string(),
            grade: grade.into(),
        }
    }

    /// Returns the raw text of `field`.
    pub fn field(&self, field: CourseField) -> &str {
        match field {
            CourseField::Name => &self.name,
            CourseField::CreditHours => &self.credit_hours,
            CourseField::Grade => &self.grade,
        }
    }

    /// Overwrites `field` with `value`.
    pub fn set(&mut self, field: CourseField, value: impl Into<String>) {
        let slot = match field {
            CourseField::Name => &mut self.name,
            CourseField::CreditHours => &mut self.credit_hours,
            CourseField::Grade => &mut self.grade,
        };
        *slot = value.into();
    }

    /// First field (in name, credit, grade order) that is empty.
    ///
    /// Whitespace counts as content; only a zero-length field is missing.
    pub fn first_missing(&self) -> Option<CourseField> {
        CourseField::ALL
            .into_iter()
            .find(|&field| self.field(field).is_empty())
    }
}

/// Addresses one editable field of a [`CourseEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseField {
    Name,
    CreditHours,
    Grade,
}

impl CourseField {
    pub const ALL: [CourseField; 3] = [
        CourseField::Name,
        CourseField::CreditHours,
        CourseField::Grade,
    ];
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CourseField::Name => "name",
            CourseField::CreditHours => "credit hours",
            CourseField::Grade => "grade",
        })
    }
}

impl FromStr for CourseField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(CourseField::Name),
            "credit" | "credits" | "credit_hours" | "hours" => Ok(CourseField::CreditHours),
            "grade" => Ok(CourseField::Grade),
            other => anyhow::bail!("unknown field '{other}' (expected name, credit or grade)"),
        }
    }
}

/// Outcome of a successful calculation.
///
/// Totals are unrounded; `cgpa` is rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateResult {
    pub total_credits: f64,
    pub total_points: f64,
    pub cgpa: f64,
}

impl AggregateResult {
    /// Builds a result from running totals. `total_credits` must be positive.
    pub(crate) fn from_totals(total_credits: f64, total_points: f64) -> Self {
        Self {
            total_credits,
            total_points,
            cgpa: round2(total_points / total_credits),
        }
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts credit hours written either as a JSON string or a JSON number.
fn credit_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Credit {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Credit>::deserialize(deserializer)? {
        Some(Credit::Text(text)) => text,
        Some(Credit::Number(number)) => number.to_string(),
        None => String::new(),
    })
}
