//! Validation errors reported back to whoever edits the course list.

use crate::types::CourseField;
use thiserror::Error;

/// Why a course list could not be aggregated.
///
/// Only the first violation in entry order is ever reported. `index` is the
/// zero-based position of the offending entry; `Display` shows it 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Course {}: All fields must be filled (missing {}).", .index + 1, .field)]
    MissingField { index: usize, field: CourseField },

    #[error("Course {}: Credit hours must be positive numbers (got '{}').", .index + 1, .value)]
    InvalidCredit { index: usize, value: String },

    /// `expected` lists the tokens of the scale the grade was checked against.
    #[error(
        "Course {}: Grade must be one of: {} (got '{}').",
        .index + 1,
        .expected,
        .grade
    )]
    UnknownGrade {
        index: usize,
        grade: String,
        expected: String,
    },

    #[error("Add at least one course.")]
    NoCourses,
}

impl ValidationError {
    /// Zero-based position of the entry that failed, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::MissingField { index, .. }
            | ValidationError::InvalidCredit { index, .. }
            | ValidationError::UnknownGrade { index, .. } => Some(*index),
            ValidationError::NoCourses => None,
        }
    }

    /// The short user-facing message, without the course position.
    pub fn message(&self) -> String {
        match self {
            ValidationError::MissingField { .. } => "All fields must be filled.".to_string(),
            ValidationError::InvalidCredit { .. } => {
                "Credit hours must be positive numbers.".to_string()
            }
            ValidationError::UnknownGrade { expected, .. } => {
                format!("Grade must be one of: {expected}.")
            }
            ValidationError::NoCourses => "Add at least one course.".to_string(),
        }
    }
}
