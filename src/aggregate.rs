use crate::error::ValidationError;
use crate::grades::GradeScale;
use crate::types::{AggregateResult, CourseEntry};
use tracing::debug;

/// Validates a course list and folds it into credit-weighted totals.
///
/// Entries are checked in order and the first violation wins:
/// an empty field, then a credit that is not a positive finite number, then a
/// grade missing from `scale`. On success the totals are returned unrounded
/// together with the CGPA rounded to two decimals.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first offending entry, or
/// [`ValidationError::NoCourses`] if `entries` is empty.
pub fn validate_and_aggregate(
    entries: &[CourseEntry],
    scale: &GradeScale,
) -> Result<AggregateResult, ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::NoCourses);
    }

    let mut total_credits = 0.0;
    let mut total_points = 0.0;

    for (index, entry) in entries.iter().enumerate() {
        if let Some(field) = entry.first_missing() {
            debug!(index, %field, "Course is missing a field");
            return Err(ValidationError::MissingField { index, field });
        }

        let credit = parse_credit(&entry.credit_hours).ok_or_else(|| {
            debug!(index, value = %entry.credit_hours, "Course has invalid credit hours");
            ValidationError::InvalidCredit {
                index,
                value: entry.credit_hours.clone(),
            }
        })?;

        let points = scale.point(&entry.grade).ok_or_else(|| {
            debug!(index, grade = %entry.grade, "Course has unknown grade");
            ValidationError::UnknownGrade {
                index,
                grade: entry.grade.clone(),
                expected: scale.describe(),
            }
        })?;

        total_credits += credit;
        total_points += credit * points;
    }

    let result = AggregateResult::from_totals(total_credits, total_points);
    debug!(
        courses = entries.len(),
        total_credits, total_points, cgpa = result.cgpa, "CGPA calculated"
    );

    Ok(result)
}

/// [`validate_and_aggregate`] against [`GradeScale::STANDARD`].
pub fn aggregate(entries: &[CourseEntry]) -> Result<AggregateResult, ValidationError> {
    validate_and_aggregate(entries, &GradeScale::STANDARD)
}

/// Parses credit hours, accepting only positive finite numbers.
///
/// Surrounding whitespace is ignored, so a blank credit is invalid rather than missing.
fn parse_credit(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|credit| credit.is_finite() && *credit > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseField;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_course() {
        let result = aggregate(&[CourseEntry::new("Calculus", "3", "A")]).unwrap();

        assert!(approx(result.total_credits, 3.0));
        assert!(approx(result.total_points, 11.1));
        assert_eq!(result.cgpa, 3.70);
    }

    #[test]
    fn test_two_courses() {
        let entries = vec![
            CourseEntry::new("Calculus", "3", "A"),
            CourseEntry::new("Physics", "4", "B+"),
        ];
        let result = aggregate(&entries).unwrap();

        assert!(approx(result.total_credits, 7.0));
        assert!(approx(result.total_points, 24.3));
        assert_eq!(result.cgpa, 3.47);
    }

    #[test]
    fn test_grade_case_insensitive() {
        let upper = aggregate(&[CourseEntry::new("Art", "2", "A+")]).unwrap();
        let lower = aggregate(&[CourseEntry::new("Art", "2", "a+")]).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(lower.cgpa, 4.0);
    }

    #[test]
    fn test_fractional_credits() {
        let entries = vec![
            CourseEntry::new("Seminar", "0.5", "F"),
            CourseEntry::new("Lab", "1.5", "A+"),
        ];
        let result = aggregate(&entries).unwrap();
        assert!(approx(result.total_credits, 2.0));
        assert!(approx(result.total_points, 6.0));
        assert_eq!(result.cgpa, 3.0);
    }

    #[test]
    fn test_idempotent() {
        let entries = vec![
            CourseEntry::new("Calculus", "3", "A"),
            CourseEntry::new("History", "2", "c"),
        ];
        assert_eq!(aggregate(&entries), aggregate(&entries));
    }

    #[test]
    fn test_empty_name_is_missing_field() {
        let err = aggregate(&[CourseEntry::new("", "-2", "E")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                index: 0,
                field: CourseField::Name
            }
        );
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let err = aggregate(&[CourseEntry::new("Calculus", "", "A")]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingField {
                field: CourseField::CreditHours,
                ..
            }
        ));

        let err = aggregate(&[CourseEntry::new("Calculus", "3", "")]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingField {
                field: CourseField::Grade,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_credit() {
        for credit in ["0", "-2", "abc", "3abc", "NaN", "inf"] {
            let err = aggregate(&[CourseEntry::new("Calculus", credit, "A")]).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidCredit {
                    index: 0,
                    value: credit.to_string()
                },
                "credit {credit:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_grade() {
        let err = aggregate(&[CourseEntry::new("Calculus", "3", "E")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownGrade {
                index: 0,
                grade: "E".to_string(),
                expected: "A+, A, B+, B, C+, C, D, F".to_string(),
            }
        );
    }

    #[test]
    fn test_first_failure_in_entry_order() {
        let entries = vec![
            CourseEntry::new("Calculus", "3", "A"),
            CourseEntry::new("Physics", "0", "B"),
            CourseEntry::new("", "4", "A"),
        ];
        let err = aggregate(&entries).unwrap_err();
        assert_eq!(err.index(), Some(1));
        assert!(matches!(err, ValidationError::InvalidCredit { .. }));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(aggregate(&[]), Err(ValidationError::NoCourses));
    }

    #[test]
    fn test_whitespace_only_fields_are_not_missing() {
        let result = aggregate(&[CourseEntry::new("   ", "3", "B")]).unwrap();
        assert_eq!(result.cgpa, 3.0);

        let err = aggregate(&[CourseEntry::new("Calculus", " ", "A")]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCredit { index: 0, .. }));
    }

    #[test]
    fn test_credit_tolerates_surrounding_whitespace() {
        let result = aggregate(&[CourseEntry::new("Calculus", " 3 ", "b")]).unwrap();
        assert_eq!(result.cgpa, 3.0);
    }

    #[test]
    fn test_padded_grade_is_unknown() {
        let err = aggregate(&[CourseEntry::new("Calculus", "3", " a ")]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownGrade { index: 0, ref grade, .. } if grade == " a "
        ));
    }

    #[test]
    fn test_unknown_grade_lists_the_given_scale() {
        static PASS_FAIL: &[(&str, f64)] = &[("P", 4.0), ("F", 0.0)];
        let scale = GradeScale::new(PASS_FAIL);

        let result = validate_and_aggregate(&[CourseEntry::new("Lab", "1", "p")], &scale).unwrap();
        assert_eq!(result.cgpa, 4.0);

        let err = validate_and_aggregate(&[CourseEntry::new("Lab", "1", "A")], &scale).unwrap_err();
        assert_eq!(err.message(), "Grade must be one of: P, F.");
        assert_eq!(err.to_string(), "Course 1: Grade must be one of: P, F (got 'A').");
    }
}
