//! Loaders that turn files and command-line arguments into course lists.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::CourseEntry;

/// One CSV row. Every cell is text; validation happens later.
#[derive(Debug, Deserialize)]
struct CourseRow {
    name: String,
    #[serde(alias = "credit", alias = "credits", alias = "creditHours")]
    credit_hours: String,
    grade: String,
}

impl From<CourseRow> for CourseEntry {
    fn from(row: CourseRow) -> Self {
        CourseEntry {
            name: row.name,
            credit_hours: row.credit_hours,
            grade: row.grade,
        }
    }
}

/// Reads courses from CSV with a `name,credit_hours,grade` header.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or a column is missing.
pub fn parse_courses_csv<R: Read>(reader: R) -> Result<Vec<CourseEntry>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (line, result) in rdr.deserialize::<CourseRow>().enumerate() {
        let row = result.with_context(|| format!("Bad course row {}", line + 1))?;
        entries.push(row.into());
    }

    Ok(entries)
}

/// Reads courses from a JSON array of `{name, credit_hours, grade}` objects.
///
/// Credit hours may be written as a number or a string.
pub fn parse_courses_json(bytes: &[u8]) -> Result<Vec<CourseEntry>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads courses from `path`, choosing JSON for `.json` files and CSV otherwise.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_courses(path: impl AsRef<Path>) -> Result<Vec<CourseEntry>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        parse_courses_json(&bytes)
    } else {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        parse_courses_csv(file)
    };
    let entries =
        parsed.with_context(|| format!("Failed to parse courses from {}", path.display()))?;

    debug!(courses = entries.len(), is_json, "Courses loaded");
    Ok(entries)
}

/// Parses a `NAME:CREDIT:GRADE` argument.
///
/// Splits on the last two colons so course names may themselves contain colons.
pub fn parse_course_arg(arg: &str) -> Result<CourseEntry> {
    let mut parts = arg.rsplitn(3, ':');
    let (Some(grade), Some(credit), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("Expected NAME:CREDIT:GRADE, got '{arg}'");
    };

    Ok(CourseEntry::new(name.trim(), credit.trim(), grade.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_csv() {
        let csv = "name,credit_hours,grade\nCalculus,3,A\nPhysics, 4 ,b+\n";
        let entries = parse_courses_csv(csv.as_bytes()).unwrap();

        assert_eq!(
            entries,
            vec![
                CourseEntry::new("Calculus", "3", "A"),
                CourseEntry::new("Physics", "4", "b+"),
            ]
        );
    }

    #[test]
    fn test_parse_csv_keeps_blank_and_bad_cells() {
        let csv = "name,credit,grade\n,abc,\n";
        let entries = parse_courses_csv(csv.as_bytes()).unwrap();
        assert_eq!(entries, vec![CourseEntry::new("", "abc", "")]);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "name,grade\nCalculus,A\n";
        assert!(parse_courses_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = br#"[{"name": "Calculus", "credit_hours": 3, "grade": "A"}]"#;
        let entries = parse_courses_json(json).unwrap();
        assert_eq!(entries, vec![CourseEntry::new("Calculus", "3", "A")]);
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(parse_courses_json(b"{not json").is_err());
    }

    #[test]
    fn test_load_courses_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"[{{"name": "Art", "credit": "2", "grade": "c"}}]"#).unwrap();
        let entries = load_courses(json.path()).unwrap();
        assert_eq!(entries, vec![CourseEntry::new("Art", "2", "c")]);

        let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(csv, "name,credit_hours,grade\nArt,2,c\n").unwrap();
        assert_eq!(load_courses(csv.path()).unwrap(), entries);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_courses("/definitely/not/here.csv").is_err());
    }

    #[test]
    fn test_parse_course_arg() {
        assert_eq!(
            parse_course_arg("Calculus:3:A").unwrap(),
            CourseEntry::new("Calculus", "3", "A")
        );
        assert_eq!(
            parse_course_arg("CS 101: Intro:4:b+").unwrap(),
            CourseEntry::new("CS 101: Intro", "4", "b+")
        );
        assert_eq!(
            parse_course_arg(":3:A").unwrap(),
            CourseEntry::new("", "3", "A")
        );
        assert!(parse_course_arg("Calculus:3").is_err());
    }
}
