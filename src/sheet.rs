//! The editable course list behind the interactive shell.
//!
//! A [`CourseSheet`] owns the working entries and the outcome of the last
//! calculation. [`SheetCommand`] is one parsed line of shell input.

use crate::aggregate::validate_and_aggregate;
use crate::error::ValidationError;
use crate::grades::GradeScale;
use crate::output::render_summary;
use crate::types::{AggregateResult, CourseEntry, CourseField};
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const HELP: &str = "\
Commands:
  add                          add an empty course
  remove N                     remove course N
  set N name|credit|grade V    set a field of course N
  list                         show all courses
  calc                         calculate the CGPA
  reset                        start over with one empty course
  scale                        show the grade scale
  help                         show this message
  quit                         leave the shell";

/// Errors from editing the sheet or parsing a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("There is no course {} (the sheet has {}).", .index + 1, .len)]
    NoSuchCourse { index: usize, len: usize },

    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(String),
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCommand {
    Add,
    /// Zero-based position.
    Remove(usize),
    Set {
        index: usize,
        field: CourseField,
        value: String,
    },
    List,
    Calculate,
    Reset,
    Scale,
    Help,
    Quit,
}

impl FromStr for SheetCommand {
    type Err = SheetError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(SheetError::Usage("type 'help' for a list of commands".into()));
        };

        match command.to_ascii_lowercase().as_str() {
            "add" => Ok(SheetCommand::Add),
            "remove" | "rm" => {
                let index = parse_position(words.next(), "remove N")?;
                Ok(SheetCommand::Remove(index))
            }
            "set" => {
                const USAGE: &str = "set N name|credit|grade VALUE";
                let (_, rest) = next_word(line);
                let (position, rest) = next_word(rest);
                let (field, value) = next_word(rest);

                let index = parse_position(Some(position), USAGE)?;
                let field = field
                    .parse::<CourseField>()
                    .map_err(|e| SheetError::Usage(format!("{USAGE} ({e})")))?;
                Ok(SheetCommand::Set {
                    index,
                    field,
                    value: value.to_string(),
                })
            }
            "list" | "ls" => Ok(SheetCommand::List),
            "calc" | "calculate" => Ok(SheetCommand::Calculate),
            "reset" => Ok(SheetCommand::Reset),
            "scale" => Ok(SheetCommand::Scale),
            "help" | "?" => Ok(SheetCommand::Help),
            "quit" | "exit" | "q" => Ok(SheetCommand::Quit),
            other => Err(SheetError::UnknownCommand(other.to_string())),
        }
    }
}

/// Splits off the first word of `text`. The remainder keeps its inner spacing
/// but loses the whitespace that separated it from the word.
fn next_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

/// Turns a 1-based course number typed by the user into a zero-based index.
fn parse_position(word: Option<&str>, usage: &str) -> Result<usize, SheetError> {
    word.and_then(|w| w.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| SheetError::Usage(format!("{usage} (N is a course number from 1)")))
}

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    Quit,
}

/// The working course list and the result (or error) of the last calculation.
#[derive(Debug, Clone)]
pub struct CourseSheet {
    entries: Vec<CourseEntry>,
    outcome: Option<Result<AggregateResult, ValidationError>>,
    scale: GradeScale,
}

impl CourseSheet {
    /// A fresh sheet holding one empty course.
    pub fn new() -> Self {
        Self::with_scale(GradeScale::STANDARD)
    }

    pub fn with_scale(scale: GradeScale) -> Self {
        Self {
            entries: vec![CourseEntry::default()],
            outcome: None,
            scale,
        }
    }

    pub fn entries(&self) -> &[CourseEntry] {
        &self.entries
    }

    /// The last calculation, if one has run since the sheet was created or reset.
    pub fn outcome(&self) -> Option<&Result<AggregateResult, ValidationError>> {
        self.outcome.as_ref()
    }

    pub fn add_course(&mut self) {
        self.entries.push(CourseEntry::default());
    }

    pub fn remove_course(&mut self, index: usize) -> Result<CourseEntry, SheetError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    pub fn set_field(
        &mut self,
        index: usize,
        field: CourseField,
        value: impl Into<String>,
    ) -> Result<(), SheetError> {
        self.check_index(index)?;
        self.entries[index].set(field, value);
        Ok(())
    }

    /// Runs the aggregation over the current entries and records the outcome.
    ///
    /// A failed calculation replaces any earlier result.
    pub fn calculate(&mut self) -> Result<&AggregateResult, &ValidationError> {
        let outcome = validate_and_aggregate(&self.entries, &self.scale);
        debug!(courses = self.entries.len(), ok = outcome.is_ok(), "Sheet calculated");
        self.outcome.insert(outcome).as_ref()
    }

    pub fn reset(&mut self) {
        self.entries = vec![CourseEntry::default()];
        self.outcome = None;
    }

    /// Executes one shell command and returns what to show the user.
    pub fn apply(&mut self, command: SheetCommand) -> Result<Reply, SheetError> {
        let message = match command {
            SheetCommand::Add => {
                self.add_course();
                format!("Added course {}.", self.entries.len())
            }
            SheetCommand::Remove(index) => {
                self.remove_course(index)?;
                format!("Removed course {}.", index + 1)
            }
            SheetCommand::Set {
                index,
                field,
                value,
            } => {
                self.set_field(index, field, value)?;
                self.render_entries()
            }
            SheetCommand::List => self.render_entries(),
            SheetCommand::Calculate => match self.calculate() {
                Ok(result) => render_summary(result),
                Err(err) => err.to_string(),
            },
            SheetCommand::Reset => {
                self.reset();
                "Sheet reset.".to_string()
            }
            SheetCommand::Scale => render_scale(&self.scale),
            SheetCommand::Help => HELP.to_string(),
            SheetCommand::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Message(message))
    }

    /// Tabular listing of the working entries.
    pub fn render_entries(&self) -> String {
        if self.entries.is_empty() {
            return "No courses. Type 'add' to add one.".to_string();
        }

        let mut out = format!("{:>3}  {:<28} {:>8}  {:<5}", "#", "Course", "Credits", "Grade");
        for (i, entry) in self.entries.iter().enumerate() {
            let _ = write!(
                out,
                "\n{:>3}  {:<28} {:>8}  {:<5}",
                i + 1,
                blank_as_dash(&entry.name),
                blank_as_dash(&entry.credit_hours),
                blank_as_dash(&entry.grade),
            );
        }
        out
    }

    fn check_index(&self, index: usize) -> Result<(), SheetError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(SheetError::NoSuchCourse {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl Default for CourseSheet {
    fn default() -> Self {
        Self::new()
    }
}

/// The grade table, one `token  points` row per line.
pub fn render_scale(scale: &GradeScale) -> String {
    scale
        .iter()
        .map(|(grade, points)| format!("{grade:<3} {points:.1}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn blank_as_dash(text: &str) -> &str {
    if text.trim().is_empty() { "-" } else { text }
}
