pub mod aggregate;
pub mod error;
pub mod grades;
pub mod output;
pub mod parser;
pub mod sheet;
pub mod types;

pub use aggregate::{aggregate, validate_and_aggregate};
pub use error::ValidationError;
pub use grades::GradeScale;
pub use types::{AggregateResult, CourseEntry, CourseField};
