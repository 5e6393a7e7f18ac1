//! CLI entry point for the CGPA calculator.
//!
//! Provides subcommands for calculating a CGPA from files or arguments,
//! printing the grade scale, and editing a course list interactively.

use anyhow::{Result, bail};
use cgpa_calculator::output::{
    CalculationRecord, append_record, print_json, print_pretty, render_summary,
};
use cgpa_calculator::parser::{load_courses, parse_course_arg};
use cgpa_calculator::sheet::{CourseSheet, HELP, Reply, SheetCommand, render_scale};
use cgpa_calculator::{CourseEntry, GradeScale, validate_and_aggregate};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Exit status when the course list fails validation.
const EXIT_INVALID_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "cgpa_calculator")]
#[command(about = "Calculate a credit-weighted CGPA from a list of courses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the CGPA for courses from a file and/or the command line
    Calculate {
        /// CSV (name,credit_hours,grade) or .json file of courses
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// A course given as NAME:CREDIT:GRADE (repeatable)
        #[arg(short, long = "course", value_name = "NAME:CREDIT:GRADE")]
        courses: Vec<String>,

        /// How to print the result
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append the result to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the grade scale
    Scale,
    /// Edit a course list interactively
    Shell,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/cgpa_calculator.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cgpa_calculator.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            file,
            courses,
            format,
            output,
        } => calculate(file.as_deref(), &courses, format, output.as_deref()),
        Commands::Scale => {
            println!("{}", render_scale(&GradeScale::STANDARD));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Shell => {
            shell(std::io::stdin().lock(), std::io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Gathers courses from `file` then `course_args`, aggregates them and prints the result.
#[tracing::instrument(skip(course_args, format))]
fn calculate(
    file: Option<&Path>,
    course_args: &[String],
    format: Format,
    output: Option<&Path>,
) -> Result<ExitCode> {
    if file.is_none() && course_args.is_empty() {
        bail!("No courses given. Use --file or --course NAME:CREDIT:GRADE.");
    }

    let mut entries: Vec<CourseEntry> = match file {
        Some(path) => load_courses(path)?,
        None => Vec::new(),
    };
    for arg in course_args {
        entries.push(parse_course_arg(arg)?);
    }

    let result = match validate_and_aggregate(&entries, &GradeScale::STANDARD) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };

    print_pretty(&result);
    match format {
        Format::Text => println!("{}", render_summary(&result)),
        Format::Json => print_json(&result)?,
    }

    if let Some(path) = output {
        append_record(path, &CalculationRecord::from_result(&result, entries.len()))?;
        info!(path = %path.display(), "Result appended to history");
    }

    Ok(ExitCode::SUCCESS)
}

/// Reads shell commands line by line from `input` until `quit` or end of input.
fn shell(input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut sheet = CourseSheet::new();
    writeln!(out, "CGPA Calculator\n{HELP}\n\n{}", sheet.render_entries())?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = line
            .parse::<SheetCommand>()
            .and_then(|command| sheet.apply(command));
        match reply {
            Ok(Reply::Message(message)) => writeln!(out, "{message}")?,
            Ok(Reply::Quit) => break,
            Err(err) => {
                debug!(error = %err, "Shell command rejected");
                writeln!(out, "{err}")?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
