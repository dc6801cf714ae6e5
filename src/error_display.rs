//! User-facing error message formatting.
//!
//! Matches on typed errors (chart errors, the polars reader's errors,
//! io::ErrorKind) rather than parsing strings.

use polars::prelude::PolarsError;
use std::io;
use std::path::Path;

use crate::error::{ChartError, CursorError, ModelError};

/// Format a chart error as a one-line message for panels and logs.
pub fn user_message_from_chart_error(err: &ChartError) -> String {
    match err {
        ChartError::Format(e) => format!("Data does not fit this chart: {}.", e.reason()),
        ChartError::Model(ModelError::TemporalConversion { column }) => format!(
            "None of the values in '{}' could be read as a date or time.",
            column
        ),
        ChartError::Model(ModelError::LengthMismatch { column, .. }) => format!(
            "Column '{}' has a different number of rows than the rest of the result.",
            column
        ),
        ChartError::Model(ModelError::Cursor(e)) | ChartError::Cursor(e) => {
            user_message_from_cursor(e)
        }
    }
}

fn user_message_from_cursor(err: &CursorError) -> String {
    match err {
        CursorError::Source(msg) => format!("Could not read the result: {}", msg),
        other => format!("Could not read the result ({}).", other),
    }
}

/// Message for a failure while reading a data file with polars. Only the
/// variants the CSV and Parquet readers raise get their own wording.
fn user_message_from_polars(err: &PolarsError) -> String {
    match err {
        PolarsError::IO { error, .. } => user_message_from_io(error.as_ref()),
        PolarsError::NoData(_) => "The file contains no rows to chart.".to_string(),
        PolarsError::ComputeError(msg) => format!("Could not parse the file as a table: {}", msg),
        PolarsError::Context { error, msg } => {
            format!("{}: {}", msg, user_message_from_polars(error))
        }
        other => other.to_string(),
    }
}

fn user_message_from_io(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "Data file not found.".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            "The file is truncated or not in the expected format.".to_string()
        }
        _ => err.to_string(),
    }
}

/// Format a data-loading failure by walking its cause chain for polars and
/// I/O errors. Anything else is reduced to its first line.
pub fn user_message_from_report(report: &color_eyre::eyre::Report, path: Option<&Path>) -> String {
    let with_path = |msg: String| match path {
        Some(p) => format!("Failed to load {}: {}", p.display(), msg),
        None => msg,
    };
    for cause in report.chain() {
        if let Some(pe) = cause.downcast_ref::<PolarsError>() {
            return with_path(user_message_from_polars(pe));
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return with_path(user_message_from_io(io_err));
        }
    }

    // First line only, to keep backtraces out of the terminal.
    let display = report.to_string();
    let first_line = display.lines().next().unwrap_or("An error occurred").trim();
    with_path(first_line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartFormatError;

    #[test]
    fn missing_file_is_named() {
        let report = color_eyre::eyre::Report::new(io::Error::new(
            io::ErrorKind::NotFound,
            "No such file",
        ));
        assert_eq!(
            user_message_from_report(&report, Some(Path::new("sales.csv"))),
            "Failed to load sales.csv: Data file not found."
        );
    }

    #[test]
    fn reader_errors_describe_the_input() {
        let err = PolarsError::NoData("empty CSV".into());
        assert_eq!(user_message_from_polars(&err), "The file contains no rows to chart.");
        let err = PolarsError::ComputeError("found more fields than defined in 'Schema'".into());
        assert!(user_message_from_polars(&err).starts_with("Could not parse the file as a table: "));
        let err = PolarsError::IO {
            error: std::sync::Arc::new(io::Error::from(io::ErrorKind::UnexpectedEof)),
            msg: None,
        };
        assert_eq!(
            user_message_from_polars(&err),
            "The file is truncated or not in the expected format."
        );
    }

    #[test]
    fn unrelated_reports_keep_their_first_line() {
        let report = color_eyre::eyre::eyre!("Unknown file format\nmore detail");
        assert_eq!(user_message_from_report(&report, None), "Unknown file format");
    }

    #[test]
    fn chart_errors_read_as_sentences() {
        let err: ChartError = ChartFormatError::needs_numeric_columns(2).into();
        assert_eq!(
            user_message_from_chart_error(&err),
            "Data does not fit this chart: at least two numeric columns required."
        );
        let err: ChartError = ModelError::TemporalConversion {
            column: "opened".into(),
        }
        .into();
        assert!(user_message_from_chart_error(&err).contains("'opened'"));
    }

    #[test]
    fn report_chain_finds_io_errors() {
        let report = color_eyre::eyre::Report::new(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let msg = user_message_from_report(&report, Some(Path::new("data.csv")));
        assert!(msg.starts_with("Failed to load data.csv: Permission denied"), "got: {}", msg);
    }
}
