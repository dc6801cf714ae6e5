//! Error types for the chart engine.
//!
//! Shape problems (`ChartFormatError`) are expected and always recoverable: the
//! dispatcher shows the strategy's documentation instead of a chart. Everything
//! else is structural.

use thiserror::Error;

/// Failure reported by a [`crate::cursor::TabularCursor`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CursorError {
    #[error("column index {index} out of range ({count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },
    #[error("no current row; call next_row() before reading cells")]
    NoCurrentRow,
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("{0}")]
    Source(String),
}

/// Failure while building or reading a [`crate::chart_data::ChartDataModel`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("column '{column}' has {actual} values but the model has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("could not convert any value of temporal column '{column}' to a date")]
    TemporalConversion { column: String },
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

/// The model does not have the shape a strategy needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ChartFormatError {
    reason: String,
}

impl ChartFormatError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// One-line explanation suitable for a panel heading.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn needs_numeric_columns(min: usize) -> Self {
        match min {
            1 => Self::new("at least one numeric column required"),
            2 => Self::new("at least two numeric columns required"),
            3 => Self::new("at least three numeric columns required for X/Y/size"),
            n => Self::new(format!("at least {n} numeric columns required")),
        }
    }

    pub fn exactly_three_numeric_columns() -> Self {
        Self::new("exactly three numeric columns (X, Y, size) required")
    }

    pub fn needs_temporal_column() -> Self {
        Self::new("a date, time or timestamp column is required")
    }

    pub fn needs_named_column(name: &str) -> Self {
        Self::new(format!("a numeric column named '{name}' is required"))
    }
}

/// Any failure a strategy can raise while turning a model into a figure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    Format(#[from] ChartFormatError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

impl ChartError {
    pub fn as_format(&self) -> Option<&ChartFormatError> {
        match self {
            Self::Format(e) => Some(e),
            _ => None,
        }
    }
}
