//! Chart data model: the classified, row-count-consistent snapshot of a query
//! result that every strategy reads from.

mod builder;
mod column;
pub mod temporal;

pub use builder::{build_model, DEFAULT_ROW_TITLE, LABEL_SEPARATOR};
pub use column::{NumericColumn, TemporalColumn, TextualColumn};
pub use temporal::{PeriodKind, TimePeriod};

use crate::error::ModelError;

/// Immutable chart-ready view of one tabular result.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataModel {
    numeric_columns: Vec<NumericColumn>,
    textual_columns: Vec<TextualColumn>,
    temporal_column: Option<TemporalColumn>,
    row_labels: Vec<String>,
    row_axis_title: String,
    col_axis_title: String,
}

impl ChartDataModel {
    /// Assemble a model, checking that every column has one value per row label.
    pub fn new(
        numeric_columns: Vec<NumericColumn>,
        textual_columns: Vec<TextualColumn>,
        temporal_column: Option<TemporalColumn>,
        row_labels: Vec<String>,
        row_axis_title: impl Into<String>,
        col_axis_title: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let expected = row_labels.len();
        let lengths = numeric_columns
            .iter()
            .map(|c| (c.label(), c.len()))
            .chain(textual_columns.iter().map(|c| (c.label(), c.len())))
            .chain(temporal_column.iter().map(|c| (c.label(), c.len())));
        for (label, actual) in lengths {
            if actual != expected {
                return Err(ModelError::LengthMismatch {
                    column: label.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(Self {
            numeric_columns,
            textual_columns,
            temporal_column,
            row_labels,
            row_axis_title: row_axis_title.into(),
            col_axis_title: col_axis_title.into(),
        })
    }

    pub fn numeric_columns(&self) -> &[NumericColumn] {
        &self.numeric_columns
    }

    /// Non-numeric columns in source order, including every temporal column.
    pub fn textual_columns(&self) -> &[TextualColumn] {
        &self.textual_columns
    }

    /// The first temporal column of the source, if any.
    pub fn temporal_column(&self) -> Option<&TemporalColumn> {
        self.temporal_column.as_ref()
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn row_axis_title(&self) -> &str {
        &self.row_axis_title
    }

    pub fn col_axis_title(&self) -> &str {
        &self.col_axis_title
    }

    pub fn row_count(&self) -> usize {
        self.row_labels.len()
    }

    pub fn numeric_column_count(&self) -> usize {
        self.numeric_columns.len()
    }

    /// Total columns of the source (numeric plus non-numeric).
    pub fn column_count(&self) -> usize {
        self.numeric_columns.len() + self.textual_columns.len()
    }

    /// Numeric column by case-insensitive name.
    pub fn numeric_column(&self, name: &str) -> Option<&NumericColumn> {
        self.numeric_columns
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(name))
    }

    /// Swap rows and numeric columns: numeric column names become the row
    /// labels and each original row becomes one numeric column named by its
    /// row label. Non-numeric columns are dropped.
    pub fn transpose(&self) -> Result<Self, ModelError> {
        let row_labels: Vec<String> = self
            .numeric_columns
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        let numeric_columns = self
            .row_labels
            .iter()
            .enumerate()
            .map(|(row, label)| {
                NumericColumn::new(
                    label.clone(),
                    self.numeric_columns.iter().map(|c| c.values()[row]).collect(),
                )
            })
            .collect::<Vec<_>>();
        let col_axis_title = numeric_columns
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            numeric_columns,
            Vec::new(),
            None,
            row_labels,
            self.col_axis_title.clone(),
            col_axis_title,
        )
    }
}
