//! Build a [`ChartDataModel`] from a tabular cursor.

use log::debug;

use super::{ChartDataModel, NumericColumn, TemporalColumn, TextualColumn};
use crate::cursor::{CellValue, ColumnKind, TabularCursor};
use crate::error::ModelError;

/// Row axis title used when the result has no leading textual columns.
pub const DEFAULT_ROW_TITLE: &str = "Row";
/// Joins label column names and label cell values.
pub const LABEL_SEPARATOR: &str = " - ";

/// Read the whole cursor into a model.
///
/// Leading textual columns (up to the first numeric or temporal one) supply the
/// row labels. Every column is then read once more on its own and filed as
/// numeric or non-numeric; the first temporal column is also kept as the
/// model's temporal column.
pub fn build_model(rs: &mut dyn TabularCursor) -> Result<ChartDataModel, ModelError> {
    let column_count = rs.column_count();
    let mut kinds = Vec::with_capacity(column_count);
    let mut names = Vec::with_capacity(column_count);
    for i in 0..column_count {
        kinds.push(rs.column_type(i)?);
        names.push(rs.column_name(i)?.to_string());
    }

    let label_columns: Vec<usize> = kinds
        .iter()
        .take_while(|t| t.kind() == ColumnKind::Textual)
        .enumerate()
        .map(|(i, _)| i)
        .collect();

    let (row_labels, row_axis_title) = read_row_labels(rs, &label_columns, &names)?;

    let mut numeric_columns = Vec::new();
    let mut textual_columns = Vec::new();
    let mut temporal_column = None;
    for (i, (sql_type, name)) in kinds.iter().zip(&names).enumerate() {
        let cells = read_column(rs, i)?;
        match sql_type.kind() {
            ColumnKind::Numeric => numeric_columns.push(NumericColumn::from_cells(name, &cells)),
            ColumnKind::Temporal | ColumnKind::Textual => {
                let column = TextualColumn::new(name, *sql_type, cells);
                if temporal_column.is_none() && sql_type.is_temporal() {
                    temporal_column = Some(TemporalColumn::new(column.clone()));
                }
                textual_columns.push(column);
            }
        }
    }

    let col_axis_title = numeric_columns
        .iter()
        .map(NumericColumn::label)
        .collect::<Vec<_>>()
        .join(", ");

    debug!(
        "built chart model: {} rows, {} numeric, {} non-numeric, temporal={}",
        row_labels.len(),
        numeric_columns.len(),
        textual_columns.len(),
        temporal_column.as_ref().map(TemporalColumn::label).unwrap_or("none")
    );

    ChartDataModel::new(
        numeric_columns,
        textual_columns,
        temporal_column,
        row_labels,
        row_axis_title,
        col_axis_title,
    )
}

fn read_row_labels(
    rs: &mut dyn TabularCursor,
    label_columns: &[usize],
    names: &[String],
) -> Result<(Vec<String>, String), ModelError> {
    rs.before_first()?;
    let mut labels = Vec::new();
    if label_columns.is_empty() {
        while rs.next_row()? {
            labels.push((labels.len() + 1).to_string());
        }
        return Ok((labels, DEFAULT_ROW_TITLE.to_string()));
    }

    while rs.next_row()? {
        let mut parts = Vec::with_capacity(label_columns.len());
        for &i in label_columns {
            parts.push(rs.cell(i)?.to_string());
        }
        labels.push(parts.join(LABEL_SEPARATOR));
    }
    let title = label_columns
        .iter()
        .map(|&i| names[i].as_str())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR);
    Ok((labels, title))
}

fn read_column(rs: &mut dyn TabularCursor, index: usize) -> Result<Vec<CellValue>, ModelError> {
    rs.before_first()?;
    let mut cells = Vec::new();
    while rs.next_row()? {
        cells.push(rs.cell(index)?);
    }
    Ok(cells)
}
