//! Column types held by the chart data model.

use chrono::NaiveDateTime;

use super::temporal::{to_instant, PeriodKind, TimePeriod};
use crate::cursor::{CellValue, ColumnKind, SqlType};
use crate::error::ModelError;

/// Numeric column: every value is a real number or NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    label: String,
    values: Vec<f64>,
}

impl NumericColumn {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Coerce raw cells; anything without a numeric reading becomes NaN.
    pub fn from_cells(label: impl Into<String>, cells: &[CellValue]) -> Self {
        Self::new(label, cells.iter().map(CellValue::to_f64).collect())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ColumnKind {
        ColumnKind::Numeric
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of the finite values.
    pub fn finite_sum(&self) -> f64 {
        self.values.iter().filter(|v| v.is_finite()).sum()
    }

    /// (min, max) over finite values, or None when there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Non-numeric column kept with its original cell values.
#[derive(Debug, Clone)]
pub struct TextualColumn {
    label: String,
    sql_type: SqlType,
    values: Vec<CellValue>,
}

impl TextualColumn {
    pub fn new(label: impl Into<String>, sql_type: SqlType, values: Vec<CellValue>) -> Self {
        Self {
            label: label.into(),
            sql_type,
            values,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn kind(&self) -> ColumnKind {
        if self.sql_type.is_temporal() {
            ColumnKind::Temporal
        } else {
            ColumnKind::Textual
        }
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Display string of the value at `row` (empty for null).
    pub fn text(&self, row: usize) -> String {
        self.values.get(row).map(ToString::to_string).unwrap_or_default()
    }
}

/// Columns compare by the display form of each value only. The label and SQL
/// type are ignored, so a column read from a database compares equal to one
/// typed into a fixture.
impl PartialEq for TextualColumn {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_string() == b.to_string())
    }
}

/// Temporal column with instants and periods converted once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalColumn {
    column: TextualColumn,
    granularity: PeriodKind,
    instants: Vec<Option<NaiveDateTime>>,
    periods: Vec<Option<TimePeriod>>,
    converted: usize,
}

impl TemporalColumn {
    pub fn new(column: TextualColumn) -> Self {
        let granularity = PeriodKind::for_sql_type(column.sql_type());
        let instants: Vec<Option<NaiveDateTime>> = column.values().iter().map(to_instant).collect();
        let periods = instants
            .iter()
            .map(|i| i.map(|t| TimePeriod::containing(t, granularity)))
            .collect();
        let converted = instants.iter().filter(|i| i.is_some()).count();
        Self {
            column,
            granularity,
            instants,
            periods,
            converted,
        }
    }

    pub fn label(&self) -> &str {
        self.column.label()
    }

    pub fn kind(&self) -> ColumnKind {
        ColumnKind::Temporal
    }

    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    pub fn as_textual(&self) -> &TextualColumn {
        &self.column
    }

    pub fn granularity(&self) -> PeriodKind {
        self.granularity
    }

    /// Number of rows that converted to an instant.
    pub fn converted_count(&self) -> usize {
        self.converted
    }

    fn ensure_convertible(&self) -> Result<(), ModelError> {
        if !self.is_empty() && self.converted == 0 {
            return Err(ModelError::TemporalConversion {
                column: self.label().to_string(),
            });
        }
        Ok(())
    }

    /// Per-row instants; rows that failed conversion are `None`.
    /// Fails only when no row of a non-empty column converted.
    pub fn dates(&self) -> Result<&[Option<NaiveDateTime>], ModelError> {
        self.ensure_convertible()?;
        Ok(&self.instants)
    }

    /// Per-row periods, with the same failure rule as [`Self::dates`].
    pub fn periods(&self) -> Result<&[Option<TimePeriod>], ModelError> {
        self.ensure_convertible()?;
        Ok(&self.periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn textual_equality_uses_display_form() {
        let a = TextualColumn::new("n", SqlType::Varchar, vec![CellValue::Text("1".into())]);
        let b = TextualColumn::new("n", SqlType::Integer, vec![CellValue::Int(1)]);
        let c = TextualColumn::new("n", SqlType::Varchar, vec![CellValue::Text("2".into())]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn textual_equality_ignores_the_label() {
        let a = TextualColumn::new("region", SqlType::Varchar, vec![CellValue::Text("EU".into())]);
        let b = TextualColumn::new("REGION_NAME", SqlType::Char, vec![CellValue::Text("EU".into())]);
        assert_eq!(a, b);
        let shorter = TextualColumn::new("region", SqlType::Varchar, vec![]);
        assert_ne!(a, shorter);
    }

    #[test]
    fn partial_temporal_failure_leaves_holes() {
        let col = TemporalColumn::new(TextualColumn::new(
            "d",
            SqlType::Date,
            vec![
                CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
                CellValue::Text("garbage".into()),
            ],
        ));
        let dates = col.dates().unwrap();
        assert!(dates[0].is_some());
        assert!(dates[1].is_none());
        assert_eq!(col.granularity(), PeriodKind::Day);
        assert_eq!(col.converted_count(), 1);
    }

    #[test]
    fn total_temporal_failure_is_an_error() {
        let col = TemporalColumn::new(TextualColumn::new(
            "d",
            SqlType::Timestamp,
            vec![CellValue::Text("x".into()), CellValue::Null],
        ));
        assert!(matches!(
            col.dates(),
            Err(ModelError::TemporalConversion { .. })
        ));
        assert!(col.periods().is_err());
    }

    #[test]
    fn empty_temporal_column_is_fine() {
        let col = TemporalColumn::new(TextualColumn::new("d", SqlType::Date, vec![]));
        assert!(col.dates().unwrap().is_empty());
    }

    #[test]
    fn numeric_range_ignores_nan() {
        let col = NumericColumn::new("v", vec![3.0, f64::NAN, -1.0]);
        assert_eq!(col.finite_range(), Some((-1.0, 3.0)));
        assert_eq!(col.finite_sum(), 2.0);
        assert_eq!(NumericColumn::new("e", vec![f64::NAN]).finite_range(), None);
    }
}
