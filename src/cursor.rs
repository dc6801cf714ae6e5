//! The tabular cursor the engine reads query results through, plus an in-memory
//! implementation used by tests and example fixtures.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

use crate::error::CursorError;

/// The three column kinds charts care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Textual,
}

/// Column type code reported by the upstream query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Decimal,
    Numeric,
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
    Char,
    Varchar,
    LongVarchar,
    Boolean,
    Binary,
    Other,
}

impl SqlType {
    /// Classify a type code. Anything that is neither numeric nor temporal is textual.
    pub fn kind(self) -> ColumnKind {
        match self {
            Self::TinyInt
            | Self::SmallInt
            | Self::Integer
            | Self::BigInt
            | Self::Real
            | Self::Float
            | Self::Double
            | Self::Decimal
            | Self::Numeric => ColumnKind::Numeric,
            Self::Date | Self::Time | Self::Timestamp | Self::TimestampWithTimeZone => {
                ColumnKind::Temporal
            }
            Self::Char
            | Self::Varchar
            | Self::LongVarchar
            | Self::Boolean
            | Self::Binary
            | Self::Other => ColumnKind::Textual,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    pub fn is_temporal(self) -> bool {
        self.kind() == ColumnKind::Temporal
    }
}

/// A single cell of a tabular result.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Coerce to a float. Never fails: anything without a finite numeric
    /// reading is NaN.
    ///
    /// Text is parsed from its display form, which covers sources that hand
    /// decimals and other number-like values over as strings.
    pub fn to_f64(&self) -> f64 {
        let v = match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Self::Null | Self::Date(_) | Self::Time(_) | Self::DateTime(_) => f64::NAN,
        };
        // Infinities collapse to NaN so every coerced value is finite or NaN.
        if v.is_finite() {
            v
        } else {
            f64::NAN
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// Forward-only, rewindable access to a query result.
///
/// Column indexes are zero-based. `cell` reads from the row the last successful
/// `next_row` moved to.
pub trait TabularCursor {
    fn column_count(&self) -> usize;
    fn column_name(&self, index: usize) -> Result<&str, CursorError>;
    fn column_type(&self, index: usize) -> Result<SqlType, CursorError>;
    /// Position before the first row so the next `next_row` lands on row one.
    fn before_first(&mut self) -> Result<(), CursorError>;
    /// Advance; returns false once the rows are exhausted.
    fn next_row(&mut self) -> Result<bool, CursorError>;
    fn cell(&self, index: usize) -> Result<CellValue, CursorError>;
}

/// One named, typed column of a [`SimpleResultSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleColumn {
    pub name: String,
    pub sql_type: SqlType,
    pub values: Vec<CellValue>,
}

impl SimpleColumn {
    pub fn new(name: impl Into<String>, sql_type: SqlType, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            sql_type,
            values,
        }
    }

    pub fn text<S: AsRef<str>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            name,
            SqlType::Varchar,
            values
                .into_iter()
                .map(|s| CellValue::Text(s.as_ref().to_string()))
                .collect(),
        )
    }

    pub fn doubles(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            SqlType::Double,
            values.into_iter().map(CellValue::Float).collect(),
        )
    }

    pub fn integers(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            SqlType::BigInt,
            values.into_iter().map(CellValue::Int).collect(),
        )
    }

    pub fn dates(name: impl Into<String>, values: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self::new(
            name,
            SqlType::Date,
            values.into_iter().map(CellValue::Date).collect(),
        )
    }

    pub fn timestamps(
        name: impl Into<String>,
        values: impl IntoIterator<Item = NaiveDateTime>,
    ) -> Self {
        Self::new(
            name,
            SqlType::Timestamp,
            values.into_iter().map(CellValue::DateTime).collect(),
        )
    }
}

/// Column-major in-memory result. Implements only the cursor interface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleResultSet {
    columns: Vec<SimpleColumn>,
    row_count: usize,
    position: Option<usize>,
}

impl SimpleResultSet {
    /// Build a result set; every column must hold the same number of values.
    pub fn new(columns: Vec<SimpleColumn>) -> Result<Self, CursorError> {
        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != row_count) {
            return Err(CursorError::RaggedColumns {
                column: bad.name.clone(),
                expected: row_count,
                actual: bad.values.len(),
            });
        }
        Ok(Self {
            columns,
            row_count,
            position: None,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[SimpleColumn] {
        &self.columns
    }

    fn column(&self, index: usize) -> Result<&SimpleColumn, CursorError> {
        self.columns.get(index).ok_or(CursorError::ColumnOutOfRange {
            index,
            count: self.columns.len(),
        })
    }
}

impl TabularCursor for SimpleResultSet {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> Result<&str, CursorError> {
        Ok(self.column(index)?.name.as_str())
    }

    fn column_type(&self, index: usize) -> Result<SqlType, CursorError> {
        Ok(self.column(index)?.sql_type)
    }

    fn before_first(&mut self) -> Result<(), CursorError> {
        self.position = None;
        Ok(())
    }

    fn next_row(&mut self) -> Result<bool, CursorError> {
        let next = self.position.map_or(0, |p| p + 1);
        if next < self.row_count {
            self.position = Some(next);
            Ok(true)
        } else {
            self.position = Some(self.row_count);
            Ok(false)
        }
    }

    fn cell(&self, index: usize) -> Result<CellValue, CursorError> {
        let row = match self.position {
            Some(p) if p < self.row_count => p,
            _ => return Err(CursorError::NoCurrentRow),
        };
        Ok(self.column(index)?.values[row].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_type_codes() {
        assert_eq!(SqlType::Decimal.kind(), ColumnKind::Numeric);
        assert_eq!(SqlType::TimestampWithTimeZone.kind(), ColumnKind::Temporal);
        assert_eq!(SqlType::Boolean.kind(), ColumnKind::Textual);
        assert!(SqlType::TinyInt.is_numeric());
        assert!(SqlType::Time.is_temporal());
    }

    #[test]
    fn coercion_is_total() {
        assert_eq!(CellValue::Int(3).to_f64(), 3.0);
        assert_eq!(CellValue::Text(" 12.5 ".into()).to_f64(), 12.5);
        assert!(CellValue::Null.to_f64().is_nan());
        assert!(CellValue::Text("abc".into()).to_f64().is_nan());
        assert_eq!(CellValue::Bool(true).to_f64(), 1.0);
        assert_eq!(CellValue::Bool(false).to_f64(), 0.0);
        assert!(CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .to_f64()
            .is_nan());
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = SimpleResultSet::new(vec![
            SimpleColumn::text("a", ["x", "y"]),
            SimpleColumn::doubles("b", [1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, CursorError::RaggedColumns { actual: 1, .. }));
    }

    #[test]
    fn cursor_rewinds() {
        let mut rs = SimpleResultSet::new(vec![SimpleColumn::integers("n", [1, 2])]).unwrap();
        assert_eq!(rs.cell(0), Err(CursorError::NoCurrentRow));
        let mut seen = Vec::new();
        while rs.next_row().unwrap() {
            seen.push(rs.cell(0).unwrap());
        }
        assert_eq!(seen, vec![CellValue::Int(1), CellValue::Int(2)]);
        assert_eq!(rs.cell(0), Err(CursorError::NoCurrentRow));
        rs.before_first().unwrap();
        assert!(rs.next_row().unwrap());
        assert_eq!(rs.cell(0).unwrap(), CellValue::Int(1));
        assert!(rs.column_name(4).is_err());
    }
}
