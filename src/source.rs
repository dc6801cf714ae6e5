//! Polars-backed tabular source: loads CSV/TSV/Parquet files and exposes a
//! DataFrame through the cursor interface.

use chrono::{DateTime, NaiveDate, NaiveTime};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::info;
use polars::prelude::*;
use std::path::Path;
use tabchart_cli::FileFormat;

use crate::cursor::{CellValue, SqlType, TabularCursor};
use crate::error::CursorError;

/// Read a whole file into memory. The format is detected from the extension
/// unless given.
pub fn load_frame(path: &Path, format: Option<FileFormat>, has_header: bool) -> Result<DataFrame> {
    let format = format
        .or_else(|| FileFormat::from_path(path))
        .ok_or_else(|| {
            eyre!(
                "Could not detect the format of {}. Use --format csv|tsv|parquet.",
                path.display()
            )
        })?;
    let pl_path = PlRefPath::try_from_path(path)?;
    let lf = match format {
        FileFormat::Csv | FileFormat::Tsv => {
            let mut reader = LazyCsvReader::new(pl_path)
                .with_has_header(has_header)
                .with_try_parse_dates(true);
            if format == FileFormat::Tsv {
                reader = reader.with_separator(b'\t');
            }
            reader.finish()?
        }
        FileFormat::Parquet => LazyFrame::scan_parquet(pl_path, Default::default())?,
    };
    let df = lf.collect()?;
    info!(
        "loaded {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Map a polars dtype onto the type codes the engine classifies.
pub fn sql_type_of(dtype: &DataType) -> SqlType {
    match dtype {
        DataType::Boolean => SqlType::Boolean,
        DataType::Int8 | DataType::UInt8 => SqlType::TinyInt,
        DataType::Int16 | DataType::UInt16 => SqlType::SmallInt,
        DataType::Int32 | DataType::UInt32 => SqlType::Integer,
        DataType::Int64 | DataType::UInt64 => SqlType::BigInt,
        DataType::Float32 => SqlType::Real,
        DataType::Float64 => SqlType::Double,
        DataType::String => SqlType::Varchar,
        DataType::Date => SqlType::Date,
        DataType::Time => SqlType::Time,
        DataType::Datetime(_, Some(_)) => SqlType::TimestampWithTimeZone,
        DataType::Datetime(_, None) => SqlType::Timestamp,
        DataType::Binary => SqlType::Binary,
        _ => SqlType::Other,
    }
}

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Convert one polars value to a cell. Values without a direct mapping keep
/// their display form as text.
pub fn cell_from_any(value: &AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Bool(*b),
        AnyValue::Int8(v) => CellValue::Int(*v as i64),
        AnyValue::Int16(v) => CellValue::Int(*v as i64),
        AnyValue::Int32(v) => CellValue::Int(*v as i64),
        AnyValue::Int64(v) => CellValue::Int(*v),
        AnyValue::UInt8(v) => CellValue::Int(*v as i64),
        AnyValue::UInt16(v) => CellValue::Int(*v as i64),
        AnyValue::UInt32(v) => CellValue::Int(*v as i64),
        AnyValue::UInt64(v) => i64::try_from(*v)
            .map(CellValue::Int)
            .unwrap_or(CellValue::Float(*v as f64)),
        AnyValue::Float32(v) => CellValue::Float(*v as f64),
        AnyValue::Float64(v) => CellValue::Float(*v),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        AnyValue::Date(days) => epoch_date()
            .checked_add_signed(chrono::Duration::days(*days as i64))
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        AnyValue::Datetime(v, unit, _) => {
            let (secs, nanos) = match unit {
                TimeUnit::Nanoseconds => (v.div_euclid(1_000_000_000), v.rem_euclid(1_000_000_000)),
                TimeUnit::Microseconds => (v.div_euclid(1_000_000), v.rem_euclid(1_000_000) * 1_000),
                TimeUnit::Milliseconds => (v.div_euclid(1_000), v.rem_euclid(1_000) * 1_000_000),
            };
            DateTime::from_timestamp(secs, nanos as u32)
                .map(|dt| CellValue::DateTime(dt.naive_utc()))
                .unwrap_or(CellValue::Null)
        }
        AnyValue::Time(nanos) => NaiveTime::from_num_seconds_from_midnight_opt(
            nanos.div_euclid(1_000_000_000) as u32,
            nanos.rem_euclid(1_000_000_000) as u32,
        )
        .map(CellValue::Time)
        .unwrap_or(CellValue::Null),
        other => CellValue::Text(other.to_string()),
    }
}

/// Cursor over an in-memory DataFrame.
pub struct DataFrameCursor {
    df: DataFrame,
    names: Vec<String>,
    types: Vec<SqlType>,
    position: Option<usize>,
}

impl DataFrameCursor {
    pub fn new(df: DataFrame) -> Self {
        let names = df
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let types = df
            .get_columns()
            .iter()
            .map(|c| sql_type_of(c.dtype()))
            .collect();
        Self {
            df,
            names,
            types,
            position: None,
        }
    }

    pub fn from_path(path: &Path, format: Option<FileFormat>, has_header: bool) -> Result<Self> {
        Ok(Self::new(load_frame(path, format, has_header)?))
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    fn check(&self, index: usize) -> std::result::Result<(), CursorError> {
        if index >= self.names.len() {
            return Err(CursorError::ColumnOutOfRange {
                index,
                count: self.names.len(),
            });
        }
        Ok(())
    }
}

impl TabularCursor for DataFrameCursor {
    fn column_count(&self) -> usize {
        self.names.len()
    }

    fn column_name(&self, index: usize) -> std::result::Result<&str, CursorError> {
        self.check(index)?;
        Ok(self.names[index].as_str())
    }

    fn column_type(&self, index: usize) -> std::result::Result<SqlType, CursorError> {
        self.check(index)?;
        Ok(self.types[index])
    }

    fn before_first(&mut self) -> std::result::Result<(), CursorError> {
        self.position = None;
        Ok(())
    }

    fn next_row(&mut self) -> std::result::Result<bool, CursorError> {
        let height = self.df.height();
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next.min(height));
        Ok(next < height)
    }

    fn cell(&self, index: usize) -> std::result::Result<CellValue, CursorError> {
        self.check(index)?;
        let row = match self.position {
            Some(p) if p < self.df.height() => p,
            _ => return Err(CursorError::NoCurrentRow),
        };
        let value = self.df.get_columns()[index]
            .get(row)
            .map_err(|e| CursorError::Source(e.to_string()))?;
        Ok(cell_from_any(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtypes_map_to_type_codes() {
        assert_eq!(sql_type_of(&DataType::Float64), SqlType::Double);
        assert_eq!(sql_type_of(&DataType::String), SqlType::Varchar);
        assert_eq!(
            sql_type_of(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            SqlType::Timestamp
        );
        assert_eq!(sql_type_of(&DataType::Boolean).kind(), crate::cursor::ColumnKind::Textual);
    }

    #[test]
    fn any_values_convert() {
        assert_eq!(cell_from_any(&AnyValue::Int32(7)), CellValue::Int(7));
        assert_eq!(cell_from_any(&AnyValue::Null), CellValue::Null);
        assert_eq!(
            cell_from_any(&AnyValue::Date(1)),
            CellValue::Date(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap())
        );
        assert_eq!(
            cell_from_any(&AnyValue::Datetime(1_500, TimeUnit::Milliseconds, None)),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(1970, 1, 1)
                    .unwrap()
                    .and_hms_milli_opt(0, 0, 1, 500)
                    .unwrap()
            )
        );
    }

    #[test]
    fn cursor_walks_a_frame() {
        let df = df!(
            "Country" => ["UK", "France"],
            "GDP" => [3.1, 2.8],
        )
        .unwrap();
        let mut cursor = DataFrameCursor::new(df);
        assert_eq!(cursor.column_count(), 2);
        assert_eq!(cursor.column_type(1).unwrap(), SqlType::Double);
        cursor.before_first().unwrap();
        assert!(cursor.next_row().unwrap());
        assert_eq!(cursor.cell(0).unwrap(), CellValue::Text("UK".into()));
        assert!(cursor.next_row().unwrap());
        assert!(!cursor.next_row().unwrap());
        assert!(cursor.cell(0).is_err());
    }
}
