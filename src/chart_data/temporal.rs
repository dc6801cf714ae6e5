//! Date/time conversion for temporal columns: instants and bucketed periods.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::cursor::{CellValue, SqlType};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y.%m.%dD%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%d/%m/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Granularity of a [`TimePeriod`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKind {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl PeriodKind {
    /// Bucket size used for a column of the given type.
    pub fn for_sql_type(sql_type: SqlType) -> Self {
        match sql_type {
            SqlType::Date => Self::Day,
            _ => Self::Millisecond,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// A regular time bucket identified by its start instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePeriod {
    pub granularity: PeriodKind,
    pub start: NaiveDateTime,
}

impl TimePeriod {
    /// The period of `granularity` that contains `instant`.
    pub fn containing(instant: NaiveDateTime, granularity: PeriodKind) -> Self {
        let date = instant.date();
        let time = instant.time();
        let start = match granularity {
            PeriodKind::Millisecond => {
                let nanos = time.nanosecond() / 1_000_000 * 1_000_000;
                instant.with_nanosecond(nanos).unwrap_or(instant)
            }
            PeriodKind::Second => instant.with_nanosecond(0).unwrap_or(instant),
            PeriodKind::Minute => date.and_hms_opt(time.hour(), time.minute(), 0).unwrap_or(instant),
            PeriodKind::Hour => date.and_hms_opt(time.hour(), 0, 0).unwrap_or(instant),
            PeriodKind::Day => date.and_time(NaiveTime::MIN),
            PeriodKind::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .map(|d| d.and_time(NaiveTime::MIN))
                .unwrap_or(instant),
            PeriodKind::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
                .map(|d| d.and_time(NaiveTime::MIN))
                .unwrap_or(instant),
        };
        Self { granularity, start }
    }

    /// Start of the period as milliseconds since the Unix epoch.
    pub fn start_millis(&self) -> i64 {
        to_epoch_millis(self.start)
    }
}

/// Milliseconds since the Unix epoch for a naive (UTC) instant.
pub fn to_epoch_millis(instant: NaiveDateTime) -> i64 {
    instant.and_utc().timestamp_millis()
}

/// Inverse of [`to_epoch_millis`].
pub fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Read a cell as an instant. Times of day are placed on 1970-01-01.
pub fn to_instant(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Date(d) => Some(d.and_time(NaiveTime::MIN)),
        CellValue::Time(t) => Some(epoch_date().and_time(*t)),
        CellValue::Text(s) => parse_instant(s.trim()),
        CellValue::Null | CellValue::Bool(_) | CellValue::Int(_) | CellValue::Float(_) => None,
    }
}

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .or_else(|| {
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
                .map(|t| epoch_date().and_time(t))
        })
}

/// Format an epoch-millis axis value using a label precision suited to `span`.
pub fn format_epoch_millis(millis: f64, span: Duration) -> String {
    let Some(dt) = from_epoch_millis(millis.round() as i64) else {
        return format!("{millis}");
    };
    if span <= Duration::days(1) {
        dt.format("%H:%M").to_string()
    } else if span <= Duration::days(366) {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_common_text_forms() {
        assert_eq!(
            to_instant(&CellValue::Text("2024-05-06 14:30:00".into())),
            Some(ymd_hms(2024, 5, 6, 14, 30, 0))
        );
        assert_eq!(
            to_instant(&CellValue::Text("2024.05.06".into())),
            Some(ymd_hms(2024, 5, 6, 0, 0, 0))
        );
        assert_eq!(
            to_instant(&CellValue::Text("09:15".into())),
            Some(ymd_hms(1970, 1, 1, 9, 15, 0))
        );
        assert_eq!(to_instant(&CellValue::Text("soon".into())), None);
        assert_eq!(to_instant(&CellValue::Int(5)), None);
    }

    #[test]
    fn periods_truncate_to_their_start() {
        let t = ymd_hms(2024, 5, 6, 14, 30, 45);
        assert_eq!(
            TimePeriod::containing(t, PeriodKind::Day).start,
            ymd_hms(2024, 5, 6, 0, 0, 0)
        );
        assert_eq!(
            TimePeriod::containing(t, PeriodKind::Hour).start,
            ymd_hms(2024, 5, 6, 14, 0, 0)
        );
        assert_eq!(
            TimePeriod::containing(t, PeriodKind::Month).start,
            ymd_hms(2024, 5, 1, 0, 0, 0)
        );
    }

    #[test]
    fn epoch_millis_round_trips() {
        let t = ymd_hms(2001, 2, 3, 4, 5, 6);
        assert_eq!(from_epoch_millis(to_epoch_millis(t)), Some(t));
        assert_eq!(to_epoch_millis(ymd_hms(1970, 1, 1, 0, 0, 1)), 1_000);
    }
}
