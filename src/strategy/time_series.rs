use chrono::{Duration, NaiveDate};

use super::figure::{Figure, Plot, XyAxis, XyPlot, XySeries, XyStyle};
use super::{require_numeric, ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::{ChartDataModel, TemporalColumn};
use crate::config::Theme;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::{ChartError, ChartFormatError};

pub struct TimeSeriesStrategy {
    kind: StrategyKind,
    style: XyStyle,
}

pub static TIME_SERIES: TimeSeriesStrategy = TimeSeriesStrategy {
    kind: StrategyKind::TimeSeries,
    style: XyStyle::Line,
};
pub static STEP: TimeSeriesStrategy = TimeSeriesStrategy {
    kind: StrategyKind::Step,
    style: XyStyle::Step,
};

const FORMAT: &str = "Needs a date, time or timestamp column; the first one found is \
the time axis. Every numeric column becomes one line. Rows whose time cannot be read \
are skipped.";

/// One series per numeric column against the bucketed periods of `temporal`.
/// Rows without a period or with a NaN value are dropped from that series.
pub(crate) fn temporal_series(
    model: &ChartDataModel,
    temporal: &TemporalColumn,
    theme: &Theme,
) -> Result<Vec<XySeries>, ChartError> {
    let periods = temporal.periods()?;
    Ok(model
        .numeric_columns()
        .iter()
        .enumerate()
        .map(|(i, column)| XySeries {
            name: column.label().to_string(),
            color: theme.series_color(i),
            points: periods
                .iter()
                .zip(column.values())
                .filter_map(|(period, v)| {
                    let period = period.as_ref()?;
                    v.is_finite().then(|| (period.start_millis() as f64, *v))
                })
                .collect(),
        })
        .collect())
}

impl ChartStrategy for TimeSeriesStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn description(&self) -> &'static str {
        match self.style {
            XyStyle::Step => "Numeric columns over time, drawn as steps",
            _ => "Numeric columns over the first temporal column",
        }
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        let days = |n: i64| (0..n).map(move |d| start + Duration::days(d));
        vec![
            ExampleCase::new(
                "Daily prices",
                "A date column with two numeric series.",
                "SELECT trade_date, bid, ask FROM quotes WHERE symbol = 'ACME'",
                vec![
                    SimpleColumn::dates("TradeDate", days(6)),
                    SimpleColumn::doubles("Bid", [10.1, 10.4, 10.2, 10.9, 11.3, 11.0]),
                    SimpleColumn::doubles("Ask", [10.3, 10.6, 10.4, 11.1, 11.5, 11.2]),
                ],
            ),
            ExampleCase::new(
                "Hourly load",
                "Timestamps with one numeric column.",
                "SELECT sampled_at, load FROM server_stats ORDER BY sampled_at",
                vec![
                    SimpleColumn::timestamps(
                        "SampledAt",
                        (0..5).filter_map(|h| start.and_hms_opt(h, 0, 0)),
                    ),
                    SimpleColumn::doubles("Load", [0.42, 0.38, 0.51, 0.77, 0.64]),
                ],
            ),
        ]
    }

    fn is_quick_to_render(&self, rows: usize, numeric_columns: usize) -> bool {
        rows.saturating_mul(numeric_columns) < 100_000
    }

    fn figure(
        &self,
        _raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        let temporal = model
            .temporal_column()
            .ok_or_else(ChartFormatError::needs_temporal_column)?;
        require_numeric(model, 1)?;
        let plot = XyPlot {
            style: self.style,
            x_axis: XyAxis::Temporal,
            series: temporal_series(model, temporal, ctx.theme)?,
            x_title: temporal.label().to_string(),
            y_title: model.col_axis_title().to_string(),
        };
        Ok(Figure::new(ctx.theme, Plot::Xy(plot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::build_model;
    use crate::cursor::{CellValue, SimpleResultSet, SqlType};
    use crate::error::ModelError;

    fn render(columns: Vec<SimpleColumn>) -> Result<Figure, ChartError> {
        let mut rs = SimpleResultSet::new(columns).unwrap();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        TIME_SERIES.figure(&mut rs, &model, &RenderContext::new(&theme))
    }

    fn text_dates(values: &[&str]) -> SimpleColumn {
        SimpleColumn::new(
            "when",
            SqlType::Timestamp,
            values.iter().map(|s| CellValue::Text(s.to_string())).collect(),
        )
    }

    #[test]
    fn unreadable_rows_are_dropped_per_series() {
        let figure = render(vec![
            text_dates(&["2024-01-01 10:00:00", "not a time", "2024-01-01 12:00:00"]),
            SimpleColumn::doubles("a", [1.0, 2.0, 3.0]),
            SimpleColumn::doubles("b", [f64::NAN, 5.0, 6.0]),
        ])
        .unwrap();
        let Plot::Xy(plot) = figure.plot else {
            panic!("expected xy plot");
        };
        assert_eq!(plot.series[0].points.len(), 2);
        assert_eq!(plot.series[1].points.len(), 1);
        assert_eq!(plot.x_axis, XyAxis::Temporal);
    }

    #[test]
    fn no_readable_rows_is_an_error() {
        let err = render(vec![
            text_dates(&["soon", "later"]),
            SimpleColumn::doubles("a", [1.0, 2.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ChartError::Model(ModelError::TemporalConversion { .. })
        ));
    }

    #[test]
    fn missing_time_column_is_a_format_error() {
        let err = render(vec![SimpleColumn::doubles("a", [1.0])]).unwrap_err();
        assert!(err.as_format().is_some());
    }
}
