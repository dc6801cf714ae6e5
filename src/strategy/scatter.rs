use chrono::{Duration, NaiveDate};

use super::figure::{Figure, Plot, XyAxis, XyPlot, XySeries, XyStyle};
use super::time_series::temporal_series;
use super::{ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::{ChartError, ChartFormatError};

pub struct ScatterStrategy;

pub static SCATTER: ScatterStrategy = ScatterStrategy;

const FORMAT: &str = "The first numeric column gives the X position and every other \
numeric column is drawn as its own series of Y values. With only one numeric column, \
a date or timestamp column is used as the X axis instead.";

impl ChartStrategy for ScatterStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Scatter
    }

    fn description(&self) -> &'static str {
        "First numeric column as X, the rest as Y series"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
        vec![
            ExampleCase::new(
                "Height and weight",
                "X from the first numeric column, Y from the second.",
                "SELECT name, height_cm, weight_kg FROM athletes",
                vec![
                    SimpleColumn::text("Name", ["Ana", "Ben", "Chloe", "Dev", "Eli"]),
                    SimpleColumn::doubles("Height", [162.0, 181.0, 170.5, 175.0, 168.0]),
                    SimpleColumn::doubles("Weight", [55.0, 82.5, 63.0, 71.0, 60.5]),
                ],
            ),
            ExampleCase::new(
                "Daily readings",
                "A single numeric column plotted against its dates.",
                "SELECT reading_date, value FROM sensor_readings",
                vec![
                    SimpleColumn::dates("ReadingDate", (0..5).map(|d| start + Duration::days(d))),
                    SimpleColumn::doubles("Value", [3.2, 4.1, 3.8, 5.0, 4.4]),
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
        let numeric = model.numeric_columns();
        if numeric.len() >= 2 {
            let x = &numeric[0];
            let series = numeric[1..]
                .iter()
                .enumerate()
                .map(|(i, y)| XySeries {
                    name: y.label().to_string(),
                    color: ctx.theme.series_color(i),
                    points: x
                        .values()
                        .iter()
                        .zip(y.values())
                        .filter(|(a, b)| a.is_finite() && b.is_finite())
                        .map(|(a, b)| (*a, *b))
                        .collect(),
                })
                .collect();
            let y_title = numeric[1..]
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", ");
            let plot = XyPlot {
                style: XyStyle::Scatter,
                x_axis: XyAxis::Numeric,
                series,
                x_title: x.label().to_string(),
                y_title,
            };
            return Ok(Figure::new(ctx.theme, Plot::Xy(plot)));
        }

        match model.temporal_column() {
            Some(temporal) if numeric.len() == 1 => {
                let plot = XyPlot {
                    style: XyStyle::Scatter,
                    x_axis: XyAxis::Temporal,
                    series: temporal_series(model, temporal, ctx.theme)?,
                    x_title: temporal.label().to_string(),
                    y_title: model.col_axis_title().to_string(),
                };
                Ok(Figure::new(ctx.theme, Plot::Xy(plot)))
            }
            _ => Err(ChartFormatError::needs_numeric_columns(2).into()),
        }
    }
}
