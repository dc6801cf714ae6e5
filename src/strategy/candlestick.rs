use chrono::{Duration, NaiveDate};

use super::figure::{Candle, CandlestickPlot, Figure, Plot, TickUnit};
use super::{ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::temporal::to_epoch_millis;
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::{ChartError, ChartFormatError};

pub struct CandlestickStrategy;

pub static CANDLESTICK: CandlestickStrategy = CandlestickStrategy;

const FORMAT: &str = "Needs a date or timestamp column plus numeric columns named high \
and low. Columns named open and close are used when present: a missing one copies the \
other, and when both are missing they copy high. A numeric column named volume adds a \
volume chart underneath.";

/// Tick spacing for a plotted span, keeping the tick count bounded.
pub fn tick_unit_for_span(span: Duration) -> TickUnit {
    if span <= Duration::days(1) {
        TickUnit::Hour
    } else if span <= Duration::days(10) {
        TickUnit::Day
    } else if span <= Duration::days(60) {
        TickUnit::Week
    } else {
        TickUnit::Month
    }
}

impl ChartStrategy for CandlestickStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Candlestick
    }

    fn description(&self) -> &'static str {
        "Open/high/low/close candles over time"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        let start = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap_or_default();
        let days = |n: i64| (0..n).map(move |d| start + Duration::days(d));
        vec![
            ExampleCase::new(
                "Daily OHLC with volume",
                "All four prices plus a volume column.",
                "SELECT day, open, high, low, close, volume FROM prices WHERE symbol = 'ACME'",
                vec![
                    SimpleColumn::dates("Day", days(5)),
                    SimpleColumn::doubles("Open", [100.0, 102.5, 101.0, 104.0, 103.2]),
                    SimpleColumn::doubles("High", [103.0, 104.0, 105.5, 106.0, 104.1]),
                    SimpleColumn::doubles("Low", [99.0, 100.5, 100.2, 102.8, 101.0]),
                    SimpleColumn::doubles("Close", [102.5, 101.0, 104.0, 103.2, 101.9]),
                    SimpleColumn::integers("Volume", [12_000, 9_500, 15_200, 11_000, 8_700]),
                ],
            ),
            ExampleCase::new(
                "High and low only",
                "Open and close default to the high price.",
                "SELECT day, max(price) AS high, min(price) AS low FROM ticks GROUP BY day",
                vec![
                    SimpleColumn::dates("Day", days(3)),
                    SimpleColumn::doubles("High", [10.0, 11.0, 10.5]),
                    SimpleColumn::doubles("Low", [9.0, 9.8, 9.9]),
                ],
            ),
        ]
    }

    fn is_quick_to_render(&self, rows: usize, _numeric_columns: usize) -> bool {
        rows < 10_000
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
        let high = model
            .numeric_column("high")
            .ok_or_else(|| ChartFormatError::needs_named_column("high"))?;
        let low = model
            .numeric_column("low")
            .ok_or_else(|| ChartFormatError::needs_named_column("low"))?;
        let (open, close) = match (model.numeric_column("open"), model.numeric_column("close")) {
            (Some(o), Some(c)) => (o, c),
            (Some(o), None) => (o, o),
            (None, Some(c)) => (c, c),
            (None, None) => (high, high),
        };
        let volume = model.numeric_column("volume");
        let dates = temporal.dates()?;

        let candles: Vec<Candle> = dates
            .iter()
            .enumerate()
            .filter_map(|(row, date)| {
                let candle = Candle {
                    time: to_epoch_millis((*date)?),
                    open: open.values()[row],
                    high: high.values()[row],
                    low: low.values()[row],
                    close: close.values()[row],
                    volume: volume.map(|v| v.values()[row]).filter(|v| v.is_finite()),
                };
                [candle.open, candle.high, candle.low, candle.close]
                    .iter()
                    .all(|v| v.is_finite())
                    .then_some(candle)
            })
            .collect();

        let span = match (
            candles.iter().map(|c| c.time).min(),
            candles.iter().map(|c| c.time).max(),
        ) {
            (Some(lo), Some(hi)) => Duration::milliseconds(hi - lo),
            _ => Duration::zero(),
        };

        let plot = CandlestickPlot {
            title: model.col_axis_title().to_string(),
            candles,
            tick_unit: tick_unit_for_span(span),
            has_volume: volume.is_some(),
            rising: ctx.theme.series_color(2),
            falling: ctx.theme.series_color(3),
        };
        Ok(Figure::new(ctx.theme, Plot::Candlestick(plot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_unit_boundaries() {
        assert_eq!(tick_unit_for_span(Duration::hours(24)), TickUnit::Hour);
        assert_eq!(tick_unit_for_span(Duration::hours(25)), TickUnit::Day);
        assert_eq!(tick_unit_for_span(Duration::days(10)), TickUnit::Day);
        assert_eq!(tick_unit_for_span(Duration::days(60)), TickUnit::Week);
        assert_eq!(tick_unit_for_span(Duration::days(61)), TickUnit::Month);
    }
}
