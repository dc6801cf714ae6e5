use super::figure::{Figure, HistogramBin, HistogramPlot, HistogramSeries, Plot};
use super::{require_numeric, ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::{ChartDataModel, NumericColumn};
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::ChartError;

pub struct HistogramStrategy;

pub static HISTOGRAM: HistogramStrategy = HistogramStrategy;

const FORMAT: &str = "Every numeric column is split into equal-width bins and drawn as \
its own distribution. Other columns are ignored.";

/// Equal-width bins over the finite values of `column`. A column holding a
/// single distinct value gets one unit-wide range centred on it.
pub fn bin_column(column: &NumericColumn, bins: usize) -> Vec<HistogramBin> {
    let Some((lo, hi)) = column.finite_range() else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in column.values().iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

impl ChartStrategy for HistogramStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Histogram
    }

    fn description(&self) -> &'static str {
        "Distribution of each numeric column"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        let response_ms = [
            112.0, 98.0, 143.0, 87.0, 156.0, 101.0, 99.0, 134.0, 121.0, 92.0, 188.0, 109.0, 117.0,
            95.0, 128.0, 104.0, 240.0, 111.0, 102.0, 97.0,
        ];
        vec![ExampleCase::new(
            "Response times",
            "One numeric column of measurements.",
            "SELECT response_ms FROM requests WHERE day = CURRENT_DATE",
            vec![SimpleColumn::doubles("ResponseMs", response_ms)],
        )]
    }

    fn is_quick_to_render(&self, rows: usize, numeric_columns: usize) -> bool {
        rows.saturating_mul(numeric_columns) < 2_000_000
    }

    fn figure(
        &self,
        _raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        require_numeric(model, 1)?;
        let series = model
            .numeric_columns()
            .iter()
            .enumerate()
            .map(|(i, column)| HistogramSeries {
                name: column.label().to_string(),
                color: ctx.theme.series_color(i),
                bins: bin_column(column, ctx.histogram_bins),
            })
            .collect();
        Ok(Figure::new(
            ctx.theme,
            Plot::Histogram(HistogramPlot { series }),
        ))
    }
}
