//! Render dispatcher: owns the selected strategy and theme, caches the last
//! result and model, gates slow renders, and turns failures into panels.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use log::{debug, error, warn};

use crate::chart_data::{build_model, ChartDataModel};
use crate::config::{AppConfig, Theme, DEFAULT_CHART_ROW_LIMIT, DEFAULT_HISTOGRAM_BINS};
use crate::cursor::TabularCursor;
use crate::error::{ChartError, CursorError};
use crate::error_display::user_message_from_chart_error;
use crate::strategy::{Figure, StrategyKind, UpdateableView};

/// Points at a runnable example of a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRef {
    pub kind: StrategyKind,
    pub name: &'static str,
}

/// Shown instead of a chart when the data does not fit the strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatHelp {
    pub kind: StrategyKind,
    /// Why the data was rejected. None for the generic panel shown after an
    /// unexpected failure.
    pub reason: Option<String>,
    pub explanation: String,
    pub example: Option<ExampleRef>,
}

impl FormatHelp {
    fn new(kind: StrategyKind, reason: Option<String>) -> Self {
        let strategy = kind.strategy();
        Self {
            kind,
            reason,
            explanation: strategy.format_explanation().to_string(),
            example: strategy.examples().first().map(|e| ExampleRef {
                kind,
                name: e.name,
            }),
        }
    }
}

/// What the dispatcher currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    Empty,
    Chart(Figure),
    /// Rendering would be slow; waiting for [`RenderDispatcher::confirm_large_render`].
    TooLarge {
        rows: usize,
        numeric_columns: usize,
    },
    FormatHelp(FormatHelp),
    QueryFailed {
        message: String,
    },
}

impl Display {
    pub fn figure(&self) -> Option<&Figure> {
        match self {
            Self::Chart(figure) => Some(figure),
            _ => None,
        }
    }
}

pub type BoxedCursor = Box<dyn TabularCursor + Send>;

pub struct RenderDispatcher {
    kind: StrategyKind,
    theme: Theme,
    row_limit: Option<usize>,
    histogram_bins: usize,
    transpose: bool,
    unrestricted: bool,
    confirmed: bool,
    raw: Option<BoxedCursor>,
    model: Option<Result<ChartDataModel, ChartError>>,
    query_error: Option<String>,
    display: Display,
}

impl RenderDispatcher {
    pub fn new(kind: StrategyKind, theme: Theme) -> Self {
        Self {
            kind,
            theme,
            row_limit: Some(DEFAULT_CHART_ROW_LIMIT),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            transpose: false,
            unrestricted: false,
            confirmed: false,
            raw: None,
            model: None,
            query_error: None,
            display: Display::Empty,
        }
    }

    /// Dispatcher configured from the chart and theme sections of `config`.
    pub fn from_config(kind: StrategyKind, config: &AppConfig) -> color_eyre::Result<Self> {
        let mut dispatcher = Self::new(kind, Theme::from_config(&config.theme)?);
        dispatcher.row_limit = config.chart.row_limit;
        dispatcher.histogram_bins = config.chart.histogram_bins;
        dispatcher.unrestricted = config.chart.render_unrestricted;
        Ok(dispatcher)
    }

    pub fn strategy(&self) -> StrategyKind {
        self.kind
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// The model of the current result, if it was built successfully.
    pub fn model(&self) -> Option<&ChartDataModel> {
        self.model.as_ref().and_then(|m| m.as_ref().ok())
    }

    /// Take a new result, replacing the cached one and any pending confirmation.
    pub fn set_result(&mut self, mut raw: BoxedCursor) {
        let started = Instant::now();
        let built = catch_unwind(AssertUnwindSafe(|| build_model(raw.as_mut())));
        let model = match built {
            Ok(Ok(model)) => Ok(model),
            Ok(Err(e)) => {
                warn!("failed to build chart model: {}", e);
                Err(ChartError::from(e))
            }
            Err(_) => {
                error!("panic while building chart model");
                Err(ChartError::from(CursorError::Source(
                    "panic while reading result".into(),
                )))
            }
        };
        debug!("chart model built in {:?}", started.elapsed());
        self.raw = Some(raw);
        self.model = Some(model);
        self.query_error = None;
        self.confirmed = false;
        self.render();
    }

    /// Show a query failure instead of a result.
    pub fn set_query_error(&mut self, message: impl Into<String>) {
        self.raw = None;
        self.model = None;
        self.confirmed = false;
        self.query_error = Some(message.into());
        self.render();
    }

    /// Switch strategy and re-render the cached result.
    pub fn set_strategy(&mut self, kind: StrategyKind) {
        if kind != self.kind {
            self.confirmed = false;
        }
        self.kind = kind;
        self.render();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.render();
    }

    pub fn set_row_limit(&mut self, row_limit: Option<usize>) {
        self.row_limit = row_limit;
        self.render();
    }

    pub fn set_histogram_bins(&mut self, bins: usize) {
        self.histogram_bins = bins;
        self.render();
    }

    /// Render the transposed model (rows and numeric columns swapped).
    pub fn set_transpose(&mut self, transpose: bool) {
        self.transpose = transpose;
        self.render();
    }

    /// Skip the cost gate for every result.
    pub fn set_render_unrestricted(&mut self, unrestricted: bool) {
        self.unrestricted = unrestricted;
        self.render();
    }

    /// Skip the cost gate for the current result only.
    pub fn confirm_large_render(&mut self) {
        self.confirmed = true;
        self.render();
    }

    /// Whether the current strategy would gate a result of this size.
    pub fn would_gate(&self, rows: usize, numeric_columns: usize) -> bool {
        !self.unrestricted
            && !self.confirmed
            && !self.kind.strategy().is_quick_to_render(rows, numeric_columns)
    }

    fn render(&mut self) {
        self.display = self.compute_display();
    }

    fn compute_display(&mut self) -> Display {
        if let Some(message) = &self.query_error {
            return Display::QueryFailed {
                message: message.clone(),
            };
        }
        let (Some(raw), Some(model)) = (self.raw.as_mut(), self.model.as_ref()) else {
            return Display::Empty;
        };
        let model = match model {
            Ok(model) => model,
            Err(e) => {
                warn!(
                    "showing {} format help after model failure: {}",
                    self.kind,
                    user_message_from_chart_error(e)
                );
                return Display::FormatHelp(FormatHelp::new(self.kind, None));
            }
        };

        let transposed;
        let model = if self.transpose {
            match model.transpose() {
                Ok(t) => {
                    transposed = t;
                    &transposed
                }
                Err(e) => {
                    warn!("transpose failed: {}", e);
                    return Display::FormatHelp(FormatHelp::new(self.kind, None));
                }
            }
        } else {
            model
        };

        let rows = model.row_count();
        let numeric_columns = model.numeric_column_count();
        let gated = !self.unrestricted
            && !self.confirmed
            && !self.kind.strategy().is_quick_to_render(rows, numeric_columns);
        if gated {
            debug!(
                "{}: {} rows x {} numeric columns needs confirmation",
                self.kind, rows, numeric_columns
            );
            return Display::TooLarge {
                rows,
                numeric_columns,
            };
        }

        let started = Instant::now();
        let mut view = self
            .kind
            .view(&self.theme)
            .with_row_limit(self.row_limit)
            .with_histogram_bins(self.histogram_bins);
        let kind = self.kind;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let raw: &mut dyn TabularCursor = raw.as_mut();
            view.update(raw, model).map(|()| view.take_figure())
        }));
        let display = match outcome {
            Ok(Ok(Some(figure))) => Display::Chart(figure),
            Ok(Ok(None)) => Display::Empty,
            Ok(Err(ChartError::Format(e))) => {
                debug!("{}: {}", kind, e);
                Display::FormatHelp(FormatHelp::new(kind, Some(e.reason().to_string())))
            }
            Ok(Err(e)) => {
                warn!("{} failed to render: {}", kind, e);
                Display::FormatHelp(FormatHelp::new(kind, None))
            }
            Err(_) => {
                error!("{} panicked while rendering", kind);
                Display::FormatHelp(FormatHelp::new(kind, None))
            }
        };
        debug!("{} rendered in {:?}", kind, started.elapsed());
        display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{CellValue, SimpleColumn, SimpleResultSet, SqlType};

    fn boxed(columns: Vec<SimpleColumn>) -> BoxedCursor {
        Box::new(SimpleResultSet::new(columns).unwrap())
    }

    fn numbers(rows: usize, cols: usize) -> BoxedCursor {
        boxed(
            (0..cols)
                .map(|c| SimpleColumn::doubles(format!("c{c}"), (0..rows).map(|r| r as f64)))
                .collect(),
        )
    }

    /// Cursor whose cells blow up, standing in for a misbehaving upstream.
    struct PanickingCursor;

    impl TabularCursor for PanickingCursor {
        fn column_count(&self) -> usize {
            1
        }
        fn column_name(&self, _index: usize) -> Result<&str, CursorError> {
            Ok("boom")
        }
        fn column_type(&self, _index: usize) -> Result<SqlType, CursorError> {
            Ok(SqlType::Varchar)
        }
        fn before_first(&mut self) -> Result<(), CursorError> {
            Ok(())
        }
        fn next_row(&mut self) -> Result<bool, CursorError> {
            Ok(true)
        }
        fn cell(&self, _index: usize) -> Result<CellValue, CursorError> {
            panic!("upstream exploded")
        }
    }

    #[test]
    fn starts_empty() {
        let d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
        assert_eq!(d.display(), &Display::Empty);
    }

    #[test]
    fn large_results_wait_for_confirmation() {
        let mut d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
        d.set_result(numbers(5_000, 2));
        assert_eq!(
            d.display(),
            &Display::TooLarge {
                rows: 5_000,
                numeric_columns: 2
            }
        );
        d.confirm_large_render();
        assert!(d.display().figure().is_some());

        // A new result cancels the confirmation.
        d.set_result(numbers(5_000, 2));
        assert!(matches!(d.display(), Display::TooLarge { .. }));
    }

    #[test]
    fn unrestricted_skips_the_gate() {
        let mut d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
        d.set_render_unrestricted(true);
        d.set_result(numbers(5_000, 2));
        assert!(d.display().figure().is_some());
    }

    #[test]
    fn gating_is_deterministic() {
        let d = RenderDispatcher::new(StrategyKind::Pie, Theme::default());
        for (rows, cols) in [(10, 1), (699, 160), (700, 1), (5, 161)] {
            assert_eq!(d.would_gate(rows, cols), d.would_gate(rows, cols));
        }
        assert!(!d.would_gate(699, 160));
        assert!(d.would_gate(700, 1));
    }

    #[test]
    fn shape_errors_become_format_help() {
        let mut d = RenderDispatcher::new(StrategyKind::Scatter, Theme::default());
        d.set_result(boxed(vec![
            SimpleColumn::text("Country", ["UK"]),
            SimpleColumn::doubles("GDP", [3.1]),
        ]));
        let Display::FormatHelp(help) = d.display() else {
            panic!("expected format help, got {:?}", d.display());
        };
        assert_eq!(help.reason.as_deref(), Some("at least two numeric columns required"));
        assert_eq!(help.example.as_ref().map(|e| e.kind), Some(StrategyKind::Scatter));
    }

    #[test]
    fn switching_strategy_reuses_the_cached_result() {
        let mut d = RenderDispatcher::new(StrategyKind::Scatter, Theme::default());
        d.set_result(boxed(vec![
            SimpleColumn::text("Country", ["UK", "France"]),
            SimpleColumn::doubles("GDP", [3.1, 2.8]),
        ]));
        assert!(matches!(d.display(), Display::FormatHelp(_)));
        d.set_strategy(StrategyKind::Pie);
        assert!(d.display().figure().is_some());
    }

    #[test]
    fn query_failures_are_distinct() {
        let mut d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
        d.set_result(numbers(3, 1));
        d.set_query_error("relation \"sales\" does not exist");
        assert_eq!(
            d.display(),
            &Display::QueryFailed {
                message: "relation \"sales\" does not exist".into()
            }
        );
        d.set_strategy(StrategyKind::Line);
        assert!(matches!(d.display(), Display::QueryFailed { .. }));
    }

    #[test]
    fn panics_are_contained() {
        let mut d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
        d.set_result(Box::new(PanickingCursor));
        let Display::FormatHelp(help) = d.display() else {
            panic!("expected generic format help");
        };
        assert!(help.reason.is_none());
    }

    #[test]
    fn theme_changes_rerender() {
        let mut d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
        d.set_result(numbers(3, 1));
        let mut theme = Theme::default();
        theme.series = vec![crate::config::Rgb::new(1, 2, 3)];
        d.set_theme(theme.clone());
        let figure = d.display().figure().unwrap();
        let crate::strategy::Plot::Category(plot) = &figure.plot else {
            panic!("expected category plot");
        };
        assert_eq!(plot.series[0].color, theme.series[0]);
    }
}
