//! Rendering strategies: the closed catalogue of chart kinds, the contract each
//! one implements, and the stateful view that holds a rendered figure.

mod blank;
mod bubble;
mod candlestick;
mod category;
mod example;
pub mod figure;
mod graph;
mod heat_map;
mod histogram;
mod pie;
mod scatter;
mod table;
mod time_series;

pub use example::ExampleCase;
pub use figure::{Figure, Plot};
pub use graph::{dot_available, to_dot};
pub use table::{COLOR_HINT_BACKGROUND, COLOR_HINT_FOREGROUND};

use std::fmt;

use crate::chart_data::ChartDataModel;
use crate::config::{Theme, DEFAULT_CHART_ROW_LIMIT, DEFAULT_HISTOGRAM_BINS};
use crate::cursor::TabularCursor;
use crate::error::{ChartError, ChartFormatError};

/// Every chart kind, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    Bar,
    StackedBar,
    Line,
    Area,
    Pie,
    Scatter,
    Bubble,
    TimeSeries,
    Step,
    Histogram,
    HeatMap,
    Candlestick,
    DirectedGraph,
    Table,
    NoRender,
}

impl StrategyKind {
    pub const ALL: [Self; 15] = [
        Self::Bar,
        Self::StackedBar,
        Self::Line,
        Self::Area,
        Self::Pie,
        Self::Scatter,
        Self::Bubble,
        Self::TimeSeries,
        Self::Step,
        Self::Histogram,
        Self::HeatMap,
        Self::Candlestick,
        Self::DirectedGraph,
        Self::Table,
        Self::NoRender,
    ];

    /// Stable kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::StackedBar => "stacked-bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
            Self::TimeSeries => "time-series",
            Self::Step => "step",
            Self::Histogram => "histogram",
            Self::HeatMap => "heat-map",
            Self::Candlestick => "candlestick",
            Self::DirectedGraph => "directed-graph",
            Self::Table => "table",
            Self::NoRender => "no-render",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Bar => "Bar Chart",
            Self::StackedBar => "Stacked Bar Chart",
            Self::Line => "Line Chart",
            Self::Area => "Area Chart",
            Self::Pie => "Pie Chart",
            Self::Scatter => "Scatter Plot",
            Self::Bubble => "Bubble Chart",
            Self::TimeSeries => "Time Series",
            Self::Step => "Step Chart",
            Self::Histogram => "Histogram",
            Self::HeatMap => "Heat Map",
            Self::Candlestick => "Candlestick",
            Self::DirectedGraph => "Directed Graph",
            Self::Table => "Table",
            Self::NoRender => "No Render",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// The stateless handler for this kind.
    pub fn strategy(self) -> &'static dyn ChartStrategy {
        match self {
            Self::Bar => &category::BAR,
            Self::StackedBar => &category::STACKED_BAR,
            Self::Line => &category::LINE,
            Self::Area => &category::AREA,
            Self::Pie => &pie::PIE,
            Self::Scatter => &scatter::SCATTER,
            Self::Bubble => &bubble::BUBBLE,
            Self::TimeSeries => &time_series::TIME_SERIES,
            Self::Step => &time_series::STEP,
            Self::Histogram => &histogram::HISTOGRAM,
            Self::HeatMap => &heat_map::HEAT_MAP,
            Self::Candlestick => &candlestick::CANDLESTICK,
            Self::DirectedGraph => &graph::DIRECTED_GRAPH,
            Self::Table => &table::TABLE,
            Self::NoRender => &blank::NO_RENDER,
        }
    }

    /// A fresh view bound to `theme`.
    pub fn view(self, theme: &Theme) -> ChartView {
        ChartView::new(self, theme.clone())
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every strategy handler, in catalogue order.
pub fn registry() -> impl Iterator<Item = &'static dyn ChartStrategy> {
    StrategyKind::ALL.into_iter().map(StrategyKind::strategy)
}

/// Inputs a strategy reads besides the data.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    /// Display row cap for strategies that truncate. None = unlimited.
    pub row_limit: Option<usize>,
    pub histogram_bins: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            row_limit: Some(DEFAULT_CHART_ROW_LIMIT),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Shared contract of every chart kind.
pub trait ChartStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// One-line summary for listings.
    fn description(&self) -> &'static str;

    /// Plain-text description of the column shape this strategy needs.
    fn format_explanation(&self) -> &'static str;

    /// Markdown documentation: the format explanation followed by the examples.
    fn format_explanation_rich(&self) -> String {
        let mut out = format!(
            "## {}\n\n{}\n",
            self.kind().title(),
            self.format_explanation()
        );
        let examples = self.examples();
        if !examples.is_empty() {
            out.push_str("\n### Examples\n");
        }
        for example in examples {
            out.push_str(&format!(
                "\n**{}**: {}\n\n```sql\n{}\n```\n",
                example.name, example.description, example.query
            ));
        }
        out
    }

    /// Fixtures in the shape this strategy expects.
    fn examples(&self) -> Vec<ExampleCase>;

    /// Cheap enough to draw without asking the user first. Pure.
    fn is_quick_to_render(&self, rows: usize, numeric_columns: usize) -> bool;

    /// Validate the model against this strategy's shape and transform it.
    fn figure(
        &self,
        raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError>;
}

/// A view that can be refreshed with new data.
pub trait UpdateableView {
    /// Re-validate and redraw. On error the previous figure is discarded.
    fn update(
        &mut self,
        raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
    ) -> Result<(), ChartError>;

    fn figure(&self) -> Option<&Figure>;
}

/// Stateful view for one strategy and theme.
#[derive(Debug, Clone)]
pub struct ChartView {
    kind: StrategyKind,
    theme: Theme,
    row_limit: Option<usize>,
    histogram_bins: usize,
    figure: Option<Figure>,
}

impl ChartView {
    pub fn new(kind: StrategyKind, theme: Theme) -> Self {
        Self {
            kind,
            theme,
            row_limit: Some(DEFAULT_CHART_ROW_LIMIT),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            figure: None,
        }
    }

    pub fn with_row_limit(mut self, row_limit: Option<usize>) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn take_figure(&mut self) -> Option<Figure> {
        self.figure.take()
    }
}

impl UpdateableView for ChartView {
    fn update(
        &mut self,
        raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
    ) -> Result<(), ChartError> {
        let ctx = RenderContext {
            theme: &self.theme,
            row_limit: self.row_limit,
            histogram_bins: self.histogram_bins,
        };
        let result = self.kind.strategy().figure(raw, model, &ctx);
        match result {
            Ok(figure) => {
                self.figure = Some(figure);
                Ok(())
            }
            Err(e) => {
                self.figure = None;
                Err(e)
            }
        }
    }

    fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }
}

/// Fail unless the model has at least `min` numeric columns.
pub(crate) fn require_numeric(model: &ChartDataModel, min: usize) -> Result<(), ChartFormatError> {
    if model.numeric_column_count() < min {
        return Err(ChartFormatError::needs_numeric_columns(min));
    }
    Ok(())
}
