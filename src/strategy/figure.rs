//! Toolkit-independent visual shapes produced by the strategies.
//!
//! A [`Figure`] is pure data: the terminal widget and the PNG exporter both
//! draw from it, and two renders of the same model compare equal.

use crate::config::{Rgb, Theme};

/// Colours every figure carries, taken from the theme at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureColors {
    pub foreground: Rgb,
    pub background: Rgb,
    pub alternate: Rgb,
    pub selected: Rgb,
}

impl FigureColors {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            foreground: theme.foreground,
            background: theme.background,
            alternate: theme.alternate,
            selected: theme.selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub colors: FigureColors,
    pub show_legend: bool,
    pub plot: Plot,
}

impl Figure {
    pub fn new(theme: &Theme, plot: Plot) -> Self {
        Self {
            colors: FigureColors::from_theme(theme),
            show_legend: theme.show_legend,
            plot,
        }
    }

    /// Rows hidden from this figure, if the strategy truncated for display.
    pub fn truncation(&self) -> Option<TruncationNotice> {
        match &self.plot {
            Plot::Table(t) => t.truncated,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    Category(CategoryPlot),
    Pie(PiePlot),
    Xy(XyPlot),
    Bubble(BubblePlot),
    Histogram(HistogramPlot),
    HeatMap(HeatMapPlot),
    Candlestick(CandlestickPlot),
    Graph(GraphPlot),
    Table(TablePlot),
    Blank,
}

/// A named series of values with its palette colour. Missing values stay in
/// place as NaN so every value lines up with its category.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: Rgb,
    pub values: Vec<f64>,
}

/// Missing values (NaN) compare equal to each other.
impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.color == other.color
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStyle {
    Bar,
    StackedBar,
    Line,
    Area,
}

/// Category axis label. Labels that are not `full_size` are drawn small or
/// skipped so long axes stay readable.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLabel {
    pub text: String,
    pub full_size: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPlot {
    pub style: CategoryStyle,
    pub categories: Vec<CategoryLabel>,
    pub series: Vec<Series>,
    pub x_title: String,
    pub y_title: String,
}

impl CategoryPlot {
    /// (min, max) of the value axis, always including zero. Stacked bars use
    /// the per-category positive and negative totals.
    pub fn value_range(&self) -> (f64, f64) {
        let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
        if self.style == CategoryStyle::StackedBar {
            for i in 0..self.categories.len() {
                let values = self
                    .series
                    .iter()
                    .filter_map(|s| s.values.get(i))
                    .filter(|v| v.is_finite());
                let (neg, pos) = values.fold((0.0, 0.0), |(n, p), v| {
                    if *v < 0.0 {
                        (n + v, p)
                    } else {
                        (n, p + v)
                    }
                });
                lo = lo.min(neg);
                hi = hi.max(pos);
            }
        } else {
            let values = self.series.iter().flat_map(|s| s.values.iter());
            for v in values.filter(|v| v.is_finite()) {
                lo = lo.min(*v);
                hi = hi.max(*v);
            }
        }
        (lo, hi)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pie {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl Pie {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiePlot {
    pub pies: Vec<Pie>,
    /// The input was one wide row, so columns became slices.
    pub transposed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyStyle {
    Scatter,
    Line,
    Step,
}

/// Meaning of X values in an [`XyPlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyAxis {
    Numeric,
    /// X values are milliseconds since the Unix epoch.
    Temporal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyPlot {
    pub style: XyStyle,
    pub x_axis: XyAxis,
    pub series: Vec<XySeries>,
    pub x_title: String,
    pub y_title: String,
}

impl XyPlot {
    /// Bounds over every point, or None when no series has a point.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.series.iter().flat_map(|s| s.points.iter().copied()))
    }
}

/// Horizontal-then-vertical path through `points`, for step charts.
pub fn step_path(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut path = Vec::with_capacity(points.len() * 2);
    for (i, &(x, y)) in points.iter().enumerate() {
        if i > 0 {
            path.push((x, points[i - 1].1));
        }
        path.push((x, y));
    }
    path
}

/// Compact axis label for a value.
pub fn format_number(v: f64) -> String {
    if v.abs() >= 1e6 || (v != 0.0 && v.abs() < 1e-3) {
        format!("{:.2e}", v)
    } else if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Axis-aligned data bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn of_points(points: impl Iterator<Item = (f64, f64)>) -> Option<Self> {
        points
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |acc: Option<Bounds>, (x, y)| {
                Some(match acc {
                    None => Bounds {
                        x_min: x,
                        x_max: x,
                        y_min: y,
                        y_max: y,
                    },
                    Some(b) => Bounds {
                        x_min: b.x_min.min(x),
                        x_max: b.x_max.max(x),
                        y_min: b.y_min.min(y),
                        y_max: b.y_max.max(y),
                    },
                })
            })
    }

    /// Widen degenerate ranges so they can be used as axis extents.
    pub fn padded(self) -> Self {
        let pad = |lo: f64, hi: f64| {
            if hi > lo {
                let margin = (hi - lo) * 0.05;
                (lo - margin, hi + margin)
            } else {
                (lo - 1.0, hi + 1.0)
            }
        };
        let (x_min, x_max) = pad(self.x_min, self.x_max);
        let (y_min, y_max) = pad(self.y_min, self.y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubblePoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubblePlot {
    pub points: Vec<BubblePoint>,
    pub color: Rgb,
    pub x_title: String,
    pub y_title: String,
    pub size_title: String,
}

impl BubblePlot {
    pub fn max_size(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.size.abs())
            .filter(|s| s.is_finite())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub name: String,
    pub color: Rgb,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    pub series: Vec<HistogramSeries>,
}

/// Node of the heat-map tree. Branch sizes are the sum of their children.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatNode {
    pub label: String,
    /// Non-negative and finite; unusable sizes are stored as 0.
    pub size: f64,
    /// Colour measure; None for branches and for leaves without a finite value.
    pub color_value: Option<f64>,
    pub children: Vec<HeatNode>,
}

impl HeatNode {
    pub fn branch(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            size: 0.0,
            color_value: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(HeatNode::leaf_count).sum()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatMapPlot {
    pub root: HeatNode,
    pub size_title: String,
    pub color_title: String,
    /// (min, max) of the finite colour values.
    pub color_range: (f64, f64),
    pub low: Rgb,
    pub high: Rgb,
}

impl HeatMapPlot {
    /// Leaf colour on the low..high gradient; the midpoint when unknown.
    pub fn color_for(&self, value: Option<f64>) -> Rgb {
        let (lo, hi) = self.color_range;
        match value {
            Some(v) if hi > lo => self.low.mix(self.high, (v - lo) / (hi - lo)),
            _ => self.low.mix(self.high, 0.5),
        }
    }
}

/// Rectangle in unit coordinates (0..1 on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreemapCell {
    pub label: String,
    pub depth: usize,
    pub rect: UnitRect,
    pub color_value: Option<f64>,
    pub leaf: bool,
}

/// Slice-and-dice treemap: each level splits its parent's rectangle along
/// alternating axes in proportion to the children's sizes.
pub fn layout_treemap(root: &HeatNode) -> Vec<TreemapCell> {
    let mut cells = Vec::new();
    let full = UnitRect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };
    for (child, rect) in split(&root.children, full, 0) {
        place(child, rect, 0, &mut cells);
    }
    cells
}

fn weight(node: &HeatNode) -> f64 {
    if node.size.is_finite() && node.size > 0.0 {
        node.size
    } else {
        0.0
    }
}

fn split(children: &[HeatNode], rect: UnitRect, depth: usize) -> Vec<(&HeatNode, UnitRect)> {
    let total: f64 = children.iter().map(weight).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let horizontal = depth % 2 == 0;
    let mut offset = 0.0;
    children
        .iter()
        .filter(|c| weight(c) > 0.0)
        .map(|child| {
            let share = weight(child) / total;
            let r = if horizontal {
                UnitRect {
                    x: rect.x + offset * rect.w,
                    y: rect.y,
                    w: share * rect.w,
                    h: rect.h,
                }
            } else {
                UnitRect {
                    x: rect.x,
                    y: rect.y + offset * rect.h,
                    w: rect.w,
                    h: share * rect.h,
                }
            };
            offset += share;
            (child, r)
        })
        .collect()
}

fn place(node: &HeatNode, rect: UnitRect, depth: usize, cells: &mut Vec<TreemapCell>) {
    cells.push(TreemapCell {
        label: node.label.clone(),
        depth,
        rect,
        color_value: node.color_value,
        leaf: node.is_leaf(),
    });
    for (child, r) in split(&node.children, rect, depth + 1) {
        place(child, r, depth + 1, cells);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Candle {
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }
}

/// Date-axis tick spacing chosen from the plotted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickUnit {
    Hour,
    Day,
    Week,
    Month,
}

impl TickUnit {
    /// Approximate tick spacing in milliseconds.
    pub fn millis(self) -> i64 {
        const HOUR: i64 = 3_600_000;
        match self {
            Self::Hour => HOUR,
            Self::Day => 24 * HOUR,
            Self::Week => 7 * 24 * HOUR,
            Self::Month => 30 * 24 * HOUR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickPlot {
    pub title: String,
    pub candles: Vec<Candle>,
    pub tick_unit: TickUnit,
    pub has_volume: bool,
    pub rising: Rgb,
    pub falling: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: Option<String>,
    pub connector: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphPlot {
    /// Graphviz DOT description of the graph.
    pub dot: String,
    pub edges: Vec<Edge>,
}

/// Notice that a strategy showed fewer rows than the result holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationNotice {
    pub shown: usize,
    pub total: usize,
}

impl std::fmt::Display for TruncationNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Showing {} of {} rows; some rows not shown",
            self.shown, self.total
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowColors {
    pub background: Option<Rgb>,
    pub foreground: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePlot {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_colors: Vec<RowColors>,
    pub truncated: Option<TruncationNotice>,
}
