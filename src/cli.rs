//! Command-line surface. The argument definitions live in the `tabchart-cli`
//! crate; this module maps them onto engine types.

pub use tabchart_cli::{parse_size, Args, FileFormat, StrategyArg};

use crate::strategy::StrategyKind;

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Bar => Self::Bar,
            StrategyArg::StackedBar => Self::StackedBar,
            StrategyArg::Line => Self::Line,
            StrategyArg::Area => Self::Area,
            StrategyArg::Pie => Self::Pie,
            StrategyArg::Scatter => Self::Scatter,
            StrategyArg::Bubble => Self::Bubble,
            StrategyArg::TimeSeries => Self::TimeSeries,
            StrategyArg::Step => Self::Step,
            StrategyArg::Histogram => Self::Histogram,
            StrategyArg::HeatMap => Self::HeatMap,
            StrategyArg::Candlestick => Self::Candlestick,
            StrategyArg::DirectedGraph => Self::DirectedGraph,
            StrategyArg::Table => Self::Table,
            StrategyArg::NoRender => Self::NoRender,
        }
    }
}
