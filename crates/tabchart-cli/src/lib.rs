//! Shared CLI definitions for tabchart.
//!
//! Kept free of the chart engine so the argument surface can be documented and
//! tested without pulling in polars or plotters.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// File format for data files (used to bypass extension-based detection).
/// When `--format` is not specified, format is auto-detected from the file extension.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Parquet columnar format
    Parquet,
}

impl FileFormat {
    /// Detect file format from path extension. Returns None when extension is missing or unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse format from extension string (e.g. "parquet", "csv").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Rendering strategy selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum StrategyArg {
    /// Grouped bar chart, one bar per numeric column per row
    #[default]
    Bar,
    /// Bars for each row stacked on top of each other
    StackedBar,
    /// One line per numeric column across the row labels
    Line,
    /// Filled area per numeric column
    Area,
    /// One pie per numeric column
    Pie,
    /// First numeric column as X, the rest as Y series
    Scatter,
    /// X, Y and bubble size from three numeric columns
    Bubble,
    /// Numeric columns over the first temporal column
    TimeSeries,
    /// Like time-series, drawn as steps
    Step,
    /// Distribution of each numeric column
    Histogram,
    /// Nested treemap sized and coloured by numeric columns
    HeatMap,
    /// Open/high/low/close candles over time
    Candlestick,
    /// from/to edge list rendered as a directed graph
    DirectedGraph,
    /// Plain table of the raw result
    Table,
    /// Render nothing
    NoRender,
}

/// Command-line arguments for tabchart
#[derive(Clone, Parser, Debug)]
#[command(
    name = "tabchart",
    version,
    about = "Turn tabular query results into charts"
)]
pub struct Args {
    /// Path to a CSV, TSV or Parquet file holding the tabular result
    #[arg(required_unless_present_any = ["list", "explain", "examples", "generate_config"], value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Chart strategy used to render the result
    #[arg(short = 's', long = "strategy", value_enum, default_value_t = StrategyArg::Bar)]
    pub strategy: StrategyArg,

    /// Force file format instead of detecting it from the extension
    #[arg(long = "format", value_enum)]
    pub format: Option<FileFormat>,

    /// Specify that the file has no header
    #[arg(long = "no-header", action)]
    pub no_header: bool,

    /// Write the chart to this PNG file instead of printing a terminal preview
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export width in pixels (default from config, 1024)
    #[arg(long = "width")]
    pub width: Option<u32>,

    /// Export height in pixels (default from config, 768)
    #[arg(long = "height")]
    pub height: Option<u32>,

    /// Stamp a watermark onto exported images
    #[arg(long = "watermark", action)]
    pub watermark: bool,

    /// Render even when the data is estimated to be slow to draw
    #[arg(long = "unrestricted", action)]
    pub unrestricted: bool,

    /// Swap rows and numeric columns before rendering
    #[arg(long = "transpose", action)]
    pub transpose: bool,

    /// Maximum rows shown by the table strategy (overrides config chart.row_limit)
    #[arg(long = "row-limit", value_name = "N")]
    pub row_limit: Option<usize>,

    /// Terminal preview size as WIDTHxHEIGHT cells
    #[arg(long = "preview-size", value_name = "WxH", default_value = "100x30")]
    pub preview_size: String,

    /// List available strategies and exit
    #[arg(long = "list", action)]
    pub list: bool,

    /// Print the data format a strategy expects and exit
    #[arg(long = "explain", value_enum, value_name = "STRATEGY")]
    pub explain: Option<StrategyArg>,

    /// Print the example queries for a strategy and exit
    #[arg(long = "examples", value_enum, value_name = "STRATEGY")]
    pub examples: Option<StrategyArg>,

    /// Generate default configuration file at ~/.config/tabchart/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Parse a `WIDTHxHEIGHT` size string such as `100x30`.
pub fn parse_size(s: &str) -> Option<(u16, u16)> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let w = w.trim().parse().ok()?;
    let h = h.trim().parse().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_file_format_from_path() {
        assert_eq!(
            FileFormat::from_path(Path::new("data.parquet")),
            Some(FileFormat::Parquet)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("data.CSV")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("data.tsv")),
            Some(FileFormat::Tsv)
        );
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100x30"), Some((100, 30)));
        assert_eq!(parse_size(" 80 X 24 "), Some((80, 24)));
        assert_eq!(parse_size("0x10"), None);
        assert_eq!(parse_size("wide"), None);
    }

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_list_does_not_require_path() {
        let args = Args::try_parse_from(["tabchart", "--list"]).unwrap();
        assert!(args.list);
        assert!(args.path.is_none());
        assert!(Args::try_parse_from(["tabchart"]).is_err());
    }

    #[test]
    fn test_strategy_parses_kebab_case() {
        let args =
            Args::try_parse_from(["tabchart", "data.csv", "--strategy", "time-series"]).unwrap();
        assert_eq!(args.strategy, StrategyArg::TimeSeries);
    }
}
