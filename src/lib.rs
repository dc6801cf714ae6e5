//! tabchart: turn a tabular query result into a chart.
//!
//! A result is read through [`cursor::TabularCursor`], classified into a
//! [`chart_data::ChartDataModel`], and handed to one of the strategies in
//! [`strategy`]. [`dispatcher::RenderDispatcher`] ties these together for an
//! interactive host; [`chart_export`] and [`widgets`] draw the resulting
//! figure as a PNG or into a terminal buffer.

use std::env;
use std::sync::OnceLock;

use log::LevelFilter;
use ratatui::buffer::Buffer;

pub mod chart_data;
pub mod chart_export;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod error;
pub mod error_display;
pub mod source;
pub mod strategy;
pub mod widgets;

pub use cli::Args;
pub use config::{AppConfig, ColorDepth, ColorParser, ConfigManager, Rgb, Theme};
pub use cursor::{CellValue, SimpleColumn, SimpleResultSet, SqlType, TabularCursor};
pub use dispatcher::{Display, RenderDispatcher};
pub use error::{ChartError, ChartFormatError};
pub use strategy::{ChartStrategy, ExampleCase, StrategyKind};

use strategy::registry;

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "tabchart";

static LOGGER: OnceLock<()> = OnceLock::new();

/// Install the env_logger backend once. `RUST_LOG` wins; otherwise this
/// crate logs at info and everything else at the env_logger default.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tabchart", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

/// One line per strategy: name and summary.
pub fn strategy_listing() -> String {
    let width = StrategyKind::ALL
        .iter()
        .map(|k| k.as_str().len())
        .max()
        .unwrap_or(0);
    registry()
        .map(|s| format!("{:<width$}  {}\n", s.kind().as_str(), s.description()))
        .collect()
}

/// Render one example fixture through a fresh dispatcher.
pub fn render_example(
    kind: StrategyKind,
    example: &ExampleCase,
    theme: &Theme,
    size: (u16, u16),
    depth: ColorDepth,
) -> Buffer {
    let mut dispatcher = RenderDispatcher::new(kind, theme.clone());
    dispatcher.set_render_unrestricted(true);
    dispatcher.set_result(Box::new(example.cursor()));
    widgets::render_to_buffer(dispatcher.display(), size, depth)
}
