#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tabchart::chart_data::{build_model, ChartDataModel};
use tabchart::error::ChartError;
use tabchart::strategy::{Figure, RenderContext};
use tabchart::{SimpleColumn, SimpleResultSet, StrategyKind, Theme};
use tempfile::TempDir;

pub const COUNTRIES: [&str; 9] = [
    "United States",
    "China",
    "Japan",
    "Germany",
    "India",
    "United Kingdom",
    "France",
    "Italy",
    "Brazil",
];
pub const GDP: [f64; 9] = [25.46, 17.96, 4.23, 4.07, 3.39, 3.07, 2.78, 2.01, 1.92];

pub fn result_set(columns: Vec<SimpleColumn>) -> SimpleResultSet {
    SimpleResultSet::new(columns).expect("columns have equal lengths")
}

/// Country(text) and GDP(numeric), nine rows.
pub fn gdp_result() -> SimpleResultSet {
    result_set(vec![
        SimpleColumn::text("Country", COUNTRIES),
        SimpleColumn::doubles("GDP", GDP),
    ])
}

pub fn model_of(rs: &mut SimpleResultSet) -> ChartDataModel {
    build_model(rs).expect("model builds")
}

/// Build the model and run one strategy over it with the default theme.
pub fn render(kind: StrategyKind, columns: Vec<SimpleColumn>) -> Result<Figure, ChartError> {
    let mut rs = result_set(columns);
    let model = model_of(&mut rs);
    let theme = Theme::default();
    kind.strategy()
        .figure(&mut rs, &model, &RenderContext::new(&theme))
}

/// Write `content` to `name` inside a fresh temp dir.
pub fn write_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}
