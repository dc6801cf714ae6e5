mod common;

use std::fs;

use tabchart::chart_export::{export_png, write_figure_png, ExportOptions};
use tabchart::config::ExportConfig;
use tabchart::strategy::figure::Plot;
use tabchart::strategy::{Figure, RenderContext};
use tabchart::{StrategyKind, Theme};
use tempfile::TempDir;

use common::gdp_result;

#[test]
fn test_zero_size_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.png");
    let figure = Figure::new(&Theme::default(), Plot::Blank);
    let err = write_figure_png(&path, &figure, (0, 480), false).unwrap_err();
    assert!(err.to_string().contains("non-zero"));
    assert!(!path.exists());
}

#[test]
fn test_blank_figure_writes_a_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.png");
    let figure = Figure::new(&Theme::default(), Plot::Blank);
    write_figure_png(&path, &figure, (64, 48), false).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn test_shape_errors_are_reported_before_drawing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scatter.png");
    let theme = Theme::default();
    let mut rs = gdp_result();
    let err = export_png(
        &path,
        StrategyKind::Scatter,
        &mut rs,
        &RenderContext::new(&theme),
        (320, 240),
        false,
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .contains("at least two numeric columns required"));
    assert!(!path.exists());
}

#[test]
fn test_options_follow_config() {
    let config = ExportConfig {
        width: 800,
        height: 600,
        watermark: true,
    };
    let options = ExportOptions::from_config(&config);
    assert_eq!(options.size(), (800, 600));
    assert!(options.watermark);
}
