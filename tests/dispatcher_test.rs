mod common;

use tabchart::config::AppConfig;
use tabchart::dispatcher::Display;
use tabchart::strategy::figure::Plot;
use tabchart::{RenderDispatcher, SimpleColumn, StrategyKind, Theme};

use common::{gdp_result, result_set};

fn wide_result(rows: usize) -> Box<tabchart::SimpleResultSet> {
    Box::new(result_set(vec![
        SimpleColumn::doubles("a", (0..rows).map(|i| i as f64)),
        SimpleColumn::doubles("b", (0..rows).map(|i| (i * 2) as f64)),
    ]))
}

#[test]
fn test_gate_decision_is_deterministic() {
    let mut first = RenderDispatcher::new(StrategyKind::Pie, Theme::default());
    let mut second = RenderDispatcher::new(StrategyKind::Pie, Theme::default());
    first.set_result(wide_result(800));
    second.set_result(wide_result(800));
    assert_eq!(first.display(), second.display());
    assert_eq!(
        first.display(),
        &Display::TooLarge {
            rows: 800,
            numeric_columns: 2
        }
    );
    assert_eq!(first.would_gate(800, 2), second.would_gate(800, 2));
}

#[test]
fn test_confirmation_applies_to_one_result() {
    let mut d = RenderDispatcher::new(StrategyKind::Line, Theme::default());
    d.set_result(wide_result(6_000));
    assert!(matches!(d.display(), Display::TooLarge { .. }));

    d.confirm_large_render();
    assert!(matches!(d.display(), Display::Chart(_)));

    d.set_result(wide_result(6_000));
    assert!(matches!(d.display(), Display::TooLarge { .. }));
}

#[test]
fn test_config_can_lift_the_gate() {
    let mut config = AppConfig::default();
    config.chart.render_unrestricted = true;
    let mut d = RenderDispatcher::from_config(StrategyKind::Line, &config).unwrap();
    d.set_result(wide_result(6_000));
    assert!(matches!(d.display(), Display::Chart(_)));
}

#[test]
fn test_shape_errors_show_help_with_reason_and_example() {
    let mut d = RenderDispatcher::new(StrategyKind::Bubble, Theme::default());
    d.set_result(Box::new(gdp_result()));
    let Display::FormatHelp(help) = d.display() else {
        panic!("expected format help, got {:?}", d.display());
    };
    assert_eq!(help.kind, StrategyKind::Bubble);
    assert_eq!(
        help.reason.as_deref(),
        Some("at least three numeric columns required for X/Y/size")
    );
    assert!(help.example.is_some());
    assert!(!help.explanation.is_empty());
}

#[test]
fn test_transpose_swaps_pie_orientation() {
    let mut d = RenderDispatcher::new(StrategyKind::Pie, Theme::default());
    d.set_result(Box::new(result_set(vec![
        SimpleColumn::text("Item", ["a", "b"]),
        SimpleColumn::doubles("x", [1.0, 2.0]),
        SimpleColumn::doubles("y", [3.0, 4.0]),
        SimpleColumn::doubles("z", [5.0, 6.0]),
    ])));
    let pies = |d: &RenderDispatcher| match d.display().figure().map(|f| &f.plot) {
        Some(Plot::Pie(p)) => p.pies.len(),
        other => panic!("expected pies, got {other:?}"),
    };
    assert_eq!(pies(&d), 3);
    d.set_transpose(true);
    assert_eq!(pies(&d), 2);
}

#[test]
fn test_switching_strategies_reuses_the_result() {
    let mut d = RenderDispatcher::new(StrategyKind::Pie, Theme::default());
    d.set_result(Box::new(gdp_result()));
    assert!(matches!(d.display(), Display::Chart(_)));
    d.set_strategy(StrategyKind::Scatter);
    assert!(matches!(d.display(), Display::FormatHelp(_)));
    d.set_strategy(StrategyKind::Table);
    assert!(matches!(d.display(), Display::Chart(_)));
    assert_eq!(d.model().map(|m| m.row_count()), Some(9));
}

#[test]
fn test_theme_reapply_keeps_the_same_display() {
    for strategy in tabchart::strategy::registry() {
        let Some(example) = strategy.examples().into_iter().next() else {
            continue;
        };
        let mut d = RenderDispatcher::new(strategy.kind(), Theme::default());
        d.set_result(Box::new(example.cursor()));
        let before = d.display().clone();
        d.set_theme(Theme::default());
        assert_eq!(&before, d.display(), "{}", strategy.kind());
    }
}
