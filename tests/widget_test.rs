mod common;

use tabchart::widgets::{render_to_buffer, write_buffer};
use tabchart::{ColorDepth, RenderDispatcher, StrategyKind, Theme};

use common::gdp_result;

fn screen(dispatcher: &RenderDispatcher, size: (u16, u16)) -> String {
    let buf = render_to_buffer(dispatcher.display(), size, ColorDepth::Monochrome);
    let mut out = Vec::new();
    write_buffer(&buf, &mut out, false).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_format_help_panel_explains_the_problem() {
    let mut d = RenderDispatcher::new(StrategyKind::Bubble, Theme::default());
    d.set_result(Box::new(gdp_result()));
    let text = screen(&d, (100, 24));
    assert!(text.contains("Bubble Chart: data does not fit"));
    assert!(text.contains("Problem: at least three numeric columns required for X/Y/size"));
    assert!(text.contains("Expected data"));
    assert!(text.contains("tabchart --examples bubble"));
}

#[test]
fn test_truncated_table_shows_a_notice() {
    let mut d = RenderDispatcher::new(StrategyKind::Table, Theme::default());
    d.set_row_limit(Some(3));
    d.set_result(Box::new(gdp_result()));
    let text = screen(&d, (80, 12));
    assert!(text.contains("Country"));
    assert!(text.contains("United States"));
    assert!(!text.contains("Brazil"));
    assert!(text.contains("Showing 3 of 9 rows"));
}

#[test]
fn test_large_results_ask_for_confirmation() {
    let mut d = RenderDispatcher::new(StrategyKind::Pie, Theme::default());
    d.set_result(Box::new(common::result_set(vec![tabchart::SimpleColumn::doubles(
        "v",
        (0..900).map(|i| i as f64),
    )])));
    let text = screen(&d, (70, 8));
    assert!(text.contains("900 rows and 1 numeric columns"));
    assert!(text.contains("--unrestricted"));
}

#[test]
fn test_colored_output_carries_escape_codes() {
    let mut d = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
    d.set_result(Box::new(gdp_result()));
    let buf = render_to_buffer(d.display(), (60, 15), ColorDepth::TrueColor);
    let mut out = Vec::new();
    write_buffer(&buf, &mut out, true).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\u{1b}["));
    assert_eq!(text.lines().count(), 15);
}
