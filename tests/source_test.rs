mod common;

use tabchart::chart_data::build_model;
use tabchart::cli::FileFormat;
use tabchart::dispatcher::Display;
use tabchart::source::DataFrameCursor;
use tabchart::strategy::figure::Plot;
use tabchart::{RenderDispatcher, StrategyKind, TabularCursor, Theme};

use common::write_temp_file;

const SALES_CSV: &str = "Region,Units,Revenue\nNorth,12,340.5\nSouth,7,120.25\nWest,20,610.0\n";

#[test]
fn test_csv_columns_are_classified() {
    let (_dir, path) = write_temp_file("sales.csv", SALES_CSV);
    let mut cursor = DataFrameCursor::from_path(&path, None, true).unwrap();
    assert_eq!(cursor.column_count(), 3);
    assert_eq!(cursor.column_name(0).unwrap(), "Region");

    let model = build_model(&mut cursor).unwrap();
    assert_eq!(model.row_labels(), &["North", "South", "West"]);
    let numeric: Vec<&str> = model.numeric_columns().iter().map(|c| c.label()).collect();
    assert_eq!(numeric, vec!["Units", "Revenue"]);
    assert_eq!(model.numeric_columns()[1].values(), &[340.5, 120.25, 610.0]);
}

#[test]
fn test_tsv_needs_the_tab_separator() {
    let tsv = SALES_CSV.replace(',', "\t");
    let (_dir, path) = write_temp_file("sales.data", &tsv);
    assert!(DataFrameCursor::from_path(&path, None, true).is_err());

    let cursor = DataFrameCursor::from_path(&path, Some(FileFormat::Tsv), true).unwrap();
    assert_eq!(cursor.column_count(), 3);
}

#[test]
fn test_unknown_extension_asks_for_a_format() {
    let (_dir, path) = write_temp_file("sales.xyz", SALES_CSV);
    let err = DataFrameCursor::from_path(&path, None, true).unwrap_err();
    assert!(err.to_string().contains("--format"));
}

#[test]
fn test_loaded_file_renders_as_a_bar_chart() {
    let (_dir, path) = write_temp_file("sales.csv", SALES_CSV);
    let cursor = DataFrameCursor::from_path(&path, None, true).unwrap();
    let mut dispatcher = RenderDispatcher::new(StrategyKind::Bar, Theme::default());
    dispatcher.set_result(Box::new(cursor));
    let Display::Chart(figure) = dispatcher.display() else {
        panic!("expected a chart, got {:?}", dispatcher.display());
    };
    let Plot::Category(plot) = &figure.plot else {
        panic!("expected a category plot");
    };
    let categories: Vec<&str> = plot.categories.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(categories, vec!["North", "South", "West"]);
    assert_eq!(plot.series.len(), 2);
}
