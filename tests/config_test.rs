mod common;

use std::fs;

use tabchart::config::{AppConfig, ConfigManager, Rgb, Theme};
use tempfile::TempDir;

use common::write_temp_file;

#[test]
fn test_default_config_round_trips_to_defaults() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_dir(dir.path().join("tabchart"));
    let path = manager.write_default_config(false).unwrap();
    assert!(path.exists());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[chart]"));
    assert!(content.contains("# histogram_bins = 20"));

    let loaded = AppConfig::load_from_path(&path).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(loaded.chart, defaults.chart);
    assert_eq!(loaded.theme, defaults.theme);
    assert_eq!(loaded.export, defaults.export);
}

#[test]
fn test_write_default_config_respects_force() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_dir(dir.path().to_path_buf());
    let path = manager.config_path("config.toml");
    fs::write(&path, "[chart]\nhistogram_bins = 30\n").unwrap();

    let err = manager.write_default_config(false).unwrap_err();
    assert!(err.to_string().contains("--force"));
    assert!(fs::read_to_string(&path).unwrap().contains("= 30"));

    manager.write_default_config(true).unwrap();
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("# histogram_bins = 20"));
}

#[test]
fn test_user_values_override_defaults() {
    let (_dir, path) = write_temp_file(
        "config.toml",
        r##"
[chart]
histogram_bins = 40

[theme]
show_legend = false

[theme.colors]
series = ["red", "#00ff00"]

[export]
width = 640
"##,
    );
    let config = AppConfig::load_from_path(&path).unwrap();
    assert_eq!(config.chart.histogram_bins, 40);
    assert_eq!(config.chart.row_limit, AppConfig::default().chart.row_limit);
    assert_eq!(config.export.width, 640);
    assert_eq!(config.export.height, 768);

    let theme = Theme::from_config(&config.theme).unwrap();
    assert!(!theme.show_legend);
    assert_eq!(theme.series, vec![Rgb::new(205, 49, 49), Rgb::new(0, 255, 0)]);
}

#[test]
fn test_invalid_values_are_rejected() {
    for (content, needle) in [
        ("[chart]\nhistogram_bins = 2\n", "histogram_bins"),
        ("[chart]\nhistogram_bins = 500\n", "histogram_bins"),
        ("[chart]\nrow_limit = 0\n", "row_limit"),
        ("[theme.colors]\nforeground = \"not-a-color\"\n", "foreground"),
        ("[theme.colors]\nseries = [\"blue\", \"#12\"]\n", "series[1]"),
        ("version = \"2.0\"\n", "version"),
    ] {
        let (_dir, path) = write_temp_file("config.toml", content);
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(
            err.to_string().contains(needle),
            "{content:?} gave {err}"
        );
    }
}

#[test]
fn test_malformed_toml_names_the_file() {
    let (_dir, path) = write_temp_file("config.toml", "[chart\nhistogram_bins = ");
    let err = AppConfig::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    assert!(err.to_string().contains("config.toml"));
}
