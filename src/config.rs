use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use supports_color::Stream;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string with comments.
    /// Every value is commented out so defaults apply until a user uncomments it.
    pub fn generate_default_config(&self) -> String {
        let defaults = toml::to_string_pretty(&AppConfig::default()).unwrap_or_default();
        let mut out = String::from(
            "# tabchart configuration\n# Uncomment a setting to override its default.\n",
        );
        for line in defaults.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                out.push('\n');
            } else if trimmed.starts_with('[') {
                let section = trimmed.trim_start_matches('[').trim_end_matches(']');
                if let Some((_, header)) = SECTION_HEADERS.iter().find(|(s, _)| *s == section) {
                    out.push_str(header);
                    out.push('\n');
                }
                out.push_str(line);
                out.push('\n');
            } else {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, self.generate_default_config())?;

        Ok(config_path)
    }
}

const SECTION_HEADERS: &[(&str, &str)] = &[
    (
        "chart",
        "# ============================================================================\n# Chart Rendering\n# ============================================================================",
    ),
    (
        "theme",
        "# ============================================================================\n# Color Theme\n# ============================================================================",
    ),
    (
        "theme.colors",
        "# Colors are hex (\"#1f77b4\") or named (\"red\", \"dark_gray\", ...).\n# `series` is the palette assigned to chart series in order.",
    ),
    (
        "export",
        "# ============================================================================\n# Image Export\n# ============================================================================",
    ),
];

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub chart: ChartConfig,
    pub theme: ThemeConfig,
    pub export: ExportConfig,
}

/// Default maximum rows shown by the table strategy.
pub const DEFAULT_CHART_ROW_LIMIT: usize = 10_000;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const HISTOGRAM_MIN_BINS: usize = 5;
pub const HISTOGRAM_MAX_BINS: usize = 80;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum rows displayed by strategies that truncate. None = unlimited.
    pub row_limit: Option<usize>,
    /// Skip the slow-render confirmation for large results.
    pub render_unrestricted: bool,
    /// Bin count used by the histogram strategy.
    pub histogram_bins: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            row_limit: Some(DEFAULT_CHART_ROW_LIMIT),
            render_unrestricted: false,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl ChartConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ChartConfig::default();
        if other.row_limit != default.row_limit {
            self.row_limit = other.row_limit;
        }
        if other.render_unrestricted != default.render_unrestricted {
            self.render_unrestricted = other.render_unrestricted;
        }
        if other.histogram_bins != default.histogram_bins {
            self.histogram_bins = other.histogram_bins;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// Show a legend on charts with more than one series.
    pub show_legend: bool,
    pub colors: ColorConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            colors: ColorConfig::default(),
        }
    }
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        if other.show_legend != ThemeConfig::default().show_legend {
            self.show_legend = other.show_legend;
        }
        self.colors.merge(other.colors);
    }
}

/// Color configuration for chart rendering.
///
/// - `foreground`: text, axes and borders
/// - `background`: plot and table background
/// - `alternate`: alternate table rows and grid lines
/// - `selected`: highlighted elements
/// - `series`: palette for chart series, used in order and cycled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub foreground: String,
    pub background: String,
    pub alternate: String,
    pub selected: String,
    pub series: Vec<String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: "#202020".to_string(),
            background: "#ffffff".to_string(),
            alternate: "#f0f0f0".to_string(),
            selected: "#ffd966".to_string(),
            series: [
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
                "#7f7f7f", "#bcbd22", "#17becf",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ColorConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();
        if other.foreground != default.foreground {
            self.foreground = other.foreground;
        }
        if other.background != default.background {
            self.background = other.background;
        }
        if other.alternate != default.alternate {
            self.alternate = other.alternate;
        }
        if other.selected != default.selected {
            self.selected = other.selected;
        }
        if other.series != default.series {
            self.series = other.series;
        }
    }

    /// Validate that all colors can be parsed
    pub fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in [
            ("foreground", &self.foreground),
            ("background", &self.background),
            ("alternate", &self.alternate),
            ("selected", &self.selected),
        ] {
            parser
                .parse(value)
                .map_err(|e| eyre!("theme.colors.{}: {}", name, e))?;
        }
        if self.series.is_empty() {
            return Err(eyre!("theme.colors.series must name at least one color"));
        }
        for (i, value) in self.series.iter().enumerate() {
            parser
                .parse(value)
                .map_err(|e| eyre!("theme.colors.series[{}]: {}", i, e))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    pub watermark: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            watermark: false,
        }
    }
}

impl ExportConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ExportConfig::default();
        if other.width != default.width {
            self.width = other.width;
        }
        if other.height != default.height {
            self.height = other.height;
        }
        if other.watermark != default.watermark {
            self.watermark = other.watermark;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            chart: ChartConfig::default(),
            theme: ThemeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let config_path = ConfigManager::new(app_name)
            .ok()
            .map(|m| m.config_path("config.toml"));
        match config_path {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(AppConfig::default()),
        }
    }

    /// Load defaults merged with the file at `path`, then validate.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read config file at {}: {}", path.display(), e))?;
        let user_config: AppConfig = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file at {}: {}", path.display(), e))?;

        let mut config = AppConfig::default();
        config.merge(user_config);
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }
        self.chart.merge(other.chart);
        self.theme.merge(other.theme);
        self.export.merge(other.export);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if let Some(n) = self.chart.row_limit {
            if n == 0 {
                return Err(eyre!("chart.row_limit must be greater than 0 when set"));
            }
        }

        if !(HISTOGRAM_MIN_BINS..=HISTOGRAM_MAX_BINS).contains(&self.chart.histogram_bins) {
            return Err(eyre!(
                "chart.histogram_bins must be between {} and {}, got {}",
                HISTOGRAM_MIN_BINS,
                HISTOGRAM_MAX_BINS,
                self.chart.histogram_bins
            ));
        }

        if self.export.width == 0 || self.export.height == 0 {
            return Err(eyre!("export.width and export.height must be greater than 0"));
        }

        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;

        Ok(())
    }
}

/// 24-bit color used by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend toward `other`; `t` is clamped to 0..=1.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }

    /// Perceived brightness in 0..=255.
    pub fn luma(self) -> u8 {
        ((self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000) as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses color names and hex strings into [`Rgb`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorParser;

impl ColorParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a color string (hex or named)
    pub fn parse(&self, s: &str) -> Result<Rgb> {
        let trimmed = s.trim();

        // Hex format: "#ff0000" or "#FF0000" (6-character hex)
        if trimmed.starts_with('#') {
            let (r, g, b) = parse_hex(trimmed)?;
            return Ok(Rgb::new(r, g, b));
        }

        let lower = trimmed.to_lowercase();
        let rgb = match lower.as_str() {
            "black" => Rgb::new(0, 0, 0),
            "red" => Rgb::new(205, 49, 49),
            "green" => Rgb::new(13, 188, 121),
            "yellow" => Rgb::new(229, 229, 16),
            "blue" => Rgb::new(36, 114, 200),
            "magenta" => Rgb::new(188, 63, 188),
            "cyan" => Rgb::new(17, 168, 205),
            "white" => Rgb::new(229, 229, 229),
            "orange" => Rgb::new(255, 140, 0),
            "purple" => Rgb::new(128, 0, 128),
            "bright_red" | "bright red" => Rgb::new(241, 76, 76),
            "bright_green" | "bright green" => Rgb::new(35, 209, 139),
            "bright_yellow" | "bright yellow" => Rgb::new(245, 245, 67),
            "bright_blue" | "bright blue" => Rgb::new(59, 142, 234),
            "bright_white" | "bright white" => Rgb::new(255, 255, 255),
            "gray" | "grey" => Rgb::new(128, 128, 128),
            "dark_gray" | "dark gray" | "dark_grey" | "dark grey" => Rgb::new(80, 80, 80),
            "light_gray" | "light gray" | "light_grey" | "light grey" => Rgb::new(200, 200, 200),
            _ => {
                return Err(eyre!(
                    "Unknown color name: '{}'. Supported: basic colors (red, blue, etc.), \
                     bright variants (bright_red, etc.), grays, or hex colors (#ff0000)",
                    trimmed
                ))
            }
        };
        Ok(rgb)
    }
}

/// Parse hex color string (#ff0000) to RGB components
fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    if !s.starts_with('#') || s.len() != 7 || !s.is_ascii() {
        return Err(eyre!(
            "Invalid hex color format: '{}'. Expected format: #rrggbb",
            s
        ));
    }

    let r = u8::from_str_radix(&s[1..3], 16)
        .map_err(|_| eyre!("Invalid red component in hex color: {}", s))?;
    let g = u8::from_str_radix(&s[3..5], 16)
        .map_err(|_| eyre!("Invalid green component in hex color: {}", s))?;
    let b = u8::from_str_radix(&s[5..7], 16)
        .map_err(|_| eyre!("Invalid blue component in hex color: {}", s))?;

    Ok((r, g, b))
}

/// How many colors the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Indexed256,
    Basic,
    /// `NO_COLOR` is set: draw with the terminal's defaults.
    Monochrome,
}

impl ColorDepth {
    /// Detect terminal capabilities for stdout.
    pub fn detect() -> Self {
        if std::env::var("NO_COLOR").is_ok() {
            return Self::Monochrome;
        }
        match supports_color::on(Stream::Stdout) {
            Some(level) if level.has_16m => Self::TrueColor,
            Some(level) if level.has_256 => Self::Indexed256,
            _ => Self::Basic,
        }
    }

    /// Convert an RGB value to the closest color the terminal can show.
    pub fn to_terminal(self, rgb: Rgb) -> Color {
        match self {
            Self::TrueColor => Color::Rgb(rgb.r, rgb.g, rgb.b),
            Self::Indexed256 => Color::Indexed(rgb_to_256_color(rgb.r, rgb.g, rgb.b)),
            Self::Basic => rgb_to_basic_ansi(rgb.r, rgb.g, rgb.b),
            Self::Monochrome => Color::Reset,
        }
    }
}

/// Convert RGB to nearest 256-color palette index
/// Uses standard xterm 256-color palette
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 10 {
        // Grayscale ramp (232-255)
        let gray = (r as u16 + g as u16 + b as u16) / 3;
        return match gray {
            0..=7 => 16,
            248.. => 231,
            _ => 232 + ((gray - 8) * 24 / 240) as u8,
        };
    }

    // 6x6x6 color cube (16-231)
    let idx = |c: u8| (c as u16 * 5 / 255) as u8;
    16 + 36 * idx(r) + 6 * idx(g) + idx(b)
}

/// Convert RGB to nearest basic ANSI color (8 colors)
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 30 {
        let avg = (r as u16 + g as u16 + b as u16) / 3;
        return if avg < 64 { Color::Black } else { Color::White };
    }

    match (r > 128, g > 128, b > 128) {
        (false, false, false) => Color::Black,
        (true, false, false) => Color::Red,
        (false, true, false) => Color::Green,
        (true, true, false) => Color::Yellow,
        (false, false, true) => Color::Blue,
        (true, false, true) => Color::Magenta,
        (false, true, true) => Color::Cyan,
        (true, true, true) => Color::White,
    }
}

/// Theme containing parsed colors ready for use
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub foreground: Rgb,
    pub background: Rgb,
    pub alternate: Rgb,
    pub selected: Rgb,
    pub series: Vec<Rgb>,
    pub show_legend: bool,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let series = config
            .colors
            .series
            .iter()
            .map(|s| parser.parse(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            foreground: parser.parse(&config.colors.foreground)?,
            background: parser.parse(&config.colors.background)?,
            alternate: parser.parse(&config.colors.alternate)?,
            selected: parser.parse(&config.colors.selected)?,
            series,
            show_legend: config.show_legend,
        })
    }

    /// Color for the `index`th series; the palette repeats.
    pub fn series_color(&self, index: usize) -> Rgb {
        if self.series.is_empty() {
            return self.foreground;
        }
        self.series[index % self.series.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        let colors = ColorConfig::default();
        let parser = ColorParser::new();
        let parse = |s: &str| parser.parse(s).unwrap_or(Rgb::new(0, 0, 0));
        Self {
            foreground: parse(&colors.foreground),
            background: parse(&colors.background),
            alternate: parse(&colors.alternate),
            selected: parse(&colors.selected),
            series: colors.series.iter().map(|s| parse(s)).collect(),
            show_legend: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        let parser = ColorParser::new();
        assert_eq!(parser.parse("#FF0080").unwrap(), Rgb::new(255, 0, 128));
        assert_eq!(parser.parse(" Dark Gray ").unwrap(), Rgb::new(80, 80, 80));
        assert!(parser.parse("#12345").is_err());
        assert!(parser.parse("#ééé").is_err());
        assert!(parser.parse("chartreuse-ish").is_err());
    }

    #[test]
    fn default_theme_matches_default_config() {
        let from_config = Theme::from_config(&ThemeConfig::default()).unwrap();
        assert_eq!(from_config, Theme::default());
        assert_eq!(from_config.series_color(10), from_config.series_color(0));
    }

    #[test]
    fn rgb_mix_and_display() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(black.mix(white, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(black.mix(white, 7.0), white);
        assert_eq!(white.to_string(), "#ffffff");
    }

    #[test]
    fn terminal_colors_follow_depth() {
        let orange = Rgb::new(255, 140, 0);
        assert_eq!(ColorDepth::TrueColor.to_terminal(orange), Color::Rgb(255, 140, 0));
        assert_eq!(ColorDepth::Indexed256.to_terminal(orange), Color::Indexed(208));
        assert_eq!(ColorDepth::Basic.to_terminal(orange), Color::Yellow);
        assert_eq!(ColorDepth::Monochrome.to_terminal(orange), Color::Reset);
        assert_eq!(rgb_to_256_color(0, 0, 0), 16);
        assert_eq!(rgb_to_256_color(255, 255, 255), 231);
    }
}
