use log::debug;

use super::figure::{Figure, Plot, RowColors, TablePlot, TruncationNotice};
use super::{ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::config::{ColorParser, Rgb};
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::ChartError;

pub struct TableStrategy;

pub static TABLE: TableStrategy = TableStrategy;

/// Column name prefix marking a per-row background colour hint.
pub const COLOR_HINT_BACKGROUND: &str = "SD_BG";
/// Column name prefix marking a per-row text colour hint.
pub const COLOR_HINT_FOREGROUND: &str = "SD_FG";

const FORMAT: &str = "Any result can be shown as a table. Columns whose names start with \
SD_BG or SD_FG are not shown; their values (hex such as #ffcc00, or a colour name) set \
the background or text colour of that row.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Shown,
    Background,
    Foreground,
}

fn role_of(name: &str) -> ColumnRole {
    let upper = name.to_uppercase();
    if upper.starts_with(COLOR_HINT_BACKGROUND) {
        ColumnRole::Background
    } else if upper.starts_with(COLOR_HINT_FOREGROUND) {
        ColumnRole::Foreground
    } else {
        ColumnRole::Shown
    }
}

fn parse_hint(parser: &ColorParser, text: &str) -> Option<Rgb> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parser.parse(text).ok()
}

impl ChartStrategy for TableStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Table
    }

    fn description(&self) -> &'static str {
        "Plain table of the raw result"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        vec![ExampleCase::new(
            "Highlighted orders",
            "Late orders are given a red background through an SD_BG column.",
            "SELECT id, customer, total, CASE WHEN late THEN '#f4cccc' END AS sd_bg FROM orders",
            vec![
                SimpleColumn::integers("Id", [1001, 1002, 1003]),
                SimpleColumn::text("Customer", ["Acme", "Globex", "Initech"]),
                SimpleColumn::doubles("Total", [250.0, 99.5, 1_200.0]),
                SimpleColumn::text("SD_BG", ["", "#f4cccc", ""]),
            ],
        )]
    }

    fn is_quick_to_render(&self, rows: usize, _numeric_columns: usize) -> bool {
        rows < 211_000
    }

    fn figure(
        &self,
        raw: &mut dyn TabularCursor,
        _model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        let count = raw.column_count();
        let mut roles = Vec::with_capacity(count);
        let mut headers = Vec::new();
        for i in 0..count {
            let name = raw.column_name(i)?;
            let role = role_of(name);
            if role == ColumnRole::Shown {
                headers.push(name.to_string());
            }
            roles.push(role);
        }

        let parser = ColorParser::new();
        let limit = ctx.row_limit.unwrap_or(usize::MAX);
        let mut rows = Vec::new();
        let mut row_colors = Vec::new();
        let mut total = 0usize;
        raw.before_first()?;
        while raw.next_row()? {
            total += 1;
            if rows.len() >= limit {
                continue;
            }
            let mut cells = Vec::with_capacity(headers.len());
            let mut colors = RowColors::default();
            for (i, role) in roles.iter().enumerate() {
                let text = raw.cell(i)?.to_string();
                match role {
                    ColumnRole::Shown => cells.push(text),
                    ColumnRole::Background => {
                        colors.background = parse_hint(&parser, &text).or(colors.background)
                    }
                    ColumnRole::Foreground => {
                        colors.foreground = parse_hint(&parser, &text).or(colors.foreground)
                    }
                }
            }
            rows.push(cells);
            row_colors.push(colors);
        }

        let truncated = (total > rows.len()).then(|| TruncationNotice {
            shown: rows.len(),
            total,
        });
        if let Some(notice) = truncated {
            debug!("table: {}", notice);
        }
        let plot = TablePlot {
            headers,
            rows,
            row_colors,
            truncated,
        };
        Ok(Figure::new(ctx.theme, Plot::Table(plot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::build_model;
    use crate::config::Theme;
    use crate::cursor::SimpleResultSet;

    #[test]
    fn colour_hint_columns_are_hidden_and_applied() {
        let example = TABLE.examples().remove(0);
        let mut rs = example.cursor();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        let figure = TABLE
            .figure(&mut rs, &model, &RenderContext::new(&theme))
            .unwrap();
        let Plot::Table(table) = figure.plot else {
            panic!("expected table");
        };
        assert_eq!(table.headers, vec!["Id", "Customer", "Total"]);
        assert_eq!(table.rows[1], vec!["1002", "Globex", "99.5"]);
        assert_eq!(table.row_colors[0], RowColors::default());
        assert_eq!(table.row_colors[1].background, Some(Rgb::new(0xf4, 0xcc, 0xcc)));
        assert!(table.truncated.is_none());
    }

    #[test]
    fn rows_over_the_limit_are_counted_not_shown() {
        let mut rs =
            SimpleResultSet::new(vec![SimpleColumn::integers("n", 0..25)]).unwrap();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        let ctx = RenderContext {
            row_limit: Some(10),
            ..RenderContext::new(&theme)
        };
        let figure = TABLE.figure(&mut rs, &model, &ctx).unwrap();
        assert_eq!(
            figure.truncation(),
            Some(TruncationNotice {
                shown: 10,
                total: 25
            })
        );
    }
}
