//! Bar, stacked bar, line and area charts: one series per numeric column
//! plotted against the row labels.

use super::figure::{CategoryLabel, CategoryPlot, CategoryStyle, Figure, Plot, Series};
use super::{require_numeric, ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::ChartError;

/// Above this many categories only every Nth label keeps full size.
pub const LABEL_THINNING_THRESHOLD: usize = 30;

pub struct CategoryStrategy {
    kind: StrategyKind,
    style: CategoryStyle,
}

pub static BAR: CategoryStrategy = CategoryStrategy {
    kind: StrategyKind::Bar,
    style: CategoryStyle::Bar,
};
pub static STACKED_BAR: CategoryStrategy = CategoryStrategy {
    kind: StrategyKind::StackedBar,
    style: CategoryStyle::StackedBar,
};
pub static LINE: CategoryStrategy = CategoryStrategy {
    kind: StrategyKind::Line,
    style: CategoryStyle::Line,
};
pub static AREA: CategoryStrategy = CategoryStrategy {
    kind: StrategyKind::Area,
    style: CategoryStyle::Area,
};

const FORMAT: &str = "The first string columns are used as category labels. \
Every numeric column after them becomes one series, drawn against those labels. \
At least one numeric column is required.";

/// Category labels, keeping every Nth at full size (N = count / 7) once there
/// are more than [`LABEL_THINNING_THRESHOLD`] of them.
pub fn thin_labels(labels: &[String]) -> Vec<CategoryLabel> {
    let step = if labels.len() > LABEL_THINNING_THRESHOLD {
        labels.len() / 7
    } else {
        1
    };
    labels
        .iter()
        .enumerate()
        .map(|(i, text)| CategoryLabel {
            text: text.clone(),
            full_size: i % step == 0,
        })
        .collect()
}

fn sales_columns() -> Vec<SimpleColumn> {
    vec![
        SimpleColumn::text("Region", ["North", "South", "East", "West"]),
        SimpleColumn::doubles("Q1", [120.0, 95.5, 143.0, 88.0]),
        SimpleColumn::doubles("Q2", [132.0, 101.0, 150.5, 97.0]),
        SimpleColumn::doubles("Q3", [128.5, 110.0, 161.0, 104.0]),
    ]
}

impl ChartStrategy for CategoryStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn description(&self) -> &'static str {
        match self.style {
            CategoryStyle::Bar => "Grouped bars, one per numeric column for each row",
            CategoryStyle::StackedBar => "Bars of each row stacked on top of each other",
            CategoryStyle::Line => "One line per numeric column across the rows",
            CategoryStyle::Area => "Filled area per numeric column across the rows",
        }
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        vec![
            ExampleCase::new(
                "Quarterly sales",
                "One category column and three numeric series.",
                "SELECT region, q1, q2, q3 FROM sales ORDER BY region",
                sales_columns(),
            ),
            ExampleCase::new(
                "Population by continent and country",
                "Two label columns are joined into one category label.",
                "SELECT continent, country, population FROM countries",
                vec![
                    SimpleColumn::text("Continent", ["Europe", "Europe", "Asia", "Asia"]),
                    SimpleColumn::text("Country", ["UK", "France", "Japan", "India"]),
                    SimpleColumn::integers("Population", [67, 68, 125, 1_417]),
                ],
            ),
        ]
    }

    fn is_quick_to_render(&self, rows: usize, numeric_columns: usize) -> bool {
        rows.saturating_mul(numeric_columns) < 10_000
    }

    fn figure(
        &self,
        _raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        require_numeric(model, 1)?;
        let series = model
            .numeric_columns()
            .iter()
            .enumerate()
            .map(|(i, c)| Series {
                name: c.label().to_string(),
                color: ctx.theme.series_color(i),
                values: c.values().to_vec(),
            })
            .collect();
        let plot = CategoryPlot {
            style: self.style,
            categories: thin_labels(model.row_labels()),
            series,
            x_title: model.row_axis_title().to_string(),
            y_title: model.col_axis_title().to_string(),
        };
        Ok(Figure::new(ctx.theme, Plot::Category(plot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::build_model;
    use crate::config::Theme;
    use crate::cursor::SimpleResultSet;

    #[test]
    fn short_axes_keep_every_label() {
        let labels: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        assert!(thin_labels(&labels).iter().all(|l| l.full_size));
    }

    #[test]
    fn long_axes_keep_every_nth_label() {
        let labels: Vec<String> = (0..70).map(|i| i.to_string()).collect();
        let thinned = thin_labels(&labels);
        let full: Vec<usize> = thinned
            .iter()
            .enumerate()
            .filter(|(_, l)| l.full_size)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(full, vec![0, 10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn text_only_results_are_rejected() {
        let mut rs = SimpleResultSet::new(vec![SimpleColumn::text("name", ["a"])]).unwrap();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        let err = BAR
            .figure(&mut rs, &model, &RenderContext::new(&theme))
            .unwrap_err();
        assert_eq!(
            err.as_format().map(|e| e.reason()),
            Some("at least one numeric column required")
        );
    }

    #[test]
    fn one_series_per_numeric_column() {
        let mut rs = SimpleResultSet::new(sales_columns()).unwrap();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        let figure = LINE
            .figure(&mut rs, &model, &RenderContext::new(&theme))
            .unwrap();
        let Plot::Category(plot) = figure.plot else {
            panic!("expected a category plot");
        };
        assert_eq!(plot.style, CategoryStyle::Line);
        assert_eq!(plot.series.len(), 3);
        assert_eq!(plot.series[1].color, theme.series_color(1));
        assert_eq!(plot.categories[2].text, "East");
        assert_eq!(plot.x_title, "Region");
    }
}
