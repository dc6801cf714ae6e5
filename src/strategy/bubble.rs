use super::figure::{BubblePlot, BubblePoint, Figure, Plot};
use super::{ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::{ChartError, ChartFormatError};

pub struct BubbleStrategy;

pub static BUBBLE: BubbleStrategy = BubbleStrategy;

const FORMAT: &str = "Needs exactly three numeric columns, in order: X position, \
Y position and bubble size. Leading string columns label the bubbles.";

impl ChartStrategy for BubbleStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Bubble
    }

    fn description(&self) -> &'static str {
        "X, Y and bubble size from three numeric columns"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        vec![ExampleCase::new(
            "Life expectancy",
            "Income on X, life expectancy on Y, population as size.",
            "SELECT country, income, life_expectancy, population FROM world_stats",
            vec![
                SimpleColumn::text("Country", ["Norway", "Brazil", "India", "Japan", "Kenya"]),
                SimpleColumn::doubles("Income", [82_000.0, 8_900.0, 2_400.0, 34_000.0, 2_100.0]),
                SimpleColumn::doubles("LifeExpectancy", [83.2, 75.9, 70.8, 84.5, 67.5]),
                SimpleColumn::doubles("Population", [5.4, 214.0, 1_417.0, 125.0, 54.0]),
            ],
        )]
    }

    fn is_quick_to_render(&self, rows: usize, _numeric_columns: usize) -> bool {
        rows < 5_000
    }

    fn figure(
        &self,
        _raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        let [x, y, size] = model.numeric_columns() else {
            return Err(if model.numeric_columns().len() > 3 {
                ChartFormatError::exactly_three_numeric_columns()
            } else {
                ChartFormatError::needs_numeric_columns(3)
            }
            .into());
        };
        let points = model
            .row_labels()
            .iter()
            .enumerate()
            .map(|(row, label)| BubblePoint {
                label: label.clone(),
                x: x.values()[row],
                y: y.values()[row],
                size: size.values()[row],
            })
            .filter(|p| p.x.is_finite() && p.y.is_finite() && p.size.is_finite())
            .collect();
        let plot = BubblePlot {
            points,
            color: ctx.theme.series_color(0),
            x_title: x.label().to_string(),
            y_title: y.label().to_string(),
            size_title: size.label().to_string(),
        };
        Ok(Figure::new(ctx.theme, Plot::Bubble(plot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::build_model;
    use crate::config::Theme;
    use crate::cursor::SimpleResultSet;

    fn render(columns: Vec<SimpleColumn>) -> Result<Figure, ChartError> {
        let mut rs = SimpleResultSet::new(columns).unwrap();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        BUBBLE.figure(&mut rs, &model, &RenderContext::new(&theme))
    }

    #[test]
    fn requires_exactly_three_numeric_columns() {
        let two = render(vec![
            SimpleColumn::doubles("x", [1.0]),
            SimpleColumn::doubles("y", [1.0]),
        ]);
        assert_eq!(
            two.unwrap_err().as_format().map(|e| e.reason().to_string()),
            Some("at least three numeric columns required for X/Y/size".to_string())
        );
        let four = render(vec![
            SimpleColumn::doubles("a", [1.0]),
            SimpleColumn::doubles("b", [1.0]),
            SimpleColumn::doubles("c", [1.0]),
            SimpleColumn::doubles("d", [1.0]),
        ]);
        assert_eq!(
            four.unwrap_err().as_format().map(|e| e.reason().to_string()),
            Some("exactly three numeric columns (X, Y, size) required".to_string())
        );
    }

    #[test]
    fn rows_with_missing_values_are_skipped() {
        let figure = render(vec![
            SimpleColumn::doubles("x", [1.0, 2.0]),
            SimpleColumn::doubles("y", [f64::NAN, 3.0]),
            SimpleColumn::doubles("s", [4.0, 5.0]),
        ])
        .unwrap();
        let Plot::Bubble(plot) = figure.plot else {
            panic!("expected bubble plot");
        };
        assert_eq!(plot.points.len(), 1);
        assert_eq!(plot.points[0].label, "2");
    }
}
