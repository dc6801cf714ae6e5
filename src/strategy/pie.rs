use log::debug;

use super::figure::{Figure, Pie, PiePlot, Plot, Slice};
use super::{require_numeric, ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::ChartError;

pub struct PieStrategy;

pub static PIE: PieStrategy = PieStrategy;

const FORMAT: &str = "The first string columns label the slices. Each numeric column \
becomes one pie, with one slice per row. A result with a single row and several numeric \
columns is turned around: the column names label the slices of one pie.";

pub(crate) fn gdp_columns() -> Vec<SimpleColumn> {
    vec![
        SimpleColumn::text(
            "Country",
            [
                "United States",
                "China",
                "Japan",
                "Germany",
                "India",
                "United Kingdom",
                "France",
                "Italy",
                "Brazil",
            ],
        ),
        SimpleColumn::doubles(
            "GDP",
            [25.46, 17.96, 4.23, 4.07, 3.39, 3.07, 2.78, 2.01, 1.92],
        ),
    ]
}

impl ChartStrategy for PieStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pie
    }

    fn description(&self) -> &'static str {
        "One pie per numeric column, one slice per row"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        vec![
            ExampleCase::new(
                "GDP by country",
                "Country labels with one numeric column give one pie.",
                "SELECT country, gdp FROM economies ORDER BY gdp DESC LIMIT 9",
                gdp_columns(),
            ),
            ExampleCase::new(
                "Single wide row",
                "One row of numbers is transposed so each column is a slice.",
                "SELECT size, price, age, weight FROM items WHERE id = 1",
                vec![
                    SimpleColumn::doubles("size", [12.0]),
                    SimpleColumn::doubles("price", [30.0]),
                    SimpleColumn::doubles("age", [5.0]),
                    SimpleColumn::doubles("weight", [18.0]),
                ],
            ),
        ]
    }

    fn is_quick_to_render(&self, rows: usize, numeric_columns: usize) -> bool {
        rows < 700 && numeric_columns <= 160
    }

    fn figure(
        &self,
        _raw: &mut dyn TabularCursor,
        model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        require_numeric(model, 1)?;
        let transposed = model.row_count() == 1 && model.numeric_column_count() > 1;
        let transposed_model;
        let source = if transposed {
            debug!(
                "pie: transposing single row with {} numeric columns",
                model.numeric_column_count()
            );
            transposed_model = model.transpose()?;
            &transposed_model
        } else {
            model
        };

        let pies = source
            .numeric_columns()
            .iter()
            .map(|column| Pie {
                title: column.label().to_string(),
                slices: source
                    .row_labels()
                    .iter()
                    .zip(column.values())
                    .enumerate()
                    .filter(|(_, (_, v))| !v.is_nan())
                    .map(|(i, (label, v))| Slice {
                        label: label.clone(),
                        value: *v,
                        color: ctx.theme.series_color(i),
                    })
                    .collect(),
            })
            .collect();

        Ok(Figure::new(ctx.theme, Plot::Pie(PiePlot { pies, transposed })))
    }
}
