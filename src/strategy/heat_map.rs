//! Treemap-style heat map: textual columns define a hierarchy, numeric
//! columns give each leaf its area and colour.

use super::figure::{Figure, HeatMapPlot, HeatNode, Plot};
use super::{require_numeric, ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::ChartError;

pub struct HeatMapStrategy;

pub static HEAT_MAP: HeatMapStrategy = HeatMapStrategy;

const FORMAT: &str = "String columns form a hierarchy: every string column except the \
last is a nesting level and the last one names the leaf. The first numeric column sets \
each leaf's area and the second numeric column (or the first again) sets its colour.";

fn insert<'a>(node: &'a mut HeatNode, label: &str) -> &'a mut HeatNode {
    let pos = match node.children.iter().position(|c| c.label == label) {
        Some(pos) => pos,
        None => {
            node.children.push(HeatNode::branch(label));
            node.children.len() - 1
        }
    };
    &mut node.children[pos]
}

/// Fill in branch sizes as the sum of their children's sizes.
fn total_sizes(node: &mut HeatNode) -> f64 {
    if node.is_leaf() {
        return node.size;
    }
    node.size = node.children.iter_mut().map(total_sizes).sum();
    node.size
}

impl ChartStrategy for HeatMapStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HeatMap
    }

    fn description(&self) -> &'static str {
        "Nested treemap sized and coloured by numeric columns"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        vec![ExampleCase::new(
            "Market capitalisation",
            "Sector and company levels, sized by value and coloured by daily change.",
            "SELECT sector, company, market_cap, change_pct FROM stocks",
            vec![
                SimpleColumn::text(
                    "Sector",
                    ["Tech", "Tech", "Tech", "Energy", "Energy", "Health"],
                ),
                SimpleColumn::text(
                    "Company",
                    ["Apex", "Byte", "Cloudly", "Drill", "Emberline", "Fitwell"],
                ),
                SimpleColumn::doubles("MarketCap", [2_800.0, 1_900.0, 600.0, 450.0, 300.0, 520.0]),
                SimpleColumn::doubles("ChangePct", [1.2, -0.4, 3.1, -2.2, 0.5, 0.0]),
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
        require_numeric(model, 1)?;
        let numeric = model.numeric_columns();
        let size = &numeric[0];
        let color = numeric.get(1).unwrap_or(size);
        let textual = model.textual_columns();

        let mut root = HeatNode::branch("");
        for row in 0..model.row_count() {
            let (branches, leaf_label) = match textual.split_last() {
                Some((leaf, branches)) => (branches, leaf.text(row)),
                None => (&[][..], model.row_labels()[row].clone()),
            };
            let mut node = &mut root;
            for level in branches {
                node = insert(node, &level.text(row));
            }
            let (area, shade) = (size.values()[row], color.values()[row]);
            node.children.push(HeatNode {
                label: leaf_label,
                size: if area.is_finite() && area > 0.0 { area } else { 0.0 },
                color_value: shade.is_finite().then_some(shade),
                children: Vec::new(),
            });
        }
        total_sizes(&mut root);

        let plot = HeatMapPlot {
            root,
            size_title: size.label().to_string(),
            color_title: color.label().to_string(),
            color_range: color.finite_range().unwrap_or((0.0, 0.0)),
            low: ctx.theme.series_color(0),
            high: ctx.theme.series_color(1),
        };
        Ok(Figure::new(ctx.theme, Plot::HeatMap(plot)))
    }
}
