use super::figure::{Figure, Plot};
use super::{ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::TabularCursor;
use crate::error::ChartError;

/// Accepts anything and draws nothing.
pub struct NoRenderStrategy;

pub static NO_RENDER: NoRenderStrategy = NoRenderStrategy;

impl ChartStrategy for NoRenderStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NoRender
    }

    fn description(&self) -> &'static str {
        "Render nothing"
    }

    fn format_explanation(&self) -> &'static str {
        "Any result is accepted and nothing is drawn."
    }

    fn examples(&self) -> Vec<ExampleCase> {
        Vec::new()
    }

    fn is_quick_to_render(&self, _rows: usize, _numeric_columns: usize) -> bool {
        true
    }

    fn figure(
        &self,
        _raw: &mut dyn TabularCursor,
        _model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        Ok(Figure::new(ctx.theme, Plot::Blank))
    }
}
