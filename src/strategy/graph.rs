//! Directed graph: an edge list rendered as Graphviz DOT text.

use std::path::PathBuf;

use super::figure::{Edge, Figure, GraphPlot, Plot};
use super::{ChartStrategy, ExampleCase, RenderContext, StrategyKind};
use crate::chart_data::ChartDataModel;
use crate::cursor::{SimpleColumn, TabularCursor};
use crate::error::{ChartError, ChartFormatError};

pub struct DirectedGraphStrategy;

pub static DIRECTED_GRAPH: DirectedGraphStrategy = DirectedGraphStrategy;

const FORMAT: &str = "Each row is one edge. Columns named from and to give the two \
nodes; without them the first two columns are used. Optional columns named label, style \
(dotted, dashed, bold) and connector (-> or --) decorate the edge. The graph is drawn \
with Graphviz when it is installed, otherwise its DOT description is shown.";

const DEFAULT_CONNECTOR: &str = "->";
const UNDIRECTED: &str = "--";

struct EdgeColumns {
    from: usize,
    to: usize,
    label: Option<usize>,
    style: Option<usize>,
    connector: Option<usize>,
}

fn find_columns(raw: &dyn TabularCursor) -> Result<EdgeColumns, ChartError> {
    let count = raw.column_count();
    if count < 2 {
        return Err(ChartFormatError::new("at least two columns required (from and to)").into());
    }
    let mut names = Vec::with_capacity(count);
    for i in 0..count {
        names.push(raw.column_name(i)?.to_lowercase());
    }
    let find = |name: &str| names.iter().position(|n| n == name);
    // A lone named endpoint pairs with the first other column.
    let other = |i: usize| if i == 0 { 1 } else { 0 };
    let (from, to) = match (find("from"), find("to")) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => (from, other(from)),
        (None, Some(to)) => (other(to), to),
        (None, None) => (0, 1),
    };
    Ok(EdgeColumns {
        from,
        to,
        label: find("label"),
        style: find("style"),
        connector: find("connector"),
    })
}

fn cell_text(raw: &dyn TabularCursor, index: Option<usize>) -> Result<Option<String>, ChartError> {
    let Some(i) = index else {
        return Ok(None);
    };
    let s = raw.cell(i)?.to_string();
    let trimmed = s.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn read_edges(raw: &mut dyn TabularCursor, cols: &EdgeColumns) -> Result<Vec<Edge>, ChartError> {
    raw.before_first()?;
    let mut edges = Vec::new();
    while raw.next_row()? {
        let row: &dyn TabularCursor = &*raw;
        let (Some(from), Some(to)) = (
            cell_text(row, Some(cols.from))?,
            cell_text(row, Some(cols.to))?,
        ) else {
            continue;
        };
        edges.push(Edge {
            from,
            to,
            label: cell_text(row, cols.label)?,
            style: cell_text(row, cols.style)?,
            connector: cell_text(row, cols.connector)?
                .unwrap_or_else(|| DEFAULT_CONNECTOR.to_string()),
        });
    }
    Ok(edges)
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// DOT text for `edges`. The graph is undirected only when every edge uses `--`.
pub fn to_dot(edges: &[Edge]) -> String {
    let undirected = !edges.is_empty() && edges.iter().all(|e| e.connector == UNDIRECTED);
    let (keyword, op) = if undirected {
        ("graph", UNDIRECTED)
    } else {
        ("digraph", DEFAULT_CONNECTOR)
    };
    let mut out = format!("{keyword} G {{\n");
    for edge in edges {
        let mut attrs = Vec::new();
        if let Some(label) = &edge.label {
            attrs.push(format!("label={}", quote(label)));
        }
        if let Some(style) = &edge.style {
            attrs.push(format!("style={}", quote(style)));
        }
        if !undirected && edge.connector == UNDIRECTED {
            attrs.push("dir=none".to_string());
        }
        out.push_str(&format!("  {} {} {}", quote(&edge.from), op, quote(&edge.to)));
        if !attrs.is_empty() {
            out.push_str(&format!(" [{}]", attrs.join(", ")));
        }
        out.push_str(";\n");
    }
    out.push_str("}\n");
    out
}

/// Location of the Graphviz `dot` executable on `PATH`, if installed.
pub fn dot_available() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    let exe = if cfg!(windows) { "dot.exe" } else { "dot" };
    std::env::split_paths(&path)
        .map(|dir| dir.join(exe))
        .find(|candidate| candidate.is_file())
}

impl ChartStrategy for DirectedGraphStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DirectedGraph
    }

    fn description(&self) -> &'static str {
        "from/to edge list rendered as a directed graph"
    }

    fn format_explanation(&self) -> &'static str {
        FORMAT
    }

    fn examples(&self) -> Vec<ExampleCase> {
        vec![
            ExampleCase::new(
                "Service dependencies",
                "Named from/to columns with edge labels.",
                "SELECT caller AS \"from\", callee AS \"to\", protocol AS label FROM service_calls",
                vec![
                    SimpleColumn::text("from", ["web", "web", "api", "api", "worker"]),
                    SimpleColumn::text("to", ["api", "cdn", "db", "queue", "db"]),
                    SimpleColumn::text("label", ["http", "http", "sql", "amqp", "sql"]),
                ],
            ),
            ExampleCase::new(
                "Org chart",
                "The first two columns are used when from/to are not named.",
                "SELECT manager, employee FROM staff",
                vec![
                    SimpleColumn::text("Manager", ["Ada", "Ada", "Grace"]),
                    SimpleColumn::text("Employee", ["Grace", "Linus", "Ken"]),
                ],
            ),
        ]
    }

    fn is_quick_to_render(&self, rows: usize, _numeric_columns: usize) -> bool {
        rows < 2_000
    }

    fn figure(
        &self,
        raw: &mut dyn TabularCursor,
        _model: &ChartDataModel,
        ctx: &RenderContext<'_>,
    ) -> Result<Figure, ChartError> {
        let cols = find_columns(raw)?;
        let edges = read_edges(raw, &cols)?;
        let plot = GraphPlot {
            dot: to_dot(&edges),
            edges,
        };
        Ok(Figure::new(ctx.theme, Plot::Graph(plot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::build_model;
    use crate::config::Theme;
    use crate::cursor::SimpleResultSet;

    fn render(columns: Vec<SimpleColumn>) -> Result<GraphPlot, ChartError> {
        let mut rs = SimpleResultSet::new(columns).unwrap();
        let model = build_model(&mut rs).unwrap();
        let theme = Theme::default();
        let figure = DIRECTED_GRAPH.figure(&mut rs, &model, &RenderContext::new(&theme))?;
        match figure.plot {
            Plot::Graph(plot) => Ok(plot),
            other => panic!("expected graph plot, got {other:?}"),
        }
    }

    fn pairs(plot: &GraphPlot) -> Vec<(&str, &str)> {
        plot.edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect()
    }

    fn edge(from: &str, to: &str, connector: &str) -> Edge {
        Edge {
            from: from.into(),
            to: to.into(),
            label: None,
            style: None,
            connector: connector.into(),
        }
    }

    #[test]
    fn mixed_connectors_stay_directed() {
        let mut labelled = edge("a", "b", "->");
        labelled.label = Some("say \"hi\"".into());
        let dot = to_dot(&[labelled, edge("b", "c", "--")]);
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("\"a\" -> \"b\" [label=\"say \\\"hi\\\"\"];"));
        assert!(dot.contains("\"b\" -> \"c\" [dir=none];"));
    }

    #[test]
    fn all_undirected_edges_make_a_graph() {
        let dot = to_dot(&[edge("a", "b", "--")]);
        assert_eq!(dot, "graph G {\n  \"a\" -- \"b\";\n}\n");
    }

    #[test]
    fn named_columns_are_found_in_any_case_and_order() {
        let plot = render(vec![
            SimpleColumn::text("Connector", ["--", ""]),
            SimpleColumn::text("TO", ["b", "c"]),
            SimpleColumn::text("Style", ["dashed", ""]),
            SimpleColumn::text("From", ["a", "b"]),
            SimpleColumn::text("LABEL", ["", "calls"]),
        ])
        .unwrap();
        assert_eq!(pairs(&plot), vec![("a", "b"), ("b", "c")]);
        assert_eq!(plot.edges[0].connector, "--");
        assert_eq!(plot.edges[0].style.as_deref(), Some("dashed"));
        assert_eq!(plot.edges[0].label, None);
        assert_eq!(plot.edges[1].connector, "->");
        assert_eq!(plot.edges[1].label.as_deref(), Some("calls"));
        assert_eq!(
            plot.dot,
            "digraph G {\n  \"a\" -> \"b\" [style=\"dashed\", dir=none];\n  \"b\" -> \"c\" [label=\"calls\"];\n}\n"
        );
    }

    #[test]
    fn unnamed_columns_use_the_first_two() {
        let plot = render(vec![
            SimpleColumn::text("manager", ["Ada", "Grace"]),
            SimpleColumn::text("employee", ["Grace", "Ken"]),
            SimpleColumn::text("team", ["core", "core"]),
        ])
        .unwrap();
        assert_eq!(pairs(&plot), vec![("Ada", "Grace"), ("Grace", "Ken")]);
        assert_eq!(
            plot.dot,
            "digraph G {\n  \"Ada\" -> \"Grace\";\n  \"Grace\" -> \"Ken\";\n}\n"
        );
    }

    #[test]
    fn a_lone_named_endpoint_pairs_with_another_column() {
        let plot = render(vec![
            SimpleColumn::text("to", ["b", "c"]),
            SimpleColumn::text("src", ["a", "b"]),
        ])
        .unwrap();
        assert_eq!(pairs(&plot), vec![("a", "b"), ("b", "c")]);

        let plot = render(vec![
            SimpleColumn::text("dst", ["b"]),
            SimpleColumn::text("from", ["a"]),
        ])
        .unwrap();
        assert_eq!(pairs(&plot), vec![("a", "b")]);
    }

    #[test]
    fn rows_missing_an_endpoint_are_skipped() {
        let plot = render(vec![
            SimpleColumn::text("from", ["a", "", "c", "d"]),
            SimpleColumn::text("to", ["b", "x", "  ", "e"]),
        ])
        .unwrap();
        assert_eq!(pairs(&plot), vec![("a", "b"), ("d", "e")]);
    }

    #[test]
    fn a_single_column_is_a_format_error() {
        let err = render(vec![SimpleColumn::text("from", ["a"])]).unwrap_err();
        assert_eq!(
            err.as_format().map(|e| e.reason()),
            Some("at least two columns required (from and to)")
        );
    }
}
