//! Terminal rendering of the dispatcher's display: charts, tables and the
//! help/confirmation panels.

use std::io::{self, Write};

use chrono::Duration;
use ratatui::crossterm::queue;
use ratatui::crossterm::style::{
    Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{self, Canvas},
        Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Row, Table,
        Widget, Wrap,
    },
};

use crate::chart_data::temporal::{format_epoch_millis, from_epoch_millis};
use crate::config::{ColorDepth, Rgb};
use crate::dispatcher::{Display, FormatHelp};
use crate::strategy::figure::{
    format_number, layout_treemap, step_path, BubblePlot, CandlestickPlot, CategoryPlot,
    CategoryStyle, Figure, FigureColors, GraphPlot, HeatMapPlot, HistogramPlot, PiePlot, Plot,
    TablePlot, XyAxis, XyPlot, XyStyle,
};
use crate::strategy::figure::Bounds;

const PIE_BAR_WIDTH: usize = 30;

/// Renders a [`Display`] into a ratatui buffer.
pub struct DisplayWidget<'a> {
    display: &'a Display,
    depth: ColorDepth,
}

impl<'a> DisplayWidget<'a> {
    pub fn new(display: &'a Display, depth: ColorDepth) -> Self {
        Self { display, depth }
    }
}

impl Widget for DisplayWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let painter = Painter { depth: self.depth };
        match self.display {
            Display::Empty => painter.notice(area, buf, " No result ", &["Nothing to chart yet."]),
            Display::QueryFailed { message } => {
                painter.notice(area, buf, " Query failed ", &[message.as_str()])
            }
            Display::TooLarge {
                rows,
                numeric_columns,
            } => {
                let size = format!(
                    "The result has {} rows and {} numeric columns.",
                    rows, numeric_columns
                );
                painter.notice(
                    area,
                    buf,
                    " Large result ",
                    &[
                        size.as_str(),
                        "Rendering it with this chart may be slow.",
                        "Confirm to render anyway, or pass --unrestricted.",
                    ],
                )
            }
            Display::FormatHelp(help) => painter.format_help(area, buf, help),
            Display::Chart(figure) => painter.figure(area, buf, figure),
        }
    }
}

/// Render `display` into a fresh buffer of the given size.
pub fn render_to_buffer(display: &Display, (width, height): (u16, u16), depth: ColorDepth) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    DisplayWidget::new(display, depth).render(area, &mut buf);
    buf
}

/// Write a buffer to `out` line by line. Without color, trailing blanks are
/// trimmed so the output diffs cleanly.
pub fn write_buffer(buf: &Buffer, out: &mut impl Write, colored: bool) -> io::Result<()> {
    let area = buf.area;
    for y in area.top()..area.bottom() {
        if colored {
            for x in area.left()..area.right() {
                let cell = &buf[(x, y)];
                queue!(
                    out,
                    SetForegroundColor(term_color(cell.fg)),
                    SetBackgroundColor(term_color(cell.bg)),
                    Print(cell.symbol())
                )?;
            }
            queue!(out, ResetColor, Print("\n"))?;
        } else {
            let line: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            queue!(out, Print(line.trim_end()), Print("\n"))?;
        }
    }
    out.flush()
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

/// A dataset in chart coordinates, before conversion to ratatui types.
struct SeriesData {
    name: String,
    color: Rgb,
    points: Vec<(f64, f64)>,
}

struct AxisSpec {
    title: String,
    bounds: [f64; 2],
    labels: Vec<String>,
}

impl AxisSpec {
    fn numeric(title: &str, lo: f64, hi: f64) -> Self {
        Self {
            title: title.to_string(),
            bounds: [lo, hi],
            labels: vec![
                format_number(lo),
                format_number((lo + hi) / 2.0),
                format_number(hi),
            ],
        }
    }
}

struct Painter {
    depth: ColorDepth,
}

impl Painter {
    fn color(&self, rgb: Rgb) -> Color {
        self.depth.to_terminal(rgb)
    }

    fn fg(&self, rgb: Rgb) -> Style {
        Style::default().fg(self.color(rgb))
    }

    fn notice(&self, area: Rect, buf: &mut Buffer, title: &str, lines: &[&str]) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .title_style(Style::default().add_modifier(Modifier::BOLD));
        let text: Vec<Line> = lines.iter().map(|l| Line::from(l.to_string())).collect();
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn format_help(&self, area: Rect, buf: &mut Buffer, help: &FormatHelp) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        match &help.reason {
            Some(reason) => lines.push(Line::from(vec![
                Span::styled("Problem: ", bold),
                Span::raw(reason.clone()),
            ])),
            None => lines.push(Line::from(
                "The result could not be drawn with this chart.".to_string(),
            )),
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Expected data", bold)));
        lines.extend(
            help.explanation
                .lines()
                .map(|l| Line::from(l.to_string())),
        );
        if let Some(example) = &help.example {
            lines.push(Line::default());
            lines.push(Line::from(format!(
                "See `tabchart --examples {}`: {}",
                example.kind, example.name
            )));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {}: data does not fit ", help.kind.title()))
            .title_style(bold);
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    fn figure(&self, area: Rect, buf: &mut Buffer, figure: &Figure) {
        let colors = &figure.colors;
        let legend = figure.show_legend;
        match &figure.plot {
            Plot::Category(plot) => self.category(area, buf, plot, colors, legend),
            Plot::Pie(plot) => self.pies(area, buf, plot, colors),
            Plot::Xy(plot) => self.xy(area, buf, plot, colors, legend),
            Plot::Bubble(plot) => self.bubbles(area, buf, plot, colors, legend),
            Plot::Histogram(plot) => self.histogram(area, buf, plot, colors, legend),
            Plot::HeatMap(plot) => self.heat_map(area, buf, plot, colors),
            Plot::Candlestick(plot) => self.candles(area, buf, plot, colors),
            Plot::Graph(plot) => self.graph(area, buf, plot, colors),
            Plot::Table(plot) => self.table(area, buf, plot, colors),
            Plot::Blank => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn chart(
        &self,
        area: Rect,
        buf: &mut Buffer,
        series: &[SeriesData],
        graph_type: GraphType,
        marker: Marker,
        x: AxisSpec,
        y: AxisSpec,
        colors: &FigureColors,
        legend: bool,
    ) {
        let datasets: Vec<Dataset> = series
            .iter()
            .map(|s| {
                Dataset::default()
                    .name(s.name.clone())
                    .marker(marker)
                    .graph_type(graph_type)
                    .style(self.fg(s.color))
                    .data(&s.points)
            })
            .collect();
        let axis_style = self.fg(colors.foreground);
        let x_axis = Axis::default()
            .title(x.title)
            .bounds(x.bounds)
            .style(axis_style)
            .labels(x.labels);
        let y_axis = Axis::default()
            .title(y.title)
            .bounds(y.bounds)
            .style(axis_style)
            .labels(y.labels);
        let position = (legend && series.len() > 1).then_some(LegendPosition::TopRight);
        Chart::new(datasets)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend_position(position)
            .render(area, buf);
    }

    fn category(
        &self,
        area: Rect,
        buf: &mut Buffer,
        plot: &CategoryPlot,
        colors: &FigureColors,
        legend: bool,
    ) {
        let n = plot.categories.len();
        let k = plot.series.len().max(1) as f64;
        let finite = |values: &[f64]| -> Vec<(usize, f64)> {
            values
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .collect()
        };

        let mut data: Vec<SeriesData> = match plot.style {
            CategoryStyle::Bar => plot
                .series
                .iter()
                .enumerate()
                .map(|(j, s)| {
                    let offset = (j as f64 - (k - 1.0) / 2.0) * 0.8 / k;
                    SeriesData {
                        name: s.name.clone(),
                        color: s.color,
                        points: finite(&s.values)
                            .into_iter()
                            .map(|(i, v)| (i as f64 + offset, v))
                            .collect(),
                    }
                })
                .collect(),
            CategoryStyle::StackedBar => {
                let mut totals = vec![0.0; n];
                plot.series
                    .iter()
                    .map(|s| {
                        let points = finite(&s.values)
                            .into_iter()
                            .filter(|(i, _)| *i < n)
                            .map(|(i, v)| {
                                totals[i] += v;
                                (i as f64, totals[i])
                            })
                            .collect();
                        SeriesData {
                            name: s.name.clone(),
                            color: s.color,
                            points,
                        }
                    })
                    .collect()
            }
            CategoryStyle::Line | CategoryStyle::Area => plot
                .series
                .iter()
                .map(|s| SeriesData {
                    name: s.name.clone(),
                    color: s.color,
                    points: finite(&s.values)
                        .into_iter()
                        .map(|(i, v)| (i as f64, v))
                        .collect(),
                })
                .collect(),
        };
        // Taller stacks are drawn first so each segment stays visible.
        if plot.style == CategoryStyle::StackedBar {
            data.reverse();
        }

        let graph_type = match plot.style {
            CategoryStyle::Bar | CategoryStyle::StackedBar => GraphType::Bar,
            CategoryStyle::Line | CategoryStyle::Area => GraphType::Line,
        };
        let (lo, hi) = plot.value_range();
        let hi = if hi > lo { hi } else { lo + 1.0 };
        let x = AxisSpec {
            title: plot.x_title.clone(),
            bounds: [-0.5, n as f64 - 0.5],
            labels: category_labels(plot),
        };
        let y = AxisSpec::numeric(&plot.y_title, lo, hi);
        self.chart(area, buf, &data, graph_type, Marker::Braille, x, y, colors, legend);
    }

    fn pies(&self, area: Rect, buf: &mut Buffer, plot: &PiePlot, colors: &FigureColors) {
        if plot.pies.is_empty() {
            return;
        }
        let constraints = vec![Constraint::Fill(1); plot.pies.len()];
        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);
        let label_width = plot
            .pies
            .iter()
            .flat_map(|p| p.slices.iter())
            .map(|s| s.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);
        for (panel, pie) in panels.iter().zip(&plot.pies) {
            let total = pie.total();
            let lines: Vec<Line> = pie
                .slices
                .iter()
                .map(|slice| {
                    let share = if total > 0.0 { slice.value / total } else { 0.0 };
                    let filled = (share * PIE_BAR_WIDTH as f64).round() as usize;
                    Line::from(vec![
                        Span::styled(
                            format!("{:<width$} ", slice.label, width = label_width),
                            self.fg(colors.foreground),
                        ),
                        Span::styled("█".repeat(filled), self.fg(slice.color)),
                        Span::raw(format!(" {:.1}%", share * 100.0)),
                    ])
                })
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", pie.title));
            Paragraph::new(lines).block(block).render(*panel, buf);
        }
    }

    fn xy(&self, area: Rect, buf: &mut Buffer, plot: &XyPlot, colors: &FigureColors, legend: bool) {
        let Some(bounds) = plot.bounds() else {
            self.notice(area, buf, " Empty ", &["No plottable points."]);
            return;
        };
        let span = Duration::milliseconds((bounds.x_max - bounds.x_min).abs() as i64);
        let b = bounds.padded();
        let data: Vec<SeriesData> = plot
            .series
            .iter()
            .map(|s| SeriesData {
                name: s.name.clone(),
                color: s.color,
                points: match plot.style {
                    XyStyle::Step => step_path(&s.points),
                    XyStyle::Scatter | XyStyle::Line => s.points.clone(),
                },
            })
            .collect();
        let (graph_type, marker) = match plot.style {
            XyStyle::Scatter => (GraphType::Scatter, Marker::Dot),
            XyStyle::Line | XyStyle::Step => (GraphType::Line, Marker::Braille),
        };
        let x = match plot.x_axis {
            XyAxis::Numeric => AxisSpec::numeric(&plot.x_title, b.x_min, b.x_max),
            XyAxis::Temporal => AxisSpec {
                title: plot.x_title.clone(),
                bounds: [b.x_min, b.x_max],
                labels: [b.x_min, (b.x_min + b.x_max) / 2.0, b.x_max]
                    .iter()
                    .map(|v| format_epoch_millis(*v, span))
                    .collect(),
            },
        };
        let y = AxisSpec::numeric(&plot.y_title, b.y_min, b.y_max);
        self.chart(area, buf, &data, graph_type, marker, x, y, colors, legend);
    }

    fn bubbles(
        &self,
        area: Rect,
        buf: &mut Buffer,
        plot: &BubblePlot,
        colors: &FigureColors,
        legend: bool,
    ) {
        let Some(bounds) = Bounds::of_points(plot.points.iter().map(|p| (p.x, p.y))) else {
            self.notice(area, buf, " Empty ", &["No plottable points."]);
            return;
        };
        let b = bounds.padded();
        let max = plot.max_size();
        // Three size classes, drawn small to large.
        let class_of = |size: f64| {
            let share = if max > 0.0 { size.abs() / max } else { 0.0 };
            ((share * 3.0).ceil() as usize).clamp(1, 3) - 1
        };
        let mut classes: [Vec<(f64, f64)>; 3] = Default::default();
        for p in &plot.points {
            classes[class_of(p.size)].push((p.x, p.y));
        }
        let names = ["small", "medium", "large"];
        let markers = [Marker::Dot, Marker::HalfBlock, Marker::Block];
        let x = AxisSpec::numeric(&plot.x_title, b.x_min, b.x_max);
        let y = AxisSpec::numeric(&plot.y_title, b.y_min, b.y_max);
        let datasets: Vec<Dataset> = classes
            .iter()
            .zip(names.iter().zip(markers))
            .filter(|(points, _)| !points.is_empty())
            .map(|(points, (name, marker))| {
                Dataset::default()
                    .name(format!("{} {}", name, plot.size_title))
                    .marker(marker)
                    .graph_type(GraphType::Scatter)
                    .style(self.fg(plot.color))
                    .data(points)
            })
            .collect();
        let axis_style = self.fg(colors.foreground);
        let position = legend.then_some(LegendPosition::TopRight);
        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title(x.title)
                    .bounds(x.bounds)
                    .style(axis_style)
                    .labels(x.labels),
            )
            .y_axis(
                Axis::default()
                    .title(y.title)
                    .bounds(y.bounds)
                    .style(axis_style)
                    .labels(y.labels),
            )
            .legend_position(position)
            .render(area, buf);
    }

    fn histogram(
        &self,
        area: Rect,
        buf: &mut Buffer,
        plot: &HistogramPlot,
        colors: &FigureColors,
        legend: bool,
    ) {
        let bins = plot.series.iter().flat_map(|s| s.bins.iter());
        let Some(bounds) =
            Bounds::of_points(bins.flat_map(|b| [(b.start, 0.0), (b.end, b.count as f64)]))
        else {
            self.notice(area, buf, " Empty ", &["No finite values."]);
            return;
        };
        let data: Vec<SeriesData> = plot
            .series
            .iter()
            .map(|s| SeriesData {
                name: s.name.clone(),
                color: s.color,
                points: s
                    .bins
                    .iter()
                    .map(|b| ((b.start + b.end) / 2.0, b.count as f64))
                    .collect(),
            })
            .collect();
        let x = AxisSpec::numeric("", bounds.x_min, bounds.x_max);
        let y = AxisSpec::numeric("Count", 0.0, bounds.y_max.max(1.0));
        self.chart(area, buf, &data, GraphType::Bar, Marker::Braille, x, y, colors, legend);
    }

    fn heat_map(&self, area: Rect, buf: &mut Buffer, plot: &HeatMapPlot, colors: &FigureColors) {
        let (w, h) = (area.width as f64, area.height as f64);
        for cell in layout_treemap(&plot.root) {
            let x0 = area.x + (cell.rect.x * w).round() as u16;
            let y0 = area.y + (cell.rect.y * h).round() as u16;
            let x1 = area.x + ((cell.rect.x + cell.rect.w) * w).round() as u16;
            let y1 = area.y + ((cell.rect.y + cell.rect.h) * h).round() as u16;
            if x1 <= x0 || y1 <= y0 {
                continue;
            }
            let rect = Rect::new(x0, y0, x1 - x0, y1 - y0).intersection(area);
            if cell.leaf {
                let fill = plot.color_for(cell.color_value);
                let ink = if fill.luma() < 128 {
                    colors.background
                } else {
                    colors.foreground
                };
                let style = Style::default().bg(self.color(fill)).fg(self.color(ink));
                buf.set_style(rect, style);
                buf.set_stringn(rect.x, rect.y, &cell.label, rect.width as usize, style);
            } else if cell.depth == 0 {
                let style = self.fg(colors.foreground).add_modifier(Modifier::BOLD);
                let bottom = rect.y + rect.height.saturating_sub(1);
                buf.set_stringn(rect.x, bottom, &cell.label, rect.width as usize, style);
            }
        }
    }

    fn candles(&self, area: Rect, buf: &mut Buffer, plot: &CandlestickPlot, colors: &FigureColors) {
        let (Some(first), Some(last)) = (
            plot.candles.iter().map(|c| c.time).min(),
            plot.candles.iter().map(|c| c.time).max(),
        ) else {
            self.notice(area, buf, " Empty ", &["No candles to draw."]);
            return;
        };
        let lo = plot.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let hi = plot.candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let pad = (plot.tick_unit.millis() / 2) as f64;
        let x_bounds = [first as f64 - pad, last as f64 + pad];
        let y_pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        let y_bounds = [lo - y_pad, hi + y_pad];
        let label = |millis: i64| {
            from_epoch_millis(millis)
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        let (first_label, last_label) = (label(first), label(last));
        let rising = self.color(plot.rising);
        let falling = self.color(plot.falling);
        let body = pad * 0.6;
        let label_style = self.fg(colors.foreground);

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", plot.title)),
            )
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for c in &plot.candles {
                    let color = if c.is_rising() { rising } else { falling };
                    let t = c.time as f64;
                    ctx.draw(&canvas::Line::new(t, c.low, t, c.high, color));
                    let (bottom, top) = (c.open.min(c.close), c.open.max(c.close));
                    ctx.draw(&canvas::Rectangle {
                        x: t - body / 2.0,
                        y: bottom,
                        width: body,
                        height: top - bottom,
                        color,
                    });
                }
                ctx.print(
                    x_bounds[0],
                    y_bounds[0],
                    Line::styled(first_label.clone(), label_style),
                );
                ctx.print(
                    x_bounds[1] - pad * 4.0,
                    y_bounds[0],
                    Line::styled(last_label.clone(), label_style),
                );
            })
            .render(area, buf);
    }

    fn graph(&self, area: Rect, buf: &mut Buffer, plot: &GraphPlot, colors: &FigureColors) {
        let lines: Vec<Line> = plot
            .edges
            .iter()
            .map(|edge| {
                let arrow = if edge.connector == "--" { "──" } else { "─▶" };
                let mut spans = vec![
                    Span::styled(edge.from.clone(), self.fg(colors.foreground)),
                    Span::raw(format!(" {} ", arrow)),
                    Span::styled(edge.to.clone(), self.fg(colors.foreground)),
                ];
                if let Some(label) = &edge.label {
                    spans.push(Span::styled(
                        format!("  [{}]", label),
                        Style::default().add_modifier(Modifier::DIM),
                    ));
                }
                Line::from(spans)
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} edges ", plot.edges.len()));
        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn table(&self, area: Rect, buf: &mut Buffer, plot: &TablePlot, colors: &FigureColors) {
        let (table_area, footer) = match plot.truncated {
            Some(_) if area.height > 2 => {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Fill(1), Constraint::Length(1)])
                    .split(area);
                (parts[0], Some(parts[1]))
            }
            _ => (area, None),
        };

        let header_style = Style::default()
            .bg(self.color(colors.selected))
            .fg(self.color(colors.foreground))
            .add_modifier(Modifier::BOLD);
        let header = Row::new(plot.headers.clone()).style(header_style);
        let rows = plot
            .rows
            .iter()
            .zip(&plot.row_colors)
            .enumerate()
            .map(|(i, (cells, hints))| {
                let stripe = if i % 2 == 1 {
                    colors.alternate
                } else {
                    colors.background
                };
                let style = Style::default()
                    .bg(self.color(hints.background.unwrap_or(stripe)))
                    .fg(self.color(hints.foreground.unwrap_or(colors.foreground)));
                Row::new(cells.clone()).style(style)
            });
        let widths = vec![Constraint::Fill(1); plot.headers.len().max(1)];
        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .render(table_area, buf);

        if let (Some(notice), Some(footer)) = (plot.truncated, footer) {
            Paragraph::new(notice.to_string())
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .render(footer, buf);
        }
    }
}

/// Up to five category names spread across the axis. ratatui spaces axis
/// labels evenly, so each is the category nearest its slot.
fn category_labels(plot: &CategoryPlot) -> Vec<String> {
    let n = plot.categories.len();
    if n == 0 {
        return Vec::new();
    }
    let slots = n.min(5);
    if slots == 1 {
        return vec![plot.categories[0].text.clone()];
    }
    (0..slots)
        .map(|t| {
            let x = -0.5 + t as f64 * n as f64 / (slots - 1) as f64;
            let i = (x.round().max(0.0) as usize).min(n - 1);
            let label = &plot.categories[i];
            if label.full_size {
                label.text.clone()
            } else {
                String::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::strategy::figure::{CategoryLabel, Series};

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = Vec::new();
        write_buffer(buf, &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn panels_render_their_messages() {
        let display = Display::QueryFailed {
            message: "syntax error near SELEC".into(),
        };
        let buf = render_to_buffer(&display, (60, 6), ColorDepth::Monochrome);
        let text = buffer_text(&buf);
        assert!(text.contains("Query failed"));
        assert!(text.contains("syntax error near SELEC"));
    }

    #[test]
    fn category_labels_are_spread() {
        let plot = CategoryPlot {
            style: CategoryStyle::Bar,
            categories: (0..10)
                .map(|i| CategoryLabel {
                    text: format!("c{}", i),
                    full_size: true,
                })
                .collect(),
            series: vec![Series {
                name: "v".into(),
                color: Rgb::new(0, 0, 0),
                values: vec![1.0; 10],
            }],
            x_title: String::new(),
            y_title: String::new(),
        };
        let labels = category_labels(&plot);
        assert_eq!(labels.len(), 5);
        assert_eq!(labels.first().map(String::as_str), Some("c0"));
        assert_eq!(labels.last().map(String::as_str), Some("c9"));
    }

    #[test]
    fn blank_figures_draw_nothing() {
        let display = Display::Chart(Figure::new(&Theme::default(), Plot::Blank));
        let buf = render_to_buffer(&display, (20, 3), ColorDepth::Monochrome);
        assert_eq!(buffer_text(&buf), "\n\n\n");
    }
}
