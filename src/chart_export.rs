//! Chart export to PNG (plotters bitmap).
//!
//! A thin pass-through: build the model, let the strategy validate and shape
//! it, then rasterise the resulting [`Figure`].

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use chrono::Duration;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::chart_data::build_model;
use crate::chart_data::temporal::{format_epoch_millis, from_epoch_millis};
use crate::config::Rgb;
use crate::cursor::TabularCursor;
use crate::error::ChartError;
use crate::error_display::user_message_from_chart_error;
use crate::strategy::figure::{
    BubblePlot, CandlestickPlot, CategoryPlot, CategoryStyle, FigureColors, GraphPlot,
    HeatMapPlot, HistogramPlot, PiePlot, TablePlot, TickUnit, XyAxis, XyPlot, XyStyle,
};
use crate::strategy::figure::{format_number, layout_treemap, step_path, Bounds};
use crate::strategy::{dot_available, Figure, Plot, RenderContext, StrategyKind};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const WATERMARK: &str = "tabchart";

/// Render `raw` with the strategy `kind` and write it to `path` as a PNG.
pub fn export_png(
    path: &Path,
    kind: StrategyKind,
    raw: &mut dyn TabularCursor,
    ctx: &RenderContext<'_>,
    size: (u32, u32),
    watermark: bool,
) -> Result<()> {
    let figure = build_model(raw)
        .map_err(ChartError::from)
        .and_then(|model| kind.strategy().figure(raw, &model, ctx))
        .map_err(|e| eyre!("{}", user_message_from_chart_error(&e)))?;
    write_figure_png(path, &figure, size, watermark)
}

/// Write an already-built figure to `path`. Size is (width, height) in pixels.
pub fn write_figure_png(
    path: &Path,
    figure: &Figure,
    (width, height): (u32, u32),
    watermark: bool,
) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(eyre!("Export size must be non-zero, got {}x{}", width, height));
    }
    if let Plot::Graph(graph) = &figure.plot {
        if try_graphviz(dot_available().as_deref(), path, graph, (width, height)) {
            return Ok(());
        }
    }

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&color(figure.colors.background))?;
    let colors = &figure.colors;
    let legend = figure.show_legend;

    match &figure.plot {
        Plot::Category(plot) => draw_category(&root, plot, colors, legend)?,
        Plot::Pie(plot) => draw_pies(&root, plot, colors)?,
        Plot::Xy(plot) => draw_xy(&root, plot, colors, legend)?,
        Plot::Bubble(plot) => draw_bubbles(&root, plot, colors)?,
        Plot::Histogram(plot) => draw_histogram(&root, plot, colors, legend)?,
        Plot::HeatMap(plot) => draw_heat_map(&root, plot, colors)?,
        Plot::Candlestick(plot) => draw_candles(&root, plot, colors)?,
        Plot::Graph(plot) => draw_text_lines(&root, plot.dot.lines(), colors)?,
        Plot::Table(plot) => draw_table(&root, plot, colors)?,
        Plot::Blank => {}
    }

    if watermark {
        let (w, h) = root.dim_in_pixel();
        let style = (FONT, 14.0)
            .into_font()
            .color(&color(colors.foreground).mix(0.4));
        root.draw(&Text::new(
            WATERMARK,
            (w as i32 - 90, h as i32 - 24),
            style,
        ))?;
    }

    root.present()?;
    debug!("wrote {}x{} PNG to {}", width, height, path.display());
    Ok(())
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn text_style(c: Rgb, size: f64) -> TextStyle<'static> {
    (FONT, size).into_font().color(&color(c))
}

/// Pipe the DOT text through the Graphviz executable `dot`. Returns false when
/// it is missing or fails, so the caller can draw the text instead.
fn try_graphviz(
    dot: Option<&Path>,
    path: &Path,
    graph: &GraphPlot,
    (width, height): (u32, u32),
) -> bool {
    let Some(dot) = dot else {
        debug!("graphviz not found, drawing DOT text");
        return false;
    };
    let size = format!("-Gsize={:.2},{:.2}!", width as f64 / 96.0, height as f64 / 96.0);
    let child = Command::new(dot)
        .args(["-Tpng", "-Gdpi=96", &size, "-o"])
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            warn!("could not start graphviz: {}", e);
            return false;
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(graph.dot.as_bytes()) {
            warn!("could not send graph to graphviz: {}", e);
        }
    }
    match child.wait_with_output() {
        Ok(out) if out.status.success() => true,
        Ok(out) => {
            warn!(
                "graphviz failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            );
            false
        }
        Err(e) => {
            warn!("graphviz failed: {}", e);
            false
        }
    }
}

fn draw_category(
    root: &Area<'_>,
    plot: &CategoryPlot,
    colors: &FigureColors,
    legend: bool,
) -> Result<()> {
    let n = plot.categories.len().max(1);
    let (lo, hi) = plot.value_range();
    let span = if hi > lo { hi - lo } else { 1.0 };
    let lo = if lo < 0.0 { lo - span * 0.05 } else { lo };
    let hi = hi + span * 0.05;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), lo..hi)?;

    let categories = plot.categories.clone();
    let x_formatter = move |v: &f64| {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        categories
            .get(i as usize)
            .filter(|c| c.full_size)
            .map(|c| c.text.clone())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(60))
        .x_label_formatter(&x_formatter)
        .x_desc(plot.x_title.as_str())
        .y_desc(plot.y_title.as_str())
        .axis_style(color(colors.foreground))
        .light_line_style(color(colors.alternate))
        .bold_line_style(color(colors.alternate))
        .label_style(text_style(colors.foreground, 12.0))
        .draw()?;

    let k = plot.series.len().max(1) as f64;
    let group = 0.8;
    let mut pos_totals = vec![0.0_f64; plot.categories.len()];
    let mut neg_totals = vec![0.0_f64; plot.categories.len()];

    for (j, series) in plot.series.iter().enumerate() {
        let c = color(series.color);
        let finite = series
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i, *v));
        let anno = match plot.style {
            CategoryStyle::Bar => {
                let w = group / k;
                chart.draw_series(finite.map(|(i, v)| {
                    let x0 = i as f64 - group / 2.0 + j as f64 * w;
                    Rectangle::new([(x0, 0.0), (x0 + w, v)], c.filled())
                }))?
            }
            CategoryStyle::StackedBar => {
                let bars: Vec<_> = finite
                    .map(|(i, v)| {
                        let totals = if v < 0.0 {
                            &mut neg_totals
                        } else {
                            &mut pos_totals
                        };
                        let base = totals[i];
                        totals[i] += v;
                        let x0 = i as f64 - group / 2.0;
                        Rectangle::new([(x0, base), (x0 + group, base + v)], c.filled())
                    })
                    .collect();
                chart.draw_series(bars)?
            }
            CategoryStyle::Line => chart.draw_series(LineSeries::new(
                finite.map(|(i, v)| (i as f64, v)),
                c.stroke_width(2),
            ))?,
            CategoryStyle::Area => chart.draw_series(
                AreaSeries::new(finite.map(|(i, v)| (i as f64, v)), 0.0, c.mix(0.3))
                    .border_style(c.stroke_width(2)),
            )?,
        };
        anno.label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], c.filled()));
    }

    if legend && plot.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(color(colors.background).mix(0.8))
            .border_style(color(colors.foreground))
            .label_font(text_style(colors.foreground, 12.0))
            .draw()?;
    }
    Ok(())
}

fn draw_pies(root: &Area<'_>, plot: &PiePlot, colors: &FigureColors) -> Result<()> {
    if plot.pies.is_empty() {
        return Ok(());
    }
    let panels = root.split_evenly((1, plot.pies.len()));
    for (panel, pie) in panels.iter().zip(&plot.pies) {
        let (w, h) = panel.dim_in_pixel();
        panel.draw(&Text::new(
            pie.title.clone(),
            (10, 10),
            text_style(colors.foreground, 16.0),
        ))?;
        let slices: Vec<_> = pie.slices.iter().filter(|s| s.value > 0.0).collect();
        if slices.is_empty() {
            continue;
        }
        let center = (w as i32 / 2, h as i32 / 2 + 10);
        let radius = (w.min(h) as f64 / 2.0 - 50.0).max(10.0);
        let sizes: Vec<f64> = slices.iter().map(|s| s.value).collect();
        let slice_colors: Vec<RGBColor> = slices.iter().map(|s| color(s.color)).collect();
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        let mut element = plotters::element::Pie::new(&center, &radius, &sizes, &slice_colors, &labels);
        element.label_style(text_style(colors.foreground, 12.0));
        panel.draw(&element)?;
    }
    Ok(())
}

fn temporal_span(bounds: &Bounds) -> Duration {
    Duration::milliseconds((bounds.x_max - bounds.x_min).abs() as i64)
}

fn draw_xy(root: &Area<'_>, plot: &XyPlot, colors: &FigureColors, legend: bool) -> Result<()> {
    let Some(bounds) = plot.bounds() else {
        return draw_text_lines(root, ["No plottable points"].into_iter(), colors);
    };
    let span = temporal_span(&bounds);
    let b = bounds.padded();
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(b.x_min..b.x_max, b.y_min..b.y_max)?;

    let x_axis = plot.x_axis;
    let x_formatter = move |v: &f64| match x_axis {
        XyAxis::Temporal => format_epoch_millis(*v, span),
        XyAxis::Numeric => format_number(*v),
    };
    let y_formatter = |v: &f64| format_number(*v);
    chart
        .configure_mesh()
        .x_desc(plot.x_title.as_str())
        .y_desc(plot.y_title.as_str())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .axis_style(color(colors.foreground))
        .light_line_style(color(colors.alternate))
        .bold_line_style(color(colors.alternate))
        .label_style(text_style(colors.foreground, 12.0))
        .draw()?;

    for series in &plot.series {
        let c = color(series.color);
        let points = series.points.iter().copied();
        let anno = match plot.style {
            XyStyle::Scatter => chart.draw_series(PointSeries::of_element(
                points,
                3,
                c,
                &|coord, size, style| {
                    EmptyElement::at(coord) + Circle::new((0, 0), size, style.filled())
                },
            ))?,
            XyStyle::Line => chart.draw_series(LineSeries::new(points, c.stroke_width(2)))?,
            XyStyle::Step => {
                chart.draw_series(LineSeries::new(step_path(&series.points), c.stroke_width(2)))?
            }
        };
        anno.label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], c.stroke_width(2)));
    }

    if legend && plot.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(color(colors.background).mix(0.8))
            .border_style(color(colors.foreground))
            .label_font(text_style(colors.foreground, 12.0))
            .draw()?;
    }
    Ok(())
}

fn draw_bubbles(root: &Area<'_>, plot: &BubblePlot, colors: &FigureColors) -> Result<()> {
    let Some(bounds) = Bounds::of_points(plot.points.iter().map(|p| (p.x, p.y))) else {
        return draw_text_lines(root, ["No plottable points"].into_iter(), colors);
    };
    let b = bounds.padded();
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(b.x_min..b.x_max, b.y_min..b.y_max)?;
    chart
        .configure_mesh()
        .x_desc(plot.x_title.as_str())
        .y_desc(plot.y_title.as_str())
        .axis_style(color(colors.foreground))
        .light_line_style(color(colors.alternate))
        .bold_line_style(color(colors.alternate))
        .label_style(text_style(colors.foreground, 12.0))
        .draw()?;

    let max = plot.max_size();
    let c = color(plot.color);
    chart.draw_series(plot.points.iter().map(|p| {
        let share = if max > 0.0 { p.size.abs() / max } else { 0.0 };
        let radius = (4.0 + 26.0 * share.sqrt()) as i32;
        Circle::new((p.x, p.y), radius, c.mix(0.5).filled())
    }))?;
    chart.draw_series(plot.points.iter().map(|p| {
        Text::new(p.label.clone(), (p.x, p.y), text_style(colors.foreground, 11.0))
    }))?;
    Ok(())
}

fn draw_histogram(
    root: &Area<'_>,
    plot: &HistogramPlot,
    colors: &FigureColors,
    legend: bool,
) -> Result<()> {
    let bins = plot.series.iter().flat_map(|s| s.bins.iter());
    let Some(bounds) = Bounds::of_points(
        bins.flat_map(|b| [(b.start, 0.0), (b.end, b.count as f64)]),
    ) else {
        return draw_text_lines(root, ["No finite values"].into_iter(), colors);
    };
    let y_max = (bounds.y_max * 1.1).max(1.0);
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, 0.0..y_max)?;
    chart
        .configure_mesh()
        .y_desc("Count")
        .x_label_formatter(&|v: &f64| format_number(*v))
        .axis_style(color(colors.foreground))
        .light_line_style(color(colors.alternate))
        .bold_line_style(color(colors.alternate))
        .label_style(text_style(colors.foreground, 12.0))
        .draw()?;

    let alpha = if plot.series.len() > 1 { 0.5 } else { 0.9 };
    for series in &plot.series {
        let c = color(series.color);
        chart
            .draw_series(series.bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], c.mix(alpha).filled())
            }))?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], c.filled()));
    }
    if legend && plot.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(color(colors.background).mix(0.8))
            .border_style(color(colors.foreground))
            .label_font(text_style(colors.foreground, 12.0))
            .draw()?;
    }
    Ok(())
}

fn draw_heat_map(root: &Area<'_>, plot: &HeatMapPlot, colors: &FigureColors) -> Result<()> {
    let (w, h) = root.dim_in_pixel();
    let (w, h) = (w as f64, h as f64);
    let border = color(colors.background);
    for cell in layout_treemap(&plot.root) {
        let x0 = (cell.rect.x * w) as i32;
        let y0 = (cell.rect.y * h) as i32;
        let x1 = ((cell.rect.x + cell.rect.w) * w) as i32;
        let y1 = ((cell.rect.y + cell.rect.h) * h) as i32;
        if cell.leaf {
            let fill = color(plot.color_for(cell.color_value));
            root.draw(&Rectangle::new([(x0, y0), (x1, y1)], fill.filled()))?;
        }
        let stroke = if cell.leaf { 1 } else { 3 };
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], border.stroke_width(stroke)))?;
        let label_fits = (x1 - x0) > 40 && (y1 - y0) > 18;
        if label_fits && (cell.leaf || cell.depth == 0) {
            let fill = plot.color_for(cell.color_value);
            let ink = if cell.leaf && fill.luma() < 128 {
                colors.background
            } else {
                colors.foreground
            };
            root.draw(&Text::new(
                cell.label.clone(),
                (x0 + 4, y0 + 4),
                text_style(ink, if cell.leaf { 12.0 } else { 14.0 }),
            ))?;
        }
    }
    Ok(())
}

fn tick_format(unit: TickUnit) -> &'static str {
    match unit {
        TickUnit::Hour => "%m-%d %H:%M",
        TickUnit::Day | TickUnit::Week => "%Y-%m-%d",
        TickUnit::Month => "%Y-%m",
    }
}

fn draw_candles(root: &Area<'_>, plot: &CandlestickPlot, colors: &FigureColors) -> Result<()> {
    let (Some(first), Some(last)) = (
        plot.candles.iter().map(|c| c.time).min(),
        plot.candles.iter().map(|c| c.time).max(),
    ) else {
        return draw_text_lines(root, ["No candles to draw"].into_iter(), colors);
    };
    let lo = plot.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let hi = plot.candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let pad_x = (plot.tick_unit.millis() / 2) as f64;
    let (x0, x1) = (first as f64 - pad_x, last as f64 + pad_x);
    let pad_y = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };

    let (_, height) = root.dim_in_pixel();
    let (price_area, volume_area) = if plot.has_volume {
        let (upper, lower) = root.split_vertically((height as i32) * 3 / 4);
        (upper, Some(lower))
    } else {
        (root.clone(), None)
    };

    let tick_count = (((x1 - x0) / plot.tick_unit.millis() as f64).ceil() as usize).clamp(2, 24);
    let fmt = tick_format(plot.tick_unit);
    let x_formatter = move |v: &f64| {
        from_epoch_millis(*v as i64)
            .map(|t| t.format(fmt).to_string())
            .unwrap_or_default()
    };

    let mut chart = ChartBuilder::on(&price_area)
        .margin(20)
        .caption(plot.title.as_str(), text_style(colors.foreground, 18.0))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, (lo - pad_y)..(hi + pad_y))?;
    chart
        .configure_mesh()
        .x_labels(tick_count)
        .x_label_formatter(&x_formatter)
        .axis_style(color(colors.foreground))
        .light_line_style(color(colors.alternate))
        .bold_line_style(color(colors.alternate))
        .label_style(text_style(colors.foreground, 12.0))
        .draw()?;

    let (w, _) = price_area.dim_in_pixel();
    let body = ((w as usize / plot.candles.len().max(1)) as u32 / 2).clamp(1, 15);
    let (rising, falling) = (color(plot.rising), color(plot.falling));
    chart.draw_series(plot.candles.iter().map(|c| {
        CandleStick::new(
            c.time as f64,
            c.open,
            c.high,
            c.low,
            c.close,
            rising.filled(),
            falling.filled(),
            body,
        )
    }))?;

    if let Some(volume_area) = volume_area {
        let max_volume = plot
            .candles
            .iter()
            .filter_map(|c| c.volume)
            .fold(0.0, f64::max)
            .max(1.0);
        let mut chart = ChartBuilder::on(&volume_area)
            .margin(20)
            .x_label_area_size(10)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, 0.0..max_volume * 1.1)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_desc("Volume")
            .axis_style(color(colors.foreground))
            .light_line_style(color(colors.alternate))
            .label_style(text_style(colors.foreground, 11.0))
            .draw()?;
        let half = pad_x * 0.6;
        chart.draw_series(plot.candles.iter().filter_map(|c| {
            let v = c.volume?;
            let fill = if c.is_rising() { rising } else { falling };
            let t = c.time as f64;
            Some(Rectangle::new([(t - half, 0.0), (t + half, v)], fill.mix(0.7).filled()))
        }))?;
    }
    Ok(())
}

fn draw_text_lines<'s>(
    root: &Area<'_>,
    lines: impl Iterator<Item = &'s str>,
    colors: &FigureColors,
) -> Result<()> {
    let style = text_style(colors.foreground, 14.0);
    let (_, h) = root.dim_in_pixel();
    for (i, line) in lines.enumerate() {
        let y = 16 + i as i32 * 18;
        if y > h as i32 - 18 {
            break;
        }
        root.draw(&Text::new(line.to_string(), (16, y), style.clone()))?;
    }
    Ok(())
}

fn draw_table(root: &Area<'_>, plot: &TablePlot, colors: &FigureColors) -> Result<()> {
    const ROW_H: i32 = 20;
    const PAD: i32 = 6;
    let (w, h) = root.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let cols = plot.headers.len().max(1) as i32;
    let col_w = (w - 2 * PAD) / cols;
    let footer = if plot.truncated.is_some() { ROW_H } else { 0 };
    let max_rows = ((h - footer - 2 * PAD) / ROW_H - 1).max(0) as usize;

    let header_style = text_style(colors.foreground, 13.0);
    let y = PAD;
    root.draw(&Rectangle::new(
        [(PAD, y), (w - PAD, y + ROW_H)],
        color(colors.selected).filled(),
    ))?;
    for (c, name) in plot.headers.iter().enumerate() {
        root.draw(&Text::new(
            name.clone(),
            (PAD + c as i32 * col_w + 4, y + 3),
            header_style.clone(),
        ))?;
    }

    for (r, (row, hints)) in plot.rows.iter().zip(&plot.row_colors).take(max_rows).enumerate() {
        let y = PAD + (r as i32 + 1) * ROW_H;
        let stripe = if r % 2 == 1 {
            colors.alternate
        } else {
            colors.background
        };
        let bg = hints.background.unwrap_or(stripe);
        root.draw(&Rectangle::new(
            [(PAD, y), (w - PAD, y + ROW_H)],
            color(bg).filled(),
        ))?;
        let style = text_style(hints.foreground.unwrap_or(colors.foreground), 12.0);
        for (c, cell) in row.iter().enumerate() {
            root.draw(&Text::new(
                cell.clone(),
                (PAD + c as i32 * col_w + 4, y + 4),
                style.clone(),
            ))?;
        }
    }

    let hidden = plot.rows.len().saturating_sub(max_rows);
    let notice = match (plot.truncated, hidden) {
        (Some(n), _) => Some(n.to_string()),
        (None, hidden) if hidden > 0 => Some(format!(
            "Showing {} of {} rows; some rows not shown",
            max_rows,
            plot.rows.len()
        )),
        _ => None,
    };
    if let Some(notice) = notice {
        root.draw(&Text::new(
            notice,
            (PAD, h - ROW_H),
            text_style(colors.foreground, 12.0),
        ))?;
    }
    Ok(())
}

/// Export options resolved from config and command-line overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub watermark: bool,
}

impl ExportOptions {
    pub fn from_config(config: &crate::config::ExportConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            watermark: config.watermark,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::figure::Edge;
    use tempfile::TempDir;

    fn graph() -> GraphPlot {
        let edges = vec![Edge {
            from: "a".into(),
            to: "b".into(),
            label: None,
            style: None,
            connector: "->".into(),
        }];
        GraphPlot {
            dot: crate::strategy::to_dot(&edges),
            edges,
        }
    }

    #[test]
    fn missing_graphviz_falls_back_to_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.png");
        assert!(!try_graphviz(None, &path, &graph(), (320, 240)));
        assert!(!path.exists());
    }

    #[test]
    fn graphviz_that_cannot_start_falls_back_to_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.png");
        let dot = dir.path().join("no-such-dot");
        assert!(!try_graphviz(Some(&dot), &path, &graph(), (320, 240)));
        assert!(!path.exists());
    }
}
