// PNG preview of a compiled RenderSpec, drawn with plotters

use std::collections::HashMap;
use std::f64::consts::PI;

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::format;
use crate::ir::{AxisSpec, AxisType, MetricCardSpec, Radius, RenderSpec, SeriesSpec, SeriesType};
use crate::palette::parse_hex;
use crate::scale;
use crate::style::TextAlign;

const FONT: &str = "sans-serif";
/// Share of a category slot covered by bars
const BAR_BAND: f64 = 0.8;
const VALUE_TICKS: usize = 6;
const PLACEHOLDER_GRAY: RGBColor = RGBColor(150, 150, 150);
/// Largest preview side in pixels
const MAX_SIDE: u32 = 16_384;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
}

pub fn render_png(spec: &RenderSpec, config: &PreviewConfig) -> Result<Vec<u8>> {
    if config.width == 0 || config.height == 0 {
        anyhow::bail!("Cannot render a {}x{} preview", config.width, config.height);
    }
    if config.width > MAX_SIDE || config.height > MAX_SIDE {
        anyhow::bail!("Preview size {}x{} exceeds {} pixels per side", config.width, config.height, MAX_SIDE);
    }

    let len = (config.width as usize)
        .checked_mul(config.height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .with_context(|| format!("Preview size {}x{} is too large", config.width, config.height))?;
    let mut buffer = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (config.width, config.height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        // 1. Title block
        let body = match &spec.title {
            Some(title) => {
                let heading = if title.subtext.is_some() { 50 } else { 30 };
                let (top, body) = root.split_vertically(heading);
                let x = align_x(title.left, config.width);
                let anchor = Pos::new(align_pos(title.left), VPos::Top);
                draw_text(&top, &title.text, (x, 6), title.text_style.font_size, &rgb(&title.text_style.color), anchor)?;
                if let Some(subtext) = &title.subtext {
                    draw_text(&top, subtext, (x, 30), title.subtext_style.font_size, &rgb(&title.subtext_style.color), anchor)?;
                }
                body
            }
            None => root.clone(),
        };

        // 2. Body by chart shape
        if let Some(placeholder) = &spec.placeholder {
            let (w, h) = body.dim_in_pixel();
            let center = Pos::new(HPos::Center, VPos::Center);
            draw_text(&body, &placeholder.message, (w as i32 / 2, h as i32 / 2), 14, &PLACEHOLDER_GRAY, center)?;
        } else if let Some(card) = &spec.metric_card {
            draw_card(&body, card)?;
        } else if spec.series.iter().any(|s| s.kind == SeriesType::Pie) {
            draw_pie(&body, spec)?;
        } else {
            draw_cartesian(&body, spec)?;
        }

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, config.width, config.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    log::debug!("rendered {}x{} preview ({} bytes)", config.width, config.height, png_bytes.len());
    Ok(png_bytes)
}

fn draw_card(area: &Area, card: &MetricCardSpec) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let x = align_x(card.align, w);
    let anchor = Pos::new(align_pos(card.align), VPos::Center);
    let color = rgb(&card.value_style.color);
    draw_text(area, &card.label, (x, h as i32 / 2 - 40), 14, &color, anchor)?;
    draw_text(area, &card.formatted, (x, h as i32 / 2), card.value_style.font_size, &color, anchor)
}

fn draw_pie(area: &Area, spec: &RenderSpec) -> Result<()> {
    let Some(series) = spec.series.iter().find(|s| s.kind == SeriesType::Pie) else {
        return Ok(());
    };
    let total: f64 = series.data.iter().filter_map(|p| p.value).filter(|v| *v > 0.0).sum();
    if total <= 0.0 {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let half = w.min(h) as f64 / 2.0;
    let (inner, outer) = match &series.radius {
        Some(Radius::Band([inner, outer])) => (percent(inner) * half, percent(outer) * half),
        Some(Radius::Single(outer)) => (0.0, percent(outer) * half),
        None => (0.0, 0.7 * half),
    };

    let mut start = -PI / 2.0;
    for (i, point) in series.data.iter().enumerate() {
        let Some(value) = point.value.filter(|v| *v > 0.0) else {
            continue;
        };
        let end = start + value / total * 2.0 * PI;
        let color = point_color(spec, point.item_style.as_ref().and_then(|s| s.color.as_deref()), i);
        area.draw(&Polygon::new(slice_polygon(center, inner, outer, start, end), color.filled()))
            .context("Failed to draw pie slice")?;
        start = end;
    }
    Ok(())
}

fn draw_cartesian(area: &Area, spec: &RenderSpec) -> Result<()> {
    let (Some(x_axis), Some(y_axis)) = (&spec.x_axis, &spec.y_axis) else {
        return Ok(());
    };
    let horizontal = x_axis.kind == AxisType::Value;
    let (category_axis, value_axis) = if horizontal { (y_axis, x_axis) } else { (x_axis, y_axis) };

    let count = category_axis.data.as_ref().map_or(0, |d| d.len()).max(1) as f64;
    let (min, max) = match (value_axis.min, value_axis.max) {
        (Some(min), Some(max)) if min < max => (min, max),
        (min, max) => scale::pad_range(min.unwrap_or(0.0), max.unwrap_or(0.0)),
    };
    let (x_range, y_range) = if horizontal { (min..max, 0.0..count) } else { (0.0..count, min..max) };

    let (top, bottom, left, right) = spec
        .grid
        .as_ref()
        .map_or((20, 20, 20, 20), |g| (g.top as i32, g.bottom as i32, g.left as i32, g.right as i32));

    let mut chart = ChartBuilder::on(area)
        .margin_top(top)
        .margin_bottom(bottom)
        .margin_left(left)
        .margin_right(right)
        .x_label_area_size(if horizontal { 30 } else { 40 })
        .y_label_area_size(if horizontal { 90 } else { 60 })
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    // 1. Mesh: compiled value ticks, category labels drawn separately
    let value_label = |v: &f64| value_tick_label(value_axis, *v);
    {
        let mut mesh = chart.configure_mesh();
        if horizontal {
            mesh.y_labels(0).disable_y_mesh().x_labels(VALUE_TICKS).x_label_formatter(&value_label);
            if !value_axis.split_line.show {
                mesh.disable_x_mesh();
            }
        } else {
            mesh.x_labels(0).disable_x_mesh().y_labels(VALUE_TICKS).y_label_formatter(&value_label);
            if !value_axis.split_line.show {
                mesh.disable_y_mesh();
            }
        }
        if let Some(name) = &x_axis.name {
            mesh.x_desc(name.as_str());
        }
        if let Some(name) = &y_axis.name {
            mesh.y_desc(name.as_str());
        }
        mesh.draw().context("Failed to draw mesh")?;
    }

    if category_axis.axis_label.show {
        let anchor = if horizontal {
            Pos::new(HPos::Right, VPos::Center)
        } else {
            Pos::new(HPos::Center, VPos::Top)
        };
        let style = (FONT, category_axis.axis_label.text_style.font_size as f64)
            .into_font()
            .color(&rgb(&category_axis.axis_label.text_style.color))
            .pos(anchor);
        chart
            .draw_series(category_axis.axis_label.labels.iter().enumerate().map(|(i, label)| {
                Text::new(label.replace('\n', " "), place(horizontal, i as f64 + 0.5, min), style.clone())
            }))
            .context("Failed to draw category labels")?;
    }

    // 2. Bars: stacked series share a slot, the others get one each
    let mut slots: Vec<String> = Vec::new();
    for (i, series) in spec.series.iter().enumerate().filter(|(_, s)| s.kind == SeriesType::Bar) {
        let key = slot_key(i, series);
        if !slots.contains(&key) {
            slots.push(key);
        }
    }
    let width = BAR_BAND / slots.len().max(1) as f64;

    let mut stacks = StackAccumulator::default();
    for (i, series) in spec.series.iter().enumerate() {
        let color = point_color(spec, series.item_style.color.as_deref(), i);
        match series.kind {
            SeriesType::Bar => {
                let slot = slots.iter().position(|k| *k == slot_key(i, series)).unwrap_or(0);
                let offset = (1.0 - BAR_BAND) / 2.0 + slot as f64 * width;
                let bars: Vec<_> = series
                    .data
                    .iter()
                    .enumerate()
                    .filter_map(|(cat, point)| {
                        let (base, top) = stacks.span(series.stack.as_deref(), cat, point.value?);
                        let lo = cat as f64 + offset;
                        Some(Rectangle::new(
                            [place(horizontal, lo, base), place(horizontal, lo + width, top)],
                            color.filled(),
                        ))
                    })
                    .collect();
                chart.draw_series(bars).context("Failed to draw bar series")?;
            }
            SeriesType::Line => {
                let spans: Vec<(f64, f64, f64)> = series
                    .data
                    .iter()
                    .enumerate()
                    .filter_map(|(cat, point)| {
                        let (base, top) = stacks.span(series.stack.as_deref(), cat, point.value?);
                        Some((cat as f64 + 0.5, base, top))
                    })
                    .collect();

                if let Some(area_style) = &series.area_style {
                    let mut outline: Vec<(f64, f64)> =
                        spans.iter().map(|(c, _, top)| place(horizontal, *c, *top)).collect();
                    outline.extend(spans.iter().rev().map(|(c, base, _)| place(horizontal, *c, *base)));
                    chart
                        .draw_series(std::iter::once(Polygon::new(outline, color.mix(area_style.opacity).filled())))
                        .context("Failed to draw area")?;
                }
                let points = spans.iter().map(|(c, _, top)| place(horizontal, *c, *top));
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .context("Failed to draw line series")?;
            }
            SeriesType::Pie => {}
        }
    }

    Ok(())
}

/// Running positive and negative totals per (stack, category)
#[derive(Default)]
struct StackAccumulator {
    totals: HashMap<(String, usize), (f64, f64)>,
}

impl StackAccumulator {
    /// Base and top of a segment; unstacked values always start at zero
    fn span(&mut self, stack: Option<&str>, category: usize, value: f64) -> (f64, f64) {
        let Some(stack) = stack else {
            return (0.0, value);
        };
        let (positive, negative) = self.totals.entry((stack.to_string(), category)).or_insert((0.0, 0.0));
        let total = if value >= 0.0 { positive } else { negative };
        let base = *total;
        *total += value;
        (base, *total)
    }
}

fn slot_key(index: usize, series: &SeriesSpec) -> String {
    series.stack.clone().unwrap_or_else(|| format!("series-{}", index))
}

fn place(horizontal: bool, category: f64, value: f64) -> (f64, f64) {
    if horizontal {
        (value, category)
    } else {
        (category, value)
    }
}

/// Label of the nearest compiled tick, or the raw number between ticks
fn value_tick_label(axis: &AxisSpec, value: f64) -> String {
    let tolerance = 1e-9 * value.abs().max(1.0);
    axis.axis_label
        .ticks
        .iter()
        .zip(&axis.axis_label.labels)
        .find(|(tick, _)| (*tick - value).abs() <= tolerance)
        .map(|(_, label)| label.clone())
        .unwrap_or_else(|| format::raw_number(value))
}

/// Outline of a pie slice (or donut segment when `inner > 0`), clockwise from `start`
fn slice_polygon(center: (i32, i32), inner: f64, outer: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = ((end - start) / (PI / 90.0)).ceil().max(1.0) as usize;
    let at = |radius: f64, k: usize| {
        let angle = start + (end - start) * k as f64 / steps as f64;
        (
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        )
    };

    let mut points: Vec<(i32, i32)> = (0..=steps).map(|k| at(outer, k)).collect();
    if inner > 0.0 {
        points.extend((0..=steps).rev().map(|k| at(inner, k)));
    } else {
        points.push(center);
    }
    points
}

fn percent(radius: &str) -> f64 {
    radius.trim().trim_end_matches('%').parse::<f64>().map(|p| p / 100.0).unwrap_or(0.7)
}

fn draw_text(area: &Area, text: &str, at: (i32, i32), size: u32, color: &RGBColor, anchor: Pos) -> Result<()> {
    let style = (FONT, size as f64).into_font().color(color).pos(anchor);
    area.draw(&Text::new(text.to_string(), at, style)).context("Failed to draw text")?;
    Ok(())
}

fn align_x(align: TextAlign, width: u32) -> i32 {
    match align {
        TextAlign::Left => 10,
        TextAlign::Center => width as i32 / 2,
        TextAlign::Right => width as i32 - 10,
    }
}

fn align_pos(align: TextAlign) -> HPos {
    match align {
        TextAlign::Left => HPos::Left,
        TextAlign::Center => HPos::Center,
        TextAlign::Right => HPos::Right,
    }
}

fn rgb(hex: &str) -> RGBColor {
    parse_hex(hex).map_or(BLACK, |(r, g, b)| RGBColor(r, g, b))
}

fn point_color(spec: &RenderSpec, explicit: Option<&str>, index: usize) -> RGBColor {
    let fallback = spec.color.get(index % spec.color.len().max(1)).map(String::as_str);
    explicit.or(fallback).map_or(BLACK, rgb)
}
