// Pie and donut charts: one series, one slice per category

use super::legend;
use super::tooltip;
use super::Context;
use crate::format;
use crate::ir::{ChartData, DataPoint, ItemStyle, LabelSpec, Radius, RenderSpec, SeriesSpec, SeriesType};
use crate::model::ChartKind;

pub const PIE_RADIUS: &str = "70%";
pub const DONUT_INNER_RADIUS: &str = "40%";
pub const SLICE_LABEL: &str = "{name}: {percent}%";

pub fn radius(kind: ChartKind) -> Radius {
    match kind {
        ChartKind::Donut => Radius::Band([DONUT_INNER_RADIUS.to_string(), PIE_RADIUS.to_string()]),
        _ => Radius::Single(PIE_RADIUS.to_string()),
    }
}

pub fn compile(ctx: &Context, data: &ChartData, spec: &mut RenderSpec) {
    // Only the first metric is drawn; pies have no stack role
    let Some(series) = data.series.first() else {
        return;
    };
    let format = ctx.resolved.metrics.first().map(|m| m.format.clone()).unwrap_or_default();
    let metric_label = ctx.resolved.metrics.first().map(|m| m.column.label.clone()).unwrap_or_default();

    // Categories without a value have no slice
    let slices: Vec<(String, f64)> = data
        .categories
        .iter()
        .zip(&series.values)
        .filter_map(|(name, value)| value.map(|v| (name.clone(), v)))
        .collect();

    let points = slices
        .iter()
        .enumerate()
        .map(|(i, (name, value))| DataPoint {
            name: Some(name.clone()),
            value: Some(*value),
            formatted: ctx.style.show_data_label.then(|| format::format_number(*value, &format)),
            item_style: Some(ItemStyle { color: Some(ctx.palette.get_color(i)), border_radius: None }),
        })
        .collect();

    spec.series = vec![SeriesSpec {
        name: metric_label.clone(),
        kind: SeriesType::Pie,
        stack: None,
        area_style: None,
        radius: Some(radius(ctx.kind)),
        label: LabelSpec { show: true, position: Some("outside"), formatter: Some(SLICE_LABEL.to_string()) },
        item_style: ItemStyle::default(),
        data: points,
    }];

    let names = slices.iter().map(|(name, _)| name.clone()).collect();
    spec.legend = legend::legend(ctx.style, names, ctx.heading);
    spec.tooltip = Some(tooltip::item_tooltip(&metric_label, &slices, &ctx.palette));
}
