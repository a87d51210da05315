// Bar, line and area charts: category axis, value axis and one series per SeriesData

use super::legend;
use super::stack::{self, Rounding};
use super::tooltip;
use super::Context;
use crate::format::{self, AXIS_LABEL_MAX_CHARS};
use crate::ir::{
    AreaStyle, AxisLabelSpec, AxisSpec, AxisType, ChartData, DataPoint, ItemStyle, LabelSpec, RenderSpec,
    SeriesSpec, SeriesType, SplitLineSpec, TextStyleSpec, ValueScale,
};
use crate::model::NumberFormat;
use crate::scale;
use crate::style::AxisStyle;

const AREA_OPACITY: f64 = 0.3;

pub fn compile(ctx: &Context, data: &ChartData, spec: &mut RenderSpec) {
    let kind = ctx.kind;
    let style = ctx.style;
    let formats: Vec<NumberFormat> = ctx.resolved.metrics.iter().map(|m| m.format.clone()).collect();

    // 1. Stack keys: one stack per metric when split by a stack dimension
    let stacks: Vec<Option<String>> = data
        .series
        .iter()
        .map(|s| {
            kind.is_stacked().then(|| match s.stack_value {
                Some(_) => format!("metric-{}", s.metric),
                None => "total".to_string(),
            })
        })
        .collect();

    // 2. Value scale and axes
    let value_scale = scale::build_value_scale(data, &stacks);
    let value_format = formats.first().cloned().unwrap_or_default();

    let category_name = ctx.resolved.categories.iter().map(|c| c.label.as_str()).collect::<Vec<_>>().join(" / ");
    let value_name = ctx.resolved.metrics.iter().map(|m| m.column.label.as_str()).collect::<Vec<_>>().join(" / ");

    // Horizontal kinds put the categories on the y axis
    let (x_axis, y_axis) = if kind.is_horizontal() {
        (
            value_axis(ctx, &style.x_axis, &value_scale, &value_format, value_name),
            category_axis(ctx, &style.y_axis, data, category_name),
        )
    } else {
        (
            category_axis(ctx, &style.x_axis, data, category_name),
            value_axis(ctx, &style.y_axis, &value_scale, &value_format, value_name),
        )
    };
    spec.x_axis = Some(x_axis);
    spec.y_axis = Some(y_axis);

    // 3. Series
    let tops = stack_tops(data, &stacks);
    let rounding = stack::rounding(kind);
    let label_position = if kind.is_stacked() {
        "inside"
    } else if kind.is_horizontal() {
        "right"
    } else {
        "top"
    };

    spec.series = data
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let format = formats.get(series.metric).cloned().unwrap_or_default();
            let series_corners = match rounding {
                Rounding::Series(corners) => Some(corners),
                _ => None,
            };
            let points = series
                .values
                .iter()
                .enumerate()
                .map(|(cat, value)| {
                    let item_style = match rounding {
                        Rounding::TopOnly(corners) if tops[i][cat] => {
                            Some(ItemStyle { color: None, border_radius: Some(corners) })
                        }
                        _ => None,
                    };
                    DataPoint {
                        name: None,
                        value: *value,
                        formatted: match value {
                            Some(v) if style.show_data_label => Some(format::format_number(*v, &format)),
                            _ => None,
                        },
                        item_style,
                    }
                })
                .collect();

            SeriesSpec {
                name: series.name.clone(),
                kind: if kind.is_line_like() { SeriesType::Line } else { SeriesType::Bar },
                stack: stacks[i].clone(),
                area_style: kind.is_area().then_some(AreaStyle { opacity: AREA_OPACITY }),
                radius: None,
                label: LabelSpec {
                    show: style.show_data_label,
                    position: style.show_data_label.then_some(label_position),
                    formatter: None,
                },
                item_style: ItemStyle { color: Some(ctx.palette.get_color(i)), border_radius: series_corners },
                data: points,
            }
        })
        .collect();

    // 4. Legend, grid, tooltip
    let names = data.series.iter().map(|s| s.name.clone()).collect();
    spec.legend = legend::legend(style, names, ctx.heading);
    spec.grid = Some(legend::grid(style, ctx.resolved.categories.len(), ctx.heading));
    spec.tooltip = Some(tooltip::axis_tooltip(data, &formats, &ctx.palette));
}

/// `tops[series][category]` is set on the visual top segment of each stack
fn stack_tops(data: &ChartData, stacks: &[Option<String>]) -> Vec<Vec<bool>> {
    let mut tops = vec![vec![false; data.categories.len()]; data.series.len()];

    let mut keys: Vec<&str> = Vec::new();
    for key in stacks.iter().flatten() {
        if !keys.contains(&key.as_str()) {
            keys.push(key);
        }
    }

    for key in keys {
        let members: Vec<usize> = (0..data.series.len()).filter(|&i| stacks[i].as_deref() == Some(key)).collect();
        let values: Vec<&[Option<f64>]> = members.iter().map(|&i| data.series[i].values.as_slice()).collect();
        for (cat, top) in stack::top_of_stack(&values).into_iter().enumerate() {
            if let Some(local) = top {
                tops[members[local]][cat] = true;
            }
        }
    }
    tops
}

fn category_axis(ctx: &Context, axis_style: &AxisStyle, data: &ChartData, default_name: String) -> AxisSpec {
    let labels = data.categories.iter().map(|c| format::truncate_label(c, AXIS_LABEL_MAX_CHARS)).collect();
    AxisSpec {
        kind: AxisType::Category,
        show: ctx.style.show_axis,
        name: axis_name(axis_style, default_name),
        name_text_style: axis_style.show_title.then(|| TextStyleSpec::from(&axis_style.title_style)),
        data: Some(data.categories.clone()),
        min: None,
        max: None,
        axis_label: AxisLabelSpec {
            show: ctx.style.show_axis,
            hide_overlap: true,
            rotate: 0,
            labels,
            ticks: Vec::new(),
            text_style: TextStyleSpec::from(&axis_style.label_style),
        },
        split_line: SplitLineSpec { show: false },
    }
}

fn value_axis(
    ctx: &Context,
    axis_style: &AxisStyle,
    scale: &ValueScale,
    format: &NumberFormat,
    default_name: String,
) -> AxisSpec {
    AxisSpec {
        kind: AxisType::Value,
        show: ctx.style.show_axis,
        name: axis_name(axis_style, default_name),
        name_text_style: axis_style.show_title.then(|| TextStyleSpec::from(&axis_style.title_style)),
        data: None,
        min: Some(scale.min),
        max: Some(scale.max),
        axis_label: AxisLabelSpec {
            show: ctx.style.show_axis,
            hide_overlap: true,
            rotate: 0,
            labels: scale.ticks.iter().map(|t| format::format_number(*t, format)).collect(),
            ticks: scale.ticks.clone(),
            text_style: TextStyleSpec::from(&axis_style.label_style),
        },
        split_line: SplitLineSpec { show: ctx.style.show_grid },
    }
}

fn axis_name(axis_style: &AxisStyle, default_name: String) -> Option<String> {
    if !axis_style.show_title {
        return None;
    }
    axis_style.title.clone().filter(|t| !t.trim().is_empty()).or(Some(default_name))
}
