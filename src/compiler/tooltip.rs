// Tooltip content for axis-triggered and item-triggered charts

use crate::format::{self, TOOLTIP_WRAP_WIDTH};
use crate::ir::{ChartData, TooltipEntry, TooltipLine, TooltipSpec, Trigger};
use crate::model::NumberFormat;
use crate::palette::ColorPalette;

/// One entry per category with a line per series (marker, name, formatted value)
pub fn axis_tooltip(data: &ChartData, formats: &[NumberFormat], palette: &ColorPalette) -> TooltipSpec {
    let entries = data
        .categories
        .iter()
        .enumerate()
        .map(|(cat, category)| TooltipEntry {
            title: wrap_category(category),
            lines: data
                .series
                .iter()
                .enumerate()
                .map(|(i, series)| {
                    let value = match (series.values.get(cat).copied().flatten(), formats.get(series.metric)) {
                        (Some(v), Some(fmt)) => format::format_number(v, fmt),
                        (Some(v), None) => format::raw_number(v),
                        (None, _) => "-".to_string(),
                    };
                    TooltipLine { marker: palette.get_color(i), name: series.name.clone(), value, percent: None }
                })
                .collect(),
        })
        .collect();

    TooltipSpec { trigger: Trigger::Axis, entries }
}

/// One entry per slice: name, raw value and share of the total
pub fn item_tooltip(metric_label: &str, slices: &[(String, f64)], palette: &ColorPalette) -> TooltipSpec {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    let entries = slices
        .iter()
        .enumerate()
        .map(|(i, (name, value))| TooltipEntry {
            title: wrap_category(name),
            lines: vec![TooltipLine {
                marker: palette.get_color(i),
                name: metric_label.to_string(),
                value: format::raw_number(*value),
                percent: Some(format!("{}%", format::percent_of(*value, total))),
            }],
        })
        .collect();

    TooltipSpec { trigger: Trigger::Item, entries }
}

fn wrap_category(category: &str) -> String {
    category
        .split('\n')
        .map(|line| format::wrap(line, TOOLTIP_WRAP_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}
