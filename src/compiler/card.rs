// Metric card: a single headline value

use super::Context;
use crate::format;
use crate::ir::{MetricCardSpec, RenderSpec, TextStyleSpec};
use crate::rows::RowSet;
use crate::transform;

pub fn compile(ctx: &Context, rows: &RowSet, spec: &mut RenderSpec) {
    let Some(metric) = ctx.resolved.metrics.first() else {
        return;
    };
    let value = transform::total(rows, metric.column.index);
    let formatted = match value {
        Some(v) => format::format_number(v, &metric.format),
        None => "-".to_string(),
    };

    spec.metric_card = Some(MetricCardSpec {
        label: metric.column.label.clone(),
        value,
        formatted,
        value_style: TextStyleSpec::from(&ctx.style.metric_value),
        align: ctx.style.metric_value.align,
    });
}
