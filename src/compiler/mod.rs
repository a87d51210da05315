// Chart Option Compiler: (rows, kind, config, style, size) -> RenderSpec
//
// Pure and deterministic. Boundary inputs produce a placeholder spec instead
// of an error.

pub mod card;
pub mod cartesian;
pub mod legend;
pub mod pie;
pub mod stack;
pub mod tooltip;

use crate::ir::{Placeholder, PlaceholderReason, RenderSpec, ResolvedChart, TextStyleSpec, TitleSpec};
use crate::model::{ChartKind, ContainerSize, DataConfig};
use crate::palette::ColorPalette;
use crate::resolve;
use crate::rows::RowSet;
use crate::style::StyleConfig;
use crate::transform;

/// Vertical space taken by a visible title
pub const TITLE_HEIGHT: f64 = 30.0;
/// Additional space for a visible subtitle
pub const SUBTITLE_HEIGHT: f64 = 20.0;

/// Everything the per-kind compilers share
pub struct Context<'a> {
    pub kind: ChartKind,
    pub style: &'a StyleConfig,
    pub resolved: ResolvedChart,
    pub palette: ColorPalette,
    /// Height of the title block
    pub heading: f64,
}

pub fn compile(
    rows: &RowSet,
    kind: ChartKind,
    config: &DataConfig,
    style: &StyleConfig,
    size: ContainerSize,
) -> RenderSpec {
    let palette = ColorPalette::named(&style.color_scheme);
    let mut spec = RenderSpec {
        title: title(style),
        color: palette.colors(),
        ..RenderSpec::default()
    };

    // 1. Boundary cases
    if size.is_degenerate() {
        return placeholder(spec, PlaceholderReason::EmptyContainer, "container has no drawable area");
    }
    if config.metrics.is_empty() {
        return placeholder(spec, PlaceholderReason::NoMetric, "assign a metric to draw this chart");
    }
    if kind.requires_dimension() && config.dimensions.is_empty() {
        return placeholder(spec, PlaceholderReason::NoDimension, "assign a category dimension to draw this chart");
    }

    // 2. Resolve fields against the row headers
    let resolved = match resolve::resolve_chart(config, rows, kind.is_stack_capable()) {
        Ok(resolved) => resolved,
        Err(err) => return placeholder(spec, PlaceholderReason::MissingColumn, &err.to_string()),
    };
    if rows.is_empty() {
        return placeholder(spec, PlaceholderReason::NoData, "no data");
    }

    // 3. Dispatch by kind
    let ctx = Context { kind, style, resolved, palette, heading: heading_height(style) };
    match kind {
        ChartKind::MetricCard => card::compile(&ctx, rows, &mut spec),
        ChartKind::Pie | ChartKind::Donut => {
            let data = transform::pivot(&ctx.resolved, rows);
            pie::compile(&ctx, &data, &mut spec);
        }
        _ => {
            let data = transform::pivot(&ctx.resolved, rows);
            cartesian::compile(&ctx, &data, &mut spec);
        }
    }

    log::debug!("compiled {:?}: {} series", kind, spec.series.len());
    spec
}

fn title(style: &StyleConfig) -> Option<TitleSpec> {
    let text = style.title.visible_text()?;
    Some(TitleSpec {
        text: text.to_string(),
        subtext: style.subtitle.visible_text().map(str::to_string),
        left: style.title.text_style.align,
        text_style: TextStyleSpec::from(&style.title.text_style),
        subtext_style: TextStyleSpec::from(&style.subtitle.text_style),
    })
}

fn heading_height(style: &StyleConfig) -> f64 {
    match (style.title.visible_text(), style.subtitle.visible_text()) {
        (Some(_), Some(_)) => TITLE_HEIGHT + SUBTITLE_HEIGHT,
        (Some(_), None) => TITLE_HEIGHT,
        _ => 0.0,
    }
}

fn placeholder(mut spec: RenderSpec, reason: PlaceholderReason, message: &str) -> RenderSpec {
    log::debug!("placeholder spec: {:?}", reason);
    spec.placeholder = Some(Placeholder { reason, message: message.to_string() });
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AxisType, Offset, Radius, SeriesType, Trigger};
    use crate::model::{DimensionField, FormatUnit, MetricField, NumberFormat};
    use crate::style::LegendPosition;
    use pretty_assertions::assert_eq;

    fn rows() -> RowSet {
        let data = [
            ["East", "Web", "5", "1"],
            ["East", "Shop", "3", "2"],
            ["West", "Web", "0", "4"],
            ["West", "Shop", "2", "1"],
            ["North", "Web", "4", "3"],
        ];
        RowSet::new(
            ["region", "channel", "sales", "profit"].iter().map(|s| s.to_string()).collect(),
            data.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
    }

    fn config(stack: bool) -> DataConfig {
        let mut config = DataConfig::for_dataset("ds");
        config.dimensions.push(DimensionField::new("d1", "Region", "region"));
        if stack {
            config.stack_dimension = Some(DimensionField::new("d2", "Channel", "channel"));
        }
        config.metrics.push(MetricField::new("m1", "Sales", "sales"));
        config
    }

    fn size() -> ContainerSize {
        ContainerSize::new(800.0, 600.0)
    }

    #[test]
    fn test_compile_is_deterministic() {
        let style = StyleConfig::default();
        let a = compile(&rows(), ChartKind::StackedBar, &config(true), &style, size());
        let b = compile(&rows(), ChartKind::StackedBar, &config(true), &style, size());
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_placeholders() {
        let style = StyleConfig::default();
        let reason = |spec: RenderSpec| spec.placeholder.map(|p| p.reason);

        let spec = compile(&rows(), ChartKind::Bar, &config(false), &style, ContainerSize::new(0.0, 0.0));
        assert_eq!(reason(spec), Some(PlaceholderReason::EmptyContainer));

        let spec = compile(&rows(), ChartKind::Bar, &DataConfig::default(), &style, size());
        assert_eq!(reason(spec), Some(PlaceholderReason::NoMetric));

        let mut no_dims = config(false);
        no_dims.dimensions.clear();
        let spec = compile(&rows(), ChartKind::Line, &no_dims, &style, size());
        assert_eq!(reason(spec), Some(PlaceholderReason::NoDimension));

        let empty = RowSet::new(rows().headers, vec![]);
        let spec = compile(&empty, ChartKind::Bar, &config(false), &style, size());
        assert!(spec.is_placeholder());
        assert_eq!(reason(spec.clone()), Some(PlaceholderReason::NoData));
        assert!(spec.series.is_empty());

        let mut missing = config(false);
        missing.metrics[0].field_code = "revenue".to_string();
        let spec = compile(&rows(), ChartKind::Bar, &missing, &style, size());
        assert_eq!(reason(spec), Some(PlaceholderReason::MissingColumn));
    }

    #[test]
    fn test_vertical_bar_axes() {
        let spec = compile(&rows(), ChartKind::Bar, &config(false), &StyleConfig::default(), size());
        let x = spec.x_axis.unwrap();
        let y = spec.y_axis.unwrap();
        assert_eq!(x.kind, AxisType::Category);
        assert_eq!(x.data, Some(vec!["East".to_string(), "West".to_string(), "North".to_string()]));
        assert_eq!(y.kind, AxisType::Value);
        assert!(x.axis_label.hide_overlap);
        assert_eq!(x.axis_label.rotate, 0);

        let series = &spec.series[0];
        assert_eq!(series.kind, SeriesType::Bar);
        assert_eq!(series.item_style.border_radius, Some([4, 4, 0, 0]));
        assert_eq!(series.data[0].value, Some(8.0));
    }

    #[test]
    fn test_horizontal_swaps_axes() {
        let spec = compile(&rows(), ChartKind::HorizontalBar, &config(false), &StyleConfig::default(), size());
        assert_eq!(spec.x_axis.unwrap().kind, AxisType::Value);
        assert_eq!(spec.y_axis.unwrap().kind, AxisType::Category);
        assert_eq!(spec.series[0].item_style.border_radius, Some([0, 4, 4, 0]));
    }

    #[test]
    fn test_stacked_rounds_only_visual_top() {
        let spec = compile(&rows(), ChartKind::StackedBar, &config(true), &StyleConfig::default(), size());
        // Series: Web [5, 0, 4], Shop [3, 2, None]
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].stack.as_deref(), Some("metric-0"));
        assert_eq!(spec.series[0].item_style.border_radius, None);

        let rounded = |s: usize, c: usize| spec.series[s].data[c].item_style.is_some();
        assert!(!rounded(0, 0) && rounded(1, 0));
        assert!(!rounded(0, 1) && rounded(1, 1));
        assert!(rounded(0, 2) && !rounded(1, 2));
        assert_eq!(spec.series[1].data[2].value, None);
    }

    #[test]
    fn test_stacked_area_has_no_rounding() {
        let spec = compile(&rows(), ChartKind::StackedArea, &config(true), &StyleConfig::default(), size());
        for series in &spec.series {
            assert_eq!(series.kind, SeriesType::Line);
            assert!(series.area_style.is_some());
            assert_eq!(series.item_style.border_radius, None);
            assert!(series.data.iter().all(|p| p.item_style.is_none()));
        }
    }

    #[test]
    fn test_stack_ignored_for_plain_bar() {
        let spec = compile(&rows(), ChartKind::Bar, &config(true), &StyleConfig::default(), size());
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].stack, None);
    }

    #[test]
    fn test_pie_and_donut() {
        let pie = compile(&rows(), ChartKind::Pie, &config(false), &StyleConfig::default(), size());
        let series = &pie.series[0];
        assert_eq!(series.kind, SeriesType::Pie);
        assert_eq!(series.radius, Some(Radius::Single("70%".to_string())));
        assert_eq!(series.label.formatter.as_deref(), Some("{name}: {percent}%"));
        assert_eq!(series.data[0].name.as_deref(), Some("East"));
        assert!(pie.x_axis.is_none());
        assert_eq!(pie.tooltip.unwrap().trigger, Trigger::Item);

        let donut = compile(&rows(), ChartKind::Donut, &config(false), &StyleConfig::default(), size());
        assert_eq!(
            donut.series[0].radius,
            Some(Radius::Band(["40%".to_string(), "70%".to_string()]))
        );
    }

    #[test]
    fn test_metric_card() {
        let mut config = config(false);
        config.dimensions.clear();
        config.metrics[0].number_format = NumberFormat { decimal_places: 1, ..NumberFormat::default() };
        let spec = compile(&rows(), ChartKind::MetricCard, &config, &StyleConfig::default(), size());
        let card = spec.metric_card.unwrap();
        assert_eq!(card.value, Some(14.0));
        assert_eq!(card.formatted, "14.0");
        assert_eq!(card.value_style.font_size, 32);
        assert!(spec.series.is_empty());
    }

    #[test]
    fn test_data_labels_and_value_ticks_use_format() {
        let mut config = config(false);
        config.metrics[0].number_format =
            NumberFormat { unit: Some(FormatUnit::Thousand), decimal_places: 2, ..NumberFormat::default() };
        let mut style = StyleConfig::default();
        style.show_data_label = true;

        let spec = compile(&rows(), ChartKind::Bar, &config, &style, size());
        assert_eq!(spec.series[0].label.show, true);
        assert_eq!(spec.series[0].label.position, Some("top"));
        assert_eq!(spec.series[0].data[0].formatted.as_deref(), Some("0.01"));
        let y = spec.y_axis.unwrap();
        assert_eq!(y.axis_label.labels.len(), y.axis_label.ticks.len());
        assert_eq!(y.axis_label.labels[0], "0.00");
    }

    #[test]
    fn test_title_and_legend_geometry() {
        let mut style = StyleConfig::default();
        style.title.text = Some("Sales by region".to_string());
        style.legend_position = LegendPosition::Left;

        let spec = compile(&rows(), ChartKind::StackedBar, &config(true), &style, size());
        assert_eq!(spec.title.unwrap().text, "Sales by region");
        let grid = spec.grid.unwrap();
        assert_eq!(grid.left, 160.0);
        assert_eq!(grid.top, 50.0);
        let legend = spec.legend.unwrap();
        assert_eq!(legend.left, Offset::Px(10.0));
        assert_eq!(legend.data, vec!["Web".to_string(), "Shop".to_string()]);
    }

    #[test]
    fn test_long_category_labels_truncated() {
        let rows = RowSet::new(
            vec!["region".to_string(), "sales".to_string()],
            vec![vec!["Northern Territories".to_string(), "1".to_string()]],
        );
        let spec = compile(&rows, ChartKind::Bar, &config(false), &StyleConfig::default(), size());
        let x = spec.x_axis.unwrap();
        assert_eq!(x.axis_label.labels, vec!["Northern T...".to_string()]);
        assert_eq!(x.data, Some(vec!["Northern Territories".to_string()]));
    }

    #[test]
    fn test_extreme_values_compile() {
        let huge = RowSet::new(
            rows().headers,
            vec![
                vec!["East".into(), "Web".into(), "1.7e308".into(), "1".into()],
                vec!["East".into(), "Shop".into(), "1.7e308".into(), "1".into()],
            ],
        );
        let style = StyleConfig::default();

        let spec = compile(&huge, ChartKind::Bar, &config(false), &style, size());
        assert!(!spec.is_placeholder());
        let y = spec.y_axis.unwrap();
        assert!(y.max.unwrap().is_finite());

        let spec = compile(&huge, ChartKind::StackedBar, &config(true), &style, size());
        assert_eq!(spec.series.len(), 2);
        let y = spec.y_axis.unwrap();
        assert_eq!(y.max, Some(f64::MAX));
        assert!(y.axis_label.ticks.iter().all(|t| t.is_finite()));
    }
}
