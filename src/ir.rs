use serde::ser::Serializer;
use serde::Serialize;

use crate::model::NumberFormat;
use crate::style::{TextAlign, TextStyle};

// =============================================================================
// Phase 1: Resolution
// =============================================================================

/// Configured fields matched against the columns of the result rows
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChart {
    pub categories: Vec<ResolvedColumn>,
    pub stack: Option<ResolvedColumn>,
    pub metrics: Vec<ResolvedMetric>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub field_id: String,
    pub label: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetric {
    pub column: ResolvedColumn,
    pub format: NumberFormat,
}

// =============================================================================
// Phase 2: Transformation
// =============================================================================

/// Rows pivoted into categories x series
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    /// Category keys in first-appearance order; multi-dimension keys are joined by '\n'
    pub categories: Vec<String>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub name: String,
    /// Index into `ResolvedChart::metrics`
    pub metric: usize,
    /// Stack dimension value this series was split on
    pub stack_value: Option<String>,
    /// One slot per category; `None` where the rows had no value
    pub values: Vec<Option<f64>>,
}

// =============================================================================
// Phase 3: Scaling
// =============================================================================

/// Extent and tick positions of the value axis
#[derive(Debug, Clone, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

// =============================================================================
// Phase 4: Compilation (RenderSpec)
// =============================================================================

/// Complete chart option handed to the plotting engine as-is
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSpec>,
    pub color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipSpec>,
    pub series: Vec<SeriesSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_card: Option<MetricCardSpec>,
    /// Set instead of axes and series when there is nothing to draw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

impl RenderSpec {
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleSpec {
    pub font_size: u32,
    pub font_weight: &'static str,
    pub font_style: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<&'static str>,
    pub color: String,
}

impl From<&TextStyle> for TextStyleSpec {
    fn from(style: &TextStyle) -> Self {
        TextStyleSpec {
            font_size: style.font_size,
            font_weight: if style.bold { "bold" } else { "normal" },
            font_style: if style.italic { "italic" } else { "normal" },
            text_decoration: style.underline.then_some("underline"),
            color: style.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSpec {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    pub left: TextAlign,
    pub text_style: TextStyleSpec,
    pub subtext_style: TextStyleSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orient {
    Horizontal,
    Vertical,
}

/// CSS-style offset: a pixel distance or `"auto"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    Px(f64),
    Auto,
}

impl Serialize for Offset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Offset::Px(px) => serializer.serialize_f64(*px),
            Offset::Auto => serializer.serialize_str("auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSpec {
    pub show: bool,
    pub orient: Orient,
    pub top: Offset,
    pub bottom: Offset,
    pub left: Offset,
    pub right: Offset,
    pub data: Vec<String>,
    pub text_style: TextStyleSpec,
}

/// Space reserved around the plot area, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub contain_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    #[serde(rename = "type")]
    pub kind: AxisType,
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_text_style: Option<TextStyleSpec>,
    /// Full category keys (category axes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub axis_label: AxisLabelSpec,
    pub split_line: SplitLineSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabelSpec {
    pub show: bool,
    pub hide_overlap: bool,
    pub rotate: i32,
    /// Display text per tick: truncated categories or formatted values
    pub labels: Vec<String>,
    /// Tick positions of a value axis
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ticks: Vec<f64>,
    pub text_style: TextStyleSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitLineSpec {
    pub show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Axis,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipSpec {
    pub trigger: Trigger,
    /// One entry per category (axis trigger) or per slice (item trigger)
    pub entries: Vec<TooltipEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub title: String,
    pub lines: Vec<TooltipLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipLine {
    pub marker: String,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Bar,
    Line,
    Pie,
}

/// Pie radius: a single outer radius or an inner/outer band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Radius {
    Single(String),
    Band([String; 2]),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<[u32; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSpec {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaStyle {
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<Radius>,
    pub label: LabelSpec,
    pub item_style: ItemStyle,
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Slice name (pie series only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Option<f64>,
    /// Data label text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCardSpec {
    pub label: String,
    pub value: Option<f64>,
    pub formatted: String,
    pub value_style: TextStyleSpec,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    EmptyContainer,
    NoMetric,
    NoDimension,
    MissingColumn,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub reason: PlaceholderReason,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offset_serialization() {
        assert_eq!(serde_json::to_value(Offset::Px(10.0)).unwrap(), json!(10.0));
        assert_eq!(serde_json::to_value(Offset::Auto).unwrap(), json!("auto"));
    }

    #[test]
    fn test_radius_serialization() {
        assert_eq!(serde_json::to_value(Radius::Single("70%".to_string())).unwrap(), json!("70%"));
        let band = Radius::Band(["40%".to_string(), "70%".to_string()]);
        assert_eq!(serde_json::to_value(band).unwrap(), json!(["40%", "70%"]));
    }

    #[test]
    fn test_text_style_spec() {
        let style = TextStyle { bold: true, underline: true, ..TextStyle::default() };
        let spec = TextStyleSpec::from(&style);
        assert_eq!(spec.font_weight, "bold");
        assert_eq!(spec.font_style, "normal");
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["textDecoration"], json!("underline"));
        assert_eq!(value["fontSize"], json!(12));
    }

    #[test]
    fn test_missing_value_serializes_as_null() {
        let point = DataPoint { name: None, value: None, formatted: None, item_style: None };
        assert_eq!(serde_json::to_value(point).unwrap(), json!({ "value": null }));
    }
}
