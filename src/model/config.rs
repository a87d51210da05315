// DataConfig: the aggregate root for a chart's data semantics

use serde::{Deserialize, Serialize};

use super::field::{DimensionField, MetricField};
use super::filter::{FilterCondition, FilterGroup, FilterLogic};
use super::time::TimeFilter;
use crate::style::StyleConfig;

/// Every chart kind the editor offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    HorizontalBar,
    StackedBar,
    HorizontalStackedBar,
    GroupedBar,
    HorizontalGroupedBar,
    Line,
    StackedLine,
    Area,
    StackedArea,
    Pie,
    Donut,
    MetricCard,
}

/// Category role capacity, identical for every kind
pub const CATEGORY_CAPACITY: usize = 2;
/// Metric capacity of stack-capable kinds
pub const STACKED_METRIC_CAPACITY: usize = 3;

impl ChartKind {
    pub const ALL: [ChartKind; 13] = [
        ChartKind::Bar,
        ChartKind::HorizontalBar,
        ChartKind::StackedBar,
        ChartKind::HorizontalStackedBar,
        ChartKind::GroupedBar,
        ChartKind::HorizontalGroupedBar,
        ChartKind::Line,
        ChartKind::StackedLine,
        ChartKind::Area,
        ChartKind::StackedArea,
        ChartKind::Pie,
        ChartKind::Donut,
        ChartKind::MetricCard,
    ];

    pub fn is_horizontal(&self) -> bool {
        matches!(
            self,
            ChartKind::HorizontalBar | ChartKind::HorizontalStackedBar | ChartKind::HorizontalGroupedBar
        )
    }

    /// Segments of one category are drawn on top of each other
    pub fn is_stacked(&self) -> bool {
        matches!(
            self,
            ChartKind::StackedBar | ChartKind::HorizontalStackedBar | ChartKind::StackedLine | ChartKind::StackedArea
        )
    }

    pub fn is_line_like(&self) -> bool {
        matches!(
            self,
            ChartKind::Line | ChartKind::StackedLine | ChartKind::Area | ChartKind::StackedArea
        )
    }

    pub fn is_area(&self) -> bool {
        matches!(self, ChartKind::Area | ChartKind::StackedArea)
    }

    /// Kinds that accept a stack dimension and up to three metrics
    pub fn is_stack_capable(&self) -> bool {
        self.is_stacked() || matches!(self, ChartKind::GroupedBar | ChartKind::HorizontalGroupedBar)
    }

    pub fn is_pie(&self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Donut)
    }

    pub fn is_cartesian(&self) -> bool {
        !self.is_pie() && *self != ChartKind::MetricCard
    }

    pub fn requires_dimension(&self) -> bool {
        *self != ChartKind::MetricCard
    }

    pub fn metric_capacity(&self) -> usize {
        if self.is_stack_capable() {
            STACKED_METRIC_CAPACITY
        } else {
            1
        }
    }

    pub fn stack_capacity(&self) -> usize {
        usize::from(self.is_stack_capable())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Dimension,
    Metric,
}

/// One slot of the sort-priority list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOrderEntry {
    pub field_id: String,
    pub field_type: FieldType,
}

impl FieldOrderEntry {
    pub fn dimension(field_id: impl Into<String>) -> Self {
        FieldOrderEntry { field_id: field_id.into(), field_type: FieldType::Dimension }
    }

    pub fn metric(field_id: impl Into<String>) -> Self {
        FieldOrderEntry { field_id: field_id.into(), field_type: FieldType::Metric }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitType {
    #[default]
    All,
    Limited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultLimit {
    #[serde(default)]
    pub limit_type: LimitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ResultLimit {
    pub fn limited(limit: u32) -> Self {
        ResultLimit { limit_type: LimitType::Limited, limit: Some(limit) }
    }

    /// Row cap the query executor must honor
    pub fn max_rows(&self) -> Option<usize> {
        match self.limit_type {
            LimitType::All => None,
            LimitType::Limited => self.limit.map(|l| l as usize),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfig {
    /// Dataset the fields come from; `None` until the user picks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<DimensionField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_dimension: Option<DimensionField>,
    #[serde(default)]
    pub metrics: Vec<MetricField>,
    #[serde(default)]
    pub field_order: Vec<FieldOrderEntry>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    #[serde(default)]
    pub filter_logic: FilterLogic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_filter: Option<TimeFilter>,
    #[serde(default)]
    pub result_limit: ResultLimit,
    #[serde(default)]
    pub is_configured: bool,
    /// Metrics evicted by a chart-kind downgrade, kept so they can be restored
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub held_metrics: Vec<MetricField>,
}

impl DataConfig {
    pub fn for_dataset(dataset_id: impl Into<String>) -> Self {
        DataConfig {
            dataset_id: Some(dataset_id.into()),
            ..DataConfig::default()
        }
    }

    pub fn filter_group(&self) -> FilterGroup {
        FilterGroup {
            logic: self.filter_logic,
            conditions: self.filters.clone(),
        }
    }

    pub fn set_filter_group(&mut self, group: FilterGroup) {
        self.filter_logic = group.logic;
        self.filters = group.conditions;
    }

    /// Ids of every assigned field in category -> stack -> metric scan order
    pub fn assigned_ids(&self) -> Vec<&str> {
        self.dimensions
            .iter()
            .map(|d| d.field_id.as_str())
            .chain(self.stack_dimension.iter().map(|d| d.field_id.as_str()))
            .chain(self.metrics.iter().map(|m| m.field_id.as_str()))
            .collect()
    }

    pub fn in_any_role(&self, field_id: &str) -> bool {
        self.in_dimension_roles(field_id) || self.metrics.iter().any(|m| m.field_id == field_id)
    }

    pub fn in_dimension_roles(&self, field_id: &str) -> bool {
        self.dimensions.iter().any(|d| d.field_id == field_id)
            || self.stack_dimension.as_ref().is_some_and(|d| d.field_id == field_id)
    }
}

/// Pixel size of the container a chart is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        ContainerSize { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for ContainerSize {
    fn default() -> Self {
        ContainerSize::new(800.0, 600.0)
    }
}

/// Everything persisted for one chart component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub container: ContainerSize,
}
