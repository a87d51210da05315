// Configuration Model: the types describing a chart assembly

pub mod config;
pub mod field;
pub mod filter;
pub mod time;

pub use config::{
    ChartDocument, ChartKind, ContainerSize, DataConfig, FieldOrderEntry, FieldType, LimitType, ResultLimit,
    CATEGORY_CAPACITY, STACKED_METRIC_CAPACITY,
};
pub use field::{
    Aggregation, CandidateField, DimensionField, FormatUnit, MetricField, NumberFormat, NumberKind, Role,
    SortDirection,
};
pub use filter::{
    accepts_conditional, operators_for, FieldDataType, FilterCondition, FilterGroup, FilterLogic, FilterOperator,
    FilterType, FilterValue,
};
pub use time::{TimeFilter, TimeFilterMode, TimeFilterType, TimeWindow};
