// Field types: what a dataset column becomes once it is dropped into a role

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction attached to an assigned field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

/// Aggregation applied to a non-virtual metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
    Count,
    DistinctCount,
}

/// How a metric value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    #[default]
    Number,
    Percent,
    Duration,
    Storage,
}

/// Display unit. Which units apply depends on the [`NumberKind`]:
/// scaling units for numbers, time units for durations (source values are
/// seconds) and byte units for storage (source values are bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatUnit {
    Thousand,
    TenThousand,
    Million,
    HundredMillion,
    Billion,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
}

impl FormatUnit {
    /// Divisor turning a source value into this unit, or `None` when the unit
    /// does not belong to `kind`.
    pub fn divisor(&self, kind: NumberKind) -> Option<f64> {
        use FormatUnit::*;
        match (kind, self) {
            (NumberKind::Number, Thousand) => Some(1e3),
            (NumberKind::Number, TenThousand) => Some(1e4),
            (NumberKind::Number, Million) => Some(1e6),
            (NumberKind::Number, HundredMillion) => Some(1e8),
            (NumberKind::Number, Billion) => Some(1e9),
            (NumberKind::Duration, Millisecond) => Some(1e-3),
            (NumberKind::Duration, Second) => Some(1.0),
            (NumberKind::Duration, Minute) => Some(60.0),
            (NumberKind::Duration, Hour) => Some(3_600.0),
            (NumberKind::Duration, Day) => Some(86_400.0),
            (NumberKind::Storage, Byte) => Some(1.0),
            (NumberKind::Storage, Kilobyte) => Some(1024.0),
            (NumberKind::Storage, Megabyte) => Some(1024.0 * 1024.0),
            (NumberKind::Storage, Gigabyte) => Some(1024.0 * 1024.0 * 1024.0),
            (NumberKind::Storage, Terabyte) => Some(1024.0 * 1024.0 * 1024.0 * 1024.0),
            _ => None,
        }
    }

    /// Short symbol appended after converted durations and storage sizes
    pub fn symbol(&self) -> &'static str {
        use FormatUnit::*;
        match self {
            Millisecond => "ms",
            Second => "s",
            Minute => "min",
            Hour => "h",
            Day => "d",
            Byte => "B",
            Kilobyte => "KB",
            Megabyte => "MB",
            Gigabyte => "GB",
            Terabyte => "TB",
            Thousand | TenThousand | Million | HundredMillion | Billion => "",
        }
    }
}

pub const MAX_DECIMAL_PLACES: u8 = 5;

/// Missing keys take their values from `NumberFormat::default()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormat {
    #[serde(rename = "type")]
    pub kind: NumberKind,
    pub decimal_places: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<FormatUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub thousand_separator: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            kind: NumberKind::Number,
            decimal_places: 0,
            unit: None,
            suffix: None,
            thousand_separator: true,
        }
    }
}

impl NumberFormat {
    /// Decimal places clamped to the supported 0..=5 range
    pub fn places(&self) -> usize {
        self.decimal_places.min(MAX_DECIMAL_PLACES) as usize
    }
}

/// A categorical or time-bucketed axis value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionField {
    pub field_id: String,
    pub field_name: String,
    pub field_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub sort: SortDirection,
    #[serde(default)]
    pub time_granularity: Option<String>,
    /// Set when the field id is missing from the current dataset catalog
    #[serde(default, skip_serializing_if = "is_false")]
    pub invalid: bool,
}

impl DimensionField {
    pub fn new(field_id: impl Into<String>, field_name: impl Into<String>, field_code: impl Into<String>) -> Self {
        DimensionField {
            field_id: field_id.into(),
            field_name: field_name.into(),
            field_code: field_code.into(),
            display_name: None,
            sort: SortDirection::None,
            time_granularity: None,
            invalid: false,
        }
    }

    pub fn with_time_granularity(mut self, granularity: impl Into<String>) -> Self {
        self.time_granularity = Some(granularity.into());
        self
    }

    /// Name shown on axes, legends and tooltips
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.field_name)
    }
}

/// A numeric, usually aggregated, field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricField {
    pub field_id: String,
    pub field_name: String,
    pub field_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub sort: SortDirection,
    #[serde(default)]
    pub number_format: NumberFormat,
    #[serde(default, skip_serializing_if = "is_false")]
    pub invalid: bool,
}

impl MetricField {
    pub fn new(field_id: impl Into<String>, field_name: impl Into<String>, field_code: impl Into<String>) -> Self {
        MetricField {
            field_id: field_id.into(),
            field_name: field_name.into(),
            field_code: field_code.into(),
            display_name: None,
            aggregation: Some(Aggregation::Sum),
            is_virtual: false,
            sort: SortDirection::None,
            number_format: NumberFormat::default(),
            invalid: false,
        }
    }

    /// A pre-aggregated metric computed by the data source
    pub fn new_virtual(field_id: impl Into<String>, field_name: impl Into<String>, field_code: impl Into<String>) -> Self {
        MetricField {
            aggregation: None,
            is_virtual: true,
            ..MetricField::new(field_id, field_name, field_code)
        }
    }

    /// Virtual metrics never carry an aggregation, the others default to sum
    pub fn normalized(mut self) -> Self {
        if self.is_virtual {
            self.aggregation = None;
        } else if self.aggregation.is_none() {
            self.aggregation = Some(Aggregation::Sum);
        }
        self
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.field_name)
    }
}

/// A field offered by the editor, discriminated by the role family it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fieldType", rename_all = "snake_case")]
pub enum CandidateField {
    Dimension(DimensionField),
    Metric(MetricField),
}

impl CandidateField {
    pub fn field_id(&self) -> &str {
        match self {
            CandidateField::Dimension(d) => &d.field_id,
            CandidateField::Metric(m) => &m.field_id,
        }
    }
}

/// Role bucket a field can be dropped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Category,
    Stack,
    Metric,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Category => "category",
            Role::Stack => "stack",
            Role::Metric => "metric",
        };
        f.write_str(name)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
