// Error types shared across the configuration engine

use thiserror::Error;

use crate::model::{FilterOperator, Role};

/// Why the Field Assignment Engine refused an assignment.
/// The configuration is always left unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("field '{field_id}' cannot be placed in the {role} role")]
    IncompatibleFieldType { field_id: String, role: Role },

    #[error("field '{field_id}' is already assigned")]
    FieldAlreadyAssigned { field_id: String },

    #[error("the {role} role is full (capacity {capacity})")]
    CapacityExceeded { role: Role, capacity: usize },

    #[error("field '{field_id}' is not assigned")]
    FieldNotAssigned { field_id: String },
}

impl Rejection {
    /// Stable identifier the editor shell maps to a transient notice.
    pub fn key(&self) -> &'static str {
        match self {
            Rejection::IncompatibleFieldType { .. } => "incompatible_field_type",
            Rejection::FieldAlreadyAssigned { .. } => "field_already_assigned",
            Rejection::CapacityExceeded { .. } => "capacity_exceeded",
            Rejection::FieldNotAssigned { .. } => "field_not_assigned",
        }
    }
}

/// First problem found when committing a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no dataset selected")]
    NoDataset,

    #[error("chart requires a category dimension")]
    MissingDimension,

    #[error("chart requires at least one metric")]
    NoMetric,

    #[error("field '{field_id}' no longer exists in the dataset")]
    InvalidField { field_id: String },

    #[error("filter condition '{condition_id}' has no operator")]
    MissingOperator { condition_id: String },

    #[error("filter condition '{condition_id}' cannot use operator {operator:?}")]
    UnsupportedOperator { condition_id: String, operator: FilterOperator },

    #[error("filter condition '{condition_id}' has no value")]
    MissingValue { condition_id: String },

    #[error("filter condition '{condition_id}' has no selected values")]
    EmptyEnumSelection { condition_id: String },

    #[error("time filter needs a positive number of recent days")]
    InvalidRecentDays,

    #[error("time filter needs a start and end date with start <= end")]
    InvalidDateRange,

    #[error("result limit must be at least 1")]
    InvalidResultLimit,
}

impl ValidationError {
    /// Single error key reported to the editor shell.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::NoDataset => "no_dataset",
            ValidationError::MissingDimension => "missing_dimension",
            ValidationError::NoMetric => "no_metric",
            ValidationError::InvalidField { .. } => "invalid_field",
            ValidationError::MissingOperator { .. } => "missing_operator",
            ValidationError::UnsupportedOperator { .. } => "unsupported_operator",
            ValidationError::MissingValue { .. } => "missing_value",
            ValidationError::EmptyEnumSelection { .. } => "empty_enum_selection",
            ValidationError::InvalidRecentDays => "invalid_recent_days",
            ValidationError::InvalidDateRange => "invalid_date_range",
            ValidationError::InvalidResultLimit => "invalid_result_limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter condition '{0}'")]
    UnknownCondition(String),
}

/// Failure reported by a distinct-value source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("field '{0}' has no enumerable values")]
    NotEnumerable(String),

    #[error("distinct-value request failed: {0}")]
    Source(String),
}

/// A configured field could not be matched to a column of the result rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("column for field '{field}' not found in result rows")]
    MissingColumn { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown chart component #{0}")]
    UnknownComponent(usize),

    #[error("component #{editing} is already being edited")]
    AlreadyEditing { editing: usize },

    #[error("no component is being edited")]
    NotEditing,

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keys() {
        let r = Rejection::CapacityExceeded { role: Role::Category, capacity: 2 };
        assert_eq!(r.key(), "capacity_exceeded");
        assert_eq!(r.to_string(), "the category role is full (capacity 2)");
    }

    #[test]
    fn test_validation_keys() {
        assert_eq!(ValidationError::NoMetric.key(), "no_metric");
        let e = ValidationError::MissingValue { condition_id: "c1".to_string() };
        assert_eq!(e.key(), "missing_value");
        assert!(e.to_string().contains("c1"));
    }

    #[test]
    fn test_session_error_wraps_rejection() {
        let err: SessionError = Rejection::FieldAlreadyAssigned { field_id: "f".to_string() }.into();
        assert_eq!(err.to_string(), "field 'f' is already assigned");
    }
}
