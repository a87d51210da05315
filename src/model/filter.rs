// Filter predicate types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

impl FilterLogic {
    pub fn toggled(self) -> Self {
        match self {
            FilterLogic::And => FilterLogic::Or,
            FilterLogic::Or => FilterLogic::And,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    Conditional,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    IsEmpty,
    IsNotEmpty,
    /// Set membership, used by enum conditions only
    In,
}

impl FilterOperator {
    /// Empty checks are the only operators that take no value
    pub fn takes_value(&self) -> bool {
        !matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }
}

/// Declared data type of a dataset field, as reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDataType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
}

/// Operators offered for a conditional filter on a field of `data_type`
pub fn operators_for(data_type: FieldDataType) -> &'static [FilterOperator] {
    use FilterOperator::*;
    match data_type {
        FieldDataType::Number => &[
            Equals,
            NotEquals,
            Greater,
            GreaterOrEqual,
            Less,
            LessOrEqual,
            IsEmpty,
            IsNotEmpty,
        ],
        FieldDataType::Text | FieldDataType::Date | FieldDataType::Boolean => {
            &[Equals, NotEquals, Contains, NotContains, IsEmpty, IsNotEmpty]
        }
    }
}

/// Whether a conditional row on a field of `data_type` may use `operator`.
/// With no known type, any operator offered for some type is accepted.
pub fn accepts_conditional(operator: FilterOperator, data_type: Option<FieldDataType>) -> bool {
    match data_type {
        Some(data_type) => operators_for(data_type).contains(&operator),
        None => operator != FilterOperator::In,
    }
}

/// Scalar or list value carried by a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Number(n) => n.is_nan(),
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::List(values) => values.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub id: String,
    /// `None` until the user picks a field for a freshly added row
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(default)]
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<FieldDataType>,
    #[serde(default)]
    pub filter_type: FilterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl FilterCondition {
    pub fn empty(id: impl Into<String>) -> Self {
        FilterCondition {
            id: id.into(),
            field_id: None,
            field_name: String::new(),
            data_type: None,
            filter_type: FilterType::Conditional,
            operator: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    #[serde(default)]
    pub logic: FilterLogic,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_sets() {
        assert!(operators_for(FieldDataType::Text).contains(&FilterOperator::Contains));
        assert!(!operators_for(FieldDataType::Text).contains(&FilterOperator::Greater));
        assert!(operators_for(FieldDataType::Number).contains(&FilterOperator::LessOrEqual));
        assert!(!operators_for(FieldDataType::Number).contains(&FilterOperator::Contains));
        assert!(!accepts_conditional(FilterOperator::In, None));
        assert!(accepts_conditional(FilterOperator::Contains, None));
        assert!(!accepts_conditional(FilterOperator::Contains, Some(FieldDataType::Number)));
    }

    #[test]
    fn test_value_parsing() {
        let c: FilterCondition = serde_json::from_str(
            r#"{"id":"c1","fieldId":"f","fieldName":"City","filterType":"enum","operator":"in","value":["A","B"]}"#,
        )
        .unwrap();
        assert_eq!(c.value, Some(FilterValue::List(vec!["A".to_string(), "B".to_string()])));

        let c: FilterCondition =
            serde_json::from_str(r#"{"id":"c2","fieldId":"f","operator":"greater","value":10}"#).unwrap();
        assert_eq!(c.value, Some(FilterValue::Number(10.0)));
        assert_eq!(c.filter_type, FilterType::Conditional);
    }

    #[test]
    fn test_blank_values() {
        assert!(FilterValue::Text("  ".to_string()).is_blank());
        assert!(FilterValue::List(vec![]).is_blank());
        assert!(!FilterValue::Number(0.0).is_blank());
    }
}
