// Filter Subsystem: condition list edits and commit-time validation

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, ValidationError};
use crate::model::{
    accepts_conditional, FieldDataType, FilterCondition, FilterGroup, FilterOperator, FilterType, FilterValue,
};

/// Field picked for a condition row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChoice {
    pub field_id: String,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub data_type: Option<FieldDataType>,
}

/// Partial update of one condition. Absent members are left alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionPatch {
    pub field: Option<FieldChoice>,
    pub filter_type: Option<FilterType>,
    pub operator: Option<FilterOperator>,
    pub value: Option<FilterValue>,
}

/// Append an empty condition row; returns the new group and the row id
pub fn add_condition(group: &FilterGroup) -> (FilterGroup, String) {
    let next_n = group
        .conditions
        .iter()
        .filter_map(|c| c.id.strip_prefix('c').and_then(|n| n.parse::<u32>().ok()))
        .max()
        .map_or(1, |n| n + 1);
    let id = format!("c{}", next_n);

    let mut next = group.clone();
    next.conditions.push(FilterCondition::empty(&id));
    (next, id)
}

/// Apply `patch` to condition `id`.
///
/// Picking another field or switching the filter type resets operator and
/// value. Enum conditions always use the `in` operator over a value list.
/// Empty-check operators drop any value.
pub fn update_condition(group: &FilterGroup, id: &str, patch: ConditionPatch) -> Result<FilterGroup, FilterError> {
    let mut next = group.clone();
    let condition = next
        .conditions
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| FilterError::UnknownCondition(id.to_string()))?;

    let mut reset = false;
    if let Some(field) = patch.field {
        if condition.field_id.as_deref() != Some(field.field_id.as_str()) {
            reset = true;
        }
        condition.field_id = Some(field.field_id);
        condition.field_name = field.field_name;
        condition.data_type = field.data_type;
    }
    if let Some(filter_type) = patch.filter_type {
        if condition.filter_type != filter_type {
            reset = true;
        }
        condition.filter_type = filter_type;
    }
    if reset {
        condition.operator = None;
        condition.value = None;
    }

    match condition.filter_type {
        FilterType::Enum => {
            condition.operator = Some(FilterOperator::In);
            if let Some(value) = patch.value {
                condition.value = Some(as_list(value));
            } else if !matches!(condition.value, Some(FilterValue::List(_))) {
                condition.value = Some(FilterValue::List(Vec::new()));
            }
        }
        FilterType::Conditional => {
            if let Some(operator) = patch.operator {
                condition.operator = Some(operator);
            }
            if let Some(value) = patch.value {
                condition.value = Some(value);
            }
            if condition.operator.is_some_and(|op| !op.takes_value()) {
                condition.value = None;
            }
        }
    }

    Ok(next)
}

pub fn remove_condition(group: &FilterGroup, id: &str) -> Result<FilterGroup, FilterError> {
    let mut next = group.clone();
    let before = next.conditions.len();
    next.conditions.retain(|c| c.id != id);
    if next.conditions.len() == before {
        return Err(FilterError::UnknownCondition(id.to_string()));
    }
    Ok(next)
}

pub fn toggle_logic(group: &FilterGroup) -> FilterGroup {
    FilterGroup {
        logic: group.logic.toggled(),
        conditions: group.conditions.clone(),
    }
}

/// First problem in the group, in row order. Rows without a field are
/// ignored and an empty group is valid.
pub fn validate(group: &FilterGroup) -> Result<(), ValidationError> {
    for condition in group.conditions.iter().filter(|c| c.field_id.is_some()) {
        validate_condition(condition)?;
    }
    Ok(())
}

fn validate_condition(condition: &FilterCondition) -> Result<(), ValidationError> {
    let condition_id = || condition.id.clone();
    match condition.filter_type {
        FilterType::Enum => match &condition.value {
            Some(FilterValue::List(values)) if !values.is_empty() => Ok(()),
            _ => Err(ValidationError::EmptyEnumSelection { condition_id: condition_id() }),
        },
        FilterType::Conditional => {
            let operator = condition
                .operator
                .ok_or_else(|| ValidationError::MissingOperator { condition_id: condition_id() })?;
            if !accepts_conditional(operator, condition.data_type) {
                return Err(ValidationError::UnsupportedOperator { condition_id: condition_id(), operator });
            }
            let blank = condition.value.as_ref().map_or(true, FilterValue::is_blank);
            if operator.takes_value() && blank {
                return Err(ValidationError::MissingValue { condition_id: condition_id() });
            }
            Ok(())
        }
    }
}

fn as_list(value: FilterValue) -> FilterValue {
    match value {
        FilterValue::List(values) => FilterValue::List(values),
        FilterValue::Text(text) if text.is_empty() => FilterValue::List(Vec::new()),
        FilterValue::Text(text) => FilterValue::List(vec![text]),
        FilterValue::Number(n) => FilterValue::List(vec![n.to_string()]),
    }
}
