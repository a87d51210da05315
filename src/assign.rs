// Field Assignment Engine: role rules, capacity limits and chart-kind transitions.
//
// Every operation is a pure function from the current state to a new one.
// A rejected operation returns the reason and never touches the input.

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::model::{
    Aggregation, CandidateField, ChartDocument, ChartKind, DataConfig, FilterGroup, MetricField, NumberFormat,
    ResultLimit, Role, SortDirection, TimeFilter, CATEGORY_CAPACITY,
};
use crate::sort_order;
use crate::style::StyleConfig;

/// Decide whether `field` may be dropped into `role`, without building the
/// new configuration. Used for drop-target highlighting.
pub fn can_accept(config: &DataConfig, kind: ChartKind, field: &CandidateField, role: Role) -> Result<(), Rejection> {
    let field_id = field.field_id();

    // 1. Role/type compatibility
    let compatible = matches!(
        (field, role),
        (CandidateField::Metric(_), Role::Metric) | (CandidateField::Dimension(_), Role::Category | Role::Stack)
    );
    if !compatible {
        return Err(Rejection::IncompatibleFieldType { field_id: field_id.to_string(), role });
    }

    // 2. Duplicates
    let duplicate = match role {
        Role::Category | Role::Stack => config.in_any_role(field_id),
        Role::Metric => config.metrics.iter().any(|m| m.field_id == field_id),
    };
    if duplicate {
        return Err(Rejection::FieldAlreadyAssigned { field_id: field_id.to_string() });
    }

    // 3. Capacity
    let (used, capacity) = match role {
        Role::Category => (config.dimensions.len(), CATEGORY_CAPACITY),
        // The stack occupant is replaced, so only kinds without a stack slot reject
        Role::Stack => (0, kind.stack_capacity()),
        Role::Metric => (config.metrics.len(), kind.metric_capacity()),
    };
    if used >= capacity {
        return Err(Rejection::CapacityExceeded { role, capacity });
    }

    Ok(())
}

/// Assign `field` to `role`, returning the updated configuration
pub fn assign(config: &DataConfig, kind: ChartKind, field: CandidateField, role: Role) -> Result<DataConfig, Rejection> {
    can_accept(config, kind, &field, role)?;

    let mut next = config.clone();
    match (field, role) {
        (CandidateField::Dimension(dim), Role::Category) => next.dimensions.push(dim),
        (CandidateField::Dimension(dim), Role::Stack) => {
            if let Some(previous) = next.stack_dimension.replace(dim) {
                log::debug!("stack dimension '{}' replaced", previous.field_id);
            }
        }
        (CandidateField::Metric(metric), Role::Metric) => {
            next.held_metrics.retain(|m| m.field_id != metric.field_id);
            next.metrics.push(metric.normalized());
        }
        (field, role) => {
            return Err(Rejection::IncompatibleFieldType { field_id: field.field_id().to_string(), role })
        }
    }

    sort_order::refresh(config, &mut next);
    Ok(next)
}

/// Remove a field from whichever role holds it
pub fn remove(config: &DataConfig, field_id: &str) -> Result<DataConfig, Rejection> {
    let mut next = config.clone();
    let before = next.dimensions.len() + next.metrics.len() + next.held_metrics.len();
    next.dimensions.retain(|d| d.field_id != field_id);
    next.metrics.retain(|m| m.field_id != field_id);
    next.held_metrics.retain(|m| m.field_id != field_id);
    let after = next.dimensions.len() + next.metrics.len() + next.held_metrics.len();

    let removed_stack = next.stack_dimension.as_ref().is_some_and(|d| d.field_id == field_id);
    if removed_stack {
        next.stack_dimension = None;
    }

    if before == after && !removed_stack {
        return Err(Rejection::FieldNotAssigned { field_id: field_id.to_string() });
    }

    sort_order::refresh(config, &mut next);
    Ok(next)
}

/// Outcome of a chart-kind switch
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub config: DataConfig,
    /// Stack dimension moved into the category role
    pub migrated: Option<String>,
    /// Stack dimension dropped because the category role was full
    pub dropped: Option<String>,
    /// Metrics moved to the holding area by a capacity shrink
    pub held: Vec<String>,
}

/// Re-evaluate stack capability and metric capacity for a new chart kind.
///
/// A stack dimension that the new kind cannot hold moves into the category
/// role when a slot is free and is dropped otherwise. Switching to a
/// stack-capable kind never populates the stack role. Metrics beyond the new
/// capacity are moved to the holding area, keeping the earliest ones.
pub fn change_kind(config: &DataConfig, to: ChartKind) -> Transition {
    let mut next = config.clone();
    let mut migrated = None;
    let mut dropped = None;

    if !to.is_stack_capable() {
        if let Some(stack) = next.stack_dimension.take() {
            if next.dimensions.len() < CATEGORY_CAPACITY {
                migrated = Some(stack.field_id.clone());
                next.dimensions.push(stack);
            } else {
                log::debug!("stack dimension '{}' dropped, category role full", stack.field_id);
                dropped = Some(stack.field_id);
            }
        }
    }

    let capacity = to.metric_capacity();
    let mut held = Vec::new();
    if next.metrics.len() > capacity {
        let evicted = next.metrics.split_off(capacity);
        log::warn!("{} metric(s) moved to the holding area on switch to {:?}", evicted.len(), to);
        held = evicted.iter().map(|m| m.field_id.clone()).collect();
        // Fresh evictions go ahead of older held metrics
        let mut holding = evicted;
        holding.extend(next.held_metrics.drain(..).filter(|m| !held.contains(&m.field_id)));
        next.held_metrics = holding;
    }

    sort_order::refresh(config, &mut next);
    Transition { config: next, migrated, dropped, held }
}

/// Bring held metrics back, earliest first, while the kind has room
pub fn restore_held_metrics(config: &DataConfig, kind: ChartKind) -> DataConfig {
    let mut next = config.clone();
    let capacity = kind.metric_capacity();
    let mut remaining = Vec::new();
    for metric in std::mem::take(&mut next.held_metrics) {
        let duplicate = next.metrics.iter().any(|m| m.field_id == metric.field_id);
        if duplicate {
            continue;
        }
        if next.metrics.len() < capacity {
            next.metrics.push(metric);
        } else {
            remaining.push(metric);
        }
    }
    next.held_metrics = remaining;
    sort_order::refresh(config, &mut next);
    next
}

/// Discrete edits coming from the editor shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditEvent {
    SelectDataset { dataset_id: String },
    Assign { field: CandidateField, role: Role },
    Remove { field_id: String },
    ChangeKind { kind: ChartKind },
    RestoreHeldMetrics,
    Rename { field_id: String, display_name: Option<String> },
    SetDimensionSort { field_id: String, sort: SortDirection },
    SetMetricSort { field_id: String, sort: SortDirection },
    SetAggregation { field_id: String, aggregation: Aggregation },
    SetNumberFormat { field_id: String, format: NumberFormat },
    ReorderFields { dragged_id: String, target_id: String },
    /// Drop any manual arrangement and rebuild the sort order
    ResetFieldOrder,
    SetResultLimit { limit: ResultLimit },
    SetTimeFilter { filter: Option<TimeFilter> },
    SetFilters { group: FilterGroup },
    SetStyle { style: StyleConfig },
}

/// Reducer: apply one event to a chart document
pub fn apply(doc: &ChartDocument, event: EditEvent) -> Result<ChartDocument, Rejection> {
    let mut next = doc.clone();
    match event {
        EditEvent::SelectDataset { dataset_id } => {
            next.data.dataset_id = Some(dataset_id);
            next.data.field_order = sort_order::rebuild(&next.data);
        }
        EditEvent::Assign { field, role } => next.data = assign(&doc.data, doc.kind, field, role)?,
        EditEvent::Remove { field_id } => next.data = remove(&doc.data, &field_id)?,
        EditEvent::ChangeKind { kind } => {
            next.data = change_kind(&doc.data, kind).config;
            next.kind = kind;
        }
        EditEvent::RestoreHeldMetrics => next.data = restore_held_metrics(&doc.data, doc.kind),
        EditEvent::Rename { field_id, display_name } => {
            let display_name = display_name.filter(|n| !n.trim().is_empty());
            let data = &mut next.data;
            let mut found = false;
            for dim in data.dimensions.iter_mut().chain(data.stack_dimension.iter_mut()) {
                if dim.field_id == field_id {
                    dim.display_name = display_name.clone();
                    found = true;
                }
            }
            for metric in data.metrics.iter_mut().filter(|m| m.field_id == field_id) {
                metric.display_name = display_name.clone();
                found = true;
            }
            if !found {
                return Err(Rejection::FieldNotAssigned { field_id });
            }
        }
        EditEvent::SetDimensionSort { field_id, sort } => {
            let data = &mut next.data;
            let dim = data
                .dimensions
                .iter_mut()
                .chain(data.stack_dimension.iter_mut())
                .find(|d| d.field_id == field_id)
                .ok_or_else(|| Rejection::FieldNotAssigned { field_id: field_id.clone() })?;
            dim.sort = sort;
        }
        EditEvent::SetMetricSort { field_id, sort } => {
            metric_mut(&mut next.data, &field_id)?.sort = sort;
        }
        EditEvent::SetAggregation { field_id, aggregation } => {
            let metric = metric_mut(&mut next.data, &field_id)?;
            if metric.is_virtual {
                log::debug!("aggregation ignored for virtual metric '{}'", field_id);
            } else {
                metric.aggregation = Some(aggregation);
            }
        }
        EditEvent::SetNumberFormat { field_id, format } => {
            metric_mut(&mut next.data, &field_id)?.number_format = format;
        }
        EditEvent::ReorderFields { dragged_id, target_id } => {
            next.data.field_order = sort_order::reorder(&doc.data.field_order, &dragged_id, &target_id);
        }
        EditEvent::ResetFieldOrder => next.data.field_order = sort_order::rebuild(&doc.data),
        EditEvent::SetResultLimit { limit } => next.data.result_limit = limit,
        EditEvent::SetTimeFilter { filter } => next.data.time_filter = filter,
        EditEvent::SetFilters { group } => next.data.set_filter_group(group),
        EditEvent::SetStyle { style } => next.style = style,
    }
    Ok(next)
}

fn metric_mut<'a>(data: &'a mut DataConfig, field_id: &str) -> Result<&'a mut MetricField, Rejection> {
    data.metrics
        .iter_mut()
        .find(|m| m.field_id == field_id)
        .ok_or_else(|| Rejection::FieldNotAssigned { field_id: field_id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DimensionField;
    use pretty_assertions::assert_eq;

    fn dim(id: &str) -> CandidateField {
        CandidateField::Dimension(DimensionField::new(id, id, id))
    }

    fn metric(id: &str) -> CandidateField {
        CandidateField::Metric(MetricField::new(id, id, id))
    }

    fn dim_ids(config: &DataConfig) -> Vec<&str> {
        config.dimensions.iter().map(|d| d.field_id.as_str()).collect()
    }

    fn metric_ids(config: &DataConfig) -> Vec<&str> {
        config.metrics.iter().map(|m| m.field_id.as_str()).collect()
    }

    fn order_ids(config: &DataConfig) -> Vec<&str> {
        config.field_order.iter().map(|e| e.field_id.as_str()).collect()
    }

    fn stacked_config() -> DataConfig {
        let kind = ChartKind::StackedBar;
        let config = DataConfig::for_dataset("ds");
        let config = assign(&config, kind, dim("A"), Role::Category).unwrap();
        assign(&config, kind, dim("B"), Role::Stack).unwrap()
    }

    #[test]
    fn test_metric_cannot_target_category() {
        let config = DataConfig::default();
        let err = assign(&config, ChartKind::Bar, metric("m"), Role::Category).unwrap_err();
        assert_eq!(err.key(), "incompatible_field_type");
        let err = assign(&config, ChartKind::Bar, dim("d"), Role::Metric).unwrap_err();
        assert_eq!(err.key(), "incompatible_field_type");
    }

    #[test]
    fn test_duplicate_dimension_rejected_everywhere() {
        let config = stacked_config();
        let err = assign(&config, ChartKind::StackedBar, dim("A"), Role::Stack).unwrap_err();
        assert_eq!(err, Rejection::FieldAlreadyAssigned { field_id: "A".to_string() });
        let err = assign(&config, ChartKind::StackedBar, dim("B"), Role::Category).unwrap_err();
        assert_eq!(err.key(), "field_already_assigned");
    }

    #[test]
    fn test_metric_duplicate_only_within_metrics() {
        let config = assign(&DataConfig::default(), ChartKind::StackedBar, metric("m"), Role::Metric).unwrap();
        let err = assign(&config, ChartKind::StackedBar, metric("m"), Role::Metric).unwrap_err();
        assert_eq!(err.key(), "field_already_assigned");
    }

    #[test]
    fn test_category_capacity() {
        let mut config = DataConfig::default();
        config = assign(&config, ChartKind::Bar, dim("a"), Role::Category).unwrap();
        config = assign(&config, ChartKind::Bar, dim("b"), Role::Category).unwrap();
        let err = assign(&config, ChartKind::Bar, dim("c"), Role::Category).unwrap_err();
        assert_eq!(err, Rejection::CapacityExceeded { role: Role::Category, capacity: 2 });
    }

    #[test]
    fn test_metric_capacity_depends_on_kind() {
        let mut config = DataConfig::default();
        config = assign(&config, ChartKind::Line, metric("m1"), Role::Metric).unwrap();
        assert!(assign(&config, ChartKind::Line, metric("m2"), Role::Metric).is_err());

        for id in ["m2", "m3"] {
            config = assign(&config, ChartKind::StackedBar, metric(id), Role::Metric).unwrap();
        }
        let err = assign(&config, ChartKind::StackedBar, metric("m4"), Role::Metric).unwrap_err();
        assert_eq!(err, Rejection::CapacityExceeded { role: Role::Metric, capacity: 3 });
    }

    #[test]
    fn test_stack_role_needs_capable_kind() {
        let err = assign(&DataConfig::default(), ChartKind::Bar, dim("s"), Role::Stack).unwrap_err();
        assert_eq!(err, Rejection::CapacityExceeded { role: Role::Stack, capacity: 0 });
    }

    #[test]
    fn test_stack_replaces_occupant() {
        let config = stacked_config();
        let config = assign(&config, ChartKind::StackedBar, dim("C"), Role::Stack).unwrap();
        assert_eq!(config.stack_dimension.as_ref().unwrap().field_id, "C");
        assert_eq!(order_ids(&config), vec!["A", "C"]);
    }

    #[test]
    fn test_rejection_leaves_config_untouched() {
        let config = stacked_config();
        let snapshot = config.clone();
        let _ = assign(&config, ChartKind::StackedBar, dim("A"), Role::Category);
        assert_eq!(config, snapshot);
    }

    #[test]
    fn test_assign_appends_order_slot() {
        let config = stacked_config();
        let config = assign(&config, ChartKind::StackedBar, metric("m"), Role::Metric).unwrap();
        assert_eq!(order_ids(&config), vec!["A", "B", "m"]);
    }

    #[test]
    fn test_remove_clears_order() {
        let config = stacked_config();
        let config = remove(&config, "B").unwrap();
        assert!(config.stack_dimension.is_none());
        assert_eq!(order_ids(&config), vec!["A"]);
        assert_eq!(remove(&config, "B").unwrap_err().key(), "field_not_assigned");
    }

    #[test]
    fn test_transition_migrates_stack() {
        let transition = change_kind(&stacked_config(), ChartKind::Bar);
        assert_eq!(dim_ids(&transition.config), vec!["A", "B"]);
        assert!(transition.config.stack_dimension.is_none());
        assert_eq!(transition.migrated.as_deref(), Some("B"));
    }

    #[test]
    fn test_transition_drops_stack_when_full() {
        let config = assign(&stacked_config(), ChartKind::StackedBar, dim("C"), Role::Category).unwrap();
        let transition = change_kind(&config, ChartKind::Line);
        assert_eq!(dim_ids(&transition.config), vec!["A", "C"]);
        assert!(transition.config.stack_dimension.is_none());
        assert_eq!(transition.dropped.as_deref(), Some("B"));
        assert_eq!(order_ids(&transition.config), vec!["A", "C"]);
    }

    #[test]
    fn test_upgrade_leaves_stack_empty() {
        let config = assign(&DataConfig::default(), ChartKind::Bar, dim("A"), Role::Category).unwrap();
        let config = assign(&config, ChartKind::Bar, dim("B"), Role::Category).unwrap();
        let transition = change_kind(&config, ChartKind::StackedBar);
        assert!(transition.config.stack_dimension.is_none());
        assert_eq!(dim_ids(&transition.config), vec!["A", "B"]);
    }

    #[test]
    fn test_downgrade_holds_metrics_and_restore() {
        let mut config = DataConfig::default();
        for id in ["m1", "m2", "m3"] {
            config = assign(&config, ChartKind::StackedBar, metric(id), Role::Metric).unwrap();
        }
        let transition = change_kind(&config, ChartKind::Line);
        assert_eq!(metric_ids(&transition.config), vec!["m1"]);
        assert_eq!(transition.held, vec!["m2".to_string(), "m3".to_string()]);
        assert_eq!(order_ids(&transition.config), vec!["m1"]);

        let back = change_kind(&transition.config, ChartKind::StackedBar).config;
        let restored = restore_held_metrics(&back, ChartKind::StackedBar);
        assert_eq!(metric_ids(&restored), vec!["m1", "m2", "m3"]);
        assert!(restored.held_metrics.is_empty());
    }

    #[test]
    fn test_reassigning_held_metric_clears_it() {
        let mut config = DataConfig::default();
        for id in ["m1", "m2"] {
            config = assign(&config, ChartKind::GroupedBar, metric(id), Role::Metric).unwrap();
        }
        let config = change_kind(&config, ChartKind::Bar).config;
        let config = remove(&config, "m1").unwrap();
        let config = assign(&config, ChartKind::Bar, metric("m2"), Role::Metric).unwrap();
        assert!(config.held_metrics.is_empty());
        assert_eq!(metric_ids(&config), vec!["m2"]);
    }

    #[test]
    fn test_reducer_change_kind_and_rename() {
        let doc = ChartDocument {
            kind: ChartKind::StackedBar,
            data: stacked_config(),
            ..ChartDocument::default()
        };
        let doc = apply(&doc, EditEvent::ChangeKind { kind: ChartKind::Bar }).unwrap();
        assert_eq!(doc.kind, ChartKind::Bar);
        assert_eq!(dim_ids(&doc.data), vec!["A", "B"]);

        let doc = apply(
            &doc,
            EditEvent::Rename { field_id: "B".to_string(), display_name: Some("Brand".to_string()) },
        )
        .unwrap();
        assert_eq!(doc.data.dimensions[1].label(), "Brand");

        let err = apply(&doc, EditEvent::Rename { field_id: "zz".to_string(), display_name: None }).unwrap_err();
        assert_eq!(err.key(), "field_not_assigned");
    }

    #[test]
    fn test_reducer_pins_time_field_until_rearranged() {
        let day = CandidateField::Dimension(DimensionField::new("day", "day", "day").with_time_granularity("day"));
        let doc = apply(&ChartDocument::default(), EditEvent::SelectDataset { dataset_id: "ds".to_string() }).unwrap();
        let doc = apply(&doc, EditEvent::Assign { field: dim("region"), role: Role::Category }).unwrap();
        let doc = apply(&doc, EditEvent::Assign { field: day, role: Role::Category }).unwrap();
        assert_eq!(order_ids(&doc.data), vec!["day", "region"]);

        let doc = apply(
            &doc,
            EditEvent::ReorderFields { dragged_id: "region".to_string(), target_id: "day".to_string() },
        )
        .unwrap();
        let doc = apply(&doc, EditEvent::Assign { field: metric("sales"), role: Role::Metric }).unwrap();
        assert_eq!(order_ids(&doc.data), vec!["region", "day", "sales"]);

        let doc = apply(&doc, EditEvent::ResetFieldOrder).unwrap();
        assert_eq!(order_ids(&doc.data), vec!["day", "region", "sales"]);
    }

    #[test]
    fn test_reducer_aggregation_skips_virtual() {
        let mut doc = ChartDocument::default();
        doc.data.metrics.push(MetricField::new_virtual("v", "v", "v"));
        let doc = apply(
            &doc,
            EditEvent::SetAggregation { field_id: "v".to_string(), aggregation: Aggregation::Avg },
        )
        .unwrap();
        assert_eq!(doc.data.metrics[0].aggregation, None);
    }

    #[test]
    fn test_event_json() {
        let event: EditEvent = serde_json::from_str(
            r#"{"type":"assign","role":"category","field":{"fieldType":"dimension","fieldId":"d","fieldName":"D","fieldCode":"d"}}"#,
        )
        .unwrap();
        assert!(matches!(event, EditEvent::Assign { role: Role::Category, .. }));
    }
}
