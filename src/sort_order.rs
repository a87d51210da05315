// Sort Priority Resolver: one precedence list over every assigned field

use std::collections::{HashMap, HashSet};

use crate::model::{DataConfig, DimensionField, FieldOrderEntry, MetricField};

/// Linearize the assigned fields into the sort-priority list.
///
/// Candidates are collected in category -> stack -> metric order (first
/// occurrence of an id wins), then stable-sorted by their position in
/// `existing`. Candidates unknown to `existing` go last, keeping their
/// relative order. Ids in `existing` that are no longer assigned are dropped.
pub fn linearize(
    dimensions: &[DimensionField],
    stack_dimension: Option<&DimensionField>,
    metrics: &[MetricField],
    existing: &[FieldOrderEntry],
) -> Vec<FieldOrderEntry> {
    let candidates = collect_candidates(dimensions, stack_dimension, metrics);

    let mut position: HashMap<&str, usize> = HashMap::new();
    for (i, entry) in existing.iter().enumerate() {
        position.entry(entry.field_id.as_str()).or_insert(i);
    }

    let mut ranked: Vec<(usize, usize, FieldOrderEntry)> = candidates
        .into_iter()
        .enumerate()
        .map(|(scan_idx, entry)| {
            let rank = position.get(entry.field_id.as_str()).copied().unwrap_or(usize::MAX);
            (rank, scan_idx, entry)
        })
        .collect();
    ranked.sort_by_key(|(rank, scan_idx, _)| (*rank, *scan_idx));
    ranked.into_iter().map(|(_, _, entry)| entry).collect()
}

/// Recompute the order of `config` in place from its current state
pub fn relinearize(config: &mut DataConfig) {
    config.field_order = linearize(
        &config.dimensions,
        config.stack_dimension.as_ref(),
        &config.metrics,
        &config.field_order,
    );
}

/// Recompute the order of `next` after an edit of `previous`.
///
/// An order still in its built state (never rearranged by the user, or
/// empty) is rebuilt from scratch, which keeps the time field pinned. A
/// rearranged order is carried over through `linearize`.
pub fn refresh(previous: &DataConfig, next: &mut DataConfig) {
    if previous.field_order.is_empty() || previous.field_order == rebuild(previous) {
        next.field_order = rebuild(next);
    } else {
        relinearize(next);
    }
}

/// Build the order from scratch, ignoring any previous order. The primary
/// time field (the first dimension carrying a time granularity) is pinned
/// first when present.
pub fn rebuild(config: &DataConfig) -> Vec<FieldOrderEntry> {
    let mut order = collect_candidates(&config.dimensions, config.stack_dimension.as_ref(), &config.metrics);
    if let Some(pinned) = primary_time_field(config) {
        if let Some(idx) = order.iter().position(|e| e.field_id == pinned) {
            let entry = order.remove(idx);
            order.insert(0, entry);
        }
    }
    order
}

/// Id of the field pinned first on a fresh rebuild
pub fn primary_time_field(config: &DataConfig) -> Option<&str> {
    config
        .dimensions
        .iter()
        .chain(config.stack_dimension.iter())
        .find(|d| d.time_granularity.is_some())
        .map(|d| d.field_id.as_str())
}

/// Drag reorder with splice semantics: the dragged entry is removed and
/// reinserted at the index the drop target occupied. Unknown ids leave the
/// order untouched.
pub fn reorder(order: &[FieldOrderEntry], dragged_id: &str, target_id: &str) -> Vec<FieldOrderEntry> {
    let mut next = order.to_vec();
    let (Some(from), Some(to)) = (
        next.iter().position(|e| e.field_id == dragged_id),
        next.iter().position(|e| e.field_id == target_id),
    ) else {
        log::debug!("reorder ignored: '{}' -> '{}' not both in order", dragged_id, target_id);
        return next;
    };
    let entry = next.remove(from);
    next.insert(to, entry);
    next
}

fn collect_candidates(
    dimensions: &[DimensionField],
    stack_dimension: Option<&DimensionField>,
    metrics: &[MetricField],
) -> Vec<FieldOrderEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for dim in dimensions.iter().chain(stack_dimension) {
        if seen.insert(dim.field_id.as_str()) {
            out.push(FieldOrderEntry::dimension(&dim.field_id));
        }
    }
    for metric in metrics {
        if seen.insert(metric.field_id.as_str()) {
            out.push(FieldOrderEntry::metric(&metric.field_id));
        }
    }
    out
}
