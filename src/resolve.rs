use crate::error::ResolveError;
use crate::ir::{ResolvedChart, ResolvedColumn, ResolvedMetric};
use crate::model::{DataConfig, DimensionField, MetricField};
use crate::rows::RowSet;

/// Resolve every configured field against the row headers.
///
/// A field matches the column named by its code, then its name, then its id
/// (case-insensitive). The stack dimension is only resolved when `use_stack`
/// is set, so kinds without a stack role ignore a leftover one.
pub fn resolve_chart(config: &DataConfig, rows: &RowSet, use_stack: bool) -> Result<ResolvedChart, ResolveError> {
    // 1. Category dimensions
    let categories = config
        .dimensions
        .iter()
        .map(|dim| resolve_dimension(dim, rows))
        .collect::<Result<Vec<_>, _>>()?;

    // 2. Stack dimension
    let stack = match (&config.stack_dimension, use_stack) {
        (Some(dim), true) => Some(resolve_dimension(dim, rows)?),
        _ => None,
    };

    // 3. Metrics
    let metrics = config
        .metrics
        .iter()
        .map(|metric| resolve_metric(metric, rows))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedChart { categories, stack, metrics })
}

fn resolve_dimension(dim: &DimensionField, rows: &RowSet) -> Result<ResolvedColumn, ResolveError> {
    let index = find_column(rows, &dim.field_code, &dim.field_name, &dim.field_id)?;
    Ok(ResolvedColumn {
        field_id: dim.field_id.clone(),
        label: dim.label().to_string(),
        index,
    })
}

fn resolve_metric(metric: &MetricField, rows: &RowSet) -> Result<ResolvedMetric, ResolveError> {
    let index = find_column(rows, &metric.field_code, &metric.field_name, &metric.field_id)?;
    Ok(ResolvedMetric {
        column: ResolvedColumn {
            field_id: metric.field_id.clone(),
            label: metric.label().to_string(),
            index,
        },
        format: metric.number_format.clone(),
    })
}

fn find_column(rows: &RowSet, code: &str, name: &str, id: &str) -> Result<usize, ResolveError> {
    [code, name, id]
        .iter()
        .filter(|candidate| !candidate.trim().is_empty())
        .find_map(|candidate| rows.column_index(candidate))
        .ok_or_else(|| {
            log::warn!("no column for field '{}' among [{}]", id, rows.headers.join(", "));
            ResolveError::MissingColumn { field: id.to_string() }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> RowSet {
        RowSet::new(
            vec!["region".to_string(), "Channel".to_string(), "m_sales".to_string()],
            vec![],
        )
    }

    fn config() -> DataConfig {
        let mut config = DataConfig::for_dataset("ds");
        config.dimensions.push(DimensionField::new("d1", "Region", "region"));
        config.stack_dimension = Some(DimensionField::new("d2", "channel", ""));
        config.metrics.push(MetricField::new("m_sales", "Sales", "sales_amount"));
        config
    }

    #[test]
    fn test_resolve_by_code_name_and_id() {
        let resolved = resolve_chart(&config(), &rows(), true).unwrap();
        assert_eq!(resolved.categories[0].index, 0);
        assert_eq!(resolved.categories[0].label, "Region");
        assert_eq!(resolved.stack.as_ref().unwrap().index, 1);
        assert_eq!(resolved.metrics[0].column.index, 2);
    }

    #[test]
    fn test_stack_ignored_when_unused() {
        let resolved = resolve_chart(&config(), &rows(), false).unwrap();
        assert!(resolved.stack.is_none());
    }

    #[test]
    fn test_missing_column() {
        let mut config = config();
        config.metrics.push(MetricField::new("m2", "Profit", "profit"));
        let err = resolve_chart(&config, &rows(), true).unwrap_err();
        assert_eq!(err, ResolveError::MissingColumn { field: "m2".to_string() });
    }

    #[test]
    fn test_display_name_used_as_label() {
        let mut config = config();
        config.metrics[0].display_name = Some("Revenue".to_string());
        let resolved = resolve_chart(&config, &rows(), true).unwrap();
        assert_eq!(resolved.metrics[0].column.label, "Revenue");
    }
}
