// Commit-time validation of a chart configuration

use crate::error::ValidationError;
use crate::filter;
use crate::model::{ChartKind, DataConfig, LimitType};

/// Check `config` before it is frozen. Only the first problem is reported,
/// in this order: dataset, dimension, metric, stale fields, filters, time
/// filter, result limit.
pub fn validate_for_commit(config: &DataConfig, kind: ChartKind) -> Result<(), ValidationError> {
    if config.dataset_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        return Err(ValidationError::NoDataset);
    }
    if kind.requires_dimension() && config.dimensions.is_empty() {
        return Err(ValidationError::MissingDimension);
    }
    if config.metrics.is_empty() {
        return Err(ValidationError::NoMetric);
    }

    let stale = config
        .dimensions
        .iter()
        .chain(config.stack_dimension.iter())
        .filter(|d| d.invalid)
        .map(|d| &d.field_id)
        .chain(config.metrics.iter().filter(|m| m.invalid).map(|m| &m.field_id))
        .next();
    if let Some(field_id) = stale {
        return Err(ValidationError::InvalidField { field_id: field_id.clone() });
    }

    filter::validate(&config.filter_group())?;

    if let Some(time_filter) = &config.time_filter {
        time_filter.validate()?;
    }

    if config.result_limit.limit_type == LimitType::Limited && config.result_limit.limit.map_or(true, |l| l == 0) {
        return Err(ValidationError::InvalidResultLimit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DimensionField, FilterCondition, FilterOperator, MetricField, ResultLimit, TimeFilter, TimeFilterType,
    };

    fn valid() -> DataConfig {
        let mut config = DataConfig::for_dataset("ds");
        config.dimensions.push(DimensionField::new("d", "Region", "region"));
        config.metrics.push(MetricField::new("m", "Sales", "sales"));
        config
    }

    fn key(config: &DataConfig, kind: ChartKind) -> &'static str {
        validate_for_commit(config, kind).unwrap_err().key()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_for_commit(&valid(), ChartKind::Bar).is_ok());
    }

    #[test]
    fn test_first_error_wins() {
        assert_eq!(key(&DataConfig::default(), ChartKind::Bar), "no_dataset");
        assert_eq!(key(&DataConfig::for_dataset("ds"), ChartKind::Bar), "missing_dimension");

        let mut config = valid();
        config.metrics.clear();
        assert_eq!(key(&config, ChartKind::Bar), "no_metric");
    }

    #[test]
    fn test_metric_card_needs_no_dimension() {
        let mut config = valid();
        config.dimensions.clear();
        assert!(validate_for_commit(&config, ChartKind::MetricCard).is_ok());
    }

    #[test]
    fn test_stale_field_fails() {
        let mut config = valid();
        config.metrics[0].invalid = true;
        assert_eq!(
            validate_for_commit(&config, ChartKind::Bar).unwrap_err(),
            ValidationError::InvalidField { field_id: "m".to_string() }
        );
    }

    #[test]
    fn test_filter_and_time_errors() {
        let mut config = valid();
        let mut condition = FilterCondition::empty("c1");
        condition.field_id = Some("d".to_string());
        condition.operator = Some(FilterOperator::Contains);
        config.filters.push(condition);
        assert_eq!(key(&config, ChartKind::Bar), "missing_value");

        let mut config = valid();
        config.time_filter = Some(TimeFilter { kind: TimeFilterType::RecentDays, ..TimeFilter::default() });
        assert_eq!(key(&config, ChartKind::Bar), "invalid_recent_days");
    }

    #[test]
    fn test_result_limit() {
        let mut config = valid();
        config.result_limit = ResultLimit::limited(0);
        assert_eq!(key(&config, ChartKind::Bar), "invalid_result_limit");
        config.result_limit = ResultLimit::limited(10);
        assert!(validate_for_commit(&config, ChartKind::Bar).is_ok());
    }
}
