// Dataset catalog: the field list supplied by the host for the selected dataset

use serde::{Deserialize, Serialize};

use crate::model::{CandidateField, DataConfig, DimensionField, FieldDataType, FieldType, MetricField};

/// Words marking a field as time-relevant, in the locales the product ships
const TIME_KEYWORDS: &[&str] = &["time", "date", "时间", "日期"];

/// A field as declared by the dataset catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetField {
    pub field_id: String,
    pub field_name: String,
    #[serde(default)]
    pub field_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub data_type: FieldDataType,
    pub role: FieldType,
    /// Whether the field has a distinct-value list usable by enum filters
    #[serde(default)]
    pub enumerable: bool,
    /// Server-computed metric (no user-selectable aggregation)
    #[serde(default)]
    pub is_virtual: bool,
}

impl DatasetField {
    pub fn dimension(field_id: &str, field_name: &str, field_code: &str) -> Self {
        DatasetField {
            field_id: field_id.to_string(),
            field_name: field_name.to_string(),
            field_code: field_code.to_string(),
            display_name: None,
            data_type: FieldDataType::Text,
            role: FieldType::Dimension,
            enumerable: false,
            is_virtual: false,
        }
    }

    pub fn metric(field_id: &str, field_name: &str, field_code: &str) -> Self {
        DatasetField {
            data_type: FieldDataType::Number,
            role: FieldType::Metric,
            ..DatasetField::dimension(field_id, field_name, field_code)
        }
    }

    /// Name or code contains one of the time keywords
    pub fn is_time_relevant(&self) -> bool {
        let name = self.field_name.to_lowercase();
        let code = self.field_code.to_lowercase();
        TIME_KEYWORDS.iter().any(|kw| name.contains(kw) || code.contains(kw))
    }

    /// Build the field handed to the Field Assignment Engine on drop
    pub fn to_candidate(&self) -> CandidateField {
        match self.role {
            FieldType::Dimension => {
                let mut field = DimensionField::new(&self.field_id, &self.field_name, &self.field_code);
                field.display_name = self.display_name.clone();
                if self.data_type == FieldDataType::Date {
                    field.time_granularity = Some("day".to_string());
                }
                CandidateField::Dimension(field)
            }
            FieldType::Metric => {
                let mut field = if self.is_virtual {
                    MetricField::new_virtual(&self.field_id, &self.field_name, &self.field_code)
                } else {
                    MetricField::new(&self.field_id, &self.field_name, &self.field_code)
                };
                field.display_name = self.display_name.clone();
                CandidateField::Metric(field)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetCatalog {
    pub dataset_id: String,
    #[serde(default)]
    pub fields: Vec<DatasetField>,
}

impl DatasetCatalog {
    pub fn new(dataset_id: impl Into<String>, fields: Vec<DatasetField>) -> Self {
        DatasetCatalog { dataset_id: dataset_id.into(), fields }
    }

    pub fn field(&self, field_id: &str) -> Option<&DatasetField> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }

    /// Fields offered by the filter editor. Time-relevant fields are left out
    /// so time filtering always goes through the dedicated time filter.
    pub fn filterable_fields(&self) -> Vec<&DatasetField> {
        self.fields.iter().filter(|f| !f.is_time_relevant()).collect()
    }
}

/// Flag (or clear) the `invalid` marker on every assigned field depending on
/// whether the catalog still knows its id. Returns the ids flagged invalid.
pub fn mark_stale_fields(config: &mut DataConfig, catalog: &DatasetCatalog) -> Vec<String> {
    let mut stale = Vec::new();

    for dim in config.dimensions.iter_mut().chain(config.stack_dimension.iter_mut()) {
        dim.invalid = !catalog.contains(&dim.field_id);
        if dim.invalid {
            stale.push(dim.field_id.clone());
        }
    }
    for metric in config.metrics.iter_mut() {
        metric.invalid = !catalog.contains(&metric.field_id);
        if metric.invalid {
            stale.push(metric.field_id.clone());
        }
    }

    if !stale.is_empty() {
        log::warn!("{} assigned field(s) missing from dataset '{}'", stale.len(), catalog.dataset_id);
    }
    stale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> DatasetCatalog {
        DatasetCatalog::new(
            "ds1",
            vec![
                DatasetField::dimension("d1", "Region", "region"),
                DatasetField::dimension("d2", "Order Date", "order_date"),
                DatasetField::dimension("d3", "下单时间", "placed"),
                DatasetField::dimension("d4", "Channel", "created_time"),
                DatasetField::metric("m1", "Sales", "sales"),
            ],
        )
    }

    #[test]
    fn test_time_fields_are_not_filterable() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.filterable_fields().iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "m1"]);
    }

    #[test]
    fn test_to_candidate() {
        let catalog = catalog();
        assert!(matches!(catalog.field("d1").unwrap().to_candidate(), CandidateField::Dimension(_)));
        match catalog.field("m1").unwrap().to_candidate() {
            CandidateField::Metric(m) => assert!(m.aggregation.is_some()),
            _ => panic!("Expected metric"),
        }
    }

    #[test]
    fn test_mark_stale_fields() {
        let mut config = DataConfig::for_dataset("ds1");
        config.dimensions.push(DimensionField::new("d1", "Region", "region"));
        config.dimensions.push(DimensionField::new("gone", "Old", "old"));
        config.metrics.push(MetricField::new("m1", "Sales", "sales"));

        let stale = mark_stale_fields(&mut config, &catalog());
        assert_eq!(stale, vec!["gone".to_string()]);
        assert!(!config.dimensions[0].invalid);
        assert!(config.dimensions[1].invalid);

        // Switching back to a catalog that knows the field clears the flag
        let mut fields = catalog().fields;
        fields.push(DatasetField::dimension("gone", "Old", "old"));
        let stale = mark_stale_fields(&mut config, &DatasetCatalog::new("ds1", fields));
        assert!(stale.is_empty());
        assert!(!config.dimensions[1].invalid);
    }
}
