use std::collections::HashMap;

use crate::ir::{ChartData, ResolvedChart, SeriesData};
use crate::rows::RowSet;

/// Pivot rows into categories x series.
///
/// Categories and stack values keep their first-appearance order, which is
/// the order the query executor sorted them in. Without a stack dimension
/// there is one series per metric; with one, one series per metric and
/// stack value. Rows sharing a category and series are summed.
pub fn pivot(resolved: &ResolvedChart, rows: &RowSet) -> ChartData {
    // 1. Category keys
    let mut categories: Vec<String> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut row_category = Vec::with_capacity(rows.rows.len());
    for row in 0..rows.rows.len() {
        let key = category_key(resolved, rows, row);
        let idx = *category_index.entry(key.clone()).or_insert_with(|| {
            categories.push(key);
            categories.len() - 1
        });
        row_category.push(idx);
    }

    // 2. Stack values
    let stack_values: Vec<Option<String>> = match &resolved.stack {
        Some(stack) => {
            let mut seen: Vec<String> = Vec::new();
            for row in 0..rows.rows.len() {
                let value = rows.cell(row, stack.index).unwrap_or("").to_string();
                if !seen.contains(&value) {
                    seen.push(value);
                }
            }
            seen.into_iter().map(Some).collect()
        }
        None => vec![None],
    };

    // 3. Series shells, metric-major
    let multi_metric = resolved.metrics.len() > 1;
    let mut series = Vec::new();
    let mut series_index: HashMap<(usize, Option<&str>), usize> = HashMap::new();
    for (m, metric) in resolved.metrics.iter().enumerate() {
        for stack_value in &stack_values {
            let name = match stack_value {
                Some(value) if multi_metric => format!("{} - {}", value, metric.column.label),
                Some(value) => value.clone(),
                None => metric.column.label.clone(),
            };
            series_index.insert((m, stack_value.as_deref()), series.len());
            series.push(SeriesData {
                name,
                metric: m,
                stack_value: stack_value.clone(),
                values: vec![None; categories.len()],
            });
        }
    }

    // 4. Fill
    for (row, &cat) in row_category.iter().enumerate() {
        let stack_value = resolved.stack.as_ref().map(|s| rows.cell(row, s.index).unwrap_or(""));
        for (m, metric) in resolved.metrics.iter().enumerate() {
            let Some(value) = rows.number(row, metric.column.index) else {
                continue;
            };
            if let Some(&s) = series_index.get(&(m, stack_value)) {
                let slot = &mut series[s].values[cat];
                *slot = Some(slot.unwrap_or(0.0) + value);
            }
        }
    }

    ChartData { categories, series }
}

/// Sum of a metric column over every row, for single-value charts
pub fn total(rows: &RowSet, column: usize) -> Option<f64> {
    let values: Vec<f64> = (0..rows.rows.len()).filter_map(|row| rows.number(row, column)).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

fn category_key(resolved: &ResolvedChart, rows: &RowSet, row: usize) -> String {
    resolved
        .categories
        .iter()
        .map(|c| rows.cell(row, c.index).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ResolvedColumn, ResolvedMetric};
    use crate::model::NumberFormat;
    use pretty_assertions::assert_eq;

    fn column(id: &str, index: usize) -> ResolvedColumn {
        ResolvedColumn { field_id: id.to_string(), label: id.to_uppercase(), index }
    }

    fn metric(id: &str, index: usize) -> ResolvedMetric {
        ResolvedMetric { column: column(id, index), format: NumberFormat::default() }
    }

    fn rows(data: &[&[&str]]) -> RowSet {
        let headers = vec!["region", "channel", "year", "sales", "profit"];
        RowSet::new(
            headers.into_iter().map(String::from).collect(),
            data.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
    }

    #[test]
    fn test_single_metric() {
        let resolved = ResolvedChart { categories: vec![column("region", 0)], stack: None, metrics: vec![metric("sales", 3)] };
        let data = pivot(
            &resolved,
            &rows(&[&["west", "web", "2024", "5", "1"], &["east", "web", "2024", "7", "2"], &["west", "shop", "2024", "1", "0"]]),
        );
        assert_eq!(data.categories, vec!["west", "east"]);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].name, "SALES");
        assert_eq!(data.series[0].values, vec![Some(6.0), Some(7.0)]);
    }

    #[test]
    fn test_stack_split_and_gaps() {
        let resolved = ResolvedChart {
            categories: vec![column("region", 0)],
            stack: Some(column("channel", 1)),
            metrics: vec![metric("sales", 3)],
        };
        let data = pivot(
            &resolved,
            &rows(&[&["west", "web", "2024", "5", ""], &["east", "shop", "2024", "7", ""], &["east", "web", "2024", "", ""]]),
        );
        let names: Vec<&str> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["web", "shop"]);
        assert_eq!(data.series[0].values, vec![Some(5.0), None]);
        assert_eq!(data.series[1].values, vec![None, Some(7.0)]);
    }

    #[test]
    fn test_multi_metric_with_stack_names() {
        let resolved = ResolvedChart {
            categories: vec![column("region", 0)],
            stack: Some(column("channel", 1)),
            metrics: vec![metric("sales", 3), metric("profit", 4)],
        };
        let data = pivot(&resolved, &rows(&[&["west", "web", "2024", "5", "1"]]));
        let names: Vec<&str> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["web - SALES", "web - PROFIT"]);
        assert_eq!(data.series[1].metric, 1);
    }

    #[test]
    fn test_two_dimensions_join_with_newline() {
        let resolved = ResolvedChart {
            categories: vec![column("region", 0), column("year", 2)],
            stack: None,
            metrics: vec![metric("sales", 3)],
        };
        let data = pivot(&resolved, &rows(&[&["west", "web", "2024", "5", "1"]]));
        assert_eq!(data.categories, vec!["west\n2024"]);
    }

    #[test]
    fn test_no_rows() {
        let resolved = ResolvedChart { categories: vec![column("region", 0)], stack: None, metrics: vec![metric("sales", 3)] };
        let data = pivot(&resolved, &rows(&[]));
        assert!(data.categories.is_empty());
        assert_eq!(data.series[0].values, Vec::<Option<f64>>::new());
    }

    #[test]
    fn test_total() {
        let set = rows(&[&["a", "", "", "5", ""], &["b", "", "", "x", ""], &["c", "", "", "2.5", ""]]);
        assert_eq!(total(&set, 3), Some(7.5));
        assert_eq!(total(&set, 4), None);
    }
}
