// Time range attached to a chart

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilterType {
    #[default]
    All,
    RecentDays,
    Custom,
}

/// `Dynamic` windows move with the evaluation date, `Fixed` ones stay pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilterMode {
    #[default]
    Fixed,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFilter {
    #[serde(rename = "type", default)]
    pub kind: TimeFilterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TimeFilterMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Inclusive date window handed to the query executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeFilter {
    pub fn recent_days(days: u32) -> Self {
        TimeFilter {
            kind: TimeFilterType::RecentDays,
            mode: Some(TimeFilterMode::Dynamic),
            recent_days: Some(days),
            start_date: None,
            end_date: None,
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate, mode: TimeFilterMode) -> Self {
        TimeFilter {
            kind: TimeFilterType::Custom,
            mode: Some(mode),
            recent_days: None,
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.kind {
            TimeFilterType::All => Ok(()),
            TimeFilterType::RecentDays => match self.recent_days {
                Some(days) if days > 0 => Ok(()),
                _ => Err(ValidationError::InvalidRecentDays),
            },
            TimeFilterType::Custom => match (self.start_date, self.end_date) {
                (Some(start), Some(end)) if start <= end => Ok(()),
                _ => Err(ValidationError::InvalidDateRange),
            },
        }
    }

    /// Concrete window as of `today`, or `None` for "all time", invalid filters
    /// and windows reaching past the earliest representable date.
    ///
    /// Recent-day windows end today and include `recent_days` days. A fixed
    /// recent-day filter with pinned dates keeps them. A dynamic custom window
    /// keeps its length and slides so that it ends today.
    pub fn resolve(&self, today: NaiveDate) -> Option<TimeWindow> {
        self.validate().ok()?;
        let mode = self.mode.unwrap_or_default();
        match self.kind {
            TimeFilterType::All => None,
            TimeFilterType::RecentDays => {
                if let (TimeFilterMode::Fixed, Some(start), Some(end)) = (mode, self.start_date, self.end_date) {
                    return Some(TimeWindow { start, end });
                }
                let days = Days::new(u64::from(self.recent_days?) - 1);
                Some(TimeWindow { start: today.checked_sub_days(days)?, end: today })
            }
            TimeFilterType::Custom => {
                let (start, end) = (self.start_date?, self.end_date?);
                match mode {
                    TimeFilterMode::Fixed => Some(TimeWindow { start, end }),
                    TimeFilterMode::Dynamic => {
                        let span = end - start;
                        Some(TimeWindow { start: today.checked_sub_signed(span)?, end: today })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_has_no_window() {
        assert_eq!(TimeFilter::default().resolve(date(2024, 5, 10)), None);
    }

    #[test]
    fn test_recent_days_window() {
        let window = TimeFilter::recent_days(7).resolve(date(2024, 5, 10)).unwrap();
        assert_eq!(window.start, date(2024, 5, 4));
        assert_eq!(window.end, date(2024, 5, 10));
    }

    #[test]
    fn test_recent_days_must_be_positive() {
        let filter = TimeFilter::recent_days(0);
        assert_eq!(filter.validate(), Err(ValidationError::InvalidRecentDays));
        assert_eq!(filter.resolve(date(2024, 5, 10)), None);
    }

    #[test]
    fn test_fixed_custom_is_pinned() {
        let filter = TimeFilter::custom(date(2024, 1, 1), date(2024, 1, 31), TimeFilterMode::Fixed);
        let window = filter.resolve(date(2024, 5, 10)).unwrap();
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 1, 31));
    }

    #[test]
    fn test_dynamic_custom_slides() {
        let filter = TimeFilter::custom(date(2024, 1, 1), date(2024, 1, 31), TimeFilterMode::Dynamic);
        let window = filter.resolve(date(2024, 5, 10)).unwrap();
        assert_eq!(window.end, date(2024, 5, 10));
        assert_eq!(window.start, date(2024, 4, 10));
    }

    #[test]
    fn test_window_past_earliest_date() {
        let filter = TimeFilter::recent_days(100_000_000);
        assert_eq!(filter.validate(), Ok(()));
        assert_eq!(filter.resolve(date(2024, 5, 10)), None);

        let filter = TimeFilter::custom(NaiveDate::MIN, date(2024, 1, 1), TimeFilterMode::Dynamic);
        assert_eq!(filter.resolve(date(2024, 5, 10)), None);
        assert!(filter.resolve(date(2024, 1, 1)).is_some());
    }

    #[test]
    fn test_inverted_range_is_invalid() {
        let filter = TimeFilter::custom(date(2024, 2, 1), date(2024, 1, 1), TimeFilterMode::Fixed);
        assert_eq!(filter.validate(), Err(ValidationError::InvalidDateRange));
    }

    #[test]
    fn test_json_shape() {
        let filter: TimeFilter =
            serde_json::from_str(r#"{"type":"custom","mode":"dynamic","startDate":"2024-01-01","endDate":"2024-01-02"}"#)
                .unwrap();
        assert_eq!(filter.kind, TimeFilterType::Custom);
        assert_eq!(filter.mode, Some(TimeFilterMode::Dynamic));
    }
}
