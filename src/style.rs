// Style Model: typography, visibility and color options per chart region

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl LegendPosition {
    pub fn is_vertical(&self) -> bool {
        matches!(self, LegendPosition::Left | LegendPosition::Right)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_size: 12,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
            color: "#333333".to_string(),
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: u32) -> Self {
        TextStyle { font_size, ..TextStyle::default() }
    }
}

/// Title or subtitle block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingStyle {
    pub show: bool,
    pub text: Option<String>,
    pub text_style: TextStyle,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        HeadingStyle {
            show: true,
            text: None,
            text_style: TextStyle::sized(16),
        }
    }
}

impl HeadingStyle {
    /// Visible, non-empty heading text
    pub fn visible_text(&self) -> Option<&str> {
        if !self.show {
            return None;
        }
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisStyle {
    pub show_title: bool,
    /// Custom axis title; the assigned field names are used when absent
    pub title: Option<String>,
    pub title_style: TextStyle,
    pub label_style: TextStyle,
}

impl Default for AxisStyle {
    fn default() -> Self {
        AxisStyle {
            show_title: false,
            title: None,
            title_style: TextStyle::default(),
            label_style: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendStyle {
    /// Placement along the legend's edge
    pub align: TextAlign,
    pub text_style: TextStyle,
}

impl Default for LegendStyle {
    fn default() -> Self {
        LegendStyle {
            align: TextAlign::Center,
            text_style: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub title: HeadingStyle,
    pub subtitle: HeadingStyle,
    pub x_axis: AxisStyle,
    pub y_axis: AxisStyle,
    pub legend: LegendStyle,
    pub metric_value: TextStyle,
    pub show_legend: bool,
    pub show_axis: bool,
    pub show_data_label: bool,
    pub show_grid: bool,
    pub legend_position: LegendPosition,
    pub color_scheme: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            title: HeadingStyle::default(),
            subtitle: HeadingStyle {
                text_style: TextStyle::sized(12),
                ..HeadingStyle::default()
            },
            x_axis: AxisStyle::default(),
            y_axis: AxisStyle::default(),
            legend: LegendStyle::default(),
            metric_value: TextStyle {
                font_size: 32,
                bold: true,
                align: TextAlign::Center,
                ..TextStyle::default()
            },
            show_legend: true,
            show_axis: true,
            show_data_label: false,
            show_grid: true,
            legend_position: LegendPosition::Top,
            color_scheme: "default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_style_uses_defaults() {
        let style: StyleConfig = serde_json::from_str(r#"{"legendPosition":"left","showDataLabel":true}"#).unwrap();
        assert_eq!(style.legend_position, LegendPosition::Left);
        assert!(style.show_data_label);
        assert!(style.show_legend);
        assert_eq!(style.color_scheme, "default");
        assert_eq!(style.metric_value.font_size, 32);
    }

    #[test]
    fn test_heading_visibility() {
        let mut heading = HeadingStyle { text: Some("Sales".to_string()), ..HeadingStyle::default() };
        assert_eq!(heading.visible_text(), Some("Sales"));
        heading.show = false;
        assert_eq!(heading.visible_text(), None);
        heading.show = true;
        heading.text = Some("   ".to_string());
        assert_eq!(heading.visible_text(), None);
    }

    #[test]
    fn test_vertical_positions() {
        assert!(LegendPosition::Left.is_vertical());
        assert!(!LegendPosition::Bottom.is_vertical());
    }
}
