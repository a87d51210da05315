// Legend placement and the grid padding it implies

use crate::ir::{GridSpec, LegendSpec, Offset, Orient, TextStyleSpec};
use crate::style::{LegendPosition, StyleConfig, TextAlign};

/// Distance between the legend and the container edge
pub const EDGE_OFFSET: f64 = 10.0;
/// Padding on every side of the plot area before adjustments
pub const GRID_BASE: f64 = 20.0;
pub const LEFT_LEGEND_SPACE: f64 = 160.0;
pub const RIGHT_LEGEND_SPACE: f64 = 100.0;
pub const TOP_LEGEND_SPACE: f64 = 40.0;
pub const BOTTOM_LEGEND_SPACE: f64 = 40.0;
pub const AXIS_TITLE_SPACE: f64 = 30.0;
/// Extra bottom space per category dimension beyond the first
pub const EXTRA_DIMENSION_SPACE: f64 = 10.0;

/// Legend for `names`, or `None` when the legend is switched off.
/// `heading` is the height taken by the title block at the top.
pub fn legend(style: &StyleConfig, names: Vec<String>, heading: f64) -> Option<LegendSpec> {
    if !style.show_legend {
        return None;
    }

    let edge = Offset::Px(EDGE_OFFSET);
    let position = style.legend_position;
    // Start/end offsets along the legend's own edge
    let (start, end) = match style.legend.align {
        TextAlign::Left => (Offset::Px(EDGE_OFFSET), Offset::Auto),
        TextAlign::Right => (Offset::Auto, Offset::Px(EDGE_OFFSET)),
        TextAlign::Center => (Offset::Auto, Offset::Auto),
    };
    let below_heading = |offset: Offset| match offset {
        Offset::Px(px) => Offset::Px(px + heading),
        Offset::Auto => Offset::Auto,
    };

    let (top, bottom, left, right) = match position {
        LegendPosition::Top => (Offset::Px(EDGE_OFFSET + heading), Offset::Auto, start, end),
        LegendPosition::Bottom => (Offset::Auto, edge, start, end),
        LegendPosition::Left => (below_heading(start), end, edge, Offset::Auto),
        LegendPosition::Right => (below_heading(start), end, Offset::Auto, edge),
    };

    Some(LegendSpec {
        show: true,
        orient: if position.is_vertical() { Orient::Vertical } else { Orient::Horizontal },
        top,
        bottom,
        left,
        right,
        data: names,
        text_style: TextStyleSpec::from(&style.legend.text_style),
    })
}

/// Plot-area padding for the legend, the heading and the x-axis title
pub fn grid(style: &StyleConfig, dimension_count: usize, heading: f64) -> GridSpec {
    let mut grid = GridSpec {
        top: GRID_BASE + heading,
        bottom: GRID_BASE,
        left: GRID_BASE,
        right: GRID_BASE,
        contain_label: true,
    };

    if style.show_legend {
        match style.legend_position {
            LegendPosition::Left => grid.left = LEFT_LEGEND_SPACE,
            LegendPosition::Right => grid.right = RIGHT_LEGEND_SPACE,
            LegendPosition::Top => grid.top = TOP_LEGEND_SPACE + heading,
            LegendPosition::Bottom => grid.bottom += BOTTOM_LEGEND_SPACE,
        }
    }

    if style.show_axis && style.x_axis.show_title {
        let extra = dimension_count.saturating_sub(1) as f64;
        grid.bottom += AXIS_TITLE_SPACE + EXTRA_DIMENSION_SPACE * extra;
    }

    grid
}
