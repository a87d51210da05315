// Stack geometry: which segment is the visual top and which corners are rounded

use crate::model::ChartKind;

pub const CORNER_RADIUS: u32 = 4;

/// How bar corners are rounded for a chart kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    None,
    /// Every point of every series
    Series([u32; 4]),
    /// Only the visual top segment of each stacked category
    TopOnly([u32; 4]),
}

/// Outward-facing corners: the right edge for horizontal bars, the top edge otherwise
pub fn outer_corners(horizontal: bool) -> [u32; 4] {
    let r = CORNER_RADIUS;
    if horizontal {
        [0, r, r, 0]
    } else {
        [r, r, 0, 0]
    }
}

pub fn rounding(kind: ChartKind) -> Rounding {
    let corners = outer_corners(kind.is_horizontal());
    match (kind.is_stacked(), kind.is_line_like()) {
        (true, true) => Rounding::None,
        (true, false) => Rounding::TopOnly(corners),
        (false, _) => Rounding::Series(corners),
    }
}

/// For each category, the series drawn on top of the stack.
///
/// Series are scanned last to first; the first one holding a strictly
/// positive value at that category wins. `None` where no series qualifies.
pub fn top_of_stack(series: &[&[Option<f64>]]) -> Vec<Option<usize>> {
    let categories = series.iter().map(|s| s.len()).max().unwrap_or(0);
    (0..categories)
        .map(|cat| {
            (0..series.len())
                .rev()
                .find(|&s| matches!(series[s].get(cat), Some(Some(v)) if *v > 0.0))
        })
        .collect()
}
