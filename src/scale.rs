use std::collections::HashMap;

use crate::ir::{ChartData, ValueScale};

/// Target number of value-axis intervals
const TICK_COUNT: usize = 5;
/// Extents needing more ticks than this get a two-tick scale
const MAX_INTERVALS: f64 = 100.0;

/// Build the value-axis scale for `data`.
///
/// `stacks` runs parallel to `data.series`; series sharing a stack key are
/// summed per category (positives and negatives separately), the others are
/// measured on their own. The extent always includes zero.
pub fn build_value_scale(data: &ChartData, stacks: &[Option<String>]) -> ValueScale {
    let mut min: f64 = 0.0;
    let mut max: f64 = 0.0;

    // 1. Unstacked series
    for (series, stack) in data.series.iter().zip(stacks) {
        if stack.is_some() {
            continue;
        }
        for value in series.values.iter().flatten() {
            min = min.min(*value);
            max = max.max(*value);
        }
    }

    // 2. Stacked series, accumulated per (stack, category)
    let mut positive: HashMap<(&str, usize), f64> = HashMap::new();
    let mut negative: HashMap<(&str, usize), f64> = HashMap::new();
    for (series, stack) in data.series.iter().zip(stacks) {
        let Some(stack) = stack.as_deref() else {
            continue;
        };
        for (cat, value) in series.values.iter().enumerate() {
            match value {
                Some(v) if *v >= 0.0 => *positive.entry((stack, cat)).or_insert(0.0) += v,
                Some(v) => *negative.entry((stack, cat)).or_insert(0.0) += v,
                None => {}
            }
        }
    }
    for total in positive.values() {
        max = max.max(*total);
    }
    for total in negative.values() {
        min = min.min(*total);
    }

    nice_scale(min, max)
}

/// Round the extent outwards to a 1/2/5 step and list the ticks
pub fn nice_scale(min: f64, max: f64) -> ValueScale {
    let (min, max) = (finite(min), finite(max));
    let (min, max) = if min == max { pad_range(min, max) } else { (min, max) };
    let step = nice_step((max - min) / TICK_COUNT as f64);
    let lo = (min / step).floor() * step;
    let hi = (max / step).ceil() * step;

    // Rounding outwards can leave f64 range near its limits
    let intervals = (hi - lo) / step;
    if !intervals.is_finite() || intervals > MAX_INTERVALS {
        log::debug!("value extent {}..{} too wide for nice ticks", min, max);
        return ValueScale { min, max, ticks: vec![min, max] };
    }
    let intervals = intervals.round() as usize;
    let ticks = (0..=intervals).map(|i| round_tick(lo + step * i as f64)).collect();
    ValueScale { min: round_tick(lo), max: round_tick(hi), ticks }
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Saturate infinite sums to the largest finite value; NaN counts as zero
fn finite(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}

fn round_tick(value: f64) -> f64 {
    let rounded = (value * 1e9).round() / 1e9;
    if !rounded.is_finite() {
        value
    } else if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Widen a degenerate range, or add 5% padding on both sides
pub fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        if min == 0.0 {
            (0.0, 1.0)
        } else {
            (min - 1.0, max + 1.0)
        }
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}
