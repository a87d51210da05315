// Value and label text formatting for axes, tooltips, data labels and cards

use crate::model::{NumberFormat, NumberKind};

/// Category tick labels keep at most this many characters per line
pub const AXIS_LABEL_MAX_CHARS: usize = 10;
/// Tooltip category names are hard-wrapped at this width
pub const TOOLTIP_WRAP_WIDTH: usize = 50;

/// Format `value` with a metric's number format.
///
/// `Number` values are divided by the unit's scale and printed without a unit
/// symbol. `Duration`/`Storage` values are converted and get the unit symbol.
/// `Percent` values are multiplied by 100 and only honor decimal places and
/// the suffix.
pub fn format_number(value: f64, format: &NumberFormat) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let places = format.places();
    let suffix = format.suffix.as_deref().unwrap_or("");

    if format.kind == NumberKind::Percent {
        return format!("{}%{}", fixed(value * 100.0, places), suffix);
    }

    let (scaled, symbol) = match format.unit {
        Some(unit) => match unit.divisor(format.kind) {
            Some(divisor) => (value / divisor, unit.symbol()),
            // Unit from another family (e.g. Megabyte on a duration) is ignored
            None => (value, ""),
        },
        None => (value, ""),
    };

    let mut text = fixed(scaled, places);
    if format.thousand_separator {
        text = group_thousands(&text);
    }
    format!("{}{}{}", text, symbol, suffix)
}

/// Value as received, without any number format applied
pub fn raw_number(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value)
    } else {
        "-".to_string()
    }
}

/// Percentage of `part` in `total` with two decimals
pub fn percent_of(part: f64, total: f64) -> String {
    if total == 0.0 || !total.is_finite() {
        return "0.00".to_string();
    }
    fixed(part / total * 100.0, 2)
}

fn fixed(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places, value);
    // "-0.00" reads as a negative value
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Insert `,` between groups of three integer digits
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Truncate each line of a tick label to `max_chars`, appending `...`
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    label
        .split('\n')
        .map(|line| {
            if line.chars().count() > max_chars {
                let head: String = line.chars().take(max_chars).collect();
                format!("{}...", head)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hard-wrap `text` every `width` characters
pub fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + text.len() / width);
    for (i, c) in text.chars().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    out
}
