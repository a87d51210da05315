// Named color schemes for series and slices

/// Fallback scheme used for unknown names
pub const DEFAULT_SCHEME: &str = "default";

const SCHEMES: &[(&str, &[&str])] = &[
    (
        "default",
        &[
            "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4", "#ea7ccc",
        ],
    ),
    (
        "business",
        &["#1f4e79", "#2e75b6", "#9dc3e6", "#548235", "#a9d18e", "#bf9000", "#ffd966", "#7f7f7f"],
    ),
    (
        "fresh",
        &["#36cfc9", "#73d13d", "#40a9ff", "#ffc53d", "#9254de", "#ff7a45", "#f759ab", "#5cdbd3"],
    ),
    (
        "warm",
        &["#d4380d", "#fa8c16", "#fadb14", "#d48806", "#ad4e00", "#ff7875", "#ffa940", "#ffe58f"],
    ),
    (
        "cool",
        &["#003a8c", "#096dd9", "#40a9ff", "#08979c", "#36cfc9", "#531dab", "#9254de", "#adc6ff"],
    ),
];

/// Color palette for categorical data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    name: &'static str,
    colors: &'static [&'static str],
}

impl ColorPalette {
    /// Resolve a scheme name against the fixed table (case-insensitive).
    /// Unknown names fall back to the default scheme.
    pub fn named(name: &str) -> Self {
        let found = SCHEMES.iter().find(|(n, _)| n.eq_ignore_ascii_case(name.trim()));
        match found {
            Some((n, colors)) => ColorPalette { name: *n, colors: *colors },
            None => {
                log::warn!("unknown color scheme '{}', using '{}'", name, DEFAULT_SCHEME);
                Self::default_scheme()
            }
        }
    }

    pub fn default_scheme() -> Self {
        ColorPalette { name: SCHEMES[0].0, colors: SCHEMES[0].1 }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of all known schemes, in table order
    pub fn scheme_names() -> Vec<&'static str> {
        SCHEMES.iter().map(|(n, _)| *n).collect()
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> String {
        self.colors[index % self.colors.len()].to_string()
    }

    /// Every color of the scheme, in order
    pub fn colors(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_string()).collect()
    }
}

/// Parse a `#rrggbb` color into its components
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
