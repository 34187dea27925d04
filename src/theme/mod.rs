// Theme module - Color constants and hull palette
//
// Neutral slate tones for chrome and nodes, and a curated set of vivid
// colors for protocol hulls. Hulls beyond the curated set get colors from
// golden-ratio hue stepping so neighbouring indices stay distinguishable.

use ratatui::style::Color;

/// Primary accent - borders, titles, the condition cursor
/// RGB: (96, 165, 250)
pub const ACCENT: Color = Color::Rgb(96, 165, 250);

/// General text
/// RGB: (226, 232, 240)
pub const TEXT: Color = Color::Rgb(226, 232, 240);

/// Secondary text, hints, idle borders
/// RGB: (100, 116, 139)
pub const MUTED: Color = Color::Rgb(100, 116, 139);

/// Background of the highlighted list row
/// RGB: (51, 65, 85)
pub const HIGHLIGHT_BG: Color = Color::Rgb(51, 65, 85);

/// Toggles that are switched on, active protocol counts
/// RGB: (74, 222, 128)
pub const ENABLED: Color = Color::Rgb(74, 222, 128);

/// Toggles that are switched off
/// RGB: (248, 113, 113)
pub const DISABLED: Color = Color::Rgb(248, 113, 113);

/// Active node not covered by any active hull
/// RGB: (248, 250, 252)
pub const NODE_ACTIVE: Color = Color::Rgb(248, 250, 252);

/// Inactive node
/// RGB: (100, 116, 139)
pub const NODE_INACTIVE: Color = Color::Rgb(100, 116, 139);

/// Curated hull colors, used in order
pub const HULL_PALETTE: [&str; 12] = [
    "#60a5fa", // blue
    "#4ade80", // green
    "#f472b6", // pink
    "#facc15", // yellow
    "#a78bfa", // purple
    "#fb923c", // orange
    "#2dd4bf", // teal
    "#f87171", // red
    "#38bdf8", // sky
    "#a3e635", // lime
    "#e879f9", // fuchsia
    "#fbbf24", // amber
];

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618033988749895;
const GENERATED_LIGHTNESS: f64 = 0.6;
const GENERATED_SATURATION: f64 = 0.7;

/// Hex color for the hull at `index`
pub fn hull_color_hex(index: usize) -> String {
    match HULL_PALETTE.get(index) {
        Some(hex) => (*hex).to_string(),
        None => {
            let hue = (index as f64 * GOLDEN_RATIO_CONJUGATE).rem_euclid(1.0);
            let (r, g, b) = hls_to_rgb(hue, GENERATED_LIGHTNESS, GENERATED_SATURATION);
            format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
        }
    }
}

/// Color for the hull at `index`
pub fn hull_color(index: usize) -> Color {
    // Both branches of hull_color_hex produce well-formed hex
    parse_hex_color(&hull_color_hex(index)).unwrap_or(ACCENT)
}

/// Parse `#rrggbb` (the leading `#` is optional, case-insensitive)
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Format an RGB color as `#rrggbb`; other colors yield None
pub fn to_hex(color: Color) -> Option<String> {
    match color {
        Color::Rgb(r, g, b) => Some(format!("#{r:02x}{g:02x}{b:02x}")),
        _ => None,
    }
}

/// Truncating float-to-byte conversion for a [0, 1] channel
fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// HLS to RGB, all components in [0, 1]
fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_component(m1, m2, h + 1.0 / 3.0),
        hue_component(m1, m2, h),
        hue_component(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_component(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
