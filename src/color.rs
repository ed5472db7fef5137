//! Color configuration for particles and the kill ring.
//!
//! The auction-type → RGB table is static configuration data; nothing in
//! the engine mutates it. Unknown codes fall back to [`DEFAULT_COLOR`].

/// An RGB color as the wire format carries it.
pub type ColorTuple = [u8; 3];

/// Fallback color for unknown auction type codes (emerald-500).
pub const DEFAULT_COLOR: ColorTuple = [16, 185, 129];

/// Auction type code → RGB, tailwind-derived.
pub const AUCTION_TYPE_COLORS: [(&str, ColorTuple); 12] = [
    ("1", [22, 163, 74]),    // green-600
    ("2", [13, 148, 136]),   // teal-600
    ("3", [217, 119, 6]),    // amber-600
    ("4", [185, 28, 28]),    // red-700
    ("5", [250, 204, 21]),   // yellow-400
    ("6", [203, 213, 225]),  // slate-200
    ("7", [168, 162, 158]),  // stone-400
    ("8", [4, 120, 87]),     // emerald-700
    ("9", [2, 132, 199]),    // sky-600
    ("10", [29, 78, 216]),   // blue-700
    ("11", [99, 102, 241]),  // indigo-500
    ("12", [101, 163, 13]),  // lime-600
];

/// Look up the color for an auction type code, falling back to
/// [`DEFAULT_COLOR`] for codes not in the table.
pub fn color_for_code(code: &str) -> ColorTuple {
    AUCTION_TYPE_COLORS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// All table colors, in table order. Generators sample from this.
pub fn palette() -> Vec<ColorTuple> {
    AUCTION_TYPE_COLORS.iter().map(|(_, c)| *c).collect()
}

/// Parse a `#rgb` or `#rrggbb` hex string into an RGB tuple.
pub fn hex_to_rgb(hex: &str) -> Option<ColorTuple> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some([r, g, b])
}
