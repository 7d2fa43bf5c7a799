//! Color strings used by the color-over-time curve
//!
//! Accepts `#rgb`, `#rrggbb`, CSS color keywords, or three numbers in `0..1`.

use crate::range::Vec3Range;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// CSS keywords and their 8-bit RGB values
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aqua", 0x00FFFF),
    ("black", 0x000000),
    ("blue", 0x0000FF),
    ("brown", 0xA52A2A),
    ("coral", 0xFF7F50),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkred", 0x8B0000),
    ("fuchsia", 0xFF00FF),
    ("gold", 0xFFD700),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("grey", 0x808080),
    ("hotpink", 0xFF69B4),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lightblue", 0xADD8E6),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lime", 0x00FF00),
    ("magenta", 0xFF00FF),
    ("maroon", 0x800000),
    ("navy", 0x000080),
    ("olive", 0x808000),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("pink", 0xFFC0CB),
    ("purple", 0x800080),
    ("red", 0xFF0000),
    ("salmon", 0xFA8072),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("white", 0xFFFFFF),
    ("yellow", 0xFFFF00),
];

/// Parse a single color, returning `None` when the text is not a color
pub fn parse_color(text: &str) -> Option<[f32; 3]> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = text.to_ascii_lowercase();
    if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some(unpack_rgb(*rgb));
    }

    let numbers: Vec<f32> = text
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers.as_slice() {
        [r, g, b] if [r, g, b].iter().all(|v| v.is_finite()) => Some([*r, *g, *b]),
        _ => None,
    }
}

/// Parse `"color..color"`; unknown colors become `default`
pub fn parse_color_range(text: &str, default: [f32; 3]) -> Vec3Range {
    let mut parts = text.splitn(2, "..");
    let min = parts
        .next()
        .and_then(parse_color)
        .unwrap_or_else(|| {
            log::debug!("Unknown color '{}', using default", text);
            default
        });
    let max = match parts.next() {
        Some(part) if !part.trim().is_empty() => parse_color(part).unwrap_or(default),
        _ => min,
    };
    Vec3Range::new(min, max)
}

/// Parse a comma separated list of color ranges
pub fn parse_color_list(text: &str) -> Vec<Vec3Range> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_color_range(entry, WHITE))
        .collect()
}

fn parse_hex(hex: &str) -> Option<[f32; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            // Expand each nibble: 0xabc -> 0xaabbcc
            let r = (v >> 8) & 0xF;
            let g = (v >> 4) & 0xF;
            let b = v & 0xF;
            Some(unpack_rgb(((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)))
        }
        6 => u32::from_str_radix(hex, 16).ok().map(unpack_rgb),
        _ => None,
    }
}

fn unpack_rgb(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
    ]
}
