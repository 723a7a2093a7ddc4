use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color parsing: user text → RGBColor
// ---------------------------------------------------------------------------

/// Parse a colour given on the command line or in a settings file.
///
/// Accepts matplotlib single-letter codes (`b`, `r`, `k`, ...), CSS/SVG
/// colour names (`blue`, `steelblue`, ...) and `#rgb` / `#rrggbb`.
pub fn parse_color(text: &str) -> Result<RGBColor> {
    let name = text.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| Error::InvalidColor(text.to_string()));
    }

    // matplotlib's base colours
    let rgb = match name.as_str() {
        "b" => Some(RGBColor(0, 0, 255)),
        "g" => Some(RGBColor(0, 128, 0)),
        "r" => Some(RGBColor(255, 0, 0)),
        "c" => Some(RGBColor(0, 191, 191)),
        "m" => Some(RGBColor(191, 0, 191)),
        "y" => Some(RGBColor(191, 191, 0)),
        "k" => Some(RGBColor(0, 0, 0)),
        "w" => Some(RGBColor(255, 255, 255)),
        _ => palette::named::from_str(&name).map(|c| RGBColor(c.red, c.green, c.blue)),
    };
    rgb.ok_or_else(|| Error::InvalidColor(text.to_string()))
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(RGBColor(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(RGBColor(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let colours = generate_palette(3);
        assert_eq!(colours.len(), 3);
        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn parses_named_letter_and_hex_colours() {
        assert_eq!(parse_color("blue").unwrap(), RGBColor(0, 0, 255));
        assert_eq!(parse_color("Red").unwrap(), RGBColor(255, 0, 0));
        assert_eq!(parse_color("k").unwrap(), RGBColor(0, 0, 0));
        assert_eq!(parse_color("#ff8000").unwrap(), RGBColor(255, 128, 0));
        assert_eq!(parse_color("#0f0").unwrap(), RGBColor(0, 255, 0));
    }

    #[test]
    fn rejects_unknown_colours() {
        assert!(matches!(parse_color("blurple"), Err(Error::InvalidColor(_))));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gg0000").is_err());
    }
}
