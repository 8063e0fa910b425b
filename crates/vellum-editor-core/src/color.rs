//! Dark-mode color registration and parsing.
//!
//! When the editor runs in dark mode, element colors are mapped from their
//! authored light values to computed dark equivalents, and back again when
//! content leaves the editor. The [`DarkColorHandler`] keeps the two-way
//! mapping so the original light value always survives a round trip.

use std::collections::HashMap;

use smol_str::{format_smolstr, SmolStr};

/// Which way a color transform maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTransformDirection {
    LightToDark,
    DarkToLight,
}

/// A parsed CSS color. Alpha is 0-255, like the channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ParsedColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS `rgba()` form.
    pub fn to_css(&self) -> SmolStr {
        if self.a == 255 {
            format_smolstr!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format_smolstr!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, `rgb()` and `rgba()` color values.
///
/// Returns `None` for anything else (keywords, gradients, css variables);
/// callers leave unparseable colors untouched.
pub fn parse_color_value(value: &str) -> Option<ParsedColor> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let (body, has_alpha) = if let Some(rest) = value.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = value.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let mut parts = body.split(',').map(str::trim);
    let r = parts.next()?.parse::<u8>().ok()?;
    let g = parts.next()?.parse::<u8>().ok()?;
    let b = parts.next()?.parse::<u8>().ok()?;
    let a = if has_alpha {
        let alpha = parts.next()?.parse::<f32>().ok()?;
        if !(0.0..=1.0).contains(&alpha) {
            return None;
        }
        (alpha * 255.0).round() as u8
    } else {
        255
    };
    if parts.next().is_some() {
        return None;
    }
    Some(ParsedColor { r, g, b, a })
}

fn parse_hex(hex: &str) -> Option<ParsedColor> {
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(ParsedColor::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(ParsedColor::new(r, g, b))
        }
        _ => None,
    }
}

/// Default light-to-dark mapping: invert lightness, keep hue.
///
/// Works on the simple observation that swapping a channel `c` for `255 - c`
/// inverts lightness while an additional blend toward the midpoint keeps
/// saturated colors recognizable.
pub fn default_dark_color(color: ParsedColor) -> ParsedColor {
    let invert = |c: u8| -> u8 {
        let inverted = 255 - c as i32;
        ((inverted * 3 + c as i32) / 4) as u8
    };
    ParsedColor {
        r: invert(color.r),
        g: invert(color.g),
        b: invert(color.b),
        a: color.a,
    }
}

/// Two-way registry between authored light colors and their dark equivalents.
pub trait DarkColorHandler {
    /// Map a color into the target mode, remembering the pairing.
    ///
    /// `to_dark == true` maps a light value to dark; `to_dark == false` maps
    /// a previously registered dark value back to light. Unknown or
    /// unparseable values are returned unchanged.
    fn register_color(&mut self, color: &str, to_dark: bool) -> SmolStr;

    /// Forget all registered pairings.
    fn reset(&mut self);
}

/// Default [`DarkColorHandler`] backed by a hash map and a mapping function.
pub struct CoreDarkColorHandler {
    light_to_dark: HashMap<SmolStr, SmolStr>,
    dark_to_light: HashMap<SmolStr, SmolStr>,
    map_color: fn(ParsedColor) -> ParsedColor,
}

impl Default for CoreDarkColorHandler {
    fn default() -> Self {
        Self::new(default_dark_color)
    }
}

impl CoreDarkColorHandler {
    pub fn new(map_color: fn(ParsedColor) -> ParsedColor) -> Self {
        Self {
            light_to_dark: HashMap::new(),
            dark_to_light: HashMap::new(),
            map_color,
        }
    }
}

impl DarkColorHandler for CoreDarkColorHandler {
    fn register_color(&mut self, color: &str, to_dark: bool) -> SmolStr {
        let key = SmolStr::new(color.trim());
        if to_dark {
            if let Some(dark) = self.light_to_dark.get(&key) {
                return dark.clone();
            }
            let Some(parsed) = parse_color_value(&key) else {
                return key;
            };
            let dark = (self.map_color)(parsed).to_css();
            self.light_to_dark.insert(key.clone(), dark.clone());
            self.dark_to_light.insert(dark.clone(), key);
            dark
        } else {
            self.dark_to_light.get(&key).cloned().unwrap_or(key)
        }
    }

    fn reset(&mut self) {
        self.light_to_dark.clear();
        self.dark_to_light.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color_value("#ff0000"), Some(ParsedColor::new(255, 0, 0)));
        assert_eq!(parse_color_value("#f00"), Some(ParsedColor::new(255, 0, 0)));
        assert_eq!(parse_color_value("#bad"), Some(ParsedColor::new(187, 170, 221)));
        assert_eq!(parse_color_value("#nothex"), None);
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(
            parse_color_value("rgb(12, 34, 56)"),
            Some(ParsedColor::new(12, 34, 56))
        );
        assert_eq!(
            parse_color_value("rgba(12, 34, 56, 0.5)"),
            Some(ParsedColor {
                r: 12,
                g: 34,
                b: 56,
                a: 128
            })
        );
        assert_eq!(parse_color_value("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color_value("var(--text)"), None);
        assert_eq!(parse_color_value("red"), None);
    }

    #[test]
    fn test_css_round_trip() {
        let color = parse_color_value("rgb(10, 20, 30)").unwrap();
        assert_eq!(parse_color_value(&color.to_css()), Some(color));
    }

    #[test]
    fn test_register_round_trip() {
        let mut handler = CoreDarkColorHandler::default();
        let dark = handler.register_color("#336699", true);
        assert_ne!(dark.as_str(), "#336699");

        // Mapping the dark value back returns the original light value.
        let light = handler.register_color(&dark, false);
        assert_eq!(light.as_str(), "#336699");
    }

    #[test]
    fn test_register_is_stable() {
        let mut handler = CoreDarkColorHandler::default();
        let first = handler.register_color("rgb(1, 2, 3)", true);
        let second = handler.register_color("rgb(1, 2, 3)", true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unparseable_color_passes_through() {
        let mut handler = CoreDarkColorHandler::default();
        assert_eq!(handler.register_color("var(--accent)", true).as_str(), "var(--accent)");
        assert_eq!(handler.register_color("salmon", false).as_str(), "salmon");
    }
}
