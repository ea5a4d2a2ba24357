// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! RGBA colors and CSS-style color parsing
//!
//! Channels are stored as `u8` (red, green, blue) plus an `f64` alpha in
//! `[0, 1]`. Every constructor rounds and clamps, so a `Color` is always
//! valid. Parsing accepts the same strings a canvas `fillStyle` would:
//!
//! - hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (leading `#` optional)
//! - `rgb(r, g, b)` / `rgba(r, g, b, a)`
//! - `hsl(h, s%, l%)` / `hsla(h, s%, l%, a)`
//! - the 148 CSS named colors and `transparent`
//!
//! Dynamic keywords (`currentcolor`, `inherit`, `initial`, `unset`) have
//! no meaning outside a document and are rejected.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red, 0..=255
    pub r: u8,
    /// Green, 0..=255
    pub g: u8,
    /// Blue, 0..=255
    pub b: u8,
    /// Alpha, 0..=1
    pub a: f64,
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };
    /// Opaque white
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
    /// Opaque red
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 1.0 };
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    /// Create a color, rounding and clamping channels to `0..=255` and alpha to `0..=1`
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_unit(a),
        }
    }

    /// Opaque color from channel values
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Color from channel values and alpha
    pub fn from_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::new(r, g, b, a)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`; the `#` is optional
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if ![3, 4, 6, 8].contains(&digits.len()) {
            return Err(Error::invalid_color_with(
                hex,
                "expected 3, 4, 6 or 8 hex digits",
            ));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_color_with(hex, "non-hex digit"));
        }

        let expanded: String = if digits.len() <= 4 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };

        let byte = |i: usize| -> Result<u8> {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| Error::invalid_color_with(hex, "non-hex digit"))
        };

        let a = if expanded.len() == 8 {
            byte(6)? as f64 / 255.0
        } else {
            1.0
        };
        Ok(Self::new(byte(0)? as f64, byte(2)? as f64, byte(4)? as f64, a))
    }

    /// Color from hue (degrees), saturation and lightness
    ///
    /// `s` and `l` accept fractions (`0..=1`) or percentages (`0..=100`).
    /// Hue wraps modulo 360.
    pub fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = percent_or_fraction(s);
        let l = percent_or_fraction(l);

        if s == 0.0 {
            let v = (l * 255.0).round();
            return Self::new(v, v, v, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let r = (hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0).round();
        let g = (hue_to_rgb(p, q, h) * 255.0).round();
        let b = (hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0).round();
        Self::new(r, g, b, a)
    }

    /// Color from hue (degrees), saturation and value
    ///
    /// Same range conventions as [`Color::from_hsl`].
    pub fn from_hsv(h: f64, s: f64, v: f64, a: f64) -> Self {
        let h = h.rem_euclid(360.0);
        let s = percent_or_fraction(s);
        let v = percent_or_fraction(v);

        if s == 0.0 {
            let val = (v * 255.0).round();
            return Self::new(val, val, val, a);
        }

        let hh = h / 60.0;
        let sector = hh.floor();
        let f = hh - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::new(
            (r * 255.0).round(),
            (g * 255.0).round(),
            (b * 255.0).round(),
            a,
        )
    }

    /// Parse any supported CSS color string
    pub fn from_string(s: &str) -> Result<Self> {
        let text = s.trim();
        let lower = text.to_ascii_lowercase();

        if matches!(
            lower.as_str(),
            "currentcolor" | "inherit" | "initial" | "unset"
        ) {
            return Err(Error::invalid_color_with(
                s,
                "dynamic color keywords not supported",
            ));
        }

        let looks_hex = (3..=8).contains(&text.len()) && text.chars().all(|c| c.is_ascii_hexdigit());
        if text.starts_with('#') || looks_hex {
            if let Ok(color) = Self::from_hex(text) {
                return Ok(color);
            }
        }

        if let Some(args) = function_args(text, &["rgba", "rgb"]) {
            return parse_rgb_args(&args).ok_or_else(|| Error::invalid_color(s));
        }

        if let Some(args) = function_args(text, &["hsla", "hsl"]) {
            return parse_hsl_args(&args).ok_or_else(|| Error::invalid_color(s));
        }

        if let Some(rgb) = named_color(&lower) {
            return Ok(Self::new(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64, 1.0));
        }

        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }

        Err(Error::invalid_color(s))
    }

    /// CSS representation: `rgb(r, g, b)` when opaque, otherwise `rgba(r, g, b, a)`
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    /// Lowercase hex string, optionally with a trailing alpha byte
    pub fn to_hex(&self, include_alpha: bool) -> String {
        if include_alpha {
            let alpha = (self.a * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, alpha)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    /// Same channels, different alpha
    pub fn with_alpha(&self, a: f64) -> Self {
        Color {
            a: clamp_unit(a),
            ..*self
        }
    }

    /// Channel-wise linear interpolation, alpha included
    pub fn lerp(&self, other: &Color, t: f64) -> Self {
        let mix = |from: f64, to: f64| from + (to - from) * t;
        Self::new(
            mix(self.r as f64, other.r as f64),
            mix(self.g as f64, other.g as f64),
            mix(self.b as f64, other.b as f64),
            mix(self.a, other.a),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_string(s)
    }
}

fn clamp_channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn percent_or_fraction(v: f64) -> f64 {
    if v > 1.0 {
        v / 100.0
    } else {
        v
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Split `name(a, b, c)` into its trimmed arguments for the first matching name
fn function_args(text: &str, names: &[&str]) -> Option<Vec<String>> {
    let name = names.iter().find(|n| text.starts_with(**n))?;
    let inner = text[name.len()..].strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(|part| part.trim().to_string()).collect())
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn parse_alpha(args: &[String]) -> Option<f64> {
    match args.get(3) {
        Some(a) if is_decimal(a) => a.parse().ok(),
        Some(_) => None,
        None => Some(1.0),
    }
}

fn parse_rgb_args(args: &[String]) -> Option<Color> {
    if !(3..=4).contains(&args.len()) || !args[..3].iter().all(|a| is_integer(a)) {
        return None;
    }
    let channel = |i: usize| args[i].parse::<f64>().ok();
    Some(Color::new(channel(0)?, channel(1)?, channel(2)?, parse_alpha(args)?))
}

fn parse_hsl_args(args: &[String]) -> Option<Color> {
    if !(3..=4).contains(&args.len()) || !is_integer(&args[0]) {
        return None;
    }
    let percent = |s: &str| -> Option<f64> {
        let digits = s.strip_suffix('%').unwrap_or(s);
        if is_decimal(digits) {
            digits.parse().ok()
        } else {
            None
        }
    };
    let h = args[0].parse::<f64>().ok()?;
    Some(Color::from_hsl(
        h,
        percent(&args[1])?,
        percent(&args[2])?,
        parse_alpha(args)?,
    ))
}

fn named_color(name: &str) -> Option<[u8; 3]> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, rgb)| *rgb)
}

/// CSS named colors
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#F00").unwrap(), Color::RED);
        assert_eq!(Color::from_hex("00ff00").unwrap(), Color::new(0.0, 255.0, 0.0, 1.0));
        let c = Color::from_hex("#0000ff80").unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 0, 255));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-12);
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#ggg").is_err());
    }

    #[test]
    fn test_from_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5, 1.0), Color::RED);
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5, 1.0), Color::new(0.0, 255.0, 0.0, 1.0));
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5, 1.0), Color::new(0.0, 0.0, 255.0, 1.0));
        assert_eq!(Color::from_hsl(480.0, 100.0, 50.0, 1.0), Color::new(0.0, 255.0, 0.0, 1.0));
        assert_eq!(Color::from_hsl(0.0, 0.0, 1.0, 1.0), Color::WHITE);
    }

    #[test]
    fn test_from_hsv() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0, 1.0), Color::RED);
        assert_eq!(Color::from_hsv(240.0, 100.0, 100.0, 1.0), Color::new(0.0, 0.0, 255.0, 1.0));
        assert_eq!(Color::from_hsv(0.0, 0.0, 0.0, 1.0), Color::BLACK);
    }

    #[test]
    fn test_hex_round_trip_opaque() {
        for hex in ["#000000", "#ff8000", "#123456", "#fedcba"] {
            assert_eq!(Color::from_hex(hex).unwrap().to_hex(false), hex);
        }
    }

    #[test]
    fn test_from_string_forms() {
        assert_eq!(Color::from_string("rgb(10, 20, 30)").unwrap(), Color::from_rgb(10.0, 20.0, 30.0));
        let c = Color::from_string("rgba(10,20,30,0.5)").unwrap();
        assert_eq!(c.a, 0.5);
        assert_eq!(Color::from_string("hsl(120, 100%, 50%)").unwrap(), Color::from_rgb(0.0, 255.0, 0.0));
        assert_eq!(Color::from_string("  RebeccaPurple ").unwrap(), Color::from_rgb(102.0, 51.0, 153.0));
        assert_eq!(Color::from_string("transparent").unwrap(), Color::TRANSPARENT);
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(Color::from_string("abc").unwrap(), Color::from_hex("#aabbcc").unwrap());
    }

    #[test]
    fn test_from_string_rejects() {
        for bad in ["inherit", "currentColor", "rgb(1, 2)", "hsl(a, 1, 1)", "not-a-color", ""] {
            let err = Color::from_string(bad).unwrap_err();
            assert!(err.is_input());
            assert!(err.to_string().contains(bad), "{err}");
        }
    }

    #[test]
    fn test_clamping_and_css() {
        let c = Color::new(300.0, -5.0, 127.6, 2.0);
        assert_eq!((c.r, c.g, c.b, c.a), (255, 0, 128, 1.0));
        assert_eq!(c.to_css(), "rgb(255, 0, 128)");
        assert_eq!(c.with_alpha(0.25).to_css(), "rgba(255, 0, 128, 0.25)");
    }

    #[test]
    fn test_with_alpha_keeps_channels() {
        let base = Color::from_rgb(1.0, 2.0, 3.0);
        let faded = base.with_alpha(0.5);
        assert_eq!((faded.r, faded.g, faded.b), (1, 2, 3));
        assert_eq!(base.a, 1.0);
        assert_eq!(faded.to_hex(true), "#01020380");
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Color::new(0.0, 100.0, 200.0, 1.0);
        let b = Color::new(100.0, 100.0, 0.0, 0.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!((mid.r, mid.g, mid.b), (50, 100, 100));
        assert_eq!(mid.a, 0.5);
    }

    #[test]
    fn test_named_table_complete() {
        assert_eq!(NAMED_COLORS.len(), 148);
    }
}
