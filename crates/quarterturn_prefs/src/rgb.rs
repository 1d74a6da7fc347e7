use std::fmt;
use std::str::FromStr;

use serde::de::Error;

/// Feedback highlight color, written in preferences as `"#rrggbb"` or
/// `"#rgb"`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// sRGB component values.
    pub rgb: [u8; 3],
}
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode(self.rgb))
    }
}
impl FromStr for Rgb {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        let mut rgb = [0_u8; 3];
        if digits.len() == 3 {
            // Shorthand: each digit is doubled, so `#f0a` is `#ff00aa`.
            let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
            hex::decode_to_slice(doubled, &mut rgb)?;
        } else {
            hex::decode_to_slice(digits, &mut rgb)?;
        }
        Ok(Rgb { rgb })
    }
}
impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}
impl Rgb {
    /// Returns the color as RGBA floats from 0.0 to 1.0, for a renderer to
    /// blend over a face.
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.rgb.map(|c| c as f32 / 255.0);
        [r, g, b, alpha.clamp(0.0, 1.0)]
    }
}
