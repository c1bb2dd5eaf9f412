//! Balloon colors
//!
//! A [`ColorPair`] is the light accent and body color of one balloon; a
//! [`Palette`] is the ordered list the release cycles through.

use serde::{Deserialize, Serialize};
use crate::error::EffectError;

/// Accent/primary pairs used when the caller supplies no palette
pub const DEFAULT_PAIRS: [(&str, &str); 5] = [
    // yellow
    ("#ffec37ee", "#f8b13dff"),
    // red
    ("#f89640ee", "#c03940ff"),
    // blue
    ("#3bc0f0ee", "#0075bcff"),
    // green
    ("#b0cb47ee", "#3d954bff"),
    // purple
    ("#cf85b8ee", "#a3509dff"),
];

/// Highlight and body color of one balloon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(String, String)", into = "(String, String)")]
pub struct ColorPair {
    /// Light color used for the highlight
    pub accent: String,
    /// Body color
    pub primary: String,
}

impl ColorPair {
    /// Build a pair, validating both colors as hex
    pub fn new(accent: &str, primary: &str) -> Result<Self, EffectError> {
        Ok(Self {
            accent: validate_hex(accent)?,
            primary: validate_hex(primary)?,
        })
    }
}

impl TryFrom<(String, String)> for ColorPair {
    type Error = EffectError;

    fn try_from((accent, primary): (String, String)) -> Result<Self, Self::Error> {
        Self::new(&accent, &primary)
    }
}

impl From<ColorPair> for (String, String) {
    fn from(pair: ColorPair) -> Self {
        (pair.accent, pair.primary)
    }
}

fn validate_hex(color: &str) -> Result<String, EffectError> {
    let color = color.trim();
    let valid = match color.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 4 | 6 | 8)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    };
    if valid {
        Ok(color.to_string())
    } else {
        Err(EffectError::InvalidColor(color.to_string()))
    }
}

/// Non-empty ordered list of color pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorPair>", into = "Vec<ColorPair>")]
pub struct Palette {
    pairs: Vec<ColorPair>,
}

impl Palette {
    pub fn new(pairs: Vec<ColorPair>) -> Result<Self, EffectError> {
        if pairs.is_empty() {
            return Err(EffectError::EmptyPalette);
        }
        Ok(Self { pairs })
    }

    /// Parse a YAML (or JSON) list of `[accent, primary]` pairs
    pub fn from_yaml(yaml: &str) -> Result<Self, EffectError> {
        serde_yaml::from_str(yaml).map_err(|e| EffectError::Config(format!("palette: {}", e)))
    }

    /// Pair for the balloon at `index`, cycling through the palette
    pub fn pair_for(&self, index: usize) -> &ColorPair {
        &self.pairs[index % self.pairs.len()]
    }

    pub fn pairs(&self) -> &[ColorPair] {
        &self.pairs
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS
                .iter()
                .map(|(accent, primary)| ColorPair {
                    accent: accent.to_string(),
                    primary: primary.to_string(),
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<ColorPair>> for Palette {
    type Error = EffectError;

    fn try_from(pairs: Vec<ColorPair>) -> Result<Self, Self::Error> {
        Self::new(pairs)
    }
}

impl From<Palette> for Vec<ColorPair> {
    fn from(palette: Palette) -> Self {
        palette.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.pairs().len(), 5);
        assert_eq!(palette.pair_for(0).accent, "#ffec37ee");
        assert_eq!(palette.pair_for(4).primary, "#a3509dff");
        for pair in palette.pairs() {
            assert!(ColorPair::new(&pair.accent, &pair.primary).is_ok());
        }
    }

    #[test]
    fn test_cyclic_assignment() {
        let palette = Palette::new(vec![
            ColorPair::new("#f89640ee", "#eb002bff").unwrap(),
            ColorPair::new("#384f5cee", "#1b1b26ff").unwrap(),
            ColorPair::new("#668393EE", "#384f5cee").unwrap(),
        ])
        .unwrap();

        for i in 0..20 {
            assert_eq!(palette.pair_for(i), &palette.pairs()[i % 3]);
        }
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(Vec::new()), Err(EffectError::EmptyPalette));
        assert!(Palette::from_yaml("[]").is_err());
    }

    #[test]
    fn test_color_validation() {
        assert!(ColorPair::new("#fff", "#000000").is_ok());
        assert!(ColorPair::new("#ffff", "#00000000").is_ok());
        assert_eq!(
            ColorPair::new("red", "#000"),
            Err(EffectError::InvalidColor("red".to_string()))
        );
        assert!(ColorPair::new("#12345", "#000").is_err());
        assert!(ColorPair::new("#ggg", "#000").is_err());
    }

    #[test]
    fn test_palette_from_yaml() {
        let yaml = r##"
- ["#f89640ee", "#eb002bff"]
- ["#384f5cee", "#1b1b26ff"]
"##;
        let palette = Palette::from_yaml(yaml).unwrap();
        assert_eq!(palette.pairs().len(), 2);
        assert_eq!(palette.pair_for(3).accent, "#384f5cee");
    }

    #[test]
    fn test_palette_from_json() {
        let palette = Palette::from_yaml(r##"[["#fff", "#000"]]"##).unwrap();
        assert_eq!(palette.pair_for(7).primary, "#000");
    }

    #[test]
    fn test_palette_yaml_rejects_bad_color() {
        let err = Palette::from_yaml(r##"[["blue", "#000"]]"##).unwrap_err();
        assert!(matches!(err, EffectError::Config(_)));
    }
}
