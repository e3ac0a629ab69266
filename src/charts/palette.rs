//! Category color palettes.

use serde::{Serialize, Serializer};
use std::fmt;

/// An opaque RGB color parsed from a hex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            6 => Some(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 17);
                Some(Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Perceived brightness in 0..=255, used to pick a readable text color.
    pub fn luminance(&self) -> f64 {
        0.299 * self.0 as f64 + 0.587 * self.1 as f64 + 0.114 * self.2 as f64
    }

    pub fn is_dark(&self) -> bool {
        self.luminance() < 140.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Colors for labels a palette does not name, cycled in order.
pub const FALLBACK_COLORS: [&str; 6] = [
    "#8C564B", // Brown
    "#9467BD", // Purple
    "#17BECF", // Cyan
    "#BCBD22", // Olive
    "#E377C2", // Pink
    "#7F7F7F", // Grey
];

/// A named mapping from land-use category to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

pub const FOREST: Palette = Palette {
    name: "forest",
    entries: &[
        ("Production grassland", "#1AA881"),         // Green
        ("Built-up area", "#2e2e2e"),                // Charcoal
        ("Wetland", "#1A80BA"),                      // Dark blue
        ("Cropland", "#F2E755"),                     // Yellow
        ("Grassland with woody biomass", "#DD7E33"), // Orange
    ],
};

pub const EARTH: Palette = Palette {
    name: "earth",
    entries: &[
        ("Production grassland", "#6B8E23"),
        ("Built-up area", "#5C4033"),
        ("Wetland", "#4682B4"),
        ("Cropland", "#DAA520"),
        ("Grassland with woody biomass", "#A0522D"),
    ],
};

pub const PASTEL: Palette = Palette {
    name: "pastel",
    entries: &[
        ("Production grassland", "#8DD3C7"),
        ("Built-up area", "#BEBADA"),
        ("Wetland", "#80B1D3"),
        ("Cropland", "#FFED6F"),
        ("Grassland with woody biomass", "#FDB462"),
    ],
};

pub const SLATE: Palette = Palette {
    name: "slate",
    entries: &[
        ("Production grassland", "#2F6B5E"),
        ("Built-up area", "#3B3B3B"),
        ("Wetland", "#4A6FA5"),
        ("Cropland", "#B8A44C"),
        ("Grassland with woody biomass", "#9C6644"),
    ],
};

impl Palette {
    /// Color named for `label`, if the palette has one.
    pub fn lookup(&self, label: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .and_then(|(_, hex)| Rgb::from_hex(hex))
    }

    /// Resolve a color for every label, in order.
    ///
    /// Labels missing from the palette take the next fallback color.
    pub fn colors_for(&self, labels: &[String]) -> Vec<Rgb> {
        let mut fallback_idx = 0;

        labels
            .iter()
            .map(|label| {
                self.lookup(label).unwrap_or_else(|| {
                    tracing::warn!(palette = self.name, label = %label, "no palette color for label, using fallback");
                    let hex = FALLBACK_COLORS[fallback_idx % FALLBACK_COLORS.len()];
                    fallback_idx += 1;
                    Rgb::from_hex(hex).unwrap_or(Rgb(127, 127, 127))
                })
            })
            .collect()
    }
}
