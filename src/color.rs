use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ALL_REGION;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Number of distinct region colours before the palette wraps around.
pub const PALETTE_SIZE: usize = 9;

/// Region markers for text-only contexts, same length as the colour palette.
pub const EMOJI_PALETTE: [&str; PALETTE_SIZE] =
    ["🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫", "🔶", "🔷"];

const AGGREGATE_EMOJI: &str = "⬜";
const AGGREGATE_COLOR: Color32 = Color32::from_gray(160);

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Region decorations
// ---------------------------------------------------------------------------

/// How a region is marked in the table header, legend and map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub color: Color32,
    pub emoji: &'static str,
}

/// Maps regions to decorations by rank in the sorted region list.
#[derive(Debug, Clone)]
pub struct RegionDecorations {
    mapping: BTreeMap<String, Decoration>,
    aggregate: Decoration,
}

impl RegionDecorations {
    /// `regions` must already be in canonical order (see
    /// [`crate::data::filter::regions`]). Ranks beyond the palette wrap.
    pub fn new(regions: &[String]) -> Self {
        let palette = generate_palette(PALETTE_SIZE);
        let mapping = regions
            .iter()
            .enumerate()
            .map(|(rank, region)| {
                let slot = rank % PALETTE_SIZE;
                (
                    region.clone(),
                    Decoration {
                        color: palette[slot],
                        emoji: EMOJI_PALETTE[slot],
                    },
                )
            })
            .collect();

        RegionDecorations {
            mapping,
            aggregate: Decoration {
                color: AGGREGATE_COLOR,
                emoji: AGGREGATE_EMOJI,
            },
        }
    }

    /// Decoration for a region; the aggregate sentinel and unknown regions
    /// share the neutral one.
    pub fn for_region(&self, region: &str) -> Decoration {
        if region == ALL_REGION {
            return self.aggregate;
        }
        self.mapping.get(region).copied().unwrap_or(self.aggregate)
    }

    /// Legend entries (region → decoration) in canonical order.
    pub fn legend_entries(&self) -> Vec<(String, Decoration)> {
        self.mapping
            .iter()
            .map(|(region, d)| (region.clone(), *d))
            .collect()
    }
}
