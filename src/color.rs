use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Lighten, Srgb};

use crate::data::model::Record;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Hsl> {
    (0..n)
        .map(|i| Hsl::new((i as f32 / n as f32) * 360.0, 0.62, 0.48))
        .collect()
}

// ---------------------------------------------------------------------------
// Conference → bubble colours
// ---------------------------------------------------------------------------

/// Fill, outline and hover shades for one conference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub fill: Color32,
    pub stroke: Color32,
    pub hover: Color32,
}

impl Swatch {
    fn from_hsl(hsl: Hsl) -> Self {
        Swatch {
            fill: to_color32(hsl),
            stroke: to_color32(hsl.darken(0.25)),
            hover: to_color32(hsl.lighten(0.3)),
        }
    }
}

/// Colours bubbles by conference; unknown conferences get the default blue.
#[derive(Debug, Clone)]
pub struct ConferenceColors {
    mapping: BTreeMap<String, Swatch>,
    default_swatch: Swatch,
}

impl ConferenceColors {
    pub fn new<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut conferences: Vec<&str> = records
            .into_iter()
            .map(|r| r.conference.as_str())
            .collect();
        conferences.sort_unstable();
        conferences.dedup();

        let mapping = conferences
            .iter()
            .zip(generate_palette(conferences.len()))
            .map(|(conf, hsl)| (conf.to_string(), Swatch::from_hsl(hsl)))
            .collect();

        ConferenceColors {
            mapping,
            default_swatch: Swatch {
                fill: Color32::from_rgb(0x34, 0x98, 0xdb),
                stroke: Color32::from_rgb(0x29, 0x80, 0xb9),
                hover: Color32::from_rgb(0xe6, 0x7e, 0x22),
            },
        }
    }

    pub fn swatch_for(&self, conference: &str) -> Swatch {
        self.mapping
            .get(conference)
            .copied()
            .unwrap_or(self.default_swatch)
    }

    /// Legend entries (conference → fill colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(conf, swatch)| (conf.clone(), swatch.fill))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn one_swatch_per_conference() {
        let mut a = record("A", 2019, Some(1), 80.0);
        a.conference = "B10".into();
        let mut b = record("B", 2019, Some(2), 70.0);
        b.conference = "SEC".into();
        let mut c = record("C", 2019, Some(3), 60.0);
        c.conference = "B10".into();
        let colors = ConferenceColors::new(&[a, b, c]);

        let legend = colors.legend_entries();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].0, "B10");
        assert_ne!(colors.swatch_for("B10").fill, colors.swatch_for("SEC").fill);
        assert_eq!(colors.swatch_for("MAAC"), colors.default_swatch);
    }
}
