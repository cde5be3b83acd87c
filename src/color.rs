use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Black or white, whichever reads better on `background`.
pub fn label_color(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's distinct labels.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: value → Color32
// ---------------------------------------------------------------------------

/// Linear-light interpolation through a list of colour stops.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    fn from_hex(stops: &[u32]) -> Self {
        let stops: Vec<LinSrgb> = stops
            .iter()
            .map(|hex| {
                let [_, r, g, b] = hex.to_be_bytes();
                Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_linear()
            })
            .collect();
        ColorScale { stops }
    }

    /// Red → white → blue diverging scale.
    pub fn red_blue() -> Self {
        Self::from_hex(&[0xb2182b, 0xf7f7f7, 0x2166ac])
    }

    /// Light → dark blue sequential scale.
    pub fn blues() -> Self {
        Self::from_hex(&[0xdeebf7, 0x6baed6, 0x08306b])
    }

    /// Colour at `t` in `0.0..=1.0` (clamped).
    pub fn color_at(&self, t: f64) -> Color32 {
        let Some(first) = self.stops.first() else {
            return Color32::GRAY;
        };
        if self.stops.len() == 1 {
            return to_color32(Srgb::from_linear(*first));
        }
        let t = t.clamp(0.0, 1.0) as f32;
        let segments = (self.stops.len() - 1) as f32;
        let idx = ((t * segments).floor() as usize).min(self.stops.len() - 2);
        let local = t * segments - idx as f32;
        let mixed = self.stops[idx].mix(self.stops[idx + 1], local);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour for `value` relative to `max`.
    pub fn color_for(&self, value: f64, max: f64) -> Color32 {
        if max <= 0.0 {
            return self.color_at(0.0);
        }
        self.color_at(value / max)
    }
}
