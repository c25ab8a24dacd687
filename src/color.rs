use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::CellValue;

/// Histogram bar colour.
pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(0x63, 0x6E, 0xFA);
/// Box plot colour.
pub const BOX_COLOR: Color32 = Color32::from_rgb(0xEF, 0x55, 0x3B);

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
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Sequential scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Plasma-like colour stops, dark to bright.
const PLASMA_STOPS: [(u8, u8, u8); 5] = [
    (0x0d, 0x08, 0x87),
    (0x7e, 0x03, 0xa8),
    (0xcc, 0x47, 0x78),
    (0xf8, 0x95, 0x40),
    (0xf0, 0xf9, 0x21),
];

/// Map a correlation in `[-1, 1]` onto the sequential scale.
pub fn correlation_color(r: f64) -> Color32 {
    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let segments = (PLASMA_STOPS.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(PLASMA_STOPS.len() - 2);
    let frac = pos - idx as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = stop(PLASMA_STOPS[idx]).mix(stop(PLASMA_STOPS[idx + 1]), frac);
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its distinct values.
    pub fn new(values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<CellValue, Color32> = values
            .iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(6);
        assert_eq!(colours.len(), 6);
        let unique: BTreeSet<_> = colours.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn correlation_scale_hits_the_end_stops() {
        let close = |a: Color32, b: Color32| {
            a.to_array()
                .iter()
                .zip(b.to_array())
                .all(|(x, y)| (*x as i16 - y as i16).abs() <= 1)
        };
        assert!(close(correlation_color(-1.0), Color32::from_rgb(0x0d, 0x08, 0x87)));
        assert!(close(correlation_color(1.0), Color32::from_rgb(0xf0, 0xf9, 0x21)));
        // out of range values clamp
        assert_eq!(correlation_color(7.0), correlation_color(1.0));
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(text_color_on(correlation_color(-1.0)), Color32::WHITE);
        assert_eq!(text_color_on(correlation_color(1.0)), Color32::BLACK);
    }

    #[test]
    fn unknown_values_get_the_default_colour() {
        let values: BTreeSet<CellValue> = [CellValue::Text("a".into()), CellValue::Text("b".into())]
            .into_iter()
            .collect();
        let map = ColorMap::new(&values);
        assert_ne!(
            map.color_for(&CellValue::Text("a".into())),
            map.color_for(&CellValue::Text("b".into()))
        );
        assert_eq!(map.color_for(&CellValue::Text("zzz".into())), Color32::GRAY);
    }
}
