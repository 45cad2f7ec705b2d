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
            to_color32(hsl.into_color())
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a grouping column (regions, categories, …) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the sorted unique labels.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a String>) -> Self {
        let labels: Vec<&String> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
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
// Diverging scale for signed metrics (profit, margin)
// ---------------------------------------------------------------------------

/// Red → yellow → green for `value` within `[min, max]`; zero sits at yellow
/// when the range straddles it.
pub fn diverging(value: f64, min: f64, max: f64) -> Color32 {
    let red: LinSrgb = Srgb::<f32>::new(0.84, 0.19, 0.15).into_linear();
    let yellow: LinSrgb = Srgb::<f32>::new(1.0, 0.87, 0.35).into_linear();
    let green: LinSrgb = Srgb::<f32>::new(0.10, 0.60, 0.31).into_linear();

    let t: f64 = if min < 0.0 && max > 0.0 {
        if value < 0.0 {
            0.5 - 0.5 * (value / min).clamp(0.0, 1.0)
        } else {
            0.5 + 0.5 * (value / max).clamp(0.0, 1.0)
        }
    } else if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let t = t as f32;

    let mixed = if t < 0.5 {
        red.mix(yellow, t * 2.0)
    } else {
        yellow.mix(green, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Light → dark blue for counts and revenue.
pub fn sequential(value: f64, max: f64) -> Color32 {
    let light: LinSrgb = Srgb::<f32>::new(0.78, 0.86, 0.94).into_linear();
    let dark: LinSrgb = Srgb::<f32>::new(0.03, 0.32, 0.61).into_linear();
    let t: f64 = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 1.0 };
    let t = t as f32;
    to_color32(Srgb::from_linear(light.mix(dark, t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(4).len(), 4);
    }

    #[test]
    fn color_map_falls_back_to_gray() {
        let labels = vec!["East".to_string(), "West".to_string()];
        let map = ColorMap::new(&labels);
        assert_ne!(map.color_for("East"), map.color_for("West"));
        assert_eq!(map.color_for("North"), Color32::GRAY);
    }

    #[test]
    fn diverging_scale_ends() {
        let low = diverging(-10.0, -10.0, 10.0);
        let high = diverging(10.0, -10.0, 10.0);
        assert!(low.r() > low.g());
        assert!(high.g() > high.r());
    }
}
