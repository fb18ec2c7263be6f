use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Dataset, Dimension};

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: column value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of one column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the column's values, in the given order.
    pub fn new(values: &[String]) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// One colour map per groupable column, so a value keeps its colour across
/// charts and selections.
#[derive(Debug, Clone, Default)]
pub struct Palettes {
    maps: BTreeMap<Dimension, ColorMap>,
}

impl Palettes {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let maps = Dimension::ALL
            .iter()
            .map(|&d| (d, ColorMap::new(&dataset.distinct(d))))
            .collect();
        Palettes { maps }
    }

    pub fn color_for(&self, dimension: Dimension, value: &str) -> Color32 {
        self.maps
            .get(&dimension)
            .map(|m| m.color_for(value))
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn colour_map_follows_value_order() {
        let values = vec!["Winter".to_string(), "Summer".to_string()];
        let map = ColorMap::new(&values);
        let palette = generate_palette(2);
        assert_eq!(map.color_for("Winter"), palette[0]);
        assert_eq!(map.color_for("Summer"), palette[1]);
        assert_eq!(map.color_for("Monsoon"), Color32::GRAY);
    }

    #[test]
    fn unknown_values_get_the_default_colour() {
        let ds = Dataset::from_records(vec![
            record("Clothing", "18-25", "Winter", 1.0),
            record("Footwear", "18-25", "Winter", 1.0),
        ]);
        let palettes = Palettes::for_dataset(&ds);
        let clothing = palettes.color_for(Dimension::Category, "Clothing");
        assert_ne!(clothing, Color32::GRAY);
        assert_ne!(clothing, palettes.color_for(Dimension::Category, "Footwear"));
        assert_eq!(palettes.color_for(Dimension::Category, "Toys"), Color32::GRAY);
    }
}
