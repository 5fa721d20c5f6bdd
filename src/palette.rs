use crate::data::Dimension;
use crate::domain::CategoryDomain;

/// Ordered palette; index `i` maps to `colors[i % len]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<&'static str>,
}

impl ColorPalette {
    /// The dashboard's 12-color palette.
    pub fn dashboard() -> Self {
        Self {
            colors: vec![
                "#FFA500", // orange
                "#4299E1", // blue
                "#48BB78", // green
                "#9F7AEA", // purple
                "#ED64A6", // pink
                "#F6AD55", // light orange
                "#4FD1C5", // teal
                "#FC8181", // red
                "#90CDF4", // light blue
                "#68D391", // light green
                "#B794F4", // light purple
                "#F687B3", // light pink
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::dashboard()
    }
}

/// Display label and color of one category value.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub label: String,
    pub color: &'static str,
}

/// Identity for the value at `index` of a full domain of `dim`.
///
/// Brands are shown as "Brand N" instead of their raw name; every other
/// dimension shows the value itself.
pub fn identity(palette: &ColorPalette, dim: Dimension, index: usize, value: &str) -> Identity {
    let label = match dim {
        Dimension::Brand => format!("Brand {}", index + 1),
        _ => value.to_string(),
    };
    Identity {
        label,
        color: palette.color(index),
    }
}

/// Identity of `value` looked up in `domain`. `None` if the value is unknown.
pub fn identity_in(palette: &ColorPalette, domain: &CategoryDomain, value: &str) -> Option<Identity> {
    let dim = domain.dimension?;
    let index = domain.index_of(value)?;
    Some(identity(palette, dim, index, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps_round_robin() {
        let palette = ColorPalette::dashboard();
        assert_eq!(palette.len(), 12);
        assert_eq!(palette.color(0), "#FFA500");
        assert_eq!(palette.color(12), "#FFA500");
        assert_eq!(palette.color(13), "#4299E1");
    }

    #[test]
    fn test_brand_gets_positional_label() {
        let palette = ColorPalette::dashboard();
        let id = identity(&palette, Dimension::Brand, 2, "Acme Cola");
        assert_eq!(id.label, "Brand 3");
        assert_eq!(id.color, "#48BB78");
    }

    #[test]
    fn test_year_keeps_raw_value() {
        let palette = ColorPalette::dashboard();
        let id = identity(&palette, Dimension::Year, 1, "2023");
        assert_eq!(id.label, "2023");
        assert_eq!(id.color, "#4299E1");
    }

    #[test]
    fn test_identity_in_domain() {
        let domain = CategoryDomain {
            dimension: Some(Dimension::Brand),
            values: vec!["X".into(), "Y".into()],
        };
        let palette = ColorPalette::default();
        assert_eq!(identity_in(&palette, &domain, "Y").unwrap().label, "Brand 2");
        assert!(identity_in(&palette, &domain, "Z").is_none());
    }
}
