//! Colour themes for rendered diagrams.

use serde::{Deserialize, Serialize};

/// Host editor theme. Numeric values follow the host's theme-kind codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorThemeKind {
    Light = 1,
    #[default]
    Dark = 2,
    HighContrast = 3,
    HighContrastLight = 4,
}

impl ColorThemeKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" | "1" => Some(Self::Light),
            "dark" | "2" => Some(Self::Dark),
            "high-contrast" | "highcontrast" | "3" => Some(Self::HighContrast),
            "high-contrast-light" | "highcontrastlight" | "4" => Some(Self::HighContrastLight),
            _ => None,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark | Self::HighContrast)
    }
}

/// Colours used when drawing nodes, edges and the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub header: &'static str,
    pub enum_header: &'static str,
    pub row_even: &'static str,
    pub row_odd: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub edge: &'static str,
    pub minimap_node: &'static str,
    pub minimap_stroke: &'static str,
    pub minimap_mask: &'static str,
}

impl Palette {
    pub fn for_theme(kind: ColorThemeKind) -> Self {
        if kind.is_dark() {
            Self {
                header: "#3d5797",
                enum_header: "#5a9f78",
                row_even: "#282828",
                row_odd: "#232323",
                background: "#1c1c1c",
                text: "#f0f0f0",
                edge: "#9a9a9a",
                minimap_node: "#3d5797",
                minimap_stroke: "#282828",
                minimap_mask: "rgba(0, 0, 0, 0.2)",
            }
        } else {
            Self {
                header: "#8b9dc3",
                enum_header: "#6ec19d",
                row_even: "#d3d3d3",
                row_odd: "#e0e0e0",
                background: "#e0e0e0",
                text: "#1c1c1c",
                edge: "#555555",
                minimap_node: "#8b9dc3",
                minimap_stroke: "#e0e0e0",
                minimap_mask: "rgba(255, 255, 255, 0.5)",
            }
        }
    }

    pub fn row(&self, index: usize) -> &'static str {
        if index % 2 == 0 {
            self.row_even
        } else {
            self.row_odd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dark() {
        assert!(ColorThemeKind::Dark.is_dark());
        assert!(ColorThemeKind::HighContrast.is_dark());
        assert!(!ColorThemeKind::Light.is_dark());
        assert!(!ColorThemeKind::HighContrastLight.is_dark());
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(ColorThemeKind::Light as u8, 1);
        assert_eq!(ColorThemeKind::HighContrastLight as u8, 4);
        assert_eq!(ColorThemeKind::from_str("3"), Some(ColorThemeKind::HighContrast));
        assert_eq!(ColorThemeKind::from_str("sepia"), None);
    }

    #[test]
    fn test_palette_follows_darkness() {
        let dark = Palette::for_theme(ColorThemeKind::HighContrast);
        assert_eq!(dark.header, "#3d5797");
        assert_eq!(dark.background, "#1c1c1c");
        assert_eq!(dark.minimap_mask, "rgba(0, 0, 0, 0.2)");

        let light = Palette::for_theme(ColorThemeKind::HighContrastLight);
        assert_eq!(light.header, "#8b9dc3");
        assert_eq!(light.row(1), "#e0e0e0");
    }
}
