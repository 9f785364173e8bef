use serde::{Deserialize, Serialize};

use crate::ir::Quality;

const QUALITY_COLORS: [&str; 12] = [
    "#d68910", // unsupported
    "#cb4335", // unreliable
    "#f8c471", // uncertain
    "#fad7a0", // proposed
    "#abebc6", // reported
    "#82e0aa", // supported
    "#58d68d", // probable
    "#2ecc71", // certain
    "#f5b041", // questionable
    "#28b463", // proven
    "#f39c12", // estimated
    "#b03a2e", // impossible
];

const MODERN_QUALITY_COLORS: [&str; 12] = [
    "#C98A2B", "#C0504D", "#F2C57C", "#F6DDB5", "#B7E4C7", "#95D5B2", "#74C69D", "#52B788",
    "#E9A23B", "#40916C", "#E08E0B", "#9B2C2C",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub caption_note_color: String,
    pub background: String,
    pub wedge_stroke: String,
    pub wedge_stroke_width: f32,
    pub quality_colors: Vec<String>,
    pub collapse_color: String,
    pub missing_color: String,
}

impl Theme {
    pub fn gigatrees() -> Self {
        Self {
            font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#333333".to_string(),
            caption_note_color: "#777777".to_string(),
            background: "#FFFFFF".to_string(),
            wedge_stroke: "#fff".to_string(),
            wedge_stroke_width: 1.0,
            quality_colors: QUALITY_COLORS.iter().map(|c| c.to_string()).collect(),
            collapse_color: "#fff".to_string(),
            missing_color: "#eee".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            caption_note_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
            wedge_stroke: "#FFFFFF".to_string(),
            wedge_stroke_width: 1.2,
            quality_colors: MODERN_QUALITY_COLORS.iter().map(|c| c.to_string()).collect(),
            collapse_color: "#FFFFFF".to_string(),
            missing_color: "#EEF2F8".to_string(),
        }
    }

    /// Fill color for a quality assessment. Rated codes without a palette
    /// entry fall back to the missing color.
    pub fn quality_color(&self, quality: Quality) -> &str {
        match quality {
            Quality::Rated(code) => self
                .quality_colors
                .get(code as usize)
                .map(String::as_str)
                .unwrap_or(&self.missing_color),
            Quality::Collapse => &self.collapse_color,
            Quality::Missing => &self.missing_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gigatrees()
    }
}
