use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepthBreakpoint {
    pub below_width: f32,
    pub depth: u32,
}

/// Responsive depth limits: the chart never draws more than `max_depth`
/// generations, and fewer as the wrapper narrows past each breakpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthConfig {
    pub max_depth: u32,
    pub breakpoints: Vec<DepthBreakpoint>,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            max_depth: 9,
            breakpoints: vec![
                DepthBreakpoint {
                    below_width: 992.0,
                    depth: 8,
                },
                DepthBreakpoint {
                    below_width: 768.0,
                    depth: 7,
                },
                DepthBreakpoint {
                    below_width: 520.0,
                    depth: 6,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub depth: DepthConfig,
    /// Wedges at or below this angular width (radians) are not drawn.
    pub visibility_epsilon: f32,
    /// Fan diameter may not exceed this share of the wrapper width.
    pub max_height_ratio: f32,
    pub viewport_pad: f32,
    pub wrapper_pad: f32,
    pub breadcrumb_pad: f32,
    pub breadcrumb_row_height: f32,
    pub description_offset_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            depth: DepthConfig::default(),
            visibility_epsilon: 0.005,
            max_height_ratio: 0.99,
            viewport_pad: 100.0,
            wrapper_pad: 90.0,
            breadcrumb_pad: 30.0,
            breadcrumb_row_height: 42.0,
            description_offset_ratio: 2.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub dim_opacity: f32,
    pub exit_debounce_ms: u64,
    pub fade_ms: u64,
    pub bootstrap_retry_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            dim_opacity: 0.3,
            exit_debounce_ms: 10,
            fade_ms: 1000,
            bootstrap_retry_ms: 50,
        }
    }
}

/// Host viewport: `width` is the chart wrapper width, `height` the window
/// inner height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub interaction: InteractionConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::gigatrees();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            interaction: InteractionConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    caption_note_color: Option<String>,
    background: Option<String>,
    wedge_stroke: Option<String>,
    wedge_stroke_width: Option<NumberOrString>,
    quality_colors: Option<Vec<String>>,
    collapse_color: Option<String>,
    missing_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FanChartConfigFile {
    max_depth: Option<u32>,
    breakpoints: Option<Vec<DepthBreakpoint>>,
    visibility_epsilon: Option<f32>,
    max_height_ratio: Option<f32>,
    viewport_pad: Option<f32>,
    wrapper_pad: Option<f32>,
    breadcrumb_pad: Option<f32>,
    breadcrumb_row_height: Option<f32>,
    description_offset_ratio: Option<f32>,
    dim_opacity: Option<f32>,
    exit_debounce_ms: Option<u64>,
    fade_ms: Option<u64>,
    bootstrap_retry_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    #[serde(rename = "fanChart")]
    fanchart: Option<FanChartConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Applies a JSON config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "default" || theme_name == "gigatrees" {
            config.theme = Theme::gigatrees();
        } else {
            log::warn!("unknown theme {theme_name:?}, keeping the default");
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.caption_note_color {
            config.theme.caption_note_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.wedge_stroke {
            config.theme.wedge_stroke = v;
        }
        if let Some(v) = vars.wedge_stroke_width.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.wedge_stroke_width = v;
        }
        if let Some(colors) = vars.quality_colors {
            for (idx, color) in colors.into_iter().enumerate() {
                if idx < config.theme.quality_colors.len() {
                    config.theme.quality_colors[idx] = color;
                } else {
                    config.theme.quality_colors.push(color);
                }
            }
        }
        if let Some(v) = vars.collapse_color {
            config.theme.collapse_color = v;
        }
        if let Some(v) = vars.missing_color {
            config.theme.missing_color = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(fan) = parsed.fanchart {
        if let Some(v) = fan.max_depth {
            config.layout.depth.max_depth = v;
        }
        if let Some(v) = fan.breakpoints {
            config.layout.depth.breakpoints = v;
        }
        if let Some(v) = fan.visibility_epsilon {
            config.layout.visibility_epsilon = v;
        }
        if let Some(v) = fan.max_height_ratio {
            config.layout.max_height_ratio = v;
        }
        if let Some(v) = fan.viewport_pad {
            config.layout.viewport_pad = v;
        }
        if let Some(v) = fan.wrapper_pad {
            config.layout.wrapper_pad = v;
        }
        if let Some(v) = fan.breadcrumb_pad {
            config.layout.breadcrumb_pad = v;
        }
        if let Some(v) = fan.breadcrumb_row_height {
            config.layout.breadcrumb_row_height = v;
        }
        if let Some(v) = fan.description_offset_ratio {
            config.layout.description_offset_ratio = v;
        }
        if let Some(v) = fan.dim_opacity {
            config.interaction.dim_opacity = v;
        }
        if let Some(v) = fan.exit_debounce_ms {
            config.interaction.exit_debounce_ms = v;
        }
        if let Some(v) = fan.fade_ms {
            config.interaction.fade_ms = v;
        }
        if let Some(v) = fan.bootstrap_retry_ms {
            config.interaction.bootstrap_retry_ms = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout.depth.max_depth, 9);
        assert_eq!(config.layout.depth.breakpoints.len(), 3);
        assert_eq!(config.interaction.fade_ms, 1000);
        assert_eq!(config.theme.missing_color, "#eee");
    }

    #[test]
    fn overrides_theme_and_fan_settings() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": {
                    "fontSize": "15px",
                    "qualityColors": ["#000000"],
                    "background": "#101010"
                },
                "fanChart": {
                    "maxDepth": 5,
                    "breakpoints": [{"belowWidth": 600, "depth": 4}],
                    "dimOpacity": 0.5
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, 15.0);
        assert_eq!(config.theme.quality_colors[0], "#000000");
        assert_eq!(config.theme.quality_colors.len(), 12);
        assert_eq!(config.render.background, "#101010");
        assert_eq!(config.layout.depth.max_depth, 5);
        assert_eq!(
            config.layout.depth.breakpoints,
            vec![DepthBreakpoint {
                below_width: 600.0,
                depth: 4
            }]
        );
        assert_eq!(config.interaction.dim_opacity, 0.5);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("{").is_err());
    }
}
