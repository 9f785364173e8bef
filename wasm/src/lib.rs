use fanchart_rs::{
    ChartSession, HighlightUpdate, HostInputs, RenderOptions, Viewport, draw_with_options,
    parse_input, render_standalone_svg,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FanChartOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    highlight: Option<u64>,
}

fn parse_options(options_json: Option<&str>) -> Result<FanChartOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(raw).map_err(|error| error.to_string()),
        None => Ok(FanChartOptions::default()),
    }
}

fn build_render_options(options: FanChartOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::gigatrees()
    };

    if let Some(font_family) = options.font_family {
        render_options.config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.config.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        render_options.config.render.width = width;
    }
    if let Some(height) = options.height {
        render_options.config.render.height = height;
    }
    render_options.highlight = options.highlight;
    render_options
}

#[wasm_bindgen]
pub fn render_fan_chart_svg(
    host_script: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = parse_options(options_json.as_deref()).map_err(|error| JsValue::from_str(&error))?;
    fanchart_rs::render_with_options(host_script, build_render_options(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResizeOutcome<'a> {
    redrawn: bool,
    svg: Option<&'a str>,
}

/// A mounted chart. Every event method returns a JSON change description,
/// or `null` when the event changed nothing.
#[wasm_bindgen]
pub struct FanChart {
    inputs: HostInputs,
    options: RenderOptions,
    session: ChartSession,
    svg: String,
}

impl FanChart {
    fn create(host_script: &str, options_json: Option<&str>) -> Result<Self, String> {
        let options = build_render_options(parse_options(options_json)?);
        let inputs = parse_input(host_script).map_err(|error| error.to_string())?;
        let session = draw_with_options(host_script, &options)
            .map_err(|error| error.to_string())?
            .ok_or_else(|| "no DATA defined".to_string())?;
        let svg = render_standalone_svg(&session);
        Ok(Self {
            inputs,
            options,
            session,
            svg,
        })
    }

    fn refresh(&mut self, update: Option<HighlightUpdate>) -> String {
        match update {
            Some(update) => {
                self.svg = render_standalone_svg(&self.session);
                serde_json::to_string(&update).unwrap_or_else(|_| "null".to_string())
            }
            None => "null".to_string(),
        }
    }

    fn resize(&mut self, width: f32, height: f32) -> Result<String, String> {
        let decision = self.session.on_resize(width);
        let redrawn = decision == fanchart_rs::ResizeDecision::Redraw;
        if redrawn {
            let viewport = Viewport::new(width, height);
            if let Some(session) = self
                .session
                .redraw(&self.inputs, viewport)
                .map_err(|error| error.to_string())?
            {
                self.options.config.render.width = width;
                self.options.config.render.height = height;
                self.session = session;
                self.svg = render_standalone_svg(&self.session);
            }
        }
        let outcome = ResizeOutcome {
            redrawn,
            svg: redrawn.then_some(self.svg.as_str()),
        };
        serde_json::to_string(&outcome).map_err(|error| error.to_string())
    }
}

#[wasm_bindgen]
impl FanChart {
    #[wasm_bindgen(constructor)]
    pub fn new(host_script: &str, options_json: Option<String>) -> Result<FanChart, JsValue> {
        Self::create(host_script, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
    }

    pub fn svg(&self) -> String {
        self.svg.clone()
    }

    pub fn on_enter(&mut self, anum: u32) -> String {
        let update = self.session.on_enter(u64::from(anum));
        self.refresh(update)
    }

    pub fn on_click(&mut self, anum: u32) -> String {
        let update = self.session.on_click(u64::from(anum));
        self.refresh(update)
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> String {
        let update = self.session.on_pointer_move(x, y);
        self.refresh(update)
    }

    pub fn on_leave(&mut self, now_ms: f64) -> String {
        let update = self.session.on_leave(now_ms as u64);
        self.refresh(update)
    }

    pub fn confirm_leave(&mut self, token: f64, now_ms: f64, over_breadcrumbs: bool) -> String {
        let update = self
            .session
            .confirm_leave(token as u64, now_ms as u64, over_breadcrumbs);
        self.refresh(update)
    }

    pub fn tick(&mut self, now_ms: f64) -> String {
        let update = self.session.tick(now_ms as u64);
        self.refresh(update)
    }

    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<String, JsValue> {
        self.resize(width, height).map_err(|error| JsValue::from_str(&error))
    }
}

#[cfg(test)]
mod tests {
    use fanchart_rs::render_with_options;

    use crate::{FanChart, FanChartOptions, build_render_options, parse_options};

    const HOST_SCRIPT: &str = r#"
var QUALITY = ["Unrated", "Poor", "Fair"];
var STRINGS = {"Father": "Vater", "Mother": "Mutter"};
var DATA = {
  "total": 3,
  "data": {
    "id": "I1", "anum": 1, "name": "Ada Lovelace", "quality": 2,
    "children": [
      {"id": "I2", "anum": 2, "name": "George Byron", "quality": 1},
      {"id": "I3", "anum": 3, "name": "Anne Milbanke", "quality": 2}
    ]
  }
};
"#;

    #[test]
    fn renders_host_script() {
        let svg = render_with_options(HOST_SCRIPT, build_render_options(FanChartOptions::default()))
            .expect("host script should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Ada Lovelace"));
    }

    #[test]
    fn options_pick_theme_and_size() {
        let options = parse_options(Some(r#"{"theme": "modern", "width": 640, "highlight": 3}"#))
            .unwrap();
        let render = build_render_options(options);
        assert_eq!(render.config.render.width, 640.0);
        assert_eq!(render.highlight, Some(3));
        assert!(parse_options(Some("{not json")).is_err());
    }

    #[test]
    fn session_reports_highlight_changes() {
        let mut chart = FanChart::create(HOST_SCRIPT, None).unwrap();
        let entered: serde_json::Value = serde_json::from_str(&chart.on_enter(3)).unwrap();
        assert_eq!(entered["kind"], "highlight");
        assert_eq!(entered["target"], 3);
        assert!(chart.svg().contains("Mutter"));

        assert_eq!(chart.on_enter(42), "null");

        let resized: serde_json::Value =
            serde_json::from_str(&chart.resize(1200.0, 800.0).unwrap()).unwrap();
        assert_eq!(resized["redrawn"], false);
        let resized: serde_json::Value =
            serde_json::from_str(&chart.resize(700.0, 800.0).unwrap()).unwrap();
        assert_eq!(resized["redrawn"], true);
    }

    #[test]
    fn missing_data_is_an_error() {
        assert!(FanChart::create("var QUALITY = [];", None).is_err());
    }
}
