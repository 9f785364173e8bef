pub mod ahnentafel;
pub mod analyze;
#[cfg(feature = "cli")]
pub mod cli;
pub mod complete;
pub mod config;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod session;
pub mod theme;
pub mod translate;

#[cfg(feature = "cli")]
pub use cli::run;
pub use complete::{CompletionError, complete_tree};
pub use config::{Config, LayoutConfig};
pub use interaction::{HighlightController, HighlightState, HighlightUpdate, ResizeDecision};
pub use ir::{AncestorNode, ChartData, HostInputs, Quality};
pub use layout::{FanLayout, Viewport, WedgeLayout, compute_layout};
pub use parser::{ParseError, parse_input};
pub use render::{render_html, render_standalone_svg, render_svg};
pub use session::ChartSession;
pub use theme::Theme;
pub use translate::Translations;

/// Options for the one-call rendering helpers.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    /// Lineage to highlight before rendering, by Ahnentafel number.
    pub highlight: Option<u64>,
}

impl RenderOptions {
    pub fn gigatrees() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        let mut options = Self::default();
        options.config.theme = Theme::modern();
        options.config.render.background = options.config.theme.background.clone();
        options
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.render.width, self.config.render.height)
    }
}

/// Parses host input (JSON document or host script) and draws a session.
/// `Ok(None)` means the input defined no `DATA`.
pub fn draw_with_options(
    input: &str,
    options: &RenderOptions,
) -> anyhow::Result<Option<ChartSession>> {
    let inputs = parse_input(input)?;
    let Some(mut session) = ChartSession::draw(&inputs, options.viewport(), &options.config)? else {
        return Ok(None);
    };
    if let Some(anum) = options.highlight {
        if session.on_click(anum).is_none() {
            log::warn!("cannot highlight ancestor {anum}: not in the chart");
        }
    }
    Ok(Some(session))
}

/// Renders a standalone SVG; an input without `DATA` yields an empty string.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    Ok(draw_with_options(input, &options)?
        .map(|session| render_standalone_svg(&session))
        .unwrap_or_default())
}
