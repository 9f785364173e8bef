//! Render session: everything one mounted chart needs between draws.
//!
//! A session is created by [`ChartSession::draw`] and replaced wholesale on
//! every redraw. The highlight state lives inside it and is only changed
//! through the event methods.

use serde::Serialize;

use crate::analyze::{Completeness, chart_depth, completeness, count_known};
use crate::complete::{CompletionError, complete_tree};
use crate::config::Config;
use crate::interaction::{HighlightController, HighlightUpdate, ResizeDecision, ResizeGuard};
use crate::ir::{AncestorNode, HostInputs};
use crate::layout::{FanLayout, Viewport, compute_layout};
use crate::translate::Translations;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    pub name: String,
    pub generations: u32,
    pub completeness: Completeness,
    pub note: String,
}

impl Caption {
    fn new(name: &str, completeness: Completeness, strings: &Translations) -> Self {
        let generations = completeness.depth;
        let note = if completeness.percent == 0.0 {
            format!("({} {})", generations, strings.get("Generations"))
        } else {
            format!(
                "({} {}, {}% {})",
                generations,
                strings.get("Generations"),
                completeness.percent_text(),
                strings.get("Complete")
            )
        };
        Self {
            name: name.to_string(),
            generations,
            completeness,
            note,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartSession {
    config: Config,
    strings: Translations,
    viewport: Viewport,
    tree: AncestorNode,
    layout: FanLayout,
    caption: Caption,
    wrapper_height: f32,
    controller: HighlightController,
    resize: ResizeGuard,
}

impl ChartSession {
    /// Builds a chart from the host inputs. Returns `Ok(None)` when the host
    /// defined no `DATA`, in which case nothing is drawn.
    pub fn draw(
        inputs: &HostInputs,
        viewport: Viewport,
        config: &Config,
    ) -> Result<Option<Self>, CompletionError> {
        let Some(data) = inputs.data.as_ref() else {
            log::debug!("no DATA defined, skipping draw");
            return Ok(None);
        };
        let strings = inputs.translations();

        let depth = chart_depth(&data.data, viewport.width, &config.layout.depth);
        let tree = complete_tree(&data.data, depth)?;
        let known = count_known(&tree);
        let completeness = completeness(depth, known);
        let layout = compute_layout(&tree, viewport, &config.layout);
        let caption = Caption::new(&tree.name, completeness, &strings);

        let wrapper_height = layout.geometry.svg_height() + config.layout.wrapper_pad;
        let controller =
            HighlightController::new(&config.interaction, &config.layout, wrapper_height);

        log::info!(
            "drew fan chart for {:?}: {} generations, {} known of {} slots ({}%)",
            tree.name,
            depth,
            known,
            completeness.expected,
            completeness.percent_text()
        );

        Ok(Some(Self {
            config: config.clone(),
            strings,
            viewport,
            tree,
            layout,
            caption,
            wrapper_height,
            controller,
            resize: ResizeGuard::new(viewport.width),
        }))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn strings(&self) -> &Translations {
        &self.strings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The completed tree the layout was computed from.
    pub fn tree(&self) -> &AncestorNode {
        &self.tree
    }

    pub fn layout(&self) -> &FanLayout {
        &self.layout
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    pub fn wrapper_height(&self) -> f32 {
        self.wrapper_height
    }

    pub fn highlight(&self) -> &HighlightController {
        &self.controller
    }

    pub fn on_enter(&mut self, anum: u64) -> Option<HighlightUpdate> {
        self.controller
            .enter(anum, &self.layout, &self.strings, &self.config.theme)
    }

    pub fn on_click(&mut self, anum: u64) -> Option<HighlightUpdate> {
        self.controller
            .click(anum, &self.layout, &self.strings, &self.config.theme)
    }

    /// Pointer moved over the SVG; highlights whatever wedge is under it.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> Option<HighlightUpdate> {
        let anum = self.layout.hit_test(x, y)?;
        if let crate::interaction::HighlightState::Highlighted { target, .. } =
            self.controller.state()
        {
            if *target == anum {
                return None;
            }
        }
        self.on_enter(anum)
    }

    pub fn on_leave(&mut self, now_ms: u64) -> Option<HighlightUpdate> {
        self.controller.leave(now_ms)
    }

    pub fn confirm_leave(
        &mut self,
        token: u64,
        now_ms: u64,
        pointer_over_breadcrumbs: bool,
    ) -> Option<HighlightUpdate> {
        self.controller
            .confirm_leave(token, now_ms, pointer_over_breadcrumbs)
    }

    pub fn tick(&mut self, now_ms: u64) -> Option<HighlightUpdate> {
        self.controller.tick(now_ms)
    }

    /// Whether a resize needs a fresh session. The host then calls
    /// [`ChartSession::redraw`] and replaces this one.
    pub fn on_resize(&mut self, width: f32) -> ResizeDecision {
        self.resize.on_resize(width)
    }

    pub fn on_orientation_change(&mut self) -> ResizeDecision {
        self.resize.on_orientation_change()
    }

    pub fn redraw(
        &self,
        inputs: &HostInputs,
        viewport: Viewport,
    ) -> Result<Option<Self>, CompletionError> {
        Self::draw(inputs, viewport, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::HighlightState;
    use crate::ir::{ChartData, Quality};
    use crate::translate::Translations;

    fn inputs() -> HostInputs {
        let root = AncestorNode::known(1, "I1", "Ada Lovelace", Quality::Rated(9)).with_children(vec![
            AncestorNode::known(2, "I2", "George Byron", Quality::Rated(9)),
            AncestorNode::known(3, "I3", "Anne Milbanke", Quality::Rated(7))
                .with_children(vec![AncestorNode::known(7, "I7", "Judith Noel", Quality::Rated(5))]),
        ]);
        HostInputs {
            data: Some(ChartData {
                total: 4,
                data: root,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn missing_data_skips_draw() {
        let session =
            ChartSession::draw(&HostInputs::default(), Viewport::new(1200.0, 800.0), &Config::default())
                .unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn draw_completes_and_measures() {
        let session = ChartSession::draw(&inputs(), Viewport::new(1200.0, 800.0), &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(session.caption().generations, 2);
        assert_eq!(session.caption().completeness.known, 3);
        assert_eq!(session.caption().completeness.percent, 50.0);
        assert_eq!(session.caption().note, "(2 Generations, 50.00% Complete)");
        assert_eq!(session.layout().wedges.len(), 7);
        assert_eq!(session.wrapper_height(), 350.0 + 90.0);
        assert_eq!(session.highlight().container_height(), 440.0);
    }

    #[test]
    fn narrow_viewport_limits_depth() {
        let mut deep = AncestorNode::new(1 << 10);
        for shift in (1..10).rev() {
            deep = AncestorNode::new(1 << shift).with_children(vec![deep]);
        }
        let inputs = HostInputs {
            data: Some(ChartData {
                total: 0,
                data: AncestorNode::new(1).with_children(vec![deep]),
            }),
            ..Default::default()
        };
        let session = ChartSession::draw(&inputs, Viewport::new(500.0, 800.0), &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(session.caption().generations, 6);
        assert_eq!(session.caption().note, "(6 Generations)");
    }

    #[test]
    fn caption_is_translated() {
        let mut inputs = inputs();
        inputs.strings = Some(
            Translations::from_pairs([("Generations", "Generationen"), ("Complete", "vollständig")])
                .strings,
        );
        let session = ChartSession::draw(&inputs, Viewport::new(1200.0, 800.0), &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(session.caption().note, "(2 Generationen, 50.00% vollständig)");
    }

    #[test]
    fn events_flow_through_the_controller() {
        let mut session =
            ChartSession::draw(&inputs(), Viewport::new(1200.0, 800.0), &Config::default())
                .unwrap()
                .unwrap();
        assert!(session.on_enter(7).is_some());
        assert_eq!(
            session.highlight().state(),
            &HighlightState::Highlighted {
                target: 7,
                lineage: vec![3, 7]
            }
        );
        assert_eq!(session.on_resize(1200.0), ResizeDecision::Ignore);
        assert_eq!(session.on_resize(900.0), ResizeDecision::Redraw);

        let redrawn = session
            .redraw(&inputs(), Viewport::new(900.0, 800.0))
            .unwrap()
            .unwrap();
        assert_eq!(redrawn.highlight().state(), &HighlightState::Idle);
    }

    #[test]
    fn inconsistent_tree_is_an_error() {
        let inputs = HostInputs {
            data: Some(ChartData {
                total: 0,
                data: AncestorNode::new(1).with_children(vec![AncestorNode::new(9)]),
            }),
            ..Default::default()
        };
        let err = ChartSession::draw(&inputs, Viewport::new(1200.0, 800.0), &Config::default());
        assert!(matches!(err, Err(CompletionError::InconsistentChild { parent: 1, child: 9 })));
    }
}
