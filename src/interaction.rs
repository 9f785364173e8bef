//! Highlight state machine for the fan chart.
//!
//! The controller never touches a rendering surface. Every event returns a
//! [`HighlightUpdate`] describing what the host has to apply: which wedges
//! to dim, which breadcrumbs to add or drop, and how tall the container
//! must be. Time is passed in as milliseconds so the debounce and fade
//! timers stay deterministic.

use serde::Serialize;

use crate::ahnentafel::relationship_label;
use crate::config::{InteractionConfig, LayoutConfig};
use crate::layout::{FanLayout, WedgeLayout};
use crate::theme::Theme;
use crate::translate::Translations;

/// One entry of the lineage trail shown under the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub anum: u64,
    pub quality_label: Option<String>,
    pub relationship: String,
    pub name: String,
    pub color: String,
}

impl Breadcrumb {
    pub fn from_wedge(wedge: &WedgeLayout, strings: &Translations, theme: &Theme) -> Self {
        let name = if wedge.name.is_empty() {
            strings.get("Missing").to_string()
        } else {
            wedge.name.clone()
        };
        Self {
            anum: wedge.anum,
            quality_label: strings.quality_label(wedge.quality).map(str::to_string),
            relationship: relationship_label(wedge.anum, strings),
            name,
            color: theme.quality_color(wedge.quality).to_string(),
        }
    }

    /// `"(certain : Mother)"`, or `"(Mother)"` without a quality label.
    pub fn relationship_text(&self) -> String {
        match &self.quality_label {
            Some(label) => format!("({} : {})", label, self.relationship),
            None => format!("({})", self.relationship),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum HighlightState {
    Idle,
    Highlighted { target: u64, lineage: Vec<u64> },
    /// Wedges are animating back to full opacity; hover is suspended.
    #[serde(rename_all = "camelCase")]
    Fading { until_ms: u64 },
}

/// Timer the host must arm; pass `token` back to
/// [`HighlightController::confirm_leave`] when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCheck {
    pub token: u64,
    pub at_ms: u64,
}

/// Breadcrumb keys added, removed and reused by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreadcrumbDiff {
    pub entered: Vec<u64>,
    pub exited: Vec<u64>,
    pub kept: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HighlightUpdate {
    #[serde(rename_all = "camelCase")]
    Highlight {
        target: u64,
        lineage: Vec<u64>,
        dimmed: Vec<u64>,
        dim_opacity: f32,
        breadcrumbs: Vec<Breadcrumb>,
        diff: BreadcrumbDiff,
        container_height: f32,
    },
    ExitScheduled(ScheduledCheck),
    #[serde(rename_all = "camelCase")]
    Reset {
        diff: BreadcrumbDiff,
        fade_ms: u64,
        container_height: f32,
    },
    HoverEnabled,
}

#[derive(Debug, Clone)]
pub struct HighlightController {
    config: InteractionConfig,
    wrapper_height: f32,
    breadcrumb_pad: f32,
    breadcrumb_row_height: f32,
    state: HighlightState,
    breadcrumbs: Vec<Breadcrumb>,
    pending_exit: Option<u64>,
    seq: u64,
}

impl HighlightController {
    pub fn new(config: &InteractionConfig, layout: &LayoutConfig, wrapper_height: f32) -> Self {
        Self {
            config: config.clone(),
            wrapper_height,
            breadcrumb_pad: layout.breadcrumb_pad,
            breadcrumb_row_height: layout.breadcrumb_row_height,
            state: HighlightState::Idle,
            breadcrumbs: Vec::new(),
            pending_exit: None,
            seq: 0,
        }
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    pub fn breadcrumbs_visible(&self) -> bool {
        matches!(self.state, HighlightState::Highlighted { .. })
    }

    pub fn hover_enabled(&self) -> bool {
        !matches!(self.state, HighlightState::Fading { .. })
    }

    pub fn pending_exit(&self) -> Option<u64> {
        self.pending_exit
    }

    pub fn breadcrumb_panel_height(&self) -> f32 {
        self.breadcrumbs.len() as f32 * self.breadcrumb_row_height
    }

    /// Wrapper height needed so the breadcrumb list never clips.
    pub fn container_height(&self) -> f32 {
        if self.breadcrumbs_visible() {
            self.wrapper_height + self.breadcrumb_panel_height() + self.breadcrumb_pad
        } else {
            self.wrapper_height
        }
    }

    /// Resting opacity of a wedge in the current state.
    pub fn opacity(&self, anum: u64) -> f32 {
        match &self.state {
            HighlightState::Highlighted { lineage, .. } if !lineage.contains(&anum) => {
                self.config.dim_opacity
            }
            _ => 1.0,
        }
    }

    /// Pointer entered a wedge. Ignored while the exit fade runs.
    pub fn enter(
        &mut self,
        anum: u64,
        layout: &FanLayout,
        strings: &Translations,
        theme: &Theme,
    ) -> Option<HighlightUpdate> {
        if !self.hover_enabled() {
            log::trace!("hover on {anum} ignored during fade");
            return None;
        }
        self.highlight(anum, layout, strings, theme)
    }

    /// Click on a wedge. Unlike hover this also interrupts a running fade.
    pub fn click(
        &mut self,
        anum: u64,
        layout: &FanLayout,
        strings: &Translations,
        theme: &Theme,
    ) -> Option<HighlightUpdate> {
        self.highlight(anum, layout, strings, theme)
    }

    fn highlight(
        &mut self,
        anum: u64,
        layout: &FanLayout,
        strings: &Translations,
        theme: &Theme,
    ) -> Option<HighlightUpdate> {
        let lineage = layout.lineage(anum)?;
        if lineage.is_empty() {
            return None;
        }
        self.seq += 1;
        self.pending_exit = None;

        let breadcrumbs: Vec<Breadcrumb> = lineage
            .iter()
            .filter_map(|&num| layout.wedge(num))
            .map(|wedge| Breadcrumb::from_wedge(wedge, strings, theme))
            .collect();
        let diff = diff_keys(&self.breadcrumbs, &breadcrumbs);
        let dimmed: Vec<u64> = layout
            .wedges
            .iter()
            .filter(|w| !lineage.contains(&w.anum))
            .map(|w| w.anum)
            .collect();

        log::debug!("highlight {anum}: lineage {lineage:?}");
        self.breadcrumbs = breadcrumbs.clone();
        self.state = HighlightState::Highlighted {
            target: anum,
            lineage: lineage.clone(),
        };

        Some(HighlightUpdate::Highlight {
            target: anum,
            lineage,
            dimmed,
            dim_opacity: self.config.dim_opacity,
            breadcrumbs,
            diff,
            container_height: self.container_height(),
        })
    }

    /// Pointer left the chart. The exit is only confirmed after the
    /// debounce, once the host reports whether the pointer is now over the
    /// breadcrumb panel.
    pub fn leave(&mut self, now_ms: u64) -> Option<HighlightUpdate> {
        if !self.breadcrumbs_visible() {
            return None;
        }
        self.seq += 1;
        self.pending_exit = Some(self.seq);
        Some(HighlightUpdate::ExitScheduled(ScheduledCheck {
            token: self.seq,
            at_ms: now_ms + self.config.exit_debounce_ms,
        }))
    }

    pub fn confirm_leave(
        &mut self,
        token: u64,
        now_ms: u64,
        pointer_over_breadcrumbs: bool,
    ) -> Option<HighlightUpdate> {
        if self.pending_exit != Some(token) {
            return None;
        }
        self.pending_exit = None;
        if pointer_over_breadcrumbs {
            return None;
        }

        let diff = BreadcrumbDiff {
            exited: self.breadcrumbs.iter().map(|b| b.anum).collect(),
            ..Default::default()
        };
        self.breadcrumbs.clear();
        self.state = HighlightState::Fading {
            until_ms: now_ms + self.config.fade_ms,
        };
        log::debug!("highlight cleared, fading for {}ms", self.config.fade_ms);

        Some(HighlightUpdate::Reset {
            diff,
            fade_ms: self.config.fade_ms,
            container_height: self.container_height(),
        })
    }

    /// Advances timers; re-enables hover once the fade has finished.
    pub fn tick(&mut self, now_ms: u64) -> Option<HighlightUpdate> {
        match self.state {
            HighlightState::Fading { until_ms } if now_ms >= until_ms => {
                self.state = HighlightState::Idle;
                Some(HighlightUpdate::HoverEnabled)
            }
            _ => None,
        }
    }
}

fn diff_keys(old: &[Breadcrumb], new: &[Breadcrumb]) -> BreadcrumbDiff {
    let mut diff = BreadcrumbDiff::default();
    for crumb in new {
        if old.iter().any(|b| b.anum == crumb.anum) {
            diff.kept.push(crumb.anum);
        } else {
            diff.entered.push(crumb.anum);
        }
    }
    for crumb in old {
        if !new.iter().any(|b| b.anum == crumb.anum) {
            diff.exited.push(crumb.anum);
        }
    }
    diff
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeDecision {
    Redraw,
    Ignore,
}

/// Only a change of wrapper width warrants a re-layout; window height
/// jitter (mobile toolbars and the like) is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGuard {
    width: f32,
}

impl ResizeGuard {
    pub fn new(width: f32) -> Self {
        Self { width }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn on_resize(&mut self, width: f32) -> ResizeDecision {
        if width == self.width {
            return ResizeDecision::Ignore;
        }
        self.width = width;
        ResizeDecision::Redraw
    }

    pub fn on_orientation_change(&mut self) -> ResizeDecision {
        ResizeDecision::Redraw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    Draw,
    RetryAfter(u64),
}

/// Waits for the host's rendering dependencies before the first draw,
/// retrying indefinitely at a fixed interval.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    retry_ms: u64,
    attempts: u32,
    done: bool,
}

impl Bootstrap {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            retry_ms: config.bootstrap_retry_ms,
            attempts: 0,
            done: false,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn poll(&mut self, dependencies_ready: bool) -> BootstrapStep {
        self.attempts += 1;
        if dependencies_ready {
            self.done = true;
            log::debug!("dependencies ready after {} attempts", self.attempts);
            BootstrapStep::Draw
        } else {
            BootstrapStep::RetryAfter(self.retry_ms)
        }
    }
}
