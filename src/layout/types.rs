use std::collections::HashMap;

use crate::ir::Quality;

/// Host viewport the chart is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width of the chart wrapper element.
    pub width: f32,
    /// Inner height of the host window.
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Outer bounds of the fan inside its wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanGeometry {
    pub wrapper_width: f32,
    /// Diameter of the fan.
    pub width: f32,
    /// Full circle height; only the upper half is drawn.
    pub height: f32,
    pub radius: f32,
    pub center: (f32, f32),
    pub padding_left: f32,
    pub description_top: f32,
}

impl FanGeometry {
    pub fn svg_width(&self) -> f32 {
        self.width
    }

    pub fn svg_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// Annular sector of one ancestor.
///
/// Angles run clockwise from the left end of the fan (0) to the right end
/// (pi); radii are measured from the subject at the bottom center.
#[derive(Debug, Clone, PartialEq)]
pub struct WedgeLayout {
    pub anum: u64,
    pub id: String,
    pub name: String,
    pub quality: Quality,
    pub collapse: bool,
    pub depth: u32,
    pub parent: Option<usize>,
    pub start_angle: f32,
    pub end_angle: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub visible: bool,
}

impl WedgeLayout {
    pub fn angular_width(&self) -> f32 {
        self.end_angle - self.start_angle
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn contains(&self, angle: f32, radius: f32) -> bool {
        angle >= self.start_angle
            && angle < self.end_angle
            && radius >= self.inner_radius
            && radius < self.outer_radius
    }
}

#[derive(Debug, Clone)]
pub struct FanLayout {
    pub geometry: FanGeometry,
    /// Generations shown, not counting the subject.
    pub depth: u32,
    /// Every node of the tree in breadth-first order, root first.
    pub wedges: Vec<WedgeLayout>,
    pub(super) index: HashMap<u64, usize>,
}

impl FanLayout {
    pub fn wedge(&self, anum: u64) -> Option<&WedgeLayout> {
        self.index.get(&anum).map(|&idx| &self.wedges[idx])
    }

    pub fn root(&self) -> Option<&WedgeLayout> {
        self.wedges.first()
    }

    /// Wedges worth drawing: the root and hairline slivers are skipped.
    pub fn visible_wedges(&self) -> impl Iterator<Item = &WedgeLayout> {
        self.wedges.iter().filter(|w| w.visible)
    }

    /// Ahnentafel numbers from the root's parent down to `anum`.
    pub fn lineage(&self, anum: u64) -> Option<Vec<u64>> {
        let mut idx = *self.index.get(&anum)?;
        let mut chain = Vec::new();
        loop {
            let wedge = &self.wedges[idx];
            match wedge.parent {
                Some(parent) => {
                    chain.push(wedge.anum);
                    idx = parent;
                }
                None => break,
            }
        }
        chain.reverse();
        Some(chain)
    }

    /// Ancestor under a point given in SVG pixel coordinates.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<u64> {
        let dx = x - self.geometry.center.0;
        let dy = y - self.geometry.center.1;
        let radius = dx.hypot(dy);
        let angle = (-dy).atan2(-dx);
        if angle < 0.0 {
            return None;
        }
        self.visible_wedges()
            .find(|w| w.contains(angle, radius))
            .map(|w| w.anum)
    }
}
