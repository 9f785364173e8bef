mod partition;
pub(crate) mod types;
pub use types::*;

use std::collections::HashMap;
use std::f32::consts::PI;

use crate::config::LayoutConfig;
use crate::ir::AncestorNode;

/// Fits the fan into the viewport: the full circle may not be taller than
/// the window (minus padding) nor than `max_height_ratio` of the wrapper.
pub fn fit_geometry(viewport: Viewport, config: &LayoutConfig) -> FanGeometry {
    let wrapper_width = viewport.width.max(0.0);
    let mut height = (viewport.height - config.viewport_pad).max(0.0);
    if height > config.max_height_ratio * wrapper_width {
        height = config.max_height_ratio * wrapper_width;
    }
    let radius = wrapper_width.min(height) / 2.0;
    let width = 2.0 * radius;
    FanGeometry {
        wrapper_width,
        width,
        height,
        radius,
        center: (width / 2.0, height / 2.0),
        padding_left: (wrapper_width - width) / 2.0,
        description_top: height / config.description_offset_ratio,
    }
}

/// Lays out a completed tree as a half-circle partition.
///
/// Angular width is proportional to the number of leaves under a node and
/// every generation gets a ring of equal area. Wedges at or below
/// `visibility_epsilon` radians stay in the layout but are not drawn.
pub fn compute_layout(tree: &AncestorNode, viewport: Viewport, config: &LayoutConfig) -> FanLayout {
    let geometry = fit_geometry(viewport, config);
    let radius_sq = geometry.radius * geometry.radius;

    let cells = partition::partition(tree, PI, radius_sq);
    let mut wedges = Vec::with_capacity(cells.len());
    let mut index = HashMap::with_capacity(cells.len());
    let mut depth = 0;
    for cell in cells {
        let node = cell.node;
        depth = depth.max(cell.depth);
        let visible = cell.depth > 0 && cell.x1 - cell.x0 > config.visibility_epsilon;
        index.entry(node.anum).or_insert(wedges.len());
        wedges.push(WedgeLayout {
            anum: node.anum,
            id: node.id.clone(),
            name: node.name.clone(),
            quality: node.quality,
            collapse: node.collapse,
            depth: cell.depth,
            parent: cell.parent,
            start_angle: cell.x0,
            end_angle: cell.x1,
            inner_radius: cell.y0.sqrt(),
            outer_radius: cell.y1.sqrt(),
            visible,
        });
    }

    let hidden = wedges.iter().filter(|w| w.depth > 0 && !w.visible).count();
    log::debug!(
        "fan layout: {} wedges, {} hidden, radius {:.1}",
        wedges.len(),
        hidden,
        geometry.radius
    );

    FanLayout {
        geometry,
        depth,
        wedges,
        index,
    }
}
