use std::collections::VecDeque;

use crate::ir::AncestorNode;

/// Raw partition cell: `x` spans the angle, `y` spans the squared radius.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Cell<'a> {
    pub node: &'a AncestorNode,
    pub parent: Option<usize>,
    pub depth: u32,
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
}

/// Leaves weigh 1, inner nodes nothing of their own.
pub(super) fn leaf_count(node: &AncestorNode) -> usize {
    if node.children.is_empty() {
        1
    } else {
        node.children.iter().map(leaf_count).sum()
    }
}

pub(super) fn tree_height(node: &AncestorNode) -> u32 {
    node.children
        .iter()
        .map(|child| tree_height(child) + 1)
        .max()
        .unwrap_or(0)
}

/// Space-filling partition of `root` over `[0, x_extent] x [0, y_extent]`.
///
/// Each depth gets an equal band of `y`; siblings split their parent's `x`
/// range in child order, proportionally to their leaf counts. Cells come
/// out breadth-first.
pub(super) fn partition(root: &AncestorNode, x_extent: f32, y_extent: f32) -> Vec<Cell<'_>> {
    let band = y_extent / (tree_height(root) + 1) as f32;
    let mut cells = Vec::with_capacity(root.node_count());
    let mut queue = VecDeque::new();
    queue.push_back((root, None, 0u32, 0.0f32, x_extent));

    while let Some((node, parent, depth, x0, x1)) = queue.pop_front() {
        let idx = cells.len();
        cells.push(Cell {
            node,
            parent,
            depth,
            x0,
            x1,
            y0: depth as f32 * band,
            y1: (depth + 1) as f32 * band,
        });

        if node.children.is_empty() {
            continue;
        }
        let weights: Vec<usize> = node.children.iter().map(leaf_count).collect();
        let total = weights.iter().sum::<usize>().max(1) as f32;
        let span = x1 - x0;
        let mut cursor = x0;
        for (child, weight) in node.children.iter().zip(weights) {
            let next = cursor + span * weight as f32 / total;
            queue.push_back((child, Some(idx), depth + 1, cursor, next));
            cursor = next;
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uneven_tree_splits_by_leaves() {
        let tree = AncestorNode::new(1).with_children(vec![
            AncestorNode::new(2).with_children(vec![AncestorNode::new(4), AncestorNode::new(5)]),
            AncestorNode::new(3),
        ]);
        assert_eq!(leaf_count(&tree), 3);
        assert_eq!(tree_height(&tree), 2);

        let cells = partition(&tree, 3.0, 30.0);
        let order: Vec<u64> = cells.iter().map(|c| c.node.anum).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        assert_eq!((cells[1].x0, cells[1].x1), (0.0, 2.0));
        assert_eq!((cells[2].x0, cells[2].x1), (2.0, 3.0));
        assert_eq!((cells[3].x0, cells[3].x1), (0.0, 1.0));
        assert_eq!((cells[2].y0, cells[2].y1), (10.0, 20.0));
        assert_eq!(cells[4].parent, Some(1));
    }

    #[test]
    fn single_node_fills_everything() {
        let root = AncestorNode::new(1);
        let cells = partition(&root, 1.0, 1.0);
        assert_eq!(cells.len(), 1);
        assert_eq!((cells[0].x0, cells[0].x1, cells[0].y0, cells[0].y1), (0.0, 1.0, 0.0, 1.0));
    }
}
