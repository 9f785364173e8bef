use serde::Serialize;

use crate::config::DepthConfig;
use crate::ir::AncestorNode;

/// Deepest generation present in the raw tree, not counting the subject.
pub fn data_depth(root: &AncestorNode) -> u32 {
    let mut deepest = 0;
    root.visit(&mut |node| deepest = deepest.max(node.generation()));
    deepest.saturating_sub(1)
}

/// Number of generations the chart can show at the given wrapper width.
pub fn target_depth(width: f32, config: &DepthConfig) -> u32 {
    config
        .breakpoints
        .iter()
        .filter(|bp| width < bp.below_width)
        .fold(config.max_depth, |depth, bp| depth.min(bp.depth))
}

pub fn chart_depth(root: &AncestorNode, width: f32, config: &DepthConfig) -> u32 {
    data_depth(root).min(target_depth(width, config))
}

/// Ancestors with a real record (non-empty id), the subject excluded.
pub fn count_known(root: &AncestorNode) -> usize {
    let mut count = 0;
    for child in &root.children {
        child.visit(&mut |node| {
            if node.is_known() {
                count += 1;
            }
        });
    }
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Completeness {
    pub depth: u32,
    pub known: usize,
    pub expected: f64,
    pub percent: f64,
}

impl Completeness {
    /// Percentage formatted with two decimals, e.g. `"33.33"`.
    pub fn percent_text(&self) -> String {
        format!("{:.2}", self.percent)
    }
}

/// Share of the `2^(depth+1) - 2` ancestor slots that hold known records,
/// rounded to two decimals.
pub fn completeness(depth: u32, known: usize) -> Completeness {
    let expected = 2f64.powi(depth as i32 + 1) - 2.0;
    let percent = if expected > 0.0 {
        round2(known as f64 / expected * 100.0)
    } else {
        0.0
    };
    Completeness {
        depth,
        known,
        expected,
        percent,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Quality;

    fn sample() -> AncestorNode {
        AncestorNode::known(1, "I1", "Ada", Quality::Rated(9)).with_children(vec![
            AncestorNode::known(2, "I2", "John", Quality::Rated(7)),
            AncestorNode::new(3).with_children(vec![
                AncestorNode::new(6),
                AncestorNode::known(7, "I7", "Eve", Quality::Rated(4))
                    .with_children(vec![AncestorNode::known(15, "I15", "Lil", Quality::Rated(1))]),
            ]),
        ])
    }

    #[test]
    fn data_depth_ignores_the_subject() {
        assert_eq!(data_depth(&sample()), 3);
        assert_eq!(data_depth(&AncestorNode::new(1)), 0);
    }

    #[test]
    fn target_depth_breakpoints() {
        let config = DepthConfig::default();
        assert_eq!(target_depth(1200.0, &config), 9);
        assert_eq!(target_depth(992.0, &config), 9);
        assert_eq!(target_depth(991.0, &config), 8);
        assert_eq!(target_depth(767.0, &config), 7);
        assert_eq!(target_depth(520.0, &config), 7);
        assert_eq!(target_depth(500.0, &config), 6);
    }

    #[test]
    fn chart_depth_is_bounded_by_data_and_width() {
        let config = DepthConfig::default();
        assert_eq!(chart_depth(&sample(), 1200.0, &config), 3);

        let mut deep = AncestorNode::new(1 << 12);
        for anum in (1..12).rev() {
            deep = AncestorNode::new(1 << anum).with_children(vec![deep]);
        }
        let deep = AncestorNode::new(1).with_children(vec![deep]);
        assert_eq!(data_depth(&deep), 12);
        assert_eq!(chart_depth(&deep, 500.0, &config), 6);
    }

    #[test]
    fn counts_known_without_root() {
        assert_eq!(count_known(&sample()), 3);
    }

    #[test]
    fn completeness_percent() {
        let result = completeness(2, 2);
        assert_eq!(result.expected, 6.0);
        assert_eq!(result.percent, 33.33);
        assert_eq!(result.percent_text(), "33.33");
        assert_eq!(completeness(0, 0).percent, 0.0);
        assert_eq!(completeness(1, 2).percent, 100.0);
    }

    #[test]
    fn completeness_is_monotonic() {
        for depth in 1..6 {
            let mut last = -1.0;
            for known in 0..(1usize << (depth + 1)) {
                let pct = completeness(depth, known).percent;
                assert!(pct >= last);
                last = pct;
            }
        }
    }
}
