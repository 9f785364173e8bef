use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ahnentafel::generation;
use crate::translate::Translations;

/// Genealogical reliability of a record.
///
/// Codes 0..=11 are rated assessments; 8888 marks a pedigree collapse and
/// 9999 a missing ancestor. Anything else is treated as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "QualityCode", into = "i64")]
pub enum Quality {
    Rated(u8),
    Collapse,
    #[default]
    Missing,
}

impl Quality {
    pub const MAX_RATED: u8 = 11;
    pub const COLLAPSE_CODE: i64 = 8888;
    pub const MISSING_CODE: i64 = 9999;

    pub fn from_code(code: i64) -> Self {
        match code {
            0..=11 => Self::Rated(code as u8),
            Self::COLLAPSE_CODE => Self::Collapse,
            _ => Self::Missing,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Rated(code) => code as i64,
            Self::Collapse => Self::COLLAPSE_CODE,
            Self::Missing => Self::MISSING_CODE,
        }
    }
}

impl From<i64> for Quality {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

/// Wire form of a quality code. Anything that is not an integer (null,
/// strings, fractions) reads as a missing ancestor.
#[derive(Deserialize)]
#[serde(untagged)]
enum QualityCode {
    Integer(i64),
    Malformed(serde::de::IgnoredAny),
}

impl From<QualityCode> for Quality {
    fn from(code: QualityCode) -> Self {
        match code {
            QualityCode::Integer(code) => Self::from_code(code),
            QualityCode::Malformed(_) => Self::Missing,
        }
    }
}

impl From<Quality> for i64 {
    fn from(quality: Quality) -> Self {
        quality.code()
    }
}

/// One position in the binary ancestor tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorNode {
    #[serde(default)]
    pub id: String,
    pub anum: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub collapse: bool,
    #[serde(default)]
    pub children: Vec<AncestorNode>,
}

impl AncestorNode {
    pub fn new(anum: u64) -> Self {
        Self {
            id: String::new(),
            anum,
            name: String::new(),
            quality: Quality::Missing,
            collapse: false,
            children: Vec::new(),
        }
    }

    /// Synthetic stand-in for an unknown ancestor.
    pub fn placeholder(anum: u64) -> Self {
        Self::new(anum)
    }

    pub fn known(anum: u64, id: &str, name: &str, quality: Quality) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            quality,
            ..Self::new(anum)
        }
    }

    pub fn with_children(mut self, children: Vec<AncestorNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_collapse(mut self, collapse: bool) -> Self {
        self.collapse = collapse;
        self
    }

    pub fn is_known(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn generation(&self) -> u32 {
        generation(self.anum)
    }

    /// Pre-order traversal over this node and all of its ancestors.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a AncestorNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn find(&self, anum: u64) -> Option<&AncestorNode> {
        if self.anum == anum {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(anum))
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

/// The `DATA` payload handed over by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub total: u64,
    pub data: AncestorNode,
}

/// Everything the host page may define before the first draw.
#[derive(Debug, Clone, Default)]
pub struct HostInputs {
    pub quality: Option<Vec<String>>,
    pub strings: Option<HashMap<String, String>>,
    pub data: Option<ChartData>,
}

impl HostInputs {
    pub fn translations(&self) -> Translations {
        Translations::new(
            self.strings.clone().unwrap_or_default(),
            self.quality.clone().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_codes_round_trip_through_known_values() {
        assert_eq!(Quality::from_code(0), Quality::Rated(0));
        assert_eq!(Quality::from_code(11), Quality::Rated(11));
        assert_eq!(Quality::from_code(8888), Quality::Collapse);
        assert_eq!(Quality::from_code(9999), Quality::Missing);
        assert_eq!(Quality::from_code(12), Quality::Missing);
        assert_eq!(Quality::from_code(-1), Quality::Missing);
        assert_eq!(Quality::Collapse.code(), 8888);
    }

    #[test]
    fn deserializes_sparse_node() {
        let node: AncestorNode = serde_json::from_str(
            r#"{"anum":1,"id":"I1","name":"Ada","quality":7,"children":[{"anum":3,"quality":42}]}"#,
        )
        .unwrap();
        assert_eq!(node.quality, Quality::Rated(7));
        assert!(!node.collapse);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].quality, Quality::Missing);
        assert!(!node.children[0].is_known());
    }

    #[test]
    fn malformed_quality_reads_as_missing() {
        for raw in ["null", "\"7\"", "7.5", "[7]"] {
            let node: AncestorNode =
                serde_json::from_str(&format!(r#"{{"anum":1,"id":"I1","quality":{raw}}}"#)).unwrap();
            assert_eq!(node.quality, Quality::Missing, "quality {raw}");
            assert!(node.is_known());
        }
    }

    #[test]
    fn find_and_count() {
        let tree = AncestorNode::known(1, "I1", "Ada", Quality::Rated(9)).with_children(vec![
            AncestorNode::new(2),
            AncestorNode::new(3).with_children(vec![AncestorNode::new(7)]),
        ]);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.find(7).map(|n| n.anum), Some(7));
        assert!(tree.find(6).is_none());
    }
}
