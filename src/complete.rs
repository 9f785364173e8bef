//! Tree completion: turns a sparse ancestor tree into a full binary tree of a
//! fixed depth so every generation ring of the fan is closed.

use thiserror::Error;

use crate::ahnentafel::{father_number, generation, is_female, mother_number};
use crate::ir::{AncestorNode, Quality};

/// Deepest generation whose parents can still be numbered in a `u64`.
const MAX_COMPLETION_DEPTH: u32 = u64::BITS - 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("ancestor number 0 is not a valid Ahnentafel number")]
    ZeroNumber,
    #[error("ancestor {parent} lists {count} parents, at most 2 are allowed")]
    TooManyParents { parent: u64, count: usize },
    #[error("ancestor {child} cannot be a parent of {parent} (expected {} or {})", .parent * 2, .parent * 2 + 1)]
    InconsistentChild { parent: u64, child: u64 },
    #[error("ancestor {parent} lists parent {child} twice")]
    DuplicateParent { parent: u64, child: u64 },
    #[error("depth {0} exceeds the supported maximum of {max}", max = MAX_COMPLETION_DEPTH)]
    DepthTooLarge(u32),
}

/// Returns a copy of `root` where every node up to generation `max_depth`
/// has exactly a father and a mother, missing ones replaced by placeholders,
/// and everything beyond `max_depth` pruned.
///
/// Pedigree collapse spreads to every ancestor of a collapsed individual.
pub fn complete_tree(root: &AncestorNode, max_depth: u32) -> Result<AncestorNode, CompletionError> {
    if max_depth > MAX_COMPLETION_DEPTH {
        return Err(CompletionError::DepthTooLarge(max_depth));
    }
    if root.anum == 0 {
        return Err(CompletionError::ZeroNumber);
    }
    let mut completed = root.clone();
    fill(&mut completed, max_depth)?;
    Ok(completed)
}

fn fill(node: &mut AncestorNode, max_depth: u32) -> Result<(), CompletionError> {
    if generation(node.anum) > max_depth {
        node.children.clear();
        return Ok(());
    }

    let (mut father, mut mother) = split_parents(node)?;

    if node.collapse {
        node.quality = Quality::Collapse;
    }
    for parent in [&mut father, &mut mother] {
        if node.collapse || parent.collapse {
            parent.collapse = true;
            parent.quality = Quality::Collapse;
        }
    }

    fill(&mut father, max_depth)?;
    fill(&mut mother, max_depth)?;
    node.children = vec![father, mother];
    Ok(())
}

/// Takes the existing parents out of `node` as `(father, mother)`,
/// synthesizing whichever is absent.
fn split_parents(node: &mut AncestorNode) -> Result<(AncestorNode, AncestorNode), CompletionError> {
    let anum = node.anum;
    let father_num = father_number(anum);
    let mother_num = mother_number(anum);
    for child in &node.children {
        if child.anum != father_num && child.anum != mother_num {
            return Err(CompletionError::InconsistentChild {
                parent: anum,
                child: child.anum,
            });
        }
    }

    let mut existing = std::mem::take(&mut node.children).into_iter();
    match (existing.next(), existing.next(), existing.next()) {
        (None, _, _) => Ok((
            AncestorNode::placeholder(father_num),
            AncestorNode::placeholder(mother_num),
        )),
        (Some(only), None, _) => {
            if is_female(only.anum) {
                Ok((AncestorNode::placeholder(father_num), only))
            } else {
                Ok((only, AncestorNode::placeholder(mother_num)))
            }
        }
        (Some(first), Some(second), None) => {
            if first.anum == second.anum {
                return Err(CompletionError::DuplicateParent {
                    parent: anum,
                    child: first.anum,
                });
            }
            Ok((first, second))
        }
        (Some(_), Some(_), Some(_)) => Err(CompletionError::TooManyParents {
            parent: anum,
            count: 3 + existing.count(),
        }),
    }
}
