use std::collections::BTreeSet;

use crate::domain::{Leaf, RecordNode};

use super::filter::{leaf_passes, FilterState};

/// Filtered total of a node, recomputed from its leaves on every call.
///
/// A leaf contributes the sum of its values for the selected cost centers when
/// it passes the filters, and zero otherwise. A branch is the sum of its
/// children.
pub fn node_total(node: &RecordNode, selected: &BTreeSet<String>, filter: &FilterState) -> f64 {
    match node {
        RecordNode::Leaf(leaf) => leaf_total(leaf, selected, filter),
        RecordNode::Branch(branch) => branch
            .children
            .iter()
            .map(|child| node_total(child, selected, filter))
            .sum(),
    }
}

pub fn leaf_total(leaf: &Leaf, selected: &BTreeSet<String>, filter: &FilterState) -> f64 {
    if !leaf_passes(leaf, filter) {
        return 0.0;
    }
    leaf.values
        .iter()
        .filter(|(cost_center, _)| selected.contains(cost_center.as_str()))
        .map(|(_, value)| if value.is_finite() { *value } else { 0.0 })
        .sum()
}

pub fn forest_total(forest: &[RecordNode], selected: &BTreeSet<String>, filter: &FilterState) -> f64 {
    forest
        .iter()
        .map(|node| node_total(node, selected, filter))
        .sum()
}
