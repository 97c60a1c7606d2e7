use crate::domain::{Leaf, PeriodDimension, RecordNode};

/// Selected period dimension and value. An empty value means no period filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    pub dimension: Option<PeriodDimension>,
    pub value: String,
}

impl PeriodFilter {
    pub fn new(dimension: PeriodDimension, value: impl Into<String>) -> Self {
        Self {
            dimension: Some(dimension),
            value: value.into(),
        }
    }

    /// Builds a filter from a dimension key. Unknown keys produce a filter that
    /// does not restrict anything.
    pub fn from_key(key: &str, value: impl Into<String>) -> Self {
        Self {
            dimension: PeriodDimension::from_key(key),
            value: value.into(),
        }
    }

    /// The dimension and value when both are set.
    pub fn active(&self) -> Option<(PeriodDimension, &str)> {
        match self.dimension {
            Some(dimension) if !self.value.is_empty() => Some((dimension, self.value.as_str())),
            _ => None,
        }
    }
}

/// Leaf-level filters applied during aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub period: PeriodFilter,
    /// Keep only leaves flagged as relevant for the income tax view.
    pub tax_relevant_only: bool,
}

/// Decides whether a node takes part in the filtered totals.
///
/// Branches always pass; the checks only make sense per leaf because sibling
/// leaves can sit in different periods.
pub fn passes(node: &RecordNode, filter: &FilterState) -> bool {
    match node {
        RecordNode::Branch(_) => true,
        RecordNode::Leaf(leaf) => leaf_passes(leaf, filter),
    }
}

pub fn leaf_passes(leaf: &Leaf, filter: &FilterState) -> bool {
    if filter.tax_relevant_only && !leaf.is_tax_relevant() {
        return false;
    }
    if let Some((dimension, wanted)) = filter.period.active() {
        // Leaves without the field are excluded, not defaulted in.
        return leaf
            .period_field(dimension)
            .is_some_and(|field| field.matches(wanted));
    }
    true
}
