use std::collections::BTreeSet;

use crate::domain::RecordNode;

/// Collects every cost-center label used by a leaf, sorted and deduplicated.
pub fn discover_cost_centers(forest: &[RecordNode]) -> Vec<String> {
    let mut found = BTreeSet::new();
    for node in forest {
        node.for_each_leaf(&mut |leaf| {
            found.extend(leaf.cost_centers().map(str::to_string));
        });
    }
    found.into_iter().collect()
}

/// The known cost centers and the subset currently included in totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostCenterSelection {
    universe: Vec<String>,
    selected: BTreeSet<String>,
}

impl CostCenterSelection {
    /// Starts with every cost center of the universe selected.
    pub fn all_of(universe: Vec<String>) -> Self {
        let mut deduped = Vec::with_capacity(universe.len());
        for cost_center in universe {
            if !deduped.contains(&cost_center) {
                deduped.push(cost_center);
            }
        }
        let selected = deduped.iter().cloned().collect();
        Self {
            universe: deduped,
            selected,
        }
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn contains(&self, cost_center: &str) -> bool {
        self.selected.contains(cost_center)
    }

    pub fn is_known(&self, cost_center: &str) -> bool {
        self.universe.iter().any(|known| known == cost_center)
    }

    /// Selects a known cost center. Unknown labels are ignored and reported
    /// through the return value.
    pub fn select(&mut self, cost_center: &str) -> bool {
        if !self.is_known(cost_center) {
            return false;
        }
        self.selected.insert(cost_center.to_string());
        true
    }

    pub fn deselect(&mut self, cost_center: &str) -> bool {
        self.selected.remove(cost_center)
    }

    pub fn select_all(&mut self) {
        self.selected = self.universe.iter().cloned().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    pub fn all_selected(&self) -> bool {
        self.selected.len() == self.universe.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> CostCenterSelection {
        CostCenterSelection::all_of(vec!["CC – Cria".into(), "CC – Recria".into()])
    }

    #[test]
    fn starts_fully_selected() {
        let selection = selection();
        assert!(selection.all_selected());
        assert!(selection.contains("CC – Cria"));
    }

    #[test]
    fn unknown_cost_centers_are_not_selected() {
        let mut selection = selection();
        selection.select_none();
        assert!(!selection.select("CC – Inexistente"));
        assert!(selection.selected().is_empty());
        assert!(selection.select("CC – Recria"));
        assert!(!selection.all_selected());
    }

    #[test]
    fn duplicate_override_entries_collapse() {
        let selection = CostCenterSelection::all_of(vec!["A".into(), "A".into(), "B".into()]);
        assert_eq!(selection.universe(), ["A".to_string(), "B".to_string()]);
        assert!(selection.all_selected());
    }
}
