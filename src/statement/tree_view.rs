//! Expansion state and visible rows for the statement tree.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{NamedEntity, NodeKind, RecordNode};

use super::aggregate::node_total;
use super::filter::FilterState;

const ID_SEPARATOR: &str = "::";
/// Accounts sit at this level; nothing below them gets a row or an id.
const ACCOUNT_LEVEL: usize = 2;

/// Stable identifier built from the slugified names along a node's path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    fn root(node: &RecordNode) -> Self {
        NodeId(segment(node, 0))
    }

    fn child(&self, node: &RecordNode, level: usize) -> Self {
        NodeId(format!("{}{}{}", self.0, ID_SEPARATOR, segment(node, level)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The prefix follows the row level, not the field the name came from.
fn segment(node: &RecordNode, level: usize) -> String {
    format!("{}-{}", NodeKind::at_level(level).id_prefix(), slugify(node.name()))
}

/// URL-safe slug: Latin diacritics folded, anything other than ASCII word
/// characters, whitespace and hyphens dropped, whitespace runs turned into a
/// single hyphen, lowercased.
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .chars()
        .map(fold_diacritic)
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-' || ch.is_whitespace())
        .collect();
    let mut slug = String::with_capacity(kept.len());
    let mut pending_space = false;
    for ch in kept.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            slug.push('-');
            pending_space = false;
        }
        slug.push(ch.to_ascii_lowercase());
    }
    slug
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Rows shown under a node at `level`: branches and named leaves, none below
/// the account level. Everything else only feeds the parent's total.
fn displayed_children(node: &RecordNode, level: usize) -> impl Iterator<Item = &RecordNode> {
    let children = if level < ACCOUNT_LEVEL {
        node.children()
    } else {
        &[]
    };
    children.iter().filter(|child| child.label().is_some())
}

/// Ids of every displayable node in the forest.
pub fn collect_node_ids(forest: &[RecordNode]) -> BTreeSet<NodeId> {
    fn walk(node: &RecordNode, id: NodeId, level: usize, ids: &mut BTreeSet<NodeId>) {
        for child in displayed_children(node, level) {
            walk(child, id.child(child, level + 1), level + 1, ids);
        }
        ids.insert(id);
    }

    let mut ids = BTreeSet::new();
    for node in forest.iter().filter(|node| node.label().is_some()) {
        walk(node, NodeId::root(node), 0, &mut ids);
    }
    ids
}

/// Which nodes are expanded; absent ids are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<NodeId>,
}

impl ExpansionState {
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: NodeId) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: &NodeId) {
        self.expanded.remove(id);
    }

    /// Flips a node and returns whether it is now expanded.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn expand_all(&mut self, forest: &[RecordNode]) {
        self.expanded.extend(collect_node_ids(forest));
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.expanded.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRow {
    pub id: NodeId,
    /// 0 for natures, 1 for categories, 2 for accounts.
    pub level: usize,
    pub name: String,
    pub total: f64,
    /// Share of the top-level ancestor's total, as a fraction.
    pub percent: f64,
    pub expandable: bool,
    pub expanded: bool,
}

/// Builds the visible rows. Top-level rows are always present; children appear
/// only under expanded nodes.
pub fn build_rows(
    forest: &[RecordNode],
    selected: &BTreeSet<String>,
    filter: &FilterState,
    expansion: &ExpansionState,
) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for node in forest.iter().filter(|node| node.label().is_some()) {
        let id = NodeId::root(node);
        let total = node_total(node, selected, filter);
        let context = RowContext {
            selected,
            filter,
            expansion,
            top_total: total,
        };
        push_rows(node, id, 0, total, 1.0, &context, &mut rows);
    }
    rows
}

struct RowContext<'a> {
    selected: &'a BTreeSet<String>,
    filter: &'a FilterState,
    expansion: &'a ExpansionState,
    /// Total of the top-level ancestor; descendant percentages divide by it.
    top_total: f64,
}

fn push_rows(
    node: &RecordNode,
    id: NodeId,
    level: usize,
    total: f64,
    percent: f64,
    context: &RowContext<'_>,
    rows: &mut Vec<TreeRow>,
) {
    let expandable = displayed_children(node, level).next().is_some();
    let expanded = context.expansion.is_expanded(&id);
    rows.push(TreeRow {
        id: id.clone(),
        level,
        name: node.name().to_string(),
        total,
        percent,
        expandable,
        expanded,
    });
    if !(expanded && expandable) {
        return;
    }

    for child in displayed_children(node, level) {
        let child_total = node_total(child, context.selected, context.filter);
        let child_percent = share(child_total, context.top_total);
        push_rows(
            child,
            id.child(child, level + 1),
            level + 1,
            child_total,
            child_percent,
            context,
            rows,
        );
    }
}

/// `part / whole`, or zero when the whole is zero.
pub fn share(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole
    }
}

/// Headline box with a nature's filtered total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiBox {
    pub name: String,
    pub total: f64,
}

pub fn kpi_boxes(
    forest: &[RecordNode],
    selected: &BTreeSet<String>,
    filter: &FilterState,
) -> Vec<KpiBox> {
    forest
        .iter()
        .filter(|node| node.label().is_some())
        .map(|node| KpiBox {
            name: node.name().to_string(),
            total: node_total(node, selected, filter),
        })
        .collect()
}

/// Name prefixes that classify top-level natures as revenue or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMarkers {
    pub revenue: String,
    pub expense: String,
}

impl Default for ResultMarkers {
    fn default() -> Self {
        Self {
            revenue: "receita".into(),
            expense: "despesa".into(),
        }
    }
}

/// Bottom line: revenues minus expenses and its share of revenues.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ResultSummary {
    pub revenue: f64,
    pub expense: f64,
    pub result: f64,
    pub percent: f64,
}

pub fn result_summary(kpis: &[KpiBox], markers: &ResultMarkers) -> ResultSummary {
    let revenue_marker = markers.revenue.to_lowercase();
    let expense_marker = markers.expense.to_lowercase();
    let mut revenue = 0.0;
    let mut expense = 0.0;
    for kpi in kpis {
        let name = kpi.name.to_lowercase();
        if name.starts_with(&revenue_marker) {
            revenue += kpi.total;
        }
        if name.starts_with(&expense_marker) {
            expense += kpi.total;
        }
    }
    let result = revenue - expense;
    ResultSummary {
        revenue,
        expense,
        result,
        percent: share(result, revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leaf, NodeKind};

    fn forest() -> Vec<RecordNode> {
        vec![RecordNode::branch(
            NodeKind::Nature,
            "Receita Não Operacional",
            vec![RecordNode::branch(
                NodeKind::Category,
                "Financeiras",
                vec![
                    Leaf::new("Juros Recebidos").with_value("CC – Geral", 3000.0).into(),
                    Leaf::new("Aplicações").with_value("CC – Geral", 1000.0).into(),
                ],
            )],
        )]
    }

    fn all() -> BTreeSet<String> {
        ["CC – Geral".to_string()].into_iter().collect()
    }

    #[test]
    fn slugs_fold_accents_and_punctuation() {
        assert_eq!(slugify("Receita Não Operacional"), "receita-nao-operacional");
        assert_eq!(slugify("CC – Cria"), "cc-cria");
        assert_eq!(slugify("  Nutrição  "), "nutricao");
    }

    #[test]
    fn ids_join_path_segments() {
        let ids = collect_node_ids(&forest());
        assert!(ids.contains(&NodeId::from("nat-receita-nao-operacional")));
        assert!(ids.contains(&NodeId::from(
            "nat-receita-nao-operacional::cat-financeiras::cta-aplicacoes"
        )));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn collapsed_tree_shows_only_top_level() {
        let rows = build_rows(&forest(), &all(), &FilterState::default(), &ExpansionState::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 4000.0);
        assert_eq!(rows[0].percent, 1.0);
        assert!(rows[0].expandable);
        assert!(!rows[0].expanded);
    }

    #[test]
    fn account_percent_is_relative_to_nature() {
        let forest = forest();
        let mut expansion = ExpansionState::default();
        expansion.expand_all(&forest);
        let rows = build_rows(&forest, &all(), &FilterState::default(), &expansion);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].level, 1);
        assert_eq!(rows[1].percent, 1.0);
        assert_eq!(rows[2].level, 2);
        assert_eq!(rows[2].percent, 0.75);
        assert!(!rows[2].expandable);
    }

    #[test]
    fn zero_top_total_yields_zero_percent() {
        let forest = forest();
        let mut expansion = ExpansionState::default();
        expansion.expand_all(&forest);
        let rows = build_rows(&forest, &BTreeSet::new(), &FilterState::default(), &expansion);
        assert_eq!(rows[0].percent, 1.0);
        assert!(rows[1..].iter().all(|row| row.percent == 0.0));
    }

    #[test]
    fn accounts_are_terminal_rows() {
        let forest = crate::domain::forest_from_str(
            r#"[{"natureza": "Receita", "items": [{"categoria": "Leiteria", "items": [
                {"conta": "Leite", "items": [
                    {"conta": "Lote 1", "ccValues": {"A": 10}},
                    {"conta": "Lote 2", "ccValues": {"A": 5}}
                ]}
            ]}]}]"#,
        )
        .unwrap();
        let selected = ["A".to_string()].into_iter().collect();
        let mut expansion = ExpansionState::default();
        expansion.expand_all(&forest);

        let rows = build_rows(&forest, &selected, &FilterState::default(), &expansion);
        assert_eq!(rows.len(), 3);
        let account = &rows[2];
        assert_eq!(account.id.as_str(), "nat-receita::cat-leiteria::cta-leite");
        assert_eq!(account.level, 2);
        assert_eq!(account.total, 15.0);
        assert!(!account.expandable);
        assert!(rows.iter().all(|row| row.level <= 2));
        assert_eq!(collect_node_ids(&forest).len(), 3);
    }

    #[test]
    fn id_prefix_follows_level() {
        let forest = crate::domain::forest_from_str(
            r#"[{"natureza": "Receita", "items": [{"categoria": "Servicos", "ccValues": {"A": 10}}]}]"#,
        )
        .unwrap();
        let ids: Vec<_> = collect_node_ids(&forest).into_iter().collect();
        assert_eq!(
            ids,
            [NodeId::from("nat-receita"), NodeId::from("nat-receita::cat-servicos")]
        );
    }

    #[test]
    fn toggle_flips_expansion() {
        let mut expansion = ExpansionState::default();
        let id = NodeId::from("nat-x");
        assert!(expansion.toggle(id.clone()));
        assert!(expansion.is_expanded(&id));
        assert!(!expansion.toggle(id.clone()));
        assert!(expansion.is_empty());
    }
}
