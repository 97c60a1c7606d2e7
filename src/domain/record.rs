//! Domain types for the statement record tree.
//!
//! A forest of natures, categories and accounts whose leaves carry values per
//! cost center. The wire format is the JSON produced by the bookkeeping
//! backend; the node variant is decided once while decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::common::{safe_number, truthy, NamedEntity};
use super::period::{PeriodDescriptor, PeriodDimension, PeriodValue};
use crate::errors::{Result, StatementError};

pub type RecordForest = Vec<RecordNode>;

/// Level of a branch inside the statement hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Nature,
    Category,
    Account,
}

impl NodeKind {
    /// Kind shown at a row level: natures at 0, categories at 1, accounts
    /// below.
    pub fn at_level(level: usize) -> Self {
        match level {
            0 => NodeKind::Nature,
            1 => NodeKind::Category,
            _ => NodeKind::Account,
        }
    }

    /// Prefix used when building stable node identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::Nature => "nat",
            NodeKind::Category => "cat",
            NodeKind::Account => "cta",
        }
    }
}

/// A node of the record tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum RecordNode {
    Branch(Branch),
    Leaf(Leaf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub kind: NodeKind,
    pub name: String,
    pub children: Vec<RecordNode>,
}

/// Account line carrying values per cost center.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Leaf {
    /// Account name; value-only leaves nested under an account have none.
    pub name: Option<String>,
    pub values: BTreeMap<String, f64>,
    pub flags: LeafFlags,
    pub period: Option<PeriodDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeafFlags {
    /// Relevant for the income tax ("Imposto de Renda") view.
    #[serde(
        rename = "impostoRenda",
        default,
        deserialize_with = "lenient_flag",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub tax_relevant: bool,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl RecordNode {
    pub fn branch(kind: NodeKind, name: impl Into<String>, children: Vec<RecordNode>) -> Self {
        RecordNode::Branch(Branch {
            kind,
            name: name.into(),
            children,
        })
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            RecordNode::Leaf(leaf) => Some(leaf),
            RecordNode::Branch(_) => None,
        }
    }

    pub fn children(&self) -> &[RecordNode] {
        match self {
            RecordNode::Branch(branch) => &branch.children,
            RecordNode::Leaf(_) => &[],
        }
    }

    /// Display name, absent only for value-only leaves.
    pub fn label(&self) -> Option<&str> {
        match self {
            RecordNode::Branch(branch) => Some(branch.name.as_str()),
            RecordNode::Leaf(leaf) => leaf.name.as_deref(),
        }
    }

    /// Visits every leaf below (and including) this node in document order.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a Leaf)) {
        match self {
            RecordNode::Leaf(leaf) => visit(leaf),
            RecordNode::Branch(branch) => {
                for child in &branch.children {
                    child.for_each_leaf(visit);
                }
            }
        }
    }
}

impl NamedEntity for RecordNode {
    fn name(&self) -> &str {
        self.label().unwrap_or("")
    }
}

impl From<Leaf> for RecordNode {
    fn from(leaf: Leaf) -> Self {
        RecordNode::Leaf(leaf)
    }
}

impl Leaf {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A value-only leaf without an account name.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, cost_center: impl Into<String>, value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        self.values.insert(cost_center.into(), value);
        self
    }

    pub fn tax_relevant(mut self, relevant: bool) -> Self {
        self.flags.tax_relevant = relevant;
        self
    }

    pub fn with_period(mut self, period: PeriodDescriptor) -> Self {
        self.period = Some(period);
        self
    }

    pub fn is_tax_relevant(&self) -> bool {
        self.flags.tax_relevant
    }

    pub fn value_for(&self, cost_center: &str) -> f64 {
        self.values.get(cost_center).copied().unwrap_or(0.0)
    }

    pub fn cost_centers(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn period_field(&self, dimension: PeriodDimension) -> Option<&PeriodValue> {
        self.period.as_ref().and_then(|period| period.field(dimension))
    }
}

/// Decodes a record forest from JSON. A payload that is not an array yields an
/// empty forest.
pub fn forest_from_value(value: Value) -> Result<RecordForest> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        other => {
            tracing::warn!(
                kind = json_kind(&other),
                "statement payload is not an array; using an empty forest"
            );
            Ok(Vec::new())
        }
    }
}

pub fn forest_from_str(json: &str) -> Result<RecordForest> {
    let value: Value = serde_json::from_str(json)?;
    forest_from_value(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Wire representation shared by every node shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    natureza: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<RecordNode>>,
    #[serde(rename = "ccValues", default, skip_serializing_if = "Option::is_none")]
    cc_values: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<LeafFlags>,
    #[serde(rename = "periodo", default, skip_serializing_if = "Option::is_none")]
    period: Option<PeriodDescriptor>,
}

impl TryFrom<RawNode> for RecordNode {
    type Error = StatementError;

    fn try_from(raw: RawNode) -> std::result::Result<Self, Self::Error> {
        if let Some(cc_values) = raw.cc_values {
            if raw.items.as_ref().is_some_and(|items| !items.is_empty()) {
                tracing::warn!(
                    account = raw.conta.as_deref().unwrap_or(""),
                    "leaf record carries child items; they are ignored"
                );
            }
            let values = cc_values
                .iter()
                .map(|(cost_center, value)| (cost_center.clone(), safe_number(value)))
                .collect();
            return Ok(RecordNode::Leaf(Leaf {
                name: raw.conta.or(raw.categoria).or(raw.natureza),
                values,
                flags: raw.flags.unwrap_or_default(),
                period: raw.period,
            }));
        }

        let (kind, name) = if let Some(name) = raw.natureza {
            (NodeKind::Nature, name)
        } else if let Some(name) = raw.categoria {
            (NodeKind::Category, name)
        } else if let Some(name) = raw.conta {
            (NodeKind::Account, name)
        } else {
            return Err(StatementError::InvalidRecord(
                "record node has neither a name field nor cost-center values".into(),
            ));
        };

        Ok(RecordNode::Branch(Branch {
            kind,
            name,
            children: raw.items.unwrap_or_default(),
        }))
    }
}

impl From<RecordNode> for RawNode {
    fn from(node: RecordNode) -> Self {
        match node {
            RecordNode::Branch(branch) => {
                let mut raw = RawNode {
                    items: Some(branch.children),
                    ..RawNode::default()
                };
                match branch.kind {
                    NodeKind::Nature => raw.natureza = Some(branch.name),
                    NodeKind::Category => raw.categoria = Some(branch.name),
                    NodeKind::Account => raw.conta = Some(branch.name),
                }
                raw
            }
            RecordNode::Leaf(leaf) => RawNode {
                conta: leaf.name,
                cc_values: Some(
                    leaf.values
                        .into_iter()
                        .map(|(cost_center, value)| (cost_center, Value::from(value)))
                        .collect(),
                ),
                flags: Some(leaf.flags),
                period: leaf.period,
                ..RawNode::default()
            },
        }
    }
}

fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(truthy(&raw))
}
