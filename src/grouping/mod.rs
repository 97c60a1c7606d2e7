//! Groups flat ledger entries into two-level trees, by season and year or by
//! year and month.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::currency::MONTH_ABBREVIATIONS_PT;
use crate::domain::common::{safe_number, scalar_to_string, truthy};

pub const NO_SEASON_LABEL: &str = "Sem safra";
pub const NO_YEAR_LABEL: &str = "s/ano";
pub const NO_MONTH_LABEL: &str = "Sem mês";
pub const NO_DESCRIPTION_LABEL: &str = "(sem descrição)";

/// A single posting ("lançamento").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct LedgerEntry {
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "safra", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(rename = "ano", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub amount: f64,
}

impl LedgerEntry {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount: if amount.is_finite() { amount } else { 0.0 },
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn in_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn in_year(mut self, year: impl ToString) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            NO_DESCRIPTION_LABEL
        } else {
            &self.description
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    safra: Value,
    #[serde(default)]
    ano: Value,
    #[serde(default)]
    descricao: Value,
    #[serde(default)]
    valor: Value,
}

impl From<RawEntry> for LedgerEntry {
    fn from(raw: RawEntry) -> Self {
        // Falsy season/year values count as missing.
        let present = |value: &Value| {
            if truthy(value) {
                scalar_to_string(value)
            } else {
                None
            }
        };
        LedgerEntry {
            date: raw.data.as_str().and_then(parse_entry_date),
            season: present(&raw.safra),
            year: present(&raw.ano),
            description: scalar_to_string(&raw.descricao).unwrap_or_default(),
            amount: safe_number(&raw.valor),
        }
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
pub fn parse_entry_date(text: &str) -> Option<NaiveDate> {
    let day = text.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Which two-level grouping to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupView {
    #[default]
    #[serde(rename = "safra")]
    SeasonYear,
    #[serde(rename = "mes")]
    YearMonth,
}

impl GroupView {
    /// `"mes"` selects the calendar view; anything else the season view.
    pub fn from_key(key: &str) -> Self {
        if key.trim().eq_ignore_ascii_case("mes") {
            GroupView::YearMonth
        } else {
            GroupView::SeasonYear
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            GroupView::SeasonYear => "safra",
            GroupView::YearMonth => "mes",
        }
    }
}

impl fmt::Display for GroupView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupView::SeasonYear => f.write_str("Safra / Ano"),
            GroupView::YearMonth => f.write_str("Ano / Mês"),
        }
    }
}

/// A labelled group with its total. Outer groups hold children, inner groups
/// hold the entries themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupNode {
    pub label: String,
    pub total: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GroupNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<LedgerEntry>,
}

impl GroupNode {
    fn leaf(label: String, entries: Vec<LedgerEntry>) -> Self {
        let total = entries.iter().map(|entry| entry.amount).sum();
        Self {
            label,
            total,
            children: Vec::new(),
            entries,
        }
    }

    fn parent(label: String, children: Vec<GroupNode>) -> Self {
        let total = children.iter().map(|child| child.total).sum();
        Self {
            label,
            total,
            children,
            entries: Vec::new(),
        }
    }
}

pub fn group_entries(entries: &[LedgerEntry], view: GroupView) -> Vec<GroupNode> {
    match view {
        GroupView::SeasonYear => group_by_season_year(entries),
        GroupView::YearMonth => group_by_year_month(entries),
    }
}

/// Season first (`Sem safra` when absent), then the year field, the date's year
/// or `s/ano`. Both levels sort as strings.
pub fn group_by_season_year(entries: &[LedgerEntry]) -> Vec<GroupNode> {
    let mut groups: BTreeMap<String, BTreeMap<String, Vec<LedgerEntry>>> = BTreeMap::new();
    for entry in entries {
        let season = entry
            .season
            .clone()
            .unwrap_or_else(|| NO_SEASON_LABEL.to_string());
        let year = entry
            .year
            .clone()
            .or_else(|| entry.date.map(|date| date.year().to_string()))
            .unwrap_or_else(|| NO_YEAR_LABEL.to_string());
        groups
            .entry(season)
            .or_default()
            .entry(year)
            .or_default()
            .push(entry.clone());
    }

    debug!(seasons = groups.len(), "Grouped entries by season");
    groups
        .into_iter()
        .map(|(season, years)| {
            let children = years
                .into_iter()
                .map(|(year, entries)| GroupNode::leaf(year, entries))
                .collect();
            GroupNode::parent(season, children)
        })
        .collect()
}

/// Calendar year first, then month. Entries with neither a date nor a year are
/// skipped; entries without a date land under `Sem mês`.
pub fn group_by_year_month(entries: &[LedgerEntry]) -> Vec<GroupNode> {
    let mut groups: BTreeMap<String, BTreeMap<i32, Vec<LedgerEntry>>> = BTreeMap::new();
    for entry in entries {
        let year = match (entry.date, entry.year.as_ref()) {
            (Some(date), _) => date.year().to_string(),
            (None, Some(year)) => year.clone(),
            (None, None) => continue,
        };
        let month = entry.date.map(|date| date.month0() as i32).unwrap_or(-1);
        groups
            .entry(year)
            .or_default()
            .entry(month)
            .or_default()
            .push(entry.clone());
    }

    debug!(years = groups.len(), "Grouped entries by month");
    groups
        .into_iter()
        .map(|(year, months)| {
            let children = months
                .into_iter()
                .map(|(month, entries)| GroupNode::leaf(month_label(month).to_string(), entries))
                .collect();
            GroupNode::parent(year, children)
        })
        .collect()
}

/// Abbreviated pt-BR month for a zero-based index, `Sem mês` otherwise.
pub fn month_label(month0: i32) -> &'static str {
    usize::try_from(month0)
        .ok()
        .and_then(|index| MONTH_ABBREVIATIONS_PT.get(index).copied())
        .unwrap_or(NO_MONTH_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_entries_are_coerced() {
        let entry: LedgerEntry = serde_json::from_str(
            r#"{"data": "2025-03-14", "safra": "", "ano": 2025, "descricao": null, "valor": "12.5"}"#,
        )
        .unwrap();
        assert_eq!(entry.date, Some(date(2025, 3, 14)));
        assert_eq!(entry.season, None);
        assert_eq!(entry.year.as_deref(), Some("2025"));
        assert_eq!(entry.display_description(), NO_DESCRIPTION_LABEL);
        assert_eq!(entry.amount, 12.5);
    }

    #[test]
    fn unparsable_dates_are_absent() {
        assert_eq!(parse_entry_date("14/03/2025"), None);
        assert_eq!(parse_entry_date("2025-03-14T10:00:00"), Some(date(2025, 3, 14)));
    }

    #[test]
    fn season_view_uses_fallback_labels() {
        let entries = vec![
            LedgerEntry::new("Venda", 100.0).in_season("24-25").on(date(2024, 9, 1)),
            LedgerEntry::new("Ração", 50.0),
        ];
        let groups = group_by_season_year(&entries);
        assert_eq!(groups[0].label, "24-25");
        assert_eq!(groups[0].children[0].label, "2024");
        assert_eq!(groups[1].label, NO_SEASON_LABEL);
        assert_eq!(groups[1].children[0].label, NO_YEAR_LABEL);
    }

    #[test]
    fn month_view_sorts_months_numerically() {
        let entries = vec![
            LedgerEntry::new("a", 1.0).on(date(2025, 11, 2)),
            LedgerEntry::new("b", 2.0).on(date(2025, 2, 2)),
            LedgerEntry::new("c", 4.0).in_year(2025),
            LedgerEntry::new("skipped", 8.0),
        ];
        let groups = group_by_year_month(&entries);
        assert_eq!(groups.len(), 1);
        let labels: Vec<_> = groups[0].children.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, [NO_MONTH_LABEL, "Fev", "Nov"]);
        assert_eq!(groups[0].total, 7.0);
    }

    #[test]
    fn view_key_defaults_to_season() {
        assert_eq!(GroupView::from_key("mes"), GroupView::YearMonth);
        assert_eq!(GroupView::from_key("qualquer"), GroupView::SeasonYear);
    }
}
