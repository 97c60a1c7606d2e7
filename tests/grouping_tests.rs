use assert_fs::prelude::*;
use assert_fs::TempDir;
use demonstrativo_core::grouping::{group_entries, GroupView, LedgerEntry, NO_SEASON_LABEL};
use demonstrativo_core::storage::load_entries_from_path;

const ENTRIES: &str = r#"[
    {"data": "2024-09-10", "safra": "24-25", "descricao": "Venda de bezerros", "valor": 1200},
    {"data": "2025-01-05", "safra": "24-25", "ano": "2025", "descricao": "Ração", "valor": -300.5},
    {"data": "2025-01-20", "descricao": "Vacinas", "valor": "-80"},
    {"safra": "23-24", "ano": 2024, "descricao": "Ajuste", "valor": null},
    {"descricao": "Sem referência", "valor": 10}
]"#;

fn load_sample() -> Vec<LedgerEntry> {
    let temp = TempDir::new().unwrap();
    let file = temp.child("lancamentos.json");
    file.write_str(ENTRIES).unwrap();
    load_entries_from_path(file.path()).unwrap()
}

#[test]
fn season_view_nests_years_under_seasons() {
    let groups = group_entries(&load_sample(), GroupView::SeasonYear);
    let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, ["23-24", "24-25", NO_SEASON_LABEL]);

    let season = &groups[1];
    let years: Vec<_> = season.children.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(years, ["2024", "2025"]);
    assert!((season.total - 899.5).abs() < 1e-9);
    assert_eq!(groups[0].total, 0.0);
}

#[test]
fn month_view_skips_entries_without_any_date_information() {
    let groups = group_entries(&load_sample(), GroupView::YearMonth);
    let years: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(years, ["2024", "2025"]);

    let months: Vec<_> = groups[1].children.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(months, ["Jan"]);
    assert_eq!(groups[1].children[0].entries.len(), 2);
    assert!((groups[1].total + 380.5).abs() < 1e-9);

    let total_entries: usize = groups
        .iter()
        .flat_map(|g| g.children.iter())
        .map(|g| g.entries.len())
        .sum();
    assert_eq!(total_entries, 4);
}

#[test]
fn malformed_entry_files_are_load_errors() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("broken.json");
    file.write_str("{ not json").unwrap();
    let err = load_entries_from_path(file.path()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
