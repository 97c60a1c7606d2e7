use demonstrativo_core::domain::{forest_from_str, Branch, NodeKind, PeriodDimension, RecordNode};
use demonstrativo_core::statement::{
    forest_total, FilterState, PeriodFilter, PeriodIndex,
};

const PAYLOAD: &str = r#"[
  {"natureza": "Receita Operacional", "items": [
    {"categoria": "Vendas", "items": [
      {"conta": "Venda Gado Corte",
       "ccValues": {"CC – Cria": "125000", "CC – Recria": null, "CC – Geral": true},
       "flags": {"impostoRenda": 1},
       "periodo": {"safra": "24-25", "ano": 2025.0, "mes": "2025-3"}},
      {"conta": "Venda Bezerros",
       "ccValues": {"CC – Cria": 54000},
       "periodo": {"ano": [2024, 2025]}}
    ]}
  ]}
]"#;

#[test]
fn dirty_values_become_zero() {
    let forest = forest_from_str(PAYLOAD).unwrap();
    let leaf = forest[0].children()[0].children()[0].as_leaf().unwrap();
    assert_eq!(leaf.value_for("CC – Cria"), 125000.0);
    assert_eq!(leaf.value_for("CC – Recria"), 0.0);
    assert_eq!(leaf.value_for("CC – Geral"), 0.0);
    assert!(leaf.is_tax_relevant());
}

#[test]
fn node_kinds_follow_name_fields() {
    let forest = forest_from_str(PAYLOAD).unwrap();
    assert!(matches!(&forest[0], RecordNode::Branch(Branch { kind: NodeKind::Nature, .. })));
    assert!(matches!(
        &forest[0].children()[0],
        RecordNode::Branch(Branch { kind: NodeKind::Category, .. })
    ));
    assert!(forest[0].children()[0].children()[0].as_leaf().is_some());
}

#[test]
fn float_years_compare_as_integers() {
    let forest = forest_from_str(PAYLOAD).unwrap();
    let all = ["CC – Cria".to_string()].into_iter().collect();
    let filter = FilterState {
        period: PeriodFilter::new(PeriodDimension::Year, "2025"),
        ..FilterState::default()
    };
    assert_eq!(forest_total(&forest, &all, &filter), 125000.0 + 54000.0);
}

#[test]
fn year_discovery_deduplicates_multi_values() {
    let json = r#"[{"natureza": "Receita", "items": [
        {"conta": "a", "ccValues": {"X": 1}, "periodo": {"ano": 2024}},
        {"conta": "b", "ccValues": {"X": 1}, "periodo": {"ano": 2025}},
        {"conta": "c", "ccValues": {"X": 1}, "periodo": {"ano": [2024, 2025]}}
    ]}]"#;
    let index = PeriodIndex::build(&forest_from_str(json).unwrap());
    assert_eq!(index.years, vec!["2024".to_string(), "2025".to_string()]);
    assert!(index.seasons.is_empty());
    assert_eq!(index.first_available(), Some(PeriodDimension::Year));
}

#[test]
fn non_array_payload_is_an_empty_forest() {
    assert!(forest_from_str(r#"{"natureza": "Receita"}"#).unwrap().is_empty());
}

#[test]
fn nameless_branch_is_rejected() {
    assert!(forest_from_str(r#"[{"items": []}]"#).is_err());
}

#[test]
fn forest_serializes_back_to_wire_names() {
    let forest = forest_from_str(PAYLOAD).unwrap();
    let json = serde_json::to_string(&forest).unwrap();
    assert!(json.contains("\"natureza\":\"Receita Operacional\""));
    assert!(json.contains("\"ccValues\""));
    let again = forest_from_str(&json).unwrap();
    assert!(matches!(again[0], RecordNode::Branch(_)));
}
