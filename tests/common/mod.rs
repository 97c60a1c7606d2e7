#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use demonstrativo_core::config::ConfigManager;
use demonstrativo_core::domain::{Leaf, NodeKind, PeriodDescriptor, RecordForest, RecordNode};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn setup_config_manager() -> (ConfigManager, PathBuf) {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (manager, base)
}

pub fn leaf(name: &str, values: &[(&str, f64)]) -> Leaf {
    values
        .iter()
        .fold(Leaf::new(name), |leaf, (cc, value)| leaf.with_value(*cc, *value))
}

/// Three-level tree with mixed periods, tax flags and cost centers.
pub fn farm_forest() -> RecordForest {
    vec![
        RecordNode::branch(
            NodeKind::Nature,
            "Receita Operacional",
            vec![RecordNode::branch(
                NodeKind::Category,
                "Vendas",
                vec![
                    leaf("Venda Gado Corte", &[("CC-A", 100.0), ("CC-B", 50.0)])
                        .with_period(PeriodDescriptor::default().with_season("23-24").with_year(2024))
                        .into(),
                    leaf("Venda Bezerros", &[("CC-A", 30.0)])
                        .with_period(PeriodDescriptor::default().with_season("24-25").with_year(2025))
                        .tax_relevant(true)
                        .into(),
                ],
            )],
        ),
        RecordNode::branch(
            NodeKind::Nature,
            "Despesa Operacional",
            vec![RecordNode::branch(
                NodeKind::Category,
                "Nutrição",
                vec![leaf("Ração", &[("CC-B", 40.0), ("CC-C", 10.0)])
                    .with_period(
                        PeriodDescriptor::default()
                            .with_season("24-25")
                            .with_year(vec![2024, 2025]),
                    )
                    .into()],
            )],
        ),
    ]
}

pub fn selected(labels: &[&str]) -> std::collections::BTreeSet<String> {
    labels.iter().map(|label| label.to_string()).collect()
}
