use crate::domain::{Leaf, NodeKind, PeriodDescriptor, RecordForest, RecordNode};

const SAMPLE_SEASON: &str = "24-25";
const SAMPLE_YEAR: i32 = 2025;

fn account(name: &str, values: &[(&str, f64)], tax_relevant: bool) -> RecordNode {
    let leaf = values
        .iter()
        .fold(Leaf::new(name), |leaf, (cost_center, value)| {
            leaf.with_value(*cost_center, *value)
        })
        .tax_relevant(tax_relevant)
        .with_period(
            PeriodDescriptor::default()
                .with_season(SAMPLE_SEASON)
                .with_year(SAMPLE_YEAR),
        );
    leaf.into()
}

fn category(name: &str, accounts: Vec<RecordNode>) -> RecordNode {
    RecordNode::branch(NodeKind::Category, name, accounts)
}

fn nature(name: &str, categories: Vec<RecordNode>) -> RecordNode {
    RecordNode::branch(NodeKind::Nature, name, categories)
}

/// Demonstration statement shown when no data source is configured: four
/// natures of a cattle operation in season 24-25.
pub fn sample_forest() -> RecordForest {
    vec![
        nature(
            "Receita Operacional",
            vec![
                category(
                    "Vendas",
                    vec![
                        account(
                            "Venda Gado Corte",
                            &[("CC – Cria", 125000.0), ("CC – Recria", 88000.0)],
                            false,
                        ),
                        account(
                            "Venda Bezerros",
                            &[("CC – Cria", 54000.0), ("CC – Recria", 22000.0)],
                            false,
                        ),
                    ],
                ),
                category(
                    "Serviços",
                    vec![account("Arrendamento", &[("CC – Geral", 12000.0)], true)],
                ),
            ],
        ),
        nature(
            "Receita Não Operacional",
            vec![category(
                "Financeiras",
                vec![account("Juros Recebidos", &[("CC – Geral", 3500.0)], true)],
            )],
        ),
        nature(
            "Despesa Operacional",
            vec![
                category(
                    "Nutrição",
                    vec![
                        account(
                            "Ração",
                            &[("CC – Recria", 38000.0), ("CC – Engorda", 21000.0)],
                            false,
                        ),
                        account(
                            "Sal Mineral",
                            &[("CC – Cria", 9000.0), ("CC – Recria", 6000.0)],
                            false,
                        ),
                    ],
                ),
                category(
                    "Sanidade",
                    vec![account(
                        "Vacinas",
                        &[("CC – Cria", 4500.0), ("CC – Recria", 4100.0)],
                        false,
                    )],
                ),
            ],
        ),
        nature(
            "Despesa Não Operacional",
            vec![
                category(
                    "Financeiras",
                    vec![account("Juros Pagos", &[("CC – Geral", 4200.0)], true)],
                ),
                category(
                    "Administrativas",
                    vec![account("Contabilidade", &[("CC – Geral", 7000.0)], true)],
                ),
            ],
        ),
    ]
}
