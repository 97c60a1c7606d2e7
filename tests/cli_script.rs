mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cli(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("demonstrativo_cli").expect("binary exists");
    cmd.env("DEMONSTRATIVO_CLI_SCRIPT", "1")
        .env("DEMONSTRATIVO_HOME", base)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_prints_demo_statement() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("demo\nperiod ano 2025\nshow\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 4 natures"))
        .stdout(predicate::str::contains("Receita Operacional"))
        .stdout(predicate::str::contains("R$ 301.000,00"))
        .stdout(predicate::str::contains("Resultado:"));
}

#[test]
fn script_mode_starts_empty_without_data_file() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("show\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum dado para exibir."));
}

#[test]
fn unknown_commands_get_suggestions() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("shwo\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command `shwo`"))
        .stdout(predicate::str::contains("Did you mean `show`?"));
}

#[test]
fn load_reads_forest_files_and_reports_failures() {
    let base = common::temp_base();
    let forest = base.join("forest.json");
    fs::write(
        &forest,
        r#"[{"natureza": "Receita", "items": [{"categoria": "Vendas", "items": [
            {"conta": "Leite", "ccValues": {"CC-A": "1200"}, "periodo": {"safra": "24-25"}}
        ]}]}]"#,
    )
    .unwrap();
    let script = format!(
        "load {}\nload {}\nexit\n",
        forest.display(),
        base.join("missing.json").display()
    );

    cli(&base)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 1 natures"))
        .stdout(predicate::str::contains("R$ 1.200,00"))
        .stdout(predicate::str::contains("Failed to load statements"));
}

#[test]
fn group_command_prints_season_groups() {
    let base = common::temp_base();
    let entries = base.join("entries.json");
    fs::write(
        &entries,
        r#"[{"data": "2024-09-10", "safra": "24-25", "descricao": "Venda", "valor": 500},
            {"descricao": "Avulso", "valor": 20}]"#,
    )
    .unwrap();

    cli(&base)
        .write_stdin(format!("group safra {}\n", entries.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Safra / Ano"))
        .stdout(predicate::str::contains("24-25"))
        .stdout(predicate::str::contains("Sem safra"));
}

#[test]
fn config_changes_are_written_under_the_home_dir() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("config set currency usd\nexit\n")
        .assert()
        .success();
    let stored = fs::read_to_string(base.join("config").join("config.json")).unwrap();
    assert!(stored.contains("\"USD\""));
}
