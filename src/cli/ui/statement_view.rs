//! Text rendering of statement views and entry groupings.

use std::io::{self, Write};

use colored::Colorize;

use crate::cli::output::current_preferences;
use crate::config::Config;
use crate::currency::{format_currency_value, format_date, format_percent, CurrencyCode, LocaleConfig};
use crate::grouping::GroupNode;
use crate::statement::{option_label, StatementRenderer, StatementView, TreeRow};

use super::table_renderer::{Table, TableColumn};

const INDENT: &str = "  ";
const NAME_COLUMN_MAX: usize = 60;

/// Currency and locale used to print amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFormat {
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
}

impl ViewFormat {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency: config.currency_code(),
            locale: config.locale_config(),
        }
    }

    fn money(&self, amount: f64) -> String {
        format_currency_value(amount, &self.currency, &self.locale)
    }

    fn percent(&self, fraction: f64) -> String {
        format_percent(fraction, &self.locale)
    }
}

impl Default for ViewFormat {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Prints every view it receives while enabled.
pub struct TerminalRenderer {
    pub format: ViewFormat,
    pub enabled: bool,
}

impl TerminalRenderer {
    pub fn new(format: ViewFormat, enabled: bool) -> Self {
        Self { format, enabled }
    }
}

impl StatementRenderer for TerminalRenderer {
    fn render(&mut self, view: &StatementView) {
        if !self.enabled {
            return;
        }
        let mut stdout = io::stdout().lock();
        // A closed stdout only loses the printout.
        let _ = writeln!(stdout, "{}", render_view(view, &self.format));
    }
}

fn row_marker(row: &TreeRow, plain: bool) -> &'static str {
    match (row.expandable, row.expanded, plain) {
        (false, _, _) => " ",
        (true, true, false) => "−",
        (true, true, true) => "-",
        (true, false, _) => "+",
    }
}

fn row_name(row: &TreeRow, plain: bool) -> String {
    format!(
        "{}{} {}",
        INDENT.repeat(row.level),
        row_marker(row, plain),
        row.name
    )
}

pub fn render_kpis(view: &StatementView, format: &ViewFormat) -> String {
    view.kpis
        .iter()
        .map(|kpi| format!("[{}: {}]", kpi.name, format.money(kpi.total)))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_filters(view: &StatementView) -> String {
    let period = match view.period_dimension {
        Some(dimension) if !view.period_value.is_empty() => format!(
            "{} {}",
            dimension.label(),
            option_label(dimension, &view.period_value)
        ),
        Some(dimension) => format!("{} (todos)", dimension.label()),
        None => "sem filtro de período".to_string(),
    };
    let selected = view.cost_centers.iter().filter(|cc| cc.selected).count();
    format!(
        "Período: {period} | Centros de custo: {selected}/{} | Apenas IR: {}",
        view.cost_centers.len(),
        if view.tax_relevant_only { "sim" } else { "não" }
    )
}

pub fn render_result(view: &StatementView, format: &ViewFormat) -> String {
    format!(
        "Resultado: {} ({})",
        format.money(view.result.result),
        format.percent(view.result.percent)
    )
}

/// Filters line, KPI boxes, the row table and the result line.
pub fn render_view(view: &StatementView, format: &ViewFormat) -> String {
    let plain = current_preferences().plain_mode;
    let mut table = Table::new(vec![
        TableColumn::left("Conta").max(NAME_COLUMN_MAX),
        TableColumn::right("Total"),
        TableColumn::right("%"),
    ]);
    for row in &view.rows {
        let name = row_name(row, plain);
        let name = if row.level == 0 && !plain {
            name.bold().to_string()
        } else {
            name
        };
        table.push_row(vec![name, format.money(row.total), format.percent(row.percent)]);
    }

    let mut sections = vec![render_filters(view)];
    if view.kpis.is_empty() {
        sections.push("Nenhum dado para exibir.".to_string());
    } else {
        sections.push(render_kpis(view, format));
        sections.push(table.render());
    }
    sections.push(render_result(view, format));
    sections.join("\n")
}

/// Indented outline of grouped entries with per-group totals.
pub fn render_groups(groups: &[GroupNode], format: &ViewFormat) -> String {
    if groups.is_empty() {
        return "Nenhum dado para exibir.".to_string();
    }
    let mut lines = Vec::new();
    for group in groups {
        push_group(group, 0, format, &mut lines);
    }
    lines.join("\n")
}

fn push_group(group: &GroupNode, depth: usize, format: &ViewFormat, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}{} — total {}",
        INDENT.repeat(depth),
        group.label,
        format.money(group.total)
    ));
    for child in &group.children {
        push_group(child, depth + 1, format, lines);
    }
    for entry in &group.entries {
        let date = entry
            .date
            .map(|date| format_date(&format.locale, date))
            .unwrap_or_default();
        let season = entry
            .season
            .as_ref()
            .map(|season| format!(" [{season}]"))
            .unwrap_or_default();
        lines.push(format!(
            "{}• {} — {}{} — {}",
            INDENT.repeat(depth + 1),
            date,
            entry.display_description(),
            season,
            format.money(entry.amount)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{KpiBox, NodeId, ResultSummary};

    fn row(level: usize, expandable: bool, expanded: bool) -> TreeRow {
        TreeRow {
            id: NodeId::from("nat-x"),
            level,
            name: "Vendas".into(),
            total: 0.0,
            percent: 0.0,
            expandable,
            expanded,
        }
    }

    #[test]
    fn rows_are_indented_with_markers() {
        assert_eq!(row_name(&row(1, true, false), true), "  + Vendas");
        assert_eq!(row_name(&row(1, true, true), true), "  - Vendas");
        assert_eq!(row_name(&row(2, false, false), false), "      Vendas");
    }

    #[test]
    fn result_line_uses_locale() {
        let view = StatementView {
            kpis: vec![KpiBox {
                name: "Receita Operacional".into(),
                total: 100.0,
            }],
            result: ResultSummary {
                revenue: 100.0,
                expense: 25.0,
                result: 75.0,
                percent: 0.75,
            },
            ..StatementView::default()
        };
        let format = ViewFormat::default();
        assert_eq!(render_result(&view, &format), "Resultado: R$ 75,00 (75,0%)");
        assert_eq!(render_kpis(&view, &format), "[Receita Operacional: R$ 100,00]");
    }
}
