use crossterm::terminal;

use crate::cli::output::current_preferences;

const FALLBACK_TERMINAL_WIDTH: usize = 100;
const MIN_SHRINK_WIDTH: usize = 12;
const ANSI_RESET: &str = "\u{1b}[0m";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::left(header)
        }
    }

    pub fn max(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Column metadata plus rows of already-formatted cells.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub show_headers: bool,
    pub padding: usize,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            show_headers: true,
            padding: 1,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width per column from headers, cells and column limits.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                match column.max_width {
                    Some(max_width) => width.min(max_width),
                    None => width,
                }
            })
            .collect()
    }

    /// Narrows the first left-aligned column until the table fits `limit`.
    pub fn fit_widths(&self, mut widths: Vec<usize>, limit: usize) -> Vec<usize> {
        let total = rendered_width(&widths, self.padding);
        if total <= limit {
            return widths;
        }
        if let Some(idx) = self
            .columns
            .iter()
            .position(|column| column.alignment == Alignment::Left)
        {
            let excess = total - limit;
            widths[idx] = widths[idx].saturating_sub(excess).max(MIN_SHRINK_WIDTH);
        }
        widths
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(cell, widths[idx], column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        self.render_within(terminal_width())
    }

    pub fn render_within(&self, limit: usize) -> String {
        let widths = self.fit_widths(self.compute_widths(), limit);
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        if self.show_headers {
            let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
            lines.push(self.render_row(&header, &widths));
            lines.push(horizontal_rule(&widths, self.padding));
        }
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }
}

/// Current terminal width, or a fixed fallback when not attached to one.
pub fn terminal_width() -> usize {
    terminal::size()
        .map(|(columns, _)| columns as usize)
        .ok()
        .filter(|columns| *columns > 0)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

fn rendered_width(widths: &[usize], padding: usize) -> usize {
    widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1)
}

/// Character count ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // CSI sequences end with a byte in 0x40..=0x7E.
            for next in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&next) && next != '[' {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

/// Cuts `text` to `width` visible characters with a trailing `…`. Escape
/// sequences are kept, and a reset is appended when any were present.
pub fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut kept = String::with_capacity(text.len());
    let mut visible = 0;
    let mut styled = false;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            styled = true;
            kept.push(ch);
            for next in chars.by_ref() {
                kept.push(next);
                if ('\u{40}'..='\u{7e}').contains(&next) && next != '[' {
                    break;
                }
            }
            continue;
        }
        if visible == width - 1 {
            break;
        }
        kept.push(ch);
        visible += 1;
    }
    kept.push('…');
    if styled {
        kept.push_str(ANSI_RESET);
    }
    kept
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{}{pad}", " ".repeat(remaining)),
        Alignment::Right => format!("{pad}{}{fitted}{pad}", " ".repeat(remaining)),
    }
}

pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let ch = if current_preferences().plain_mode { '-' } else { '─' };
    ch.to_string().repeat(rendered_width(widths, padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_sequences_do_not_count() {
        assert_eq!(visible_width("\u{1b}[1mReceita\u{1b}[0m"), 7);
        assert_eq!(visible_width("Nutrição"), 8);
    }

    #[test]
    fn long_cells_are_truncated_with_ellipsis() {
        assert_eq!(truncate_text("Receita Operacional", 8), "Receita…");
        assert_eq!(render_cell("10", 5, Alignment::Right, 1), "    10 ");
    }

    #[test]
    fn truncating_styled_text_keeps_the_reset() {
        let bold = format!("\u{1b}[1m{}\u{1b}[0m", "x".repeat(80));
        let cut = truncate_text(&bold, 10);
        assert_eq!(visible_width(&cut), 10);
        assert!(cut.starts_with("\u{1b}[1mxxxxxxxxx…"));
        assert!(cut.ends_with(ANSI_RESET));
    }

    #[test]
    fn wide_tables_shrink_the_name_column() {
        let mut table = Table::new(vec![TableColumn::left("Conta"), TableColumn::right("Total")]);
        table.push_row(vec!["x".repeat(80), "1".into()]);
        let widths = table.fit_widths(table.compute_widths(), 40);
        assert_eq!(widths[0], 40 - 5 - 4 - 1);
    }
}
