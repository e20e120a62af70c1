use clap::ValueEnum;
use comfy_table::{Attribute, Cell as TextCell, ContentArrangement, Table as TextTable};

use crate::table::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
}

pub fn render(table: &Table, format: OutputFormat, max_column_width: usize) -> String {
    match format {
        OutputFormat::Table => render_text(table, max_column_width),
        OutputFormat::Csv => render_csv(table),
    }
}

fn render_text(table: &Table, max_column_width: usize) -> String {
    let mut out = TextTable::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(
        table
            .columns()
            .iter()
            .map(|c| TextCell::new(c).add_attribute(Attribute::Bold)),
    );
    for row in table.rows() {
        out.add_row(
            row.iter()
                .map(|c| get_visible_name(c.to_string(), max_column_width)),
        );
    }
    out.to_string()
}

fn render_csv(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.nrows() + 1);
    lines.push(
        table
            .columns()
            .iter()
            .map(|c| wrap_cell_content(c))
            .collect::<Vec<String>>()
            .join(","),
    );
    for row in table.rows() {
        lines.push(
            row.iter()
                .map(|c| wrap_cell_content(&c.to_string()))
                .collect::<Vec<String>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn get_visible_name(name: String, width: usize) -> String {
    if width < 3 {
        return "".to_string();
    }
    if name.chars().count() > width {
        let mut reduced_name: String = name.chars().take(width - 3).collect();
        reduced_name.push_str("...");
        return reduced_name;
    }
    name
}

fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.chars().any(|c| c == '"');
    let needs_wrapping = needs_escaping || c.chars().any(|c| matches!(c, ' ' | '\t' | ',' | '\n'));
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}
