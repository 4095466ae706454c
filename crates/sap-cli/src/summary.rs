use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sap_map::RepositoryStatistics;
use sap_model::ConformityStatus;
use sap_validate::AuditStatistics;

use crate::types::{AuditRun, RuleSummary};

pub fn print_audit_summary(run: &AuditRun) {
    println!(
        "Rules: {} (sha256 {})",
        run.rules_path.display(),
        short_digest(&run.rules_sha256)
    );
    println!(
        "Records: {} audited, {} skipped",
        run.results.len(),
        run.skipped_rows
    );
    if let Some(path) = &run.output {
        println!("Report: {}", path.display());
    }
    println!("{}", status_table(&run.statistics));
    println!("{}", criteria_table(&run.statistics));
    println!(
        "Conformity rate: {:.1}%  Strict rate: {:.1}%",
        run.statistics.conformity_rate_pct, run.statistics.strict_rate_pct
    );
    let quality = &run.statistics.match_quality;
    println!(
        "Procedure matches: {} perfect, {} good, {} weak, {} none",
        quality.perfect, quality.good, quality.weak, quality.none
    );
}

pub fn print_rule_summary(summary: &RuleSummary) {
    println!(
        "Rules: {} (sha256 {})",
        summary.rules_path.display(),
        short_digest(&summary.rules_sha256)
    );
    println!("{}", rule_table(&summary.statistics));
}

fn status_table(stats: &AuditStatistics) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Status"),
        header_cell("Records"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let counts = [
        (ConformityStatus::Conforme, stats.conforme),
        (ConformityStatus::Alerta, stats.alerta),
        (ConformityStatus::NaoConforme, stats.nao_conforme),
        (ConformityStatus::Indeterminado, stats.indeterminado),
    ];
    for (status, count) in counts {
        table.add_row(vec![
            status_cell(status),
            count_cell(count, status_color(status)),
            Cell::new(share(count, stats.total)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.total).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn criteria_table(stats: &AuditStatistics) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Criterion"), header_cell("Conforme")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let criteria = &stats.criteria;
    let rows = [
        ("Choice", criteria.choice_conforme),
        ("Dose", criteria.dose_conforme),
        ("Timing", criteria.timing_conforme),
        ("Redosing", criteria.redosing_conforme),
    ];
    for (name, count) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{count} / {}", stats.total)),
        ]);
    }
    if criteria.dose_alerta > 0 {
        table.add_row(vec![
            Cell::new("Dose alerts"),
            count_cell(criteria.dose_alerta, Color::Yellow),
        ]);
    }
    table
}

fn rule_table(stats: &RepositoryStatistics) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Section"), header_cell("Rules")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (section, count) in &stats.rules_by_section {
        table.add_row(vec![Cell::new(section), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Prophylaxis required").fg(Color::Green),
        Cell::new(stats.prophylaxis_required),
    ]);
    table.add_row(vec![
        Cell::new("Prophylaxis not required").fg(Color::DarkGrey),
        Cell::new(stats.prophylaxis_not_required),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.total_rules).add_attribute(Attribute::Bold),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn short_digest(sha256: &str) -> &str {
    sha256.get(..12).unwrap_or(sha256)
}

fn share(count: usize, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", count as f64 / total as f64 * 100.0)
    }
}

fn status_color(status: ConformityStatus) -> Color {
    match status {
        ConformityStatus::Conforme => Color::Green,
        ConformityStatus::Alerta => Color::Yellow,
        ConformityStatus::NaoConforme => Color::Red,
        ConformityStatus::Indeterminado => Color::DarkGrey,
    }
}

fn status_cell(status: ConformityStatus) -> Cell {
    Cell::new(status.as_str())
        .fg(status_color(status))
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
