use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rowgraph_ingest::{BatchReport, PreviewReport, RecordSummary};
use rowgraph_model::{ConfigErrorKind, ValidationReport};
use rowgraph_schema::{MandatoryType, SchemaRegistry, TypeDefinition, TypeKind};

pub fn print_issues(report: &ValidationReport) {
    let name = if report.mapper_name.is_empty() {
        "(unnamed)"
    } else {
        report.mapper_name.as_str()
    };
    if report.is_valid() {
        println!("Mapper {name}: no issues");
        return;
    }
    println!("Mapper {name}: {} issue(s)", report.issue_count());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Representation"),
        header_cell("Attribute"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    for issue in &report.issues {
        table.add_row(vec![
            kind_cell(issue.kind),
            optional_cell(issue.representation.as_deref()),
            optional_cell(issue.attribute.as_deref()),
            Cell::new(&issue.message),
        ]);
    }
    println!("{table}");
}

pub fn print_preview(report: &PreviewReport, json: bool) {
    if json {
        println!("{}", report.objects);
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Entities"), header_cell("Relationships")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(report.nb_entities),
        Cell::new(report.nb_relationships),
    ]);
    println!("{table}");
}

/// Batch summary goes to stderr, the bundle may be on stdout.
pub fn print_batch(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Line"),
        header_cell("Produced"),
        header_cell("Skipped"),
        header_cell("Invalid"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 0..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for summary in report.summaries.iter().filter(|s| needs_attention(s)) {
        table.add_row(vec![
            Cell::new(summary.line),
            Cell::new(summary.produced),
            count_cell(summary.skipped, Color::DarkGrey),
            count_cell(summary.invalid, Color::Yellow),
            count_cell(summary.failed, Color::Red),
        ]);
    }
    let totals = &report.totals;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals.entities + totals.relationships).add_attribute(Attribute::Bold),
        count_cell(totals.skipped, Color::DarkGrey).add_attribute(Attribute::Bold),
        count_cell(totals.invalid, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals.failed, Color::Red).add_attribute(Attribute::Bold),
    ]);
    eprintln!("{table}");
    eprintln!(
        "Records: {}  Entities: {}  Relationships: {}",
        totals.records, totals.entities, totals.relationships
    );
    if report.cancelled {
        eprintln!("Cancelled after {} record(s)", totals.records);
    }
}

pub fn print_types(schema: &SchemaRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Kind"),
        header_cell("Attributes"),
        header_cell("References"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    let mut types: Vec<&TypeDefinition> = schema.types().collect();
    types.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
    for def in types {
        let kind = match def.kind {
            TypeKind::Entity => Cell::new("entity").fg(Color::Blue),
            TypeKind::Relationship => Cell::new("relationship").fg(Color::Magenta),
        };
        let required: Vec<&str> = def
            .fields()
            .filter(|f| f.mandatory() == MandatoryType::External)
            .map(|f| f.name())
            .collect();
        table.add_row(vec![
            Cell::new(&def.name).add_attribute(Attribute::Bold),
            kind,
            Cell::new(def.attributes.len()),
            Cell::new(def.refs.len()),
            Cell::new(required.join(", ")),
        ]);
    }
    println!("{table}");
}

fn needs_attention(summary: &RecordSummary) -> bool {
    summary.invalid > 0 || summary.failed > 0
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_cell(kind: ConfigErrorKind) -> Cell {
    let color = match kind {
        ConfigErrorKind::EmptyConfiguration
        | ConfigErrorKind::InvalidSeparator
        | ConfigErrorKind::InvalidSkipLineChar
        | ConfigErrorKind::DuplicateRepresentationId
        | ConfigErrorKind::ReferenceCycle => Color::Red,
        _ => Color::Yellow,
    };
    Cell::new(kind).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
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
