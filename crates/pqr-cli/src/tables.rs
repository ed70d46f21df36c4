//! Terminal tables.

use chrono::NaiveDate;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pqr_lifecycle::{StuckAlert, case_age};
use pqr_model::{CaseStatus, Catalog, Priority, keys};
use pqr_output::{CaseSummary, flatten_record};
use pqr_store::StoredCase;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn status_cell(status: CaseStatus) -> Cell {
    let color = match status {
        CaseStatus::Pendiente | CaseStatus::PendienteAjustes => Color::Yellow,
        CaseStatus::Iniciado | CaseStatus::Lectura => Color::Blue,
        CaseStatus::Escalado | CaseStatus::TrasladoSic => Color::Magenta,
        CaseStatus::Decretado => Color::Red,
        CaseStatus::Resuelto | CaseStatus::Finalizado => Color::Green,
    };
    Cell::new(status).fg(color)
}

fn priority_cell(priority: Priority) -> Cell {
    let color = match priority {
        Priority::Alta => Color::Red,
        Priority::Media => Color::Yellow,
        Priority::Baja => Color::Green,
    };
    Cell::new(priority).fg(color)
}

/// One row per case with the listing columns. `Dia` shows the case age.
pub fn case_list(cases: &[StoredCase], today: NaiveDate) -> Table {
    let mut table = Table::new();
    table.set_header(keys::LISTING_COLUMNS.iter().map(|h| header_cell(h)));
    apply_table_style(&mut table);
    for case in cases {
        let record = &case.record;
        let row = keys::LISTING_COLUMNS.iter().map(|column| match *column {
            keys::DAY_COUNTER => Cell::new(case_age(record, today)).set_alignment(CellAlignment::Right),
            keys::STATUS => status_cell(record.status),
            keys::PRIORITY => priority_cell(record.priority),
            keys::SN => Cell::new(&record.sn).add_attribute(Attribute::Bold),
            keys::CUN => Cell::new(&record.cun),
            keys::FILING_DATE => Cell::new(&record.filing_date),
            keys::DUE_DATE => Cell::new(&record.due_date),
            keys::CUSTOMER_NAME => Cell::new(&record.customer_name),
            keys::CUSTOMER_ID => Cell::new(&record.customer_id),
            keys::CATEGORY => Cell::new(&record.category),
            other => dim_cell(record.extra.get(other).map_or("", String::as_str)),
        });
        table.add_row(row);
    }
    table
}

/// Key and value of every non-empty field.
pub fn case_detail(case: &StoredCase, today: NaiveDate) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Campo"), header_cell("Valor")]);
    apply_table_style(&mut table);
    table.add_row(vec![dim_cell("id"), dim_cell(case.id.as_str())]);
    table.add_row(vec![Cell::new("Edad (días)"), Cell::new(case_age(&case.record, today))]);
    match flatten_record(&case.record) {
        Ok(fields) => {
            for (key, value) in fields {
                if value.is_empty() || value == "[]" || value == "false" {
                    continue;
                }
                table.add_row(vec![Cell::new(key), Cell::new(value)]);
            }
        }
        Err(error) => {
            table.add_row(vec![dim_cell("error"), Cell::new(error.to_string()).fg(Color::Red)]);
        }
    }
    table
}

pub fn summary(summary: &CaseSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Grupo"), header_cell("Valor"), header_cell("Casos")]);
    apply_table_style(&mut table);
    for (status, count) in &summary.by_status {
        table.add_row(vec![Cell::new("Estado"), status_cell(*status), count_cell(*count)]);
    }
    for (priority, count) in &summary.by_priority {
        table.add_row(vec![Cell::new("Prioridad"), priority_cell(*priority), count_cell(*count)]);
    }
    for (category, count) in &summary.by_category {
        table.add_row(vec![Cell::new("Categoría"), Cell::new(category), count_cell(*count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} abiertos / {} cerrados", summary.open(), summary.closed)),
        Cell::new(summary.total)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

fn count_cell(count: usize) -> Cell {
    let cell = Cell::new(count).set_alignment(CellAlignment::Right);
    if count == 0 { cell.fg(Color::DarkGrey) } else { cell }
}

pub fn catalog(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Lista"), header_cell("Valores")]);
    apply_table_style(&mut table);
    let statuses = catalog
        .statuses
        .iter()
        .map(|s| {
            if s.is_user_selectable() {
                s.to_string()
            } else {
                format!("{s} (derivado)")
            }
        })
        .collect::<Vec<_>>();
    table.add_row(vec![Cell::new("Estados"), Cell::new(statuses.join(", "))]);
    let priorities = catalog.priorities.iter().map(ToString::to_string).collect::<Vec<_>>();
    table.add_row(vec![Cell::new("Prioridades"), Cell::new(priorities.join(", "))]);
    let ticket_states = catalog.ticket_states.iter().map(ToString::to_string).collect::<Vec<_>>();
    table.add_row(vec![Cell::new("Estados TT"), Cell::new(ticket_states.join(", "))]);
    table.add_row(vec![
        Cell::new("Operaciones de aseguramiento"),
        Cell::new(catalog.assurance_operation_types.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("Tipos de aseguramiento"),
        Cell::new(catalog.assurance_types.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("Meses de aseguramiento"),
        Cell::new(catalog.assurance_months.join(", ")),
    ]);
    for area in &catalog.escalation_areas {
        table.add_row(vec![
            Cell::new(format!("Escalamiento: {}", area.name)),
            Cell::new(area.reasons.join(", ")),
        ]);
    }
    table
}

pub fn stuck_alerts(alerts: &[StuckAlert]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("SN"), header_cell("Minutos en Iniciado")]);
    apply_table_style(&mut table);
    for alert in alerts {
        table.add_row(vec![
            Cell::new(&alert.sn).add_attribute(Attribute::Bold),
            Cell::new(alert.minutes)
                .fg(Color::Red)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
