//! Console rendering of query results.
//!
//! Results go to stdout; logging goes to stderr through `tracing`.

use comfy_table::{presets::UTF8_FULL, Table};
use mongodb::bson::{Bson, Document};

use super::indexes::{IndexComparison, LOOKUP_TITLE};
use super::queries::WriteOutcome;

/// Documents as pretty relaxed extended JSON, one array.
pub fn render_documents(documents: &[Document]) -> String {
    let values: Vec<serde_json::Value> = documents
        .iter()
        .map(|doc| Bson::Document(doc.clone()).into_relaxed_extjson())
        .collect();
    serde_json::to_string_pretty(&values).unwrap_or_else(|_| format!("{:?}", documents))
}

/// Header and body cells for [`render_table`]: an `(index)` column, then
/// every field in the order it is first seen. Missing fields are blank.
pub fn table_cells(documents: &[Document]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut columns: Vec<String> = Vec::new();
    for doc in documents {
        for key in doc.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut header = vec!["(index)".to_string()];
    header.extend(columns.iter().cloned());

    let rows = documents
        .iter()
        .enumerate()
        .map(|(index, doc)| {
            let mut row = vec![index.to_string()];
            row.extend(
                columns
                    .iter()
                    .map(|column| doc.get(column).map(cell).unwrap_or_default()),
            );
            row
        })
        .collect();

    (header, rows)
}

pub fn render_table(documents: &[Document]) -> String {
    let (header, rows) = table_cells(documents);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn cell(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Int32(v) => v.to_string(),
        Bson::Int64(v) => v.to_string(),
        Bson::Double(v) => v.to_string(),
        Bson::Boolean(v) => v.to_string(),
        Bson::Null => "null".to_string(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

pub fn print_documents(label: &str, documents: &[Document]) {
    println!("\n{label} ({} found):", documents.len());
    println!("{}", render_documents(documents));
}

pub fn print_table(label: &str, documents: &[Document]) {
    println!("\n{label}:");
    println!("{}", render_table(documents));
}

pub fn write_message(outcome: WriteOutcome, applied: &str, no_match: &str) -> String {
    match outcome {
        WriteOutcome::Applied => applied.to_string(),
        WriteOutcome::NoMatch => no_match.to_string(),
    }
}

/// Success follows the modified count, so a title that matched but already
/// had `price` lands in the no-match arm too.
pub fn update_message(outcome: WriteOutcome, title: &str, price: f64) -> String {
    write_message(
        outcome,
        &format!("Updated price of \"{title}\" to {price}"),
        &format!(
            "Price of \"{title}\" not updated (no book matched, or it already costs {price})"
        ),
    )
}

pub fn delete_message(outcome: WriteOutcome, title: &str) -> String {
    write_message(
        outcome,
        &format!("Deleted \"{title}\""),
        &format!("No book found with title \"{title}\" (nothing deleted)"),
    )
}

pub fn render_comparison(comparison: &IndexComparison) -> String {
    let IndexComparison {
        before,
        after,
        index_name,
    } = comparison;
    [
        format!("Index performance for {{ title: \"{LOOKUP_TITLE}\" }}"),
        format!(
            "  before: {} docs examined, {} ms, plan {}",
            before.docs_examined,
            before.execution_time_ms,
            before.stages.join(" > ")
        ),
        format!(
            "  after:  {} docs examined, {} ms, plan {}",
            after.docs_examined,
            after.execution_time_ms,
            after.stages.join(" > ")
        ),
        format!("  rebuilt index: {index_name}"),
        format!("  winning stage: {}", after.winning_stage()),
    ]
    .join("\n")
}
