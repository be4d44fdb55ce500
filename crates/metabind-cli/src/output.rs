//! Rendering metadata for the terminal

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use metabind_core::{SchemaMetadata, TableMetadata};
use serde::Serialize;

/// JSON document printed by `table --json`
#[derive(Debug, Serialize)]
pub struct TableReport<'a> {
    pub table: &'a str,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a TableMetadata>,
}

/// Columns of one table, one row each
pub fn format_columns(metadata: &TableMetadata) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Column", "Type", "PK", "Generated", "Case-sensitive"]);

    for (index, column) in metadata.columns().iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            column.name.clone(),
            column.data_type.clone(),
            flag(column.primary_key),
            flag(column.generated),
            flag(column.case_sensitive),
        ]);
    }
    table.to_string()
}

/// Full listing for one table: columns followed by index names
pub fn format_table_metadata(name: &str, metadata: &TableMetadata) -> String {
    let mut out = format!("Table: {name}\n");
    if metadata.is_empty() {
        out.push_str("(no columns loaded)\n");
        return out;
    }
    out.push_str(&format_columns(metadata));
    out.push('\n');

    let indexes: Vec<&str> = metadata.indexes().iter().map(|i| i.name.as_str()).collect();
    if indexes.is_empty() {
        out.push_str("Indexes: none\n");
    } else {
        out.push_str(&format!("Indexes: {}\n", indexes.join(", ")));
    }
    out
}

/// Every table of a schema, in load order
pub fn format_schema(schema: &SchemaMetadata) -> String {
    if schema.is_empty() {
        return "No tables found\n".to_string();
    }
    schema
        .iter()
        .map(|(name, metadata)| format_table_metadata(name, metadata))
        .collect::<Vec<_>>()
        .join("\n")
}

fn flag(value: bool) -> String {
    if value { "yes".to_string() } else { String::new() }
}
