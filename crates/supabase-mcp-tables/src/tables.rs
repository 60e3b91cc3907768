//! Parse and render `list_tables` tool responses.

use std::ops::Deref;

use rmcp::model::{CallToolResult, RawContent};
use serde::Deserialize;

/// Printed when a textual content item is not a valid table listing.
pub const PARSE_FAILURE_NOTICE: &str = "Could not parse table data JSON.";

/// Printed when the tool call returns no content items.
pub const NO_CONTENT_NOTICE: &str = "No content returned from tool call.";

/// One table in a `list_tables` response. Unknown keys are ignored; the
/// three known keys are all optional in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableRecord {
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub rows: i64,
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_name() -> String {
    "unknown".to_string()
}

/// Parse a textual payload as an ordered list of table records. Anything
/// other than a JSON array of objects is an error.
pub fn parse_table_records(text: &str) -> Result<Vec<TableRecord>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Render one textual content item: a count header plus one line per table,
/// or the parse-failure notice followed by the raw text.
pub fn render_table_listing(text: &str) -> String {
    match parse_table_records(text) {
        Ok(tables) => {
            let mut out = format!("Found {} tables:\n", tables.len());
            for table in &tables {
                out.push_str(&format!(
                    "- {}.{} (Rows: {})\n",
                    table.schema, table.name, table.rows
                ));
            }
            out
        }
        Err(_) => format!("{PARSE_FAILURE_NOTICE}\n{text}\n"),
    }
}

/// Render a whole tool result. Textual items are rendered in order and
/// non-textual items are skipped; an empty content list yields the
/// no-content notice.
pub fn render_call_result(result: &CallToolResult) -> String {
    if result.content.is_empty() {
        return format!("{NO_CONTENT_NOTICE}\n");
    }

    let mut out = String::new();
    for item in &result.content {
        if let RawContent::Text(text) = item.deref() {
            out.push_str(&render_table_listing(&text.text));
        }
    }
    out
}
