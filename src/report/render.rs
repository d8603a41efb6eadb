//! Table rendering for report output.
//!
//! Turns a `QueryResult` into a bordered plain-text table. Uses ASCII
//! borders so output stays stable across terminals and pagers.

use crate::db::QueryResult;
use comfy_table::presets::ASCII_FULL;
use comfy_table::Table;

/// Renders a result set as a bordered table string.
///
/// The header row holds the column names; each data row is rendered in
/// the order the database returned it. An empty result renders as a
/// header-only table.
pub fn render_table(result: &QueryResult) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let header: Vec<String> = result.columns.iter().map(|c| c.name.clone()).collect();
    table.set_header(header);

    for row in &result.rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_display_string()).collect();
        table.add_row(cells);
    }

    table.to_string()
}
