pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use serde_json::Value;

use crate::OutputFormat;

/// Render a command result on stdout in the selected format.
pub fn format_output(format: &OutputFormat, value: &Value) {
    let render: fn(&Value) = match format {
        OutputFormat::Json => json::print_json,
        OutputFormat::Table => table::print_table,
        OutputFormat::Csv => csv_out::print_csv,
        OutputFormat::Minimal => minimal::print_minimal,
    };
    render(value);
}
