use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use interest_calc_core::format::{format_currency, CURRENCY_CODE, LOCALE};
use interest_calc_core::CalculatorKind;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if result.contains_key("kind") => {
                print_calculator(result);
                print_notes(map);
            }
            Some(Value::Object(result)) => {
                print_fields(result);
                print_notes(map);
            }
            _ => print_fields(map),
        },
        _ => println!("{}", value),
    }
}

fn print_calculator(view: &Map<String, Value>) {
    if let Some(title) = heading(view) {
        println!("{}\n", title.bold().underline());
    }

    let Some(Value::Object(display)) = view.get("display") else {
        println!("(sin resultado)");
        return;
    };

    println!("{}", "Resultado".bold());
    let mut builder = Builder::default();
    builder.push_record(["Monto final", text(display, "final_amount")]);
    builder.push_record(["Intereses", text(display, "total_interest")]);
    if let Some(Value::String(total)) = display.get("total_contributed") {
        builder.push_record(["Total abonos", total.as_str()]);
    }
    builder.push_record(["Cálculo", text(display, "formula")]);
    println!("{}", Table::from(builder));

    if let Some(Value::String(hint)) = view.get("rate_hint") {
        println!("{}", hint);
    }

    if let Some(Value::Array(rows)) = view.get("rows") {
        println!("\n{}", text(display, "table_title").bold());
        let mut builder = Builder::default();
        builder.push_record([
            text(display, "period_header"),
            "Interés del periodo",
            "Interés acumulado",
            "Valor acumulado",
        ]);
        for row in rows.iter().filter_map(Value::as_object) {
            builder.push_record([
                row.get("index").map(format_value).unwrap_or_default(),
                money(row.get("period_interest")),
                money(row.get("accumulated_interest")),
                money(row.get("accumulated_value")),
            ]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Object(cmp)) = display.get("comparison") {
        println!("\n{}", "Comparación: simple vs. compuesto".bold());
        let mut builder = Builder::default();
        builder.push_record(["Interés simple", text(cmp, "simple_final_amount")]);
        builder.push_record(["Interés compuesto", text(cmp, "compound_final_amount")]);
        builder.push_record(["Diferencia", text(cmp, "difference")]);
        println!("{}", Table::from(builder));
    }
}

/// Calculator title with the display locale, e.g. "Interés simple (COP, es-CO)".
fn heading(view: &Map<String, Value>) -> Option<String> {
    let kind: CalculatorKind = serde_json::from_value(view.get("kind")?.clone()).ok()?;
    Some(format!("{} ({}, {})", kind.title(), CURRENCY_CODE, LOCALE))
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn text<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Amounts travel as decimal strings; show them the way the calculator does.
fn money(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => Decimal::from_str(s)
            .map(format_currency)
            .unwrap_or_else(|_| s.clone()),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .map(format_currency)
            .unwrap_or_else(|_| n.to_string()),
        Some(other) => format_value(other),
        None => String::new(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_from_decimal_string() {
        assert_eq!(money(Some(&json!("1331000.00"))), "$\u{a0}1.331.000");
        assert_eq!(money(Some(&json!(-31000))), "-$\u{a0}31.000");
        assert_eq!(money(Some(&json!("n/a"))), "n/a");
        assert_eq!(money(None), "");
    }

    #[test]
    fn test_heading_names_calculator_and_locale() {
        let view = json!({"kind": "compound"});
        assert_eq!(
            heading(view.as_object().unwrap()).as_deref(),
            Some("Interés compuesto (COP, es-CO)")
        );
        let unknown = json!({"kind": "annuity"});
        assert_eq!(heading(unknown.as_object().unwrap()), None);
    }

    #[test]
    fn test_text_missing_key() {
        let map = Map::new();
        assert_eq!(text(&map, "formula"), "");
    }
}
