use serde_json::{Map, Value};
use std::io;

/// Column order for period rows; any other row fields follow.
const ROW_COLUMNS: [&str; 5] = [
    "index",
    "label",
    "accumulated_value",
    "period_interest",
    "accumulated_interest",
];

/// Write output as CSV to stdout. Calculator results print their period
/// table; other results print as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match result.get("rows") {
                Some(Value::Array(rows)) => write_rows(&mut wtr, rows),
                _ => write_fields(&mut wtr, result),
            },
            _ => write_fields(&mut wtr, map),
        },
        _ => {
            let _ = wtr.write_record([format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let mut headers: Vec<&str> = ROW_COLUMNS
        .iter()
        .copied()
        .filter(|c| first.contains_key(*c))
        .collect();
    headers.extend(
        first
            .keys()
            .map(String::as_str)
            .filter(|k| !ROW_COLUMNS.contains(k)),
    );
    let _ = wtr.write_record(&headers);

    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_csv(rows: &[Value]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(&mut wtr, rows);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_rows_use_fixed_column_order() {
        let rows = vec![json!({
            "period_interest": "0",
            "accumulated_interest": "0",
            "label": "Año 0",
            "index": 0,
            "accumulated_value": "1000000",
        })];
        let out = rows_csv(&rows);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("index,label,accumulated_value,period_interest,accumulated_interest")
        );
        assert_eq!(lines.next(), Some("0,Año 0,1000000,0,0"));
    }

    #[test]
    fn test_empty_rows_write_nothing() {
        assert_eq!(rows_csv(&[]), "");
    }
}
