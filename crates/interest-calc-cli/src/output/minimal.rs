use serde_json::Value;

/// Paths tried in order for the single value worth printing.
const ANSWER_PATHS: [&[&str]; 2] = [&["display", "final_amount"], &["display"]];

/// Print just the key answer: the formatted final amount for a calculation,
/// the display text for an input preview. An empty result prints nothing.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    for path in ANSWER_PATHS {
        match lookup(result, path) {
            Some(Value::String(s)) => {
                println!("{}", s);
                return;
            }
            Some(Value::Null) => return,
            _ => {}
        }
    }

    println!("{}", serde_json::to_string(result).unwrap_or_default());
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}
