use clap::Args;
use serde_json::{json, Value};

use interest_calc_core::format;

/// Arguments for previewing an amount field
#[derive(Args)]
pub struct FormatInputArgs {
    /// Raw field text (e.g. 1000000 or "$ 1.000.000")
    pub text: String,
}

pub fn run_format_input(args: FormatInputArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let digits = format::parse_digits(&args.text);
    Ok(json!({
        "result": {
            "raw": args.text,
            "digits": digits,
            "display": format::format_for_input(&args.text),
        }
    }))
}
