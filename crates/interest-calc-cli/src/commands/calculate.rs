use clap::Args;
use serde_json::Value;
use tracing::debug;

use interest_calc_core::calculator::{self, CalculatorForm};
use interest_calc_core::{CalculatorKind, PeriodType};

use crate::input;

/// Form fields shared by both calculators. Values are taken as typed:
/// anything that does not read as a number counts as zero.
#[derive(Args)]
pub struct FormArgs {
    /// Initial principal; separators and symbols are ignored (e.g. 1.000.000)
    #[arg(long, short = 'p', default_value = "1000000")]
    pub principal: String,

    /// Annual interest rate in percent (e.g. 10 for 10%)
    #[arg(long, short = 'r', default_value = "10")]
    pub rate: String,

    /// Unit of the period count: years, months or days
    #[arg(long, default_value = "years")]
    pub period_type: PeriodType,

    /// Number of periods (decimals are truncated)
    #[arg(long, short = 'n', default_value = "3")]
    pub periods: String,

    /// Path to a JSON or YAML form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

impl FormArgs {
    fn to_form(&self) -> CalculatorForm {
        CalculatorForm {
            principal: self.principal.clone(),
            rate_percent: self.rate.clone(),
            period_type: self.period_type,
            periods: self.periods.clone(),
            ..CalculatorForm::default()
        }
    }
}

/// Arguments for the compound interest calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CompoundArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

/// Arguments for the simple interest calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SimpleArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Amount added periodically; leave out for none (e.g. 100.000)
    #[arg(long)]
    pub contribution: Option<String>,

    /// Contribute once every N units
    #[arg(long, default_value = "1")]
    pub contribution_every: String,

    /// Unit of the contribution frequency: years, months or days
    #[arg(long, default_value = "months")]
    pub contribution_unit: PeriodType,
}

fn load_form(
    path: Option<&str>,
    from_flags: impl FnOnce() -> CalculatorForm,
) -> Result<CalculatorForm, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        debug!(path, "reading form file");
        input::file::read_form(path)
    } else if let Some(form) = input::stdin::read_stdin()? {
        debug!("read form from stdin");
        Ok(form)
    } else {
        Ok(from_flags())
    }
}

pub fn run_compound(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = load_form(args.form.input.as_deref(), || args.form.to_form())?;
    let result = calculator::compute_form(CalculatorKind::Compound, &form)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simple(args: SimpleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = load_form(args.form.input.as_deref(), || CalculatorForm {
        contribution_amount: args.contribution.clone().unwrap_or_default(),
        contribution_every: args.contribution_every.clone(),
        contribution_unit: args.contribution_unit,
        ..args.form.to_form()
    })?;
    let result = calculator::compute_form(CalculatorKind::Simple, &form)?;
    Ok(serde_json::to_value(result)?)
}
