//! Form-level entry point.
//!
//! A [`CalculatorForm`] is the raw text the user typed. [`CalculatorInput`]
//! is that text normalized (anything unreadable becomes zero), and
//! [`compute`] turns an input into the complete result set: summary, period
//! table, chart series and comparison. Nothing is cached; every call
//! recomputes from the input it is given.

use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::format::{
    format_currency, format_currency_delta, format_rate_percent, parse_digits,
    parse_leading_number, parse_number_or_zero, round_units,
};
use crate::error::InterestCalcError;
use crate::interest::compound::{calculate_compound, CompoundInput};
use crate::interest::simple::{calculate_simple, SimpleInput};
use crate::interest::{ComparisonResult, Contribution, InterestSchedule, PeriodRow, ResultSummary};
use crate::period::PeriodType;
use crate::types::{with_metadata, CalculatorKind, ComputationOutput, Money, Rate};
use crate::InterestCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw form state, exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorForm {
    #[serde(deserialize_with = "text_field")]
    pub principal: String,
    #[serde(deserialize_with = "text_field")]
    pub rate_percent: String,
    pub period_type: PeriodType,
    #[serde(deserialize_with = "text_field")]
    pub periods: String,
    #[serde(deserialize_with = "text_field")]
    pub contribution_amount: String,
    #[serde(deserialize_with = "text_field")]
    pub contribution_every: String,
    pub contribution_unit: PeriodType,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self {
            principal: "1000000".into(),
            rate_percent: "10".into(),
            period_type: PeriodType::Years,
            periods: "3".into(),
            contribution_amount: String::new(),
            contribution_every: "1".into(),
            contribution_unit: PeriodType::Months,
        }
    }
}

/// Normalized calculator input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub principal: Money,
    /// Annual rate in percent (10 = 10%).
    pub annual_rate_percent: Decimal,
    pub period_type: PeriodType,
    pub period_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Contribution>,
}

/// Point of the growth chart, keyed by period label. Amounts are rounded to
/// whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Money,
    pub interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDisplay {
    pub simple_final_amount: String,
    pub compound_final_amount: String,
    pub difference: String,
}

/// Summary strings in the display locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    pub final_amount: String,
    pub total_interest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_contributed: Option<String>,
    pub formula: String,
    pub table_title: String,
    pub period_header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonDisplay>,
}

/// Everything a presentation layer renders for one form snapshot.
///
/// When the principal or period count is not positive, `summary`,
/// `display` and `comparison` are `None` and `rows` and `chart` are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorView {
    pub kind: CalculatorKind,
    pub summary: Option<ResultSummary>,
    pub display: Option<SummaryDisplay>,
    pub rows: Vec<PeriodRow>,
    pub chart: Vec<ChartPoint>,
    pub comparison: Option<ComparisonResult>,
    /// Per-period rate note shown under the period field ("… % mensual").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_hint: Option<String>,
}

// ---------------------------------------------------------------------------
// Form parsing
// ---------------------------------------------------------------------------

/// Accept form fields written as JSON/YAML strings or plain numbers.
fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Option::<Text>::deserialize(deserializer)? {
        Some(Text::Str(s)) => s,
        Some(Text::Num(n)) => n.to_string(),
        None => String::new(),
    })
}

fn whole_count(value: Decimal) -> u32 {
    let floored = value.floor();
    if floored <= Decimal::ZERO {
        0
    } else {
        floored.to_u32().unwrap_or(u32::MAX)
    }
}

impl CalculatorInput {
    /// Normalize a raw form.
    ///
    /// Principal and contribution keep only their digits; rate, periods and
    /// frequency read their leading number. Missing values become zero, a
    /// frequency below one becomes one, and a negative rate becomes zero.
    pub fn from_form(form: &CalculatorForm) -> Self {
        let principal = Decimal::from(parse_digits(&form.principal));

        let mut annual_rate_percent = parse_number_or_zero(&form.rate_percent);
        if annual_rate_percent < Decimal::ZERO {
            warn!(rate = %annual_rate_percent, "negative rate treated as zero");
            annual_rate_percent = Decimal::ZERO;
        }

        let period_count = whole_count(parse_number_or_zero(&form.periods));

        let amount = Decimal::from(parse_digits(&form.contribution_amount));
        let every = parse_leading_number(&form.contribution_every)
            .filter(|v| !v.is_zero())
            .map(whole_count)
            .unwrap_or(1)
            .max(1);
        let contribution = (amount > Decimal::ZERO).then(|| Contribution {
            amount,
            every,
            unit: form.contribution_unit,
        });

        Self {
            principal,
            annual_rate_percent,
            period_type: form.period_type,
            period_count,
            contribution,
        }
    }

    /// Annual rate as a fraction.
    pub fn annual_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(100)
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn rate_hint(kind: CalculatorKind, input: &CalculatorInput) -> Option<String> {
    let prefix = match kind {
        CalculatorKind::Compound => "Tasa usada por periodo",
        CalculatorKind::Simple => "Tasa por periodo",
    };
    match input.period_type {
        PeriodType::Years => None,
        PeriodType::Months => {
            // Unrounded, in shortest float notation
            let monthly = input.annual_rate_percent.to_f64().unwrap_or_default() / 12.0;
            Some(format!("{prefix}: {monthly}% mensual"))
        }
        PeriodType::Days => {
            let daily = (input.annual_rate_percent / dec!(365))
                .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
            Some(format!("{prefix}: {daily:.4}% diaria"))
        }
    }
}

fn formula(kind: CalculatorKind, summary: &ResultSummary) -> String {
    let (expression, count_symbol) = match kind {
        CalculatorKind::Compound => (format!("Fórmula: {}", kind.methodology()), "n"),
        CalculatorKind::Simple if summary.total_contributed.is_some() => {
            (format!("{} + abonos", kind.methodology()), "t")
        }
        CalculatorKind::Simple => (kind.methodology().to_string(), "t"),
    };
    format!(
        "{expression} — r = {} por periodo, {count_symbol} = {} {}",
        format_rate_percent(summary.rate_per_period),
        summary.period_count,
        summary.period_type.plural_label()
    )
}

fn summary_display(kind: CalculatorKind, schedule: &InterestSchedule) -> SummaryDisplay {
    let summary = &schedule.summary;
    SummaryDisplay {
        final_amount: format_currency(summary.final_amount),
        total_interest: format_currency(summary.total_interest),
        total_contributed: summary.total_contributed.map(format_currency),
        formula: formula(kind, summary),
        table_title: format!("Evolución {}", summary.period_type.evolution_label()),
        period_header: summary.period_type.label().to_string(),
        comparison: schedule.comparison.as_ref().map(|c| ComparisonDisplay {
            simple_final_amount: format_currency(c.simple_final_amount),
            compound_final_amount: format_currency(c.compound_final_amount),
            difference: format_currency_delta(c.difference),
        }),
    }
}

/// Chart interest is the interest earned so far, except on a contribution
/// grid where it is the interest of each period.
fn chart_points(schedule: &InterestSchedule) -> Vec<ChartPoint> {
    let per_period = schedule.contribution.is_some();
    schedule
        .rows
        .iter()
        .map(|row| ChartPoint {
            label: row.label.clone(),
            value: round_units(row.accumulated_value),
            interest: round_units(if per_period {
                row.period_interest
            } else {
                row.accumulated_interest
            }),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compute the full result set for one calculator and input snapshot.
pub fn compute(
    kind: CalculatorKind,
    input: &CalculatorInput,
) -> InterestCalcResult<ComputationOutput<CalculatorView>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let computed = match kind {
        CalculatorKind::Compound => {
            if input.contribution.is_some() {
                warnings.push(
                    "Periodic contributions only apply to simple interest; ignored".to_string(),
                );
            }
            calculate_compound(&CompoundInput {
                principal: input.principal,
                annual_rate: input.annual_rate(),
                period_type: input.period_type,
                periods: input.period_count,
            })
        }
        CalculatorKind::Simple => calculate_simple(&SimpleInput {
            principal: input.principal,
            annual_rate: input.annual_rate(),
            period_type: input.period_type,
            periods: input.period_count,
            contribution: input.contribution.clone(),
        }),
    };

    // Inputs whose schedule is too long or too large for the decimal range
    // yield an empty view, like any other input without a result.
    let mut out_of_range = false;
    let schedule = match computed {
        Ok(schedule) => schedule,
        Err(e @ (InterestCalcError::Overflow { .. } | InterestCalcError::InvalidInput { .. })) => {
            warn!(?kind, error = %e, "result out of range; suppressed");
            warnings.push(format!("{e}; no result"));
            out_of_range = true;
            None
        }
        Err(e) => return Err(e),
    };

    let view = match schedule {
        Some(schedule) => {
            if let (Some(plan), Some(contribution)) = (&schedule.contribution, &input.contribution) {
                if plan.interval.rounded {
                    warnings.push(format!(
                        "Contribution every {} {} rounded to every {} {}",
                        contribution.every,
                        contribution.unit.plural_label(),
                        plan.interval.periods,
                        plan.working_unit.plural_label()
                    ));
                }
            }
            if schedule.comparison.is_none() {
                warnings.push("Compound comparison exceeds decimal range; omitted".to_string());
            }
            debug!(
                ?kind,
                unit = %schedule.summary.period_type,
                periods = schedule.summary.period_count,
                final_amount = %schedule.summary.final_amount,
                "interest computed"
            );

            CalculatorView {
                kind,
                display: Some(summary_display(kind, &schedule)),
                chart: chart_points(&schedule),
                rate_hint: rate_hint(kind, input),
                summary: Some(schedule.summary),
                rows: schedule.rows,
                comparison: schedule.comparison,
            }
        }
        None => {
            if !out_of_range {
                debug!(?kind, "principal or period count not positive; no result");
                warnings.push(
                    "Principal and period count must both be greater than zero; no result"
                        .to_string(),
                );
            }
            CalculatorView {
                kind,
                summary: None,
                display: None,
                rows: Vec::new(),
                chart: Vec::new(),
                comparison: None,
                rate_hint: rate_hint(kind, input),
            }
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(kind.methodology(), input, warnings, elapsed, view))
}

/// Normalize a raw form and compute it.
pub fn compute_form(
    kind: CalculatorKind,
    form: &CalculatorForm,
) -> InterestCalcResult<ComputationOutput<CalculatorView>> {
    compute(kind, &CalculatorInput::from_form(form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn form(principal: &str, rate: &str, period_type: PeriodType, periods: &str) -> CalculatorForm {
        CalculatorForm {
            principal: principal.into(),
            rate_percent: rate.into(),
            period_type,
            periods: periods.into(),
            ..CalculatorForm::default()
        }
    }

    #[test]
    fn test_from_form_defaults() {
        let input = CalculatorInput::from_form(&CalculatorForm::default());
        assert_eq!(
            input,
            CalculatorInput {
                principal: dec!(1000000),
                annual_rate_percent: dec!(10),
                period_type: PeriodType::Years,
                period_count: 3,
                contribution: None,
            }
        );
    }

    #[test]
    fn test_from_form_is_lenient() {
        let mut raw = form("1.000.000", "7.5abc", PeriodType::Months, "6.9");
        raw.contribution_amount = "$ 100.000".into();
        raw.contribution_every = "0".into();
        let input = CalculatorInput::from_form(&raw);
        assert_eq!(input.principal, dec!(1000000));
        assert_eq!(input.annual_rate_percent, dec!(7.5));
        assert_eq!(input.period_count, 6);
        let contribution = input.contribution.unwrap();
        assert_eq!(contribution.amount, dec!(100000));
        assert_eq!(contribution.every, 1);
    }

    #[test]
    fn test_from_form_garbage_is_zero() {
        let input = CalculatorInput::from_form(&form("", "x", PeriodType::Years, "-4"));
        assert_eq!(input.principal, Decimal::ZERO);
        assert_eq!(input.annual_rate_percent, Decimal::ZERO);
        assert_eq!(input.period_count, 0);
    }

    #[test]
    fn test_negative_rate_clamped() {
        let input = CalculatorInput::from_form(&form("100", "-5", PeriodType::Years, "1"));
        assert_eq!(input.annual_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_compound_display_strings() {
        let out = compute_form(CalculatorKind::Compound, &CalculatorForm::default()).unwrap();
        let display = out.result.display.unwrap();
        assert_eq!(display.final_amount, "$\u{a0}1.331.000");
        assert_eq!(display.total_interest, "$\u{a0}331.000");
        assert_eq!(
            display.formula,
            "Fórmula: M = P(1 + r)^n — r = 10.0000% por periodo, n = 3 años"
        );
        assert_eq!(display.table_title, "Evolución año a año");
        assert_eq!(display.period_header, "Año");
        assert_eq!(
            display.comparison.unwrap().difference,
            "+$\u{a0}31.000"
        );
        assert_eq!(out.methodology, "M = P(1 + r)^n");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_simple_with_contribution_formula() {
        let mut raw = form("1000000", "12", PeriodType::Years, "1");
        raw.contribution_amount = "100000".into();
        let out = compute_form(CalculatorKind::Simple, &raw).unwrap();
        let display = out.result.display.unwrap();
        assert_eq!(
            display.formula,
            "I = P · r · t — M = P + I + abonos — r = 1.0000% por periodo, t = 12 meses"
        );
        assert_eq!(display.total_contributed.as_deref(), Some("$\u{a0}1.200.000"));
        assert_eq!(display.final_amount, "$\u{a0}2.320.000");
    }

    #[test]
    fn test_chart_mirrors_rows() {
        let out = compute_form(CalculatorKind::Compound, &CalculatorForm::default()).unwrap();
        let view = out.result;
        assert_eq!(view.chart.len(), view.rows.len());
        assert_eq!(view.chart[3].label, "Año 3");
        assert_eq!(view.chart[3].value, dec!(1331000));
        assert_eq!(view.chart[3].interest, dec!(331000));
    }

    #[test]
    fn test_empty_result() {
        let out = compute_form(CalculatorKind::Simple, &form("0", "10", PeriodType::Years, "3")).unwrap();
        let view = out.result;
        assert!(view.summary.is_none());
        assert!(view.display.is_none());
        assert!(view.rows.is_empty());
        assert!(view.chart.is_empty());
        assert!(view.comparison.is_none());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_rate_hint() {
        let monthly = compute_form(CalculatorKind::Compound, &form("1", "12", PeriodType::Months, "1")).unwrap();
        assert_eq!(monthly.result.rate_hint.as_deref(), Some("Tasa usada por periodo: 1% mensual"));
        let daily = compute_form(CalculatorKind::Compound, &form("1", "10", PeriodType::Days, "1")).unwrap();
        assert_eq!(daily.result.rate_hint.as_deref(), Some("Tasa usada por periodo: 0.0274% diaria"));
        let yearly = compute_form(CalculatorKind::Compound, &CalculatorForm::default()).unwrap();
        assert_eq!(yearly.result.rate_hint, None);
    }

    #[test]
    fn test_simple_rate_hint_is_unrounded() {
        let monthly = compute_form(CalculatorKind::Simple, &form("1", "10", PeriodType::Months, "1")).unwrap();
        assert_eq!(
            monthly.result.rate_hint.as_deref(),
            Some("Tasa por periodo: 0.8333333333333334% mensual")
        );
        let daily = compute_form(CalculatorKind::Simple, &form("1", "10", PeriodType::Days, "1")).unwrap();
        assert_eq!(daily.result.rate_hint.as_deref(), Some("Tasa por periodo: 0.0274% diaria"));
    }

    #[test]
    fn test_contribution_ignored_for_compound() {
        let mut raw = CalculatorForm::default();
        raw.contribution_amount = "5000".into();
        let out = compute_form(CalculatorKind::Compound, &raw).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.summary.unwrap().final_amount, dec!(1331000));
    }

    #[test]
    fn test_rounded_interval_warns() {
        let mut raw = form("1000", "10", PeriodType::Years, "1");
        raw.contribution_amount = "10".into();
        raw.contribution_every = "6".into();
        raw.contribution_unit = PeriodType::Months;
        let mut daily = raw.clone();
        daily.contribution_unit = PeriodType::Days;
        daily.contribution_every = "1".into();

        let months_grid = compute_form(CalculatorKind::Simple, &raw).unwrap();
        assert!(months_grid.warnings.is_empty());

        raw.period_type = PeriodType::Days;
        raw.periods = "365".into();
        let days_grid = compute_form(CalculatorKind::Simple, &raw).unwrap();
        assert_eq!(
            days_grid.warnings,
            vec!["Contribution every 6 meses rounded to every 183 días".to_string()]
        );
        assert!(compute_form(CalculatorKind::Simple, &daily).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_form_accepts_numbers() {
        let raw: CalculatorForm = serde_json::from_str(
            r#"{"principal": 2500000, "rate_percent": 8.5, "period_type": "months", "periods": "18"}"#,
        )
        .unwrap();
        assert_eq!(raw.principal, "2500000");
        assert_eq!(raw.rate_percent, "8.5");
        assert_eq!(raw.period_type, PeriodType::Months);
        assert_eq!(raw.contribution_every, "1");
    }
}
