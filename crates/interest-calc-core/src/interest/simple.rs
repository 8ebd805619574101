use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::comparison::compare;
use super::compound::compound_final_amount;
use super::{
    ensure_schedule_len, overflow, Contribution, ContributionPlan, InterestSchedule, PeriodRow,
    ResultSummary,
};
use crate::period::{contribution_interval, PeriodType};
use crate::types::{Money, Rate};
use crate::InterestCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleInput {
    pub principal: Money,
    /// Annual rate as a fraction (0.10 = 10%).
    pub annual_rate: Rate,
    pub period_type: PeriodType,
    pub periods: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Contribution>,
}

/// Final amount `P + P × r × n` for a per-period rate `r`.
pub fn simple_final_amount(principal: Money, rate: Rate, periods: u64) -> InterestCalcResult<Money> {
    principal
        .checked_mul(rate)
        .and_then(|per_period| per_period.checked_mul(Decimal::from(periods)))
        .and_then(|interest| principal.checked_add(interest))
        .ok_or_else(|| overflow("simple final amount"))
}

/// Simple interest: accrues on the original principal only, `I = P·r·t`.
///
/// With a positive contribution the schedule runs on the finer of the
/// duration unit and the contribution unit. Contributions are added to the
/// balance but never earn interest. The comparison is made against compound
/// interest over the same working rate and count, without contributions.
///
/// Returns `Ok(None)` when the principal or the period count is not positive.
pub fn calculate_simple(input: &SimpleInput) -> InterestCalcResult<Option<InterestSchedule>> {
    if input.principal <= Decimal::ZERO || input.periods == 0 {
        return Ok(None);
    }

    match input.contribution.as_ref() {
        Some(contribution) if contribution.amount > Decimal::ZERO => {
            with_contribution(input, contribution).map(Some)
        }
        _ => flat(input).map(Some),
    }
}

fn flat(input: &SimpleInput) -> InterestCalcResult<InterestSchedule> {
    let n = u64::from(input.periods);
    ensure_schedule_len(n, input.period_type)?;

    let p = input.principal;
    let rate = input.period_type.period_rate(input.annual_rate);
    let final_amount = simple_final_amount(p, rate, n)?;
    let per_period = p * rate;

    let rows = (0..=n)
        .map(|i| {
            let earned = per_period * Decimal::from(i);
            PeriodRow {
                index: i,
                label: input.period_type.row_label(i),
                accumulated_value: p + earned,
                period_interest: if i == 0 { Decimal::ZERO } else { per_period },
                accumulated_interest: earned,
            }
        })
        .collect();

    let comparison = compound_final_amount(p, rate, n)
        .ok()
        .map(|compound| compare(final_amount, compound));

    Ok(InterestSchedule {
        summary: ResultSummary {
            final_amount,
            total_interest: final_amount - p,
            rate_per_period: rate,
            period_count: n,
            period_type: input.period_type,
            total_contributed: None,
        },
        rows,
        comparison,
        contribution: None,
    })
}

fn with_contribution(
    input: &SimpleInput,
    contribution: &Contribution,
) -> InterestCalcResult<InterestSchedule> {
    let working = input.period_type.finer(contribution.unit);
    let n_work = input.period_type.convert_count(input.periods, working);
    ensure_schedule_len(n_work, working)?;

    let p = input.principal;
    let rate = working.period_rate(input.annual_rate);
    let interval = contribution_interval(contribution.every, contribution.unit, working);
    let contributions_made = n_work / interval.periods;

    let per_period = p * rate;
    let total_interest = simple_final_amount(p, rate, n_work)? - p;
    let total_contributed = contribution
        .amount
        .checked_mul(Decimal::from(contributions_made))
        .ok_or_else(|| overflow("total contributed"))?;
    p.checked_add(total_interest)
        .and_then(|v| v.checked_add(total_contributed))
        .ok_or_else(|| overflow("simple balance with contributions"))?;

    let mut rows = Vec::with_capacity(n_work as usize + 1);
    rows.push(PeriodRow {
        index: 0,
        label: working.row_label(0),
        accumulated_value: p,
        period_interest: Decimal::ZERO,
        accumulated_interest: Decimal::ZERO,
    });

    let mut balance = p;
    for i in 1..=n_work {
        balance += per_period;
        if i % interval.periods == 0 {
            balance += contribution.amount;
        }
        rows.push(PeriodRow {
            index: i,
            label: working.row_label(i),
            accumulated_value: balance,
            period_interest: per_period,
            accumulated_interest: per_period * Decimal::from(i),
        });
    }

    let comparison = if n_work > 0 {
        compound_final_amount(p, rate, n_work)
            .ok()
            .map(|compound| compare(balance, compound))
    } else {
        None
    };

    Ok(InterestSchedule {
        summary: ResultSummary {
            final_amount: balance,
            total_interest,
            rate_per_period: rate,
            period_count: n_work,
            period_type: working,
            total_contributed: Some(total_contributed),
        },
        rows,
        comparison,
        contribution: Some(ContributionPlan {
            working_unit: working,
            working_periods: n_work,
            interval,
            contributions_made,
        }),
    })
}
