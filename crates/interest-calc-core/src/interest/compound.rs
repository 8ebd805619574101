use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::comparison::compare;
use super::simple::simple_final_amount;
use super::{ensure_schedule_len, growth_factor, overflow, InterestSchedule, PeriodRow, ResultSummary};
use crate::period::PeriodType;
use crate::types::{Money, Rate};
use crate::InterestCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInput {
    pub principal: Money,
    /// Annual rate as a fraction (0.10 = 10%).
    pub annual_rate: Rate,
    pub period_type: PeriodType,
    pub periods: u32,
}

/// Lazily generated rows `value_i = P × (1 + r)^i` for `i = 0..=n`.
///
/// Each call to [`compound_rows`] starts a fresh sequence; nothing is shared
/// between two iterations.
#[derive(Debug, Clone)]
pub struct CompoundRows {
    principal: Money,
    growth: Decimal,
    factor: Decimal,
    previous: Money,
    next_index: u64,
    periods: u64,
    period_type: PeriodType,
}

impl Iterator for CompoundRows {
    type Item = PeriodRow;

    fn next(&mut self) -> Option<PeriodRow> {
        if self.next_index > self.periods {
            return None;
        }
        let index = self.next_index;
        if index > 0 {
            self.factor *= self.growth;
        }
        let value = self.principal * self.factor;
        let period_interest = if index == 0 {
            Decimal::ZERO
        } else {
            value - self.previous
        };
        self.previous = value;
        self.next_index += 1;

        Some(PeriodRow {
            index,
            label: self.period_type.row_label(index),
            accumulated_value: value,
            period_interest,
            accumulated_interest: value - self.principal,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.periods + 1).saturating_sub(self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CompoundRows {}

/// Final amount `P × (1 + r)^n` for a per-period rate `r`.
pub fn compound_final_amount(principal: Money, rate: Rate, periods: u64) -> InterestCalcResult<Money> {
    principal
        .checked_mul(growth_factor(rate, periods)?)
        .ok_or_else(|| overflow("compound final amount"))
}

/// Row sequence for a per-period rate `r` over `periods` periods.
///
/// The final value is checked up front, so iterating never overflows.
pub fn compound_rows(
    principal: Money,
    rate: Rate,
    periods: u64,
    period_type: PeriodType,
) -> InterestCalcResult<CompoundRows> {
    ensure_schedule_len(periods, period_type)?;
    compound_final_amount(principal, rate, periods)?;
    Ok(CompoundRows {
        principal,
        growth: Decimal::ONE + rate,
        factor: Decimal::ONE,
        previous: principal,
        next_index: 0,
        periods,
        period_type,
    })
}

/// Compound interest: `M = P(1 + r)^n`, interest `M − P`.
///
/// Returns `Ok(None)` when the principal or the period count is not
/// positive. The comparison holds the simple-interest amount for the same
/// principal, rate and duration.
pub fn calculate_compound(input: &CompoundInput) -> InterestCalcResult<Option<InterestSchedule>> {
    if input.principal <= Decimal::ZERO || input.periods == 0 {
        return Ok(None);
    }

    let n = u64::from(input.periods);
    let rate = input.period_type.period_rate(input.annual_rate);

    let rows: Vec<PeriodRow> = compound_rows(input.principal, rate, n, input.period_type)?.collect();
    let final_amount = compound_final_amount(input.principal, rate, n)?;

    let comparison = simple_final_amount(input.principal, rate, n)
        .ok()
        .map(|simple| compare(simple, final_amount));

    Ok(Some(InterestSchedule {
        summary: ResultSummary {
            final_amount,
            total_interest: final_amount - input.principal,
            rate_per_period: rate,
            period_count: n,
            period_type: input.period_type,
            total_contributed: None,
        },
        rows,
        comparison,
        contribution: None,
    }))
}
