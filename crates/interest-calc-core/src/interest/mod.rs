pub mod comparison;
pub mod compound;
pub mod simple;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InterestCalcError;
use crate::period::{ContributionInterval, PeriodType};
use crate::types::{Money, Rate};
use crate::InterestCalcResult;

pub use comparison::ComparisonResult;

/// Upper bound on the number of periods simulated in one schedule.
pub const MAX_SCHEDULE_PERIODS: u64 = 100_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One line of the period-by-period breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub index: u64,
    pub label: String,
    pub accumulated_value: Money,
    /// Interest earned during this period; zero on row 0.
    pub period_interest: Money,
    /// Interest earned from row 0 up to and including this period.
    pub accumulated_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub final_amount: Money,
    pub total_interest: Money,
    pub rate_per_period: Rate,
    pub period_count: u64,
    /// Unit of `period_count` and `rate_per_period`.
    pub period_type: PeriodType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_contributed: Option<Money>,
}

/// Periodic deposit added on top of the principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: Money,
    /// Contribute once every `every` units of `unit`.
    pub every: u32,
    pub unit: PeriodType,
}

/// How a contribution was laid onto the working grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub working_unit: PeriodType,
    pub working_periods: u64,
    pub interval: ContributionInterval,
    pub contributions_made: u64,
}

/// Full output of one interest calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestSchedule {
    pub summary: ResultSummary,
    pub rows: Vec<PeriodRow>,
    pub comparison: Option<ComparisonResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<ContributionPlan>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn overflow(context: &str) -> InterestCalcError {
    InterestCalcError::Overflow {
        context: context.into(),
    }
}

pub(crate) fn ensure_schedule_len(periods: u64, unit: PeriodType) -> InterestCalcResult<()> {
    if periods > MAX_SCHEDULE_PERIODS {
        return Err(InterestCalcError::InvalidInput {
            field: "periods".into(),
            reason: format!(
                "{periods} {} exceeds the limit of {MAX_SCHEDULE_PERIODS} periods per schedule",
                unit.plural_label()
            ),
        });
    }
    Ok(())
}

/// (1 + r)^n by repeated multiplication, failing instead of overflowing.
pub(crate) fn growth_factor(rate: Rate, periods: u64) -> InterestCalcResult<Decimal> {
    let growth = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor
            .checked_mul(growth)
            .ok_or_else(|| overflow("compound growth factor"))?;
    }
    Ok(factor)
}
