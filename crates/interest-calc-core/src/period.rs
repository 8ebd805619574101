use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::InterestCalcError;
use crate::types::Rate;

/// Time unit over which interest accrues once.
///
/// Variants are declared finest first, so the derived ordering is
/// `Days < Months < Years` and [`PeriodType::finer`] is a plain `min`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Days,
    Months,
    #[default]
    Years,
}

impl PeriodType {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PeriodType::Days => 365,
            PeriodType::Months => 12,
            PeriodType::Years => 1,
        }
    }

    /// Per-period rate for an annual rate: years keep it, months divide by
    /// 12, days by 365. Never annualized through compounding.
    pub fn period_rate(self, annual_rate: Rate) -> Rate {
        annual_rate / Decimal::from(self.periods_per_year())
    }

    /// The finer of two units.
    pub fn finer(self, other: PeriodType) -> PeriodType {
        self.min(other)
    }

    /// Re-express `count` periods of `self` in periods of `unit`, truncated.
    pub fn convert_count(self, count: u32, unit: PeriodType) -> u64 {
        u64::from(count) * u64::from(unit.periods_per_year())
            / u64::from(self.periods_per_year())
    }

    /// Singular label used for rows and table headers.
    pub fn label(self) -> &'static str {
        match self {
            PeriodType::Days => "Día",
            PeriodType::Months => "Mes",
            PeriodType::Years => "Año",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            PeriodType::Days => "días",
            PeriodType::Months => "meses",
            PeriodType::Years => "años",
        }
    }

    /// "año a año", "mes a mes", "día a día".
    pub fn evolution_label(self) -> &'static str {
        match self {
            PeriodType::Days => "día a día",
            PeriodType::Months => "mes a mes",
            PeriodType::Years => "año a año",
        }
    }

    pub fn row_label(self, index: u64) -> String {
        format!("{} {}", self.label(), index)
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodType::Days => "days",
            PeriodType::Months => "months",
            PeriodType::Years => "years",
        };
        f.write_str(name)
    }
}

impl FromStr for PeriodType {
    type Err = InterestCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "days" | "day" | "d" | "días" | "dias" | "diario" => Ok(PeriodType::Days),
            "months" | "month" | "m" | "meses" | "mes" => Ok(PeriodType::Months),
            "years" | "year" | "y" | "años" | "anos" | "año" => Ok(PeriodType::Years),
            other => Err(InterestCalcError::InvalidInput {
                field: "period_type".into(),
                reason: format!("unknown period type '{other}' (expected years, months or days)"),
            }),
        }
    }
}

/// How often a periodic contribution is made, measured in working periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionInterval {
    /// Whole working periods between two contributions (at least 1).
    pub periods: u64,
    /// True when rounding moved the cadence away from the requested one.
    pub rounded: bool,
}

/// Convert "every `every` units of `unit`" into working periods:
/// `max(1, round(every × working_per_year / unit_per_year))`, half up.
pub fn contribution_interval(
    every: u32,
    unit: PeriodType,
    working: PeriodType,
) -> ContributionInterval {
    let exact = Decimal::from(u64::from(every) * u64::from(working.periods_per_year()))
        / Decimal::from(unit.periods_per_year());
    let rounded = exact.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let periods = rounded.to_u64().unwrap_or(u64::MAX).max(1);
    ContributionInterval {
        periods,
        rounded: Decimal::from(periods) != exact,
    }
}
