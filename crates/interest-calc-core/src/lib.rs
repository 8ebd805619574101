pub mod calculator;
pub mod error;
pub mod format;
pub mod interest;
pub mod period;
pub mod types;

pub use calculator::{compute, compute_form, CalculatorForm, CalculatorInput, CalculatorView};
pub use error::InterestCalcError;
pub use period::PeriodType;
pub use types::*;

/// Standard result type for all interest-calc operations
pub type InterestCalcResult<T> = Result<T, InterestCalcError>;
