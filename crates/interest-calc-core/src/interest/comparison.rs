use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Simple versus compound outcome for identical principal, rate and count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub simple_final_amount: Money,
    pub compound_final_amount: Money,
    /// `compound − simple`. Not negative for a non-negative rate unless the
    /// simple side includes contributions.
    pub difference: Money,
}

pub fn compare(simple_final_amount: Money, compound_final_amount: Money) -> ComparisonResult {
    ComparisonResult {
        simple_final_amount,
        compound_final_amount,
        difference: compound_final_amount - simple_final_amount,
    }
}
