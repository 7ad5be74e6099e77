use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::LedgerResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates as entered on a loan form (5 = 5%). Convert with `/ 100` before use.
pub type Percent = Decimal;

/// Display currency for formatted amounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    PHP,
    USD,
    EUR,
    GBP,
    Other(String),
}

impl Currency {
    pub fn symbol(&self) -> &str {
        match self {
            Currency::PHP => "₱",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::Other(symbol) => symbol,
        }
    }
}

/// Lifecycle status of a loan. `Settled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Approved,
    Rejected,
    Settled,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 3] = [LoanStatus::Approved, LoanStatus::Rejected, LoanStatus::Settled];

    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
            LoanStatus::Settled => "Settled",
        }
    }

    /// Settled loans carry no payment obligations.
    pub fn is_settled(self) -> bool {
        self == LoanStatus::Settled
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LedgerError::Parse {
                field: "status".into(),
                value: s.to_string(),
                reason: "Expected one of Approved, Rejected, Settled".into(),
            })
    }
}

/// Typed loan fields as supplied by a caller, before any derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub borrower_name: String,
    pub principal: Money,
    pub term_months: i32,
    pub interest_rate: Percent,
    pub status: LoanStatus,
}

impl LoanInput {
    /// Reject inputs that must never reach storage.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.borrower_name.trim().is_empty() {
            return Err(LedgerError::empty_field("borrower_name"));
        }
        Ok(())
    }
}

/// A persisted loan. `total_paid` is never stored; see [`LoanRecord::total_paid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: i64,
    pub borrower_name: String,
    pub principal: Money,
    pub term_months: i32,
    pub interest_rate: Percent,
    pub status: LoanStatus,
    pub created_on: NaiveDate,
    pub monthly_payment: Money,
}

impl LoanRecord {
    /// Total paid over the term, rebuilt from the stored monthly payment.
    pub fn total_paid(&self) -> LedgerResult<Money> {
        crate::payment::PaymentSchedule::for_record(self).map(|s| s.total_paid)
    }

    pub fn to_input(&self) -> LoanInput {
        LoanInput {
            borrower_name: self.borrower_name.clone(),
            principal: self.principal,
            term_months: self.term_months,
            interest_rate: self.interest_rate,
            status: self.status,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("settled".parse::<LoanStatus>().unwrap(), LoanStatus::Settled);
        assert_eq!(" Approved ".parse::<LoanStatus>().unwrap(), LoanStatus::Approved);
        assert!(matches!(
            "Pending".parse::<LoanStatus>(),
            Err(LedgerError::Parse { .. })
        ));
    }

    #[test]
    fn test_blank_borrower_fails_validation() {
        let input = LoanInput {
            borrower_name: "   ".into(),
            principal: dec!(1000),
            term_months: 6,
            interest_rate: dec!(3),
            status: LoanStatus::Approved,
        };
        assert!(input.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_settled_record_total_paid_is_zero_even_with_stale_payment() {
        let record = LoanRecord {
            id: 1,
            borrower_name: "Reyes".into(),
            principal: dec!(5000),
            term_months: 10,
            interest_rate: dec!(10),
            status: LoanStatus::Settled,
            created_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            monthly_payment: dec!(550),
        };
        assert_eq!(record.total_paid().unwrap(), Decimal::ZERO);
    }
}
