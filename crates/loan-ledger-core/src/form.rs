use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::types::*;
use crate::LedgerResult;

/// Loan fields exactly as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanForm {
    pub borrower_name: String,
    pub principal: String,
    pub term_months: String,
    pub interest_rate: String,
    pub status: String,
}

impl LoanForm {
    /// Pre-filled form for editing an existing record.
    pub fn from_record(record: &LoanRecord) -> Self {
        LoanForm {
            borrower_name: record.borrower_name.clone(),
            principal: record.principal.to_string(),
            term_months: record.term_months.to_string(),
            interest_rate: record.interest_rate.to_string(),
            status: record.status.to_string(),
        }
    }

    /// Empty fields fail validation before any number is parsed.
    pub fn parse(&self) -> LedgerResult<LoanInput> {
        let fields = [
            ("borrower_name", &self.borrower_name),
            ("principal", &self.principal),
            ("term_months", &self.term_months),
            ("interest_rate", &self.interest_rate),
            ("status", &self.status),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(LedgerError::empty_field(field));
        }

        Ok(LoanInput {
            borrower_name: self.borrower_name.trim().to_string(),
            principal: parse_decimal("principal", &self.principal)?,
            term_months: parse_term(&self.term_months)?,
            interest_rate: parse_decimal("interest_rate", &self.interest_rate)?,
            status: LoanStatus::from_str(&self.status)?,
        })
    }
}

fn parse_decimal(field: &str, raw: &str) -> LedgerResult<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|e| LedgerError::Parse {
        field: field.into(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Whole months. Zero and negative terms are accepted and carry no payments.
fn parse_term(raw: &str) -> LedgerResult<i32> {
    raw.trim().parse::<i32>().map_err(|e| LedgerError::Parse {
        field: "term_months".into(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn cruz_form() -> LoanForm {
        LoanForm {
            borrower_name: "Cruz".into(),
            principal: "10,000".into(),
            term_months: "12".into(),
            interest_rate: "5".into(),
            status: "Approved".into(),
        }
    }

    #[test]
    fn test_parse_complete_form() {
        let input = cruz_form().parse().unwrap();
        assert_eq!(
            input,
            LoanInput {
                borrower_name: "Cruz".into(),
                principal: dec!(10000),
                term_months: 12,
                interest_rate: dec!(5),
                status: LoanStatus::Approved,
            }
        );
    }

    #[test]
    fn test_empty_field_is_validation_error() {
        let mut form = cruz_form();
        form.status.clear();
        match form.parse() {
            Err(LedgerError::Validation { field, .. }) => assert_eq!(field, "status"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_emptiness_checked_before_numbers() {
        let mut form = cruz_form();
        form.principal = "abc".into();
        form.borrower_name = String::new();
        assert!(form.parse().unwrap_err().is_validation());
    }

    #[test]
    fn test_non_numeric_principal_is_parse_error() {
        let mut form = cruz_form();
        form.principal = "ten thousand".into();
        assert!(matches!(
            form.parse(),
            Err(LedgerError::Parse { ref field, .. }) if field == "principal"
        ));
    }

    #[test]
    fn test_fractional_term_is_parse_error() {
        let mut form = cruz_form();
        form.term_months = "12.5".into();
        assert!(matches!(form.parse(), Err(LedgerError::Parse { .. })));
    }

    #[test]
    fn test_negative_term_is_accepted() {
        let mut form = cruz_form();
        form.term_months = "-3".into();
        let input = form.parse().unwrap();
        assert_eq!(input.term_months, -3);
    }

    #[test]
    fn test_from_record_round_trips_through_parse() {
        let record = LoanRecord {
            id: 4,
            borrower_name: "Santos".into(),
            principal: dec!(2500.50),
            term_months: 6,
            interest_rate: dec!(7.5),
            status: LoanStatus::Rejected,
            created_on: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            monthly_payment: dec!(448.84),
        };
        let input = LoanForm::from_record(&record).parse().unwrap();
        assert_eq!(input, record.to_input());
    }
}
