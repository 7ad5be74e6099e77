use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::types::*;
use crate::LedgerResult;

const MONEY_DP: u32 = 2;

fn round2(value: Decimal) -> Money {
    // Midpoint-to-even.
    value.round_dp(MONEY_DP)
}

fn overflow(context: &str) -> LedgerError {
    LedgerError::Overflow {
        context: context.into(),
    }
}

/// Monthly instalment under simple interest spread evenly over the term.
///
/// A term of zero or fewer months yields zero rather than an error. Amounts
/// too large for a `Decimal` fail with [`LedgerError::Overflow`].
pub fn monthly_payment(
    principal: Money,
    rate_percent: Percent,
    term_months: i32,
) -> LedgerResult<Money> {
    if term_months <= 0 {
        return Ok(Decimal::ZERO);
    }
    let rate: Rate = rate_percent / dec!(100);
    let owed = principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_add(principal))
        .ok_or_else(|| overflow("principal × rate + principal"))?;
    let monthly = owed
        .checked_div(Decimal::from(term_months))
        .ok_or_else(|| overflow("monthly payment"))?;
    Ok(round2(monthly))
}

/// Total paid across the term for a given instalment.
pub fn total_paid(monthly_payment: Money, term_months: i32) -> LedgerResult<Money> {
    monthly_payment
        .checked_mul(Decimal::from(term_months))
        .map(round2)
        .ok_or_else(|| overflow("monthly payment × term"))
}

/// Derived payment figures for a loan, with the Settled override applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub monthly_payment: Money,
    pub total_paid: Money,
}

impl PaymentSchedule {
    pub const ZERO: PaymentSchedule = PaymentSchedule {
        monthly_payment: Decimal::ZERO,
        total_paid: Decimal::ZERO,
    };

    pub fn for_status(
        principal: Money,
        rate_percent: Percent,
        term_months: i32,
        status: LoanStatus,
    ) -> LedgerResult<Self> {
        if status.is_settled() {
            return Ok(Self::ZERO);
        }
        let monthly = monthly_payment(principal, rate_percent, term_months)?;
        Ok(PaymentSchedule {
            monthly_payment: monthly,
            total_paid: total_paid(monthly, term_months)?,
        })
    }

    /// Figures for a stored record, rebuilt from its stored monthly payment.
    pub fn for_record(record: &LoanRecord) -> LedgerResult<Self> {
        if record.status.is_settled() {
            return Ok(Self::ZERO);
        }
        Ok(PaymentSchedule {
            monthly_payment: record.monthly_payment,
            total_paid: total_paid(record.monthly_payment, record.term_months)?,
        })
    }

    pub fn for_input(input: &LoanInput) -> LedgerResult<Self> {
        Self::for_status(
            input.principal,
            input.interest_rate,
            input.term_months,
            input.status,
        )
    }
}

/// Payment preview for a loan that has not been stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub principal: Money,
    pub interest_rate: Percent,
    pub term_months: i32,
    pub status: LoanStatus,
    pub total_interest: Money,
    pub monthly_payment: Money,
    pub total_paid: Money,
}

/// Run the calculator for a prospective loan and wrap it in the standard envelope.
pub fn quote(input: &LoanInput) -> LedgerResult<ComputationOutput<PaymentQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.term_months <= 0 {
        warnings.push(format!(
            "Term of {} months; payments reported as 0",
            input.term_months
        ));
    }
    if input.status.is_settled() {
        warnings.push("Loan is Settled; payment figures forced to 0".into());
    }

    let schedule = PaymentSchedule::for_input(input)?;
    let total_interest = if input.status.is_settled() {
        Decimal::ZERO
    } else {
        let rate: Rate = input.interest_rate / dec!(100);
        input
            .principal
            .checked_mul(rate)
            .map(round2)
            .ok_or_else(|| overflow("principal × rate"))?
    };

    let result = PaymentQuote {
        principal: input.principal,
        interest_rate: input.interest_rate,
        term_months: input.term_months,
        status: input.status,
        total_interest,
        monthly_payment: schedule.monthly_payment,
        total_paid: schedule.total_paid,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Simple interest (principal × rate + principal) spread evenly over the term, rounded to 2dp",
        input,
        warnings,
        elapsed,
        result,
    ))
}
