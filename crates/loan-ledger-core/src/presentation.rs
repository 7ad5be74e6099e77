//! Display-ready views of stored loans.
//!
//! Payment figures shown here are always rebuilt from the stored monthly
//! payment and term; stored totals are never trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payment::PaymentSchedule;
use crate::types::*;
use crate::LedgerResult;

/// A record with its display-time payment figures applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: i64,
    pub borrower_name: String,
    pub principal: Money,
    pub term_months: i32,
    pub interest_rate: Percent,
    pub status: LoanStatus,
    pub created_on: NaiveDate,
    pub monthly_payment: Money,
    pub total_paid: Money,
}

impl LoanView {
    pub fn from_record(record: &LoanRecord) -> LedgerResult<Self> {
        let schedule = PaymentSchedule::for_record(record)?;

        Ok(LoanView {
            id: record.id,
            borrower_name: record.borrower_name.clone(),
            principal: record.principal,
            term_months: record.term_months,
            interest_rate: record.interest_rate,
            status: record.status,
            created_on: record.created_on,
            monthly_payment: schedule.monthly_payment,
            total_paid: schedule.total_paid,
        })
    }
}

/// One table row, every column already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub id: i64,
    pub borrower: String,
    pub loan_amount: String,
    pub term_months: i32,
    pub interest_rate: String,
    pub status: String,
    pub total_paid: String,
    pub monthly_payment: String,
    pub date: String,
}

#[derive(Debug, Clone, Default)]
pub struct Presenter {
    currency: Currency,
}

impl Presenter {
    pub fn new(currency: Currency) -> Self {
        Presenter { currency }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn row(&self, record: &LoanRecord) -> LedgerResult<DisplayRow> {
        let view = LoanView::from_record(record)?;
        Ok(DisplayRow {
            id: view.id,
            borrower: view.borrower_name,
            loan_amount: format_money(view.principal, &self.currency),
            term_months: view.term_months,
            interest_rate: format_rate(view.interest_rate),
            status: view.status.to_string(),
            total_paid: format_money(view.total_paid, &self.currency),
            monthly_payment: format_money(view.monthly_payment, &self.currency),
            date: view.created_on.format("%Y-%m-%d").to_string(),
        })
    }

    pub fn rows(&self, records: &[LoanRecord]) -> LedgerResult<Vec<DisplayRow>> {
        records.iter().map(|r| self.row(r)).collect()
    }
}

/// `₱1,234,567.89` style: symbol, sign, thousands separators, two decimals.
///
/// Every currency gets two decimals, including an [`Currency::Other`] symbol
/// whose real-world minor unit differs.
pub fn format_money(amount: Money, currency: &Currency) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!(
        "{}{}{}.{}",
        currency.symbol(),
        sign,
        group_thousands(whole),
        cents
    )
}

/// `5%`, `12.5%`; trailing zeros dropped.
pub fn format_rate(rate: Percent) -> String {
    format!("{}%", rate.normalize())
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
