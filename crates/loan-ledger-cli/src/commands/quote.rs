use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_ledger_core::payment;
use loan_ledger_core::{LoanInput, LoanStatus};

/// Arguments for a payment preview
#[derive(Args)]
pub struct QuoteArgs {
    /// Loan amount
    #[arg(long, alias = "amount")]
    pub principal: Decimal,

    /// Loan term in months; zero or negative gives zero payments
    #[arg(long, allow_hyphen_values = true)]
    pub term: i32,

    /// Interest rate in percent (5 = 5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Approved, Rejected or Settled
    #[arg(long, default_value = "Approved")]
    pub status: String,

    /// Borrower's name, echoed in the assumptions
    #[arg(long, default_value = "")]
    pub borrower: String,
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = LoanInput {
        borrower_name: args.borrower,
        principal: args.principal,
        term_months: args.term,
        interest_rate: args.rate,
        status: args.status.parse::<LoanStatus>()?,
    };
    let result = payment::quote(&input)?;
    Ok(serde_json::to_value(result)?)
}
