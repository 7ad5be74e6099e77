use clap::Args;
use serde_json::{json, Value};

use loan_ledger_core::form::LoanForm;
use loan_ledger_core::repository::parse_loan_id;
use loan_ledger_core::LedgerError;

use super::Context;
use crate::input;

/// Loan form fields. Values are taken as typed and parsed by the ledger.
#[derive(Args, Default)]
#[command(allow_hyphen_values = true)]
pub struct FormFields {
    /// Borrower's name
    #[arg(long)]
    pub borrower: Option<String>,

    /// Loan amount
    #[arg(long, alias = "amount")]
    pub principal: Option<String>,

    /// Loan term in months
    #[arg(long)]
    pub term: Option<String>,

    /// Interest rate in percent (5 = 5%)
    #[arg(long)]
    pub rate: Option<String>,

    /// Approved, Rejected or Settled
    #[arg(long)]
    pub status: Option<String>,
}

impl FormFields {
    fn is_empty(&self) -> bool {
        self.borrower.is_none()
            && self.principal.is_none()
            && self.term.is_none()
            && self.rate.is_none()
            && self.status.is_none()
    }

    /// Overwrite only the fields given on the command line.
    fn apply_to(self, form: &mut LoanForm) {
        if let Some(v) = self.borrower {
            form.borrower_name = v;
        }
        if let Some(v) = self.principal {
            form.principal = v;
        }
        if let Some(v) = self.term {
            form.term_months = v;
        }
        if let Some(v) = self.rate {
            form.interest_rate = v;
        }
        if let Some(v) = self.status {
            form.status = v;
        }
    }
}

/// Arguments for recording a loan
#[derive(Args)]
pub struct AddArgs {
    /// Path to JSON form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: FormFields,
}

/// Arguments for showing a loan
#[derive(Args)]
pub struct ShowArgs {
    /// Loan id
    pub id: String,
}

/// Arguments for editing a loan
#[derive(Args)]
pub struct EditArgs {
    /// Loan id
    pub id: String,

    #[command(flatten)]
    pub fields: FormFields,
}

/// Arguments for deleting a loan
#[derive(Args)]
pub struct DeleteArgs {
    /// Loan id
    pub id: String,
}

fn read_form(args: AddArgs) -> Result<LoanForm, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if args.fields.is_empty() {
        if let Some(form) = input::stdin::read_piped::<LoanForm>()? {
            return Ok(form);
        }
    }
    let mut form = LoanForm::default();
    args.fields.apply_to(&mut form);
    Ok(form)
}

pub fn run_add(ctx: &Context, args: AddArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = read_form(args)?.parse()?;
    let record = ctx.repository()?.add(&loan)?;
    Ok(serde_json::to_value(ctx.presenter.row(&record)?)?)
}

pub fn run_list(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let records = ctx.repository()?.list()?;
    Ok(serde_json::to_value(ctx.presenter.rows(&records)?)?)
}

pub fn run_show(ctx: &Context, args: ShowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let id = parse_loan_id(&args.id)?;
    let record = ctx
        .repository()?
        .get(id)?
        .ok_or(LedgerError::NotFound(id))?;
    Ok(serde_json::to_value(ctx.presenter.row(&record)?)?)
}

pub fn run_edit(ctx: &Context, args: EditArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let id = parse_loan_id(&args.id)?;
    let repo = ctx.repository()?;
    let existing = repo.get(id)?.ok_or(LedgerError::NotFound(id))?;

    let mut form = LoanForm::from_record(&existing);
    args.fields.apply_to(&mut form);
    let record = repo.update(id, &form.parse()?)?;
    Ok(serde_json::to_value(ctx.presenter.row(&record)?)?)
}

pub fn run_delete(ctx: &Context, args: DeleteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let id = parse_loan_id(&args.id)?;
    let outcome = ctx.repository()?.delete(id)?;
    Ok(serde_json::to_value(outcome)?)
}

pub fn run_recycled(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let ids = ctx.repository()?.recycled_ids()?;
    Ok(json!({ "recycled_ids": ids }))
}
