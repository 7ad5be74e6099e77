pub mod loans;
pub mod quote;

use std::path::PathBuf;

use log::debug;
use loan_ledger_core::presentation::Presenter;
use loan_ledger_core::repository::LoanRepository;
use loan_ledger_core::{Currency, LedgerResult};

/// Settings shared by every ledger subcommand.
pub struct Context {
    pub db: PathBuf,
    pub presenter: Presenter,
}

impl Context {
    pub fn new(db: Option<PathBuf>, currency: Currency) -> Self {
        Context {
            db: db.unwrap_or_else(LoanRepository::default_path),
            presenter: Presenter::new(currency),
        }
    }

    pub fn repository(&self) -> LedgerResult<LoanRepository> {
        debug!("using ledger {}", self.db.display());
        LoanRepository::open(&self.db)
    }
}
