//! Loan record persistence.
//!
//! Every operation opens its own connection, runs a single transaction and
//! closes. Nothing is written unless the whole statement group succeeds.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::id_pool::IdentifierPool;
use crate::payment::PaymentSchedule;
use crate::schema;
use crate::types::*;
use crate::LedgerResult;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "SELECT id, borrower_name, loan_amount, loan_term, interest_rate, \
                              loan_status, created_on, monthly_payment FROM loan_records";

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub id: i64,
    /// A record with this id existed and was removed.
    pub removed: bool,
    /// The id was not already waiting in the recycled set.
    pub newly_recycled: bool,
}

/// Parse a loan id typed into a form.
pub fn parse_loan_id(raw: &str) -> LedgerResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| LedgerError::Validation {
        field: "id".into(),
        reason: format!("'{raw}' is not a whole number"),
    })
}

#[derive(Debug, Clone)]
pub struct LoanRepository {
    path: PathBuf,
}

impl LoanRepository {
    pub const DEFAULT_FILE: &'static str = "loan_system.db";
    pub const PATH_ENV: &'static str = "LOAN_LEDGER_DB";

    /// `$LOAN_LEDGER_DB`, else `loan_system.db` in the working directory.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::PATH_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        PathBuf::from(Self::DEFAULT_FILE)
    }

    /// Open (or create) the ledger database at `path`.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LedgerError::Storage(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let repo = LoanRepository {
            path: path.to_path_buf(),
        };
        let conn = repo.connect()?;
        schema::ensure_schema(&conn)?;
        debug!("opened loan ledger at {}", repo.path.display());
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> LedgerResult<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create a loan dated today.
    pub fn add(&self, input: &LoanInput) -> LedgerResult<LoanRecord> {
        self.add_on(input, Local::now().date_naive())
    }

    /// Create a loan with an explicit creation date.
    pub fn add_on(&self, input: &LoanInput, created_on: NaiveDate) -> LedgerResult<LoanRecord> {
        input.validate()?;
        let schedule = PaymentSchedule::for_input(input)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let mut pool = load_pool(&tx)?;
        let reused = pool.allocate();
        if let Some(id) = reused {
            tx.execute("DELETE FROM recycled_ids WHERE id = ?1", params![id])?;
        }

        tx.execute(
            "INSERT INTO loan_records (id, borrower_name, loan_amount, loan_term, interest_rate, \
             loan_status, created_on, monthly_payment) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                reused,
                input.borrower_name,
                input.principal.to_string(),
                i64::from(input.term_months),
                input.interest_rate.to_string(),
                input.status.as_str(),
                created_on.format(DATE_FORMAT).to_string(),
                schedule.monthly_payment.to_string(),
            ],
        )?;
        let id = reused.unwrap_or_else(|| tx.last_insert_rowid());
        tx.commit()?;

        match reused {
            Some(_) => info!("added loan {id} for {} (recycled id)", input.borrower_name),
            None => info!("added loan {id} for {}", input.borrower_name),
        }

        Ok(LoanRecord {
            id,
            borrower_name: input.borrower_name.clone(),
            principal: input.principal,
            term_months: input.term_months,
            interest_rate: input.interest_rate,
            status: input.status,
            created_on,
            monthly_payment: schedule.monthly_payment,
        })
    }

    /// All records in storage (rowid) order. Stored figures are returned as-is.
    pub fn list(&self) -> LedgerResult<Vec<LoanRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(StoredRow::into_record).collect()
    }

    pub fn get(&self, id: i64) -> LedgerResult<Option<LoanRecord>> {
        let conn = self.connect()?;
        fetch(&conn, id)
    }

    /// Overwrite every field except id and creation date.
    pub fn update(&self, id: i64, input: &LoanInput) -> LedgerResult<LoanRecord> {
        input.validate()?;
        let schedule = PaymentSchedule::for_input(input)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let existing = fetch(&tx, id)?.ok_or(LedgerError::NotFound(id))?;

        tx.execute(
            "UPDATE loan_records SET borrower_name = ?1, loan_amount = ?2, loan_term = ?3, \
             interest_rate = ?4, loan_status = ?5, monthly_payment = ?6 WHERE id = ?7",
            params![
                input.borrower_name,
                input.principal.to_string(),
                i64::from(input.term_months),
                input.interest_rate.to_string(),
                input.status.as_str(),
                schedule.monthly_payment.to_string(),
                id,
            ],
        )?;
        tx.commit()?;
        info!("updated loan {id} ({} -> {})", existing.status, input.status);

        Ok(LoanRecord {
            id,
            borrower_name: input.borrower_name.clone(),
            principal: input.principal,
            term_months: input.term_months,
            interest_rate: input.interest_rate,
            status: input.status,
            created_on: existing.created_on,
            monthly_payment: schedule.monthly_payment,
        })
    }

    /// Remove a record and make its id reusable.
    ///
    /// The id is recycled even when no record had it.
    pub fn delete(&self, id: i64) -> LedgerResult<DeleteOutcome> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let removed = tx.execute("DELETE FROM loan_records WHERE id = ?1", params![id])? > 0;

        let mut pool = load_pool(&tx)?;
        let newly_recycled = pool.release(id);
        if newly_recycled {
            tx.execute("INSERT INTO recycled_ids (id) VALUES (?1)", params![id])?;
        }
        tx.commit()?;

        if removed {
            info!("deleted loan {id}");
        } else {
            warn!("delete of unknown loan id {id}; id recycled anyway");
        }

        Ok(DeleteOutcome {
            id,
            removed,
            newly_recycled,
        })
    }

    /// Ids waiting for reuse, smallest first.
    pub fn recycled_ids(&self) -> LedgerResult<Vec<i64>> {
        let conn = self.connect()?;
        Ok(load_pool(&conn)?.iter().collect())
    }

    pub fn count(&self) -> LedgerResult<usize> {
        let conn = self.connect()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM loan_records", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn load_pool(conn: &Connection) -> LedgerResult<IdentifierPool> {
    let mut stmt = conn.prepare("SELECT id FROM recycled_ids")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<IdentifierPool, _>>()?;
    Ok(ids)
}

fn fetch(conn: &Connection, id: i64) -> LedgerResult<Option<LoanRecord>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id],
        StoredRow::from_row,
    )
    .optional()?
    .map(StoredRow::into_record)
    .transpose()
}

/// A row exactly as SQLite hands it back, before decimal/date decoding.
struct StoredRow {
    id: i64,
    borrower_name: String,
    loan_amount: String,
    loan_term: i64,
    interest_rate: String,
    loan_status: String,
    created_on: String,
    monthly_payment: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(StoredRow {
            id: row.get(0)?,
            borrower_name: row.get(1)?,
            loan_amount: row.get(2)?,
            loan_term: row.get(3)?,
            interest_rate: row.get(4)?,
            loan_status: row.get(5)?,
            created_on: row.get(6)?,
            monthly_payment: row.get(7)?,
        })
    }

    fn into_record(self) -> LedgerResult<LoanRecord> {
        let id = self.id;
        let corrupt = |reason: String| LedgerError::CorruptRecord { id, reason };
        let decimal = |column: &str, text: &str| {
            Decimal::from_str(text).map_err(|e| corrupt(format!("{column} '{text}': {e}")))
        };

        Ok(LoanRecord {
            id,
            principal: decimal("loan_amount", &self.loan_amount)?,
            interest_rate: decimal("interest_rate", &self.interest_rate)?,
            monthly_payment: decimal("monthly_payment", &self.monthly_payment)?,
            term_months: i32::try_from(self.loan_term)
                .map_err(|_| corrupt(format!("loan_term {} out of range", self.loan_term)))?,
            status: LoanStatus::from_str(&self.loan_status)
                .map_err(|_| corrupt(format!("loan_status '{}'", self.loan_status)))?,
            created_on: NaiveDate::parse_from_str(&self.created_on, DATE_FORMAT)
                .map_err(|e| corrupt(format!("created_on '{}': {e}", self.created_on)))?,
            borrower_name: self.borrower_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn temp_repo() -> (tempfile::TempDir, LoanRepository) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = LoanRepository::open(dir.path().join("loans.db")).expect("open repo");
        (dir, repo)
    }

    fn input(name: &str) -> LoanInput {
        LoanInput {
            borrower_name: name.into(),
            principal: dec!(10000),
            term_months: 12,
            interest_rate: dec!(5),
            status: LoanStatus::Approved,
        }
    }

    #[test]
    fn test_parse_loan_id() {
        assert_eq!(parse_loan_id(" 17 ").unwrap(), 17);
        assert!(parse_loan_id("seven").unwrap_err().is_validation());
        assert!(parse_loan_id("").unwrap_err().is_validation());
    }

    #[test]
    fn test_first_ids_are_auto_assigned() {
        let (_dir, repo) = temp_repo();
        assert_eq!(repo.add(&input("Cruz")).unwrap().id, 1);
        assert_eq!(repo.add(&input("Santos")).unwrap().id, 2);
    }

    #[test]
    fn test_load_pool_reads_recycled_table() {
        let (_dir, repo) = temp_repo();
        repo.delete(8).unwrap();
        repo.delete(3).unwrap();
        let conn = repo.connect().unwrap();
        let mut pool = load_pool(&conn).unwrap();
        assert_eq!(pool.allocate(), Some(3));
    }

    #[test]
    fn test_corrupt_decimal_is_reported() {
        let (_dir, repo) = temp_repo();
        let id = repo.add(&input("Cruz")).unwrap().id;
        let conn = repo.connect().unwrap();
        conn.execute(
            "UPDATE loan_records SET loan_amount = 'lots' WHERE id = ?1",
            params![id],
        )
        .unwrap();
        assert!(matches!(
            repo.get(id),
            Err(LedgerError::CorruptRecord { id: bad, .. }) if bad == id
        ));
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.db");
        let repo = LoanRepository::open(&path).unwrap();
        assert!(repo.path().exists());
    }
}
