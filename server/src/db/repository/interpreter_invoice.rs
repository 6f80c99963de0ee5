//! Interpreter Invoice Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{InterpreterInvoice, InterpreterInvoiceLine, InterpreterInvoiceStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "interpreter_invoice";

#[derive(Clone)]
pub struct InterpreterInvoiceRepository {
    base: BaseRepository,
}

impl InterpreterInvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<InterpreterInvoice>> {
        let invoices: Vec<InterpreterInvoice> = self
            .base
            .db()
            .query("SELECT * FROM interpreter_invoice ORDER BY submitted_at DESC")
            .await?
            .take(0)?;
        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<InterpreterInvoice>> {
        let record = parse_record_id(TABLE, id)?;
        let invoice: Option<InterpreterInvoice> = self.base.db().select(record).await?;
        Ok(invoice)
    }

    pub async fn find_by_interpreter(
        &self,
        interpreter_id: &str,
    ) -> RepoResult<Vec<InterpreterInvoice>> {
        let interpreter = parse_record_id("interpreter", interpreter_id)?.to_string();
        let invoices: Vec<InterpreterInvoice> = self
            .base
            .db()
            .query(
                "SELECT * FROM interpreter_invoice WHERE interpreter = $interpreter \
                 ORDER BY submitted_at DESC",
            )
            .bind(("interpreter", interpreter))
            .await?
            .take(0)?;
        Ok(invoices)
    }

    pub async fn find_lines(&self, invoice_id: &str) -> RepoResult<Vec<InterpreterInvoiceLine>> {
        let invoice = parse_record_id(TABLE, invoice_id)?.to_string();
        let lines: Vec<InterpreterInvoiceLine> = self
            .base
            .db()
            .query("SELECT * FROM interpreter_invoice_line WHERE invoice = $invoice")
            .bind(("invoice", invoice))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// Atomically create a self-billed invoice, its lines, and link the
    /// claimed timesheets
    pub async fn submit_with_lines(
        &self,
        invoice_key: &str,
        invoice: InterpreterInvoice,
        lines: Vec<InterpreterInvoiceLine>,
        timesheet_ids: Vec<RecordId>,
    ) -> RepoResult<InterpreterInvoice> {
        let invoice_link = format!("{}:{}", TABLE, invoice_key);
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::thing($table, $inv_key) CONTENT $invoice; \
                 FOR $line IN $lines { CREATE interpreter_invoice_line CONTENT $line; }; \
                 FOR $ts IN $timesheets { \
                     UPDATE $ts SET \
                         interpreter_invoice = $inv_link, \
                         ready_for_interpreter_invoice = false; \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("table", TABLE))
            .bind(("inv_key", invoice_key.to_string()))
            .bind(("inv_link", invoice_link))
            .bind(("invoice", invoice))
            .bind(("lines", lines))
            .bind(("timesheets", timesheet_ids))
            .await?;

        let created: Vec<InterpreterInvoice> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Invoice transaction failed".to_string()))
    }

    /// Resolve a submitted invoice
    ///
    /// Rejection unlinks the claimed timesheets so they can be claimed
    /// again on a corrected invoice.
    pub async fn resolve(
        &self,
        id: &str,
        status: InterpreterInvoiceStatus,
    ) -> RepoResult<InterpreterInvoice> {
        let record = parse_record_id(TABLE, id)?;
        let record_link = record.to_string();
        let now = chrono::Utc::now().timestamp_millis();

        // The unlink re-checks the invoice row: when the guarded update
        // matched nothing the status is still the old one, and the
        // claimed timesheets must stay claimed.
        let query = if status == InterpreterInvoiceStatus::Rejected {
            "BEGIN TRANSACTION; \
             UPDATE $record SET status = $status, resolved_at = $now \
                 WHERE status = 'SUBMITTED' RETURN AFTER; \
             UPDATE timesheet SET \
                 interpreter_invoice = NONE, \
                 ready_for_interpreter_invoice = true \
                 WHERE interpreter_invoice = $record_link \
                   AND (SELECT VALUE status FROM ONLY $record) = 'REJECTED'; \
             COMMIT TRANSACTION;"
        } else {
            "UPDATE $record SET status = $status, resolved_at = $now \
                 WHERE status = 'SUBMITTED' RETURN AFTER;"
        };

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("record", record))
            .bind(("record_link", record_link))
            .bind(("status", status))
            .bind(("now", now))
            .await?;

        let updated: Vec<InterpreterInvoice> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Duplicate(format!("Invoice {} already resolved", id)))
    }
}
