//! Client Invoice Repository
//!
//! The rollup write is a single multi-statement transaction: the
//! invoice, its lines, and the timesheet back-links land together or
//! not at all.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    ClientInvoice, ClientInvoiceLine, ClientInvoiceStatus, TimesheetStatus,
};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "client_invoice";

#[derive(Clone)]
pub struct ClientInvoiceRepository {
    base: BaseRepository,
}

impl ClientInvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<ClientInvoice>> {
        let invoices: Vec<ClientInvoice> = self
            .base
            .db()
            .query("SELECT * FROM client_invoice ORDER BY issue_date DESC")
            .await?
            .take(0)?;
        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ClientInvoice>> {
        let record = parse_record_id(TABLE, id)?;
        let invoice: Option<ClientInvoice> = self.base.db().select(record).await?;
        Ok(invoice)
    }

    pub async fn find_by_client(&self, client_id: &str) -> RepoResult<Vec<ClientInvoice>> {
        let client = parse_record_id("client", client_id)?.to_string();
        let invoices: Vec<ClientInvoice> = self
            .base
            .db()
            .query("SELECT * FROM client_invoice WHERE client = $client ORDER BY issue_date DESC")
            .bind(("client", client))
            .await?
            .take(0)?;
        Ok(invoices)
    }

    pub async fn find_lines(&self, invoice_id: &str) -> RepoResult<Vec<ClientInvoiceLine>> {
        let invoice = parse_record_id(TABLE, invoice_id)?.to_string();
        let lines: Vec<ClientInvoiceLine> = self
            .base
            .db()
            .query("SELECT * FROM client_invoice_line WHERE invoice = $invoice")
            .bind(("invoice", invoice))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// Atomically create the invoice, its lines, and stamp the rolled-up
    /// timesheets as INVOICED
    ///
    /// The invoice record id is fixed up front so the lines and the
    /// timesheet back-links can reference it inside the same
    /// transaction. Any failed statement aborts the whole batch.
    pub async fn create_with_lines(
        &self,
        invoice_key: &str,
        invoice: ClientInvoice,
        lines: Vec<ClientInvoiceLine>,
        timesheet_ids: Vec<RecordId>,
    ) -> RepoResult<ClientInvoice> {
        let invoice_link = format!("{}:{}", TABLE, invoice_key);
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::thing($table, $inv_key) CONTENT $invoice; \
                 FOR $line IN $lines { CREATE client_invoice_line CONTENT $line; }; \
                 FOR $ts IN $timesheets { \
                     UPDATE $ts SET \
                         client_invoice = $inv_link, \
                         status = $invoiced, \
                         ready_for_client_invoice = false; \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("table", TABLE))
            .bind(("inv_key", invoice_key.to_string()))
            .bind(("inv_link", invoice_link))
            .bind(("invoice", invoice))
            .bind(("lines", lines))
            .bind(("timesheets", timesheet_ids))
            .bind(("invoiced", TimesheetStatus::Invoiced))
            .await?;

        let created: Vec<ClientInvoice> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Invoice transaction failed".to_string()))
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ClientInvoiceStatus,
    ) -> RepoResult<ClientInvoice> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET status = $status RETURN AFTER")
            .bind(("record", record))
            .bind(("status", status))
            .await?;
        let updated: Vec<ClientInvoice> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))
    }
}
