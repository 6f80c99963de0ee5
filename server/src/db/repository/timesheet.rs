//! Timesheet Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Timesheet, TimesheetStatus};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "timesheet";

/// Figures frozen onto a timesheet at approval time, already rounded
/// to storage precision
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ApprovalFigures {
    pub client_units: f64,
    pub client_amount: f64,
    pub interpreter_units: f64,
    pub interpreter_amount: f64,
}

#[derive(Clone)]
pub struct TimesheetRepository {
    base: BaseRepository,
}

impl TimesheetRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Timesheet>> {
        let timesheets: Vec<Timesheet> = self
            .base
            .db()
            .query("SELECT * FROM timesheet ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(timesheets)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Timesheet>> {
        let record = parse_record_id(TABLE, id)?;
        let timesheet: Option<Timesheet> = self.base.db().select(record).await?;
        Ok(timesheet)
    }

    pub async fn find_by_interpreter(&self, interpreter_id: &str) -> RepoResult<Vec<Timesheet>> {
        let interpreter = parse_record_id("interpreter", interpreter_id)?.to_string();
        let timesheets: Vec<Timesheet> = self
            .base
            .db()
            .query(
                "SELECT * FROM timesheet WHERE interpreter = $interpreter \
                 ORDER BY created_at DESC",
            )
            .bind(("interpreter", interpreter))
            .await?
            .take(0)?;
        Ok(timesheets)
    }

    /// Timesheets eligible for a client invoice rollup: approved, not
    /// yet linked, actual start inside the period (inclusive bounds)
    pub async fn find_eligible_for_client_invoice(
        &self,
        client_id: &str,
        period_start: i64,
        period_end: i64,
    ) -> RepoResult<Vec<Timesheet>> {
        let client = parse_record_id("client", client_id)?.to_string();
        let timesheets: Vec<Timesheet> = self
            .base
            .db()
            .query(
                "SELECT * FROM timesheet \
                 WHERE client = $client \
                   AND ready_for_client_invoice = true \
                   AND client_invoice = NONE \
                   AND actual_start >= $start AND actual_start <= $end \
                 ORDER BY actual_start",
            )
            .bind(("client", client))
            .bind(("start", period_start))
            .bind(("end", period_end))
            .await?
            .take(0)?;
        Ok(timesheets)
    }

    /// Submit a new timesheet
    pub async fn create(&self, timesheet: Timesheet) -> RepoResult<Timesheet> {
        let created: Option<Timesheet> = self.base.db().create(TABLE).content(timesheet).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create timesheet".to_string()))
    }

    /// Freeze computed figures onto a timesheet at approval
    ///
    /// Only lands while the timesheet is unapproved; re-approval loses
    /// and surfaces as a conflict, keeping the frozen figures immutable.
    pub async fn approve(&self, id: &str, figures: ApprovalFigures) -> RepoResult<Timesheet> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $record SET \
                     admin_approved = true, \
                     status = $status, \
                     client_units = $figures.client_units, \
                     client_amount = $figures.client_amount, \
                     interpreter_units = $figures.interpreter_units, \
                     interpreter_amount = $figures.interpreter_amount, \
                     ready_for_client_invoice = true, \
                     ready_for_interpreter_invoice = true \
                 WHERE admin_approved = false RETURN AFTER",
            )
            .bind(("record", record))
            .bind(("status", TimesheetStatus::Approved))
            .bind(("figures", figures))
            .await?;

        let updated: Vec<Timesheet> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Duplicate(format!("Timesheet {} already approved", id)))
    }
}
