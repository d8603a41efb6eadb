//! Report execution.
//!
//! The runner walks the catalog in order, executes each report against a
//! `DatabaseClient`, and writes a titled section with a rendered table to
//! its output sink. The first failure aborts the remaining reports;
//! output already written stays as-is.

mod render;

pub use render::render_table;

use crate::catalog::{self, ReportDef, REPORTS};
use crate::db::DatabaseClient;
use crate::error::{ReportError, Result};
use std::io::Write;
use tracing::debug;

/// Width of the dash run on each side of a section title.
const SEPARATOR_WIDTH: usize = 20;

/// Settings that apply to a single reporting pass.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Patient identifier for the patient-scoped reports. When unset,
    /// each such report uses its catalog default.
    pub patient: Option<String>,
}

/// Executes catalog reports sequentially and renders their output.
pub struct ReportRunner<'a, W: Write> {
    db: &'a dyn DatabaseClient,
    out: W,
    options: ReportOptions,
}

impl<'a, W: Write> ReportRunner<'a, W> {
    /// Creates a runner writing to the given sink.
    pub fn new(db: &'a dyn DatabaseClient, out: W, options: ReportOptions) -> Self {
        Self { db, out, options }
    }

    /// Runs every catalog report, in catalog order.
    ///
    /// Stops at the first error. Sections already written are not rolled
    /// back; the reports are read-only so there is nothing to undo.
    pub async fn run_all(&mut self) -> Result<()> {
        for report in REPORTS {
            self.run_report(report).await?;
        }
        Ok(())
    }

    /// Runs a single report by catalog name.
    pub async fn run_one(&mut self, name: &str) -> Result<()> {
        let report = catalog::find(name).ok_or_else(|| {
            ReportError::config(format!(
                "Unknown report '{name}'. Valid reports: {}",
                catalog::names().join(", ")
            ))
        })?;

        self.run_report(report).await
    }

    async fn run_report(&mut self, report: &ReportDef) -> Result<()> {
        let dashes = "-".repeat(SEPARATOR_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{dashes} {} {dashes}", report.title)?;

        let mut params: Vec<&str> = Vec::new();
        if report.takes_patient() {
            let patient = self
                .options
                .patient
                .as_deref()
                .or(report.default_patient)
                .ok_or_else(|| {
                    ReportError::internal(format!("report {} has no patient id", report.name))
                })?;
            params.push(patient);
        }

        let result = self.db.execute_query(report.sql, &params).await?;

        debug!(
            report = report.name,
            rows = result.row_count,
            elapsed_ms = result.execution_time.as_millis() as u64,
            "report executed"
        );

        writeln!(self.out, "{}", render_table(&result))?;
        Ok(())
    }
}
