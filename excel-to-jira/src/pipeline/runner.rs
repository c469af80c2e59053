use crate::config::{Config, fields};
use crate::excel::{PersistenceError, Sheet, Spreadsheet, SpreadsheetError};
use crate::jira::IssueTracker;

use super::request::{LabelPolicy, build_issue_request};
use super::{RowError, RowFailure, RowRecord};

/// Switches that change how a run behaves
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build and log every request but call nothing and save nothing
    pub dry_run: bool,
    /// Record failed rows and keep going instead of stopping
    pub continue_on_error: bool,
}

/// An issue created for a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRow {
    pub row: u32,
    pub key: String,
    pub url: String,
}

/// Outcome of a run
#[derive(Debug, Default)]
pub struct RunReport {
    pub created: Vec<CreatedRow>,
    /// Rows whose request was only logged (dry run)
    pub previewed: usize,
    pub failures: Vec<RowFailure>,
    /// Rows were left unprocessed because of a failure
    pub aborted: bool,
    pub persist_error: Option<PersistenceError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.persist_error.is_none()
    }
}

pub struct Pipeline<'a, T: IssueTracker> {
    config: &'a Config,
    tracker: &'a T,
    options: RunOptions,
}

impl<'a, T: IssueTracker> Pipeline<'a, T> {
    pub fn new(config: &'a Config, tracker: &'a T, options: RunOptions) -> Self {
        Self {
            config,
            tracker,
            options,
        }
    }

    /// Open the workbook, process the row window, and write the workbook back
    ///
    /// Only a failure to open the workbook is returned as an error. Row
    /// failures and a failed save end up in the report.
    pub async fn run(&self) -> Result<RunReport, SpreadsheetError> {
        let path = &self.config.excel.path;
        let mut document = Spreadsheet::open(path)?;
        log::info!("Opened {} (sheet '{}')", path.display(), document.first_sheet().name());

        let mut report = self.process(&mut document).await;

        if self.options.dry_run {
            log::info!("Dry run, {} left untouched", path.display());
            return Ok(report);
        }

        // Saved on every path so links of rows created before a failure survive
        match document.save(path) {
            Ok(()) => log::info!("Excel workbook updated: {}", path.display()),
            Err(e) => {
                log::error!("Error occurred while updating Excel workbook {}: {}", path.display(), e);
                report.persist_error = Some(e);
            }
        }

        Ok(report)
    }

    /// Row loop over an already open workbook; does not save it
    pub async fn process(&self, document: &mut Spreadsheet) -> RunReport {
        let excel = &self.config.excel;
        let sheet = document.first_sheet_mut();

        if let Some(id_col) = self.config.field_mapping.column(fields::ID) {
            let relinked =
                sheet.relink_column(id_col, excel.rows(), |key| self.tracker.browse_url(key));
            if relinked > 0 {
                log::info!("Restored links for {} previously created issue(s)", relinked);
            }
        }

        let labels = LabelPolicy::from_trim_flag(excel.trim_labels);
        let mut report = RunReport::default();

        for row in excel.rows() {
            match self.process_row(sheet, row, labels).await {
                Ok(Some(created)) => report.created.push(created),
                Ok(None) => report.previewed += 1,
                Err(source) => {
                    if let RowError::Tracker(e) = &source {
                        log::debug!("Jira call for row {} failed with status {:?}", row, e.status());
                    }
                    let failure = RowFailure { row, source };
                    log::error!("Error occurred while creating Jira issue at {}", failure);
                    report.failures.push(failure);

                    if !self.options.continue_on_error {
                        if row + 1 < excel.limit_rows {
                            log::warn!(
                                "Stopping, rows {}..{} were not processed",
                                row + 1,
                                excel.limit_rows
                            );
                            report.aborted = true;
                        }
                        break;
                    }
                }
            }
        }

        report
    }

    async fn process_row(
        &self,
        sheet: &mut Sheet,
        row: u32,
        labels: LabelPolicy,
    ) -> Result<Option<CreatedRow>, RowError> {
        let record = RowRecord::extract(sheet, &self.config.field_mapping, row)?;
        let request = build_issue_request(&record, labels);

        if self.options.dry_run {
            match serde_json::to_string(&request) {
                Ok(json) => log::info!("[dry run] row {}: {}", row, json),
                Err(e) => log::warn!("[dry run] row {}: could not render request: {}", row, e),
            }
            return Ok(None);
        }

        let created = self.tracker.create_issue(&request).await?;
        let url = self.tracker.browse_url(&created.key);
        log::info!("Issue created successfully [row: {}, key: {}]", row, created.key);
        if let Some(id) = &created.id {
            log::debug!("Issue {} has id {} ({})", created.key, id, created.self_url.as_deref().unwrap_or("-"));
        }

        sheet.set_link(row, record.id_column, &created.key, &url);

        Ok(Some(CreatedRow {
            row,
            key: created.key,
            url,
        }))
    }
}
