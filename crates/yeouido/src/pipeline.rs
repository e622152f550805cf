//! Ingestion pipeline.
//!
//! Drives one batch run: list the filings received in a date range, then for
//! each periodic filing fetch its statement, normalize it, reconcile it
//! against the company's stored history, derive growth and append the result.
//!
//! Filings are processed one at a time in fiscal order, so a fourth quarter
//! filed in the same batch as its third quarter sees that quarter in the
//! store. A failure on one filing is logged and counted; the batch moves on.

use indicatif::ProgressBar;
use tracing::{debug, error, info, warn};

use chrono::NaiveDate;
use yeouido_data::{
    DataError, DeduplicatingAppender, DisclosureSource, Filing, FilingPeriod, RecordKey,
    RecordStore, ReportingScope, StatementRow,
};
use yeouido_metrics::{
    AccountMap, GrowthCalculator, NormalizedRecord, PeriodReconciler, RecordNormalizer,
};
use yeouido_output::{FilingOutcome, Notifier, RunSummary, filing_message};

use crate::config::PipelineConfig;

/// Sequential batch pipeline over a disclosure source and a record store.
#[derive(Debug)]
pub struct IngestPipeline<D, S, N> {
    source: D,
    appender: DeduplicatingAppender<S>,
    notifier: N,
    normalizer: RecordNormalizer,
    config: PipelineConfig,
}

impl<D, S, N> IngestPipeline<D, S, N>
where
    D: DisclosureSource,
    S: RecordStore,
    N: Notifier,
{
    /// Create a pipeline with the standard account table.
    pub fn new(source: D, store: S, notifier: N, config: PipelineConfig) -> Self {
        Self {
            source,
            appender: DeduplicatingAppender::new(store),
            notifier,
            normalizer: RecordNormalizer::new(),
            config,
        }
    }

    /// Replace the normalizer, e.g. to use a custom account table.
    pub fn with_normalizer(mut self, normalizer: RecordNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The disclosure source.
    pub const fn source(&self) -> &D {
        &self.source
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        self.appender.store()
    }

    /// The notification sink.
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run settings.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ingest every periodic filing received between `start` and `end`.
    ///
    /// Never fails as a whole: a listing failure ends the run with one error
    /// counted, and per-filing failures are counted in the summary. The
    /// summary is sent to the notifier before returning.
    pub async fn run(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        progress: Option<&ProgressBar>,
    ) -> RunSummary {
        let mut summary = RunSummary::new(start, end);
        info!(%start, %end, "starting ingestion run");

        let filings = match self.source.list_filings(start, end).await {
            Ok(filings) => filings,
            Err(e) => {
                error!(error = %e, "failed to list filings");
                summary.record(FilingOutcome::Failed);
                self.finish(&summary);
                return summary;
            }
        };
        summary.filings_seen = filings.len();

        let queue = self.plan(filings, &mut summary);
        if let Some(pb) = progress {
            pb.set_length(queue.len() as u64);
        }

        let total = queue.len();
        for (i, (filing, period)) in queue.into_iter().enumerate() {
            if let Some(pb) = progress {
                pb.set_message(filing.company_name.clone());
            }

            let outcome = match self.process_filing(&filing, period).await {
                Ok(outcome) => outcome,
                Err(DataError::MissingStatement { .. }) => {
                    info!(
                        company = %filing.company_name,
                        title = %filing.report_title,
                        "no statement available"
                    );
                    FilingOutcome::Skipped
                }
                Err(e) => {
                    warn!(
                        company = %filing.company_name,
                        receipt = %filing.receipt_id,
                        transient = e.is_transient(),
                        error = %e,
                        "filing failed"
                    );
                    FilingOutcome::Failed
                }
            };
            summary.record(outcome);

            if let Some(pb) = progress {
                pb.inc(1);
            }

            // Duplicates never reach the upstream source
            let remaining = i + 1 < total;
            if outcome != FilingOutcome::Duplicate && remaining && !self.config.throttle.is_zero() {
                tokio::time::sleep(self.config.throttle).await;
            }
        }

        self.finish(&summary);
        summary
    }

    /// Select the periodic filings to process and order them by fiscal period.
    fn plan(
        &self,
        filings: Vec<Filing>,
        summary: &mut RunSummary,
    ) -> Vec<(Filing, FilingPeriod)> {
        let mut queue = Vec::with_capacity(filings.len());
        for filing in filings {
            let Some(period) = filing.period() else {
                if filing.report_kind().is_some() {
                    warn!(
                        company = %filing.company_name,
                        title = %filing.report_title,
                        "periodic report outside a December fiscal year, skipping"
                    );
                } else {
                    debug!(title = %filing.report_title, "not a periodic report");
                }
                summary.record(FilingOutcome::Skipped);
                continue;
            };
            if !self.config.includes(&filing.company_id) {
                debug!(company = %filing.company_id, "company filtered out");
                summary.record(FilingOutcome::Skipped);
                continue;
            }
            queue.push((filing, period));
        }

        queue.sort_by(|(a, pa), (b, pb)| {
            (pa.fiscal_year, pa.fiscal_quarter, a.receipt_id.as_str()).cmp(&(
                pb.fiscal_year,
                pb.fiscal_quarter,
                b.receipt_id.as_str(),
            ))
        });
        queue
    }

    /// Run one filing through all stages.
    async fn process_filing(
        &mut self,
        filing: &Filing,
        period: FilingPeriod,
    ) -> Result<FilingOutcome, DataError> {
        let key = RecordKey::new(
            filing.company_id.clone(),
            period.fiscal_year,
            period.fiscal_quarter,
        );
        if self.appender.contains(&key)? {
            debug!(%key, "already stored, skipping fetch");
            return Ok(FilingOutcome::Duplicate);
        }
        if filing.is_amendment() {
            debug!(%key, title = %filing.report_title, "processing amended filing");
        }

        let (scope, rows) = self.fetch_rows(&filing.company_id, period).await?;
        let accounts = AccountMap::from_rows(&rows, scope);
        let normalization = self
            .normalizer
            .normalize(key.clone(), &filing.company_name, &accounts);
        for field in &normalization.malformed {
            warn!(%key, %field, "malformed amount, using zero");
        }

        let mut history: Vec<NormalizedRecord> = self
            .appender
            .history(&filing.company_id)?
            .iter()
            .map(NormalizedRecord::from)
            .collect();
        history.push(normalization.record);

        let reconciliation = PeriodReconciler.reconcile(&history);
        for gap in &reconciliation.gaps {
            warn!(
                company = %gap.company_id,
                year = gap.fiscal_year,
                missing = ?gap.missing,
                "fourth quarter reconciled with missing quarters counted as zero"
            );
        }

        let record = GrowthCalculator
            .derive(&reconciliation.records)
            .into_iter()
            .find(|r| r.has_key(&key))
            .ok_or_else(|| DataError::Parse(format!("derived record {key} not found")))?;

        let outcome = self.appender.append(&record)?;
        if !outcome.is_appended() {
            return Ok(FilingOutcome::Duplicate);
        }

        info!(%key, scope = scope.code(), "record appended");
        self.notifier.notify(&filing_message(&record, &filing.report_title));
        Ok(FilingOutcome::Appended)
    }

    /// Fetch statement rows, falling back to the other reporting scope.
    async fn fetch_rows(
        &self,
        company_id: &str,
        period: FilingPeriod,
    ) -> Result<(ReportingScope, Vec<StatementRow>), DataError> {
        let preferred = self.config.scope;
        for scope in [preferred, preferred.fallback()] {
            let rows = self
                .source
                .fetch_statement(company_id, period, scope)
                .await?;
            if !rows.is_empty() {
                return Ok((scope, rows));
            }
            debug!(company_id, scope = scope.code(), "no rows for scope");
        }

        Err(DataError::MissingStatement {
            company_id: company_id.to_string(),
            fiscal_year: period.fiscal_year,
            fiscal_quarter: period.fiscal_quarter.to_string(),
        })
    }

    fn finish(&self, summary: &RunSummary) {
        info!(
            appended = summary.appended,
            duplicates = summary.duplicates,
            skipped = summary.skipped,
            errors = summary.errors,
            "ingestion run finished"
        );
        self.notifier.notify(&summary.to_string());
    }
}
