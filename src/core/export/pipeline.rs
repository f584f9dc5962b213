//! Export pipeline
//!
//! Drives one run over the record sequence:
//! `Idle -> Preparing -> Processing -> Finalizing -> Done`.
//!
//! Records are processed strictly one after the other in delivery order.
//! Dry runs walk through the same states but write nothing.

use super::accumulator::RunAccumulator;
use super::aggregate::AggregateWriter;
use super::builder::RecordBuilder;
use super::output::{ensure_dir, remove_tree, write_file};
use super::redirects::RedirectWriter;
use super::summary::{ExportSummary, ExportWarning, WarningKind};
use crate::domain::{ContentRecord, PageType, Result, XtractorError};
use crate::{log_record_complete, log_record_start};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Lifecycle of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started
    Idle,
    /// Creating (and optionally cleaning) the output tree
    Preparing,
    /// Building records
    Processing,
    /// Writing the aggregate and redirect documents
    Finalizing,
    /// Finished successfully
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Preparing => "preparing",
            PipelineState::Processing => "processing",
            PipelineState::Finalizing => "finalizing",
            PipelineState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Where and how a run writes its output
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Output root directory
    pub output_root: PathBuf,
    /// Page type being exported
    pub page_type: PageType,
    /// Aggregate document file name
    pub all_nodes_filename: String,
    /// Redirect document file name
    pub all_redirects_filename: String,
    /// Remove the output root before the run
    pub clean: bool,
    /// Write nothing
    pub dry_run: bool,
}

impl PipelineSettings {
    /// `<out>/<pageType>`
    pub fn type_dir(&self) -> PathBuf {
        self.output_root.join(self.page_type.as_str())
    }

    /// Path of the aggregate document
    pub fn all_nodes_path(&self) -> PathBuf {
        self.type_dir().join(&self.all_nodes_filename)
    }

    /// Path of the redirect document
    pub fn all_redirects_path(&self) -> PathBuf {
        self.type_dir().join(&self.all_redirects_filename)
    }
}

/// One export run
pub struct ExportPipeline {
    builder: RecordBuilder,
    settings: PipelineSettings,
    state: PipelineState,
}

impl ExportPipeline {
    /// Creates an idle pipeline
    pub fn new(builder: RecordBuilder, settings: PipelineSettings) -> Self {
        Self {
            builder,
            settings,
            state: PipelineState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn enter(&mut self, state: PipelineState) {
        tracing::debug!(from = %self.state, to = %state, "Pipeline state change");
        self.state = state;
    }

    /// Runs the pipeline over `records`
    ///
    /// # Errors
    ///
    /// Stops at the first [`XtractorError::Output`]; whatever was written up
    /// to that point stays on disk. Per-field problems never stop the run,
    /// they end up as warnings in the summary.
    pub async fn run<I>(&mut self, records: I) -> Result<ExportSummary>
    where
        I: IntoIterator<Item = ContentRecord>,
    {
        if self.state != PipelineState::Idle {
            return Err(XtractorError::Other(format!(
                "Pipeline already ran (state: {})",
                self.state
            )));
        }

        let start_time = Instant::now();
        let mut summary = ExportSummary::new(self.settings.dry_run);
        summary.output_dir = self.settings.type_dir();
        summary.all_nodes_path = self.settings.all_nodes_path();
        summary.all_redirects_path = self.settings.all_redirects_path();

        self.enter(PipelineState::Preparing);
        self.prepare().await?;

        self.enter(PipelineState::Processing);
        let accumulator = self.process(records, &mut summary).await?;

        self.enter(PipelineState::Finalizing);
        self.finalize(&accumulator).await?;

        self.enter(PipelineState::Done);
        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn prepare(&self) -> Result<()> {
        if self.settings.dry_run {
            tracing::info!("Dry run: output tree left untouched");
            return Ok(());
        }

        if self.settings.clean {
            remove_tree(&self.settings.output_root).await?;
        }
        ensure_dir(&self.settings.output_root).await?;
        ensure_dir(&self.settings.type_dir()).await
    }

    async fn process<I>(&self, records: I, summary: &mut ExportSummary) -> Result<RunAccumulator>
    where
        I: IntoIterator<Item = ContentRecord>,
    {
        let mut accumulator = RunAccumulator::new();

        for record in records {
            let order = accumulator.next_order();
            log_record_start!(order, record.alias_path);

            let built = match self.builder.build(&record, order).await {
                Ok(built) => built,
                // Skipped records (no slug) take no order index; the next
                // record reuses it so indices stay 1..N over emitted records.
                Err(XtractorError::Validation(message)) => {
                    tracing::warn!(
                        alias_path = %record.alias_path,
                        error = %message,
                        "Record skipped"
                    );
                    summary.records_skipped += 1;
                    summary.add_warning(
                        ExportWarning::new(WarningKind::Record, message)
                            .with_context(format!("alias_path={}", record.alias_path)),
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            log_record_complete!(order, built.slug, built.file_path.display());

            summary.records_processed += 1;
            if !self.settings.dry_run {
                summary.records_written += 1;
            }
            summary.media_saved += built.report.media.saved;
            summary.media_failed += built.report.media.failed;
            summary.media_skipped += built.report.media.skipped;
            summary.widgets_detected += built.report.widgets;
            summary.warnings.extend(built.report.warnings.iter().cloned());

            accumulator = accumulator.fold(&record.alias_path, &built);
        }

        Ok(accumulator)
    }

    async fn finalize(&self, accumulator: &RunAccumulator) -> Result<()> {
        let redirects = RedirectWriter::render(accumulator.redirects().entries())?;
        let aggregate = AggregateWriter::render(&self.settings.page_type, accumulator.bodies());

        if self.settings.dry_run {
            tracing::info!(
                records = accumulator.processed(),
                redirects = accumulator.redirects().len(),
                "Dry run: aggregate and redirect documents not written"
            );
            return Ok(());
        }

        write_document(&self.settings.all_redirects_path(), &redirects).await?;
        write_document(&self.settings.all_nodes_path(), &aggregate).await
    }
}

async fn write_document(path: &Path, contents: &str) -> Result<()> {
    write_file(path, contents).await?;
    tracing::info!(path = %path.display(), "Document written");
    Ok(())
}
