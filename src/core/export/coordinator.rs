//! Export coordinator - main orchestrator for the export process
//!
//! This module wires configuration, the content source and the collaborators
//! of the transformation into one [`ExportPipeline`] run.

use crate::adapters::cms::{CmsClient, RecordQuery};
use crate::adapters::macros::{MacroResolver, PassthroughResolver, TableMacroResolver};
use crate::adapters::media::fetcher_for;
use crate::config::XtractorConfig;
use crate::core::export::builder::RecordBuilder;
use crate::core::export::pipeline::{ExportPipeline, PipelineSettings};
use crate::core::export::summary::ExportSummary;
use crate::core::transform::{ContentTransformer, FieldClassifier};
use crate::domain::{Result, XtractorError};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Run flags given on the command line
///
/// Each flag is combined with its configuration counterpart; either one
/// turns the behavior on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Remove the output root first
    pub clean: bool,
    /// Write nothing
    pub dry_run: bool,
}

/// Export coordinator
pub struct ExportCoordinator {
    client: CmsClient,
    query: RecordQuery,
    pipeline: ExportPipeline,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// Connects to the content source. A connection failure is returned as
    /// [`XtractorError::Connection`] before anything touches the output tree.
    pub async fn new(config: XtractorConfig, options: ExportOptions) -> Result<Self> {
        config.validate().map_err(XtractorError::Configuration)?;
        let client = CmsClient::new(&config.cms).await?;
        Self::with_client(config, options, client)
    }

    /// Create a coordinator around an already connected client
    pub fn with_client(
        config: XtractorConfig,
        options: ExportOptions,
        client: CmsClient,
    ) -> Result<Self> {
        let query = RecordQuery::from_config(&config.query)?;
        let allow_list = config
            .query
            .allow_list()
            .map_err(XtractorError::Configuration)?;
        let site_url = config
            .export
            .site_url()
            .map_err(XtractorError::Configuration)?;

        let dry_run = options.dry_run || config.export.dry_run;
        let clean = options.clean || config.export.clean;

        let macros: Arc<dyn MacroResolver> = if config.macros.is_empty() {
            Arc::new(PassthroughResolver)
        } else {
            Arc::new(TableMacroResolver::new(&config.macros)?)
        };
        let fetcher = fetcher_for(&config.export, dry_run)?;
        let transformer = ContentTransformer::new(
            FieldClassifier::new(config.fields.overrides.clone()),
            macros,
            fetcher,
        );

        let settings = PipelineSettings {
            output_root: config.export.output_dir.clone(),
            page_type: query.page_type.clone(),
            all_nodes_filename: config.export.all_nodes_filename.clone(),
            all_redirects_filename: config.export.all_redirects_filename.clone(),
            clean,
            dry_run,
        };
        let builder = RecordBuilder::new(
            transformer,
            allow_list,
            query.page_type.clone(),
            site_url,
            config.export.media_root.clone(),
            settings.type_dir(),
            !dry_run,
        );

        Ok(Self {
            client,
            query,
            pipeline: ExportPipeline::new(builder, settings),
        })
    }

    /// Execute the export
    ///
    /// 1. Fetches the records of the configured query
    /// 2. Runs them through the pipeline
    /// 3. Logs and returns the summary
    pub async fn execute_export(&mut self) -> Result<ExportSummary> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("export", run_id = %run_id);

        async move {
            tracing::info!(
                source = %self.client.describe(),
                page_type = %self.query.page_type,
                root = %self.query.root_alias_path,
                "Starting export process"
            );

            let records = self.client.fetch_records(&self.query).await?;
            tracing::info!("{} nodes found.", records.len());

            let summary = self.pipeline.run(records).await?;
            summary.log_summary();
            Ok(summary)
        }
        .instrument(span)
        .await
    }
}
