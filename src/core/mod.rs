//! Core business logic for Xtractor.
//!
//! # Modules
//!
//! - [`transform`] - Per-field transformation (macros, URLs, media, summaries)
//! - [`export`] - Record assembly, run accumulation, pipeline and coordination
//!
//! # Export Workflow
//!
//! 1. **Connect**: open the content source; failure stops the run
//! 2. **Fetch**: read the records of the configured query, in order
//! 3. **Prepare**: create (or clean) the output tree
//! 4. **Process**: transform and write each record, collecting redirects
//! 5. **Finalize**: write the aggregate and redirect documents
//! 6. **Report**: log and return the summary
//!
//! # Example
//!
//! ```rust,no_run
//! use xtractor::config::load_config;
//! use xtractor::core::export::{ExportCoordinator, ExportOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xtractor.toml")?;
//!
//! let mut coordinator = ExportCoordinator::new(config, ExportOptions::default()).await?;
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Records: {}", summary.records_processed);
//! println!("Media saved: {}", summary.media_saved);
//! println!("Warnings: {}", summary.warnings.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod transform;
