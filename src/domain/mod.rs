//! Domain models and types for Xtractor.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PageType`], [`Slug`])
//! - **Input records** ([`ContentRecord`]) and the field allow-list ([`FieldAllowList`])
//! - **Transformation results** ([`TransformedField`], [`FieldValue`], [`FieldClass`])
//! - **Error types** ([`XtractorError`], [`CmsError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, XtractorError>`]:
//!
//! ```rust,no_run
//! use xtractor::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = xtractor::config::XtractorConfig::from_file("xtractor.toml")?;
//!     println!("{}", config.query.page_type);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod fields;
pub mod ids;
pub mod record;
pub mod result;

pub use errors::{CmsError, XtractorError};
pub use fields::{FieldAllowList, FieldClass, FieldValue, TransformedField};
pub use ids::{PageType, Slug};
pub use record::{ContentRecord, ContentRecordBuilder};
pub use result::Result;
