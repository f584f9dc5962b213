//! Content source adapters
//!
//! - [`RestContentSource`]: the CMS REST service
//! - [`FileContentSource`]: a JSON records file exported earlier
//!
//! [`CmsClient`] picks one from configuration and connects it.

pub mod client;
pub mod file;
pub mod rest;
pub mod source;

pub use client::CmsClient;
pub use file::FileContentSource;
pub use rest::RestContentSource;
pub use source::{ContentSource, OrderBy, RecordQuery, ALIAS_PATH_COLUMN};
