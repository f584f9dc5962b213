//! JSON records file source
//!
//! Reads a JSON array of documents exported from the CMS:
//!
//! ```json
//! [
//!   {
//!     "aliasPath": "/blog/hello",
//!     "pageType": "CMS.BlogPost",
//!     "published": true,
//!     "fields": { "BlogPostTitle": "Hello", "BlogPostBody": "<p>Hi</p>" }
//!   }
//! ]
//! ```
//!
//! `pageType` and `published` are optional. Field order is preserved.

use super::source::{compare_records, ContentSource, RecordQuery};
use crate::domain::{CmsError, ContentRecord, Result, XtractorError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileDocument {
    alias_path: String,
    #[serde(default)]
    page_type: Option<String>,
    #[serde(default = "default_published")]
    published: bool,
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

fn default_published() -> bool {
    true
}

/// Content source backed by a JSON records file
pub struct FileContentSource {
    path: PathBuf,
    documents: Option<Vec<FileDocument>>,
}

impl FileContentSource {
    /// Creates a source reading `path` on connect
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            documents: None,
        }
    }

    /// Path of the records file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn connect(&mut self) -> Result<()> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            XtractorError::Connection(CmsError::ConnectionFailed(format!(
                "Cannot read records file {}: {e}",
                self.path.display()
            )))
        })?;

        let documents: Vec<FileDocument> = serde_json::from_str(&content).map_err(|e| {
            XtractorError::Connection(CmsError::InvalidResponse(format!(
                "Invalid records file {}: {e}",
                self.path.display()
            )))
        })?;

        tracing::info!(
            path = %self.path.display(),
            documents = documents.len(),
            "Loaded records file"
        );
        self.documents = Some(documents);
        Ok(())
    }

    async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<ContentRecord>> {
        let documents = self.documents.as_ref().ok_or_else(|| {
            XtractorError::Cms(CmsError::ConnectionFailed(
                "fetch_records called before connect".to_string(),
            ))
        })?;

        let mut records = Vec::new();
        for document in documents {
            if let Some(page_type) = &document.page_type {
                if !page_type.eq_ignore_ascii_case(query.page_type.as_str()) {
                    continue;
                }
            }
            if query.published_only && !document.published {
                continue;
            }
            if !query.is_below_root(&document.alias_path) {
                continue;
            }

            let fields: Vec<(String, String)> = document
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), field_text(value)))
                .collect();
            let title = query
                .title_column()
                .and_then(|column| {
                    fields
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(column))
                        .map(|(_, value)| value.clone())
                })
                .unwrap_or_default();

            let record = ContentRecord::builder()
                .alias_path(document.alias_path.clone())
                .title(title)
                .fields(fields)
                .build()
                .map_err(|e| XtractorError::Cms(CmsError::InvalidResponse(e)))?;
            records.push(record);
        }

        // Vec::sort_by is stable; ties keep file order.
        records.sort_by(|a, b| compare_records(a, b, &query.order_by));
        if let Some(top_n) = query.top_n {
            records.truncate(top_n);
        }

        tracing::info!(count = records.len(), page_type = %query.page_type, "Fetched records");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{} (file)", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cms::source::OrderBy;
    use crate::domain::PageType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RECORDS: &str = r#"[
        {"aliasPath": "/blog", "fields": {"Title": "Root"}},
        {"aliasPath": "/blog/b", "fields": {"Title": "B", "Date": "2020-02-01", "Views": 7}},
        {"aliasPath": "/blog/a", "fields": {"Title": "A", "Date": "2020-03-01", "Views": 12}},
        {"aliasPath": "/blog/draft", "published": false, "fields": {"Title": "Draft"}},
        {"aliasPath": "/blog/news", "pageType": "CMS.News", "fields": {"Title": "News"}},
        {"aliasPath": "/about", "fields": {"Title": "About"}}
    ]"#;

    fn records_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RECORDS.as_bytes()).unwrap();
        file
    }

    fn query(order_by: &[&str], top_n: Option<usize>) -> RecordQuery {
        RecordQuery {
            page_type: PageType::new("CMS.BlogPost").unwrap(),
            columns: vec!["Title".to_string(), "Date".to_string()],
            root_alias_path: "/blog".to_string(),
            published_only: true,
            top_n,
            order_by: order_by.iter().map(|o| OrderBy::parse(o).unwrap()).collect(),
        }
    }

    #[tokio::test]
    async fn test_filters_root_drafts_and_other_types() {
        let file = records_file();
        let mut source = FileContentSource::new(file.path());
        source.connect().await.unwrap();

        let records = source.fetch_records(&query(&[], None)).await.unwrap();
        let paths: Vec<_> = records.iter().map(|r| r.alias_path.as_str()).collect();
        assert_eq!(paths, vec!["/blog/b", "/blog/a"]);
        assert_eq!(records[0].title, "B");
        assert_eq!(records[0].field("Views"), Some("7"));
    }

    #[tokio::test]
    async fn test_orders_and_limits() {
        let file = records_file();
        let mut source = FileContentSource::new(file.path());
        source.connect().await.unwrap();

        let records = source
            .fetch_records(&query(&["Views DESC"], None))
            .await
            .unwrap();
        assert_eq!(records[0].alias_path, "/blog/a");

        let records = source
            .fetch_records(&query(&["NodeAliasPath"], Some(1)))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].alias_path, "/blog/a");
    }

    #[tokio::test]
    async fn test_missing_file_is_connection_error() {
        let mut source = FileContentSource::new("/nonexistent/records.json");
        let err = source.connect().await.unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_fetch_before_connect_fails() {
        let source = FileContentSource::new("records.json");
        assert!(source.fetch_records(&query(&[], None)).await.is_err());
    }
}
