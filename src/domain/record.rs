//! Content record domain model
//!
//! A [`ContentRecord`] is one exported unit of content as delivered by a
//! content source: its alias path plus an ordered list of raw field values.

use serde::{Deserialize, Serialize};

/// One record read from the content source
///
/// Field order is the order the source delivered them in. Records are
/// immutable input to the export pipeline.
///
/// # Examples
///
/// ```
/// use xtractor::domain::record::ContentRecord;
///
/// let record = ContentRecord::builder()
///     .alias_path("/blog/my-post")
///     .field("Title", "Hello")
///     .field("Body", "<p>Hi</p>")
///     .title("Hello")
///     .build()
///     .unwrap();
///
/// assert_eq!(record.field("Body"), Some("<p>Hi</p>"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Slash-delimited path of the record in the content tree
    pub alias_path: String,

    /// Distinguished title value
    pub title: String,

    /// Raw field values in delivery order
    pub fields: Vec<(String, String)>,
}

impl ContentRecord {
    /// Creates a new builder for constructing a ContentRecord
    pub fn builder() -> ContentRecordBuilder {
        ContentRecordBuilder::default()
    }

    /// Looks up a field value by name
    ///
    /// An exact match wins; otherwise the first case-insensitive match is
    /// returned, since REST payloads do not always echo column casing.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| self.fields.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)))
            .map(|(_, value)| value.as_str())
    }
}

/// Builder for constructing ContentRecord instances
#[derive(Debug, Default)]
pub struct ContentRecordBuilder {
    alias_path: Option<String>,
    title: Option<String>,
    fields: Vec<(String, String)>,
}

impl ContentRecordBuilder {
    /// Creates a new ContentRecordBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alias path
    pub fn alias_path(mut self, alias_path: impl Into<String>) -> Self {
        self.alias_path = Some(alias_path.into());
        self
    }

    /// Sets the title value
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends a field, keeping insertion order
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Appends several fields, keeping their order
    pub fn fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builds the ContentRecord
    ///
    /// # Errors
    ///
    /// Returns an error if the alias path is missing or blank
    pub fn build(self) -> Result<ContentRecord, String> {
        let alias_path = self.alias_path.ok_or("alias_path is required")?;
        if alias_path.trim().is_empty() {
            return Err("alias_path cannot be blank".to_string());
        }
        Ok(ContentRecord {
            alias_path,
            title: self.title.unwrap_or_default(),
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_field_order() {
        let record = ContentRecord::builder()
            .alias_path("/a")
            .field("Z", "1")
            .fields(vec![("A", "2"), ("M", "3")])
            .build()
            .unwrap();

        let names: Vec<_> = record.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_builder_requires_alias_path() {
        let result = ContentRecord::builder().field("Title", "x").build();
        assert!(result.unwrap_err().contains("alias_path is required"));

        let result = ContentRecord::builder().alias_path("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_field_lookup_falls_back_to_case_insensitive() {
        let record = ContentRecord::builder()
            .alias_path("/a")
            .field("blogpostbody", "lower")
            .field("BlogPostTitle", "exact")
            .build()
            .unwrap();

        assert_eq!(record.field("BlogPostTitle"), Some("exact"));
        assert_eq!(record.field("BlogPostBody"), Some("lower"));
        assert_eq!(record.field("Missing"), None);
    }
}
