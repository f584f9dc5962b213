//! Per-record document assembly
//!
//! A record becomes `<out>/<pageType>/<slug>/<slug>.xml`:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Blog-Post originalAliasPath="/blog/my-post">
//! <newaliaspath>my-post</newaliaspath>
//! <newnodeorder>1</newnodeorder>
//! <newblogpostsummary>Short</newblogpostsummary>
//! <Body><![CDATA[<p>Hi</p>]]></Body>
//! </Blog-Post>
//! ```
//!
//! Body fields follow the allow-list order. A listed field the record does
//! not carry is emitted empty.

use super::output::{ensure_dir, write_file, XML_DECLARATION};
use crate::core::transform::{ContentTransformer, TransformContext, TransformReport};
use crate::domain::{
    ContentRecord, FieldAllowList, FieldValue, PageType, Result, Slug, TransformedField,
    XtractorError,
};
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::{Path, PathBuf};
use url::Url;

/// Element carrying the slug
pub const ALIAS_ELEMENT: &str = "newaliaspath";
/// Element carrying the order index
pub const ORDER_ELEMENT: &str = "newnodeorder";
/// Element carrying the synthesized summary
pub const SUMMARY_ELEMENT: &str = "newblogpostsummary";

/// Result of building one record
#[derive(Debug)]
pub struct BuiltRecord {
    /// Slug of the record
    pub slug: Slug,
    /// Path of the record document
    pub file_path: PathBuf,
    /// Document without its XML declaration
    pub body: String,
    /// Warnings and media counts of the record's fields
    pub report: TransformReport,
}

/// Builds and writes per-record documents
pub struct RecordBuilder {
    transformer: ContentTransformer,
    allow_list: FieldAllowList,
    page_type: PageType,
    site_url: Url,
    media_root: String,
    type_dir: PathBuf,
    write: bool,
}

impl RecordBuilder {
    /// Creates a builder writing below `type_dir` (`<out>/<pageType>`)
    ///
    /// With `write` off nothing touches the filesystem; documents are still
    /// built.
    pub fn new(
        transformer: ContentTransformer,
        allow_list: FieldAllowList,
        page_type: PageType,
        site_url: Url,
        media_root: impl Into<String>,
        type_dir: impl Into<PathBuf>,
        write: bool,
    ) -> Self {
        Self {
            transformer,
            allow_list,
            page_type,
            site_url,
            media_root: media_root.into(),
            type_dir: type_dir.into(),
            write,
        }
    }

    /// Directory holding the documents of one slug
    pub fn record_dir(&self, slug: &Slug) -> PathBuf {
        self.type_dir.join(slug.dir_name())
    }

    /// Builds the document of `record` at position `order` and writes it
    ///
    /// # Errors
    ///
    /// Returns [`XtractorError::Validation`] when no slug can be derived from
    /// the alias path, and [`XtractorError::Output`] when the record directory
    /// or file cannot be written.
    pub async fn build(&self, record: &ContentRecord, order: usize) -> Result<BuiltRecord> {
        let slug = Slug::from_alias_path(&record.alias_path).map_err(XtractorError::Validation)?;
        let record_dir = self.record_dir(&slug);
        let file_path = record_dir.join(format!("{}.xml", slug.dir_name()));

        let ctx = TransformContext {
            site_url: &self.site_url,
            page_type: &self.page_type,
            slug: &slug,
            media_root: &self.media_root,
            media_dir: &record_dir,
        };

        let mut report = TransformReport::default();
        let mut fields = Vec::new();
        let mut summary = None;
        for name in self.allow_list.eligible() {
            let index = self.allow_list.position(name).unwrap_or(1);
            let raw = record.field(name).unwrap_or_default();
            let field = self
                .transformer
                .transform_field(name, index, raw, &ctx, &mut report)
                .await;
            if summary.is_none() {
                summary = field.summary.clone();
            }
            fields.push(field);
        }

        let body = render_record(
            &self.page_type,
            &record.alias_path,
            &slug,
            order,
            summary.as_deref(),
            &fields,
        )?;

        if self.write {
            write_record(&record_dir, &file_path, &body).await?;
        }

        Ok(BuiltRecord {
            slug,
            file_path,
            body,
            report,
        })
    }
}

async fn write_record(record_dir: &Path, file_path: &Path, body: &str) -> Result<()> {
    ensure_dir(record_dir).await?;
    write_file(file_path, &format!("{XML_DECLARATION}\n{body}\n")).await
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn field_element(writer: &mut Writer<Vec<u8>>, field: &TransformedField) -> Result<()> {
    match &field.value {
        FieldValue::Text(text) => text_element(writer, &field.name, text),
        FieldValue::CData(data) => {
            writer.write_event(Event::Start(BytesStart::new(field.name.as_str())))?;
            for section in BytesCData::escaped(data) {
                writer.write_event(Event::CData(section))?;
            }
            writer.write_event(Event::End(BytesEnd::new(field.name.as_str())))?;
            Ok(())
        }
    }
}

/// Serializes one record without its XML declaration, one element per line
pub fn render_record(
    page_type: &PageType,
    alias_path: &str,
    slug: &Slug,
    order: usize,
    summary: Option<&str>,
    fields: &[TransformedField],
) -> Result<String> {
    // Zero-width indentation: a line break before every element, no padding.
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 0);
    let root = page_type.element_name();

    let mut start = BytesStart::new(root.as_str());
    start.push_attribute(("originalAliasPath", alias_path));
    writer.write_event(Event::Start(start))?;

    text_element(&mut writer, ALIAS_ELEMENT, slug.as_str())?;
    text_element(&mut writer, ORDER_ELEMENT, &order.to_string())?;
    if let Some(summary) = summary {
        text_element(&mut writer, SUMMARY_ELEMENT, summary)?;
    }
    for field in fields {
        field_element(&mut writer, field)?;
    }

    writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| XtractorError::Markup(format!("Record document is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::macros::PassthroughResolver;
    use crate::adapters::media::SkippingFetcher;
    use crate::core::transform::FieldClassifier;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn builder(type_dir: &Path, write: bool) -> RecordBuilder {
        let transformer = ContentTransformer::new(
            FieldClassifier::default(),
            Arc::new(PassthroughResolver),
            Arc::new(SkippingFetcher),
        );
        RecordBuilder::new(
            transformer,
            FieldAllowList::new(vec![
                "Title".to_string(),
                "Body".to_string(),
                "Summary".to_string(),
                "Author".to_string(),
            ])
            .unwrap(),
            PageType::new("Blog.Post").unwrap(),
            Url::parse("https://example.com/").unwrap(),
            "media",
            type_dir,
            write,
        )
    }

    fn record() -> ContentRecord {
        ContentRecord::builder()
            .alias_path("/blog/my-post")
            .title("Hello")
            .field("Title", "Hello")
            .field("Summary", "<p>Short</p>")
            .field("Body", "<p>Hi there</p>")
            .field("Ignored", "not listed")
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_record_layout() {
        let fields = vec![
            TransformedField::plain("Author", "Ann & Bob"),
            TransformedField {
                name: "Body".to_string(),
                value: FieldValue::CData("<p>x</p>".to_string()),
                summary: None,
            },
        ];
        let body = render_record(
            &PageType::new("Blog.Post").unwrap(),
            "/blog/a\"b",
            &Slug::from_alias_path("/blog/a").unwrap(),
            3,
            Some("Short"),
            &fields,
        )
        .unwrap();

        assert_eq!(
            body,
            "<Blog-Post originalAliasPath=\"/blog/a&quot;b\">\n\
             <newaliaspath>a</newaliaspath>\n\
             <newnodeorder>3</newnodeorder>\n\
             <newblogpostsummary>Short</newblogpostsummary>\n\
             <Author>Ann &amp; Bob</Author>\n\
             <Body><![CDATA[<p>x</p>]]></Body>\n\
             </Blog-Post>"
        );
    }

    #[test]
    fn test_render_splits_cdata_terminator() {
        let fields = vec![TransformedField {
            name: "Body".to_string(),
            value: FieldValue::CData("a]]>b".to_string()),
            summary: None,
        }];
        let body = render_record(
            &PageType::new("Blog.Post").unwrap(),
            "/a",
            &Slug::from_alias_path("/a").unwrap(),
            1,
            None,
            &fields,
        )
        .unwrap();

        assert!(body.contains("<Body><![CDATA[a]]]]><![CDATA[>b]]></Body>"));
    }

    #[tokio::test]
    async fn test_build_writes_record_file() {
        let dir = TempDir::new().unwrap();
        let type_dir = dir.path().join("Blog.Post");

        let built = builder(&type_dir, true).build(&record(), 1).await.unwrap();

        assert_eq!(built.slug.as_str(), "my-post");
        assert_eq!(built.file_path, type_dir.join("my-post").join("my-post.xml"));

        let written = std::fs::read_to_string(&built.file_path).unwrap();
        assert!(written.starts_with(XML_DECLARATION));
        assert_eq!(written, format!("{XML_DECLARATION}\n{}\n", built.body));
        assert!(written.contains("<newblogpostsummary>Short</newblogpostsummary>"));
        assert!(written.contains("<Body><![CDATA[<p>Hi there</p>]]></Body>"));
        assert!(written.contains("<Author></Author>"));
        assert!(!written.contains("<Title>"));
        assert!(!written.contains("Ignored"));
    }

    #[tokio::test]
    async fn test_field_order_follows_allow_list() {
        let dir = TempDir::new().unwrap();
        let built = builder(dir.path(), false).build(&record(), 7).await.unwrap();

        let body_at = built.body.find("<Body>").unwrap();
        let summary_at = built.body.find("<Summary>").unwrap();
        let author_at = built.body.find("<Author>").unwrap();
        assert!(body_at < summary_at && summary_at < author_at);
        assert!(built.body.contains("<newnodeorder>7</newnodeorder>"));
    }

    #[tokio::test]
    async fn test_build_without_write_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let type_dir = dir.path().join("Blog.Post");

        builder(&type_dir, false).build(&record(), 1).await.unwrap();

        assert!(!type_dir.exists());
    }

    #[tokio::test]
    async fn test_build_rejects_root_alias() {
        let dir = TempDir::new().unwrap();
        let record = ContentRecord::builder().alias_path("/").build().unwrap();

        let err = builder(dir.path(), false).build(&record, 1).await.unwrap_err();
        assert!(matches!(err, XtractorError::Validation(_)));
    }
}
