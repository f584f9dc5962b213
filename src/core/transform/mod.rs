//! Per-field content transformation
//!
//! A field goes through the blocks its [`FieldClass`]es name, in order:
//!
//! - **Summary**: synthesize a plain-text summary from the raw value
//! - **RichText**: resolve macros, absolutize URLs, flag widget markup,
//!   localize images, then wrap the result in CDATA
//! - **BarePath**: download a `~/...` media path and replace the value with
//!   its canonical path; overwrites whatever RichText produced
//!
//! Per-field failures never abort a record. They become [`ExportWarning`]s in
//! the [`TransformReport`] and the field keeps a best-effort value.

pub mod classify;
pub mod markup;
pub mod media;
pub mod summary;
pub mod urls;

pub use classify::{is_bare_path, FieldClassifier};
pub use media::MediaTally;

use crate::adapters::macros::MacroResolver;
use crate::adapters::media::MediaFetcher;
use crate::core::export::summary::{ExportWarning, WarningKind};
use crate::domain::{FieldClass, FieldValue, PageType, Slug, TransformedField};
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Marker of inline widget markup left behind by the source system
pub const WIDGET_MARKER: &str = "CMSInlineControl";

/// Run-wide and per-record values a field transformation needs
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Absolute site URL, with trailing slash
    pub site_url: &'a Url,
    /// Page type being exported
    pub page_type: &'a PageType,
    /// Slug of the record being built
    pub slug: &'a Slug,
    /// First segment of canonical media paths
    pub media_root: &'a str,
    /// Directory downloads are written to
    pub media_dir: &'a Path,
}

/// Side results of transforming one record's fields
#[derive(Debug, Default, Clone)]
pub struct TransformReport {
    /// Recoverable problems, in the order they happened
    pub warnings: Vec<ExportWarning>,
    /// Fields in which widget markup was found
    pub widgets: usize,
    /// Download bookkeeping
    pub media: MediaTally,
}

impl TransformReport {
    fn warn(&mut self, kind: WarningKind, message: impl Into<String>, context: String) {
        self.warnings
            .push(ExportWarning::new(kind, message.into()).with_context(context));
    }
}

/// Applies the transformation blocks to record fields
pub struct ContentTransformer {
    classifier: FieldClassifier,
    macros: Arc<dyn MacroResolver>,
    fetcher: Arc<dyn MediaFetcher>,
}

impl ContentTransformer {
    /// Creates a transformer from its collaborators
    pub fn new(
        classifier: FieldClassifier,
        macros: Arc<dyn MacroResolver>,
        fetcher: Arc<dyn MediaFetcher>,
    ) -> Self {
        Self {
            classifier,
            macros,
            fetcher,
        }
    }

    /// Transforms one field
    ///
    /// `index` is the field's position in the allow-list.
    pub async fn transform_field(
        &self,
        name: &str,
        index: usize,
        raw: &str,
        ctx: &TransformContext<'_>,
        report: &mut TransformReport,
    ) -> TransformedField {
        let classes = self.classifier.classify(name, index, raw);
        tracing::trace!(field = name, classes = ?classes, "Classified field");

        let mut field = TransformedField::plain(name, raw);
        for class in classes {
            match class {
                FieldClass::Identity | FieldClass::Plain => {}
                FieldClass::Summary => {
                    field.summary = self.summary_of(name, raw, ctx, report);
                }
                FieldClass::RichText => {
                    field.value = FieldValue::CData(self.rich_text(name, raw, ctx, report).await);
                }
                FieldClass::BarePath => {
                    if let Some(path) = self.bare_path(name, raw, ctx, report).await {
                        field.value = FieldValue::CData(path);
                    }
                }
            }
        }
        field
    }

    /// Summary of a raw value; `None` when the markup cannot be read
    pub fn summary_of(
        &self,
        name: &str,
        raw: &str,
        ctx: &TransformContext<'_>,
        report: &mut TransformReport,
    ) -> Option<String> {
        match summary::summary_of(raw) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(slug = %ctx.slug, field = name, error = %e, "Summary extraction failed");
                report.warn(
                    WarningKind::Summary,
                    e.to_string(),
                    format!("slug={}, field={name}", ctx.slug),
                );
                None
            }
        }
    }

    async fn rich_text(
        &self,
        name: &str,
        raw: &str,
        ctx: &TransformContext<'_>,
        report: &mut TransformReport,
    ) -> String {
        let resolved = self.macros.resolve(raw);

        let mut text = match urls::absolutize(&resolved, ctx.site_url) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(slug = %ctx.slug, field = name, error = %e, "Markup normalization failed");
                report.warn(
                    WarningKind::Markup,
                    e.to_string(),
                    format!("slug={}, field={name}", ctx.slug),
                );
                None
            }
        };

        if resolved.contains(WIDGET_MARKER) {
            tracing::warn!(slug = %ctx.slug, field = name, "Inline widget markup found; left as is");
            report.widgets += 1;
            report.warn(
                WarningKind::Widget,
                "Inline widget markup found",
                format!("slug={}, field={name}", ctx.slug),
            );
        }

        // Image localization only runs on markup that was read successfully.
        if let Some(absolute) = text.take() {
            let localized = media::localize_images(
                &absolute,
                self.fetcher.as_ref(),
                ctx,
                &mut report.media,
                &mut report.warnings,
            )
            .await;
            text = Some(match localized {
                Ok(localized) => localized,
                Err(e) => {
                    tracing::warn!(slug = %ctx.slug, field = name, error = %e, "Image localization failed");
                    report.warn(
                        WarningKind::Markup,
                        e.to_string(),
                        format!("slug={}, field={name}", ctx.slug),
                    );
                    absolute
                }
            });
        }

        text.unwrap_or(resolved)
    }

    async fn bare_path(
        &self,
        name: &str,
        raw: &str,
        ctx: &TransformContext<'_>,
        report: &mut TransformReport,
    ) -> Option<String> {
        let basename = media::media_basename(raw);
        if basename.is_empty() {
            report.warn(
                WarningKind::Download,
                "Media path has no file name",
                format!("slug={}, field={name}, path={raw}", ctx.slug),
            );
            return None;
        }

        let reference = raw.strip_prefix(classify::ROOT_RELATIVE_MARKER).unwrap_or(raw);
        match ctx.site_url.join(reference) {
            Ok(url) => {
                media::fetch_once(
                    self.fetcher.as_ref(),
                    &url,
                    &basename,
                    ctx,
                    &mut report.media,
                    &mut report.warnings,
                )
                .await;
            }
            Err(e) => report.warn(
                WarningKind::Download,
                format!("Unresolvable media path: {e}"),
                format!("slug={}, field={name}, path={raw}", ctx.slug),
            ),
        }

        Some(media::canonical_media_path(ctx, &basename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::macros::{PassthroughResolver, TableMacroResolver};
    use crate::adapters::media::FetchOutcome;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingFetcher {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaFetcher for CountingFetcher {
        async fn fetch(&self, url: &Url, _destination: &Path) -> FetchOutcome {
            self.urls.lock().unwrap().push(url.to_string());
            FetchOutcome::Saved(3)
        }
    }

    struct Fixture {
        site_url: Url,
        page_type: PageType,
        slug: Slug,
        media_dir: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                site_url: Url::parse("https://example.com/").unwrap(),
                page_type: PageType::new("Blog.Post").unwrap(),
                slug: Slug::from_alias_path("/blog/my-post").unwrap(),
                media_dir: PathBuf::from("/tmp/out/Blog.Post/my-post"),
            }
        }

        fn ctx(&self) -> TransformContext<'_> {
            TransformContext {
                site_url: &self.site_url,
                page_type: &self.page_type,
                slug: &self.slug,
                media_root: "media",
                media_dir: &self.media_dir,
            }
        }
    }

    fn transformer(fetcher: Arc<CountingFetcher>) -> ContentTransformer {
        ContentTransformer::new(
            FieldClassifier::default(),
            Arc::new(PassthroughResolver),
            fetcher,
        )
    }

    #[tokio::test]
    async fn test_body_is_localized_and_wrapped() {
        let fixture = Fixture::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let mut report = TransformReport::default();

        let field = transformer(fetcher.clone())
            .transform_field(
                "Body",
                1,
                "<p>Hi <img src='~/img/a.png?x=1'></p>",
                &fixture.ctx(),
                &mut report,
            )
            .await;

        assert!(field.value.is_cdata());
        assert_eq!(
            field.value.as_str(),
            r#"<p>Hi <img src="/media/Blog.Post/my-post/a.png"/></p>"#
        );
        assert!(field.summary.is_none());
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec!["https://example.com/img/a.png?x=1".to_string()]
        );
        assert_eq!(report.media.saved, 1);
    }

    #[tokio::test]
    async fn test_summary_field_gets_summary_and_rich_text() {
        let fixture = Fixture::new();
        let mut report = TransformReport::default();

        let field = transformer(Arc::new(CountingFetcher::default()))
            .transform_field("Summary", 2, "<p>Short</p><p>More</p>", &fixture.ctx(), &mut report)
            .await;

        assert_eq!(field.summary.as_deref(), Some("Short"));
        assert_eq!(field.value, FieldValue::CData("<p>Short</p><p>More</p>".to_string()));
    }

    #[tokio::test]
    async fn test_plain_field_is_untouched() {
        let fixture = Fixture::new();
        let mut report = TransformReport::default();

        let field = transformer(Arc::new(CountingFetcher::default()))
            .transform_field("Author", 3, "<b>Ann</b>", &fixture.ctx(), &mut report)
            .await;

        assert_eq!(field.value, FieldValue::Text("<b>Ann</b>".to_string()));
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_bare_path_overwrites_rich_text() {
        let fixture = Fixture::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let mut report = TransformReport::default();

        let field = transformer(fetcher.clone())
            .transform_field("TeaserContent", 1, "~/files/teaser.jpg.aspx", &fixture.ctx(), &mut report)
            .await;

        assert_eq!(
            field.value,
            FieldValue::CData("/media/Blog.Post/my-post/teaser.jpg".to_string())
        );
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec!["https://example.com/files/teaser.jpg.aspx".to_string()]
        );
    }

    #[tokio::test]
    async fn test_widget_markup_is_reported_not_changed() {
        let fixture = Fixture::new();
        let mut report = TransformReport::default();
        let raw = r#"<div><object type="Widget" class="CMSInlineControl"></object></div>"#;

        let field = transformer(Arc::new(CountingFetcher::default()))
            .transform_field("Content", 1, raw, &fixture.ctx(), &mut report)
            .await;

        assert_eq!(field.value.as_str(), raw);
        assert_eq!(report.widgets, 1);
        assert_eq!(report.warnings[0].kind, WarningKind::Widget);
    }

    #[tokio::test]
    async fn test_macros_are_resolved_before_urls() {
        let fixture = Fixture::new();
        let mut values = BTreeMap::new();
        values.insert("ImagePath".to_string(), "~/img/m.png".to_string());
        let transformer = ContentTransformer::new(
            FieldClassifier::default(),
            Arc::new(TableMacroResolver::new(&values).unwrap()),
            Arc::new(CountingFetcher::default()),
        );
        let mut report = TransformReport::default();

        let field = transformer
            .transform_field(
                "Body",
                1,
                r#"<a href="{% ImagePath %}">x</a>"#,
                &fixture.ctx(),
                &mut report,
            )
            .await;

        assert_eq!(field.value.as_str(), r#"<a href="https://example.com/img/m.png">x</a>"#);
    }

    #[tokio::test]
    async fn test_less_than_in_prose_does_not_hide_images() {
        let fixture = Fixture::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let mut report = TransformReport::default();

        let field = transformer(fetcher.clone())
            .transform_field(
                "Body",
                1,
                "<p>a < b <img src='/x.png'></p>",
                &fixture.ctx(),
                &mut report,
            )
            .await;

        assert_eq!(
            field.value,
            FieldValue::CData(r#"<p>a < b <img src="/media/Blog.Post/my-post/x.png"/></p>"#.to_string())
        );
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec!["https://example.com/x.png".to_string()]
        );
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_aspx_link_outside_img_is_kept() {
        let fixture = Fixture::new();
        let mut report = TransformReport::default();

        let field = transformer(Arc::new(CountingFetcher::default()))
            .transform_field(
                "Body",
                1,
                "<a href='/files/doc.png.aspx'>doc</a>",
                &fixture.ctx(),
                &mut report,
            )
            .await;

        assert_eq!(
            field.value.as_str(),
            r#"<a href="https://example.com/files/doc.png.aspx">doc</a>"#
        );
    }

    #[tokio::test]
    async fn test_malformed_markup_keeps_best_effort_value() {
        let fixture = Fixture::new();
        let mut report = TransformReport::default();

        let field = transformer(Arc::new(CountingFetcher::default()))
            .transform_field("Body", 1, "<p>broken <a href=\"x\"", &fixture.ctx(), &mut report)
            .await;

        assert_eq!(field.value, FieldValue::CData("<p>broken <a href=\"x\"".to_string()));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::Markup));
    }
}
