//! Field transformation through the public API

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;
use xtractor::adapters::macros::TableMacroResolver;
use xtractor::adapters::media::{FetchOutcome, MediaFetcher};
use xtractor::core::transform::{
    ContentTransformer, FieldClassifier, TransformContext, TransformReport,
};
use xtractor::domain::{PageType, Slug};

#[derive(Default)]
struct RecordingFetcher {
    calls: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait]
impl MediaFetcher for RecordingFetcher {
    async fn fetch(&self, url: &Url, destination: &Path) -> FetchOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));
        FetchOutcome::Saved(1)
    }
}

struct Harness {
    site_url: Url,
    page_type: PageType,
    slug: Slug,
    media_dir: PathBuf,
    fetcher: Arc<RecordingFetcher>,
    transformer: ContentTransformer,
}

impl Harness {
    fn new() -> Self {
        let mut macros = BTreeMap::new();
        macros.insert("SitePath".to_string(), "~".to_string());
        let fetcher = Arc::new(RecordingFetcher::default());
        let transformer = ContentTransformer::new(
            FieldClassifier::default(),
            Arc::new(TableMacroResolver::new(&macros).unwrap()),
            fetcher.clone(),
        );
        Self {
            site_url: Url::parse("https://example.com/").unwrap(),
            page_type: PageType::new("Blog.Post").unwrap(),
            slug: Slug::from_alias_path("/blog/my-post").unwrap(),
            media_dir: PathBuf::from("/tmp/xtractor-test/Blog.Post/my-post"),
            fetcher,
            transformer,
        }
    }

    async fn transform(&self, name: &str, raw: &str, report: &mut TransformReport) -> String {
        let ctx = TransformContext {
            site_url: &self.site_url,
            page_type: &self.page_type,
            slug: &self.slug,
            media_root: "media",
            media_dir: &self.media_dir,
        };
        let field = self
            .transformer
            .transform_field(name, 1, raw, &ctx, report)
            .await;
        field.value.as_str().to_string()
    }

    fn fetched(&self) -> Vec<(String, PathBuf)> {
        self.fetcher.calls.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_audio_is_never_downloaded() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform("Body", "<p><img src=\"/audio/talk.mp3?v=2\"></p>", &mut report)
        .await;

    assert!(harness.fetched().is_empty());
    assert!(value.contains("https://example.com/audio/talk.mp3?v=2"));
    assert!(!value.contains("/media/"));
}

#[tokio::test]
async fn test_aspx_suffix_is_stripped_from_media_path() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform(
            "Body",
            "<p><img src=\"~/getmedia/photo.png.aspx\"></p>",
            &mut report,
        )
        .await;

    assert!(value.contains("src=\"/media/Blog.Post/my-post/photo.png\""));
    assert!(!value.contains(".aspx"));
    let fetched = harness.fetched();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].0, "https://example.com/getmedia/photo.png.aspx");
    assert_eq!(fetched[0].1, harness.media_dir.join("photo.png"));
}

#[tokio::test]
async fn test_repeated_image_is_fetched_once_per_record() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform(
            "Body",
            "<p><img src=\"/img/a.png\"></p><p><img src=\"/img/a.png\"></p>",
            &mut report,
        )
        .await;

    assert_eq!(harness.fetched().len(), 1);
    assert_eq!(value.matches("/media/Blog.Post/my-post/a.png").count(), 2);
    assert_eq!(report.media.saved, 1);
}

#[tokio::test]
async fn test_macros_resolve_before_links_are_absolutized() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform(
            "Content",
            "<p><a href=\"{% SitePath %}/about\">About</a></p>",
            &mut report,
        )
        .await;

    assert!(value.contains("href=\"https://example.com/about\""));
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn test_bare_media_path_field() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform("TeaserImage", "~/images/teaser.jpg", &mut report)
        .await;

    assert_eq!(value, "/media/Blog.Post/my-post/teaser.jpg");
    assert_eq!(
        harness.fetched()[0].0,
        "https://example.com/images/teaser.jpg"
    );
}

#[tokio::test]
async fn test_plain_field_passes_through() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness.transform("Author", "Ann & Bob", &mut report).await;

    assert_eq!(value, "Ann & Bob");
    assert!(harness.fetched().is_empty());
}

#[tokio::test]
async fn test_comparison_in_text_keeps_following_image() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform(
            "Body",
            "<p>if x<3 then <img src='/x.png'></p>",
            &mut report,
        )
        .await;

    assert_eq!(
        value,
        "<p>if x<3 then <img src=\"/media/Blog.Post/my-post/x.png\"/></p>"
    );
    assert_eq!(harness.fetched().len(), 1);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn test_summary_keeps_comparison_text() {
    let harness = Harness::new();
    let mut report = TransformReport::default();
    let ctx = TransformContext {
        site_url: &harness.site_url,
        page_type: &harness.page_type,
        slug: &harness.slug,
        media_root: "media",
        media_dir: &harness.media_dir,
    };

    let field = harness
        .transformer
        .transform_field("Summary", 1, "<p>a < b <img src='/x.png'></p>", &ctx, &mut report)
        .await;

    assert_eq!(field.summary.as_deref(), Some("a < b "));
    assert!(field.value.as_str().contains("/media/Blog.Post/my-post/x.png"));
}

#[tokio::test]
async fn test_non_image_aspx_link_is_not_rewritten() {
    let harness = Harness::new();
    let mut report = TransformReport::default();

    let value = harness
        .transform(
            "Body",
            "<p><a href='/files/doc.png.aspx'>doc</a><img src='/i/p.png.aspx'></p>",
            &mut report,
        )
        .await;

    assert!(value.contains("href=\"https://example.com/files/doc.png.aspx\""));
    assert!(value.contains("src=\"/media/Blog.Post/my-post/p.png\""));
}
