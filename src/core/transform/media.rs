//! Image and media localization
//!
//! Every `<img>` reference in rich text is downloaded into the record's media
//! directory and rewritten to its canonical path
//! `/<media-root>/<page-type>/<slug>/<basename>`. The rewrite happens whether
//! or not the download succeeded.

use super::markup::{attribute_values, rewrite_tags};
use super::TransformContext;
use crate::adapters::media::{FetchOutcome, MediaFetcher};
use crate::core::export::summary::{ExportWarning, WarningKind};
use crate::domain::Result;
use crate::log_download_failure;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Per-record media bookkeeping
#[derive(Debug, Default, Clone)]
pub struct MediaTally {
    /// Files written
    pub saved: usize,
    /// Downloads that failed
    pub failed: usize,
    /// Downloads not attempted (dry run)
    pub skipped: usize,
    /// Source URLs already attempted for this record
    pub fetched: HashSet<String>,
}

/// Whether a reference points at audio, which is never localized
pub fn is_audio_reference(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.ends_with(".mp3") || lower.contains(".mp3?")
}

/// File name a reference is stored under
///
/// The part before the first `?`, last path segment, `.aspx` removed.
///
/// ```
/// use xtractor::core::transform::media::media_basename;
///
/// assert_eq!(media_basename("https://example.com/img/a.png?x=1"), "a.png");
/// assert_eq!(media_basename("~/getmedia/photo.jpg.aspx"), "photo.jpg");
/// ```
pub fn media_basename(reference: &str) -> String {
    let path = reference.split('?').next().unwrap_or_default();
    let path = path.split('#').next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default();
    name.replace(".aspx", "")
}

/// Canonical site path of a localized media file
pub fn canonical_media_path(ctx: &TransformContext<'_>, basename: &str) -> String {
    format!(
        "/{}/{}/{}/{}",
        ctx.media_root.trim_matches('/'),
        ctx.page_type.as_str(),
        ctx.slug.dir_name(),
        basename
    )
}

/// Downloads `url` into the media directory unless this record already tried it
pub async fn fetch_once(
    fetcher: &dyn MediaFetcher,
    url: &Url,
    basename: &str,
    ctx: &TransformContext<'_>,
    tally: &mut MediaTally,
    warnings: &mut Vec<ExportWarning>,
) {
    if !tally.fetched.insert(url.to_string()) {
        tracing::debug!(url = %url, "Media already fetched for this record");
        return;
    }

    let destination = ctx.media_dir.join(basename);
    match fetcher.fetch(url, &destination).await {
        FetchOutcome::Saved(bytes) => {
            tracing::debug!(url = %url, bytes, "Media saved");
            tally.saved += 1;
        }
        FetchOutcome::Skipped => tally.skipped += 1,
        FetchOutcome::Failed(message) => {
            log_download_failure!(ctx.slug, url, message);
            tally.failed += 1;
            warnings.push(
                ExportWarning::new(WarningKind::Download, message)
                    .with_context(format!("slug={}, url={url}", ctx.slug)),
            );
        }
    }
}

/// Downloads every image of a fragment and points it at its canonical path
///
/// Audio references, empty sources and sources without a file name are left
/// untouched. A source that does not resolve against the site URL is left
/// untouched with a warning.
///
/// # Errors
///
/// Returns a markup error when the fragment cannot be read; the caller
/// decides whether that is fatal.
pub async fn localize_images(
    html: &str,
    fetcher: &dyn MediaFetcher,
    ctx: &TransformContext<'_>,
    tally: &mut MediaTally,
    warnings: &mut Vec<ExportWarning>,
) -> Result<String> {
    let sources = attribute_values(html, "img", "src")?;
    if sources.is_empty() {
        return Ok(html.to_string());
    }

    let mut rewrites: HashMap<String, String> = HashMap::new();
    for src in sources {
        if rewrites.contains_key(&src) {
            continue;
        }
        let trimmed = src.trim();
        if trimmed.is_empty() || is_audio_reference(trimmed) {
            continue;
        }
        let basename = media_basename(trimmed);
        if basename.is_empty() {
            continue;
        }

        let reference = trimmed.strip_prefix("~/").unwrap_or(trimmed);
        let url = match ctx.site_url.join(reference) {
            Ok(url) => url,
            Err(e) => {
                warnings.push(
                    ExportWarning::new(WarningKind::Markup, format!("Unresolvable image source: {e}"))
                        .with_context(format!("slug={}, src={trimmed}", ctx.slug)),
                );
                continue;
            }
        };

        fetch_once(fetcher, &url, &basename, ctx, tally, warnings).await;
        rewrites.insert(src.clone(), canonical_media_path(ctx, &basename));
    }

    if rewrites.is_empty() {
        return Ok(html.to_string());
    }

    rewrite_tags(html, |tag| {
        if !tag.is("img") {
            return;
        }
        let replacement = tag.attr("src").and_then(|src| rewrites.get(src)).cloned();
        if let Some(path) = replacement {
            tag.set_attr("src", path);
        }
    })
}
