//! Relative URL absolutization

use super::classify::ROOT_RELATIVE_MARKER;
use super::markup::rewrite_tags;
use crate::domain::Result;
use url::Url;

/// Attributes carrying a URL
const URL_ATTRIBUTES: &[&str] = &["src", "href", "background", "poster", "action", "data"];

/// Resolves one reference against the site URL
///
/// `~/x` is application-relative and resolves under the site URL's path;
/// `/x` is host-relative. Absolute, protocol-relative, fragment, `mailto:`
/// and plain relative references are left alone (`None`).
///
/// ```
/// use url::Url;
/// use xtractor::core::transform::urls::resolve_reference;
///
/// let base = Url::parse("https://example.com/site/").unwrap();
/// assert_eq!(
///     resolve_reference("~/img/a.png", &base).as_deref(),
///     Some("https://example.com/site/img/a.png")
/// );
/// assert_eq!(
///     resolve_reference("/img/a.png", &base).as_deref(),
///     Some("https://example.com/img/a.png")
/// );
/// assert_eq!(resolve_reference("https://cdn.example.com/a.png", &base), None);
/// ```
pub fn resolve_reference(reference: &str, base: &Url) -> Option<String> {
    let trimmed = reference.trim();
    if let Some(rest) = trimmed.strip_prefix(ROOT_RELATIVE_MARKER) {
        return base.join(rest).ok().map(String::from);
    }
    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        return base.join(trimmed).ok().map(String::from);
    }
    None
}

/// Rewrites every relative URL attribute in a fragment to an absolute URL
pub fn absolutize(html: &str, base: &Url) -> Result<String> {
    rewrite_tags(html, |tag| {
        for attribute in URL_ATTRIBUTES {
            if let Some(resolved) = tag.attr(attribute).and_then(|v| resolve_reference(v, base)) {
                tag.set_attr(attribute, resolved);
            }
        }
    })
}
