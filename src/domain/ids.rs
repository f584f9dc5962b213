//! Strongly-typed identifiers
//!
//! Newtype wrappers for the identifiers the export pipeline passes around, so
//! a page type can never be confused with a slug or an alias path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content type identifier in the source system, e.g. `CMS.BlogPost`
///
/// # Examples
///
/// ```
/// use xtractor::domain::ids::PageType;
///
/// let page_type = PageType::new("CMS.BlogPost").unwrap();
/// assert_eq!(page_type.element_name(), "CMS-BlogPost");
/// assert_eq!(page_type.collection_element_name(), "CMS-BlogPosts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageType(String);

impl PageType {
    /// Creates a new PageType, rejecting blank identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Page type cannot be blank".to_string());
        }
        Ok(Self(id.trim().to_string()))
    }

    /// Returns the page type as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element name of a single exported record (dots become dashes)
    pub fn element_name(&self) -> String {
        self.0.replace('.', "-")
    }

    /// Element name wrapping every record of the run
    pub fn collection_element_name(&self) -> String {
        format!("{}s", self.element_name())
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PageType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Portable identifier of a record: the last non-empty segment of its alias path
///
/// # Examples
///
/// ```
/// use xtractor::domain::ids::Slug;
///
/// let slug = Slug::from_alias_path("/blog/my-post").unwrap();
/// assert_eq!(slug.as_str(), "my-post");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Derives the slug of an alias path
    ///
    /// # Errors
    ///
    /// Returns an error when the path has no non-empty segment (e.g. `/`).
    pub fn from_alias_path(alias_path: &str) -> Result<Self, String> {
        alias_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .last()
            .map(|segment| Self(segment.to_string()))
            .ok_or_else(|| format!("Alias path '{alias_path}' has no segment to derive a slug from"))
    }

    /// Returns the slug as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name used for the record's directory and document file
    pub fn dir_name(&self) -> String {
        self.0.replace('/', "-")
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/blog/my-post", "my-post" ; "nested path")]
    #[test_case("/about", "about" ; "top level")]
    #[test_case("/blog/my-post/", "my-post" ; "trailing slash")]
    #[test_case("blog//2020//entry", "entry" ; "repeated slashes")]
    fn test_slug_is_last_segment(alias: &str, expected: &str) {
        assert_eq!(Slug::from_alias_path(alias).unwrap().as_str(), expected);
    }

    #[test]
    fn test_slug_rejects_root() {
        assert!(Slug::from_alias_path("/").is_err());
        assert!(Slug::from_alias_path("").is_err());
    }

    #[test]
    fn test_page_type_element_names() {
        let page_type = PageType::new("Blog.Post").unwrap();
        assert_eq!(page_type.element_name(), "Blog-Post");
        assert_eq!(page_type.collection_element_name(), "Blog-Posts");
        assert_eq!(page_type.to_string(), "Blog.Post");
    }

    #[test]
    fn test_page_type_rejects_blank() {
        assert!(PageType::new("   ").is_err());
        assert!("".parse::<PageType>().is_err());
    }
}
