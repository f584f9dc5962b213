//! Field classification
//!
//! Decides which transformation blocks a field goes through. Name-derived
//! classes are substring matches on the lower-cased field name and are not
//! mutually exclusive; configured overrides replace them per field. The
//! bare-path class always depends on the raw value.

use crate::domain::FieldClass;
use std::collections::BTreeMap;

/// Root-relative marker of the source system
pub const ROOT_RELATIVE_MARKER: &str = "~/";

const RICH_TEXT_HINTS: &[&str] = &["title", "body", "content", "summary"];

/// Whether a raw value is a bare root-relative media path such as `~/img/a.png`
pub fn is_bare_path(raw: &str) -> bool {
    raw.len() > 2 && raw.starts_with(ROOT_RELATIVE_MARKER)
}

/// Pure classifier from (field name, allow-list index, raw value) to classes
#[derive(Debug, Clone, Default)]
pub struct FieldClassifier {
    overrides: BTreeMap<String, Vec<FieldClass>>,
}

impl FieldClassifier {
    /// Classifier with per-field overrides (field name -> classes)
    pub fn new(overrides: BTreeMap<String, Vec<FieldClass>>) -> Self {
        Self { overrides }
    }

    /// Classes to apply, in evaluation order
    ///
    /// Index 0 is always [`FieldClass::Identity`] alone. Otherwise the result
    /// is a subset of `[Summary, RichText, BarePath]` in that order, or
    /// `[Plain]` when none apply.
    pub fn classify(&self, name: &str, index: usize, raw: &str) -> Vec<FieldClass> {
        if index == 0 {
            return vec![FieldClass::Identity];
        }

        let mut classes: Vec<FieldClass> = match self.override_for(name) {
            Some(configured) => [FieldClass::Summary, FieldClass::RichText]
                .into_iter()
                .filter(|class| configured.contains(class))
                .collect(),
            None => {
                let lower = name.to_lowercase();
                let mut derived = Vec::new();
                if lower.contains("summary") {
                    derived.push(FieldClass::Summary);
                }
                if RICH_TEXT_HINTS.iter().any(|hint| lower.contains(hint)) {
                    derived.push(FieldClass::RichText);
                }
                derived
            }
        };

        if is_bare_path(raw) {
            classes.push(FieldClass::BarePath);
        }

        if classes.is_empty() {
            classes.push(FieldClass::Plain);
        }
        classes
    }

    fn override_for(&self, name: &str) -> Option<&Vec<FieldClass>> {
        self.overrides.get(name).or_else(|| {
            self.overrides
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, classes)| classes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use FieldClass::*;

    #[test_case("BlogPostTitle", "Hello", &[RichText] ; "title is rich text")]
    #[test_case("BlogPostBody", "<p>x</p>", &[RichText] ; "body is rich text")]
    #[test_case("PageContent", "x", &[RichText] ; "content is rich text")]
    #[test_case("BlogPostSummary", "<p>x</p>", &[Summary, RichText] ; "summary is both")]
    #[test_case("BlogPostTeaser", "~/img/a.png", &[BarePath] ; "bare path by value")]
    #[test_case("BlogPostBody", "~/img/a.png", &[RichText, BarePath] ; "rich text and bare path")]
    #[test_case("BlogPostDate", "2020-01-01", &[Plain] ; "plain")]
    #[test_case("Teaser", "~/", &[Plain] ; "marker alone is not a path")]
    fn test_classify_by_name_and_value(name: &str, raw: &str, expected: &[FieldClass]) {
        let classifier = FieldClassifier::default();
        assert_eq!(classifier.classify(name, 1, raw), expected);
    }

    #[test]
    fn test_index_zero_is_identity() {
        let classifier = FieldClassifier::default();
        assert_eq!(
            classifier.classify("BlogPostSummary", 0, "~/a.png"),
            vec![Identity]
        );
    }

    #[test]
    fn test_override_replaces_name_derived_classes() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Abstract".to_string(), vec![RichText, Summary]);
        overrides.insert("BlogPostBody".to_string(), vec![Plain]);
        let classifier = FieldClassifier::new(overrides);

        assert_eq!(classifier.classify("abstract", 2, "x"), vec![Summary, RichText]);
        assert_eq!(classifier.classify("BlogPostBody", 1, "<p>x</p>"), vec![Plain]);
        assert_eq!(
            classifier.classify("BlogPostBody", 1, "~/a.png"),
            vec![BarePath]
        );
    }
}
