//! Redirect map of the run
//!
//! One permanent redirect rule per processed record, from the original alias
//! path to the new slug, in processing order:
//!
//! ```xml
//! <rules>
//!   <rule name="redirect alias my-post rule">
//!     <match url="^/blog/my-post"/>
//!     <action type="Redirect" url="/my-post" redirectType="Permanent" appendQueryString="true"/>
//!   </rule>
//! </rules>
//! ```

use crate::domain::{Result, Slug, XtractorError};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// One old-path to new-slug pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    /// Original alias path
    pub from_alias: String,
    /// Slug the alias now lives under
    pub to_slug: String,
}

/// Ordered redirect entries; duplicates are kept
#[derive(Debug, Clone, Default)]
pub struct RedirectCollector {
    entries: Vec<RedirectEntry>,
}

impl RedirectCollector {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the entry of one processed record
    pub fn record(&mut self, from_alias: impl Into<String>, to_slug: &Slug) {
        self.entries.push(RedirectEntry {
            from_alias: from_alias.into(),
            to_slug: to_slug.as_str().to_string(),
        });
    }

    /// Entries in processing order
    pub fn entries(&self) -> &[RedirectEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders redirect entries into a rules document
pub struct RedirectWriter;

impl RedirectWriter {
    /// Rules document for `entries`, two-space indented
    pub fn render(entries: &[RedirectEntry]) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Start(BytesStart::new("rules")))?;

        for entry in entries {
            let name = format!("redirect alias {} rule", entry.to_slug);
            let pattern = format!("^{}", entry.from_alias);
            let target = format!("/{}", entry.to_slug);

            let mut rule = BytesStart::new("rule");
            rule.push_attribute(("name", name.as_str()));
            writer.write_event(Event::Start(rule))?;

            let mut matcher = BytesStart::new("match");
            matcher.push_attribute(("url", pattern.as_str()));
            writer.write_event(Event::Empty(matcher))?;

            let mut action = BytesStart::new("action");
            action.push_attribute(("type", "Redirect"));
            action.push_attribute(("url", target.as_str()));
            action.push_attribute(("redirectType", "Permanent"));
            action.push_attribute(("appendQueryString", "true"));
            writer.write_event(Event::Empty(action))?;

            writer.write_event(Event::End(BytesEnd::new("rule")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("rules")))?;

        let mut document = String::from_utf8(writer.into_inner())
            .map_err(|e| XtractorError::Markup(format!("Redirect document is not UTF-8: {e}")))?;
        document.push('\n');
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(alias: &str) -> Slug {
        Slug::from_alias_path(alias).unwrap()
    }

    #[test]
    fn test_collector_keeps_order_and_duplicates() {
        let mut collector = RedirectCollector::new();
        collector.record("/blog/b", &slug("/blog/b"));
        collector.record("/blog/a", &slug("/blog/a"));
        collector.record("/blog/b", &slug("/blog/b"));

        let froms: Vec<_> = collector.entries().iter().map(|e| e.from_alias.as_str()).collect();
        assert_eq!(froms, vec!["/blog/b", "/blog/a", "/blog/b"]);
        assert_eq!(collector.len(), 3);
    }

    #[test]
    fn test_render_rules() {
        let mut collector = RedirectCollector::new();
        collector.record("/blog/my-post", &slug("/blog/my-post"));

        let document = RedirectWriter::render(collector.entries()).unwrap();

        assert_eq!(
            document,
            "<rules>\n  \
             <rule name=\"redirect alias my-post rule\">\n    \
             <match url=\"^/blog/my-post\"/>\n    \
             <action type=\"Redirect\" url=\"/my-post\" redirectType=\"Permanent\" appendQueryString=\"true\"/>\n  \
             </rule>\n\
             </rules>\n"
        );
    }

    #[test]
    fn test_render_escapes_alias() {
        let entries = vec![RedirectEntry {
            from_alias: "/blog/a&b".to_string(),
            to_slug: "a&b".to_string(),
        }];

        let document = RedirectWriter::render(&entries).unwrap();
        assert!(document.contains("url=\"^/blog/a&amp;b\""));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(RedirectWriter::render(&[]).unwrap(), "<rules>\n</rules>\n");
    }
}
