//! Aggregate document of the run
//!
//! All per-record bodies, in processing order, under one pluralized root:
//! `Blog.Post` records end up in `<Blog-Posts>`.

use super::output::XML_DECLARATION;
use crate::domain::PageType;

/// Folds per-record bodies into one document
pub struct AggregateWriter;

impl AggregateWriter {
    /// Aggregate document for `bodies`, each on its own line
    pub fn render(page_type: &PageType, bodies: &[String]) -> String {
        let root = page_type.collection_element_name();
        let capacity = bodies.iter().map(|b| b.len() + 1).sum::<usize>() + 2 * root.len() + 64;

        let mut document = String::with_capacity(capacity);
        document.push_str(XML_DECLARATION);
        document.push('\n');
        document.push_str(&format!("<{root}>\n"));
        for body in bodies {
            document.push_str(body);
            document.push('\n');
        }
        document.push_str(&format!("</{root}>\n"));
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn top_level_children(document: &str) -> Vec<String> {
        let mut reader = Reader::from_str(document);
        let mut depth = 0usize;
        let mut children = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(start) => {
                    if depth == 1 {
                        children.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                    }
                    depth += 1;
                }
                Event::End(_) => depth -= 1,
                Event::Empty(start) if depth == 1 => {
                    children.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        children
    }

    #[test]
    fn test_render_keeps_every_body_in_order() {
        let page_type = PageType::new("Blog.Post").unwrap();
        let bodies: Vec<String> = (1..=3)
            .map(|i| {
                format!(
                    "<Blog-Post originalAliasPath=\"/blog/p{i}\">\n<newnodeorder>{i}</newnodeorder>\n</Blog-Post>"
                )
            })
            .collect();

        let document = AggregateWriter::render(&page_type, &bodies);

        assert!(document.starts_with(XML_DECLARATION));
        assert!(document.contains("<Blog-Posts>\n<Blog-Post"));
        assert_eq!(top_level_children(&document).len(), 3);
        let first = document.find("/blog/p1").unwrap();
        let third = document.find("/blog/p3").unwrap();
        assert!(first < third);
    }

    #[test]
    fn test_render_empty_run() {
        let page_type = PageType::new("CMS.News").unwrap();
        let document = AggregateWriter::render(&page_type, &[]);

        assert_eq!(document, format!("{XML_DECLARATION}\n<CMS-Newss>\n</CMS-Newss>\n"));
    }
}
