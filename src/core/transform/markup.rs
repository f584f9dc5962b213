//! Lenient HTML fragment reading and re-serialization
//!
//! Field values are HTML fragments authored in a WYSIWYG editor, so they are
//! read with a forgiving quick-xml reader: end tag names are not checked,
//! stray end tags and bare `&` are accepted. A `<` that cannot open a tag
//! (`a < b`, `x<3`) is read as text. Anything the reader still rejects
//! surfaces as [`XtractorError::Markup`] and callers treat it as a
//! recoverable, per-field failure.

use crate::domain::{Result, XtractorError};
use std::borrow::Cow;
use quick_xml::escape::{escape, resolve_predefined_entity};
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

/// Elements that never have content; always written as `<x/>`
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// A fragment with every stray `<` escaped to `&lt;`
struct Prepared<'a> {
    html: Cow<'a, str>,
    /// Byte offsets of the inserted `&lt;` references, ascending
    inserted: Vec<u64>,
}

impl Prepared<'_> {
    fn is_inserted(&self, reference_end: u64) -> bool {
        reference_end
            .checked_sub(LT_REF.len() as u64)
            .is_some_and(|start| self.inserted.binary_search(&start).is_ok())
    }
}

const LT_REF: &str = "&lt;";

fn can_open_tag(next: Option<&u8>) -> bool {
    matches!(next, Some(b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
}

/// Escapes each `<` that is not followed by a tag name, `/`, `!` or `?`
///
/// Quoted attribute values, comments, CDATA sections and processing
/// instructions are skipped over untouched.
fn escape_stray_lt(html: &str) -> Prepared<'_> {
    let bytes = html.as_bytes();
    let mut inserted = Vec::new();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let rest = &html[i..];
        if !can_open_tag(bytes.get(i + 1)) {
            let buf = out.get_or_insert_with(|| String::with_capacity(html.len() + 8));
            buf.push_str(&html[copied..i]);
            inserted.push(buf.len() as u64);
            buf.push_str(LT_REF);
            i += 1;
            copied = i;
            continue;
        }
        let skip_to = if rest.starts_with("<!--") {
            rest.find("-->").map(|end| end + 3)
        } else if rest.starts_with("<![CDATA[") {
            rest.find("]]>").map(|end| end + 3)
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest.find('>').map(|end| end + 1)
        } else {
            tag_end(rest)
        };
        match skip_to {
            Some(len) => i += len,
            None => break,
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&html[copied..]);
            Prepared {
                html: Cow::Owned(buf),
                inserted,
            }
        }
        None => Prepared {
            html: Cow::Borrowed(html),
            inserted,
        },
    }
}

/// Length of the tag at the start of `rest`, honoring quoted values
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (at, b) in rest.bytes().enumerate() {
        match (quote, b) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(at + 1),
            (None, _) => {}
        }
    }
    None
}

fn lenient_reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    config.trim_text_start = false;
    config.trim_text_end = false;
    reader
}

fn markup_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> XtractorError {
    XtractorError::Markup(format!(
        "{err} at byte {}",
        reader.buffer_position()
    ))
}

/// One attribute of a [`Tag`]
#[derive(Debug, Clone)]
struct TagAttribute {
    name: String,
    /// Unescaped value
    value: String,
    /// Value exactly as written in the source
    raw: String,
    modified: bool,
}

/// A start or empty tag exposed to a rewrite visitor
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
    attributes: Vec<TagAttribute>,
}

impl Tag {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        let mut iter = start.html_attributes();
        iter.with_checks(false);
        for attr in iter {
            let attr = attr.map_err(|e| XtractorError::Markup(format!("<{name}>: {e}")))?;
            let raw = String::from_utf8_lossy(&attr.value).into_owned();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.clone());
            attributes.push(TagAttribute {
                name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value,
                raw,
                modified: false,
            });
        }
        Ok(Self { name, attributes })
    }

    /// Element name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive element name check
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Unescaped value of an attribute (case-insensitive name)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Replaces an existing attribute value; returns false when absent
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => {
                attr.value = value.into();
                attr.modified = true;
                true
            }
            None => false,
        }
    }

    fn to_start(&self) -> BytesStart<'static> {
        let mut start = BytesStart::new(self.name.clone());
        for attr in &self.attributes {
            let value = if attr.modified {
                escape(attr.value.as_str()).into_owned()
            } else {
                attr.raw.replace('"', "&quot;")
            };
            start.push_attribute((attr.name.as_bytes(), value.as_bytes()));
        }
        start
    }
}

fn resolve_reference(reference: &BytesRef<'_>) -> String {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return ch.to_string();
    }
    let name = String::from_utf8_lossy(reference.as_ref()).into_owned();
    match resolve_predefined_entity(&name) {
        Some(resolved) => resolved.to_string(),
        None => format!("&{name};"),
    }
}

/// Re-serializes a fragment, letting `visit` edit every start/empty tag
///
/// Void elements such as `<img>` are always closed (`<img .../>`) and their
/// stray end tags dropped. Text, entity references, comments and CDATA are
/// copied through untouched. Unmodified attribute values keep their source
/// escaping.
///
/// # Errors
///
/// Returns [`XtractorError::Markup`] when the reader cannot make sense of
/// the fragment.
pub fn rewrite_tags(html: &str, mut visit: impl FnMut(&mut Tag)) -> Result<String> {
    let prepared = escape_stray_lt(html);
    let mut reader = lenient_reader(&prepared.html);
    let mut writer = Writer::new(Vec::with_capacity(html.len()));

    loop {
        let event = reader
            .read_event()
            .map_err(|e| markup_error(&reader, e))?;
        match event {
            Event::Start(start) => {
                let mut tag = Tag::from_start(&start)?;
                visit(&mut tag);
                if is_void(tag.name()) {
                    writer.write_event(Event::Empty(tag.to_start()))?;
                } else {
                    writer.write_event(Event::Start(tag.to_start()))?;
                }
            }
            Event::Empty(start) => {
                let mut tag = Tag::from_start(&start)?;
                visit(&mut tag);
                writer.write_event(Event::Empty(tag.to_start()))?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if !is_void(&name) {
                    writer.write_event(Event::End(end))?;
                }
            }
            Event::GeneralRef(_) if prepared.is_inserted(reader.buffer_position()) => {
                writer.write_event(Event::Text(BytesText::from_escaped("<")))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| XtractorError::Markup(format!("Re-serialized markup is not UTF-8: {e}")))
}

/// Collects the values of `attribute` on every `element`, in document order
pub fn attribute_values(html: &str, element: &str, attribute: &str) -> Result<Vec<String>> {
    let prepared = escape_stray_lt(html);
    let mut reader = lenient_reader(&prepared.html);
    let mut values = Vec::new();

    loop {
        match reader
            .read_event()
            .map_err(|e| markup_error(&reader, e))?
        {
            Event::Start(start) | Event::Empty(start) => {
                let tag = Tag::from_start(&start)?;
                if tag.is(element) {
                    if let Some(value) = tag.attr(attribute) {
                        values.push(value.to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(values)
}

/// Text content of the whole fragment, entities resolved
pub fn inner_text(html: &str) -> Result<String> {
    let prepared = escape_stray_lt(html);
    let mut reader = lenient_reader(&prepared.html);
    let mut text = String::new();

    loop {
        match reader
            .read_event()
            .map_err(|e| markup_error(&reader, e))?
        {
            Event::Text(t) => text.push_str(&t.decode().map_err(quick_xml::Error::from)?),
            Event::CData(c) => text.push_str(&c.decode().map_err(quick_xml::Error::from)?),
            Event::GeneralRef(r) => text.push_str(&resolve_reference(&r)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Text content of the first `<p>` element, if the fragment has one
///
/// Nested paragraphs are included; an unclosed paragraph runs to the end of
/// the fragment.
pub fn first_paragraph_text(html: &str) -> Result<Option<String>> {
    let prepared = escape_stray_lt(html);
    let mut reader = lenient_reader(&prepared.html);
    let mut text: Option<String> = None;
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| markup_error(&reader, e))?;
        match event {
            Event::Start(start) if start.name().as_ref().eq_ignore_ascii_case(b"p") => {
                if text.is_none() {
                    text = Some(String::new());
                }
                depth += 1;
            }
            Event::Empty(start)
                if text.is_none() && start.name().as_ref().eq_ignore_ascii_case(b"p") =>
            {
                return Ok(Some(String::new()));
            }
            Event::End(end) if depth > 0 && end.name().as_ref().eq_ignore_ascii_case(b"p") => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text);
                }
            }
            Event::Text(t) if depth > 0 => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(&t.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(c) if depth > 0 => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(&c.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::GeneralRef(r) if depth > 0 => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(&resolve_reference(&r));
                }
            }
            Event::Eof => return Ok(text),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_closes_void_elements() {
        let out = rewrite_tags("<p>a<br>b<img src=\"x.png\"></p>", |_| {}).unwrap();
        assert_eq!(out, "<p>a<br/>b<img src=\"x.png\"/></p>");
    }

    #[test]
    fn test_rewrite_drops_stray_void_end_tags() {
        let out = rewrite_tags("<img src=\"x.png\"></img>", |_| {}).unwrap();
        assert_eq!(out, "<img src=\"x.png\"/>");
    }

    #[test]
    fn test_rewrite_preserves_text_and_entities() {
        let html = "<p class=\"lead\">Tom &amp; Jerry&nbsp;&#169; <!-- note --></p>";
        assert_eq!(rewrite_tags(html, |_| {}).unwrap(), html);
    }

    #[test]
    fn test_rewrite_keeps_stray_less_than_as_text() {
        let mut seen = Vec::new();
        let out = rewrite_tags("<p>a < b <img src='/x.png'> if x<3 &lt;</p>", |tag| {
            seen.push(tag.name().to_string());
        })
        .unwrap();
        assert_eq!(seen, vec!["p", "img"]);
        assert_eq!(out, "<p>a < b <img src=\"/x.png\"/> if x<3 &lt;</p>");
    }

    #[test]
    fn test_stray_less_than_inside_comment_and_attribute_is_untouched() {
        let html = "<p title=\"a < b\"><!-- 1 > 0 < 2 -->x</p>";
        assert_eq!(rewrite_tags(html, |_| {}).unwrap(), html);
        assert_eq!(escape_stray_lt(html).inserted, Vec::<u64>::new());
    }

    #[test]
    fn test_rewrite_requotes_single_quoted_attributes() {
        let out = rewrite_tags("<a href='/x?a=1&b=2' title='say \"hi\"'>x</a>", |_| {}).unwrap();
        assert_eq!(
            out,
            "<a href=\"/x?a=1&b=2\" title=\"say &quot;hi&quot;\">x</a>"
        );
    }

    #[test]
    fn test_rewrite_escapes_modified_values() {
        let out = rewrite_tags("<a href=\"old\">x</a>", |tag| {
            if tag.is("a") {
                tag.set_attr("href", "https://e.com/?a=1&b=2");
            }
        })
        .unwrap();
        assert_eq!(out, "<a href=\"https://e.com/?a=1&amp;b=2\">x</a>");
    }

    #[test]
    fn test_rewrite_tolerates_unclosed_and_unmatched_tags() {
        let out = rewrite_tags("<div><p>one</div></span>", |_| {}).unwrap();
        assert_eq!(out, "<div><p>one</div></span>");
    }

    #[test]
    fn test_rewrite_reports_truncated_tag() {
        let err = rewrite_tags("<p>text <img src=\"a.png\"", |_| {}).unwrap_err();
        assert!(matches!(err, XtractorError::Markup(_)));
    }

    #[test]
    fn test_attribute_values_in_document_order() {
        let html = "<img src='a.png'><p><IMG SRC=\"b.png\"/></p><img alt='none'>";
        assert_eq!(
            attribute_values(html, "img", "src").unwrap(),
            vec!["a.png", "b.png"]
        );
    }

    #[test]
    fn test_attribute_values_after_stray_less_than() {
        assert_eq!(
            attribute_values("<p>a < b <img src='/x.png'></p>", "img", "src").unwrap(),
            vec!["/x.png"]
        );
    }

    #[test]
    fn test_inner_text_resolves_references() {
        assert_eq!(
            inner_text("<p>Fish &amp; chips</p><p>&#8364;5&nbsp;only</p>").unwrap(),
            "Fish & chips€5\u{a0}only"
        );
    }

    #[test]
    fn test_first_paragraph_text() {
        assert_eq!(
            first_paragraph_text("<div>intro</div><p>First <b>bold</b></p><p>Second</p>")
                .unwrap(),
            Some("First bold".to_string())
        );
        assert_eq!(first_paragraph_text("no paragraphs").unwrap(), None);
        assert_eq!(
            first_paragraph_text("<p>unclosed").unwrap(),
            Some("unclosed".to_string())
        );
    }

    #[test]
    fn test_first_paragraph_text_keeps_stray_less_than() {
        assert_eq!(
            first_paragraph_text("<p>a < b</p><p>next</p>").unwrap(),
            Some("a < b".to_string())
        );
        assert_eq!(inner_text("x<3 <").unwrap(), "x<3 <");
    }
}
