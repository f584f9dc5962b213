//! Field allow-list and transformed field values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether `name` can be written as an XML element name
///
/// A letter or `_` followed by letters, digits, `-`, `_` or `.`.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        _ => false,
    }
}

/// Ordered list of exportable field names
///
/// The entry at index 0 is the identity/title column and is never emitted
/// as a body field. A field is eligible iff it occurs at an index > 0.
///
/// # Examples
///
/// ```
/// use xtractor::domain::fields::FieldAllowList;
///
/// let list = FieldAllowList::new(vec!["Title".into(), "Body".into(), "Summary".into()]).unwrap();
/// assert_eq!(list.identity(), "Title");
/// assert_eq!(list.eligible().collect::<Vec<_>>(), vec!["Body", "Summary"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAllowList(Vec<String>);

impl FieldAllowList {
    /// Creates an allow-list; it must contain at least the identity column
    pub fn new(columns: Vec<String>) -> Result<Self, String> {
        if columns.is_empty() {
            return Err("Field allow-list cannot be empty".to_string());
        }
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err("Field allow-list cannot contain blank names".to_string());
        }
        // Every entry after the identity becomes an element name.
        if let Some(bad) = columns.iter().skip(1).find(|c| !is_xml_name(c)) {
            return Err(format!("Field name '{bad}' is not a valid XML element name"));
        }
        Ok(Self(columns))
    }

    /// Identity/title column
    pub fn identity(&self) -> &str {
        &self.0[0]
    }

    /// First index of `name` in the list
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c == name)
    }

    /// Whether `name` is emitted as a body field
    pub fn is_eligible(&self, name: &str) -> bool {
        self.position(name).is_some_and(|index| index > 0)
    }

    /// Eligible names in list order, each once
    ///
    /// A name repeated later in the list is skipped, and a name equal to the
    /// identity column is never yielded.
    pub fn eligible(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .enumerate()
            .filter(|(index, name)| self.position(name) == Some(*index) && *index > 0)
            .map(|(_, name)| name.as_str())
    }

    /// All columns, identity included
    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

/// Transformation blocks a field can be routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Identity/title column, never emitted as a body field
    Identity,
    /// Source of the synthesized summary element
    Summary,
    /// HTML content: macros, URLs, widgets, images
    RichText,
    /// A single root-relative media path
    BarePath,
    /// Copied through unchanged
    Plain,
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldClass::Identity => "identity",
            FieldClass::Summary => "summary",
            FieldClass::RichText => "rich_text",
            FieldClass::BarePath => "bare_path",
            FieldClass::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Transformed value of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Written as escaped character data
    Text(String),
    /// Written verbatim inside a CDATA section
    CData(String),
}

impl FieldValue {
    /// Inner string, without any CDATA wrapping
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Text(s) | FieldValue::CData(s) => s,
        }
    }

    /// Whether the value is emitted as CDATA
    pub fn is_cdata(&self) -> bool {
        matches!(self, FieldValue::CData(_))
    }
}

/// Output of transforming one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedField {
    /// Field name, used as the element name
    pub name: String,
    /// Transformed value
    pub value: FieldValue,
    /// Synthesized summary text, when the field is a summary source
    pub summary: Option<String>,
}

impl TransformedField {
    /// Creates a field with a plain text value and no summary
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
            summary: None,
        }
    }
}
