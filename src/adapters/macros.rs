//! Macro expression resolution
//!
//! Content exported from the CMS can embed macro expressions such as
//! `{% CurrentSite.SiteName %}` or `{% Localize("x") #%}`. Nothing here
//! evaluates them; a [`TableMacroResolver`] substitutes literal values
//! configured in the `[macros]` section.

use crate::domain::{Result, XtractorError};
use regex::Regex;
use std::collections::BTreeMap;

/// Resolves embedded macro expressions to literal text
pub trait MacroResolver: Send + Sync {
    /// Returns `text` with every resolvable expression replaced
    fn resolve(&self, text: &str) -> String;
}

/// Leaves text unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

impl MacroResolver for PassthroughResolver {
    fn resolve(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Resolves `{% expr %}` against a lookup table
///
/// The key is the expression with surrounding whitespace, a trailing `#`
/// signature terminator and any `|(param)value` suffixes removed. Lookups
/// ignore ASCII case. Unknown expressions stay in the text as written.
pub struct TableMacroResolver {
    values: BTreeMap<String, String>,
    pattern: Regex,
}

impl TableMacroResolver {
    /// Creates a resolver from expression -> literal pairs
    pub fn new(values: &BTreeMap<String, String>) -> Result<Self> {
        let pattern = Regex::new(r"\{%(.*?)%\}")
            .map_err(|e| XtractorError::Configuration(format!("Invalid macro pattern: {e}")))?;
        let values = values
            .iter()
            .map(|(k, v)| (normalize_expression(k), v.clone()))
            .collect();
        Ok(Self { values, pattern })
    }

    fn lookup(&self, expression: &str) -> Option<&str> {
        let key = normalize_expression(expression);
        self.values.get(&key).map(String::as_str)
    }
}

fn normalize_expression(expression: &str) -> String {
    let mut expr = expression.trim();
    if let Some(index) = expr.find("|(") {
        expr = &expr[..index];
    }
    expr.trim().trim_end_matches('#').trim().to_lowercase()
}

impl MacroResolver for TableMacroResolver {
    fn resolve(&self, text: &str) -> String {
        if !text.contains("{%") {
            return text.to_string();
        }
        self.pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let expression = &caps[1];
                match self.lookup(expression) {
                    Some(value) => value.to_string(),
                    None => {
                        tracing::debug!(expression = expression.trim(), "Unresolved macro left in place");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}
