//! Content source trait and record query

use crate::config::QueryConfig;
use crate::domain::{ContentRecord, PageType, Result, XtractorError};
use async_trait::async_trait;
use std::cmp::Ordering;

/// Column used for ordering and for the alias path of a record
pub const ALIAS_PATH_COLUMN: &str = "NodeAliasPath";

/// One ordering column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column name without brackets
    pub column: String,
    /// Descending when true
    pub descending: bool,
}

impl OrderBy {
    /// Parses `Column`, `Column ASC`, `[Column] DESC`
    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let mut parts = spec.split_whitespace();
        let column = parts
            .next()
            .map(|c| c.trim_start_matches('[').trim_end_matches(']').to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| format!("Empty order-by entry '{spec}'"))?;
        let descending = match parts.next().map(|d| d.to_ascii_uppercase()) {
            None => false,
            Some(dir) if dir == "ASC" => false,
            Some(dir) if dir == "DESC" => true,
            Some(dir) => return Err(format!("Invalid sort direction '{dir}' in '{spec}'")),
        };
        if parts.next().is_some() {
            return Err(format!("Unexpected tokens in order-by entry '{spec}'"));
        }
        Ok(Self { column, descending })
    }

    /// SQL-ish rendering, e.g. `BlogPostDate DESC`
    pub fn to_clause(&self) -> String {
        format!(
            "{} {}",
            self.column,
            if self.descending { "DESC" } else { "ASC" }
        )
    }
}

/// Which records to fetch from a content source
#[derive(Debug, Clone)]
pub struct RecordQuery {
    /// Page type to fetch
    pub page_type: PageType,
    /// Columns to fetch; the first is the title column
    pub columns: Vec<String>,
    /// Only descendants of this path
    pub root_alias_path: String,
    /// Only published records
    pub published_only: bool,
    /// Result limit
    pub top_n: Option<usize>,
    /// Ordering, most significant first
    pub order_by: Vec<OrderBy>,
}

impl RecordQuery {
    /// Builds a query from the `[query]` section
    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        let page_type = config.page_type().map_err(XtractorError::Validation)?;
        let order_by = config
            .order_by
            .iter()
            .map(|spec| OrderBy::parse(spec))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(XtractorError::Validation)?;

        Ok(Self {
            page_type,
            columns: config.columns.clone(),
            root_alias_path: config.root_alias_path.clone(),
            published_only: config.published_only,
            top_n: config.top_n,
            order_by,
        })
    }

    /// Title column of the query
    pub fn title_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    /// Whether `alias_path` is strictly below the query root
    pub fn is_below_root(&self, alias_path: &str) -> bool {
        let root = self.root_alias_path.trim_end_matches('/');
        if root.is_empty() {
            return alias_path != "/" && alias_path.starts_with('/');
        }
        alias_path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
    }
}

/// Compares two column values: numerically when both parse, otherwise as text
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Compares two records under the given ordering
pub fn compare_records(a: &ContentRecord, b: &ContentRecord, order_by: &[OrderBy]) -> Ordering {
    for order in order_by {
        let value = |record: &ContentRecord| -> String {
            if order.column.eq_ignore_ascii_case(ALIAS_PATH_COLUMN) {
                record.alias_path.clone()
            } else {
                record.field(&order.column).unwrap_or_default().to_string()
            }
        };
        let ordering = compare_values(&value(a), &value(b));
        let ordering = if order.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Source of content records
///
/// `connect` establishes or verifies the session and fails with
/// [`XtractorError::Connection`]; nothing is exported when it fails.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Establishes the session with the source system
    async fn connect(&mut self) -> Result<()>;

    /// Fetches the records matching `query`, in query order
    async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<ContentRecord>>;

    /// Human-readable location of the source, for logs and messages
    fn describe(&self) -> String;
}
