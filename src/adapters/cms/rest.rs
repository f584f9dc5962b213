//! CMS REST service source
//!
//! Reads documents through the CMS REST endpoint
//! `GET {base}/rest/content/currentsite/{culture}/all{root}` with basic
//! authentication. Responses have the shape
//! `{"cms_documents": [{"<Class_Name>": [{...record...}]}]}`.

use super::source::{ContentSource, RecordQuery, ALIAS_PATH_COLUMN};
use crate::config::CmsConfig;
use crate::domain::{CmsError, ContentRecord, Result, XtractorError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Content source backed by the CMS REST service
pub struct RestContentSource {
    config: CmsConfig,
    client: Client,
    connected: bool,
}

impl RestContentSource {
    /// Creates a source from the `[cms]` section
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: CmsConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the CMS connection");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            XtractorError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            config,
            client,
            connected: false,
        })
    }

    /// Endpoint URL for documents below `root`
    fn documents_url(&self, root: &str) -> Result<Url> {
        let root = if root.starts_with('/') {
            root.to_string()
        } else {
            format!("/{root}")
        };
        let raw = format!(
            "{}/rest/content/currentsite/{}/all{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.culture,
            root
        );
        Url::parse(&raw).map_err(|e| {
            XtractorError::Configuration(format!("Invalid CMS endpoint '{raw}': {e}"))
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let password = self
            .config
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_ref().to_string());
        request.basic_auth(&self.config.username, password)
    }

    async fn get_json(&self, url: Url) -> std::result::Result<Value, CmsError> {
        tracing::debug!(url = %url, "Requesting CMS documents");

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| CmsError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::from_status(status.as_u16(), body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CmsError::InvalidResponse(e.to_string()))
    }
}

/// Renders a JSON scalar as field text; null becomes empty
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Flattens a REST response into records, in response order
pub fn parse_documents(
    body: &Value,
    title_column: Option<&str>,
) -> std::result::Result<Vec<ContentRecord>, CmsError> {
    let groups = body
        .get("cms_documents")
        .and_then(Value::as_array)
        .ok_or_else(|| CmsError::InvalidResponse("missing 'cms_documents' array".to_string()))?;

    let mut records = Vec::new();
    for group in groups {
        let classes = group.as_object().ok_or_else(|| {
            CmsError::InvalidResponse("'cms_documents' entries must be objects".to_string())
        })?;
        for (class_name, documents) in classes {
            let documents = documents.as_array().ok_or_else(|| {
                CmsError::InvalidResponse(format!("documents of class '{class_name}' must be an array"))
            })?;
            for document in documents {
                records.push(parse_document(document, title_column)?);
            }
        }
    }
    Ok(records)
}

fn parse_document(
    document: &Value,
    title_column: Option<&str>,
) -> std::result::Result<ContentRecord, CmsError> {
    let object = document
        .as_object()
        .ok_or_else(|| CmsError::InvalidResponse("document must be an object".to_string()))?;

    let alias_path = object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(ALIAS_PATH_COLUMN))
        .map(|(_, value)| value_to_string(value))
        .ok_or_else(|| {
            CmsError::InvalidResponse(format!("document without {ALIAS_PATH_COLUMN}"))
        })?;

    let fields: Vec<(String, String)> = object
        .iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect();

    let title = title_column
        .and_then(|column| {
            fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(column))
                .map(|(_, value)| value.clone())
        })
        .unwrap_or_default();

    ContentRecord::builder()
        .alias_path(alias_path)
        .title(title)
        .fields(fields)
        .build()
        .map_err(CmsError::InvalidResponse)
}

#[async_trait]
impl ContentSource for RestContentSource {
    async fn connect(&mut self) -> Result<()> {
        let mut url = self.documents_url("/")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("topn", "1")
            .append_pair("columns", ALIAS_PATH_COLUMN);

        self.get_json(url).await.map_err(XtractorError::Connection)?;
        self.connected = true;

        tracing::info!(
            base_url = %self.config.base_url,
            username = %self.config.username,
            "Connected to CMS REST service"
        );
        Ok(())
    }

    async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<ContentRecord>> {
        if !self.connected {
            return Err(XtractorError::Cms(CmsError::ConnectionFailed(
                "fetch_records called before connect".to_string(),
            )));
        }

        let mut columns = query.columns.clone();
        if !columns
            .iter()
            .any(|c| c.eq_ignore_ascii_case(ALIAS_PATH_COLUMN))
        {
            columns.push(ALIAS_PATH_COLUMN.to_string());
        }

        let mut url = self.documents_url(&query.root_alias_path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("format", "json")
                .append_pair("classnames", query.page_type.as_str())
                .append_pair("coupleddata", "true")
                .append_pair("columns", &columns.join(","))
                .append_pair(
                    "selectonlypublished",
                    if query.published_only { "true" } else { "false" },
                );
            if !query.order_by.is_empty() {
                let clauses: Vec<String> = query.order_by.iter().map(|o| o.to_clause()).collect();
                pairs.append_pair("orderby", &clauses.join(","));
            }
            // One extra row covers the root document, which the service counts.
            if let Some(top_n) = query.top_n {
                pairs.append_pair("topn", &top_n.saturating_add(1).to_string());
            }
        }

        let body = self.get_json(url).await?;
        let records = parse_documents(&body, query.title_column())?;

        // The service includes the root document itself; only descendants are exported.
        let mut records: Vec<ContentRecord> = records
            .into_iter()
            .filter(|r| query.is_below_root(&r.alias_path))
            .collect();
        if let Some(top_n) = query.top_n {
            records.truncate(top_n);
        }

        tracing::info!(count = records.len(), page_type = %query.page_type, "Fetched records");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{} (REST)", self.config.base_url)
    }
}
