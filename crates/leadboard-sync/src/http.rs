//! Airtable REST client implementing [`RecordSource`].

use std::time::Duration;

use async_trait::async_trait;
use leadboard_core::{Error, Record, Result, SourceConfig};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{ListQuery, Page, RecordSource};

/// HTTP client for one Airtable base.
pub struct AirtableClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

#[derive(Deserialize)]
struct RecordBody {
    #[serde(default)]
    id: Option<String>,
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: String,
    },
    Code(String),
}

impl AirtableClient {
    /// Build a client for `config.base_id` under `config.api_url`.
    ///
    /// Fails with [`Error::Configuration`] before any request when the
    /// config is incomplete or the URL does not parse.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        config.validate()?;

        let mut base_url = Url::parse(&config.api_url).map_err(|e| {
            Error::configuration(format!("invalid api url '{}': {e}", config.api_url))
        })?;
        base_url
            .path_segments_mut()
            .map_err(|_| {
                Error::configuration(format!("api url '{}' cannot be a base", config.api_url))
            })?
            .pop_if_empty()
            .push(&config.base_id);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(Error::network)?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::configuration("api url cannot be a base"))?
            .extend(segments);
        Ok(url)
    }

    /// URL of one listing page. Field names, formula and token are
    /// percent-encoded as query pairs.
    pub fn list_url(
        &self,
        collection: &str,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Url> {
        let mut url = self.table_url(&[collection])?;
        {
            let mut pairs = url.query_pairs_mut();
            for field in &query.fields {
                pairs.append_pair("fields[]", field);
            }
            if let Some(formula) = query.filter_by_formula.as_deref().filter(|f| !f.is_empty()) {
                pairs.append_pair("filterByFormula", formula);
            }
            if let Some(size) = query.page_size {
                pairs.append_pair("pageSize", &size.to_string());
            }
            if let Some(token) = offset {
                pairs.append_pair("offset", token);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    pub fn record_url(&self, collection: &str, id: &str) -> Result<Url> {
        self.table_url(&[collection, id])
    }

    async fn fetch(&self, url: Url) -> Result<Response> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Error::network)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(Error::network)?;
        Ok(Response { status, body })
    }
}

struct Response {
    status: u16,
    body: String,
}

impl Response {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_error(self) -> Error {
        Error::RemoteApi {
            message: error_message(&self.body),
            status: self.status,
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(&self, what: &str) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::MalformedResponse(format!("{what}: {e}")))
    }
}

/// Human-readable message from an error body.
///
/// `{"error": {"type", "message"}}` becomes `"<type> - <message>"`,
/// `{"error": "<CODE>"}` becomes the code, anything else is passed through.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorDetail::Typed { kind, message },
        }) if message.is_empty() => kind,
        Ok(ErrorBody {
            error: ErrorDetail::Typed { kind, message },
        }) => format!("{kind} - {message}"),
        Ok(ErrorBody {
            error: ErrorDetail::Code(code),
        }) => code,
        Err(_) => body.trim().to_string(),
    }
}

/// Error type or code from an error body, if it has one.
fn error_code(body: &str) -> Option<String> {
    match serde_json::from_str::<ErrorBody>(body).ok()?.error {
        ErrorDetail::Typed { kind, .. } => Some(kind),
        ErrorDetail::Code(code) => Some(code),
    }
}

#[async_trait]
impl RecordSource for AirtableClient {
    async fn list_page(
        &self,
        collection: &str,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Page> {
        let url = self.list_url(collection, query, offset)?;
        debug!(collection, offset = offset.unwrap_or(""), "listing records");

        let resp = self.fetch(url).await?;
        if !resp.is_success() {
            return Err(resp.into_error());
        }
        resp.parse(&format!("listing of {collection}"))
    }

    async fn get_record(&self, collection: &str, id: &str) -> Result<Record> {
        let url = self.record_url(collection, id)?;
        info!(collection, id, "fetching record");

        let resp = self.fetch(url).await?;
        if !resp.is_success()
            && (resp.status == 404 || error_code(&resp.body).as_deref() == Some("NOT_FOUND"))
        {
            return Err(Error::not_found(format!(
                "record {id} in {collection} ({})",
                error_message(&resp.body)
            )));
        }
        if !resp.is_success() {
            return Err(resp.into_error());
        }
        let body: RecordBody = resp.parse(&format!("record {id}"))?;
        Ok(Record {
            id: body.id.unwrap_or_else(|| id.to_string()),
            fields: body.fields,
        })
    }
}
