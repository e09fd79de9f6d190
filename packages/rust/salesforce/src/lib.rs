//! Salesforce client for the account lookup.
//!
//! Logs in through the SOAP partner endpoint with user name, password and
//! security token, then runs SOQL through the REST `/query` resource. The
//! session is established on the first query and shared by every later one.

mod query;
mod record;

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use url::Url;

use nebo_shared::{NeboError, Result, SalesforceConfig, SalesforceCredentials};

pub use query::{SanitizedTerm, build_query, sanitize};
pub use record::{AccountRecord, ManagerRef, QueryResponse, decode_records};

/// User-Agent string for Salesforce requests.
const USER_AGENT: &str = concat!("Nebo/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Connection settings.
#[derive(Debug, Clone)]
pub struct SalesforceOptions {
    /// API version without the `v` prefix.
    pub api_version: String,
    /// Timeout for each HTTP request in seconds.
    pub timeout_secs: u64,
}

impl Default for SalesforceOptions {
    fn default() -> Self {
        SalesforceOptions::from(&SalesforceConfig::default())
    }
}

impl From<&SalesforceConfig> for SalesforceOptions {
    fn from(config: &SalesforceConfig) -> Self {
        Self {
            api_version: config.api_version.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An authenticated API session.
#[derive(Debug, Clone)]
struct Session {
    instance_url: String,
    session_id: String,
}

/// Salesforce API client.
///
/// Construct once per process and share it; the login happens on the first
/// [`query`](Self::query) and is never repeated once it succeeds. An expired
/// session is not renewed: queries fail with Salesforce's
/// `INVALID_SESSION_ID` until a new client is built.
pub struct SalesforceClient {
    http: Client,
    credentials: SalesforceCredentials,
    options: SalesforceOptions,
    session: OnceCell<Session>,
}

impl SalesforceClient {
    /// Create a client. Does not touch the network.
    pub fn new(credentials: SalesforceCredentials, options: SalesforceOptions) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| NeboError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            options,
            session: OnceCell::new(),
        })
    }

    /// Run a SOQL query and decode the first page of account records.
    #[instrument(skip_all)]
    pub async fn query(&self, soql: &str) -> Result<Vec<AccountRecord>> {
        let session = self.session().await?;
        let url = format!(
            "{}/services/data/v{}/query",
            session.instance_url, self.options.api_version
        );

        debug!(%soql, "running SOQL query");

        let response = self
            .http
            .get(&url)
            .query(&[("q", soql)])
            .bearer_auth(&session.session_id)
            .send()
            .await
            .map_err(|e| NeboError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NeboError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(NeboError::upstream(api_error_message(status, &body)));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| NeboError::upstream(format!("unexpected query response: {e}")))?;

        if !parsed.done {
            warn!(
                total = parsed.total_size,
                returned = parsed.records.len(),
                "query has more pages, only the first is used"
            );
        }

        let records = decode_records(parsed.records)?;
        info!(records = records.len(), "salesforce query complete");
        Ok(records)
    }

    /// The shared session, logging in if no query has succeeded in doing so yet.
    ///
    /// Concurrent callers wait on the same login; a failed login leaves the
    /// cell empty so the next call tries again.
    async fn session(&self) -> Result<&Session> {
        self.session.get_or_try_init(|| self.login()).await
    }

    #[instrument(skip_all, fields(user = %self.credentials.username))]
    async fn login(&self) -> Result<Session> {
        let url = format!(
            "{}/services/Soap/u/{}",
            self.credentials.login_url.trim_end_matches('/'),
            self.options.api_version
        );

        info!("logging in to salesforce");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=UTF-8")
            .header("SOAPAction", "login")
            .body(login_envelope(&self.credentials))
            .send()
            .await
            .map_err(|e| NeboError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NeboError::Network(format!("{url}: failed to read body: {e}")))?;

        if let Some(fault) = xml_element(&body, "faultstring") {
            return Err(NeboError::Auth(fault));
        }
        if !status.is_success() {
            return Err(NeboError::Auth(format!("login failed: HTTP {status}")));
        }

        let session_id = xml_element(&body, "sessionId")
            .ok_or_else(|| NeboError::Auth("login response has no sessionId".into()))?;
        let server_url = xml_element(&body, "serverUrl")
            .ok_or_else(|| NeboError::Auth("login response has no serverUrl".into()))?;
        let instance_url = origin_url(&server_url)?;

        info!(%instance_url, "salesforce session established");

        Ok(Session {
            instance_url,
            session_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// SOAP body for the partner `login` call.
fn login_envelope(creds: &SalesforceCredentials) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">
  <env:Body>
    <n1:login xmlns:n1="urn:partner.soap.sforce.com">
      <n1:username>{}</n1:username>
      <n1:password>{}{}</n1:password>
    </n1:login>
  </env:Body>
</env:Envelope>"#,
        escape(creds.username.as_str()),
        escape(creds.password.as_str()),
        escape(creds.security_token.as_str()),
    )
}

/// Text of the first `<tag>` element in a SOAP response, ignoring namespace
/// prefixes. Entities are decoded and CDATA sections are kept as-is.
fn xml_element(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if !inside && e.local_name().as_ref() == tag.as_bytes() => {
                inside = true;
            }
            Ok(Event::Text(t)) if inside => text.push_str(&t.unescape().ok()?),
            Ok(Event::CData(c)) if inside => text.push_str(std::str::from_utf8(&c).ok()?),
            Ok(Event::End(e)) if inside && e.local_name().as_ref() == tag.as_bytes() => {
                return Some(text.trim().to_string());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Extract the origin (scheme + host + port) from a URL.
fn origin_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| NeboError::Auth(format!("invalid serverUrl '{raw}': {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| NeboError::Auth(format!("serverUrl has no host: {raw}")))?;

    match url.port() {
        Some(port) => Ok(format!("{}://{host}:{port}", url.scheme())),
        None => Ok(format!("{}://{host}", url.scheme())),
    }
}

/// Error entry in a failed REST response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiError {
    message: String,
    error_code: String,
}

/// Render a REST error body as `CODE: message`, falling back to the raw body.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<Vec<ApiError>>(body) {
        Ok(errors) if !errors.is_empty() => errors
            .iter()
            .map(|e| format!("{}: {}", e.error_code, e.message))
            .collect::<Vec<_>>()
            .join("; "),
        _ => format!("HTTP {status}: {}", body.trim()),
    }
}
