//! Merge service HTTP client.
//!
//! This module provides the client for the remote PDF-merge service.

use crate::client::document::{MergeRequest, PdfDocument, PdfStream, SavedDocument, ServiceError};
use crate::config::ClientSettings;
use crate::error::{DocMergeError, Result};
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default base URL of the merge service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8585";

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the merge service.
///
/// Configuration setters take `&mut self`; a client that is being used for
/// a request cannot be reconfigured until that request completes.
#[derive(Debug, Clone)]
pub struct MergeClient {
    /// HTTP client.
    client: Client,
    /// Base URL of the merge service, without trailing slash.
    base_url: String,
    /// Per-request timeout.
    timeout: Duration,
    /// Extra `Name: value` header lines, sent in insertion order.
    headers: Vec<String>,
}

impl MergeClient {
    /// Creates a new client for the specified service URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the service (e.g., "http://localhost:8585")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with custom timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().build().map_err(DocMergeError::transport)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            headers: Vec::new(),
        })
    }

    /// Creates a client from configuration.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let mut client = Self::with_timeout(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )?;
        for header in &settings.headers {
            client.add_header(header.clone());
        }
        Ok(client)
    }

    /// Base URL of the merge service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Extra header lines added with [`MergeClient::add_header`].
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Sets the per-request timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Adds a header line (e.g., "Authorization: Bearer token") to every request.
    ///
    /// The line is not validated here; a line that does not parse as a header
    /// is skipped when requests are built.
    pub fn add_header(&mut self, header: impl Into<String>) {
        self.headers.push(header.into());
    }

    /// Merges the PDFs at `urls` into a single document.
    ///
    /// # Arguments
    /// * `urls` - Source document locators, in merge order
    /// * `name` - Optional name for the merged PDF
    pub async fn merge_documents(
        &self,
        urls: &[String],
        name: Option<&str>,
    ) -> Result<PdfDocument> {
        let response = self.send_merge(urls, name).await?;
        Self::read_document(response).await
    }

    /// Like [`MergeClient::merge_documents`], but leaves the body unread.
    pub async fn merge_documents_stream(
        &self,
        urls: &[String],
        name: Option<&str>,
    ) -> Result<PdfStream> {
        let response = self.send_merge(urls, name).await?;
        Ok(PdfStream::new(response))
    }

    /// Fetches the PDF for a stored report.
    ///
    /// # Arguments
    /// * `report_id` - The report identifier
    pub async fn generate_report(&self, report_id: &str) -> Result<PdfDocument> {
        let response = self.send_report(report_id).await?;
        Self::read_document(response).await
    }

    /// Like [`MergeClient::generate_report`], but leaves the body unread.
    pub async fn generate_report_stream(&self, report_id: &str) -> Result<PdfStream> {
        let response = self.send_report(report_id).await?;
        Ok(PdfStream::new(response))
    }

    /// Writes `data` to `path`, creating missing parent directories.
    pub async fn persist(&self, data: &[u8], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o755);
            builder
                .create(parent)
                .await
                .map_err(|e| DocMergeError::persist(path, e))?;
        }

        tokio::fs::write(path, data)
            .await
            .map_err(|e| DocMergeError::persist(path, e))?;

        debug!(path = %path.display(), size = data.len(), "PDF written");
        Ok(())
    }

    /// Merges the PDFs at `urls` and writes the result to `path`.
    pub async fn download_merged(
        &self,
        urls: &[String],
        path: &Path,
        name: Option<&str>,
    ) -> Result<SavedDocument> {
        let document = self.merge_documents(urls, name).await?;
        self.save(document, path).await
    }

    /// Fetches a report and writes it to `path`.
    pub async fn download_report(&self, report_id: &str, path: &Path) -> Result<SavedDocument> {
        let document = self.generate_report(report_id).await?;
        self.save(document, path).await
    }

    async fn save(&self, document: PdfDocument, path: &Path) -> Result<SavedDocument> {
        self.persist(&document.data, path).await?;

        info!(
            path = %path.display(),
            size = document.size(),
            "PDF saved"
        );

        Ok(SavedDocument {
            path: path.to_path_buf(),
            size: document.size(),
            filename: document.filename,
        })
    }

    async fn send_merge(&self, urls: &[String], name: Option<&str>) -> Result<Response> {
        if urls.is_empty() {
            return Err(DocMergeError::validation("URLs array cannot be empty"));
        }

        let request = MergeRequest {
            urls: urls.to_vec(),
            name: name.map(str::to_string),
        };

        info!(
            url_count = request.urls.len(),
            name = request.name.as_deref().unwrap_or(""),
            "Sending merge request"
        );

        let builder = self.request(Method::POST, self.endpoint(&["merge"])?).json(&request);
        self.execute(builder).await
    }

    async fn send_report(&self, report_id: &str) -> Result<Response> {
        if report_id.is_empty() {
            return Err(DocMergeError::validation("Report ID cannot be empty"));
        }
        if report_id == "." || report_id == ".." {
            return Err(DocMergeError::validation("Report ID cannot be a dot segment"));
        }

        info!(report_id = %report_id, "Requesting report");

        let builder = self.request(Method::GET, self.endpoint(&["report", report_id])?);
        self.execute(builder).await
    }

    /// Appends `segments` to the base URL, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DocMergeError::config_with_source("Invalid base URL", e))?;
        url.path_segments_mut()
            .map_err(|()| DocMergeError::config("Base URL cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Builds a request with the standard and caller-added headers.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "Building request");

        let mut builder = self
            .client
            .request(method, url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/pdf, application/json");

        for line in &self.headers {
            match parse_header_line(line) {
                Some((name, value)) => builder = builder.header(name, value),
                None => warn!(header = %line, "Skipping malformed header line"),
            }
        }

        builder
    }

    /// Sends the request and turns non-2xx answers into errors.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(DocMergeError::transport)?;
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "Merge service answered");
            return Ok(response);
        }

        let body = response.text().await.map_err(DocMergeError::transport)?;
        let message = error_message(&body);

        warn!(status = status.as_u16(), error = %message, "Merge service refused request");
        Err(DocMergeError::upstream(status.as_u16(), message))
    }

    async fn read_document(response: Response) -> Result<PdfDocument> {
        let headers = response.headers().clone();
        let data = response.bytes().await.map_err(DocMergeError::transport)?;
        Ok(PdfDocument::new(data, headers))
    }
}

/// # Panics
///
/// Panics if the TLS backend cannot be initialized, as
/// [`reqwest::Client::new`] does. [`MergeClient::new`] reports that case as
/// an error instead.
impl Default for MergeClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            headers: Vec::new(),
        }
    }
}

/// Extracts the failure message from a non-2xx body.
///
/// A JSON `error` field wins; otherwise the body text is used.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ServiceError>(body) {
        Ok(ServiceError {
            error: Some(serde_json::Value::String(message)),
        }) => message,
        Ok(ServiceError { error: Some(value) }) if !value.is_null() => value.to_string(),
        _ => body.trim_end().to_string(),
    }
}

/// Splits a `Name: value` line into a typed header pair.
fn parse_header_line(line: &str) -> Option<(HeaderName, HeaderValue)> {
    let (name, value) = line.split_once(':')?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).ok()?;
    let value = HeaderValue::from_str(value.trim()).ok()?;
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MergeClient::new("http://localhost:8585").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8585");
        assert_eq!(client.timeout(), Duration::from_secs(60));
        assert!(client.headers().is_empty());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = MergeClient::new("http://merge.local:8585/").unwrap();
        assert_eq!(client.base_url(), "http://merge.local:8585");
    }

    #[test]
    fn test_default_client() {
        let client = MergeClient::default();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_setters() {
        let mut client = MergeClient::default();
        client.set_timeout(Duration::from_secs(5));
        client.add_header("Authorization: Bearer abc");
        client.add_header("not a header");

        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(client.headers(), ["Authorization: Bearer abc", "not a header"]);
    }

    #[test]
    fn test_from_settings() {
        let settings = ClientSettings {
            base_url: "https://merge.example.com/".to_string(),
            timeout_seconds: 15,
            headers: vec!["X-Api-Key: k".to_string()],
        };
        let client = MergeClient::from_settings(&settings).unwrap();

        assert_eq!(client.base_url(), "https://merge.example.com");
        assert_eq!(client.timeout(), Duration::from_secs(15));
        assert_eq!(client.headers(), ["X-Api-Key: k"]);
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = MergeClient::new("http://merge.local:8585/api/").unwrap();

        let url = client.endpoint(&["report", "a?x=1"]).unwrap();
        assert_eq!(url.as_str(), "http://merge.local:8585/api/report/a%3Fx=1");

        let url = client.endpoint(&["report", "../merge"]).unwrap();
        assert_eq!(url.path(), "/api/report/..%2Fmerge");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base_url() {
        let client = MergeClient::new("not a url").unwrap();
        let err = client.endpoint(&["merge"]).unwrap_err();
        assert!(matches!(err, DocMergeError::Config { .. }));
    }

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(error_message(r#"{"error":"bad input"}"#), "bad input");
        assert_eq!(error_message(r#"{"error":{"code":7}}"#), r#"{"code":7}"#);
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("oops"), "oops");
        assert_eq!(error_message("Merge failed: timeout\n"), "Merge failed: timeout");
        assert_eq!(error_message(r#"{"message":"x"}"#), r#"{"message":"x"}"#);
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn test_parse_header_line() {
        let (name, value) = parse_header_line("Authorization: Bearer abc").unwrap();
        assert_eq!(name.as_str(), "authorization");
        assert_eq!(value.to_str().unwrap(), "Bearer abc");

        assert!(parse_header_line("no colon here").is_none());
        assert!(parse_header_line("bad name: x").is_none());
    }
}
