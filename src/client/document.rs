//! Request and response types for the merge service.

use crate::client::disposition::{extract_filename, suggested_filename};
use crate::error::{DocMergeError, Result};
use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Body of `POST /merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Source document locators, in merge order.
    pub urls: Vec<String>,
    /// Optional name for the merged document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// JSON error body sent by the merge service on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceError {
    pub error: Option<serde_json::Value>,
}

/// A PDF fully received from the merge service.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    /// PDF bytes.
    pub data: Bytes,
    /// Filename suggested by the service, if any.
    pub filename: Option<String>,
    /// Response headers as received.
    pub headers: HeaderMap,
}

impl PdfDocument {
    pub(crate) fn new(data: Bytes, headers: HeaderMap) -> Self {
        let filename = extract_filename(&render_headers(&headers));
        Self {
            data,
            filename,
            headers,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Response headers rendered as `name: value` lines.
    pub fn raw_headers(&self) -> String {
        render_headers(&self.headers)
    }

    /// Filename to present for this document.
    pub fn suggested_filename(&self, requested: Option<&str>) -> String {
        suggested_filename(self.filename.as_deref(), requested)
    }
}

/// A successful response whose body has not been read yet.
///
/// The body is pulled from the connection only as the caller consumes it, so
/// large PDFs can be relayed without being held in memory.
#[derive(Debug)]
pub struct PdfStream {
    /// Filename suggested by the service, if any.
    pub filename: Option<String>,
    /// Body length announced by the service.
    pub content_length: Option<u64>,
    /// Response headers as received.
    pub headers: HeaderMap,
    response: reqwest::Response,
}

impl PdfStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        let headers = response.headers().clone();
        let filename = extract_filename(&render_headers(&headers));
        Self {
            filename,
            content_length: response.content_length(),
            headers,
            response,
        }
    }

    /// Filename to present for this document.
    pub fn suggested_filename(&self, requested: Option<&str>) -> String {
        suggested_filename(self.filename.as_deref(), requested)
    }

    /// Consumes the handle and yields the body chunk by chunk.
    pub fn bytes_stream(self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        self.response
            .bytes_stream()
            .map_err(DocMergeError::transport)
    }

    /// Copies the body into `writer`, returning the number of bytes written.
    pub async fn pipe_to<W>(self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0u64;
        let mut body = Box::pin(self.bytes_stream());

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        writer.flush().await?;
        Ok(written)
    }
}

/// Outcome of a download: the PDF was fetched and written to `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedDocument {
    /// Where the PDF was written.
    pub path: PathBuf,
    /// Filename suggested by the service, if any.
    pub filename: Option<String>,
    /// Bytes written.
    pub size: usize,
}

/// Renders headers as `name: value\r\n` lines.
///
/// Values are decoded as UTF-8; invalid sequences become U+FFFD.
pub fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            format!(
                "{}: {}\r\n",
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes())
            )
        })
        .collect()
}
