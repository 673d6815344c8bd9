//! HTTP Client module for docmerge.
//!
//! This module provides the client for the remote PDF-merge service and the
//! types it returns.

pub mod api;
pub mod disposition;
pub mod document;


pub use api::{MergeClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use disposition::{extract_filename, suggested_filename, DEFAULT_FILENAME};
pub use document::{MergeRequest, PdfDocument, PdfStream, SavedDocument};
