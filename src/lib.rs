//! docmerge - Client for a remote PDF-merge service
//!
//! This crate wraps the HTTP API of a PDF-merge service: it builds merge and
//! report requests, sends them, and maps responses into PDF bytes or a
//! structured [`DocMergeError`].
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`client`] - The merge service client and its result types
//! - [`config`] - Configuration file parsing and validation
//! - [`error`] - Error types and error handling
//! - [`relay`] - HTTP relay that forwards merged PDFs to end users

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod relay;

// Re-exports for convenience
pub use cli::Cli;
pub use client::{MergeClient, PdfDocument, PdfStream, SavedDocument};
pub use config::Config;
pub use error::{DocMergeError, ErrorCode, Result};
pub use relay::serve;
