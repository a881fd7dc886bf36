//! Common utilities and shared types for the YouMatter client.
//!
//! This crate provides foundational components used across all client crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Formatting**: Response-time, timestamp and file-size rendering
//! - **URL resolution**: Attachment links against the API origin
//! - **Token store**: File-backed persistence of the session bearer token

pub mod config;
pub mod error;
pub mod format;
pub mod token_store;
pub mod urls;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use format::{format_file_size, format_response_time, format_submitted_at};
pub use token_store::TokenStore;
pub use urls::{api_origin, download_url, to_absolute_url};
