//! Core types and traits for the bizsearch business search gateway
//!
//! This crate provides the foundational abstractions used throughout the
//! bizsearch system, including:
//!
//! - **Query compilation**: turning a user query and city filter into a scored request
//! - **Business records**: the projected shapes returned to API callers
//! - **Traits**: the search gateway interface
//! - **Configuration**: System configuration management
//! - **Error handling**: Unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod business;
pub mod config;
pub mod error;
pub mod query_compiler;
pub mod search_api;

// Re-export main types for convenience
pub use business::{BusinessDocument, ReviewRecord, REVIEWS_FIELD, SEARCH_PROJECTION};
pub use config::{Config, EngineConfig, ServerConfig};
pub use error::{Error, Result};
pub use query_compiler::{compile, RetrievalRequest, RESULT_CAP};
pub use search_api::SearchApi;

