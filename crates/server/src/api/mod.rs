//! API service layer for search operations
//!
//! This module contains the business logic behind the REST routes,
//! providing a clean interface for the REST API server.

mod gateway;
pub mod models;

pub use gateway::SearchGateway;
pub use models::*;
