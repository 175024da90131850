//! JobBank Member API - Member CRUD service with paginated listings
//!
//! REST API built on Axum with a clean architecture layout: handlers stay
//! thin, business rules live in services, and persistence sits behind a
//! repository trait.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities
//! - **services**: Application use cases and business rules
//! - **infra**: Infrastructure concerns (database, Redis page cache)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized failure taxonomy
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::Member;
pub use errors::{ApiResult, Failure, FailureCode};
pub use infra::Cache;
