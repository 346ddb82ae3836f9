//! Server-side API backend and business logic.
//!
//! The gateway sits in front of every bot's private HTTP service. It forwards
//! per-bot calls, broadcasts seller calls to every bot, logs users in with Discord,
//! and serves the storefront of every approved custom domain through the shared
//! renderer.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Calls to bots, the storefront renderer, and Discord
//! - **Data Layer** (`data/`) - File-backed caches (ports, bots, approved domains) and the session table
//! - **Model Layer** (`model/`) - Domain models and validated request bodies
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Session cookie handling and authentication guards
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (caches, HTTP clients, services)
//! - **Startup** (`startup`) - Initialization of HTTP and OAuth clients and background jobs
//! - **Router** (`router`) - Axum route configuration and CORS
//! - **Scheduler** (`scheduler/`) - Cron jobs (expired session sweep)
//!
//! # Request Flow
//!
//! 1. **Router** receives the HTTP request and routes it to a controller
//! 2. **Middleware** resolves the session cookie and checks ownership or seller status
//! 3. **Controller** validates the body and calls a service
//! 4. **Service** resolves the bot's port and calls one or every bot
//! 5. **Controller** converts the outcome into a JSON response or an error

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
