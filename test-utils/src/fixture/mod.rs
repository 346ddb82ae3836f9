//! Canned payloads for Discord and tenant services.
//!
//! Fixtures only build values; pair them with `MockResponse::json` to serve them
//! from a mock tenant.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::{fixture, mock::{MockResponse, MockService}};
//!
//! let service = MockService::new()
//!     .get("/bot/owner", MockResponse::json(fixture::tenant::owner("42")));
//! ```

pub mod discord;
pub mod tenant;
