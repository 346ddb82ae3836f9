//! Listing Gateway Test Utils
//!
//! Shared testing utilities for the gateway. Tests describe a tenant deployment with
//! `TestBuilder`: bots backed by mock HTTP services, bots whose port refuses
//! connections, bots with no port at all, plus the approved domains file. The builder
//! writes every fixture file into a temporary directory and returns a `TestContext`
//! pointing at it.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring a deployment
//! - **TestContext**: Fixture paths, registered ports and running mock services
//! - **MockService**: Canned `(method, path)` routes with request recording
//! - **fixture**: Discord and tenant payloads
//! - **TestError**: Errors that can occur during setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, fixture, mock::{MockResponse, MockService}};
//!
//! #[tokio::test]
//! async fn resolves_domain() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_tenant(
//!             "alpha",
//!             MockService::new().get("/api/domain", MockResponse::json(fixture::tenant::domain("shop.example.com"))),
//!         )
//!         .build()
//!         .await?;
//!
//!     let port = test.port("alpha");
//!     // Point the component under test at test.ports_file...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod fixture;
pub mod mock;
