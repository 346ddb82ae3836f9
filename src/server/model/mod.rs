//! Server-side domain models and parameter types.
//!
//! This module contains domain models used throughout the service layer. They are
//! produced by the data and service layers and transformed to DTOs at the controller
//! boundary.

pub mod bot;
pub mod dispatch;
pub mod seller;
pub mod session;
pub mod tenant;
