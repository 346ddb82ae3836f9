//! Shared state read from the filesystem and held in memory.
//!
//! This module contains the caches the gateway consults on almost every request: the
//! tenant port registry, the bot directory listing, the approved custom domains, and
//! the session table. File-backed caches are TTL based and never write back.

pub mod bot;
pub mod domain;
pub mod port;
pub mod session;

#[cfg(test)]
mod test;
