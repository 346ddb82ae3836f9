//! Calls to the tenant services, the storefront renderer, and Discord.

pub mod backend;
pub mod dispatch;
pub mod domain;
pub mod oauth;
pub mod proxy;
pub mod tenant;

#[cfg(test)]
mod test;
