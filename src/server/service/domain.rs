//! Lookups that locate the tenant owning a hostname, an email, or a seller account.
//!
//! Ownership is never stored here. Every lookup probes all tenants through the
//! fan-out dispatcher and takes the first match in scheduling order.

use std::sync::Arc;

use serde_json::Value;
use url::form_urlencoded;

use crate::server::{
    error::config::ConfigError,
    model::tenant::TenantMatch,
    service::{backend::PROBE_TIMEOUT, dispatch::FanOutDispatcher},
    util::host::{is_reserved, normalize_host},
};

#[derive(Clone)]
pub struct DomainResolver {
    dispatcher: FanOutDispatcher,
    /// Platform hosts that never belong to a tenant.
    reserved: Arc<Vec<String>>,
}

impl DomainResolver {
    pub fn new(dispatcher: FanOutDispatcher, reserved: Vec<String>) -> Self {
        Self {
            dispatcher,
            reserved: Arc::new(reserved),
        }
    }

    /// Whether `host` is one of the platform's own domains.
    pub fn is_reserved(&self, host: &str) -> bool {
        is_reserved(host, &self.reserved)
    }

    /// Finds the tenant whose storefront is served on `host`.
    ///
    /// Asks every tenant for its `/api/domain` and compares the `domain` field
    /// case-insensitively. Reserved platform hosts are never resolved.
    ///
    /// # Arguments
    /// - `host` - `Host` or `Origin` header value, with or without scheme
    ///
    /// # Returns
    /// - `Ok(Some(TenantMatch))` - The first tenant claiming the domain
    /// - `Ok(None)` - Reserved host, empty host, or no tenant claims it
    /// - `Err(ConfigError::Unavailable)` - The ports file could not be loaded
    pub async fn resolve_domain(&self, host: &str) -> Result<Option<TenantMatch>, ConfigError> {
        let host = normalize_host(host);
        if host.is_empty() || self.is_reserved(&host) {
            return Ok(None);
        }

        self.dispatcher
            .dispatch_first_match("/api/domain", PROBE_TIMEOUT, move |data| {
                field_eq_ignore_case(data, "domain", &host, normalize_host)
            })
            .await
    }

    /// Finds the tenant whose billing email is `email`, compared case-insensitively.
    pub async fn resolve_by_email(&self, email: &str) -> Result<Option<TenantMatch>, ConfigError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(None);
        }

        self.dispatcher
            .dispatch_first_match("/get/email", PROBE_TIMEOUT, move |data| {
                field_eq_ignore_case(data, "email", &email, |value| value.trim().to_lowercase())
            })
            .await
    }

    /// Whether the Discord user is a seller on at least one tenant.
    pub async fn is_seller(&self, discord_id: &str) -> Result<bool, ConfigError> {
        let endpoint = format!(
            "/seller/get/accounts?user_id={}",
            form_urlencoded::byte_serialize(discord_id.as_bytes()).collect::<String>()
        );

        let found = self
            .dispatcher
            .dispatch_first_match(&endpoint, PROBE_TIMEOUT, |data| {
                data.get("seller").and_then(Value::as_bool) == Some(true)
            })
            .await?;

        Ok(found.is_some())
    }
}

fn field_eq_ignore_case(
    data: &Value,
    field: &str,
    expected: &str,
    normalize: impl Fn(&str) -> String,
) -> bool {
    data.get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| normalize(value) == expected)
}
