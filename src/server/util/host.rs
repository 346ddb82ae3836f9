/// Normalizes a `Host` or `Origin` header value into a bare lower-cased host.
///
/// Strips the `http://`/`https://` scheme and any trailing slash. The port, when
/// present, is kept since tenants register custom domains as they are typed in the
/// browser bar.
pub fn normalize_host(value: &str) -> String {
    let value = value.trim();
    let value = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);

    value.trim_end_matches('/').to_lowercase()
}

/// Whether `host` is one of the platform's own domains.
pub fn is_reserved(host: &str, reserved: &[String]) -> bool {
    let host = normalize_host(host);
    reserved.iter().any(|domain| *domain == host)
}
