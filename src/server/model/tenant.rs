/// A tenant located by a first-match lookup, with the port it answered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantMatch {
    pub tenant_id: String,
    pub port: u16,
}

/// A tenant scheduled for a fan-out call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantTarget {
    pub tenant_id: String,
    pub port: u16,
}

impl From<TenantTarget> for TenantMatch {
    fn from(target: TenantTarget) -> Self {
        Self {
            tenant_id: target.tenant_id,
            port: target.port,
        }
    }
}
