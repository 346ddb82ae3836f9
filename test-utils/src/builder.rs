use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::{
    context::TestContext,
    error::TestError,
    mock::{dead_port, MockService},
};

/// How a configured tenant behaves once the context is built.
enum TenantKind {
    /// A running mock service.
    Live(MockService),
    /// A port is registered but nothing listens on it.
    Dead,
    /// A bot directory exists but no port is registered.
    Unported,
}

/// Builder for test environments mirroring a tenant deployment.
///
/// Writes the ports file, the bots directory and the approved domains file into a
/// temporary directory and starts one mock service per live tenant. Tenants are
/// registered in insertion order.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::{builder::TestBuilder, mock::{MockResponse, MockService}};
///
/// let test = TestBuilder::new()
///     .with_tenant("alpha", MockService::new().get("/stats", MockResponse::json(json!({}))))
///     .with_dead_tenant("beta")
///     .with_approved_domains(&["shop.example.com"])
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    tenants: Vec<(String, TenantKind)>,
    renderer: Option<MockService>,
    approved_domains: Option<Value>,
    raw_files: Vec<(String, String)>,
    write_ports: bool,
}

impl TestBuilder {
    /// Creates a builder with no tenants, no renderer and no approved domains file.
    pub fn new() -> Self {
        Self {
            tenants: Vec::new(),
            renderer: None,
            approved_domains: None,
            raw_files: Vec::new(),
            write_ports: true,
        }
    }

    /// Adds a tenant backed by a running mock service.
    ///
    /// # Arguments
    /// - `name` - Bot name, used as directory name and ports key
    /// - `service` - Routes the tenant answers
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_tenant(mut self, name: &str, service: MockService) -> Self {
        self.tenants
            .push((name.to_string(), TenantKind::Live(service)));
        self
    }

    /// Adds a tenant whose registered port refuses connections.
    pub fn with_dead_tenant(mut self, name: &str) -> Self {
        self.tenants.push((name.to_string(), TenantKind::Dead));
        self
    }

    /// Adds a bot directory that has no entry in the ports file.
    pub fn with_unported_bot(mut self, name: &str) -> Self {
        self.tenants.push((name.to_string(), TenantKind::Unported));
        self
    }

    /// Starts a mock storefront renderer alongside the tenants.
    pub fn with_renderer(mut self, service: MockService) -> Self {
        self.renderer = Some(service);
        self
    }

    /// Writes `custom_domains.json` as a JSON list of `domains`.
    pub fn with_approved_domains(mut self, domains: &[&str]) -> Self {
        self.approved_domains = Some(Value::from(
            domains.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        ));
        self
    }

    /// Writes an arbitrary file relative to the fixture root, e.g. a corrupt
    /// `ports.json` or a static asset. Written after every generated file.
    pub fn with_raw_file(mut self, relative_path: &str, contents: &str) -> Self {
        self.raw_files
            .push((relative_path.to_string(), contents.to_string()));
        self
    }

    /// Skips writing the ports file entirely.
    pub fn without_ports_file(mut self) -> Self {
        self.write_ports = false;
        self
    }

    /// Creates the fixture directory and starts every mock service.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Environment ready for use
    /// - `Err(TestError::Io)` - Failed to write a fixture file or bind a listener
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new()?;
        let mut ports = BTreeMap::new();
        let mut services = HashMap::new();

        for (name, kind) in self.tenants {
            tokio::fs::create_dir_all(context.bots_dir.join(&name)).await?;

            match kind {
                TenantKind::Live(service) => {
                    let running = service.spawn().await?;
                    ports.insert(name.clone(), running.port);
                    services.insert(name, running);
                }
                TenantKind::Dead => {
                    ports.insert(name, dead_port().await?);
                }
                TenantKind::Unported => {}
            }
        }

        if self.write_ports {
            tokio::fs::write(&context.ports_file, serde_json::to_vec_pretty(&ports)?).await?;
        }

        if let Some(domains) = self.approved_domains {
            tokio::fs::write(&context.domains_file, serde_json::to_vec(&domains)?).await?;
        }

        if let Some(renderer) = self.renderer {
            context.renderer = Some(renderer.spawn().await?);
        }

        for (relative_path, contents) in self.raw_files {
            let path = context.root().join(relative_path);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, contents).await?;
        }

        context.ports = ports.into_iter().collect();
        context.services = services;

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
