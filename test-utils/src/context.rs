use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{error::TestError, mock::RunningService};

/// Test environment created by `TestBuilder`.
///
/// Owns the temporary fixture directory and every mock service; both are torn down
/// when the context is dropped.
pub struct TestContext {
    dir: TempDir,

    /// Location of the generated `ports.json`.
    pub ports_file: PathBuf,
    /// Directory holding one sub-directory per bot.
    pub bots_dir: PathBuf,
    /// Location of `custom_domains.json`; absent unless approved domains were configured.
    pub domains_file: PathBuf,
    /// Directory for locally served static files.
    pub static_dir: PathBuf,

    /// Registered `bot -> port` mapping, dead tenants included.
    pub ports: HashMap<String, u16>,
    /// Running mock services keyed by bot name.
    pub services: HashMap<String, RunningService>,
    /// Mock storefront renderer, if one was configured.
    pub renderer: Option<RunningService>,
}

impl TestContext {
    /// Creates an empty fixture directory layout.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with the bots and static directories created
    /// - `Err(TestError::Io)` - Failed to create the temporary directory
    pub fn new() -> Result<Self, TestError> {
        let dir = tempfile::tempdir()?;

        let bots_dir = dir.path().join("bots");
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&bots_dir)?;
        std::fs::create_dir_all(&static_dir)?;

        Ok(Self {
            ports_file: dir.path().join("ports.json"),
            domains_file: dir.path().join("custom_domains.json"),
            bots_dir,
            static_dir,
            dir,
            ports: HashMap::new(),
            services: HashMap::new(),
            renderer: None,
        })
    }

    /// Root of the fixture directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Port registered for `bot`.
    pub fn port(&self, bot: &str) -> Option<u16> {
        self.ports.get(bot).copied()
    }

    /// Mock service of `bot`.
    pub fn service(&self, bot: &str) -> Option<&RunningService> {
        self.services.get(bot)
    }

    /// Port of the mock storefront renderer.
    pub fn renderer_port(&self) -> Option<u16> {
        self.renderer.as_ref().map(|renderer| renderer.port)
    }
}
