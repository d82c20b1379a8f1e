//! Application state for the compile server

use std::fs;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::config::CloakConfig;
use crate::error::{Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: CloakConfig,
    /// Driver for the external compiler
    compiler: Compiler,
}

impl AppState {
    /// Create new application state.
    ///
    /// Ensures the working directory exists; everything else is
    /// per-request.
    pub fn new(config: CloakConfig) -> Result<Self> {
        fs::create_dir_all(&config.compiler.work_dir).map_err(|e| {
            Error::Config(format!(
                "Cannot create working directory {}: {}",
                config.compiler.work_dir.display(),
                e
            ))
        })?;
        tracing::info!(
            "Working directory: {}",
            config.compiler.work_dir.display()
        );

        let compiler = Compiler::new(config.compiler.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner { config, compiler }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &CloakConfig {
        &self.inner.config
    }

    /// Get the compiler driver
    pub fn compiler(&self) -> &Compiler {
        &self.inner.compiler
    }

    /// Check whether the service can take compile requests
    pub fn is_ready(&self) -> bool {
        let dir = &self.inner.config.compiler.work_dir;
        fs::metadata(dir)
            .map(|m| m.is_dir() && !m.permissions().readonly())
            .unwrap_or(false)
    }
}
