//! Configuration for the compile service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloakConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Compiler invocation configuration
    pub compiler: CompilerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 1MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            max_upload_size: 1024 * 1024, // 1MB
        }
    }
}

/// Compiler invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Path to the obfuscating compiler executable
    pub binary: PathBuf,
    /// Working directory for per-request scratch space
    pub work_dir: PathBuf,
    /// Timeout for a single compiler invocation in seconds (default: 120)
    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("./clang"),
            work_dir: std::env::temp_dir().join("cloakcc"),
            timeout_secs: 120,
        }
    }
}
