//! cloakcc: HTTP compile service with obfuscating transforms
//!
//! This crate exposes a small HTTP server that accepts a C/C++ source upload,
//! runs it through an external obfuscating compiler with a caller-selected
//! transform pass, and returns the produced binary as an attachment. The
//! compiler itself is an opaque external executable; this service only
//! validates, stages, invokes, and cleans up.

pub mod compiler;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod server;

pub use compiler::{Compiler, TransformOption};
pub use config::CloakConfig;
pub use error::{Error, Result};
pub use server::CloakServer;
