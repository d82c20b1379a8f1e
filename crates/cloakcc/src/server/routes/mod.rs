//! Routes for the compile server

pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build the service routes
pub fn routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Compile - with body limit for the source upload
        .route(
            "/upload",
            post(upload::compile_upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Info
        .route("/api/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "cloakcc",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Compile C/C++ sources with obfuscation transforms",
        "endpoints": {
            "POST /upload": "Upload a source file and compile it (fields: file, option)",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check",
            "GET /api/info": "This document"
        },
        "options": {
            "fla": "Control-flow flattening",
            "bcf": "Bogus control flow",
            "sub": "Instruction substitution",
            "sobf": "String obfuscation",
            "vrobf": "Variable rotation"
        }
    }))
}
