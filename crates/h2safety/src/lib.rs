//! H2Safety core library
//!
//! Projects, threads and the AI-assisted generators around them.
//!
//! # Features
//! - Typed document store adapter (MongoDB or in-process memory)
//! - Session based auth gate for project/thread/report ownership
//! - Message append service with atomic array upsert
//! - RAG query proxy and thread chat orchestration
//! - Insight, single-step and multistep report generators over an LLM
//! - DOCX and PDF report export

pub mod db;
pub mod error;
pub mod export;
pub mod llm;
pub mod models;
pub mod rag;
pub mod routes;
pub mod security;
pub mod services;
pub mod store;

pub use db::MongoDb;
pub use error::{H2Error, H2Result};
pub use store::Store;

/// Authenticated user ID from auth middleware
#[derive(Clone, Debug)]
pub struct AuthenticatedUserId(pub String);

impl AuthenticatedUserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
