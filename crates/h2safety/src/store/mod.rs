//! Document store adapter
//!
//! `DocumentBackend` is the schemaless seam (JSON documents keyed by string
//! id). `Store` layers typed accessors on top of it and validates every
//! document against its schema on the way out.

mod memory;
mod mongo;

pub use memory::MemoryBackend;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::db::collections;
use crate::error::{H2Error, H2Result};
use crate::models::{Insight, Message, Project, Report, Session, Signup, Thread, User};

/// Atomic append of one element to an array field.
///
/// Creates the document (and the array) when missing, increments
/// `counter` by one and applies `set` in the same write.
#[derive(Debug, Clone)]
pub struct ArrayAppend {
    pub field: String,
    pub value: Value,
    pub counter: Option<String>,
    pub set: Map<String, Value>,
}

/// Schemaless document persistence
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> H2Result<()>;

    async fn get(&self, collection: &str, id: &str) -> H2Result<Option<Value>>;

    /// All documents whose string `field` equals `value`
    async fn find_by(&self, collection: &str, field: &str, value: &str) -> H2Result<Vec<Value>>;

    /// Set top-level fields; returns false when the document does not exist
    async fn set_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> H2Result<bool>;

    async fn append(&self, collection: &str, id: &str, append: ArrayAppend) -> H2Result<()>;

    async fn delete(&self, collection: &str, id: &str) -> H2Result<bool>;

    async fn ping(&self) -> H2Result<()>;
}

/// A typed document living in one collection
pub trait StoredDocument: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Human readable name used in not-found errors
    const KIND: &'static str;

    fn id(&self) -> &str;
}

macro_rules! stored_document {
    ($ty:ty, $collection:expr, $kind:literal) => {
        impl StoredDocument for $ty {
            const COLLECTION: &'static str = $collection;
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

stored_document!(Project, collections::PROJECTS, "Project");
stored_document!(Thread, collections::THREADS, "Thread");
stored_document!(Message, collections::MESSAGES, "Message");
stored_document!(Report, collections::REPORTS, "Report");
stored_document!(Insight, collections::INSIGHTS, "Insight");
stored_document!(Signup, collections::SIGNUP, "Signup");
stored_document!(User, collections::USERS, "User");
stored_document!(Session, collections::SESSIONS, "Session");

/// Typed accessors over a document backend. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn DocumentBackend>,
}

impl Store {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by the in-process memory backend
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }

    pub async fn ping(&self) -> H2Result<()> {
        self.backend.ping().await
    }

    pub async fn insert<T: StoredDocument>(&self, doc: &T) -> H2Result<()> {
        let value = serde_json::to_value(doc)?;
        self.backend.insert(T::COLLECTION, doc.id(), value).await
    }

    pub async fn get<T: StoredDocument>(&self, id: &str) -> H2Result<Option<T>> {
        match self.backend.get(T::COLLECTION, id).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Like `get`, but a missing document is a `NotFound` error
    pub async fn require<T: StoredDocument>(&self, id: &str) -> H2Result<T> {
        self.get(id).await?.ok_or_else(|| H2Error::not_found(T::KIND))
    }

    pub async fn find_by<T: StoredDocument>(&self, field: &str, value: &str) -> H2Result<Vec<T>> {
        self.backend
            .find_by(T::COLLECTION, field, value)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Overwrite every field of an existing document; false if it is gone
    pub async fn replace<T: StoredDocument>(&self, doc: &T) -> H2Result<bool> {
        let fields = match serde_json::to_value(doc)? {
            Value::Object(map) => map,
            _ => {
                return Err(H2Error::Serialization(format!(
                    "{} did not serialize to an object",
                    T::KIND
                )))
            }
        };
        self.backend.set_fields(T::COLLECTION, doc.id(), fields).await
    }

    pub async fn set_fields<T: StoredDocument>(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> H2Result<bool> {
        self.backend.set_fields(T::COLLECTION, id, fields).await
    }

    pub async fn delete<T: StoredDocument>(&self, id: &str) -> H2Result<bool> {
        self.backend.delete(T::COLLECTION, id).await
    }

    /// Append a message to a thread's embedded log in one atomic upsert
    pub async fn append_thread_message(&self, thread_id: &str, message: &Message) -> H2Result<()> {
        let mut set = Map::new();
        set.insert(
            "lastModified".to_string(),
            serde_json::to_value(chrono::Utc::now())?,
        );
        let append = ArrayAppend {
            field: "messages".to_string(),
            value: serde_json::to_value(message)?,
            counter: Some("messageCount".to_string()),
            set,
        };
        self.backend
            .append(collections::THREADS, thread_id, append)
            .await
    }
}

fn decode<T: StoredDocument>(value: Value) -> H2Result<T> {
    serde_json::from_value(value)
        .map_err(|e| H2Error::Validation(format!("Malformed {} document: {}", T::KIND, e)))
}
