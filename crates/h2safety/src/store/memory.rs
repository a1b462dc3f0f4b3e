//! In-process document backend

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{ArrayAppend, DocumentBackend};
use crate::error::{H2Error, H2Result};

type Collection = BTreeMap<String, Map<String, Value>>;

/// Memory backend used for tests and `DATABASE_TYPE=memory`
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

fn into_object(doc: Value) -> H2Result<Map<String, Value>> {
    match doc {
        Value::Object(map) => Ok(map),
        other => Err(H2Error::Validation(format!(
            "Documents must be JSON objects, got {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> H2Result<()> {
        let doc = into_object(doc)?;
        let mut guard = self.collections.write().await;
        let coll = guard.entry(collection.to_string()).or_default();
        if coll.contains_key(id) {
            return Err(H2Error::Database(format!(
                "Duplicate id {} in {}",
                id, collection
            )));
        }
        coll.insert(id.to_string(), doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> H2Result<Option<Value>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
            .map(Value::Object))
    }

    async fn find_by(&self, collection: &str, field: &str, value: &str) -> H2Result<Vec<Value>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .map(|c| {
                c.values()
                    .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                    .cloned()
                    .map(Value::Object)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> H2Result<bool> {
        let mut guard = self.collections.write().await;
        let Some(doc) = guard.get_mut(collection).and_then(|c| c.get_mut(id)) else {
            return Ok(false);
        };
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(true)
    }

    async fn append(&self, collection: &str, id: &str, append: ArrayAppend) -> H2Result<()> {
        let mut guard = self.collections.write().await;
        let doc = guard
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert_with(|| {
                let mut doc = Map::new();
                doc.insert("id".to_string(), Value::String(id.to_string()));
                doc
            });

        // Same contract as `$push`: a present non-array field is an error
        match doc.get_mut(&append.field) {
            Some(Value::Array(items)) => items.push(append.value),
            Some(_) => {
                return Err(H2Error::Database(format!(
                    "The field '{}' must be an array",
                    append.field
                )));
            }
            None => {
                doc.insert(append.field.clone(), Value::Array(vec![append.value]));
            }
        }
        if let Some(counter) = append.counter {
            let current = doc.get(&counter).and_then(Value::as_u64).unwrap_or(0);
            doc.insert(counter, Value::from(current + 1));
        }
        for (key, value) in append.set {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> H2Result<bool> {
        let mut guard = self.collections.write().await;
        Ok(guard
            .get_mut(collection)
            .map(|c| c.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn ping(&self) -> H2Result<()> {
        Ok(())
    }
}
