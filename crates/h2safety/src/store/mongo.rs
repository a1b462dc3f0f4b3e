//! MongoDB document backend

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::UpdateOptions;
use serde_json::{Map, Value};

use super::{ArrayAppend, DocumentBackend};
use crate::db::MongoDb;
use crate::error::{H2Error, H2Result};

fn to_document(value: &Value) -> H2Result<Document> {
    Ok(bson::to_document(value)?)
}

/// Convert a stored document back to JSON, dropping the Mongo `_id`
fn to_value(mut doc: Document) -> Value {
    doc.remove("_id");
    Bson::Document(doc).into_relaxed_extjson()
}

#[async_trait]
impl DocumentBackend for MongoDb {
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> H2Result<()> {
        let mut document = to_document(&doc)?;
        document.insert("_id", id);
        self.collection::<Document>(collection)
            .insert_one(document, None)
            .await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> H2Result<Option<Value>> {
        Ok(self
            .collection::<Document>(collection)
            .find_one(doc! { "_id": id }, None)
            .await?
            .map(to_value))
    }

    async fn find_by(&self, collection: &str, field: &str, value: &str) -> H2Result<Vec<Value>> {
        let mut filter = Document::new();
        filter.insert(field, value);
        let cursor = self
            .collection::<Document>(collection)
            .find(filter, None)
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(to_value).collect())
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> H2Result<bool> {
        let set = to_document(&Value::Object(fields))?;
        let result = self
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn append(&self, collection: &str, id: &str, append: ArrayAppend) -> H2Result<()> {
        let mut push = Document::new();
        push.insert(append.field.as_str(), bson::to_bson(&append.value)?);
        let mut update = doc! {
            "$push": push,
            "$setOnInsert": { "id": id },
        };
        if let Some(counter) = append.counter.as_deref() {
            let mut inc = Document::new();
            inc.insert(counter, 1_i64);
            update.insert("$inc", inc);
        }
        if !append.set.is_empty() {
            update.insert("$set", to_document(&Value::Object(append.set))?);
        }

        let options = UpdateOptions::builder().upsert(true).build();
        self.collection::<Document>(collection)
            .update_one(doc! { "_id": id }, update, options)
            .await
            .map_err(|e| H2Error::Database(format!("Failed to append to {}: {}", collection, e)))?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> H2Result<bool> {
        let result = self
            .collection::<Document>(collection)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> H2Result<()> {
        MongoDb::ping(self)
            .await
            .map_err(|e| H2Error::Database(e.to_string()))
    }
}
