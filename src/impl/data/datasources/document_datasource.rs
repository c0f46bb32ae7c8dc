use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Body of a stored document (without its id).
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A schemaless document store organised in named collections, such as a
/// hosted document database.
#[async_trait]
pub trait DocumentDatasource: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ServerError>;

    /// All documents of a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, ServerError>;

    /// Stores a document under a freshly generated id and returns the id.
    async fn add(&self, collection: &str, document: Document) -> Result<String, ServerError>;

    /// Creates or replaces the document with the given id.
    async fn set(&self, collection: &str, id: &str, document: Document)
        -> Result<(), ServerError>;

    /// Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), ServerError>;
}

/// Process-local document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentDatasource {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryDocumentDatasource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentDatasource for MemoryDocumentDatasource {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ServerError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, ServerError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, document: Document) -> Result<String, ServerError> {
        let id = Uuid::new_v4().simple().to_string();
        self.set(collection, &id, document).await?;
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<(), ServerError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        tracing::debug!(collection, id, "document stored");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ServerError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
