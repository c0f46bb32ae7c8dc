use fractic_server_error::ServerError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    data::datasources::document_datasource::Document,
    errors::{DocumentDecodeError, DocumentEncodeError},
};

/// Converts entities to and from stored documents. The id lives outside the
/// document body, under `id_field` in the entity.
pub(crate) struct DocumentModel {
    collection: &'static str,
    id_field: &'static str,
}

impl DocumentModel {
    pub(crate) const fn new(collection: &'static str, id_field: &'static str) -> Self {
        Self {
            collection,
            id_field,
        }
    }

    pub(crate) fn collection(&self) -> &'static str {
        self.collection
    }

    pub(crate) fn encode<T: Serialize>(&self, entity: &T) -> Result<Document, ServerError> {
        match serde_json::to_value(entity)
            .map_err(|e| DocumentEncodeError::with_debug(self.collection, &e))?
        {
            Value::Object(mut map) => {
                map.remove(self.id_field);
                Ok(map)
            }
            other => Err(DocumentEncodeError::with_debug(self.collection, &other)),
        }
    }

    pub(crate) fn decode<T: DeserializeOwned>(
        &self,
        id: &str,
        mut document: Document,
    ) -> Result<T, ServerError> {
        document.insert(self.id_field.to_string(), Value::String(id.to_string()));
        serde_json::from_value(Value::Object(document))
            .map_err(|e| DocumentDecodeError::with_debug(self.collection, id, &e))
    }

    pub(crate) fn decode_all<T: DeserializeOwned>(
        &self,
        documents: Vec<(String, Document)>,
    ) -> Result<Vec<T>, ServerError> {
        documents
            .into_iter()
            .map(|(id, document)| self.decode(&id, document))
            .collect()
    }
}

pub(crate) const USERS: DocumentModel = DocumentModel::new("users", "uid");
pub(crate) const BLOCKS: DocumentModel = DocumentModel::new("blocks", "id");
pub(crate) const REGIONS: DocumentModel = DocumentModel::new("regions", "id");
pub(crate) const BASES: DocumentModel = DocumentModel::new("bases", "id");
pub(crate) const TRANSACTIONS: DocumentModel = DocumentModel::new("transactions", "id");
pub(crate) const RECEIPTS: DocumentModel = DocumentModel::new("receipts", "id");
pub(crate) const APPROVAL_HISTORY: DocumentModel = DocumentModel::new("approvalHistory", "id");
pub(crate) const CATEGORIES: DocumentModel = DocumentModel::new("categories", "id");
pub(crate) const NOTIFICATIONS: DocumentModel = DocumentModel::new("notifications", "id");
