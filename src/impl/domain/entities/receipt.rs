use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::errors::InvalidBase64;

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub transaction_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub storage_path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A receipt file attached to a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub file_type: String,
    pub content: Vec<u8>,
}

impl ReceiptUpload {
    pub fn new(
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: file_type.into(),
            content: content.into(),
        }
    }

    /// Build from a base64 payload, as sent by browser and mobile clients.
    /// A `data:<type>;base64,` prefix is accepted and stripped.
    pub fn from_base64(
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        payload: &str,
    ) -> Result<Self, ServerError> {
        let file_name = file_name.into();
        let encoded = match payload.split_once(";base64,") {
            Some((_, data)) => data,
            None => payload,
        };
        let content = STANDARD
            .decode(encoded.trim())
            .map_err(|e| InvalidBase64::with_debug(&file_name, &e))?;
        Ok(Self {
            file_name,
            file_type: file_type.into(),
            content,
        })
    }
}
