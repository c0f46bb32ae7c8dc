use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{ApprovalRecord, ExpenseTransaction, Receipt, ReceiptUpload};

#[async_trait]
pub trait TransactionsRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ExpenseTransaction>, ServerError>;

    async fn list(&self) -> Result<Vec<ExpenseTransaction>, ServerError>;

    /// Stores a new transaction; the id of the argument is ignored and the
    /// stored transaction (with its generated id) is returned.
    async fn add(&self, tx: ExpenseTransaction) -> Result<ExpenseTransaction, ServerError>;

    async fn update(&self, tx: &ExpenseTransaction) -> Result<(), ServerError>;

    /// Uploads the file and records its receipt document. `index` is the
    /// position of the file within the batch it was submitted with.
    async fn add_receipt(
        &self,
        transaction_id: &str,
        index: usize,
        upload: &ReceiptUpload,
    ) -> Result<Receipt, ServerError>;

    async fn receipts(&self, transaction_id: &str) -> Result<Vec<Receipt>, ServerError>;

    async fn add_approval_record(
        &self,
        record: ApprovalRecord,
    ) -> Result<ApprovalRecord, ServerError>;

    /// Oldest first.
    async fn approval_history(&self, transaction_id: &str)
        -> Result<Vec<ApprovalRecord>, ServerError>;
}
