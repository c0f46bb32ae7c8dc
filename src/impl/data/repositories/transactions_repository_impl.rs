use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fractic_server_error::ServerError;

use crate::{
    data::{
        datasources::{
            document_datasource::DocumentDatasource, file_storage_datasource::FileStorageDatasource,
        },
        models::document_model::{APPROVAL_HISTORY, RECEIPTS, TRANSACTIONS},
    },
    domain::repositories::transactions_repository::TransactionsRepository,
    entities::{ApprovalRecord, ExpenseTransaction, Receipt, ReceiptUpload},
};

pub(crate) struct TransactionsRepositoryImpl<DS, FS>
where
    DS: DocumentDatasource,
    FS: FileStorageDatasource,
{
    datasource: Arc<DS>,
    file_storage: Arc<FS>,
}

impl<DS, FS> TransactionsRepositoryImpl<DS, FS>
where
    DS: DocumentDatasource,
    FS: FileStorageDatasource,
{
    pub(crate) fn new(datasource: Arc<DS>, file_storage: Arc<FS>) -> Self {
        Self {
            datasource,
            file_storage,
        }
    }
}

/// File names become part of a storage path, so separators are neutralised.
fn storage_safe(file_name: &str) -> String {
    file_name.replace(['/', '\\'], "_")
}

#[async_trait]
impl<DS, FS> TransactionsRepository for TransactionsRepositoryImpl<DS, FS>
where
    DS: DocumentDatasource,
    FS: FileStorageDatasource,
{
    async fn get(&self, id: &str) -> Result<Option<ExpenseTransaction>, ServerError> {
        self.datasource
            .get(TRANSACTIONS.collection(), id)
            .await?
            .map(|doc| TRANSACTIONS.decode(id, doc))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<ExpenseTransaction>, ServerError> {
        TRANSACTIONS.decode_all(self.datasource.list(TRANSACTIONS.collection()).await?)
    }

    async fn add(&self, tx: ExpenseTransaction) -> Result<ExpenseTransaction, ServerError> {
        let id = self
            .datasource
            .add(TRANSACTIONS.collection(), TRANSACTIONS.encode(&tx)?)
            .await?;
        Ok(ExpenseTransaction { id, ..tx })
    }

    async fn update(&self, tx: &ExpenseTransaction) -> Result<(), ServerError> {
        self.datasource
            .set(TRANSACTIONS.collection(), &tx.id, TRANSACTIONS.encode(tx)?)
            .await
    }

    async fn add_receipt(
        &self,
        transaction_id: &str,
        index: usize,
        upload: &ReceiptUpload,
    ) -> Result<Receipt, ServerError> {
        let now = Utc::now();
        let storage_path = format!(
            "receipts/{}/{}_{}_{}",
            transaction_id,
            now.timestamp_millis(),
            index,
            storage_safe(&upload.file_name)
        );
        self.file_storage
            .upload(&storage_path, &upload.content)
            .await?;

        let receipt = Receipt {
            id: String::new(),
            transaction_id: transaction_id.to_string(),
            file_name: upload.file_name.clone(),
            file_size: upload.content.len() as u64,
            file_type: upload.file_type.clone(),
            storage_path,
            uploaded_at: now,
        };
        let id = self
            .datasource
            .add(RECEIPTS.collection(), RECEIPTS.encode(&receipt)?)
            .await?;
        Ok(Receipt { id, ..receipt })
    }

    async fn receipts(&self, transaction_id: &str) -> Result<Vec<Receipt>, ServerError> {
        let mut receipts: Vec<Receipt> =
            RECEIPTS.decode_all(self.datasource.list(RECEIPTS.collection()).await?)?;
        receipts.retain(|r| r.transaction_id == transaction_id);
        receipts.sort_by(|a, b| a.storage_path.cmp(&b.storage_path));
        Ok(receipts)
    }

    async fn add_approval_record(
        &self,
        record: ApprovalRecord,
    ) -> Result<ApprovalRecord, ServerError> {
        let id = self
            .datasource
            .add(APPROVAL_HISTORY.collection(), APPROVAL_HISTORY.encode(&record)?)
            .await?;
        Ok(ApprovalRecord { id, ..record })
    }

    async fn approval_history(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<ApprovalRecord>, ServerError> {
        let mut history: Vec<ApprovalRecord> = APPROVAL_HISTORY
            .decode_all(self.datasource.list(APPROVAL_HISTORY.collection()).await?)?;
        history.retain(|r| r.transaction_id == transaction_id);
        history.sort_by_key(|r| r.created_at);
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        data::datasources::{
            document_datasource::MemoryDocumentDatasource,
            file_storage_datasource::LocalFileStorageDatasource,
        },
        entities::{ApprovalRoute, TransactionStatus},
    };

    fn sample(user_id: &str) -> ExpenseTransaction {
        let now = Utc::now();
        ExpenseTransaction {
            id: String::new(),
            user_id: user_id.into(),
            organization_id: "org001".into(),
            block_id: None,
            region_id: None,
            base_id: None,
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            amount: 5000.0,
            merchant_name: "Lawson".into(),
            category_id: None,
            memo: None,
            expense_destination: None,
            status: TransactionStatus::Pending,
            approval_route: ApprovalRoute::Regional,
            receipt_count: 0,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_at: None,
        }
    }

    #[tokio::test]
    async fn add_assigns_an_id_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = TransactionsRepositoryImpl::new(
            Arc::new(MemoryDocumentDatasource::new()),
            Arc::new(LocalFileStorageDatasource::new(dir.path())),
        );

        let stored = repo.add(sample("u1")).await.unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(repo.get(&stored.id).await.unwrap(), Some(stored.clone()));
        assert_eq!(repo.list().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn receipts_are_uploaded_under_the_transaction_folder() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalFileStorageDatasource::new(dir.path()));
        let repo =
            TransactionsRepositoryImpl::new(Arc::new(MemoryDocumentDatasource::new()), storage.clone());
        let tx = repo.add(sample("u1")).await.unwrap();

        let upload = ReceiptUpload::new("../slip.jpg", "image/jpeg", b"jpeg".to_vec());
        let receipt = repo.add_receipt(&tx.id, 0, &upload).await.unwrap();

        assert!(receipt.storage_path.starts_with(&format!("receipts/{}/", tx.id)));
        assert!(receipt.storage_path.ends_with("_0_.._slip.jpg"));
        assert_eq!(receipt.file_size, 4);
        assert_eq!(storage.download(&receipt.storage_path).await.unwrap(), b"jpeg");
        assert_eq!(repo.receipts(&tx.id).await.unwrap(), vec![receipt]);
        assert!(repo.receipts("other").await.unwrap().is_empty());
    }
}
