use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fractic_server_error::ServerError;
use futures::future::{join_all, try_join_all};

use crate::{
    data::{
        datasources::transactions_csv_datasource::{
            TransactionsCsvDatasource, TransactionsCsvDatasourceImpl,
        },
        models::yen_amount_model::YenAmountModel,
    },
    domain::{
        logic::{
            access_policy::{
                can_edit_transaction, can_review_transaction, can_view_transaction, ensure,
                transaction_scope,
            },
            approval_flow,
            paginator::paginate,
        },
        repositories::{
            categories_repository::CategoriesRepository,
            notifications_repository::NotificationsRepository,
            transactions_repository::TransactionsRepository, users_repository::UsersRepository,
        },
        usecases::users_usecase::{actor_info, actor_profile},
    },
    entities::{
        ApprovalAction, ApprovalRecord, ApprovalRoute, ExpenseTransaction, ImportRow, Page,
        ReceiptUpload, Session, TransactionDetail, TransactionDraft, TransactionEdit,
        TransactionQuery, TransactionStatus, UserInfo,
    },
    errors::{
        CategoryNotFound, MissingRequiredField, NonPositiveAmount, PermissionDenied,
        TransactionNotFound,
    },
    presentation::notification_fmt,
};

#[async_trait]
pub trait TransactionsUsecase: Send + Sync {
    /// Parses an amount typed into a form (full-width digits and separators
    /// accepted).
    fn parse_amount_input(&self, input: &str) -> Result<f64, ServerError>;

    /// Records a new pending transaction and uploads its receipt files.
    async fn create(
        &self,
        session: &Session,
        draft: TransactionDraft,
        receipts: Vec<ReceiptUpload>,
    ) -> Result<ExpenseTransaction, ServerError>;

    async fn edit(
        &self,
        session: &Session,
        id: &str,
        edit: TransactionEdit,
    ) -> Result<ExpenseTransaction, ServerError>;

    /// Parses an import file without writing anything.
    fn preview_import(&self, csv: &str) -> Result<Vec<ImportRow>, ServerError>;

    async fn import_csv(
        &self,
        session: &Session,
        csv: &str,
    ) -> Result<Vec<ExpenseTransaction>, ServerError>;

    async fn import_file<P>(
        &self,
        session: &Session,
        path: P,
    ) -> Result<Vec<ExpenseTransaction>, ServerError>
    where
        P: AsRef<std::path::Path> + Send;

    /// Transactions visible to the user, newest transaction date first.
    async fn list(
        &self,
        session: &Session,
        query: &TransactionQuery,
    ) -> Result<Page<ExpenseTransaction>, ServerError>;

    async fn detail(&self, session: &Session, id: &str) -> Result<TransactionDetail, ServerError>;

    async fn submit(&self, session: &Session, id: &str)
        -> Result<ExpenseTransaction, ServerError>;

    async fn approve(
        &self,
        session: &Session,
        id: &str,
        comment: Option<&str>,
    ) -> Result<ExpenseTransaction, ServerError>;

    async fn reject(
        &self,
        session: &Session,
        id: &str,
        comment: Option<&str>,
    ) -> Result<ExpenseTransaction, ServerError>;
}

pub(crate) struct TransactionsUsecaseImpl<R1, R2, R3, R4>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
    R4: CategoriesRepository,
{
    users_repository: Arc<R1>,
    transactions_repository: Arc<R2>,
    notifications_repository: Arc<R3>,
    categories_repository: Arc<R4>,
    import_datasource: TransactionsCsvDatasourceImpl,
    organization_id: String,
    page_size: usize,
}

/// Signed-in account as seen by the approval flow.
struct Actor {
    info: UserInfo,
    name: String,
}

struct ValidFields {
    amount: f64,
    merchant_name: String,
}

fn validate(amount: f64, merchant_name: &str) -> Result<ValidFields, ServerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(NonPositiveAmount::new(amount));
    }
    let merchant_name = merchant_name.trim();
    if merchant_name.is_empty() {
        return Err(MissingRequiredField::new("merchantName"));
    }
    Ok(ValidFields {
        amount,
        merchant_name: merchant_name.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<R1, R2, R3, R4> TransactionsUsecaseImpl<R1, R2, R3, R4>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
    R4: CategoriesRepository,
{
    pub(crate) fn new(
        users_repository: Arc<R1>,
        transactions_repository: Arc<R2>,
        notifications_repository: Arc<R3>,
        categories_repository: Arc<R4>,
        organization_id: impl Into<String>,
        page_size: usize,
    ) -> Self {
        Self {
            users_repository,
            transactions_repository,
            notifications_repository,
            categories_repository,
            import_datasource: TransactionsCsvDatasourceImpl::new(),
            organization_id: organization_id.into(),
            page_size,
        }
    }

    async fn actor(&self, session: &Session) -> Result<Actor, ServerError> {
        let profile = actor_profile(self.users_repository.as_ref(), session).await?;
        Ok(Actor {
            info: actor_info(session, profile.as_ref()),
            name: profile
                .as_ref()
                .map_or(session.email(), |p| p.label())
                .to_string(),
        })
    }

    async fn existing(&self, id: &str) -> Result<ExpenseTransaction, ServerError> {
        self.transactions_repository
            .get(id)
            .await?
            .ok_or_else(|| TransactionNotFound::new(id))
    }

    async fn check_category(&self, category_id: Option<&str>) -> Result<(), ServerError> {
        match category_id {
            Some(id) if self.categories_repository.get(id).await?.is_none() => {
                Err(CategoryNotFound::new(id))
            }
            _ => Ok(()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn new_transaction(
        &self,
        owner: &UserInfo,
        transaction_date: NaiveDate,
        fields: ValidFields,
        category_id: Option<String>,
        memo: Option<String>,
        expense_destination: Option<String>,
        receipt_count: u32,
        now: DateTime<Utc>,
    ) -> ExpenseTransaction {
        ExpenseTransaction {
            id: String::new(),
            user_id: owner.uid.clone(),
            organization_id: self.organization_id.clone(),
            block_id: owner.block_id.clone(),
            region_id: owner.region_id.clone(),
            base_id: owner.base_id.clone(),
            transaction_date,
            amount: fields.amount,
            merchant_name: fields.merchant_name,
            category_id,
            memo,
            expense_destination,
            status: TransactionStatus::Pending,
            approval_route: ApprovalRoute::Regional,
            receipt_count,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_at: None,
        }
    }

    async fn import_rows(
        &self,
        session: &Session,
        rows: Vec<ImportRow>,
    ) -> Result<Vec<ExpenseTransaction>, ServerError> {
        let actor = self.actor(session).await?;
        let now = Utc::now();
        let drafts = rows
            .into_iter()
            .map(|row| -> Result<ExpenseTransaction, ServerError> {
                let fields = validate(row.amount, &row.merchant_name)?;
                Ok(self.new_transaction(
                    &actor.info,
                    row.transaction_date,
                    fields,
                    None,
                    row.memo,
                    None,
                    0,
                    now,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let imported = try_join_all(
            drafts
                .into_iter()
                .map(|tx| self.transactions_repository.add(tx)),
        )
        .await?;
        tracing::info!(uid = %actor.info.uid, count = imported.len(), "transactions imported");
        Ok(imported)
    }

    /// Applies a workflow step and writes its history record.
    async fn transition(
        &self,
        actor: &Actor,
        mut tx: ExpenseTransaction,
        action: ApprovalAction,
        comment: Option<&str>,
    ) -> Result<ExpenseTransaction, ServerError> {
        let now = Utc::now();
        approval_flow::apply(&mut tx, action, now)?;
        self.transactions_repository.update(&tx).await?;
        self.transactions_repository
            .add_approval_record(ApprovalRecord {
                id: String::new(),
                transaction_id: tx.id.clone(),
                action,
                approver_uid: actor.info.uid.clone(),
                approver_name: actor.name.clone(),
                approver_role: actor.info.role,
                comment: comment
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
                created_at: now,
            })
            .await?;
        tracing::info!(
            id = %tx.id,
            action = action.as_str(),
            by = %actor.info.uid,
            status = %tx.status,
            "transaction status changed"
        );
        Ok(tx)
    }

    async fn review(
        &self,
        session: &Session,
        id: &str,
        action: ApprovalAction,
        comment: Option<&str>,
    ) -> Result<ExpenseTransaction, ServerError> {
        let actor = self.actor(session).await?;
        let tx = self.existing(id).await?;
        ensure(
            can_review_transaction(&actor.info, &tx),
            "review this transaction",
        )?;
        let tx = self.transition(&actor, tx, action, comment).await?;
        let notification = notification_fmt::review_outcome(
            &tx,
            action == ApprovalAction::Approved,
            &actor.name,
            comment,
            Utc::now(),
        );
        self.notifications_repository.add(notification).await?;
        Ok(tx)
    }
}

#[async_trait]
impl<R1, R2, R3, R4> TransactionsUsecase for TransactionsUsecaseImpl<R1, R2, R3, R4>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
    R4: CategoriesRepository,
{
    fn parse_amount_input(&self, input: &str) -> Result<f64, ServerError> {
        YenAmountModel::from_form_input(input).map(f64::from)
    }

    async fn create(
        &self,
        session: &Session,
        draft: TransactionDraft,
        receipts: Vec<ReceiptUpload>,
    ) -> Result<ExpenseTransaction, ServerError> {
        let fields = validate(draft.amount, &draft.merchant_name)?;
        let category_id = non_empty(draft.category_id);
        self.check_category(category_id.as_deref()).await?;
        let actor = self.actor(session).await?;

        let tx = self.new_transaction(
            &actor.info,
            draft.transaction_date,
            fields,
            category_id,
            non_empty(draft.memo),
            non_empty(draft.expense_destination),
            0,
            Utc::now(),
        );
        let mut tx = self.transactions_repository.add(tx).await?;
        let uploads = join_all(
            receipts
                .iter()
                .enumerate()
                .map(|(i, r)| self.transactions_repository.add_receipt(&tx.id, i, r)),
        )
        .await;

        // The stored count reflects the receipts that were actually saved.
        let stored = uploads.iter().filter(|u| u.is_ok()).count() as u32;
        if stored > 0 {
            tx.receipt_count = stored;
            self.transactions_repository.update(&tx).await?;
        }
        if let Some(e) = uploads.into_iter().find_map(Result::err) {
            tracing::warn!(id = %tx.id, stored, requested = receipts.len(), "receipt upload failed");
            return Err(e);
        }

        tracing::info!(id = %tx.id, uid = %tx.user_id, receipts = stored, "transaction created");
        Ok(tx)
    }

    async fn edit(
        &self,
        session: &Session,
        id: &str,
        edit: TransactionEdit,
    ) -> Result<ExpenseTransaction, ServerError> {
        let actor = self.actor(session).await?;
        let mut tx = self.existing(id).await?;
        ensure(can_edit_transaction(&actor.info, &tx), "edit this transaction")?;
        approval_flow::ensure_editable(&tx)?;

        let fields = validate(edit.amount, &edit.merchant_name)?;
        let category_id = edit.category_id.trim();
        if category_id.is_empty() {
            return Err(MissingRequiredField::new("categoryId"));
        }
        self.check_category(Some(category_id)).await?;

        tx.transaction_date = edit.transaction_date;
        tx.amount = fields.amount;
        tx.merchant_name = fields.merchant_name;
        tx.category_id = Some(category_id.to_string());
        tx.memo = non_empty(edit.memo);
        tx.updated_at = Utc::now();
        self.transactions_repository.update(&tx).await?;
        Ok(tx)
    }

    fn preview_import(&self, csv: &str) -> Result<Vec<ImportRow>, ServerError> {
        self.import_datasource.from_string(csv)
    }

    async fn import_csv(
        &self,
        session: &Session,
        csv: &str,
    ) -> Result<Vec<ExpenseTransaction>, ServerError> {
        let rows = self.import_datasource.from_string(csv)?;
        self.import_rows(session, rows).await
    }

    async fn import_file<P>(
        &self,
        session: &Session,
        path: P,
    ) -> Result<Vec<ExpenseTransaction>, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let rows = self.import_datasource.from_file(path)?;
        self.import_rows(session, rows).await
    }

    async fn list(
        &self,
        session: &Session,
        query: &TransactionQuery,
    ) -> Result<Page<ExpenseTransaction>, ServerError> {
        let actor = self.actor(session).await?;
        let scope = transaction_scope(&actor.info);
        let mut visible: Vec<ExpenseTransaction> = self
            .transactions_repository
            .list()
            .await?
            .into_iter()
            .filter(|tx| scope.covers(tx))
            .filter(|tx| query.status.is_none_or(|s| tx.status == s))
            .collect();
        visible.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(visible, query.page, self.page_size))
    }

    async fn detail(&self, session: &Session, id: &str) -> Result<TransactionDetail, ServerError> {
        let actor = self.actor(session).await?;
        let transaction = self.existing(id).await?;
        ensure(
            can_view_transaction(&actor.info, &transaction),
            "view this transaction",
        )?;
        let (receipts, history) = futures::try_join!(
            self.transactions_repository.receipts(id),
            self.transactions_repository.approval_history(id),
        )?;
        Ok(TransactionDetail {
            transaction,
            receipts,
            history,
        })
    }

    async fn submit(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<ExpenseTransaction, ServerError> {
        let actor = self.actor(session).await?;
        let tx = self.existing(id).await?;
        if tx.user_id != actor.info.uid {
            return Err(PermissionDenied::new("submit another user's transaction"));
        }
        self.transition(&actor, tx, ApprovalAction::Submitted, None)
            .await
    }

    async fn approve(
        &self,
        session: &Session,
        id: &str,
        comment: Option<&str>,
    ) -> Result<ExpenseTransaction, ServerError> {
        self.review(session, id, ApprovalAction::Approved, comment)
            .await
    }

    async fn reject(
        &self,
        session: &Session,
        id: &str,
        comment: Option<&str>,
    ) -> Result<ExpenseTransaction, ServerError> {
        self.review(session, id, ApprovalAction::Rejected, comment)
            .await
    }
}
