use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tempfile::TempDir;

use crate::{
    config::ExpenseAdminConfig,
    data::{
        datasources::{
            auth_datasource::MemoryAuthDatasource, document_datasource::MemoryDocumentDatasource,
            file_storage_datasource::LocalFileStorageDatasource,
        },
        repositories::{
            auth_repository_impl::AuthRepositoryImpl,
            categories_repository_impl::CategoriesRepositoryImpl,
            notifications_repository_impl::NotificationsRepositoryImpl,
            transactions_repository_impl::TransactionsRepositoryImpl,
            users_repository_impl::UsersRepositoryImpl,
        },
    },
    domain::repositories::{
        transactions_repository::TransactionsRepository, users_repository::UsersRepository,
    },
    entities::{
        ApprovalRoute, Base, Block, ExpenseTransaction, Region, Session, TransactionStatus, User,
        UserRole,
    },
};

pub(crate) type Docs = MemoryDocumentDatasource;
pub(crate) type Users = UsersRepositoryImpl<Docs>;
pub(crate) type Transactions = TransactionsRepositoryImpl<Docs, LocalFileStorageDatasource>;
pub(crate) type Notifications = NotificationsRepositoryImpl<Docs>;
pub(crate) type Categories = CategoriesRepositoryImpl<Docs>;
pub(crate) type Auth = AuthRepositoryImpl<MemoryAuthDatasource>;

/// In-memory repositories over one organization:
/// block `b1` > regions `r1`, `r2` > base `s1` (in `r1`).
pub(crate) struct Fixture {
    pub(crate) users: Arc<Users>,
    pub(crate) transactions: Arc<Transactions>,
    pub(crate) notifications: Arc<Notifications>,
    pub(crate) categories: Arc<Categories>,
    pub(crate) auth: Arc<Auth>,
    pub(crate) config: ExpenseAdminConfig,
    _receipts: TempDir,
}

impl Fixture {
    pub(crate) async fn new() -> Self {
        let receipts = tempfile::tempdir().unwrap();
        let docs = Arc::new(Docs::new());
        let files = Arc::new(LocalFileStorageDatasource::new(receipts.path()));
        let fixture = Self {
            users: Arc::new(Users::new(docs.clone())),
            transactions: Arc::new(Transactions::new(docs.clone(), files)),
            notifications: Arc::new(Notifications::new(docs.clone())),
            categories: Arc::new(Categories::new(docs)),
            auth: Arc::new(Auth::new(Arc::new(MemoryAuthDatasource::new()))),
            config: ExpenseAdminConfig {
                receipts_dir: receipts.path().to_path_buf(),
                invite_base_url: "https://expenses.example.com".into(),
                ..Default::default()
            },
            _receipts: receipts,
        };
        fixture
            .users
            .save_block(&Block {
                id: "b1".into(),
                name: "East".into(),
            })
            .await
            .unwrap();
        for region in ["r1", "r2"] {
            fixture
                .users
                .save_region(&Region {
                    id: region.into(),
                    name: format!("Region {region}"),
                    block_id: "b1".into(),
                })
                .await
                .unwrap();
        }
        fixture
            .users
            .save_base(&Base {
                id: "s1".into(),
                name: "Tokyo".into(),
                region_id: "r1".into(),
            })
            .await
            .unwrap();
        fixture
    }

    /// Stores a profile `{uid}@example.com` placed in `b1` and the given
    /// region, and returns its session.
    pub(crate) async fn user(&self, uid: &str, role: UserRole, region: Option<&str>) -> Session {
        let mut user = User::new(uid, format!("{uid}@example.com"), Utc::now());
        user.display_name = Some(format!("User {uid}"));
        user.role = role;
        user.block_id = Some("b1".into());
        user.region_id = region.map(Into::into);
        self.users.save(&user).await.unwrap();
        Session::new(uid, user.email)
    }

    pub(crate) async fn transaction(
        &self,
        owner: &Session,
        date: (i32, u32, u32),
        amount: f64,
        status: TransactionStatus,
    ) -> ExpenseTransaction {
        let profile = self.users.get(owner.uid()).await.unwrap();
        let now = Utc::now();
        self.transactions
            .add(ExpenseTransaction {
                id: String::new(),
                user_id: owner.uid().to_string(),
                organization_id: "org001".into(),
                block_id: profile.as_ref().and_then(|p| p.block_id.clone()),
                region_id: profile.as_ref().and_then(|p| p.region_id.clone()),
                base_id: None,
                transaction_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                amount,
                merchant_name: "Shop".into(),
                category_id: None,
                memo: None,
                expense_destination: None,
                status,
                approval_route: ApprovalRoute::Regional,
                receipt_count: 0,
                created_at: now,
                updated_at: now,
                submitted_at: None,
                approved_at: None,
            })
            .await
            .unwrap()
    }
}
