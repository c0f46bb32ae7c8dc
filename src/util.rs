use std::sync::Arc;

use fractic_server_error::ServerError;

use crate::{
    config::ExpenseAdminConfig,
    data::{
        datasources::{
            auth_datasource::{AuthDatasource, MemoryAuthDatasource},
            document_datasource::{DocumentDatasource, MemoryDocumentDatasource},
            file_storage_datasource::{FileStorageDatasource, LocalFileStorageDatasource},
        },
        repositories::{
            auth_repository_impl::AuthRepositoryImpl,
            categories_repository_impl::CategoriesRepositoryImpl,
            notifications_repository_impl::NotificationsRepositoryImpl,
            transactions_repository_impl::TransactionsRepositoryImpl,
            users_repository_impl::UsersRepositoryImpl,
        },
    },
    domain::{
        repositories::auth_repository::AuthRepository as _,
        usecases::{
            categories_usecase::{CategoriesUsecase, CategoriesUsecaseImpl},
            dashboard_usecase::{DashboardUsecase, DashboardUsecaseImpl},
            invitation_usecase::{InvitationUsecase, InvitationUsecaseImpl},
            notifications_usecase::{NotificationsUsecase, NotificationsUsecaseImpl},
            reconciliation_usecase::{ReconciliationUsecase, ReconciliationUsecaseImpl},
            roles_usecase::{RolesUsecase, RolesUsecaseImpl},
            transactions_usecase::{TransactionsUsecase, TransactionsUsecaseImpl},
            users_usecase::{UsersUsecase, UsersUsecaseImpl},
        },
    },
    entities::{ReconciliationReport, Session},
    presentation::reconciliation_printer::ReconciliationPrinter,
};

/// Human-readable reconciliation summary.
pub type ReportText = String;

type Users<DS> = UsersRepositoryImpl<DS>;
type Transactions<DS, FS> = TransactionsRepositoryImpl<DS, FS>;
type Notifications<DS> = NotificationsRepositoryImpl<DS>;
type Categories<DS> = CategoriesRepositoryImpl<DS>;
type Auth<AU> = AuthRepositoryImpl<AU>;

/// Entry point wiring every usecase to one set of back ends.
pub struct ExpenseAdminUtil<DS, FS, AU>
where
    DS: DocumentDatasource,
    FS: FileStorageDatasource,
    AU: AuthDatasource,
{
    auth_repository: Arc<Auth<AU>>,
    users_usecase: UsersUsecaseImpl<Users<DS>, Auth<AU>>,
    invitation_usecase: InvitationUsecaseImpl<Users<DS>, Auth<AU>>,
    roles_usecase: RolesUsecaseImpl<Users<DS>, Auth<AU>>,
    transactions_usecase:
        TransactionsUsecaseImpl<Users<DS>, Transactions<DS, FS>, Notifications<DS>, Categories<DS>>,
    reconciliation_usecase:
        ReconciliationUsecaseImpl<Users<DS>, Transactions<DS, FS>, Notifications<DS>>,
    notifications_usecase: NotificationsUsecaseImpl<Notifications<DS>>,
    categories_usecase: CategoriesUsecaseImpl<Categories<DS>, Users<DS>>,
    dashboard_usecase: DashboardUsecaseImpl<Users<DS>, Transactions<DS, FS>, Notifications<DS>>,
    printer: ReconciliationPrinter,
}

impl ExpenseAdminUtil<MemoryDocumentDatasource, LocalFileStorageDatasource, MemoryAuthDatasource> {
    /// In-memory documents and accounts, receipts under
    /// `config.receipts_dir`.
    pub fn new(config: ExpenseAdminConfig) -> Self {
        let files = Arc::new(LocalFileStorageDatasource::new(config.receipts_dir.clone()));
        Self::with_datasources(
            config,
            Arc::new(MemoryDocumentDatasource::new()),
            files,
            Arc::new(MemoryAuthDatasource::new()),
        )
    }
}

impl<DS, FS, AU> ExpenseAdminUtil<DS, FS, AU>
where
    DS: DocumentDatasource,
    FS: FileStorageDatasource,
    AU: AuthDatasource,
{
    pub fn with_datasources(
        config: ExpenseAdminConfig,
        documents: Arc<DS>,
        files: Arc<FS>,
        accounts: Arc<AU>,
    ) -> Self {
        let users = Arc::new(Users::new(documents.clone()));
        let transactions = Arc::new(Transactions::new(documents.clone(), files));
        let notifications = Arc::new(Notifications::new(documents.clone()));
        let categories = Arc::new(Categories::new(documents));
        let auth = Arc::new(Auth::new(accounts));

        Self {
            users_usecase: UsersUsecaseImpl::new(
                users.clone(),
                auth.clone(),
                config.page_size,
                config.min_password_length,
            ),
            invitation_usecase: InvitationUsecaseImpl::new(
                users.clone(),
                auth.clone(),
                config.invite_base_url.clone(),
                config.invite_ttl_hours,
                config.min_password_length,
            ),
            roles_usecase: RolesUsecaseImpl::new(users.clone(), auth.clone()),
            transactions_usecase: TransactionsUsecaseImpl::new(
                users.clone(),
                transactions.clone(),
                notifications.clone(),
                categories.clone(),
                config.organization_id.clone(),
                config.page_size,
            ),
            reconciliation_usecase: ReconciliationUsecaseImpl::new(
                users.clone(),
                transactions.clone(),
                notifications.clone(),
                config.card_statement_layout.clone(),
                config.amount_tolerance,
            ),
            notifications_usecase: NotificationsUsecaseImpl::new(notifications.clone()),
            categories_usecase: CategoriesUsecaseImpl::new(categories, users.clone()),
            dashboard_usecase: DashboardUsecaseImpl::new(
                users,
                transactions,
                notifications,
                config.recent_transactions_limit,
            ),
            auth_repository: auth,
            printer: ReconciliationPrinter::new(),
        }
    }

    /// Unknown email and wrong password fail with the same error.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError> {
        self.auth_repository.sign_in(email, password).await
    }

    pub fn users(&self) -> &impl UsersUsecase {
        &self.users_usecase
    }

    pub fn invitations(&self) -> &impl InvitationUsecase {
        &self.invitation_usecase
    }

    pub fn roles(&self) -> &impl RolesUsecase {
        &self.roles_usecase
    }

    pub fn transactions(&self) -> &impl TransactionsUsecase {
        &self.transactions_usecase
    }

    pub fn reconciliation(&self) -> &impl ReconciliationUsecase {
        &self.reconciliation_usecase
    }

    pub fn notifications(&self) -> &impl NotificationsUsecase {
        &self.notifications_usecase
    }

    pub fn categories(&self) -> &impl CategoriesUsecase {
        &self.categories_usecase
    }

    pub fn dashboard(&self) -> &impl DashboardUsecase {
        &self.dashboard_usecase
    }

    pub fn print_report(&self, report: &ReconciliationReport) -> ReportText {
        self.printer.print_report(report)
    }

    pub async fn reconcile_from_string(
        &self,
        session: &Session,
        statement_csv: &str,
    ) -> Result<(ReconciliationReport, ReportText), ServerError> {
        let report = self
            .reconciliation_usecase
            .reconcile_csv(session, statement_csv)
            .await?;
        let text = self.printer.print_report(&report);
        Ok((report, text))
    }

    pub async fn reconcile_from_file<P>(
        &self,
        session: &Session,
        statement_csv: P,
    ) -> Result<(ReconciliationReport, ReportText), ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let report = self
            .reconciliation_usecase
            .reconcile_file(session, statement_csv)
            .await?;
        let text = self.printer.print_report(&report);
        Ok((report, text))
    }
}
