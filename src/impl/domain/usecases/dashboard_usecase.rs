use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    domain::{
        repositories::{
            notifications_repository::NotificationsRepository,
            transactions_repository::TransactionsRepository, users_repository::UsersRepository,
        },
        usecases::users_usecase::{actor_info, actor_profile},
    },
    entities::{DashboardSummary, ExpenseTransaction, Session, StatusCounts},
};

#[async_trait]
pub trait DashboardUsecase: Send + Sync {
    async fn summary(&self, session: &Session) -> Result<DashboardSummary, ServerError>;
}

pub(crate) struct DashboardUsecaseImpl<R1, R2, R3>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
{
    users_repository: Arc<R1>,
    transactions_repository: Arc<R2>,
    notifications_repository: Arc<R3>,
    recent_limit: usize,
}

impl<R1, R2, R3> DashboardUsecaseImpl<R1, R2, R3>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
{
    pub(crate) fn new(
        users_repository: Arc<R1>,
        transactions_repository: Arc<R2>,
        notifications_repository: Arc<R3>,
        recent_limit: usize,
    ) -> Self {
        Self {
            users_repository,
            transactions_repository,
            notifications_repository,
            recent_limit,
        }
    }
}

#[async_trait]
impl<R1, R2, R3> DashboardUsecase for DashboardUsecaseImpl<R1, R2, R3>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
{
    async fn summary(&self, session: &Session) -> Result<DashboardSummary, ServerError> {
        let profile = actor_profile(self.users_repository.as_ref(), session).await?;
        let info = actor_info(session, profile.as_ref());

        let mut own: Vec<ExpenseTransaction> = self
            .transactions_repository
            .list()
            .await?
            .into_iter()
            .filter(|tx| tx.user_id == info.uid)
            .collect();
        let counts: StatusCounts = own.iter().map(|tx| tx.status).collect();
        own.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        own.truncate(self.recent_limit);

        let unread_notifications = self
            .notifications_repository
            .list_for_user(&info.uid)
            .await?
            .iter()
            .filter(|n| !n.read)
            .count();

        Ok(DashboardSummary {
            display_name: profile
                .as_ref()
                .map_or(session.email(), |p| p.label())
                .to_string(),
            role: info.role,
            counts,
            recent_transactions: own,
            unread_notifications,
        })
    }
}
