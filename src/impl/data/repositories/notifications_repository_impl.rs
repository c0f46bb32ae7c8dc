use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::{
        datasources::document_datasource::DocumentDatasource,
        models::document_model::NOTIFICATIONS,
    },
    domain::repositories::notifications_repository::NotificationsRepository,
    entities::Notification,
};

pub(crate) struct NotificationsRepositoryImpl<DS: DocumentDatasource> {
    datasource: Arc<DS>,
}

impl<DS: DocumentDatasource> NotificationsRepositoryImpl<DS> {
    pub(crate) fn new(datasource: Arc<DS>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl<DS: DocumentDatasource> NotificationsRepository for NotificationsRepositoryImpl<DS> {
    async fn get(&self, id: &str) -> Result<Option<Notification>, ServerError> {
        self.datasource
            .get(NOTIFICATIONS.collection(), id)
            .await?
            .map(|doc| NOTIFICATIONS.decode(id, doc))
            .transpose()
    }

    async fn list_for_user(&self, uid: &str) -> Result<Vec<Notification>, ServerError> {
        let mut notifications: Vec<Notification> =
            NOTIFICATIONS.decode_all(self.datasource.list(NOTIFICATIONS.collection()).await?)?;
        notifications.retain(|n| n.user_id == uid);
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn add(&self, notification: Notification) -> Result<Notification, ServerError> {
        let id = self
            .datasource
            .add(NOTIFICATIONS.collection(), NOTIFICATIONS.encode(&notification)?)
            .await?;
        Ok(Notification { id, ..notification })
    }

    async fn update(&self, notification: &Notification) -> Result<(), ServerError> {
        self.datasource
            .set(
                NOTIFICATIONS.collection(),
                &notification.id,
                NOTIFICATIONS.encode(notification)?,
            )
            .await
    }
}
