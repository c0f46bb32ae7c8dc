use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::Notification;

#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Notification>, ServerError>;

    /// Newest first.
    async fn list_for_user(&self, uid: &str) -> Result<Vec<Notification>, ServerError>;

    async fn add(&self, notification: Notification) -> Result<Notification, ServerError>;

    async fn update(&self, notification: &Notification) -> Result<(), ServerError>;
}
