use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{Session, UserRole};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, ServerError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError>;

    async fn uid_by_email(&self, email: &str) -> Result<Option<String>, ServerError>;

    async fn set_role_claim(&self, uid: &str, role: UserRole) -> Result<(), ServerError>;

    async fn role_claim(&self, uid: &str) -> Result<Option<UserRole>, ServerError>;
}
