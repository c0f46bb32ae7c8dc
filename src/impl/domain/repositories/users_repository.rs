use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{Base, Block, Organization, Region, User};

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<User>, ServerError>;

    /// Case-insensitive match on the email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServerError>;

    /// Pending (invited) profile carrying the given invite token.
    async fn find_pending_by_invite_token(&self, token: &str)
        -> Result<Option<User>, ServerError>;

    async fn list(&self) -> Result<Vec<User>, ServerError>;

    async fn save(&self, user: &User) -> Result<(), ServerError>;

    async fn delete(&self, uid: &str) -> Result<(), ServerError>;

    async fn organization(&self) -> Result<Organization, ServerError>;

    async fn save_block(&self, block: &Block) -> Result<(), ServerError>;

    async fn save_region(&self, region: &Region) -> Result<(), ServerError>;

    async fn save_base(&self, base: &Base) -> Result<(), ServerError>;
}
