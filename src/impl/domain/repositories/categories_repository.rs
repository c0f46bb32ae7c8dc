use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::Category;

#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Category>, ServerError>;

    /// Ordered by display order.
    async fn list(&self) -> Result<Vec<Category>, ServerError>;

    async fn add(&self, category: Category) -> Result<Category, ServerError>;

    async fn update(&self, category: &Category) -> Result<(), ServerError>;
}
