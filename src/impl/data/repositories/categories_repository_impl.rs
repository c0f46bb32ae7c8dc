use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::{
        datasources::document_datasource::DocumentDatasource, models::document_model::CATEGORIES,
    },
    domain::repositories::categories_repository::CategoriesRepository,
    entities::Category,
};

pub(crate) struct CategoriesRepositoryImpl<DS: DocumentDatasource> {
    datasource: Arc<DS>,
}

impl<DS: DocumentDatasource> CategoriesRepositoryImpl<DS> {
    pub(crate) fn new(datasource: Arc<DS>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl<DS: DocumentDatasource> CategoriesRepository for CategoriesRepositoryImpl<DS> {
    async fn get(&self, id: &str) -> Result<Option<Category>, ServerError> {
        self.datasource
            .get(CATEGORIES.collection(), id)
            .await?
            .map(|doc| CATEGORIES.decode(id, doc))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Category>, ServerError> {
        let mut categories: Vec<Category> =
            CATEGORIES.decode_all(self.datasource.list(CATEGORIES.collection()).await?)?;
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    async fn add(&self, category: Category) -> Result<Category, ServerError> {
        let id = self
            .datasource
            .add(CATEGORIES.collection(), CATEGORIES.encode(&category)?)
            .await?;
        Ok(Category { id, ..category })
    }

    async fn update(&self, category: &Category) -> Result<(), ServerError> {
        self.datasource
            .set(CATEGORIES.collection(), &category.id, CATEGORIES.encode(category)?)
            .await
    }
}
