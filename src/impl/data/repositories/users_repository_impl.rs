use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::{
        datasources::document_datasource::DocumentDatasource,
        models::document_model::{BASES, BLOCKS, REGIONS, USERS},
    },
    domain::repositories::users_repository::UsersRepository,
    entities::{Base, Block, Organization, Region, User, UserStatus},
};

pub(crate) struct UsersRepositoryImpl<DS: DocumentDatasource> {
    datasource: Arc<DS>,
}

impl<DS: DocumentDatasource> UsersRepositoryImpl<DS> {
    pub(crate) fn new(datasource: Arc<DS>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl<DS: DocumentDatasource> UsersRepository for UsersRepositoryImpl<DS> {
    async fn get(&self, uid: &str) -> Result<Option<User>, ServerError> {
        self.datasource
            .get(USERS.collection(), uid)
            .await?
            .map(|doc| USERS.decode(uid, doc))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServerError> {
        let email = email.trim();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn find_pending_by_invite_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, ServerError> {
        Ok(self.list().await?.into_iter().find(|u| {
            u.status == UserStatus::Pending && u.invite_token.as_deref() == Some(token)
        }))
    }

    async fn list(&self) -> Result<Vec<User>, ServerError> {
        USERS.decode_all(self.datasource.list(USERS.collection()).await?)
    }

    async fn save(&self, user: &User) -> Result<(), ServerError> {
        self.datasource
            .set(USERS.collection(), &user.uid, USERS.encode(user)?)
            .await
    }

    async fn delete(&self, uid: &str) -> Result<(), ServerError> {
        self.datasource.delete(USERS.collection(), uid).await
    }

    async fn organization(&self) -> Result<Organization, ServerError> {
        Ok(Organization {
            blocks: BLOCKS.decode_all(self.datasource.list(BLOCKS.collection()).await?)?,
            regions: REGIONS.decode_all(self.datasource.list(REGIONS.collection()).await?)?,
            bases: BASES.decode_all(self.datasource.list(BASES.collection()).await?)?,
        })
    }

    async fn save_block(&self, block: &Block) -> Result<(), ServerError> {
        self.datasource
            .set(BLOCKS.collection(), &block.id, BLOCKS.encode(block)?)
            .await
    }

    async fn save_region(&self, region: &Region) -> Result<(), ServerError> {
        self.datasource
            .set(REGIONS.collection(), &region.id, REGIONS.encode(region)?)
            .await
    }

    async fn save_base(&self, base: &Base) -> Result<(), ServerError> {
        self.datasource
            .set(BASES.collection(), &base.id, BASES.encode(base)?)
            .await
    }
}
