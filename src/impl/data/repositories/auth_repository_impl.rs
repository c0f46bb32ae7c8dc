use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{
    data::datasources::auth_datasource::{AuthDatasource, Claims},
    domain::repositories::auth_repository::AuthRepository,
    entities::{Session, UserRole},
};

const ROLE_CLAIM: &str = "role";

pub(crate) struct AuthRepositoryImpl<AU: AuthDatasource> {
    datasource: Arc<AU>,
}

impl<AU: AuthDatasource> AuthRepositoryImpl<AU> {
    pub(crate) fn new(datasource: Arc<AU>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl<AU: AuthDatasource> AuthRepository for AuthRepositoryImpl<AU> {
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, ServerError> {
        let uid = self.datasource.create_account(email, password).await?;
        Ok(Session::new(uid, email.trim()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError> {
        let uid = self.datasource.verify_password(email, password).await?;
        Ok(Session::new(uid, email.trim()))
    }

    async fn uid_by_email(&self, email: &str) -> Result<Option<String>, ServerError> {
        self.datasource.uid_by_email(email).await
    }

    async fn set_role_claim(&self, uid: &str, role: UserRole) -> Result<(), ServerError> {
        let mut claims = self.datasource.custom_claims(uid).await?.unwrap_or_default();
        claims.insert(ROLE_CLAIM.to_string(), Value::String(role.as_str().to_string()));
        self.datasource.set_custom_claims(uid, claims).await
    }

    async fn role_claim(&self, uid: &str) -> Result<Option<UserRole>, ServerError> {
        let claims: Option<Claims> = self.datasource.custom_claims(uid).await?;
        claims
            .as_ref()
            .and_then(|c| c.get(ROLE_CLAIM))
            .and_then(Value::as_str)
            .map(|role| role.parse::<UserRole>())
            .transpose()
    }
}
