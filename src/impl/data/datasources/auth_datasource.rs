use std::collections::HashMap;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AccountAlreadyExists, AuthenticationFailed, UserNotFound};

/// Custom claims attached to an auth account (e.g. `{"role": "admin"}`).
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Identity provider: email/password accounts plus custom claims.
#[async_trait]
pub trait AuthDatasource: Send + Sync {
    /// Creates an account and returns its uid.
    async fn create_account(&self, email: &str, password: &str) -> Result<String, ServerError>;

    /// Returns the uid if the credentials are valid.
    async fn verify_password(&self, email: &str, password: &str) -> Result<String, ServerError>;

    async fn uid_by_email(&self, email: &str) -> Result<Option<String>, ServerError>;

    async fn set_custom_claims(&self, uid: &str, claims: Claims) -> Result<(), ServerError>;

    async fn custom_claims(&self, uid: &str) -> Result<Option<Claims>, ServerError>;
}

#[derive(Debug)]
struct Account {
    uid: String,
    password: String,
    claims: Claims,
}

/// In-process identity provider for local development and tests. Accounts
/// are keyed by lower-cased email.
#[derive(Debug, Default)]
pub struct MemoryAuthDatasource {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAuthDatasource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthDatasource for MemoryAuthDatasource {
    async fn create_account(&self, email: &str, password: &str) -> Result<String, ServerError> {
        let mut accounts = self.accounts.write().await;
        let key = email_key(email);
        if accounts.contains_key(&key) {
            return Err(AccountAlreadyExists::new(email));
        }
        let uid = Uuid::new_v4().simple().to_string();
        accounts.insert(
            key,
            Account {
                uid: uid.clone(),
                password: password.to_string(),
                claims: Claims::new(),
            },
        );
        Ok(uid)
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<String, ServerError> {
        let accounts = self.accounts.read().await;
        match accounts.get(&email_key(email)) {
            Some(account) if account.password == password => Ok(account.uid.clone()),
            _ => Err(AuthenticationFailed::new()),
        }
    }

    async fn uid_by_email(&self, email: &str) -> Result<Option<String>, ServerError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&email_key(email)).map(|a| a.uid.clone()))
    }

    async fn set_custom_claims(&self, uid: &str, claims: Claims) -> Result<(), ServerError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|a| a.uid == uid)
            .ok_or_else(|| UserNotFound::new(uid))?;
        account.claims = claims;
        Ok(())
    }

    async fn custom_claims(&self, uid: &str) -> Result<Option<Claims>, ServerError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.uid == uid)
            .map(|a| a.claims.clone()))
    }
}
