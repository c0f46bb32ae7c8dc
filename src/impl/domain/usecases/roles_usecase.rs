use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    domain::{
        logic::access_policy::{ensure, is_administrator},
        repositories::{auth_repository::AuthRepository, users_repository::UsersRepository},
        usecases::users_usecase::resolve_actor,
    },
    entities::{RoleSyncEntry, RoleSyncFailure, RoleSyncReport, Session, UserRole},
    errors::MissingUidOrRole,
};

/// Keeps the auth provider's role claims in line with the user profiles.
#[async_trait]
pub trait RolesUsecase: Send + Sync {
    async fn set_user_role(
        &self,
        session: &Session,
        uid: &str,
        role: &str,
    ) -> Result<UserRole, ServerError>;

    async fn sync_all_user_roles(&self, session: &Session) -> Result<RoleSyncReport, ServerError>;
}

pub(crate) struct RolesUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    users_repository: Arc<R1>,
    auth_repository: Arc<R2>,
}

impl<R1, R2> RolesUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    pub(crate) fn new(users_repository: Arc<R1>, auth_repository: Arc<R2>) -> Self {
        Self {
            users_repository,
            auth_repository,
        }
    }
}

#[async_trait]
impl<R1, R2> RolesUsecase for RolesUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    async fn set_user_role(
        &self,
        session: &Session,
        uid: &str,
        role: &str,
    ) -> Result<UserRole, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(is_administrator(&actor), "set user roles")?;
        let (uid, role) = (uid.trim(), role.trim());
        if uid.is_empty() || role.is_empty() {
            return Err(MissingUidOrRole::new());
        }
        let role = role.parse::<UserRole>()?;
        self.auth_repository.set_role_claim(uid, role).await?;
        tracing::info!(uid, role = %role, "role claim set");
        Ok(role)
    }

    async fn sync_all_user_roles(&self, session: &Session) -> Result<RoleSyncReport, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(is_administrator(&actor), "sync user roles")?;

        let mut report = RoleSyncReport::default();
        for user in self.users_repository.list().await? {
            let email = user.email.trim();
            if email.is_empty() {
                report.push_failure(RoleSyncFailure {
                    doc_id: Some(user.uid.clone()),
                    email: None,
                    error: "No email".to_string(),
                });
                continue;
            }
            let outcome = match self.auth_repository.uid_by_email(email).await {
                Ok(Some(uid)) => self
                    .auth_repository
                    .set_role_claim(&uid, user.role)
                    .await
                    .map(|_| uid)
                    .map_err(|e| e.to_string()),
                Ok(None) => Err("No auth account for this email".to_string()),
                Err(e) => Err(e.to_string()),
            };
            match outcome {
                Ok(uid) => report.push_result(RoleSyncEntry {
                    email: email.to_string(),
                    role: user.role,
                    uid,
                }),
                Err(error) => {
                    tracing::warn!(doc_id = %user.uid, %error, "role sync failed");
                    report.push_failure(RoleSyncFailure {
                        doc_id: Some(user.uid.clone()),
                        email: Some(email.to_string()),
                        error,
                    });
                }
            }
        }

        tracing::info!(synced = report.synced, errors = report.errors, "role claims synced");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::domain::usecases::test_support::{Auth, Fixture, Users};

    fn usecase(f: &Fixture) -> RolesUsecaseImpl<Users, Auth> {
        RolesUsecaseImpl::new(f.users.clone(), f.auth.clone())
    }

    #[tokio::test]
    async fn set_role_requires_uid_and_known_role() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let account = f.auth.create_account("u1@example.com", "secret1").await.unwrap();
        let uc = usecase(&f);

        assert!(uc.set_user_role(&admin, "", "admin").await.is_err());
        assert!(uc.set_user_role(&admin, account.uid(), " ").await.is_err());
        assert!(uc.set_user_role(&admin, account.uid(), "cfo").await.is_err());

        let role = uc
            .set_user_role(&admin, account.uid(), "block_manager")
            .await
            .unwrap();
        assert_eq!(role, UserRole::BlockManager);
        assert_eq!(
            f.auth.role_claim(account.uid()).await.unwrap(),
            Some(UserRole::BlockManager)
        );
    }

    #[tokio::test]
    async fn sync_reports_profiles_without_accounts() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        f.user("m1", UserRole::RegionManager, Some("r1")).await;
        let admin_account = f.auth.create_account("a1@example.com", "secret1").await.unwrap();
        let manager_account = f.auth.create_account("m1@example.com", "secret1").await.unwrap();
        f.user("u9", UserRole::User, None).await;

        let report = usecase(&f).sync_all_user_roles(&admin).await.unwrap();
        assert_eq!(report.synced, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.error_details[0].doc_id.as_deref(), Some("u9"));
        assert_eq!(
            f.auth.role_claim(manager_account.uid()).await.unwrap(),
            Some(UserRole::RegionManager)
        );
        assert_eq!(
            f.auth.role_claim(admin_account.uid()).await.unwrap(),
            Some(UserRole::Admin)
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["synced"], json!(2));
        assert_eq!(value["errorDetails"][0]["docId"], json!("u9"));
        assert_eq!(value["results"][1]["role"], json!("region_manager"));
    }

    #[tokio::test]
    async fn roles_are_admin_only() {
        let f = Fixture::new().await;
        let user = f.user("u1", UserRole::User, None).await;
        let uc = usecase(&f);
        assert!(uc.set_user_role(&user, "u1", "admin").await.is_err());
        assert!(uc.sync_all_user_roles(&user).await.is_err());
    }
}
