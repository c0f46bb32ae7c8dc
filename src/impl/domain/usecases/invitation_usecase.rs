use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use fractic_server_error::ServerError;
use regex::Regex;
use uuid::Uuid;

use crate::{
    domain::{
        logic::access_policy::{ensure, is_administrator},
        repositories::{auth_repository::AuthRepository, users_repository::UsersRepository},
        usecases::users_usecase::resolve_actor,
    },
    entities::{Invitation, Session, User, UserRole, UserStatus},
    errors::{
        EmailAlreadyRegistered, InvalidEmail, InviteExpired, InviteInvalid, PasswordMismatch,
        PasswordTooShort,
    },
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("hardcoded regex should be valid")
});

const INVITE_UID_PREFIX: &str = "invite_";
const INVITE_UID_TOKEN_CHARS: usize = 20;

#[async_trait]
pub trait InvitationUsecase: Send + Sync {
    /// Creates a pending profile for `email` and returns the link the
    /// invitee uses to activate it.
    async fn create_invite(&self, session: &Session, email: &str)
        -> Result<Invitation, ServerError>;

    /// Pending profile the token belongs to.
    async fn verify(&self, token: &str) -> Result<User, ServerError>;

    /// Creates the sign-in account and activates the profile.
    async fn accept(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Session, ServerError>;
}

pub(crate) struct InvitationUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    users_repository: Arc<R1>,
    auth_repository: Arc<R2>,
    base_url: String,
    ttl: Duration,
    min_password_length: usize,
}

impl<R1, R2> InvitationUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    pub(crate) fn new(
        users_repository: Arc<R1>,
        auth_repository: Arc<R2>,
        base_url: impl Into<String>,
        ttl_hours: i64,
        min_password_length: usize,
    ) -> Self {
        Self {
            users_repository,
            auth_repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ttl: Duration::hours(ttl_hours),
            min_password_length,
        }
    }
}

#[async_trait]
impl<R1, R2> InvitationUsecase for InvitationUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    async fn create_invite(
        &self,
        session: &Session,
        email: &str,
    ) -> Result<Invitation, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(is_administrator(&actor), "invite users")?;

        let email = email.trim();
        if !EMAIL.is_match(email) {
            return Err(InvalidEmail::new(email));
        }
        if self.users_repository.find_by_email(email).await?.is_some()
            || self.auth_repository.uid_by_email(email).await?.is_some()
        {
            return Err(EmailAlreadyRegistered::new(email));
        }

        let token = Uuid::new_v4().simple().to_string();
        let uid = format!(
            "{INVITE_UID_PREFIX}{}",
            &token[..INVITE_UID_TOKEN_CHARS.min(token.len())]
        );
        let now = Utc::now();
        let mut user = User::new(uid, email, now);
        user.role = UserRole::User;
        user.status = UserStatus::Pending;
        user.invite_token = Some(token.clone());
        user.token_created_at = Some(now);
        self.users_repository.save(&user).await?;

        tracing::info!(uid = %user.uid, by = %actor.uid, "invitation created");
        Ok(Invitation {
            url: format!("{}/invite-accept?token={}", self.base_url, token),
            uid: user.uid,
            email: user.email,
            token,
            expires_at: now + self.ttl,
        })
    }

    async fn verify(&self, token: &str) -> Result<User, ServerError> {
        let user = self
            .users_repository
            .find_pending_by_invite_token(token.trim())
            .await?
            .ok_or_else(|| InviteInvalid::new())?;
        let created_at = user.token_created_at.ok_or_else(|| InviteInvalid::new())?;
        if Utc::now() - created_at > self.ttl {
            return Err(InviteExpired::new());
        }
        Ok(user)
    }

    async fn accept(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Session, ServerError> {
        let pending = self.verify(token).await?;
        if password.chars().count() < self.min_password_length {
            return Err(PasswordTooShort::new(self.min_password_length));
        }
        if password != confirmation {
            return Err(PasswordMismatch::new());
        }

        let session = self
            .auth_repository
            .create_account(&pending.email, password)
            .await?;
        let activated = User {
            uid: session.uid().to_string(),
            status: UserStatus::Active,
            invite_token: None,
            token_created_at: None,
            updated_at: Utc::now(),
            ..pending.clone()
        };
        self.users_repository.save(&activated).await?;
        self.users_repository.delete(&pending.uid).await?;
        self.auth_repository
            .set_role_claim(&activated.uid, activated.role)
            .await?;

        tracing::info!(uid = %activated.uid, placeholder = %pending.uid, "invitation accepted");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::usecases::test_support::{Auth, Fixture, Users};

    fn usecase(f: &Fixture) -> InvitationUsecaseImpl<Users, Auth> {
        InvitationUsecaseImpl::new(
            f.users.clone(),
            f.auth.clone(),
            "https://expenses.example.com/",
            24,
            6,
        )
    }

    #[tokio::test]
    async fn invite_creates_pending_profile() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;

        let invite = usecase(&f)
            .create_invite(&admin, "  new@example.com ")
            .await
            .unwrap();
        assert_eq!(invite.email, "new@example.com");
        assert_eq!(
            invite.url,
            format!("https://expenses.example.com/invite-accept?token={}", invite.token)
        );
        assert_eq!(invite.uid, format!("invite_{}", &invite.token[..20]));

        let pending = f.users.get(&invite.uid).await.unwrap().unwrap();
        assert_eq!(pending.status, UserStatus::Pending);
        assert_eq!(pending.role, UserRole::User);
        assert_eq!(pending.invite_token.as_deref(), Some(invite.token.as_str()));
    }

    #[tokio::test]
    async fn invite_validates_email_and_permission() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let user = f.user("u1", UserRole::User, None).await;
        let uc = usecase(&f);

        assert!(uc.create_invite(&admin, "").await.is_err());
        assert!(uc.create_invite(&admin, "not-an-email").await.is_err());
        assert!(uc.create_invite(&admin, "U1@example.com").await.is_err());
        assert!(uc.create_invite(&user, "new@example.com").await.is_err());
    }

    #[tokio::test]
    async fn accept_activates_and_rekeys_profile() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let uc = usecase(&f);
        let invite = uc.create_invite(&admin, "new@example.com").await.unwrap();

        assert!(uc.accept(&invite.token, "12345", "12345").await.is_err());
        assert!(uc.accept(&invite.token, "secret1", "secret2").await.is_err());
        let session = uc.accept(&invite.token, "secret1", "secret1").await.unwrap();

        assert_eq!(f.users.get(&invite.uid).await.unwrap(), None);
        let active = f.users.get(session.uid()).await.unwrap().unwrap();
        assert_eq!(active.status, UserStatus::Active);
        assert_eq!(active.invite_token, None);
        assert_eq!(active.email, "new@example.com");
        assert_eq!(
            f.auth.sign_in("new@example.com", "secret1").await.unwrap().uid(),
            session.uid()
        );
        assert_eq!(f.auth.role_claim(session.uid()).await.unwrap(), Some(UserRole::User));

        assert!(uc.verify(&invite.token).await.is_err());
    }

    #[tokio::test]
    async fn expired_and_unknown_tokens_are_refused() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let uc = usecase(&f);
        let invite = uc.create_invite(&admin, "late@example.com").await.unwrap();

        let mut pending = f.users.get(&invite.uid).await.unwrap().unwrap();
        pending.token_created_at = Some(Utc::now() - Duration::hours(25));
        f.users.save(&pending).await.unwrap();

        assert!(uc.verify(&invite.token).await.is_err());
        assert!(uc.accept(&invite.token, "secret1", "secret1").await.is_err());
        assert!(uc.verify("unknown").await.is_err());
    }
}
