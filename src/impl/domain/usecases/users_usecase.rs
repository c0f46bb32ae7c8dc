use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fractic_server_error::ServerError;
use uuid::Uuid;

use crate::{
    domain::{
        logic::{
            access_policy::{can_edit_user, ensure, is_administrator},
            paginator::paginate,
            user_filter,
        },
        repositories::{auth_repository::AuthRepository, users_repository::UsersRepository},
    },
    entities::{
        Base, Block, Organization, Region, Session, User, UserInfo, UserListing, UserQuery,
        UserRole, UserStatus, UserUpdate,
    },
    errors::{
        AdminAlreadyExists, CannotDeleteSelf, InvalidOrganizationPlacement, MissingRequiredField,
        PasswordTooShort, PermissionDenied, UserNotFound,
    },
};

#[async_trait]
pub trait UsersUsecase: Send + Sync {
    /// Access-relevant profile of the signed-in account. Accounts without a
    /// profile get the least-privileged role.
    async fn current_user_info(&self, session: &Session) -> Result<UserInfo, ServerError>;

    async fn user(&self, session: &Session, uid: &str) -> Result<User, ServerError>;

    async fn list_users(
        &self,
        session: &Session,
        query: &UserQuery,
    ) -> Result<UserListing, ServerError>;

    async fn update_user(
        &self,
        session: &Session,
        uid: &str,
        update: UserUpdate,
    ) -> Result<User, ServerError>;

    async fn delete_user(&self, session: &Session, uid: &str) -> Result<(), ServerError>;

    async fn organization(&self) -> Result<Organization, ServerError>;

    async fn add_block(&self, session: &Session, name: &str) -> Result<Block, ServerError>;

    async fn add_region(
        &self,
        session: &Session,
        block_id: &str,
        name: &str,
    ) -> Result<Region, ServerError>;

    async fn add_base(
        &self,
        session: &Session,
        region_id: &str,
        name: &str,
    ) -> Result<Base, ServerError>;

    /// Creates the first administrator account. Refused once any admin
    /// profile exists.
    async fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, ServerError>;
}

pub(crate) struct UsersUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    users_repository: Arc<R1>,
    auth_repository: Arc<R2>,
    page_size: usize,
    min_password_length: usize,
}

impl<R1, R2> UsersUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    pub(crate) fn new(
        users_repository: Arc<R1>,
        auth_repository: Arc<R2>,
        page_size: usize,
        min_password_length: usize,
    ) -> Self {
        Self {
            users_repository,
            auth_repository,
            page_size,
            min_password_length,
        }
    }

    async fn require_admin(&self, session: &Session, action: &str) -> Result<UserInfo, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(is_administrator(&actor), action)?;
        Ok(actor)
    }
}

/// Profile of the signed-in account, looked up by email.
pub(crate) async fn actor_profile<U>(users: &U, session: &Session) -> Result<Option<User>, ServerError>
where
    U: UsersRepository + ?Sized,
{
    users.find_by_email(session.email()).await
}

pub(crate) fn actor_info(session: &Session, profile: Option<&User>) -> UserInfo {
    match profile {
        Some(user) => user.info(),
        None => UserInfo {
            uid: session.uid().to_string(),
            email: session.email().to_string(),
            role: UserRole::User,
            block_id: None,
            block_name: None,
            region_id: None,
            base_id: None,
        },
    }
}

pub(crate) async fn resolve_actor<U>(users: &U, session: &Session) -> Result<UserInfo, ServerError>
where
    U: UsersRepository + ?Sized,
{
    let profile = actor_profile(users, session).await?;
    Ok(actor_info(session, profile.as_ref()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks block > region > base consistency and copies the names of the
/// chosen units onto the profile.
fn place(user: &mut User, org: &Organization, update: &UserUpdate) -> Result<(), ServerError> {
    let block_id = non_empty(update.block_id.clone());
    let region_id = non_empty(update.region_id.clone());
    let base_id = non_empty(update.base_id.clone());

    let block = match &block_id {
        Some(id) => Some(org.block(id).ok_or_else(|| {
            InvalidOrganizationPlacement::new(&format!("unknown block '{id}'"))
        })?),
        None => None,
    };
    let region = match &region_id {
        Some(id) => {
            let region = org.region(id).ok_or_else(|| {
                InvalidOrganizationPlacement::new(&format!("unknown region '{id}'"))
            })?;
            if block_id.as_deref() != Some(region.block_id.as_str()) {
                return Err(InvalidOrganizationPlacement::new(&format!(
                    "region '{id}' is not part of the selected block"
                )));
            }
            Some(region)
        }
        None => None,
    };
    let base = match &base_id {
        Some(id) => {
            let base = org.base(id).ok_or_else(|| {
                InvalidOrganizationPlacement::new(&format!("unknown base '{id}'"))
            })?;
            if region_id.as_deref() != Some(base.region_id.as_str()) {
                return Err(InvalidOrganizationPlacement::new(&format!(
                    "base '{id}' is not part of the selected region"
                )));
            }
            Some(base)
        }
        None => None,
    };

    user.block_name = block.map(|b| b.name.clone());
    user.region_name = region.map(|r| r.name.clone());
    user.base_name = base.map(|b| b.name.clone());
    user.block_id = block_id;
    user.region_id = region_id;
    user.base_id = base_id;
    Ok(())
}

fn required_name(name: &str) -> Result<String, ServerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MissingRequiredField::new("name"));
    }
    Ok(name.to_string())
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl<R1, R2> UsersUsecase for UsersUsecaseImpl<R1, R2>
where
    R1: UsersRepository,
    R2: AuthRepository,
{
    async fn current_user_info(&self, session: &Session) -> Result<UserInfo, ServerError> {
        resolve_actor(self.users_repository.as_ref(), session).await
    }

    async fn user(&self, session: &Session, uid: &str) -> Result<User, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(can_edit_user(&actor, uid), "view this user")?;
        self.users_repository
            .get(uid)
            .await?
            .ok_or_else(|| UserNotFound::new(uid))
    }

    async fn list_users(
        &self,
        session: &Session,
        query: &UserQuery,
    ) -> Result<UserListing, ServerError> {
        self.require_admin(session, "list users").await?;
        let users = self.users_repository.list().await?;
        let total_users = users.len();
        let filtered = user_filter::apply(users, query);
        Ok(UserListing {
            page: paginate(filtered, query.page, self.page_size),
            total_users,
        })
    }

    async fn update_user(
        &self,
        session: &Session,
        uid: &str,
        update: UserUpdate,
    ) -> Result<User, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(can_edit_user(&actor, uid), "edit this user")?;
        let mut user = self
            .users_repository
            .get(uid)
            .await?
            .ok_or_else(|| UserNotFound::new(uid))?;

        if !is_administrator(&actor) && (update.role != user.role || update.status != user.status)
        {
            return Err(PermissionDenied::new("change your own role or status"));
        }

        let org = self.users_repository.organization().await?;
        place(&mut user, &org, &update)?;
        user.display_name = non_empty(update.display_name);
        user.card_number = non_empty(update.card_number);
        user.employee_id = non_empty(update.employee_id);
        user.role = update.role;
        user.status = update.status;
        user.updated_at = Utc::now();
        self.users_repository.save(&user).await?;

        tracing::info!(uid, editor = %actor.uid, role = %user.role, "user profile updated");
        Ok(user)
    }

    async fn delete_user(&self, session: &Session, uid: &str) -> Result<(), ServerError> {
        let actor = self.require_admin(session, "delete users").await?;
        if actor.uid == uid {
            return Err(CannotDeleteSelf::new());
        }
        if self.users_repository.get(uid).await?.is_none() {
            return Err(UserNotFound::new(uid));
        }
        self.users_repository.delete(uid).await?;
        tracing::info!(uid, by = %actor.uid, "user deleted");
        Ok(())
    }

    async fn organization(&self) -> Result<Organization, ServerError> {
        self.users_repository.organization().await
    }

    async fn add_block(&self, session: &Session, name: &str) -> Result<Block, ServerError> {
        self.require_admin(session, "maintain the organization").await?;
        let block = Block {
            id: new_id(),
            name: required_name(name)?,
        };
        self.users_repository.save_block(&block).await?;
        Ok(block)
    }

    async fn add_region(
        &self,
        session: &Session,
        block_id: &str,
        name: &str,
    ) -> Result<Region, ServerError> {
        self.require_admin(session, "maintain the organization").await?;
        let org = self.users_repository.organization().await?;
        if org.block(block_id).is_none() {
            return Err(InvalidOrganizationPlacement::new(&format!(
                "unknown block '{block_id}'"
            )));
        }
        let region = Region {
            id: new_id(),
            name: required_name(name)?,
            block_id: block_id.to_string(),
        };
        self.users_repository.save_region(&region).await?;
        Ok(region)
    }

    async fn add_base(
        &self,
        session: &Session,
        region_id: &str,
        name: &str,
    ) -> Result<Base, ServerError> {
        self.require_admin(session, "maintain the organization").await?;
        let org = self.users_repository.organization().await?;
        if org.region(region_id).is_none() {
            return Err(InvalidOrganizationPlacement::new(&format!(
                "unknown region '{region_id}'"
            )));
        }
        let base = Base {
            id: new_id(),
            name: required_name(name)?,
            region_id: region_id.to_string(),
        };
        self.users_repository.save_base(&base).await?;
        Ok(base)
    }

    async fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, ServerError> {
        let users = self.users_repository.list().await?;
        if users.iter().any(|u| u.role.is_admin()) {
            return Err(AdminAlreadyExists::new());
        }
        if password.chars().count() < self.min_password_length {
            return Err(PasswordTooShort::new(self.min_password_length));
        }

        let session = self.auth_repository.create_account(email, password).await?;
        let mut admin = User::new(session.uid().to_string(), session.email().to_string(), Utc::now());
        admin.display_name = non_empty(display_name.map(str::to_string));
        admin.role = UserRole::Admin;
        admin.status = UserStatus::Active;
        self.users_repository.save(&admin).await?;
        self.auth_repository
            .set_role_claim(&admin.uid, UserRole::Admin)
            .await?;

        tracing::info!(uid = %admin.uid, "administrator account bootstrapped");
        Ok(admin)
    }
}
