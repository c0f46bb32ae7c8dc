use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::errors::InvalidRole;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    BaseManager,
    RegionManager,
    BlockManager,
    Admin,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    /// Invited, account not yet activated.
    Pending,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    /// Last four digits of the corporate card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields an editor may change on a user profile. Organization names are
/// resolved from the ids when the update is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub card_number: Option<String>,
    pub employee_id: Option<String>,
    pub block_id: Option<String>,
    pub region_id: Option<String>,
    pub base_id: Option<String>,
}

/// Profile information relevant for access decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub uid: String,
    pub email: String,
    pub role: UserRole,
    pub block_id: Option<String>,
    pub block_name: Option<String>,
    pub region_id: Option<String>,
    pub base_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardRegistration {
    #[default]
    Any,
    Registered,
    Unregistered,
}

/// User management list filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    /// Matched case-insensitively against email and display name, and as a
    /// substring of the employee id.
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub card: CardRegistration,
    /// 1-based.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserListing {
    pub page: super::page::Page<User>,
    /// Number of users before filtering.
    pub total_users: usize,
}

// --

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::BaseManager => "base_manager",
            UserRole::RegionManager => "region_manager",
            UserRole::BlockManager => "block_manager",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(UserRole::User),
            "base_manager" => Ok(UserRole::BaseManager),
            "region_manager" => Ok(UserRole::RegionManager),
            "block_manager" => Ok(UserRole::BlockManager),
            "admin" => Ok(UserRole::Admin),
            other => Err(InvalidRole::new(other)),
        }
    }
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Pending => "pending",
        }
    }
}

impl User {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
            role: UserRole::User,
            status: UserStatus::Active,
            card_number: None,
            employee_id: None,
            block_id: None,
            block_name: None,
            region_id: None,
            region_name: None,
            base_id: None,
            base_name: None,
            invite_token: None,
            token_created_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_card(&self) -> bool {
        self.card_number.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    pub fn info(&self) -> UserInfo {
        UserInfo {
            uid: self.uid.clone(),
            email: self.email.clone(),
            role: self.role,
            block_id: self.block_id.clone(),
            block_name: self.block_name.clone(),
            region_id: self.region_id.clone(),
            base_id: self.base_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_wire_name() {
        for role in [
            UserRole::User,
            UserRole::BaseManager,
            UserRole::RegionManager,
            UserRole::BlockManager,
            UserRole::Admin,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("cfo".parse::<UserRole>().is_err());
    }

    #[test]
    fn label_falls_back_to_email() {
        let mut user = User::new("u1", "taro@example.com", Utc::now());
        assert_eq!(user.label(), "taro@example.com");
        user.display_name = Some(String::new());
        assert_eq!(user.label(), "taro@example.com");
        user.display_name = Some("Taro".into());
        assert_eq!(user.label(), "Taro");
    }

    #[test]
    fn empty_card_number_counts_as_unregistered() {
        let mut user = User::new("u1", "taro@example.com", Utc::now());
        assert!(!user.has_card());
        user.card_number = Some(String::new());
        assert!(!user.has_card());
        user.card_number = Some("1234".into());
        assert!(user.has_card());
    }
}
