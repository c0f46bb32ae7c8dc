use chrono::{DateTime, Utc};

use super::reconciliation::MismatchKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CardMismatch,
    Reminder,
    Approval,
    Rejection,
}

/// Card statement row that triggered a `card_mismatch` notification.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchDetails {
    pub transaction_date: String,
    pub amount: f64,
    pub merchant_name: String,
    pub mismatch_type: MismatchKind,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MismatchDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_transaction_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationListing {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub total_count: usize,
}
