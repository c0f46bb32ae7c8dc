use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::user::UserRole;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Submitted,
    Rejected,
    Approved,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRoute {
    #[default]
    Regional,
    Headquarters,
    HeadquartersToCfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTransaction {
    pub id: String,
    pub user_id: String,
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_id: Option<String>,
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub merchant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_destination: Option<String>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub approval_route: ApprovalRoute,
    #[serde(default)]
    pub receipt_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

/// Input of the "new transaction" form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub merchant_name: String,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    pub expense_destination: Option<String>,
}

/// Input of the "edit transaction" form. All fields but the memo are
/// required.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEdit {
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub merchant_name: String,
    pub category_id: String,
    pub memo: Option<String>,
}

/// One row of a transaction import file (`date,amount,merchant,memo`).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub line: u64,
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub merchant_name: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub status: Option<TransactionStatus>,
    /// 1-based.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    pub id: String,
    pub transaction_id: String,
    pub action: ApprovalAction,
    pub approver_uid: String,
    pub approver_name: String,
    pub approver_role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetail {
    pub transaction: ExpenseTransaction,
    pub receipts: Vec<super::receipt::Receipt>,
    pub history: Vec<ApprovalRecord>,
}

// --

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Submitted => "submitted",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::Approved => "approved",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Submitted => "submit",
            ApprovalAction::Approved => "approve",
            ApprovalAction::Rejected => "reject",
        }
    }
}
