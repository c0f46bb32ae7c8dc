use std::{fs, path::PathBuf};

use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    entities::CardStatementLayout,
    errors::{InvalidRon, ReadError},
};

/// Runtime settings. Every field has a default, so a RON file only needs to
/// list what it overrides:
///
/// ```ron
/// (
///     invite_base_url: "https://expenses.example.com",
///     receipts_dir: "/var/lib/expense-admin/receipts",
/// )
/// ```
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(default)]
pub struct ExpenseAdminConfig {
    /// Stamped on every new transaction.
    pub organization_id: String,
    /// Origin the invite-accept link is built on.
    pub invite_base_url: String,
    pub invite_ttl_hours: i64,
    pub min_password_length: usize,
    /// Rows per page in user and transaction listings.
    pub page_size: usize,
    /// Transactions shown on the dashboard.
    pub recent_transactions_limit: usize,
    /// Card and recorded amounts closer than this (in yen) are equal.
    pub amount_tolerance: f64,
    /// Root directory of the local receipt store.
    pub receipts_dir: PathBuf,
    pub card_statement_layout: CardStatementLayout,
}

impl Default for ExpenseAdminConfig {
    fn default() -> Self {
        Self {
            organization_id: "org001".to_string(),
            invite_base_url: "http://localhost:3000".to_string(),
            invite_ttl_hours: 24,
            min_password_length: 6,
            page_size: 20,
            recent_transactions_limit: 5,
            amount_tolerance: 1.0,
            receipts_dir: PathBuf::from("receipts"),
            card_statement_layout: CardStatementLayout::default(),
        }
    }
}

impl ExpenseAdminConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ServerError> {
        from_str(s).map_err(|e| InvalidRon::with_debug("configuration", &e))
    }

    pub fn from_file<P>(path: P) -> Result<Self, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        let s = fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?;
        Self::from_ron_str(&s)
    }
}
