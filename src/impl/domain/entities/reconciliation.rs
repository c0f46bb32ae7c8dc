use std::fmt;

use super::{
    card_statement::{CardTransaction, SkippedRow},
    transaction::ExpenseTransaction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// No recorded transaction matches the card row at all.
    NotRegistered,
    /// Amount matches a recorded transaction, date does not.
    DateMismatch,
    /// Date matches a recorded transaction, amount does not.
    AmountMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub card_transaction: CardTransaction,
    /// The recorded transaction the row was compared against (absent for
    /// `NotRegistered`).
    pub system_transaction: Option<ExpenseTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationReport {
    pub examined: usize,
    pub matched: usize,
    pub mismatches: Vec<Mismatch>,
    pub notifications_created: usize,
    /// Employee ids of unregistered rows that map to no user.
    pub unresolved_employee_ids: Vec<String>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl MismatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchKind::NotRegistered => "not_registered",
            MismatchKind::DateMismatch => "date_mismatch",
            MismatchKind::AmountMismatch => "amount_mismatch",
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReconciliationReport {
    pub fn count(&self, kind: MismatchKind) -> usize {
        self.mismatches.iter().filter(|m| m.kind == kind).count()
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}
