use super::transaction::ExpenseTransaction;

/// Which transactions a user is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionScope {
    All,
    Block(String),
    Region(String),
    Own(String),
}

impl TransactionScope {
    pub fn covers(&self, tx: &ExpenseTransaction) -> bool {
        match self {
            TransactionScope::All => true,
            TransactionScope::Block(id) => tx.block_id.as_deref() == Some(id.as_str()),
            TransactionScope::Region(id) => tx.region_id.as_deref() == Some(id.as_str()),
            TransactionScope::Own(uid) => tx.user_id == *uid,
        }
    }
}
