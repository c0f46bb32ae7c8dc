use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::{
    entities::{ApprovalAction, ExpenseTransaction, TransactionStatus},
    errors::{ApprovedTransactionImmutable, InvalidStatusTransition},
};

/// pending/rejected -> submitted -> approved | rejected.
pub(crate) fn next_status(
    current: TransactionStatus,
    action: ApprovalAction,
) -> Result<TransactionStatus, ServerError> {
    use ApprovalAction as A;
    use TransactionStatus as S;
    match (current, action) {
        (S::Pending | S::Rejected, A::Submitted) => Ok(S::Submitted),
        (S::Submitted, A::Approved) => Ok(S::Approved),
        (S::Submitted, A::Rejected) => Ok(S::Rejected),
        _ => Err(InvalidStatusTransition::new(action.as_str(), current.as_str())),
    }
}

/// Moves the transaction to its next status and stamps the matching
/// timestamps.
pub(crate) fn apply(
    tx: &mut ExpenseTransaction,
    action: ApprovalAction,
    now: DateTime<Utc>,
) -> Result<(), ServerError> {
    tx.status = next_status(tx.status, action)?;
    tx.updated_at = now;
    match action {
        ApprovalAction::Submitted => {
            tx.submitted_at = Some(now);
            tx.approved_at = None;
        }
        ApprovalAction::Approved => tx.approved_at = Some(now),
        ApprovalAction::Rejected => {}
    }
    Ok(())
}

pub(crate) fn ensure_editable(tx: &ExpenseTransaction) -> Result<(), ServerError> {
    if tx.status == TransactionStatus::Approved {
        return Err(ApprovedTransactionImmutable::new(&tx.id));
    }
    Ok(())
}
