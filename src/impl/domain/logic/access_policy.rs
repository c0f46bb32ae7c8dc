use fractic_server_error::ServerError;

use crate::{
    entities::{ExpenseTransaction, TransactionScope, UserInfo, UserRole},
    errors::PermissionDenied,
};

/// Transactions visible to the user. Managers without the organization unit
/// their role relies on fall back to their own transactions.
pub(crate) fn transaction_scope(info: &UserInfo) -> TransactionScope {
    match (info.role, &info.block_id, &info.region_id) {
        (UserRole::Admin, _, _) => TransactionScope::All,
        (UserRole::BlockManager, Some(block_id), _) => TransactionScope::Block(block_id.clone()),
        (UserRole::RegionManager | UserRole::BaseManager, _, Some(region_id)) => {
            TransactionScope::Region(region_id.clone())
        }
        _ => TransactionScope::Own(info.uid.clone()),
    }
}

/// Admin-only operations: invitations, organization and category master
/// data, card reconciliation, deleting users, changing roles.
pub(crate) fn is_administrator(actor: &UserInfo) -> bool {
    actor.role.is_admin()
}

pub(crate) fn can_edit_user(actor: &UserInfo, target_uid: &str) -> bool {
    is_administrator(actor) || actor.uid == target_uid
}

pub(crate) fn can_view_transaction(actor: &UserInfo, tx: &ExpenseTransaction) -> bool {
    tx.user_id == actor.uid || transaction_scope(actor).covers(tx)
}

pub(crate) fn can_edit_transaction(actor: &UserInfo, tx: &ExpenseTransaction) -> bool {
    tx.user_id == actor.uid || is_administrator(actor)
}

/// Approving or rejecting requires a managerial role whose scope covers the
/// transaction. Nobody reviews their own expenses.
pub(crate) fn can_review_transaction(actor: &UserInfo, tx: &ExpenseTransaction) -> bool {
    actor.role != UserRole::User
        && tx.user_id != actor.uid
        && transaction_scope(actor).covers(tx)
}

pub(crate) fn ensure(allowed: bool, action: &str) -> Result<(), ServerError> {
    if allowed {
        Ok(())
    } else {
        Err(PermissionDenied::new(action))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::entities::{ApprovalRoute, TransactionStatus};

    fn info(uid: &str, role: UserRole, block: Option<&str>, region: Option<&str>) -> UserInfo {
        UserInfo {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
            role,
            block_id: block.map(Into::into),
            block_name: None,
            region_id: region.map(Into::into),
            base_id: None,
        }
    }

    fn tx(user_id: &str, block: &str, region: &str) -> ExpenseTransaction {
        let now = Utc::now();
        ExpenseTransaction {
            id: "t1".into(),
            user_id: user_id.into(),
            organization_id: "org001".into(),
            block_id: Some(block.into()),
            region_id: Some(region.into()),
            base_id: None,
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            amount: 100.0,
            merchant_name: "Shop".into(),
            category_id: None,
            memo: None,
            expense_destination: None,
            status: TransactionStatus::Submitted,
            approval_route: ApprovalRoute::Regional,
            receipt_count: 0,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_at: None,
        }
    }

    #[test]
    fn scope_follows_role_and_placement() {
        assert_eq!(
            transaction_scope(&info("a", UserRole::Admin, None, None)),
            TransactionScope::All
        );
        assert_eq!(
            transaction_scope(&info("b", UserRole::BlockManager, Some("b1"), Some("r1"))),
            TransactionScope::Block("b1".into())
        );
        assert_eq!(
            transaction_scope(&info("r", UserRole::RegionManager, Some("b1"), Some("r1"))),
            TransactionScope::Region("r1".into())
        );
        assert_eq!(
            transaction_scope(&info("s", UserRole::BaseManager, None, Some("r2"))),
            TransactionScope::Region("r2".into())
        );
        assert_eq!(
            transaction_scope(&info("u", UserRole::User, Some("b1"), Some("r1"))),
            TransactionScope::Own("u".into())
        );
    }

    #[test]
    fn managers_without_placement_only_see_their_own() {
        assert_eq!(
            transaction_scope(&info("b", UserRole::BlockManager, None, Some("r1"))),
            TransactionScope::Own("b".into())
        );
        assert_eq!(
            transaction_scope(&info("r", UserRole::RegionManager, Some("b1"), None)),
            TransactionScope::Own("r".into())
        );
    }

    #[test]
    fn review_requires_covering_scope_and_another_owner() {
        let manager = info("m", UserRole::RegionManager, Some("b1"), Some("r1"));
        assert!(can_review_transaction(&manager, &tx("u", "b1", "r1")));
        assert!(!can_review_transaction(&manager, &tx("u", "b1", "r2")));
        assert!(!can_review_transaction(&manager, &tx("m", "b1", "r1")));

        let employee = info("e", UserRole::User, Some("b1"), Some("r1"));
        assert!(!can_review_transaction(&employee, &tx("u", "b1", "r1")));
    }

    #[test]
    fn only_admins_edit_other_users() {
        let admin = info("a", UserRole::Admin, None, None);
        let employee = info("e", UserRole::User, None, None);
        assert!(can_edit_user(&admin, "e"));
        assert!(can_edit_user(&employee, "e"));
        assert!(!can_edit_user(&employee, "a"));
    }

    #[test]
    fn owners_always_see_their_transactions() {
        let manager = info("m", UserRole::BlockManager, Some("b9"), None);
        assert!(can_view_transaction(&manager, &tx("m", "b1", "r1")));
        assert!(!can_view_transaction(&manager, &tx("u", "b1", "r1")));
        assert!(can_edit_transaction(&manager, &tx("m", "b1", "r1")));
        assert!(!can_edit_transaction(&manager, &tx("u", "b9", "r1")));
    }
}
