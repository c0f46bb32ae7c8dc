//! Japanese display labels, as shown in the admin screens.

use crate::entities::{MismatchKind, TransactionStatus, UserRole, UserStatus};

pub(crate) fn status_label(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "未申請",
        TransactionStatus::Submitted => "申請中",
        TransactionStatus::Rejected => "差戻し",
        TransactionStatus::Approved => "承認済",
    }
}

pub(crate) fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::User => "一般ユーザー",
        UserRole::BaseManager => "拠点長",
        UserRole::RegionManager => "地域長",
        UserRole::BlockManager => "ブロック長",
        UserRole::Admin => "管理者",
    }
}

pub(crate) fn user_status_label(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "有効",
        UserStatus::Inactive => "無効",
        UserStatus::Pending => "招待中",
    }
}

pub(crate) fn mismatch_label(kind: MismatchKind) -> &'static str {
    match kind {
        MismatchKind::NotRegistered => "未登録",
        MismatchKind::DateMismatch => "日付不一致",
        MismatchKind::AmountMismatch => "金額不一致",
    }
}

impl TransactionStatus {
    pub fn label(&self) -> &'static str {
        status_label(*self)
    }
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        role_label(*self)
    }
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        user_status_label(*self)
    }
}

impl MismatchKind {
    pub fn label(&self) -> &'static str {
        mismatch_label(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_japanese() {
        assert_eq!(TransactionStatus::Rejected.label(), "差戻し");
        assert_eq!(UserRole::RegionManager.label(), "地域長");
        assert_eq!(UserStatus::Pending.label(), "招待中");
        assert_eq!(MismatchKind::AmountMismatch.label(), "金額不一致");
    }
}
