use chrono::{DateTime, Utc};

use super::utils::format_yen_digits;
use crate::entities::{
    CardTransaction, ExpenseTransaction, MismatchDetails, MismatchKind, Notification,
    NotificationKind,
};

const CARD_MISMATCH_TITLE: &str = "未登録の経費取引があります";
const APPROVAL_TITLE: &str = "経費が承認されました";
const REJECTION_TITLE: &str = "経費が差し戻されました";

/// Notification telling an employee that a card charge has no recorded
/// expense.
pub(crate) fn card_mismatch(
    user_id: &str,
    card: &CardTransaction,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: String::new(),
        user_id: user_id.to_string(),
        kind: NotificationKind::CardMismatch,
        title: CARD_MISMATCH_TITLE.to_string(),
        message: format!(
            "取引日: {}, 金額: {}円, 加盟店: {}",
            card.raw_date,
            format_yen_digits(card.amount),
            card.merchant_name
        ),
        data: Some(MismatchDetails {
            transaction_date: card.raw_date.clone(),
            amount: card.amount,
            merchant_name: card.merchant_name.clone(),
            mismatch_type: MismatchKind::NotRegistered,
        }),
        related_transaction_id: None,
        read: false,
        created_at: now,
        read_at: None,
    }
}

/// Notification telling the owner that their transaction was reviewed.
pub(crate) fn review_outcome(
    tx: &ExpenseTransaction,
    approved: bool,
    reviewer_name: &str,
    comment: Option<&str>,
    now: DateTime<Utc>,
) -> Notification {
    let (kind, title) = if approved {
        (NotificationKind::Approval, APPROVAL_TITLE)
    } else {
        (NotificationKind::Rejection, REJECTION_TITLE)
    };
    let mut message = format!(
        "取引日: {}, 金額: {}円, 加盟店: {} (担当: {})",
        tx.transaction_date.format("%Y/%m/%d"),
        format_yen_digits(tx.amount),
        tx.merchant_name,
        reviewer_name
    );
    if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
        message.push_str(&format!("\nコメント: {comment}"));
    }
    Notification {
        id: String::new(),
        user_id: tx.user_id.clone(),
        kind,
        title: title.to_string(),
        message,
        data: None,
        related_transaction_id: Some(tx.id.clone()),
        read: false,
        created_at: now,
        read_at: None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn card() -> CardTransaction {
        CardTransaction {
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 8),
            raw_date: "2026/01/08".into(),
            amount: 12345.0,
            merchant_name: "ABC Store".into(),
            card_number: "1234".into(),
            account_holder_last_name: "Yamada".into(),
            account_holder_first_name: "Taro".into(),
            employee_id: "E1001".into(),
        }
    }

    #[test]
    fn card_mismatch_text() {
        let n = card_mismatch("u1", &card(), Utc::now());
        assert_eq!(n.kind, NotificationKind::CardMismatch);
        assert_eq!(n.title, "未登録の経費取引があります");
        assert_eq!(
            n.message,
            "取引日: 2026/01/08, 金額: 12,345円, 加盟店: ABC Store"
        );
        assert_eq!(
            n.data,
            Some(MismatchDetails {
                transaction_date: "2026/01/08".into(),
                amount: 12345.0,
                merchant_name: "ABC Store".into(),
                mismatch_type: MismatchKind::NotRegistered,
            })
        );
        assert!(!n.read);
    }
}
