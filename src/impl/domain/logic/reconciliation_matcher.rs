use crate::entities::{CardTransaction, ExpenseTransaction, Mismatch, MismatchKind};

/// Result of comparing one card statement row with the recorded
/// transactions.
#[derive(Debug, PartialEq)]
pub(crate) enum MatchOutcome<'a> {
    Matched(&'a ExpenseTransaction),
    DateMismatch(&'a ExpenseTransaction),
    AmountMismatch(&'a ExpenseTransaction),
    NotRegistered,
}

/// Three-tier fallback matcher. Each tier scans the recorded transactions in
/// order and takes the first hit; recorded transactions are not consumed, so
/// one recorded transaction may satisfy several card rows.
pub(crate) struct ReconciliationMatcher<'a> {
    recorded: &'a [ExpenseTransaction],
    tolerance: f64,
}

impl<'a> ReconciliationMatcher<'a> {
    pub(crate) fn new(recorded: &'a [ExpenseTransaction], tolerance: f64) -> Self {
        Self {
            recorded,
            tolerance,
        }
    }

    fn amount_matches(&self, recorded: &ExpenseTransaction, card: &CardTransaction) -> bool {
        (recorded.amount - card.amount).abs() < self.tolerance
    }

    fn find(
        &self,
        pred: impl Fn(&ExpenseTransaction) -> bool,
    ) -> Option<&'a ExpenseTransaction> {
        self.recorded.iter().find(|&tx| pred(tx))
    }

    pub(crate) fn classify(&self, card: &CardTransaction) -> MatchOutcome<'a> {
        let same_date =
            |tx: &ExpenseTransaction| card.transaction_date == Some(tx.transaction_date);

        if let Some(tx) = self.find(|tx| same_date(tx) && self.amount_matches(tx, card)) {
            return MatchOutcome::Matched(tx);
        }
        if let Some(tx) = self.find(|tx| !same_date(tx) && self.amount_matches(tx, card)) {
            return MatchOutcome::DateMismatch(tx);
        }
        if let Some(tx) = self.find(|tx| same_date(tx) && !self.amount_matches(tx, card)) {
            return MatchOutcome::AmountMismatch(tx);
        }
        MatchOutcome::NotRegistered
    }

    /// Mismatch entry for a row, or `None` when the row is matched.
    pub(crate) fn mismatch(&self, card: &CardTransaction) -> Option<Mismatch> {
        let (kind, system_transaction) = match self.classify(card) {
            MatchOutcome::Matched(_) => return None,
            MatchOutcome::DateMismatch(tx) => (MismatchKind::DateMismatch, Some(tx.clone())),
            MatchOutcome::AmountMismatch(tx) => (MismatchKind::AmountMismatch, Some(tx.clone())),
            MatchOutcome::NotRegistered => (MismatchKind::NotRegistered, None),
        };
        Some(Mismatch {
            kind,
            card_transaction: card.clone(),
            system_transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::entities::{ApprovalRoute, TransactionStatus};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn recorded(id: &str, day: u32, amount: f64) -> ExpenseTransaction {
        let now = Utc::now();
        ExpenseTransaction {
            id: id.into(),
            user_id: "u1".into(),
            organization_id: "org001".into(),
            block_id: None,
            region_id: None,
            base_id: None,
            transaction_date: date(day),
            amount,
            merchant_name: "Shop".into(),
            category_id: None,
            memo: None,
            expense_destination: None,
            status: TransactionStatus::Pending,
            approval_route: ApprovalRoute::Regional,
            receipt_count: 0,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_at: None,
        }
    }

    fn card(day: u32, amount: f64) -> CardTransaction {
        CardTransaction {
            transaction_date: Some(date(day)),
            raw_date: format!("2026/01/{day:02}"),
            amount,
            merchant_name: "Shop".into(),
            card_number: "1234".into(),
            account_holder_last_name: "Yamada".into(),
            account_holder_first_name: "Taro".into(),
            employee_id: "E001".into(),
        }
    }

    #[test]
    fn exact_match_within_tolerance() {
        let txs = vec![recorded("a", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        assert_eq!(matcher.classify(&card(8, 5000.0)), MatchOutcome::Matched(&txs[0]));
        assert_eq!(matcher.classify(&card(8, 5000.9)), MatchOutcome::Matched(&txs[0]));
        assert!(matcher.mismatch(&card(8, 4999.5)).is_none());
    }

    #[test]
    fn tolerance_boundary_is_exclusive() {
        let txs = vec![recorded("a", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        assert_eq!(
            matcher.classify(&card(8, 5001.0)),
            MatchOutcome::AmountMismatch(&txs[0])
        );
    }

    #[test]
    fn date_mismatch_takes_precedence_over_amount_mismatch() {
        let txs = vec![recorded("same-day", 8, 1200.0), recorded("other-day", 9, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        assert_eq!(
            matcher.classify(&card(8, 5000.0)),
            MatchOutcome::DateMismatch(&txs[1])
        );
    }

    #[test]
    fn exact_match_wins_even_when_listed_later() {
        let txs = vec![recorded("other-day", 7, 5000.0), recorded("exact", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        assert_eq!(matcher.classify(&card(8, 5000.0)), MatchOutcome::Matched(&txs[1]));
    }

    #[test]
    fn unmatched_rows_are_not_registered() {
        let txs = vec![recorded("a", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        let mismatch = matcher.mismatch(&card(9, 700.0)).unwrap();
        assert_eq!(mismatch.kind, MismatchKind::NotRegistered);
        assert!(mismatch.system_transaction.is_none());

        let empty = ReconciliationMatcher::new(&[], 1.0);
        assert_eq!(empty.classify(&card(8, 5000.0)), MatchOutcome::NotRegistered);
    }

    #[test]
    fn recorded_transactions_are_not_consumed() {
        let txs = vec![recorded("a", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        assert!(matcher.mismatch(&card(8, 5000.0)).is_none());
        assert!(matcher.mismatch(&card(8, 5000.0)).is_none());
    }

    #[test]
    fn mismatch_carries_the_compared_transaction() {
        let txs = vec![recorded("a", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);

        let mismatch = matcher.mismatch(&card(8, 5400.0)).unwrap();
        assert_eq!(mismatch.kind, MismatchKind::AmountMismatch);
        assert_eq!(mismatch.system_transaction.map(|t| t.id), Some("a".to_string()));
        assert_eq!(mismatch.card_transaction.amount, 5400.0);
    }

    #[test]
    fn unrecognised_card_date_is_never_the_same_date() {
        let txs = vec![recorded("a", 8, 5000.0)];
        let matcher = ReconciliationMatcher::new(&txs, 1.0);
        let undated = |amount| CardTransaction {
            transaction_date: None,
            raw_date: "2026年01月08日".into(),
            ..card(8, amount)
        };

        assert_eq!(
            matcher.classify(&undated(5000.0)),
            MatchOutcome::DateMismatch(&txs[0])
        );
        assert_eq!(matcher.classify(&undated(700.0)), MatchOutcome::NotRegistered);
    }
}
