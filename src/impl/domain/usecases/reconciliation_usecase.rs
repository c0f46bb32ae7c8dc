use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use fractic_server_error::ServerError;
use futures::future::try_join_all;

use crate::{
    data::datasources::card_statement_csv_datasource::{
        CardStatementCsvDatasource, CardStatementCsvDatasourceImpl,
    },
    domain::{
        logic::{
            access_policy::{ensure, is_administrator},
            reconciliation_matcher::ReconciliationMatcher,
        },
        repositories::{
            notifications_repository::NotificationsRepository,
            transactions_repository::TransactionsRepository, users_repository::UsersRepository,
        },
        usecases::users_usecase::resolve_actor,
    },
    entities::{
        CardStatement, CardStatementLayout, MismatchKind, ReconciliationReport, Session,
    },
    errors::EmptyCardStatement,
    presentation::notification_fmt,
};

#[async_trait]
pub trait ReconciliationUsecase: Send + Sync {
    fn parse_statement(&self, csv: &str) -> Result<CardStatement, ServerError>;

    /// Compares every statement row with the recorded transactions and
    /// notifies employees about charges they never recorded.
    async fn reconcile(
        &self,
        session: &Session,
        statement: CardStatement,
    ) -> Result<ReconciliationReport, ServerError>;

    async fn reconcile_csv(
        &self,
        session: &Session,
        csv: &str,
    ) -> Result<ReconciliationReport, ServerError>;

    async fn reconcile_file<P>(
        &self,
        session: &Session,
        path: P,
    ) -> Result<ReconciliationReport, ServerError>
    where
        P: AsRef<std::path::Path> + Send;
}

pub(crate) struct ReconciliationUsecaseImpl<R1, R2, R3>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
{
    users_repository: Arc<R1>,
    transactions_repository: Arc<R2>,
    notifications_repository: Arc<R3>,
    statement_datasource: CardStatementCsvDatasourceImpl,
    amount_tolerance: f64,
}

impl<R1, R2, R3> ReconciliationUsecaseImpl<R1, R2, R3>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
{
    pub(crate) fn new(
        users_repository: Arc<R1>,
        transactions_repository: Arc<R2>,
        notifications_repository: Arc<R3>,
        layout: CardStatementLayout,
        amount_tolerance: f64,
    ) -> Self {
        Self {
            users_repository,
            transactions_repository,
            notifications_repository,
            statement_datasource: CardStatementCsvDatasourceImpl::new(layout),
            amount_tolerance,
        }
    }
}

#[async_trait]
impl<R1, R2, R3> ReconciliationUsecase for ReconciliationUsecaseImpl<R1, R2, R3>
where
    R1: UsersRepository,
    R2: TransactionsRepository,
    R3: NotificationsRepository,
{
    fn parse_statement(&self, csv: &str) -> Result<CardStatement, ServerError> {
        self.statement_datasource.from_string(csv)
    }

    async fn reconcile(
        &self,
        session: &Session,
        statement: CardStatement,
    ) -> Result<ReconciliationReport, ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(is_administrator(&actor), "reconcile card statements")?;
        if statement.is_empty() {
            return Err(EmptyCardStatement::new());
        }

        let recorded = self.transactions_repository.list().await?;
        let matcher = ReconciliationMatcher::new(&recorded, self.amount_tolerance);
        let mut report = ReconciliationReport {
            examined: statement.transactions.len(),
            skipped_rows: statement.skipped,
            ..Default::default()
        };
        for card in statement.transactions {
            match matcher.mismatch(&card) {
                Some(mismatch) => {
                    tracing::debug!(
                        date = %card.raw_date,
                        amount = card.amount,
                        kind = %mismatch.kind,
                        "card row mismatched"
                    );
                    report.mismatches.push(mismatch);
                }
                None => report.matched += 1,
            }
        }

        // Resolve owners of unregistered charges.
        let owners: HashMap<String, String> = self
            .users_repository
            .list()
            .await?
            .into_iter()
            .filter_map(|u| {
                u.employee_id
                    .filter(|id| !id.is_empty())
                    .map(|id| (id, u.uid))
            })
            .collect();
        let now = Utc::now();
        let mut notifications = Vec::new();
        for mismatch in report
            .mismatches
            .iter()
            .filter(|m| m.kind == MismatchKind::NotRegistered)
        {
            let employee_id = &mismatch.card_transaction.employee_id;
            match owners.get(employee_id) {
                Some(uid) => notifications.push(notification_fmt::card_mismatch(
                    uid,
                    &mismatch.card_transaction,
                    now,
                )),
                None if employee_id.is_empty() => {}
                None => {
                    if !report.unresolved_employee_ids.contains(employee_id) {
                        tracing::warn!(
                            employee_id = %employee_id,
                            "no user registered for employee id"
                        );
                        report.unresolved_employee_ids.push(employee_id.clone());
                    }
                }
            }
        }
        report.notifications_created = try_join_all(
            notifications
                .into_iter()
                .map(|n| self.notifications_repository.add(n)),
        )
        .await?
        .len();

        tracing::info!(
            examined = report.examined,
            matched = report.matched,
            not_registered = report.count(MismatchKind::NotRegistered),
            date_mismatch = report.count(MismatchKind::DateMismatch),
            amount_mismatch = report.count(MismatchKind::AmountMismatch),
            notifications = report.notifications_created,
            skipped = report.skipped_rows.len(),
            "card statement reconciled"
        );
        Ok(report)
    }

    async fn reconcile_csv(
        &self,
        session: &Session,
        csv: &str,
    ) -> Result<ReconciliationReport, ServerError> {
        let statement = self.statement_datasource.from_string(csv)?;
        self.reconcile(session, statement).await
    }

    async fn reconcile_file<P>(
        &self,
        session: &Session,
        path: P,
    ) -> Result<ReconciliationReport, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let statement = self.statement_datasource.from_file(path)?;
        self.reconcile(session, statement).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        domain::usecases::test_support::{Fixture, Notifications, Transactions, Users},
        entities::{MismatchDetails, NotificationKind, TransactionStatus, UserRole},
    };

    fn usecase(f: &Fixture) -> ReconciliationUsecaseImpl<Users, Transactions, Notifications> {
        ReconciliationUsecaseImpl::new(
            f.users.clone(),
            f.transactions.clone(),
            f.notifications.clone(),
            CardStatementLayout::default(),
            1.0,
        )
    }

    fn row(date: &str, amount: &str, merchant: &str, employee_id: &str) -> String {
        let mut cols = vec![String::new(); 37];
        cols[2] = date.into();
        cols[3] = "1234".into();
        cols[7] = "Yamada".into();
        cols[8] = "Taro".into();
        cols[9] = employee_id.into();
        cols[12] = merchant.into();
        cols[36] = amount.into();
        cols.join("\t")
    }

    fn statement(rows: &[String]) -> String {
        let mut lines = vec![vec!["h"; 37].join("\t")];
        lines.extend(rows.iter().cloned());
        lines.join("\n")
    }

    async fn employee(f: &Fixture, uid: &str, employee_id: &str) -> Session {
        let session = f.user(uid, UserRole::User, Some("r1")).await;
        let mut profile = f.users.get(uid).await.unwrap().unwrap();
        profile.employee_id = Some(employee_id.into());
        f.users.save(&profile).await.unwrap();
        session
    }

    #[tokio::test]
    async fn classifies_rows_and_notifies_owners() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let taro = employee(&f, "u1", "E1001").await;
        f.transaction(&taro, (2026, 1, 8), 1000.0, TransactionStatus::Submitted).await;
        f.transaction(&taro, (2026, 1, 12), 3000.0, TransactionStatus::Pending).await;

        let csv = statement(&[
            row("2026/01/08", "1,000", "Cafe", "E1001"),
            row("2026/01/10", "3,000", "Hotel", "E1001"),
            row("2026/01/12", "3,500", "Taxi", "E1001"),
            row("2026/01/15", "12,345", "ABC Store", "E1001"),
            row("2026/01/16", "500", "Kiosk", "E9999"),
            row("", "500", "Kiosk", "E1001"),
        ]);
        let report = usecase(&f).reconcile_csv(&admin, &csv).await.unwrap();

        assert_eq!(report.examined, 5);
        assert_eq!(report.matched, 1);
        assert_eq!(report.count(MismatchKind::DateMismatch), 1);
        assert_eq!(report.count(MismatchKind::AmountMismatch), 1);
        assert_eq!(report.count(MismatchKind::NotRegistered), 2);
        assert_eq!(report.notifications_created, 1);
        assert_eq!(report.unresolved_employee_ids, vec!["E9999".to_string()]);
        assert_eq!(report.skipped_rows.len(), 1);

        let notifications = f.notifications.list_for_user("u1").await.unwrap();
        assert_eq!(notifications.len(), 1);
        let n = &notifications[0];
        assert_eq!(n.kind, NotificationKind::CardMismatch);
        assert_eq!(n.title, "未登録の経費取引があります");
        assert_eq!(n.message, "取引日: 2026/01/15, 金額: 12,345円, 加盟店: ABC Store");
        assert_eq!(
            n.data,
            Some(MismatchDetails {
                transaction_date: "2026/01/15".into(),
                amount: 12345.0,
                merchant_name: "ABC Store".into(),
                mismatch_type: MismatchKind::NotRegistered,
            })
        );
        assert!(!n.read);
    }

    #[tokio::test]
    async fn reconciliation_is_admin_only() {
        let f = Fixture::new().await;
        let manager = f.user("m1", UserRole::BlockManager, None).await;
        let csv = statement(&[row("2026/01/08", "1000", "Cafe", "E1001")]);
        assert!(usecase(&f).reconcile_csv(&manager, &csv).await.is_err());
    }

    #[tokio::test]
    async fn empty_statement_is_rejected() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let uc = usecase(&f);

        assert!(uc.reconcile_csv(&admin, &statement(&[])).await.is_err());
        let only_bad_rows = statement(&[row("", "1000", "Cafe", "E1001")]);
        assert!(uc.reconcile_csv(&admin, &only_bad_rows).await.is_err());
    }

    #[tokio::test]
    async fn reconciles_statement_file() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.tsv");
        std::fs::write(&path, statement(&[row("2026-01-08", "1000", "Cafe", "")])).unwrap();

        let report = usecase(&f).reconcile_file(&admin, &path).await.unwrap();
        assert_eq!(report.count(MismatchKind::NotRegistered), 1);
        assert_eq!(report.notifications_created, 0);
        assert!(report.unresolved_employee_ids.is_empty());
    }

    #[tokio::test]
    async fn rows_with_unrecognised_dates_are_still_reconciled() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let taro = employee(&f, "u1", "E1001").await;
        f.transaction(&taro, (2026, 1, 8), 1000.0, TransactionStatus::Submitted).await;

        let csv = statement(&[
            row("2026年01月08日", "1,000", "Cafe", "E1001"),
            row("01/09/2026", "7,700", "Hotel", "E1001"),
        ]);
        let report = usecase(&f).reconcile_csv(&admin, &csv).await.unwrap();

        assert_eq!(report.examined, 2);
        assert!(report.skipped_rows.is_empty());
        assert_eq!(report.count(MismatchKind::DateMismatch), 1);
        assert_eq!(report.count(MismatchKind::NotRegistered), 1);
        assert_eq!(report.notifications_created, 1);

        let notifications = f.notifications.list_for_user("u1").await.unwrap();
        assert_eq!(
            notifications[0].message,
            "取引日: 01/09/2026, 金額: 7,700円, 加盟店: Hotel"
        );
    }
}
