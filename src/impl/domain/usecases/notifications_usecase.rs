use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fractic_server_error::ServerError;
use futures::future::try_join_all;

use crate::{
    domain::repositories::notifications_repository::NotificationsRepository,
    entities::{Notification, NotificationFilter, NotificationListing, Session},
    errors::{NotificationNotFound, PermissionDenied},
};

#[async_trait]
pub trait NotificationsUsecase: Send + Sync {
    /// Own notifications, newest first.
    async fn list(
        &self,
        session: &Session,
        filter: NotificationFilter,
    ) -> Result<NotificationListing, ServerError>;

    async fn unread_count(&self, session: &Session) -> Result<usize, ServerError>;

    async fn mark_read(&self, session: &Session, id: &str) -> Result<Notification, ServerError>;

    /// Returns the number of notifications that changed.
    async fn mark_all_read(&self, session: &Session) -> Result<usize, ServerError>;
}

pub(crate) struct NotificationsUsecaseImpl<R1>
where
    R1: NotificationsRepository,
{
    notifications_repository: Arc<R1>,
}

impl<R1> NotificationsUsecaseImpl<R1>
where
    R1: NotificationsRepository,
{
    pub(crate) fn new(notifications_repository: Arc<R1>) -> Self {
        Self {
            notifications_repository,
        }
    }
}

#[async_trait]
impl<R1> NotificationsUsecase for NotificationsUsecaseImpl<R1>
where
    R1: NotificationsRepository,
{
    async fn list(
        &self,
        session: &Session,
        filter: NotificationFilter,
    ) -> Result<NotificationListing, ServerError> {
        let all = self
            .notifications_repository
            .list_for_user(session.uid())
            .await?;
        let total_count = all.len();
        let unread_count = all.iter().filter(|n| !n.read).count();
        let notifications = match filter {
            NotificationFilter::All => all,
            NotificationFilter::Unread => all.into_iter().filter(|n| !n.read).collect(),
        };
        Ok(NotificationListing {
            notifications,
            unread_count,
            total_count,
        })
    }

    async fn unread_count(&self, session: &Session) -> Result<usize, ServerError> {
        Ok(self
            .notifications_repository
            .list_for_user(session.uid())
            .await?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    async fn mark_read(&self, session: &Session, id: &str) -> Result<Notification, ServerError> {
        let mut notification = self
            .notifications_repository
            .get(id)
            .await?
            .ok_or_else(|| NotificationNotFound::new(id))?;
        if notification.user_id != session.uid() {
            return Err(PermissionDenied::new("read another user's notification"));
        }
        if !notification.read {
            notification.read = true;
            notification.read_at = Some(Utc::now());
            self.notifications_repository.update(&notification).await?;
        }
        Ok(notification)
    }

    async fn mark_all_read(&self, session: &Session) -> Result<usize, ServerError> {
        let now = Utc::now();
        let unread: Vec<Notification> = self
            .notifications_repository
            .list_for_user(session.uid())
            .await?
            .into_iter()
            .filter(|n| !n.read)
            .map(|n| Notification {
                read: true,
                read_at: Some(now),
                ..n
            })
            .collect();
        try_join_all(
            unread
                .iter()
                .map(|n| self.notifications_repository.update(n)),
        )
        .await?;
        tracing::debug!(uid = %session.uid(), count = unread.len(), "notifications marked read");
        Ok(unread.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        domain::usecases::test_support::{Fixture, Notifications},
        entities::NotificationKind,
    };

    fn usecase(f: &Fixture) -> NotificationsUsecaseImpl<Notifications> {
        NotificationsUsecaseImpl::new(f.notifications.clone())
    }

    async fn notify(f: &Fixture, uid: &str, title: &str, minutes_ago: i64) -> Notification {
        f.notifications
            .add(Notification {
                id: String::new(),
                user_id: uid.into(),
                kind: NotificationKind::Reminder,
                title: title.into(),
                message: String::new(),
                data: None,
                related_transaction_id: None,
                read: false,
                created_at: Utc::now() - Duration::minutes(minutes_ago),
                read_at: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn lists_own_notifications_newest_first() {
        let f = Fixture::new().await;
        notify(&f, "u1", "old", 10).await;
        notify(&f, "u1", "new", 1).await;
        notify(&f, "u2", "other", 0).await;
        let session = Session::new("u1", "u1@example.com");

        let listing = usecase(&f)
            .list(&session, NotificationFilter::All)
            .await
            .unwrap();
        let titles: Vec<_> = listing.notifications.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
        assert_eq!(listing.unread_count, 2);
        assert_eq!(listing.total_count, 2);
    }

    #[tokio::test]
    async fn mark_read_updates_filter_and_counts() {
        let f = Fixture::new().await;
        let first = notify(&f, "u1", "first", 2).await;
        notify(&f, "u1", "second", 1).await;
        let session = Session::new("u1", "u1@example.com");
        let uc = usecase(&f);

        let read = uc.mark_read(&session, &first.id).await.unwrap();
        assert!(read.read);
        assert!(read.read_at.is_some());
        assert_eq!(uc.unread_count(&session).await.unwrap(), 1);

        let unread = uc.list(&session, NotificationFilter::Unread).await.unwrap();
        assert_eq!(unread.notifications.len(), 1);
        assert_eq!(unread.notifications[0].title, "second");
        assert_eq!(unread.total_count, 2);

        assert_eq!(uc.mark_all_read(&session).await.unwrap(), 1);
        assert_eq!(uc.mark_all_read(&session).await.unwrap(), 0);
        assert_eq!(uc.unread_count(&session).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cannot_mark_someone_elses_notification() {
        let f = Fixture::new().await;
        let theirs = notify(&f, "u2", "theirs", 0).await;
        let uc = usecase(&f);
        let session = Session::new("u1", "u1@example.com");

        assert!(uc.mark_read(&session, &theirs.id).await.is_err());
        assert!(uc.mark_read(&session, "missing").await.is_err());
    }
}
