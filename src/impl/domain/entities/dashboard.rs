use super::{
    transaction::{ExpenseTransaction, TransactionStatus},
    user::UserRole,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub submitted: usize,
    pub rejected: usize,
    pub approved: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub display_name: String,
    pub role: UserRole,
    pub counts: StatusCounts,
    pub recent_transactions: Vec<ExpenseTransaction>,
    pub unread_notifications: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: TransactionStatus) {
        match status {
            TransactionStatus::Pending => self.pending += 1,
            TransactionStatus::Submitted => self.submitted += 1,
            TransactionStatus::Rejected => self.rejected += 1,
            TransactionStatus::Approved => self.approved += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.submitted + self.rejected + self.approved
    }
}

impl FromIterator<TransactionStatus> for StatusCounts {
    fn from_iter<T: IntoIterator<Item = TransactionStatus>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |mut counts, status| {
            counts.record(status);
            counts
        })
    }
}
