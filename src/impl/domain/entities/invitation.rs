use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    /// Placeholder uid of the pending profile.
    pub uid: String,
    pub email: String,
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}
