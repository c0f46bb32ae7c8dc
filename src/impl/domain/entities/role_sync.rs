use super::user::UserRole;

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize)]
pub struct RoleSyncEntry {
    pub email: String,
    pub role: UserRole,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSyncFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub error: String,
}

/// Outcome of copying every profile's role into the auth provider's claims.
#[derive(Debug, Clone, Default, PartialEq, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSyncReport {
    pub synced: usize,
    pub errors: usize,
    pub results: Vec<RoleSyncEntry>,
    pub error_details: Vec<RoleSyncFailure>,
}

impl RoleSyncReport {
    pub fn push_result(&mut self, entry: RoleSyncEntry) {
        self.synced += 1;
        self.results.push(entry);
    }

    pub fn push_failure(&mut self, failure: RoleSyncFailure) {
        self.errors += 1;
        self.error_details.push(failure);
    }
}
