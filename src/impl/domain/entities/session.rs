/// The signed-in account on whose behalf an operation runs.
///
/// Sessions are only handed out by sign-in, invitation acceptance and admin
/// bootstrap; callers cannot build one for an arbitrary email:
///
/// ```compile_fail
/// use expense_admin::entities::Session;
///
/// let forged = Session::new("anything", "admin@example.com");
/// ```
///
/// ```compile_fail
/// use expense_admin::entities::Session;
///
/// let forged = Session {
///     uid: "anything".to_string(),
///     email: "admin@example.com".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    uid: String,
    email: String,
}

impl Session {
    pub(crate) fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
