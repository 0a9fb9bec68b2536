/// The logged-in user, established at login and handed explicitly to every
/// screen that needs it. Dropping the session is logging out; nothing here is
/// persisted or read back from ambient storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub display_name: String,
}

impl Session {
    pub fn new(user_id: i64, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }
}
