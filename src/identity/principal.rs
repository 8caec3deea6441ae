use serde::{Deserialize, Serialize};

/// The authenticated caller. Accounts are keyed by email, so the email is
/// both the login name and the ownership key on stored records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}
