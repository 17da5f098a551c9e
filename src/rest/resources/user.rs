//! User resource implementation.

use serde::{Deserialize, Serialize};

use crate::rest::ResourceKind;

/// A server account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    /// The unique identifier of the user.
    /// Read-only field.
    pub id: Option<u64>,

    /// The login name of the user.
    /// Read-only field.
    pub username: String,

    /// The first name of the user.
    pub first_name: String,

    /// The last name of the user.
    pub last_name: String,

    /// The email address of the user.
    pub email: String,
}

impl User {
    /// Returns "first last", falling back to the username.
    #[must_use]
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

impl ResourceKind for User {
    type Cache = ();

    const NAME: &'static str = "User";
    const ENDPOINT: &'static str = "user";

    const WRITABLE_FIELDS: &'static [&'static str] = &["first_name", "last_name", "email"];
    const READ_ONLY_FIELDS: &'static [&'static str] = &["id", "username"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}
