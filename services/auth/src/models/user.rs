//! User model and the forms that create and authenticate it

use serde::{Deserialize, Serialize};

/// User document as persisted in the user collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub name: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    /// PHC-formatted password hash, never the plaintext
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// Registration form payload
///
/// Absent fields are read as empty text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    pub password: String,
}

/// User login credentials
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginCredentials {
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    pub password: String,
}

impl RegistrationForm {
    /// Build the user document from this form and an already hashed password
    pub fn into_user(self, password_hash: String) -> User {
        User {
            name: self.name,
            phone_number: self.phone_number,
            password_hash,
        }
    }
}
