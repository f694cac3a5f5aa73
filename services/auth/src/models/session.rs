//! Session payload

use serde::{Deserialize, Serialize};

/// Data stored for an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    /// Display name of the authenticated user
    pub username: String,
}
