//! Authentication service models

pub mod session;
pub mod user;

// Re-export for convenience
pub use session::SessionData;
pub use user::{LoginCredentials, RegistrationForm, User};
