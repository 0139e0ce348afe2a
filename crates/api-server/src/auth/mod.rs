//! Sign-in sessions and the cached user record

mod jwt;
mod store;

use thiserror::Error;

pub use jwt::{SessionClaims, TokenSigner};
pub use store::{AuthSession, LoginOutcome, SessionStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Core(#[from] taskdash_core::Error),
}
