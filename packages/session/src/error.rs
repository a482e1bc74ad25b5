use thiserror::Error;

use crate::profile::ProfileError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("username or email already exists")]
    AlreadyExists,
    #[error(transparent)]
    Validation(#[from] ProfileError),
    #[error("no active session")]
    NoSession,
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}
