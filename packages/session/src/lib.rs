//! Session/account gateway for the blackjack client: the narrow trait the
//! game core talks through, the registration validation rules, and an
//! in-memory reference backend.

mod error;
mod gateway;
mod memory;
mod profile;

pub use error::GatewayError;
pub use gateway::{
    report_best_effort, Account, Credentials, HistoryEntry, Registration, SessionGateway,
};
pub use memory::{MemoryGateway, DEFAULT_STARTING_BALANCE};
pub use profile::{
    age_on, validate_age, validate_email, validate_password, validate_phone,
    validate_registration, validate_username, ProfileError,
};
