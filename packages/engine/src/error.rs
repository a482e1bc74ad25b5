use thiserror::Error;

/// Errors a player can hit while setting up a round. All of them leave the
/// table state untouched. Illegal hit/stand/dealer actions are not errors;
/// they are ignored as no-ops.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("bet of {bet} is below the table minimum of {min}")]
    BelowMinimum { bet: u64, min: u64 },
    #[error("bet of {bet} exceeds the available balance of {balance}")]
    InsufficientFunds { bet: u64, balance: u64 },
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no bet has been placed")]
    NoBetPlaced,
}
