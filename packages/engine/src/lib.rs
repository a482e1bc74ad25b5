//! Single-deck Blackjack round engine: deck construction and shuffling,
//! hand scoring with Ace soft/hard resolution, and the round state machine
//! with settlement/payout computation. Presentation and session concerns
//! live elsewhere; the engine only emits [`RoundView`] snapshots.

mod card;
mod deck;
mod error;
mod hand;
mod round;
mod rules;
mod view;

pub use card::{Card, Rank, Suit};
pub use deck::{Deck, DECK_SIZE};
pub use error::RoundError;
pub use hand::{score, DealtCard, Hand};
pub use round::{DealerStep, Outcome, Round, RoundPhase, RoundReport, Table};
pub use rules::{PayoutRatio, TableRules};
pub use view::{CardView, RoundView};
