use serde::{Deserialize, Serialize};

use crate::hand::{DealtCard, Hand};
use crate::round::{Outcome, RoundPhase};

/// One card as the presentation layer should draw it. A face-down card
/// reveals nothing, not even its color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub rank: String,
    pub suit: char,
    pub is_red: bool,
    pub face_down: bool,
}

impl From<&DealtCard> for CardView {
    fn from(dealt: &DealtCard) -> Self {
        if dealt.face_down {
            Self {
                rank: "?".to_string(),
                suit: '?',
                is_red: false,
                face_down: true,
            }
        } else {
            Self {
                rank: dealt.card.rank.label().to_string(),
                suit: dealt.card.suit.symbol(),
                is_red: dealt.card.is_red(),
                face_down: false,
            }
        }
    }
}

/// Serializable snapshot of a round for rendering. The engine emits this
/// instead of touching any display API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub phase: RoundPhase,
    pub bet: u64,
    pub balance: u64,
    pub player: Vec<CardView>,
    pub dealer: Vec<CardView>,
    pub player_score: u8,
    /// None while the dealer's hole card is still concealed.
    pub dealer_score: Option<u8>,
    pub outcome: Option<Outcome>,
    pub message: String,
}

pub(crate) fn card_views(hand: &Hand) -> Vec<CardView> {
    hand.cards().iter().map(CardView::from).collect()
}
