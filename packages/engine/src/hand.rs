use serde::{Deserialize, Serialize};

use crate::card::Card;

/// A card as it sits on the table. The dealer's hole card is dealt face
/// down and contributes nothing to the hand value until revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtCard {
    pub card: Card,
    pub face_down: bool,
}

/// Best Blackjack value for the face-up cards of a hand. Aces are counted
/// as 11 first, then demoted to 1 one at a time while the total exceeds 21.
pub fn score(cards: &[DealtCard]) -> u8 {
    let mut total: u8 = 0;
    let mut aces = 0;

    for dealt in cards {
        if dealt.face_down {
            continue;
        }
        let value = dealt.card.point_value();
        if value == 11 {
            aces += 1;
        }
        total += value;
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total
}

/// An ordered sequence of dealt cards. Order affects display only, never
/// the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<DealtCard>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(DealtCard {
            card,
            face_down: false,
        });
    }

    pub fn add_face_down(&mut self, card: Card) {
        self.cards.push(DealtCard {
            card,
            face_down: true,
        });
    }

    pub fn reveal_all(&mut self) {
        for dealt in &mut self.cards {
            dealt.face_down = false;
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[DealtCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn has_concealed(&self) -> bool {
        self.cards.iter().any(|c| c.face_down)
    }

    pub fn score(&self) -> u8 {
        score(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        self.score() > 21
    }

    /// An initial 2-card hand scoring 21, with nothing concealed.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && !self.has_concealed() && self.score() == 21
    }
}
