use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, Suit};

pub const DECK_SIZE: usize = 52;

/// An ordered single deck of 52 unique cards. Draws pop from the end; an
/// exhausted deck silently rebuilds itself as a fresh shuffled 52-card set,
/// approximating an infinite shoe. Cards already in play can therefore
/// reappear after a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    #[serde(skip, default = "entropy_rng")]
    rng: ChaCha8Rng,
}

fn entropy_rng() -> ChaCha8Rng {
    ChaCha8Rng::from_entropy()
}

impl Deck {
    /// Fresh shuffled deck with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::from_rng(entropy_rng())
    }

    /// Deterministic deck for simulations and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(DECK_SIZE),
            rng,
        };
        deck.rebuild();
        deck
    }

    /// Deck with a predetermined card order. The last card is drawn first.
    /// Once the stacked cards run out, draws fall back to fresh shuffled
    /// decks like any other deck.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            cards,
            rng: entropy_rng(),
        }
    }

    /// One card per (suit, rank) pair in enumeration order, then shuffled.
    fn rebuild(&mut self) {
        self.cards.clear();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                self.cards.push(Card::new(suit, rank));
            }
        }
        self.shuffle();
    }

    /// In-place Fisher-Yates shuffle. Every permutation is equally likely
    /// given a uniform RNG.
    pub fn shuffle(&mut self) {
        for i in (1..self.cards.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    /// Removes and returns the top card, replenishing first if the deck is
    /// empty. Never fails.
    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            log::debug!("deck exhausted, rebuilding a fresh shuffled deck");
            self.rebuild();
        }
        // rebuild always leaves 52 cards behind
        self.cards.pop().expect("rebuilt deck is never empty")
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn remaining(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
