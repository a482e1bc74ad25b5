use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::error::RoundError;
use crate::hand::Hand;
use crate::rules::TableRules;
use crate::view::{card_views, RoundView};

/// Current phase of a round. `Dealing` is transient: `Table::deal` performs
/// the whole deal atomically and leaves the machine in `PlayerTurn` (or
/// `DealerTurn` on a player natural).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    BetPlaced,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Blackjack,
    Lose,
    Push,
}

/// What a single dealer suspension step did. A scheduler drives
/// `Table::dealer_step` and sleeps between `Drew` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerStep {
    /// Dealer was under the stand threshold and drew one card.
    Drew,
    /// Dealer stood or busted; the round is now settled.
    Settled,
    /// Not the dealer's turn; nothing happened.
    Ignored,
}

/// Settlement summary reported to the session gateway, fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub outcome: Outcome,
    pub bet: u64,
    pub new_balance: u64,
}

/// One round of play: the bet, both hands and where the state machine
/// currently sits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub bet: u64,
    pub player: Hand,
    pub dealer: Hand,
    pub phase: RoundPhase,
    pub outcome: Option<Outcome>,
    pub payout: u64,
}

impl Round {
    fn idle() -> Self {
        Self {
            bet: 0,
            player: Hand::new(),
            dealer: Hand::new(),
            phase: RoundPhase::Idle,
            outcome: None,
            payout: 0,
        }
    }
}

/// Per-session table context. Owns the deck, the player's balance and the
/// explicit `Round` value; balance only ever changes inside `deal` (debit)
/// and settlement (credit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub rules: TableRules,
    deck: Deck,
    balance: u64,
    round: Round,
    pending_report: Option<RoundReport>,
}

impl Table {
    pub fn new(rules: TableRules, balance: u64) -> Self {
        Self::with_deck(rules, balance, Deck::new())
    }

    /// Table over a caller-supplied deck (seeded or stacked), used by the
    /// simulator and tests.
    pub fn with_deck(rules: TableRules, balance: u64, deck: Deck) -> Self {
        Self {
            rules,
            deck,
            balance,
            round: Round::idle(),
            pending_report: None,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    /// Place or replace the pending bet. Rejected without any state change
    /// while a round is active, below the table minimum or beyond the
    /// available balance.
    pub fn place_bet(&mut self, bet: u64) -> Result<(), RoundError> {
        match self.round.phase {
            RoundPhase::Idle | RoundPhase::BetPlaced => {}
            _ => return Err(RoundError::RoundInProgress),
        }
        if bet < self.rules.min_bet {
            return Err(RoundError::BelowMinimum {
                bet,
                min: self.rules.min_bet,
            });
        }
        if bet > self.balance {
            return Err(RoundError::InsufficientFunds {
                bet,
                balance: self.balance,
            });
        }

        self.round.bet = bet;
        self.round.phase = RoundPhase::BetPlaced;
        log::debug!("bet placed: {bet}");
        Ok(())
    }

    /// Debit the bet and deal two cards each, the dealer's second face
    /// down. A player natural advances straight to the dealer's turn; the
    /// display delay before that is a presentation concern.
    pub fn deal(&mut self) -> Result<(), RoundError> {
        match self.round.phase {
            RoundPhase::BetPlaced => {}
            RoundPhase::Idle => return Err(RoundError::NoBetPlaced),
            _ => return Err(RoundError::RoundInProgress),
        }

        self.round.phase = RoundPhase::Dealing;
        self.balance -= self.round.bet;

        self.round.player.clear();
        self.round.dealer.clear();
        let player_first = self.deck.draw();
        self.round.player.add(player_first);
        let player_second = self.deck.draw();
        self.round.player.add(player_second);
        let dealer_up = self.deck.draw();
        self.round.dealer.add(dealer_up);
        let dealer_hole = self.deck.draw();
        self.round.dealer.add_face_down(dealer_hole);

        self.round.phase = RoundPhase::PlayerTurn;
        log::info!(
            "dealt: player {} ({}), dealer shows {}",
            self.round.player.score(),
            self.round.player.len(),
            self.round.dealer.score()
        );

        if self.round.player.is_natural() {
            log::info!("player natural, standing automatically");
            self.enter_dealer_turn();
        }
        Ok(())
    }

    /// Draw one card for the player. A no-op outside the player's turn. A
    /// bust settles immediately as a loss; exactly 21 stands automatically.
    pub fn hit(&mut self) {
        if self.round.phase != RoundPhase::PlayerTurn {
            log::debug!("hit ignored in phase {:?}", self.round.phase);
            return;
        }

        let card = self.deck.draw();
        self.round.player.add(card);
        let score = self.round.player.score();
        log::debug!("player hits: {card}, now {score}");

        if score > 21 {
            // The dealer never plays; the hole card stays concealed.
            self.settle();
        } else if score == 21 {
            self.enter_dealer_turn();
        }
    }

    /// Stop drawing and hand over to the dealer. A no-op outside the
    /// player's turn.
    pub fn stand(&mut self) {
        if self.round.phase != RoundPhase::PlayerTurn {
            log::debug!("stand ignored in phase {:?}", self.round.phase);
            return;
        }
        self.enter_dealer_turn();
    }

    fn enter_dealer_turn(&mut self) {
        self.round.dealer.reveal_all();
        self.round.phase = RoundPhase::DealerTurn;
    }

    /// One dealer step between suspension points: draw while under the
    /// stand threshold, otherwise settle. Once the dealer's turn starts the
    /// round always runs to `Settled`; there is no cancellation.
    pub fn dealer_step(&mut self) -> DealerStep {
        if self.round.phase != RoundPhase::DealerTurn {
            return DealerStep::Ignored;
        }

        let score = self.round.dealer.score();
        if score < self.rules.dealer_stands_on {
            let card = self.deck.draw();
            self.round.dealer.add(card);
            log::debug!("dealer draws: {card}, now {}", self.round.dealer.score());
            DealerStep::Drew
        } else {
            self.settle();
            DealerStep::Settled
        }
    }

    /// Run the dealer to completion without pauses (simulator and tests).
    pub fn play_dealer(&mut self) {
        while self.dealer_step() == DealerStep::Drew {}
    }

    /// Compute outcome and payout, credit the balance and record the
    /// gateway report. The credit and the phase change are one atomic step;
    /// delivering the report is the caller's fire-and-forget problem.
    fn settle(&mut self) {
        let bet = self.round.bet;
        let player = self.round.player.score();
        let dealer = self.round.dealer.score();

        let (outcome, payout) = if player > 21 {
            (Outcome::Lose, 0)
        } else if self.round.player.is_natural() && dealer != 21 {
            (Outcome::Blackjack, self.rules.blackjack_payout.payout(bet))
        } else if dealer > 21 || player > dealer {
            (Outcome::Win, self.rules.win_payout.payout(bet))
        } else if player < dealer {
            (Outcome::Lose, 0)
        } else {
            (Outcome::Push, self.rules.push_payout.payout(bet))
        };

        self.balance += payout;
        self.round.outcome = Some(outcome);
        self.round.payout = payout;
        self.round.phase = RoundPhase::Settled;
        self.pending_report = Some(RoundReport {
            outcome,
            bet,
            new_balance: self.balance,
        });
        log::info!(
            "settled: {outcome:?}, player {player} vs dealer {dealer}, bet {bet}, payout {payout}"
        );
    }

    /// Settlement report for the gateway, handed out at most once per round.
    pub fn take_report(&mut self) -> Option<RoundReport> {
        self.pending_report.take()
    }

    /// Acknowledge a settled round and return to `Idle`. Also clears a
    /// pending bet that was never dealt.
    pub fn new_round(&mut self) {
        match self.round.phase {
            RoundPhase::Idle | RoundPhase::BetPlaced | RoundPhase::Settled => {
                self.round = Round::idle();
            }
            _ => log::debug!("new_round ignored in phase {:?}", self.round.phase),
        }
    }

    pub fn view(&self) -> RoundView {
        let dealer_score = if self.round.dealer.has_concealed() {
            None
        } else if self.round.dealer.is_empty() {
            None
        } else {
            Some(self.round.dealer.score())
        };

        RoundView {
            phase: self.round.phase,
            bet: self.round.bet,
            balance: self.balance,
            player: card_views(&self.round.player),
            dealer: card_views(&self.round.dealer),
            player_score: self.round.player.score(),
            dealer_score,
            outcome: self.round.outcome,
            message: self.message(),
        }
    }

    fn message(&self) -> String {
        match self.round.phase {
            RoundPhase::Idle => "Place your bet".to_string(),
            RoundPhase::BetPlaced => format!("Bet {} - deal when ready", self.round.bet),
            RoundPhase::Dealing => "Dealing...".to_string(),
            RoundPhase::PlayerTurn => "Your turn: hit or stand".to_string(),
            RoundPhase::DealerTurn => "Dealer's turn...".to_string(),
            RoundPhase::Settled => match self.round.outcome {
                Some(Outcome::Blackjack) => "Blackjack! You win".to_string(),
                Some(Outcome::Win) if self.round.dealer.is_bust() => {
                    "Dealer busts! You win".to_string()
                }
                Some(Outcome::Win) => "You win!".to_string(),
                Some(Outcome::Lose) if self.round.player.is_bust() => {
                    "Bust! You lose".to_string()
                }
                Some(Outcome::Lose) => "You lose".to_string(),
                Some(Outcome::Push) => "Push - bet returned".to_string(),
                None => String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests;
