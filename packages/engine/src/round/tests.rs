use super::*;
use crate::card::{Card, Rank, Suit};
use crate::error::RoundError;

fn card(rank: Rank) -> Card {
    Card::new(Suit::Spades, rank)
}

fn card_h(rank: Rank) -> Card {
    Card::new(Suit::Hearts, rank)
}

/// Table over a deck that yields the given cards in order. Deal order is
/// player, player, dealer up, dealer hole, then any hits/dealer draws.
fn rigged_table(draw_order: &[Card]) -> Table {
    let mut stacked: Vec<Card> = draw_order.to_vec();
    stacked.reverse();
    Table::with_deck(TableRules::default(), 1000, Deck::stacked(stacked))
}

fn bet_and_deal(table: &mut Table, bet: u64) {
    table.place_bet(bet).unwrap();
    table.deal().unwrap();
}

#[test]
fn test_place_bet_below_minimum() {
    let mut table = Table::new(TableRules::default(), 1000);
    assert_eq!(
        table.place_bet(5),
        Err(RoundError::BelowMinimum { bet: 5, min: 10 })
    );
    assert_eq!(
        table.place_bet(0),
        Err(RoundError::BelowMinimum { bet: 0, min: 10 })
    );
    assert_eq!(table.phase(), RoundPhase::Idle);
}

#[test]
fn test_place_bet_exceeding_balance() {
    let mut table = Table::new(TableRules::default(), 50);
    assert_eq!(
        table.place_bet(100),
        Err(RoundError::InsufficientFunds {
            bet: 100,
            balance: 50
        })
    );
    assert_eq!(table.phase(), RoundPhase::Idle);
    assert_eq!(table.balance(), 50);
}

#[test]
fn test_place_bet_can_be_replaced_before_deal() {
    let mut table = Table::new(TableRules::default(), 1000);
    table.place_bet(50).unwrap();
    table.place_bet(100).unwrap();
    assert_eq!(table.round().bet, 100);
    assert_eq!(table.phase(), RoundPhase::BetPlaced);
}

#[test]
fn test_place_bet_rejected_mid_round() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    assert_eq!(table.place_bet(50), Err(RoundError::RoundInProgress));
    assert_eq!(table.round().bet, 100);
}

#[test]
fn test_deal_requires_bet() {
    let mut table = Table::new(TableRules::default(), 1000);
    assert_eq!(table.deal(), Err(RoundError::NoBetPlaced));
}

#[test]
fn test_deal_debits_bet_and_deals_two_each() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);

    assert_eq!(table.balance(), 900);
    assert_eq!(table.phase(), RoundPhase::PlayerTurn);
    assert_eq!(table.round().player.len(), 2);
    assert_eq!(table.round().dealer.len(), 2);
    assert!(table.round().dealer.has_concealed());
    // Hole card contributes 0 until revealed.
    assert_eq!(table.round().dealer.score(), 10);
}

#[test]
fn test_deal_twice_rejected() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    assert_eq!(table.deal(), Err(RoundError::RoundInProgress));
}

#[test]
fn test_win_pays_double() {
    // Player 19 vs dealer 18.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();
    table.play_dealer();

    assert_eq!(table.phase(), RoundPhase::Settled);
    assert_eq!(table.round().outcome, Some(Outcome::Win));
    assert_eq!(table.round().payout, 200);
    assert_eq!(table.balance(), 1100);
}

#[test]
fn test_player_bust_settles_before_dealer_plays() {
    // Player 10+9, hits into a 5 for 24.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
        card(Rank::Five),
    ]);
    bet_and_deal(&mut table, 100);
    table.hit();

    assert_eq!(table.phase(), RoundPhase::Settled);
    assert_eq!(table.round().outcome, Some(Outcome::Lose));
    assert_eq!(table.round().payout, 0);
    assert_eq!(table.balance(), 900);
    // The dealer never drew and the hole card was never revealed.
    assert_eq!(table.round().dealer.len(), 2);
    assert!(table.round().dealer.has_concealed());
}

#[test]
fn test_natural_blackjack_pays_five_to_two() {
    // Player A+K natural, dealer finishes on 20.
    let mut table = rigged_table(&[
        card(Rank::Ace),
        card(Rank::King),
        card_h(Rank::Ten),
        card_h(Rank::Queen),
    ]);
    bet_and_deal(&mut table, 100);

    // Natural auto-advances: no player input, hole card revealed.
    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert!(!table.round().dealer.has_concealed());

    table.play_dealer();
    assert_eq!(table.round().outcome, Some(Outcome::Blackjack));
    assert_eq!(table.round().payout, 250);
    assert_eq!(table.balance(), 1150);
}

#[test]
fn test_natural_versus_dealer_natural_is_push() {
    let mut table = rigged_table(&[
        card(Rank::Ace),
        card(Rank::King),
        card_h(Rank::Ace),
        card_h(Rank::King),
    ]);
    bet_and_deal(&mut table, 100);
    table.play_dealer();

    assert_eq!(table.round().outcome, Some(Outcome::Push));
    assert_eq!(table.round().payout, 100);
    assert_eq!(table.balance(), 1000);
}

#[test]
fn test_natural_against_dealer_bust_still_pays_blackjack() {
    // Dealer 16 draws a ten and busts on 26.
    let mut table = rigged_table(&[
        card(Rank::Ace),
        card(Rank::King),
        card_h(Rank::Ten),
        card_h(Rank::Six),
        card_h(Rank::King),
    ]);
    bet_and_deal(&mut table, 100);
    table.play_dealer();

    assert_eq!(table.round().outcome, Some(Outcome::Blackjack));
    assert_eq!(table.round().payout, 250);
}

#[test]
fn test_dealer_bust_pays_double() {
    // Player stands on 20; dealer 16 draws an 8 for 24.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Queen),
        card_h(Rank::Ten),
        card_h(Rank::Six),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();
    table.play_dealer();

    assert_eq!(table.round().outcome, Some(Outcome::Win));
    assert_eq!(table.round().payout, 200);
    assert_eq!(table.round().dealer.score(), 24);
    assert_eq!(table.balance(), 1100);
}

#[test]
fn test_push_returns_bet() {
    // 19 against 19.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Nine),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();
    table.play_dealer();

    assert_eq!(table.round().outcome, Some(Outcome::Push));
    assert_eq!(table.round().payout, 100);
    assert_eq!(table.balance(), 1000);
}

#[test]
fn test_player_loss_on_lower_score() {
    // 18 against 19.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Eight),
        card_h(Rank::Ten),
        card_h(Rank::Nine),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();
    table.play_dealer();

    assert_eq!(table.round().outcome, Some(Outcome::Lose));
    assert_eq!(table.round().payout, 0);
    assert_eq!(table.balance(), 900);
}

#[test]
fn test_hit_to_21_stands_automatically() {
    // Player 15 hits into a 6.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Five),
        card_h(Rank::Ten),
        card_h(Rank::Seven),
        card(Rank::Six),
    ]);
    bet_and_deal(&mut table, 100);
    table.hit();

    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert!(!table.round().dealer.has_concealed());
}

#[test]
fn test_stand_reveals_hole_card() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();

    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert!(!table.round().dealer.has_concealed());
    assert_eq!(table.round().dealer.score(), 18);
}

#[test]
fn test_dealer_draws_below_threshold_one_step_at_a_time() {
    // Dealer starts on 12, draws 3 then 4 to reach 19.
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Two),
        card_h(Rank::Three),
        card_h(Rank::Four),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();

    assert_eq!(table.dealer_step(), DealerStep::Drew);
    assert_eq!(table.phase(), RoundPhase::DealerTurn);
    assert_eq!(table.dealer_step(), DealerStep::Drew);
    assert_eq!(table.dealer_step(), DealerStep::Settled);
    assert_eq!(table.phase(), RoundPhase::Settled);
    assert_eq!(table.round().dealer.score(), 19);
}

#[test]
fn test_actions_outside_player_turn_are_no_ops() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);

    // Nothing dealt yet.
    table.hit();
    table.stand();
    assert_eq!(table.phase(), RoundPhase::Idle);
    assert_eq!(table.dealer_step(), DealerStep::Ignored);

    bet_and_deal(&mut table, 100);
    table.stand();
    let snapshot = table.view();

    // Hit and stand during the dealer's turn change nothing.
    table.hit();
    table.stand();
    assert_eq!(table.view(), snapshot);

    table.play_dealer();
    let settled = table.view();
    table.hit();
    table.stand();
    assert_eq!(table.dealer_step(), DealerStep::Ignored);
    assert_eq!(table.view(), settled);
}

#[test]
fn test_report_is_taken_exactly_once() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    assert_eq!(table.take_report(), None);

    bet_and_deal(&mut table, 100);
    table.stand();
    table.play_dealer();

    let report = table.take_report().unwrap();
    assert_eq!(report.outcome, Outcome::Win);
    assert_eq!(report.bet, 100);
    assert_eq!(report.new_balance, 1100);
    assert_eq!(table.take_report(), None);
}

#[test]
fn test_new_round_resets_to_idle() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    table.stand();
    table.play_dealer();

    table.new_round();
    assert_eq!(table.phase(), RoundPhase::Idle);
    assert_eq!(table.round().bet, 0);
    assert!(table.round().player.is_empty());
    assert!(table.round().dealer.is_empty());
    assert_eq!(table.round().outcome, None);
    // The settled balance carries over.
    assert_eq!(table.balance(), 1100);
}

#[test]
fn test_new_round_ignored_mid_round() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);
    table.new_round();
    assert_eq!(table.phase(), RoundPhase::PlayerTurn);
}

#[test]
fn test_view_hides_dealer_score_until_reveal() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);

    let view = table.view();
    assert_eq!(view.player_score, 19);
    assert_eq!(view.dealer_score, None);
    assert!(view.dealer[1].face_down);
    assert_eq!(view.dealer[1].rank, "?");

    table.stand();
    let view = table.view();
    assert_eq!(view.dealer_score, Some(18));
    assert!(!view.dealer[1].face_down);
}

#[test]
fn test_view_serializes() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Nine),
        card_h(Rank::Ten),
        card_h(Rank::Eight),
    ]);
    bet_and_deal(&mut table, 100);

    let json = serde_json::to_string(&table.view()).unwrap();
    let back: RoundView = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table.view());
}

#[test]
fn test_balance_only_moves_at_deal_and_settlement() {
    let mut table = rigged_table(&[
        card(Rank::Ten),
        card(Rank::Five),
        card_h(Rank::Ten),
        card_h(Rank::Seven),
        card(Rank::Three),
    ]);
    table.place_bet(100).unwrap();
    assert_eq!(table.balance(), 1000);

    table.deal().unwrap();
    assert_eq!(table.balance(), 900);

    table.hit();
    assert_eq!(table.balance(), 900);
    table.stand();
    assert_eq!(table.balance(), 900);

    table.play_dealer();
    assert_eq!(table.phase(), RoundPhase::Settled);
    // 18 vs 17: win.
    assert_eq!(table.balance(), 1100);
}
