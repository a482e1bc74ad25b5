use blackjack_engine::{
    Deck, Outcome, PayoutRatio, RoundError, RoundPhase, Table, TableRules,
};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "table-sim",
    about = "Monte-Carlo simulation of the blackjack table"
)]
struct Args {
    /// Number of rounds to play
    #[arg(long, default_value = "100000")]
    rounds: u64,

    /// RNG seed for a reproducible run
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Flat bet per round
    #[arg(long, default_value = "10")]
    bet: u64,

    /// Starting bankroll (topped back up whenever it cannot cover the bet)
    #[arg(long, default_value = "1000")]
    bankroll: u64,

    /// Player stands at or above this hard total
    #[arg(long, default_value = "17")]
    stand_on: u8,

    /// Blackjack payout ratio (e.g. "5:2", "3:2")
    #[arg(long, default_value = "5:2")]
    blackjack_payout: String,
}

fn main() {
    let args = Args::parse();

    let rules = TableRules {
        blackjack_payout: parse_payout(&args.blackjack_payout),
        ..TableRules::default()
    };
    if args.bet < rules.min_bet {
        eprintln!("Bet {} is below the table minimum {}", args.bet, rules.min_bet);
        std::process::exit(1);
    }

    eprintln!("Configuration:");
    eprintln!("  Rounds:     {}", args.rounds);
    eprintln!("  Seed:       {}", args.seed);
    eprintln!("  Bet:        {}", args.bet);
    eprintln!("  Stand on:   {}", args.stand_on);
    eprintln!(
        "  BJ payout:  {}:{}",
        rules.blackjack_payout.numerator, rules.blackjack_payout.denominator
    );
    eprintln!("Simulating...");

    let mut table = Table::with_deck(rules, args.bankroll, Deck::seeded(args.seed));
    let mut wins = 0u64;
    let mut blackjacks = 0u64;
    let mut losses = 0u64;
    let mut pushes = 0u64;
    let mut wagered = 0u64;
    let mut returned = 0u64;
    let mut topped_up = 0u64;

    for _ in 0..args.rounds {
        if table.balance() < args.bet {
            // Refill so the run always completes the requested rounds.
            table = Table::with_deck(rules, args.bankroll, Deck::seeded(args.seed ^ topped_up));
            topped_up += 1;
        }

        if let Err(err) = play_round(&mut table, args.bet, args.stand_on) {
            eprintln!("Simulation aborted: {err}");
            std::process::exit(1);
        }

        let report = match table.take_report() {
            Some(report) => report,
            None => {
                eprintln!("Simulation aborted: round ended without a report");
                std::process::exit(1);
            }
        };
        match report.outcome {
            Outcome::Win => wins += 1,
            Outcome::Blackjack => blackjacks += 1,
            Outcome::Lose => losses += 1,
            Outcome::Push => pushes += 1,
        }
        wagered += args.bet;
        returned += table.round().payout;
        table.new_round();
    }

    let total = args.rounds as f64;
    let net = returned as f64 - wagered as f64;
    println!("Rounds:        {}", args.rounds);
    println!(
        "Wins:          {:>8}  ({:.2}%)",
        wins,
        100.0 * wins as f64 / total
    );
    println!(
        "Blackjacks:    {:>8}  ({:.2}%)",
        blackjacks,
        100.0 * blackjacks as f64 / total
    );
    println!(
        "Losses:        {:>8}  ({:.2}%)",
        losses,
        100.0 * losses as f64 / total
    );
    println!(
        "Pushes:        {:>8}  ({:.2}%)",
        pushes,
        100.0 * pushes as f64 / total
    );
    println!("Player return: {:+.4}%", 100.0 * net / wagered as f64);
    if topped_up > 0 {
        println!("Bankroll refills: {topped_up}");
    }
}

/// Play one round with a fixed stand-on-N player policy.
fn play_round(table: &mut Table, bet: u64, stand_on: u8) -> Result<(), RoundError> {
    table.place_bet(bet)?;
    table.deal()?;

    while table.phase() == RoundPhase::PlayerTurn && table.round().player.score() < stand_on {
        table.hit();
    }
    if table.phase() == RoundPhase::PlayerTurn {
        table.stand();
    }
    table.play_dealer();
    Ok(())
}

fn parse_payout(s: &str) -> PayoutRatio {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        eprintln!("Invalid payout ratio '{s}', expected N:D (e.g. 5:2)");
        std::process::exit(1);
    }
    let num: u32 = parts[0].parse().unwrap_or_else(|_| {
        eprintln!("Invalid numerator in payout ratio '{s}'");
        std::process::exit(1);
    });
    let den: u32 = parts[1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid denominator in payout ratio '{s}'");
        std::process::exit(1);
    });
    PayoutRatio::new(num, den).unwrap_or_else(|e| {
        eprintln!("Invalid payout ratio: {e}");
        std::process::exit(1);
    })
}
