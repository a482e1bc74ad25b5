use serde::{Deserialize, Serialize};

/// Payout multiplier as a ratio applied to the bet. Payouts are the total
/// amount credited back, not the net win: a standard win pays 2:1 (bet plus
/// an equal win), a push pays 1:1 (bet returned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl PayoutRatio {
    /// Standard win: bet returned plus an equal amount.
    pub const DOUBLE: Self = Self {
        numerator: 2,
        denominator: 1,
    };
    /// Push: the full bet is credited back, no gain.
    pub const EVEN: Self = Self {
        numerator: 1,
        denominator: 1,
    };
    /// Natural blackjack: floor(2.5 x bet).
    pub const BLACKJACK: Self = Self {
        numerator: 5,
        denominator: 2,
    };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self, &'static str> {
        if denominator == 0 {
            return Err("Denominator cannot be zero");
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn payout(&self, bet: u64) -> u64 {
        bet * self.numerator as u64 / self.denominator as u64
    }
}

/// Fixed table configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Smallest bet the table accepts.
    pub min_bet: u64,

    /// Dealer draws while strictly below this value, then stands.
    pub dealer_stands_on: u8,

    /// Total credited on a natural blackjack.
    pub blackjack_payout: PayoutRatio,

    /// Total credited on a regular win (including a dealer bust).
    pub win_payout: PayoutRatio,

    /// Total credited on a push.
    pub push_payout: PayoutRatio,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            min_bet: 10,
            dealer_stands_on: 17,
            blackjack_payout: PayoutRatio::BLACKJACK,
            win_payout: PayoutRatio::DOUBLE,
            push_payout: PayoutRatio::EVEN,
        }
    }
}
