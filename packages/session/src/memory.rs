use std::collections::HashMap;

use blackjack_engine::RoundReport;
use time::{Date, OffsetDateTime};

use crate::error::GatewayError;
use crate::gateway::{Account, Credentials, HistoryEntry, Registration, SessionGateway};
use crate::profile::validate_registration;

pub const DEFAULT_STARTING_BALANCE: u64 = 1000;

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    // Plain comparison stands in for the real service's password hashing,
    // which stays behind the gateway boundary.
    password: String,
    history: Vec<HistoryEntry>,
}

/// In-memory session/account backend used by the TUI client and tests.
/// Accounts are keyed by email; a single session can be active at a time.
#[derive(Debug, Clone)]
pub struct MemoryGateway {
    accounts: HashMap<String, StoredAccount>,
    session: Option<String>,
    next_id: u64,
    starting_balance: u64,
    today: Date,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            session: None,
            next_id: 1,
            starting_balance: DEFAULT_STARTING_BALANCE,
            today: OffsetDateTime::now_utc().date(),
        }
    }

    pub fn with_starting_balance(mut self, balance: u64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Pin "today" for deterministic age checks in tests.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    /// Create an account directly, skipping registration validation. Used
    /// to bootstrap demo accounts.
    pub fn seed_account(&mut self, username: &str, email: &str, password: &str) -> Account {
        let account = Account {
            id: self.next_id,
            username: username.to_string(),
            email: email.to_string(),
            balance: self.starting_balance,
        };
        self.next_id += 1;
        self.accounts.insert(
            email.to_string(),
            StoredAccount {
                account: account.clone(),
                password: password.to_string(),
                history: Vec::new(),
            },
        );
        account
    }

    fn active(&self) -> Result<&StoredAccount, GatewayError> {
        self.session
            .as_ref()
            .and_then(|email| self.accounts.get(email))
            .ok_or(GatewayError::NoSession)
    }

    fn active_mut(&mut self) -> Result<&mut StoredAccount, GatewayError> {
        match &self.session {
            Some(email) => self
                .accounts
                .get_mut(email)
                .ok_or(GatewayError::NoSession),
            None => Err(GatewayError::NoSession),
        }
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGateway for MemoryGateway {
    fn get_session(&self) -> Result<Option<Account>, GatewayError> {
        Ok(self.active().ok().map(|stored| stored.account.clone()))
    }

    fn authenticate(&mut self, credentials: &Credentials) -> Result<Account, GatewayError> {
        let stored = self
            .accounts
            .get(&credentials.email)
            .ok_or(GatewayError::InvalidCredentials)?;
        if stored.password != credentials.password {
            return Err(GatewayError::InvalidCredentials);
        }
        self.session = Some(credentials.email.clone());
        log::info!("session opened for {}", stored.account.username);
        Ok(stored.account.clone())
    }

    fn register(&mut self, registration: &Registration) -> Result<(), GatewayError> {
        validate_registration(registration, self.today)?;

        let taken = self.accounts.values().any(|stored| {
            stored.account.email == registration.email
                || stored.account.username == registration.username
        });
        if taken {
            return Err(GatewayError::AlreadyExists);
        }

        let account = Account {
            id: self.next_id,
            username: registration.username.clone(),
            email: registration.email.clone(),
            balance: self.starting_balance,
        };
        self.next_id += 1;
        self.accounts.insert(
            registration.email.clone(),
            StoredAccount {
                account,
                password: registration.password.clone(),
                history: Vec::new(),
            },
        );
        log::info!("registered {}", registration.username);
        Ok(())
    }

    fn logout(&mut self) -> Result<(), GatewayError> {
        self.session = None;
        Ok(())
    }

    fn report_round_result(&mut self, report: &RoundReport) -> Result<(), GatewayError> {
        let now = OffsetDateTime::now_utc();
        let stored = self.active_mut()?;
        stored.account.balance = report.new_balance;
        stored.history.push(HistoryEntry {
            outcome: report.outcome,
            bet: report.bet,
            balance_after: report.new_balance,
            recorded_at: now,
        });
        Ok(())
    }

    fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, GatewayError> {
        let stored = self.active()?;
        Ok(stored.history.iter().rev().take(limit).cloned().collect())
    }
}
