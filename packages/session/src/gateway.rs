use blackjack_engine::{Outcome, RoundReport};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::GatewayError;

/// Account snapshot as the session service hands it out. The balance here
/// is authoritative only at session start; during play the table owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub balance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub birth_date: Date,
    pub phone: String,
}

/// One settled round as stored in the account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub outcome: Outcome,
    pub bet: u64,
    pub balance_after: u64,
    pub recorded_at: OffsetDateTime,
}

/// Narrow interface to the session/account service. Transport-agnostic;
/// implementations may sit on HTTP, a database or plain memory. The engine
/// never calls this directly - the client glues the two together.
pub trait SessionGateway {
    /// Restore the account for a returning session, if any.
    fn get_session(&self) -> Result<Option<Account>, GatewayError>;

    fn authenticate(&mut self, credentials: &Credentials) -> Result<Account, GatewayError>;

    fn register(&mut self, registration: &Registration) -> Result<(), GatewayError>;

    fn logout(&mut self) -> Result<(), GatewayError>;

    /// Persist one settled round. Called once per round.
    fn report_round_result(&mut self, report: &RoundReport) -> Result<(), GatewayError>;

    /// Past rounds, most recent first.
    fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, GatewayError>;
}

/// Fire-and-forget settlement report: a failure is logged and swallowed,
/// never rolled back into the local game state.
pub fn report_best_effort<G: SessionGateway + ?Sized>(gateway: &mut G, report: &RoundReport) {
    if let Err(err) = gateway.report_round_result(report) {
        log::warn!("failed to report round result: {err}");
    }
}
