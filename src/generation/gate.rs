//! Authorization for generation requests.

use serde::Serialize;

use crate::session::AuthToken;

/// Completed generations allowed before the gate closes.
pub const FREE_LIMIT: u64 = 2;

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenialReason {
    /// No auth token present.
    AuthRequired,
    /// Free generations used up.
    QuotaExceeded,
}

/// Gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// Request may proceed.
    Allowed,
    /// Request refused.
    Denied(DenialReason),
}

/// Combines auth presence and the generation counter.
#[derive(Debug, Clone, Copy)]
pub struct GenerationGate {
    limit: u64,
}

impl GenerationGate {
    /// Gate closing once `limit` generations have completed.
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// The configured limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Decide whether a request may proceed.
    ///
    /// Auth is checked before quota: a visitor without a token is always sent
    /// to registration, whatever the count.
    pub fn authorize(&self, token: Option<&AuthToken>, quota: u64) -> Authorization {
        if token.is_none() {
            return Authorization::Denied(DenialReason::AuthRequired);
        }
        if quota >= self.limit {
            return Authorization::Denied(DenialReason::QuotaExceeded);
        }
        Authorization::Allowed
    }
}

impl Default for GenerationGate {
    fn default() -> Self {
        Self::new(FREE_LIMIT)
    }
}
