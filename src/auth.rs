//! Shared-password gate. Unlocking hands out a token; presenting the token
//! with a request yields an [`AccessGrant`], which every mutating ledger
//! operation takes as an argument.

use crate::models::LedgerError;
use std::collections::HashSet;
use std::sync::RwLock;
use uuid::Uuid;

/// Token stored in the client's session after a successful unlock.
pub type SessionToken = Uuid;

/// Proof that the caller got past the password gate for this request.
///
/// Only [`PasswordGate`] can make one.
#[derive(Clone, Copy, Debug)]
pub struct AccessGrant {
    _private: (),
}

/// Compares attempts against one shared secret and remembers issued tokens.
#[derive(Debug)]
pub struct PasswordGate {
    secret: String,
    issued: RwLock<HashSet<SessionToken>>,
}

impl PasswordGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issued: RwLock::new(HashSet::new()),
        }
    }

    /// Issue a new token if `attempt` matches the shared secret.
    pub fn unlock(&self, attempt: &str) -> Result<SessionToken, LedgerError> {
        if attempt != self.secret {
            log::info!("Rejected password attempt");
            return Err(LedgerError::AccessDenied);
        }
        let token = Uuid::new_v4();
        match self.issued.write() {
            Ok(mut issued) => {
                issued.insert(token);
            }
            Err(_) => return Err(LedgerError::AccessDenied),
        }
        Ok(token)
    }

    /// Grant for a request carrying `token`, if the token was issued and not revoked.
    pub fn admit(&self, token: SessionToken) -> Option<AccessGrant> {
        let issued = self.issued.read().ok()?;
        issued
            .contains(&token)
            .then_some(AccessGrant { _private: () })
    }

    /// Unlock, and on success revoke `previous` so a session holds one live token at a time.
    pub fn unlock_replacing(
        &self,
        attempt: &str,
        previous: Option<SessionToken>,
    ) -> Result<SessionToken, LedgerError> {
        let token = self.unlock(attempt)?;
        if let Some(old) = previous {
            self.revoke(old);
        }
        Ok(token)
    }

    pub fn revoke(&self, token: SessionToken) {
        if let Ok(mut issued) = self.issued.write() {
            issued.remove(&token);
        }
    }

    /// Unlock and admit in one step, for callers without a session (tools, tests).
    pub fn grant(&self, attempt: &str) -> Result<AccessGrant, LedgerError> {
        let token = self.unlock(attempt)?;
        self.admit(token).ok_or(LedgerError::AccessDenied)
    }
}
