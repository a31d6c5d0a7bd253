//! Unlock-token gate.
//!
//! A caller is "known" when it presents the installation's unlock token,
//! which it can only have learned from the `readme` documentation.

use std::fmt;
use subtle::ConstantTimeEq;

use super::schema::README_OPERATION;

/// Opaque per-installation, per-version token.
///
/// `Debug` is redacted so the value never lands in logs by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct UnlockToken(String);

impl UnlockToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match, compared in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for UnlockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnlockToken(..)")
    }
}

impl fmt::Display for UnlockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// Invalid or missing token. No further detail is given.
    Denied,
}

#[derive(Debug, Clone)]
pub struct TokenGate {
    token: UnlockToken,
}

impl TokenGate {
    pub fn new(token: UnlockToken) -> Self {
        Self { token }
    }

    pub fn check(&self, token: Option<&str>, operation: Option<&str>) -> GateDecision {
        if operation == Some(README_OPERATION) {
            return GateDecision::Allowed;
        }
        match token {
            Some(candidate) if self.token.matches(candidate) => GateDecision::Allowed,
            _ => GateDecision::Denied,
        }
    }
}
