//! toolgate — progressive-disclosure, token-gated tool endpoint.
//!
//! A tool shows callers only a single opaque `input` parameter. The real
//! schema and documentation arrive through the `readme` operation, together
//! with a per-installation unlock token that every later call must present.
//! Calls with a missing or wrong token get the documentation back instead of
//! a result.

pub mod config;
pub mod identity;
pub mod runtime;
pub mod tools;
pub mod types;
