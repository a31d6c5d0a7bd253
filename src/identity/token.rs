//! Unlock-token minting.
//!
//! The token is an HMAC-SHA3-256 keyed by the installation id over the user,
//! the code version and the tool's identity, so it changes whenever any of
//! those change and stays stable otherwise.

use anyhow::{Context, Result};
use hmac::{Hmac, Mac};
use sha3::Sha3_256;

use crate::tools::UnlockToken;

type HmacSha3 = Hmac<Sha3_256>;

/// Hex characters kept from the MAC.
const TOKEN_HEX_LEN: usize = 16;

/// Inputs the token is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity<'a> {
    pub installation_id: &'a str,
    pub user: &'a str,
    pub code_version: &'a str,
    /// Identity of the tool the token unlocks (its base name).
    pub tool: &'a str,
}

/// Derive the unlock token for `identity`.
pub fn mint_token(identity: &TokenIdentity<'_>) -> Result<UnlockToken> {
    let mut mac = HmacSha3::new_from_slice(identity.installation_id.as_bytes())
        .context("Failed to key the token MAC with the installation id")?;
    // Length-prefix every field so ("ab","c") and ("a","bc") differ.
    for part in [identity.user, identity.code_version, identity.tool] {
        mac.update(&(part.len() as u64).to_be_bytes());
        mac.update(part.as_bytes());
    }
    let digest = hex::encode(mac.finalize().into_bytes());
    Ok(UnlockToken::new(&digest[..TOKEN_HEX_LEN]))
}
