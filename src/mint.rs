//! Token minting against the NFT contract.
//!
//! Interface contract with the token contract (v1, `createToken(string)`):
//! the mint transaction's **first** emitted event is the ERC-721
//! `Transfer(from, to, tokenId)`, so the new token id is the **third
//! positional argument** of event 0. That shape is validated here and any
//! deviation fails with `MalformedReceipt` instead of an unrelated panic.

use ethers_core::abi::Token;
use ethers_core::types::{Address, H256, U256};

use crate::chain::{ChainBackend, SigningSession, TxReceipt, calldata};
use crate::error::{Error, Result};

/// The result of a successful mint. Exists only once the receipt is
/// confirmed; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    /// Contract-assigned token identifier.
    pub token_id: u64,
    pub txid: H256,
    /// The metadata URL the token was bound to.
    pub token_uri: String,
}

/// Typed wrapper over the token contract.
pub struct TokenContract<'a, C: ChainBackend> {
    backend: &'a C,
    address: Address,
}

impl<'a, C: ChainBackend> TokenContract<'a, C> {
    pub fn new(backend: &'a C, address: Address) -> Self {
        Self { backend, address }
    }

    /// Mint a new token bound to `token_uri`.
    ///
    /// Two suspension points: submission returns only a pending-transaction
    /// hash, then the receipt is awaited before the token id is extracted.
    pub fn create_token(&self, session: &SigningSession, token_uri: &str) -> Result<MintedToken> {
        let data = calldata("createToken(string)", &[Token::String(token_uri.to_string())]);
        let txid = self
            .backend
            .send_transaction(session.account, self.address, U256::zero(), data)?;
        log::info!("mint transaction {txid:?} submitted, awaiting receipt");

        let receipt = self.backend.await_receipt(txid)?;
        let token_id = token_id_from_receipt(&receipt)?;
        log::info!("minted token {token_id} in {txid:?}");

        Ok(MintedToken {
            token_id,
            txid,
            token_uri: token_uri.to_string(),
        })
    }
}

/// Extract the new token id from a mint receipt per the emission contract
/// documented at module level.
pub fn token_id_from_receipt(receipt: &TxReceipt) -> Result<u64> {
    let event = receipt
        .events
        .first()
        .ok_or_else(|| Error::MalformedReceipt("receipt has no events".into()))?;
    let raw = event
        .args
        .get(2)
        .ok_or_else(|| Error::MalformedReceipt("first event has fewer than 3 arguments".into()))?;
    if *raw > U256::from(u64::MAX) {
        return Err(Error::MalformedReceipt(format!(
            "token id {raw} exceeds the host integer range"
        )));
    }
    Ok(raw.as_u64())
}
