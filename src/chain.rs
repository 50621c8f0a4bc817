//! Wallet and contract boundary.
//!
//! Everything the listing flow needs from the chain goes through
//! [`ChainBackend`], so tests can substitute a scripted fake and the real
//! provider stays swappable.

use ethers_core::abi::Token;
use ethers_core::types::{Address, H256, U256};
use ethers_core::utils::id;

use crate::error::Result;

/// An authorized signing identity for the current attempt.
///
/// Resolved lazily once per listing attempt and never cached across
/// attempts; the provider owns the underlying connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningSession {
    pub account: Address,
}

/// One event emitted by a transaction, with its arguments flattened into
/// positional order: indexed topics first, then the 32-byte words of the
/// data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    /// Contract that emitted the event.
    pub contract: Address,
    pub args: Vec<U256>,
}

/// A confirmed transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: H256,
    /// Events in emission order.
    pub events: Vec<EmittedEvent>,
}

/// Backend for wallet session resolution and contract interaction.
pub trait ChainBackend: Send + 'static {
    /// Obtain an authorized signing identity from the connected wallet.
    ///
    /// May suspend on a visible approval prompt; there is no timeout here,
    /// the provider owns that policy. Fails with `WalletConnectionRejected`
    /// if the user declines or no account is available.
    fn request_account(&self) -> Result<SigningSession>;

    /// Read-only contract call; returns the raw return data.
    fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Submit a state-changing transaction signed by the provider, attaching
    /// `value` as payment. Returns a pending-transaction hash, not a result.
    fn send_transaction(
        &self,
        from: Address,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> Result<H256>;

    /// Block until the transaction is included and return its receipt.
    ///
    /// Fails with `TransactionReverted` if the chain rejects the call, or
    /// `TransactionTimedOut` if no receipt arrives within the backend's
    /// horizon.
    fn await_receipt(&self, tx_hash: H256) -> Result<TxReceipt>;
}

/// ABI calldata for `signature` (e.g. `"createToken(string)"`): the 4-byte
/// selector followed by the encoded arguments.
pub(crate) fn calldata(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = id(signature).to_vec();
    data.extend(ethers_core::abi::encode(args));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calldata_starts_with_the_selector() {
        let data = calldata("getListingPrice()", &[]);
        assert_eq!(data.len(), 4);
        assert_eq!(data, id("getListingPrice()").to_vec());
    }

    #[test]
    fn calldata_appends_encoded_arguments() {
        let data = calldata("createToken(string)", &[Token::String("u".into())]);
        assert_eq!(&data[..4], id("createToken(string)").as_slice());
        // offset word + length word + one padded data word
        assert_eq!(data.len(), 4 + 32 * 3);
    }
}
