//! Sale registration against the marketplace contract.

use ethers_core::abi::Token;
use ethers_core::types::{Address, H256, U256};

use crate::chain::{ChainBackend, SigningSession, calldata};
use crate::error::{Error, Result};
use crate::units;

/// A live listing, confirmed on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfirmation {
    pub txid: H256,
    pub token_id: u64,
    /// Sale price in base units.
    pub price: U256,
    /// Fee paid to the marketplace, in base units.
    pub listing_fee: U256,
}

/// Typed wrapper over the marketplace contract.
pub struct Marketplace<'a, C: ChainBackend> {
    backend: &'a C,
    address: Address,
}

impl<'a, C: ChainBackend> Marketplace<'a, C> {
    pub fn new(backend: &'a C, address: Address) -> Self {
        Self { backend, address }
    }

    /// Read the marketplace's current listing fee. Read-only; re-read per
    /// attempt rather than cached, so a fee change never goes stale here.
    pub fn listing_price(&self) -> Result<U256> {
        let out = self.backend.call(self.address, calldata("getListingPrice()", &[]))?;
        if out.len() < 32 {
            return Err(Error::Rpc(format!(
                "getListingPrice returned {} bytes, expected 32",
                out.len()
            )));
        }
        Ok(U256::from_big_endian(&out[..32]))
    }

    /// Register `token_id` for sale at `price_str` (human units).
    ///
    /// The price is validated and converted before any contract call. The
    /// listing fee is read live, then attached as payment to
    /// `createMarketItem`; confirmation is awaited before returning.
    pub fn register_listing(
        &self,
        session: &SigningSession,
        token_contract: Address,
        token_id: u64,
        price_str: &str,
    ) -> Result<ListingConfirmation> {
        let price = units::parse_price(price_str)?;
        let listing_fee = self.listing_price()?;

        let data = calldata(
            "createMarketItem(address,uint256,uint256)",
            &[
                Token::Address(token_contract),
                Token::Uint(U256::from(token_id)),
                Token::Uint(price),
            ],
        );
        let txid = self
            .backend
            .send_transaction(session.account, self.address, listing_fee, data)?;
        log::info!("listing transaction {txid:?} submitted, awaiting confirmation");

        self.backend.await_receipt(txid)?;
        log::info!("token {token_id} listed at {} base units", price);

        Ok(ListingConfirmation {
            txid,
            token_id,
            price,
            listing_fee,
        })
    }
}
