//! Client-side SDK for minting a digital asset and listing it for sale on
//! an on-chain marketplace.
//!
//! The core is a strict linear flow with no persisted partial progress:
//! upload the asset file to content-addressed storage, compose and upload
//! the token metadata document, resolve a wallet signing session, mint a
//! token bound to the metadata URL, then register the sale on the
//! marketplace contract paying its listing fee. Storage and chain access
//! sit behind the [`ContentStore`] and [`ChainBackend`] traits so the flow
//! is testable against fakes.

pub mod chain;
pub mod config;
pub mod draft;
pub mod error;
pub mod flow;
pub mod listing;
pub mod metadata;
pub mod mint;
pub mod network;
pub mod node;
pub mod rpc;
pub mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod units;

pub use chain::{ChainBackend, EmittedEvent, SigningSession, TxReceipt};
pub use config::MarketConfig;
pub use draft::{AssetDraft, DraftId};
pub use error::{Error, FlowError, Result};
pub use flow::{FlowState, ListingFlow, ListingReceipt};
pub use listing::{ListingConfirmation, Marketplace};
pub use metadata::TokenMetadata;
pub use mint::{MintedToken, TokenContract, token_id_from_receipt};
pub use network::Network;
pub use node::EaselNode;
pub use rpc::HttpRpc;
pub use storage::{ContentRef, ContentStore, IpfsHttpStore};
pub use units::{PRICE_DECIMALS, format_price, parse_price};

// Re-export the EVM primitive types used across the public API.
pub use ethers_core::types::{Address, H256, U256};
