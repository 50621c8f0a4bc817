//! The asset-creation-and-listing orchestration flow.
//!
//! A strict linear chain: upload file → compose metadata → upload metadata
//! → resolve wallet session → mint → list. Each step starts only after the
//! previous step's result is available, each can fail independently, and
//! every failure propagates to the caller with the stage it occurred in —
//! nothing is swallowed into a log line.
//!
//! There is no rollback. If the mint succeeds and the listing fails, the
//! token exists on-chain unlisted; that outcome is reported distinctly as
//! [`FlowError::MintedUnlisted`] and can be recovered with
//! [`ListingFlow::relist`].

use serde::Serialize;

use crate::chain::{ChainBackend, SigningSession};
use crate::config::MarketConfig;
use crate::draft::AssetDraft;
use crate::error::{Error, FlowError};
use crate::listing::{ListingConfirmation, Marketplace};
use crate::metadata::TokenMetadata;
use crate::mint::{MintedToken, TokenContract};
use crate::storage::{ContentRef, ContentStore};

/// Observable state of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Uploading,
    Composing,
    AwaitingSignature,
    Minting,
    Listing,
    Done,
    Aborted,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingReceipt {
    pub token_id: u64,
    pub image: ContentRef,
    pub metadata: ContentRef,
    pub mint_txid: ethers_core::types::H256,
    pub listing: ListingConfirmation,
}

/// Blocking orchestrator over an injected storage backend and chain
/// backend. Wrap in [`EaselNode`](crate::node::EaselNode) for async use.
pub struct ListingFlow<S: ContentStore, C: ChainBackend> {
    store: S,
    chain: C,
    config: MarketConfig,
    state: FlowState,
}

impl<S: ContentStore, C: ChainBackend> ListingFlow<S, C> {
    pub fn new(store: S, chain: C, config: MarketConfig) -> Self {
        Self {
            store,
            chain,
            config,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    fn abort(&mut self, source: Error) -> FlowError {
        let stage = self.state;
        log::warn!("listing flow aborted in state {stage:?}: {source}");
        self.state = FlowState::Aborted;
        FlowError::Aborted { stage, source }
    }

    /// Run the full flow for one draft: upload, compose, mint, list.
    ///
    /// Missing required input short-circuits while still `Idle`, before any
    /// network call. A failure after a successful mint is reported as
    /// `MintedUnlisted` with the minted token id.
    pub fn create_and_list(&mut self, draft: &AssetDraft) -> Result<ListingReceipt, FlowError> {
        self.state = FlowState::Idle;
        if let Some(field) = draft.missing_field() {
            log::debug!("draft {} not submitted, missing {field}", draft.id());
            return Err(FlowError::MissingInput(field));
        }
        let file = draft.file.as_deref().unwrap_or_default();

        // 1. Upload the asset file.
        self.state = FlowState::Uploading;
        log::info!("uploading {} bytes for draft {}", file.len(), draft.id());
        let image = match self.store.add(file) {
            Ok(cid) => ContentRef::new(&self.config.gateway_url, cid),
            Err(e) => return Err(self.abort(e)),
        };

        // 2. Compose and upload the metadata document.
        self.state = FlowState::Composing;
        let document = TokenMetadata::compose(draft, &image.url);
        let json = match document.to_json() {
            Ok(json) => json,
            Err(e) => return Err(self.abort(e)),
        };
        let metadata = match self.store.add(json.as_bytes()) {
            Ok(cid) => ContentRef::new(&self.config.gateway_url, cid),
            Err(e) => return Err(self.abort(e)),
        };

        // 3. Resolve a signing session; may suspend on the wallet prompt.
        let session = match self.resolve_session() {
            Ok(session) => session,
            Err(e) => return Err(self.abort(e)),
        };

        // 4. Mint, binding the token to the metadata URL. The URL is passed
        //    explicitly; the mint step never reaches back into upload state.
        self.state = FlowState::Minting;
        let minted = {
            let token = TokenContract::new(&self.chain, self.config.token_address);
            token.create_token(&session, &metadata.url)
        };
        let minted = match minted {
            Ok(minted) => minted,
            Err(e) => return Err(self.abort(e)),
        };

        // 5. Register the sale. From here on the token exists on-chain, so
        //    failure is a partial-failure state, not a plain abort.
        self.state = FlowState::Listing;
        let listing = match self.register(&session, &minted, &draft.price) {
            Ok(listing) => listing,
            Err(source) => {
                log::warn!(
                    "token {} minted but listing failed: {source}",
                    minted.token_id
                );
                self.state = FlowState::Aborted;
                return Err(FlowError::MintedUnlisted {
                    token_id: minted.token_id,
                    source,
                });
            }
        };

        self.state = FlowState::Done;
        log::info!("draft {} listed as token {}", draft.id(), listing.token_id);
        Ok(ListingReceipt {
            token_id: minted.token_id,
            image,
            metadata,
            mint_txid: minted.txid,
            listing,
        })
    }

    /// Re-attempt the listing for an already-minted token.
    ///
    /// Recovery path for [`FlowError::MintedUnlisted`]: no upload and no new
    /// mint, only fee read and `createMarketItem`.
    pub fn relist(&mut self, token_id: u64, price: &str) -> Result<ListingConfirmation, FlowError> {
        let session = match self.resolve_session() {
            Ok(session) => session,
            Err(e) => return Err(self.abort(e)),
        };

        self.state = FlowState::Listing;
        match self.register_token_id(&session, token_id, price) {
            Ok(listing) => {
                self.state = FlowState::Done;
                log::info!("token {token_id} re-listed");
                Ok(listing)
            }
            Err(source) => {
                self.state = FlowState::Aborted;
                Err(FlowError::MintedUnlisted { token_id, source })
            }
        }
    }

    fn resolve_session(&mut self) -> Result<SigningSession, Error> {
        // Re-resolved every attempt; never cached across attempts.
        self.state = FlowState::AwaitingSignature;
        self.chain.request_account()
    }

    fn register(
        &self,
        session: &SigningSession,
        minted: &MintedToken,
        price: &str,
    ) -> Result<ListingConfirmation, Error> {
        self.register_token_id(session, minted.token_id, price)
    }

    fn register_token_id(
        &self,
        session: &SigningSession,
        token_id: u64,
        price: &str,
    ) -> Result<ListingConfirmation, Error> {
        let market = Marketplace::new(&self.chain, self.config.market_address);
        market.register_listing(session, self.config.token_address, token_id, price)
    }
}
