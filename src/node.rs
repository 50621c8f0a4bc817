//! `EaselNode` — async coordinator over the blocking listing flow.
//!
//! Owns the flow behind `Arc<Mutex<…>>`; public methods are `async` and
//! dispatch via `tokio::task::spawn_blocking`, so blocking storage and
//! chain I/O (including the wallet's approval prompt) never stalls the
//! caller's runtime. A per-draft in-flight set rejects double submission.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::chain::ChainBackend;
use crate::config::MarketConfig;
use crate::draft::{AssetDraft, DraftId};
use crate::error::FlowError;
use crate::flow::{FlowState, ListingFlow, ListingReceipt};
use crate::listing::ListingConfirmation;
use crate::storage::ContentStore;

pub struct EaselNode<S: ContentStore, C: ChainBackend> {
    flow: Arc<Mutex<ListingFlow<S, C>>>,
    in_flight: Arc<Mutex<HashSet<DraftId>>>,
}

impl<S: ContentStore, C: ChainBackend> EaselNode<S, C> {
    pub fn new(store: S, chain: C, config: MarketConfig) -> Self {
        Self {
            flow: Arc::new(Mutex::new(ListingFlow::new(store, chain, config))),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Run a closure against the flow on a blocking thread.
    ///
    /// The mutex is held for the entire closure, which may include network
    /// I/O and the wallet prompt. This serializes all flow calls.
    async fn with_flow<F, R>(&self, f: F) -> Result<R, FlowError>
    where
        F: FnOnce(&mut ListingFlow<S, C>) -> Result<R, FlowError> + Send + 'static,
        R: Send + 'static,
    {
        let flow = self.flow.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = flow.lock().map_err(|_| FlowError::MutexPoisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| FlowError::Task(e.to_string()))?
    }

    /// Upload, mint and list one draft. See
    /// [`ListingFlow::create_and_list`] for the step semantics.
    ///
    /// A second submission of the same draft while one is in flight fails
    /// with [`FlowError::InFlight`] and performs no work.
    pub async fn create_and_list(&self, draft: AssetDraft) -> Result<ListingReceipt, FlowError> {
        let id = draft.id();
        {
            let mut in_flight = self
                .in_flight
                .lock()
                .map_err(|_| FlowError::MutexPoisoned)?;
            if !in_flight.insert(id) {
                return Err(FlowError::InFlight(id));
            }
        }

        let result = self.with_flow(move |flow| flow.create_and_list(&draft)).await;

        // Release on every path, including task failure.
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&id);
        }
        result
    }

    /// Re-attempt the listing for an already-minted token; the recovery
    /// path for [`FlowError::MintedUnlisted`].
    pub async fn relist(
        &self,
        token_id: u64,
        price: String,
    ) -> Result<ListingConfirmation, FlowError> {
        self.with_flow(move |flow| flow.relist(token_id, &price))
            .await
    }

    /// Current state of the flow's state machine.
    pub async fn state(&self) -> Result<FlowState, FlowError> {
        self.with_flow(|flow| Ok(flow.state())).await
    }
}
