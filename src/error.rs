use thiserror::Error;

use crate::draft::DraftId;
use crate::flow::FlowState;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage service unavailable: {0}")]
    StorageUnavailable(String),

    #[error("wallet connection rejected: {0}")]
    WalletConnectionRejected(String),

    #[error("transaction reverted: {0}")]
    TransactionReverted(String),

    #[error("no transaction receipt arrived within the provider horizon")]
    TransactionTimedOut,

    #[error("malformed mint receipt: {0}")]
    MalformedReceipt(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("metadata encoding failed: {0}")]
    Metadata(String),

    #[error("rpc transport error: {0}")]
    Rpc(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the listing orchestration
/// ([`ListingFlow`](crate::flow::ListingFlow) / [`EaselNode`](crate::node::EaselNode)).
#[derive(Debug)]
pub enum FlowError {
    /// A required draft field (name, description, price or file) is absent.
    /// The flow performed no network call and remains `Idle`.
    MissingInput(&'static str),
    /// Another listing attempt for the same draft is already in flight.
    InFlight(DraftId),
    /// The internal flow mutex was poisoned by a prior panic.
    MutexPoisoned,
    /// A `spawn_blocking` task failed to join.
    Task(String),
    /// A component failed before the mint completed; nothing is on-chain.
    Aborted { stage: FlowState, source: Error },
    /// The token was minted but the listing step failed. The asset exists
    /// on-chain unlisted; recover with [`relist`](crate::node::EaselNode::relist).
    MintedUnlisted { token_id: u64, source: Error },
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::MissingInput(field) => write!(f, "missing required input: {field}"),
            FlowError::InFlight(id) => {
                write!(f, "a listing attempt for draft {id} is already in flight")
            }
            FlowError::MutexPoisoned => write!(f, "internal mutex poisoned by a prior panic"),
            FlowError::Task(e) => write!(f, "task join error: {e}"),
            FlowError::Aborted { stage, source } => {
                write!(f, "listing flow aborted in state {stage:?}: {source}")
            }
            FlowError::MintedUnlisted { token_id, source } => {
                write!(f, "token {token_id} minted but listing failed: {source}")
            }
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowError::Aborted { source, .. } | FlowError::MintedUnlisted { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
