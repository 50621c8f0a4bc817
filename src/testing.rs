//! Test doubles for the storage and chain boundaries.
//!
//! Both fakes are cheaply cloneable handles over shared interior state, so
//! a test can keep a handle for assertions after moving the other into a
//! flow or node.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use ethers_core::types::{Address, H256, U256};

use crate::chain::{ChainBackend, EmittedEvent, SigningSession, TxReceipt};
use crate::error::{Error, Result};
use crate::storage::ContentStore;

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreInner {
    uploads: Vec<Vec<u8>>,
    cids: VecDeque<String>,
    unavailable: bool,
    gate: Option<mpsc::Receiver<()>>,
}

/// In-memory [`ContentStore`]: records every payload and hands out scripted
/// (or counter-derived) content ids.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a content id to return from the next `add` call.
    pub fn push_cid(&self, cid: impl Into<String>) {
        self.inner.lock().unwrap().cids.push_back(cid.into());
    }

    /// Make subsequent `add` calls fail with `StorageUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }

    /// Block `add` calls until the returned sender fires (or is dropped).
    /// Used to hold a flow mid-upload while testing the in-flight guard.
    pub fn hold_uploads(&self) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.inner.lock().unwrap().gate = Some(rx);
        tx
    }

    pub fn upload_count(&self) -> usize {
        self.inner.lock().unwrap().uploads.len()
    }

    pub fn upload(&self, index: usize) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().uploads.get(index).cloned()
    }
}

impl ContentStore for MemoryStore {
    fn add(&self, payload: &[u8]) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(gate) = &inner.gate {
            gate.recv().ok();
        }
        if inner.unavailable {
            return Err(Error::StorageUnavailable("scripted outage".into()));
        }
        inner.uploads.push(payload.to_vec());
        let cid = inner
            .cids
            .pop_front()
            .unwrap_or_else(|| format!("Qm{:04}", inner.uploads.len()));
        Ok(cid)
    }
}

// ---------------------------------------------------------------------------
// ScriptedChain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedKind {
    /// Read-only `call`.
    Call,
    /// State-changing `send_transaction`.
    Send,
}

/// One recorded backend invocation, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub kind: RecordedKind,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct ChainInner {
    account: Option<Address>,
    recorded: Vec<RecordedCall>,
    call_results: VecDeque<Vec<u8>>,
    send_errors: VecDeque<Error>,
    receipts: VecDeque<Result<TxReceipt>>,
    next_tx: u64,
}

/// Scripted [`ChainBackend`]: returns queued results and records every
/// invocation for assertion.
#[derive(Clone, Default)]
pub struct ScriptedChain {
    inner: Arc<Mutex<ChainInner>>,
}

impl ScriptedChain {
    pub fn new(account: Address) -> Self {
        let chain = Self::default();
        chain.inner.lock().unwrap().account = Some(account);
        chain
    }

    /// A chain whose wallet declines the connection prompt.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Queue raw return data for the next read-only call.
    pub fn push_call_result(&self, data: Vec<u8>) {
        self.inner.lock().unwrap().call_results.push_back(data);
    }

    /// Queue a listing fee (a single ABI word) for the next fee read.
    pub fn push_fee(&self, fee: U256) {
        let mut word = [0u8; 32];
        fee.to_big_endian(&mut word);
        self.push_call_result(word.to_vec());
    }

    /// Queue an error for the next `send_transaction`.
    pub fn push_send_error(&self, error: Error) {
        self.inner.lock().unwrap().send_errors.push_back(error);
    }

    pub fn push_receipt(&self, receipt: TxReceipt) {
        self.inner.lock().unwrap().receipts.push_back(Ok(receipt));
    }

    pub fn push_receipt_error(&self, error: Error) {
        self.inner.lock().unwrap().receipts.push_back(Err(error));
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().recorded.clone()
    }

    pub fn sends(&self) -> Vec<RecordedCall> {
        self.recorded()
            .into_iter()
            .filter(|c| c.kind == RecordedKind::Send)
            .collect()
    }
}

impl ChainBackend for ScriptedChain {
    fn request_account(&self) -> Result<SigningSession> {
        match self.inner.lock().unwrap().account {
            Some(account) => Ok(SigningSession { account }),
            None => Err(Error::WalletConnectionRejected(
                "user declined the connection prompt".into(),
            )),
        }
    }

    fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap();
        inner.recorded.push(RecordedCall {
            kind: RecordedKind::Call,
            to,
            value: U256::zero(),
            data,
        });
        inner
            .call_results
            .pop_front()
            .ok_or_else(|| Error::Rpc("no scripted call result".into()))
    }

    fn send_transaction(
        &self,
        _from: Address,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> Result<H256> {
        let mut inner = self.inner.lock().unwrap();
        inner.recorded.push(RecordedCall {
            kind: RecordedKind::Send,
            to,
            value,
            data,
        });
        if let Some(error) = inner.send_errors.pop_front() {
            return Err(error);
        }
        inner.next_tx += 1;
        Ok(H256::from_low_u64_be(inner.next_tx))
    }

    fn await_receipt(&self, tx_hash: H256) -> Result<TxReceipt> {
        self.inner
            .lock()
            .unwrap()
            .receipts
            .pop_front()
            .unwrap_or_else(|| Err(Error::Rpc(format!("no scripted receipt for {tx_hash:?}"))))
    }
}

// ---------------------------------------------------------------------------
// Receipt builders
// ---------------------------------------------------------------------------

/// A mint receipt whose first event is Transfer-shaped, carrying `token_id`
/// as the third argument.
pub fn mint_receipt(token_id: u64) -> TxReceipt {
    TxReceipt {
        tx_hash: H256::from_low_u64_be(token_id),
        events: vec![EmittedEvent {
            contract: Address::zero(),
            args: vec![U256::zero(), U256::from(1), U256::from(token_id)],
        }],
    }
}

/// A bare confirmation receipt with no events.
pub fn confirm_receipt() -> TxReceipt {
    TxReceipt {
        tx_hash: H256::from_low_u64_be(u64::MAX),
        events: vec![],
    }
}
