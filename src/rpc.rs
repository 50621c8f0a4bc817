//! JSON-RPC implementation of [`ChainBackend`].
//!
//! Talks to an account-managing provider (a local dev node or a
//! browser-style wallet bridge): the provider signs, this backend only
//! submits and polls. Receipts are polled up to a configurable horizon.

use std::time::{Duration, Instant};

use ethers_core::types::{Address, H256, U256};
use serde_json::{Value, json};

use crate::chain::{ChainBackend, EmittedEvent, SigningSession, TxReceipt};
use crate::error::{Error, Result};
use crate::network::Network;

const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct HttpRpc {
    url: String,
    receipt_timeout: Duration,
    poll_interval: Duration,
    client: reqwest::blocking::Client,
}

impl HttpRpc {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn for_network(network: Network) -> Self {
        Self::new(network.default_rpc_url())
    }

    pub fn with_receipt_horizon(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.receipt_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One JSON-RPC round trip. Returns the full response body; node-level
    /// errors are left in place for the caller to map.
    fn request(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| Error::Rpc(e.to_string()))?;
        response.json().map_err(|e| Error::Rpc(e.to_string()))
    }
}

fn error_message(response: &Value) -> Option<String> {
    response.get("error").map(|e| {
        e.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| e.to_string())
    })
}

fn hex_bytes(s: &str) -> Result<Vec<u8>> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| Error::Rpc(format!("bad hex in response: {e}")))
}

fn hex_word(s: &str) -> Result<U256> {
    let bytes = hex_bytes(s)?;
    if bytes.len() > 32 {
        return Err(Error::Rpc(format!("word too wide: {s}")));
    }
    Ok(U256::from_big_endian(&bytes))
}

/// Flatten one log entry into an [`EmittedEvent`]: indexed topics (minus
/// the signature topic) first, then the 32-byte words of the data section.
fn parse_log(log: &Value) -> Result<EmittedEvent> {
    let contract: Address = log
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Rpc("log missing address".into()))?
        .parse()
        .map_err(|e| Error::Rpc(format!("bad log address: {e}")))?;

    let mut args = Vec::new();
    if let Some(topics) = log.get("topics").and_then(Value::as_array) {
        for topic in topics.iter().skip(1) {
            let topic = topic
                .as_str()
                .ok_or_else(|| Error::Rpc("non-string topic".into()))?;
            args.push(hex_word(topic)?);
        }
    }
    if let Some(data) = log.get("data").and_then(Value::as_str) {
        let bytes = hex_bytes(data)?;
        for word in bytes.chunks(32) {
            args.push(U256::from_big_endian(word));
        }
    }
    Ok(EmittedEvent { contract, args })
}

impl ChainBackend for HttpRpc {
    fn request_account(&self) -> Result<SigningSession> {
        // Browser-style providers expose eth_requestAccounts (with a visible
        // approval prompt); plain nodes only answer eth_accounts.
        let mut response = self.request("eth_requestAccounts", json!([]))?;
        if let Some(message) = error_message(&response) {
            let lower = message.to_lowercase();
            if lower.contains("denied") || lower.contains("reject") {
                return Err(Error::WalletConnectionRejected(message));
            }
            response = self.request("eth_accounts", json!([]))?;
        }
        if let Some(message) = error_message(&response) {
            return Err(Error::WalletConnectionRejected(message));
        }

        let account = response
            .get("result")
            .and_then(Value::as_array)
            .and_then(|accounts| accounts.first())
            .and_then(Value::as_str)
            .ok_or_else(|| Error::WalletConnectionRejected("no account available".into()))?
            .parse::<Address>()
            .map_err(|e| Error::Rpc(format!("bad account address: {e}")))?;

        Ok(SigningSession { account })
    }

    fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);
        let response = self.request("eth_call", params)?;
        if let Some(message) = error_message(&response) {
            return Err(Error::Rpc(message));
        }
        let result = response
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Rpc("eth_call returned no result".into()))?;
        hex_bytes(result)
    }

    fn send_transaction(
        &self,
        from: Address,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> Result<H256> {
        let params = json!([{
            "from": from,
            "to": to,
            "value": format!("{:#x}", value),
            "data": format!("0x{}", hex::encode(data)),
        }]);
        let response = self.request("eth_sendTransaction", params)?;
        if let Some(message) = error_message(&response) {
            // The provider rejected the submission (estimation revert,
            // insufficient funds, user declined at the signing prompt).
            return Err(Error::TransactionReverted(message));
        }
        response
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Rpc("eth_sendTransaction returned no result".into()))?
            .parse()
            .map_err(|e| Error::Rpc(format!("bad transaction hash: {e}")))
    }

    fn await_receipt(&self, tx_hash: H256) -> Result<TxReceipt> {
        let deadline = Instant::now() + self.receipt_timeout;
        loop {
            let response =
                self.request("eth_getTransactionReceipt", json!([format!("{tx_hash:?}")]))?;
            if let Some(message) = error_message(&response) {
                return Err(Error::Rpc(message));
            }

            match response.get("result") {
                Some(receipt) if !receipt.is_null() => {
                    if receipt.get("status").and_then(Value::as_str) == Some("0x0") {
                        return Err(Error::TransactionReverted(format!(
                            "transaction {tx_hash:?} reverted"
                        )));
                    }
                    let mut events = Vec::new();
                    if let Some(logs) = receipt.get("logs").and_then(Value::as_array) {
                        for log in logs {
                            events.push(parse_log(log)?);
                        }
                    }
                    return Ok(TxReceipt { tx_hash, events });
                }
                _ => {
                    if Instant::now() >= deadline {
                        return Err(Error::TransactionTimedOut);
                    }
                    log::debug!("receipt for {tx_hash:?} not yet available, polling");
                    std::thread::sleep(self.poll_interval);
                }
            }
        }
    }
}
