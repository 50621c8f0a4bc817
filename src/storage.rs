//! Content-addressed storage boundary.
//!
//! The uploader is an injected dependency of the listing flow so tests can
//! substitute a fake network; nothing in this crate holds a global storage
//! client.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::network::Network;

/// A resolvable locator for uploaded bytes. Immutable; one per uploaded
/// blob (the raw file, then the metadata JSON).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    /// Opaque content address returned by the storage network.
    pub content_id: String,
    /// Public fetch URL, `<gateway>/ipfs/<content_id>`.
    pub url: String,
}

impl ContentRef {
    pub fn new(gateway_url: &str, content_id: impl Into<String>) -> Self {
        let content_id = content_id.into();
        let url = format!("{}/ipfs/{}", gateway_url.trim_end_matches('/'), content_id);
        Self { content_id, url }
    }
}

/// Backend for pushing payloads to the content-addressed storage network.
///
/// Writes immutable data; not transactional and not idempotent at the call
/// level (re-uploading identical bytes performs network I/O even though
/// content-addressing may return the same id).
pub trait ContentStore: Send + 'static {
    /// Upload a payload, returning its content id.
    fn add(&self, payload: &[u8]) -> Result<String>;
}

/// Storage backend speaking the IPFS HTTP API.
pub struct IpfsHttpStore {
    api_url: String,
}

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

impl IpfsHttpStore {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn for_network(network: Network) -> Self {
        Self::new(network.ipfs_api_url())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl ContentStore for IpfsHttpStore {
    fn add(&self, payload: &[u8]) -> Result<String> {
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", reqwest::blocking::multipart::Part::bytes(payload.to_vec()));

        let response = reqwest::blocking::Client::new()
            .post(format!("{}/api/v0/add", self.api_url))
            .multipart(form)
            .send()
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::StorageUnavailable(format!(
                "add returned status {}",
                response.status()
            )));
        }

        let added: AddResponse = response
            .json()
            .map_err(|e| Error::StorageUnavailable(format!("bad add response: {e}")))?;

        log::debug!("uploaded {} bytes as {}", payload.len(), added.hash);
        Ok(added.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_ref_templates_the_gateway_url() {
        let r = ContentRef::new("https://ipfs.infura.io", "Qm123");
        assert_eq!(r.url, "https://ipfs.infura.io/ipfs/Qm123");
    }

    #[test]
    fn content_ref_tolerates_trailing_slash() {
        let r = ContentRef::new("https://ipfs.infura.io/", "Qm123");
        assert_eq!(r.url, "https://ipfs.infura.io/ipfs/Qm123");
    }
}
