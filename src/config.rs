use ethers_core::types::Address;

use crate::network::Network;

/// Deployment configuration for one marketplace installation.
///
/// The two contract addresses are fixed at deploy time and are never taken
/// from user input.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Address of the token (NFT) contract.
    pub token_address: Address,
    /// Address of the marketplace contract.
    pub market_address: Address,
    /// Base URL of the content gateway used to resolve uploaded content ids.
    pub gateway_url: String,
}

impl MarketConfig {
    /// Configuration with the gateway preset for `network`.
    pub fn new(network: Network, token_address: Address, market_address: Address) -> Self {
        Self {
            token_address,
            market_address,
            gateway_url: network.ipfs_gateway_url().to_string(),
        }
    }

    pub fn with_gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }
}
