use serde::Deserialize;

/// Network presets for the chains the marketplace contracts are deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Polygon,
    Mumbai,
    Localhost,
}

impl Network {
    pub fn is_mainnet(self) -> bool {
        matches!(self, Network::Polygon)
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Polygon => "https://polygon-rpc.com",
            Network::Mumbai => "https://rpc-mumbai.maticvigil.com",
            Network::Localhost => "http://localhost:8545",
        }
    }

    pub fn ipfs_api_url(self) -> &'static str {
        match self {
            Network::Polygon | Network::Mumbai => "https://ipfs.infura.io:5001",
            Network::Localhost => "http://localhost:5001",
        }
    }

    pub fn ipfs_gateway_url(self) -> &'static str {
        match self {
            Network::Polygon | Network::Mumbai => "https://ipfs.infura.io",
            Network::Localhost => "http://localhost:8080",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Polygon => "polygon",
            Network::Mumbai => "mumbai",
            Network::Localhost => "localhost",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polygon" | "mainnet" => Ok(Network::Polygon),
            "mumbai" | "testnet" => Ok(Network::Mumbai),
            "localhost" | "local" => Ok(Network::Localhost),
            _ => Err(format!("invalid network: {}", s)),
        }
    }
}
