//! Configuration management for the two-chain migration demo.
//!
//! Configuration covers the two chains the binary wires together: endpoint
//! ids, collection names, the token seeded on the source side, and the
//! transport fee schedule of each chain's endpoint.

use serde::{Deserialize, Serialize};

use crate::endpoint::FeeSchedule;
use crate::types::{Address, TokenId};

/// Top-level configuration: the source chain, the destination chain, and
/// the demo token minted on the source side before migrating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chain the token starts on (burn side).
    pub source_chain: ChainConfig,
    /// Chain the token migrates to (mint side).
    pub destination_chain: ChainConfig,
    /// Demo seed: token id and owner minted on the source chain at startup.
    pub demo: DemoConfig,
}

/// One chain's deployment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Human-readable name for the chain
    pub name: String,
    /// Endpoint id of this chain's messaging endpoint
    pub eid: u32,
    /// Address at which the migrator is deployed on this chain
    pub migrator_addr: Address,
    /// NFT collection name on this chain
    pub collection: String,
    /// Transport pricing of this chain's endpoint
    pub fees: FeeSchedule,
}

/// Parameters for the single migration the demo binary runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Token id minted to `owner` on the source chain
    pub token_id: TokenId,
    /// Initial owner of the token on the source chain
    pub owner: Address,
    /// Recipient on the destination chain
    pub recipient: Address,
}

impl Config {
    /// Validates the configuration.
    ///
    /// The two chains must carry distinct endpoint ids: a shared eid would
    /// make peer routing ambiguous.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source_chain.eid == self.destination_chain.eid {
            return Err(anyhow::anyhow!(
                "Configuration error: source and destination chains have the same endpoint id {}. Each chain must have a unique endpoint id.",
                self.source_chain.eid
            ));
        }
        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// Honors `NFT_MIGRATOR_CONFIG_PATH` (used by tests), falling back to
    /// `config/nft-migrator.toml`. A missing file is an error pointing at the
    /// checked-in template.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("NFT_MIGRATOR_CONFIG_PATH")
            .unwrap_or_else(|_| "config/nft-migrator.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/nft-migrator.template.toml config/nft-migrator.toml\n\
                Then edit config/nft-migrator.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Default two-chain configuration for local development and tests.
    pub fn default() -> Self {
        Self {
            source_chain: ChainConfig {
                name: "Chain A".to_string(),
                eid: 1,
                migrator_addr: Address([0x0a; 20]),
                collection: "Test NFT Collection".to_string(),
                fees: FeeSchedule {
                    base_fee: 100,
                    per_byte_fee: 2,
                },
            },
            destination_chain: ChainConfig {
                name: "Chain B".to_string(),
                eid: 2,
                migrator_addr: Address([0x0b; 20]),
                collection: "Migrated NFT Collection".to_string(),
                fees: FeeSchedule {
                    base_fee: 100,
                    per_byte_fee: 2,
                },
            },
            demo: DemoConfig {
                token_id: 1,
                owner: Address([0x01; 20]),
                recipient: Address([0x02; 20]),
            },
        }
    }
}
