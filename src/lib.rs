//! Cross-Chain NFT Migration Protocol
//!
//! This crate implements the migration state machine: an asset recorded in
//! one ownership ledger is irrevocably burned there and an equivalent asset
//! is minted on a second ledger, coordinated through an asynchronous
//! cross-chain messaging endpoint. The two halves are independent per-chain
//! state machines connected only by a one-way, at-least-once, unordered
//! message channel.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod migrator;
pub mod payload;
pub mod peers;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use endpoint::{ChannelEndpoint, Endpoint, Fee, FeeSchedule, MessageReceipt, Packet};
pub use error::MigrationError;
pub use migrator::{spawn_delivery, DelegateCap, MigrationEvent, NftMigrator};
pub use payload::{MigrationPayload, PAYLOAD_LEN};
pub use registry::NftRegistry;
pub use types::{Address, Bytes32, TokenId};
