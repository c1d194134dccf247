//! Shared test helpers for integration tests.
//!
//! Provides dummy addresses, a per-chain fixture, and builders that wire two
//! chains together the way a deployment would: endpoints linked, peers
//! registered both ways.

use std::sync::Arc;

use tokio::sync::RwLock;

use nft_migrator::{
    Address, ChannelEndpoint, DelegateCap, FeeSchedule, NftMigrator, NftRegistry, TokenId,
};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Endpoint id of the source chain
#[allow(dead_code)]
pub const EID_A: u32 = 1;

/// Endpoint id of the destination chain
#[allow(dead_code)]
pub const EID_B: u32 = 2;

/// Default transport pricing used by both chains
#[allow(dead_code)]
pub const DUMMY_FEES: FeeSchedule = FeeSchedule {
    base_fee: 100,
    per_byte_fee: 2,
};

/// Token holder on the source chain
#[allow(dead_code)]
pub const DUMMY_ALICE: &str = "0x0000000000000000000000000000000000000001";

/// Recipient on the destination chain
#[allow(dead_code)]
pub const DUMMY_BOB: &str = "0x0000000000000000000000000000000000000002";

/// Third party with no approvals
#[allow(dead_code)]
pub const DUMMY_CAROL: &str = "0x0000000000000000000000000000000000000003";

/// Migrator contract address on the source chain
#[allow(dead_code)]
pub const DUMMY_MIGRATOR_A: &str = "0x00000000000000000000000000000000000000aa";

/// Migrator contract address on the destination chain
#[allow(dead_code)]
pub const DUMMY_MIGRATOR_B: &str = "0x00000000000000000000000000000000000000bb";

#[allow(dead_code)]
pub fn alice() -> Address {
    DUMMY_ALICE.parse().expect("valid address literal")
}

#[allow(dead_code)]
pub fn bob() -> Address {
    DUMMY_BOB.parse().expect("valid address literal")
}

#[allow(dead_code)]
pub fn carol() -> Address {
    DUMMY_CAROL.parse().expect("valid address literal")
}

#[allow(dead_code)]
pub fn migrator_a_addr() -> Address {
    DUMMY_MIGRATOR_A.parse().expect("valid address literal")
}

#[allow(dead_code)]
pub fn migrator_b_addr() -> Address {
    DUMMY_MIGRATOR_B.parse().expect("valid address literal")
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Everything deployed on one chain. Not every binary touches every field.
#[allow(dead_code)]
pub struct ChainFixture {
    pub endpoint: Arc<ChannelEndpoint>,
    pub registry: Arc<RwLock<NftRegistry>>,
    pub migrator: Arc<NftMigrator<ChannelEndpoint>>,
    pub cap: DelegateCap,
}

/// Deploys one chain: endpoint, registry, migrator. No routes, no peers.
#[allow(dead_code)]
pub fn build_chain(eid: u32, dst_eid: u32, migrator_addr: Address) -> ChainFixture {
    let endpoint = Arc::new(ChannelEndpoint::new(eid, DUMMY_FEES));
    let registry = Arc::new(RwLock::new(NftRegistry::new(format!("Collection {}", eid))));
    let (migrator, cap) = NftMigrator::new(
        migrator_addr,
        Arc::clone(&endpoint),
        Arc::clone(&registry),
        dst_eid,
    );
    ChainFixture {
        endpoint,
        registry,
        migrator: Arc::new(migrator),
        cap,
    }
}

/// Deploys two chains, links their endpoints, and registers each side's
/// counterpart as the authorized peer.
#[allow(dead_code)]
pub async fn build_linked_pair() -> (ChainFixture, ChainFixture) {
    let chain_a = build_chain(EID_A, EID_B, migrator_a_addr());
    let chain_b = build_chain(EID_B, EID_A, migrator_b_addr());
    ChannelEndpoint::link(&chain_a.endpoint, &chain_b.endpoint);

    chain_a
        .migrator
        .set_peer(&chain_a.cap, EID_B, migrator_b_addr().to_bytes32())
        .await
        .expect("set peer on chain A");
    chain_b
        .migrator
        .set_peer(&chain_b.cap, EID_A, migrator_a_addr().to_bytes32())
        .await
        .expect("set peer on chain B");

    (chain_a, chain_b)
}

/// Mints a token directly on a chain's registry (test seeding, the way the
/// collection owner would mint before any migration).
#[allow(dead_code)]
pub async fn mint_to(chain: &ChainFixture, token_id: TokenId, owner: Address) {
    chain
        .registry
        .write()
        .await
        .mint(token_id, owner)
        .expect("seed mint");
}
