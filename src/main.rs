//! NFT Migration Demo Service
//!
//! Wires two in-process chains together through channel endpoints and runs
//! one full migration: seed a token on the source chain, quote, migrate
//! (burn + send), and watch the destination chain mint it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;

use nft_migrator::config::Config;
use nft_migrator::{
    spawn_delivery, ChannelEndpoint, MigrationEvent, NftMigrator, NftRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting NFT Migration Demo Service");

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("NFT Migration Demo Service");
        println!();
        println!("Usage: nft-migrator [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  NFT_MIGRATOR_CONFIG_PATH    Path to config file (overrides --config)");
        return Ok(());
    }

    let mut config_path = None;
    let mut i = 1; // Skip program name
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }
    if let Some(path) = config_path {
        std::env::set_var("NFT_MIGRATOR_CONFIG_PATH", &path);
        info!("Using custom config: {}", path);
    }

    let config = Config::load()?;
    info!("Configuration loaded successfully");

    // Deploy both chains: endpoint + registry + migrator on each side.
    let source = &config.source_chain;
    let destination = &config.destination_chain;

    let endpoint_a = Arc::new(ChannelEndpoint::new(source.eid, source.fees));
    let endpoint_b = Arc::new(ChannelEndpoint::new(destination.eid, destination.fees));
    ChannelEndpoint::link(&endpoint_a, &endpoint_b);

    let registry_a = Arc::new(RwLock::new(NftRegistry::new(source.collection.clone())));
    let registry_b = Arc::new(RwLock::new(NftRegistry::new(destination.collection.clone())));

    let (migrator_a, cap_a) = NftMigrator::new(
        source.migrator_addr,
        Arc::clone(&endpoint_a),
        Arc::clone(&registry_a),
        destination.eid,
    );
    let migrator_a = Arc::new(migrator_a);
    let (migrator_b, cap_b) = NftMigrator::new(
        destination.migrator_addr,
        Arc::clone(&endpoint_b),
        Arc::clone(&registry_b),
        source.eid,
    );
    let migrator_b = Arc::new(migrator_b);

    // Register each side's counterpart as the sole authorized peer.
    migrator_a
        .set_peer(&cap_a, destination.eid, destination.migrator_addr.to_bytes32())
        .await?;
    migrator_b
        .set_peer(&cap_b, source.eid, source.migrator_addr.to_bytes32())
        .await?;

    // The destination side drains inbound deliveries into receive-and-mint.
    let inbound_b = endpoint_b
        .take_inbound()
        .ok_or_else(|| anyhow::anyhow!("destination inbound channel already taken"))?;
    let delivery = spawn_delivery(Arc::clone(&migrator_b), inbound_b);

    // Seed the demo token on the source chain.
    let demo = &config.demo;
    registry_a.write().await.mint(demo.token_id, demo.owner)?;
    info!(token_id = demo.token_id, owner = %demo.owner, chain = %source.name, "seeded token");

    // Quote, then migrate with exactly the quoted native fee.
    let fee = migrator_a.quote(demo.token_id, demo.recipient).await?;
    info!(native_fee = fee.native_fee, "migration quoted");

    let receipt = migrator_a
        .migrate(demo.owner, fee.native_fee, demo.token_id, demo.recipient)
        .await?;
    info!(nonce = receipt.nonce, "migration submitted");

    // Wait for the destination mint to land.
    let minted = MigrationEvent::Minted {
        token_id: demo.token_id,
        recipient: demo.recipient,
    };
    loop {
        if migrator_b.events().await.contains(&minted) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let new_owner = registry_b.read().await.owner_of(demo.token_id)?;
    info!(
        token_id = demo.token_id,
        owner = %new_owner,
        chain = %destination.name,
        "migration complete"
    );

    // The union of the two event logs is the full audit trail.
    let trail = (migrator_a.events().await, migrator_b.events().await);
    println!("source events:      {}", serde_json::to_string(&trail.0)?);
    println!("destination events: {}", serde_json::to_string(&trail.1)?);

    delivery.abort();
    Ok(())
}
