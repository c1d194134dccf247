//! The migration state machine for one chain.
//!
//! A deployed [`NftMigrator`] owns one half of the protocol. On the source
//! chain the reachable transition is burn-and-send ([`NftMigrator::migrate`]);
//! on the destination chain it is receive-and-mint
//! ([`NftMigrator::receive`]). The same type serves both roles: which
//! transition fires depends on which asset registry the instance governs and
//! which messages its endpoint delivers.
//!
//! There is no explicit migration status. A token is "not yet migrated" while
//! it exists in the source registry and "migrated" once it exists in the
//! destination registry; in-flight state lives entirely inside the transport.
//! The only externally auditable trace is the pair of `Burned`/`Minted`
//! records in the two event logs.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::endpoint::{Endpoint, Fee, MessageReceipt, Packet};
use crate::error::MigrationError;
use crate::payload::MigrationPayload;
use crate::peers::PeerRegistry;
use crate::registry::NftRegistry;
use crate::types::{Address, Bytes32, TokenId};

static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Capability token gating peer and endpoint configuration.
///
/// Issued exactly once per migrator, at construction, to the administrative
/// delegate. It is deliberately not `Clone`: whoever holds it may reconfigure
/// which remote sender is authorized to mint, the highest-severity mutation
/// in the system.
#[derive(Debug)]
pub struct DelegateCap {
    instance: u64,
}

/// Append-only observational record emitted at the moment of burn or mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationEvent {
    Burned { token_id: TokenId, owner: Address },
    Minted { token_id: TokenId, recipient: Address },
}

/// One chain's migrator instance.
pub struct NftMigrator<E: Endpoint> {
    /// This contract's own address, used as the sender identity on the wire.
    address: Address,
    endpoint: Arc<E>,
    registry: Arc<RwLock<NftRegistry>>,
    peers: RwLock<PeerRegistry>,
    /// Endpoint id of the migration counterpart chain.
    dst_eid: AtomicU32,
    events: RwLock<Vec<MigrationEvent>>,
    instance: u64,
}

impl<E: Endpoint> NftMigrator<E> {
    /// Creates a migrator and issues its delegate capability.
    pub fn new(
        address: Address,
        endpoint: Arc<E>,
        registry: Arc<RwLock<NftRegistry>>,
        dst_eid: u32,
    ) -> (Self, DelegateCap) {
        let instance = INSTANCE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let migrator = Self {
            address,
            endpoint,
            registry,
            peers: RwLock::new(PeerRegistry::new()),
            dst_eid: AtomicU32::new(dst_eid),
            events: RwLock::new(Vec::new()),
            instance,
        };
        (migrator, DelegateCap { instance })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn destination_eid(&self) -> u32 {
        self.dst_eid.load(Ordering::SeqCst)
    }

    /// Quotes the current transport fee for migrating `token_id` to
    /// `recipient`.
    ///
    /// Builds the exact payload `migrate` would send and returns the
    /// endpoint's price unmodified. Callable by anyone (a third party may pay
    /// migration costs on behalf of a holder). The quote is advisory only,
    /// not a binding reservation: `migrate` recomputes it against live
    /// pricing.
    pub async fn quote(
        &self,
        token_id: TokenId,
        recipient: Address,
    ) -> Result<Fee, MigrationError> {
        let registry = self.registry.read().await;
        if !registry.exists(token_id) {
            return Err(MigrationError::UnknownToken { token_id });
        }
        let payload = MigrationPayload::new(token_id, recipient).encode();
        self.endpoint.quote_fee(self.destination_eid(), &payload)
    }

    /// Burns `token_id` on the local registry and dispatches the migration
    /// payload toward the destination chain.
    ///
    /// Preconditions, checked in order: the caller is owner or approved for
    /// the token; a peer is configured for the destination eid; `value`
    /// covers a freshly recomputed quote (a stale, underpriced external quote
    /// is never honored).
    ///
    /// Effects, in order: burn, record `Burned`, encode, send with the caller
    /// as refund address. If the send fails the burn and the event are rolled
    /// back before the error returns, so the call either fully completes or
    /// leaves no trace. Dispatch is fire-and-forget: there is no pending
    /// state and no way to retract the message afterwards.
    pub async fn migrate(
        &self,
        caller: Address,
        value: u128,
        token_id: TokenId,
        recipient: Address,
    ) -> Result<MessageReceipt, MigrationError> {
        let dst_eid = self.destination_eid();

        // The write guard is held for the whole call: one chain's
        // transactions are strictly serial.
        let mut registry = self.registry.write().await;

        if !registry.is_authorized(caller, token_id)? {
            return Err(MigrationError::NotAuthorized { caller, token_id });
        }

        let peer = self
            .peers
            .read()
            .await
            .get(dst_eid)
            .ok_or(MigrationError::NoPeerConfigured { eid: dst_eid })?;

        let payload = MigrationPayload::new(token_id, recipient).encode();
        let fee = self.endpoint.quote_fee(dst_eid, &payload)?;
        if value < fee.native_fee {
            return Err(MigrationError::InsufficientFee {
                required: fee.native_fee,
                supplied: value,
            });
        }

        // Burn strictly before send. The prior owner and approval are kept
        // so a failed send rolls the whole transition back.
        let prior_approval = registry.get_approved(token_id);
        let owner = registry.burn(token_id)?;
        self.events
            .write()
            .await
            .push(MigrationEvent::Burned { token_id, owner });
        info!(token_id, owner = %owner, dst_eid, peer = %peer, "burned for migration");

        match self
            .endpoint
            .send(self.address, dst_eid, payload, value, caller)
        {
            Ok(receipt) => {
                info!(
                    token_id,
                    recipient = %recipient,
                    nonce = receipt.nonce,
                    native_fee = receipt.fee_paid.native_fee,
                    "migration dispatched"
                );
                Ok(receipt)
            }
            Err(send_err) => {
                self.events.write().await.pop();
                if let Err(restore_err) = registry.restore(token_id, owner, prior_approval) {
                    error!(token_id, %restore_err, "failed to restore burned token");
                }
                warn!(token_id, %send_err, "send failed, burn rolled back");
                Err(send_err)
            }
        }
    }

    /// Handles one inbound message delivered by the local endpoint.
    ///
    /// The sender tuple is the sole authentication: it must match the peer
    /// registered for `src_eid` exactly. A duplicate delivery from the
    /// at-least-once transport fails on the registry's own uniqueness guard
    /// (`TokenExists`) and changes nothing; the destination never mints
    /// outside this path.
    pub async fn receive(
        &self,
        src_eid: u32,
        sender: Bytes32,
        payload: &[u8],
    ) -> Result<(), MigrationError> {
        if !self.peers.read().await.is_peer(src_eid, sender) {
            return Err(MigrationError::UnauthorizedSender { src_eid, sender });
        }

        let decoded = MigrationPayload::decode(payload)?;

        let mut registry = self.registry.write().await;
        registry.mint(decoded.token_id, decoded.recipient)?;
        self.events.write().await.push(MigrationEvent::Minted {
            token_id: decoded.token_id,
            recipient: decoded.recipient,
        });
        info!(
            token_id = decoded.token_id,
            recipient = %decoded.recipient,
            src_eid,
            "minted from migration"
        );
        Ok(())
    }

    /// Registers (or overwrites) the authorized counterpart for a remote
    /// endpoint id. Delegate-only: a wrong entry here either bricks migration
    /// or authorizes an attacker-controlled sender to mint.
    pub async fn set_peer(
        &self,
        cap: &DelegateCap,
        eid: u32,
        peer: Bytes32,
    ) -> Result<(), MigrationError> {
        self.check_cap(cap)?;
        self.peers.write().await.set(eid, peer);
        info!(eid, peer = %peer, "peer registered");
        Ok(())
    }

    /// Sets which remote chain this deployment treats as its migration
    /// counterpart. Delegate-only.
    pub fn set_destination_eid(&self, cap: &DelegateCap, eid: u32) -> Result<(), MigrationError> {
        self.check_cap(cap)?;
        self.dst_eid.store(eid, Ordering::SeqCst);
        info!(eid, "destination endpoint id set");
        Ok(())
    }

    /// Returns a copy of the event log.
    pub async fn events(&self) -> Vec<MigrationEvent> {
        self.events.read().await.clone()
    }

    fn check_cap(&self, cap: &DelegateCap) -> Result<(), MigrationError> {
        if cap.instance != self.instance {
            return Err(MigrationError::InvalidCapability);
        }
        Ok(())
    }
}

/// Drains `inbound` into `migrator.receive`, forever.
///
/// A rejected delivery (unauthorized sender, malformed payload, duplicate
/// mint) is logged and skipped; whether the transport redelivers is its own
/// policy. The task ends when the sending endpoint is dropped.
pub fn spawn_delivery<E: Endpoint + 'static>(
    migrator: Arc<NftMigrator<E>>,
    mut inbound: mpsc::UnboundedReceiver<Packet>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(packet) = inbound.recv().await {
            if let Err(e) = migrator
                .receive(packet.src_eid, packet.sender, &packet.payload)
                .await
            {
                warn!(src_eid = packet.src_eid, sender = %packet.sender, %e, "delivery rejected");
            }
        }
    })
}
