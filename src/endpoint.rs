//! Cross-chain messaging endpoint: the transport seam.
//!
//! The migrator only ever talks to the transport through the [`Endpoint`]
//! trait: quote a fee, send a payload. Inbound delivery arrives on a channel
//! drained by the destination chain's delivery task. The transport guarantees
//! at-least-once delivery to the locally registered receiver and an
//! unforgeable `(src_eid, sender)` tuple per message; it guarantees nothing
//! about ordering across distinct messages.
//!
//! [`ChannelEndpoint`] is the in-process implementation, wiring chains
//! together over tokio mpsc channels the way a mock endpoint pair wires two
//! local deployments in a test harness.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::MigrationError;
use crate::types::{Address, Bytes32};

/// Price to deliver one message, as quoted by the transport at call time.
/// Never cached by the protocol: fee prices are time-varying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Fee payable in the native currency of the source chain.
    pub native_fee: u128,
    /// Fee payable in the transport's alternate token (unused by this
    /// protocol, always quoted as zero by the channel endpoint).
    pub token_fee: u128,
}

/// Transport pricing parameters: a flat base plus a per-payload-byte rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_fee: u64,
    pub per_byte_fee: u64,
}

impl FeeSchedule {
    pub fn quote(&self, payload_len: usize) -> Fee {
        Fee {
            native_fee: self.base_fee as u128 + self.per_byte_fee as u128 * payload_len as u128,
            token_fee: 0,
        }
    }
}

/// Receipt returned by a successful send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageReceipt {
    /// Outbound nonce assigned by the endpoint.
    pub nonce: u64,
    /// The fee actually charged.
    pub fee_paid: Fee,
    /// Excess value returned to the refund address.
    pub refunded: u128,
}

/// One in-flight message as seen by the destination side.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Endpoint id of the chain the message was sent from.
    pub src_eid: u32,
    /// Padded address of the sending contract, as attested by the transport.
    pub sender: Bytes32,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

/// The transport contract the migrator depends on.
pub trait Endpoint: Send + Sync {
    /// Local endpoint id.
    fn eid(&self) -> u32;

    /// Current price to deliver `payload` to `dst_eid`. Pure read.
    fn quote_fee(&self, dst_eid: u32, payload: &[u8]) -> Result<Fee, MigrationError>;

    /// Sends `payload` to `dst_eid`, charging the current fee out of `value`.
    /// Excess value is refunded to `refund`, not retained.
    fn send(
        &self,
        sender: Address,
        dst_eid: u32,
        payload: Vec<u8>,
        value: u128,
        refund: Address,
    ) -> Result<MessageReceipt, MigrationError>;
}

/// In-process endpoint delivering over tokio channels.
pub struct ChannelEndpoint {
    eid: u32,
    fees: RwLock<FeeSchedule>,
    /// dst eid -> inbound sender of the remote endpoint
    routes: RwLock<HashMap<u32, mpsc::UnboundedSender<Packet>>>,
    /// Our own inbound channel; the receiver half is handed to the local
    /// delivery task exactly once.
    inbound_tx: mpsc::UnboundedSender<Packet>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<Packet>>>,
    outbound_nonce: AtomicU64,
}

impl ChannelEndpoint {
    pub fn new(eid: u32, fees: FeeSchedule) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            eid,
            fees: RwLock::new(fees),
            routes: RwLock::new(HashMap::new()),
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
            outbound_nonce: AtomicU64::new(0),
        }
    }

    /// Registers a route so messages for `dst_eid` land on `tx`.
    pub fn register_route(&self, dst_eid: u32, tx: mpsc::UnboundedSender<Packet>) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dst_eid, tx);
    }

    /// Wires two endpoints to each other, both directions.
    pub fn link(a: &ChannelEndpoint, b: &ChannelEndpoint) {
        a.register_route(b.eid, b.inbound_tx.clone());
        b.register_route(a.eid, a.inbound_tx.clone());
    }

    /// Takes the inbound receiver. Returns `None` after the first call: only
    /// one local receiver may drain deliveries.
    pub fn take_inbound(&self) -> Option<mpsc::UnboundedReceiver<Packet>> {
        self.inbound_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Replaces the fee schedule. Lets tests model transport prices moving
    /// between a quote and the subsequent send.
    pub fn set_fee_schedule(&self, fees: FeeSchedule) {
        *self.fees.write().unwrap_or_else(PoisonError::into_inner) = fees;
    }

    fn current_fees(&self) -> FeeSchedule {
        *self.fees.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Endpoint for ChannelEndpoint {
    fn eid(&self) -> u32 {
        self.eid
    }

    fn quote_fee(&self, dst_eid: u32, payload: &[u8]) -> Result<Fee, MigrationError> {
        let fee = self.current_fees().quote(payload.len());
        debug!(
            src_eid = self.eid,
            dst_eid,
            payload_len = payload.len(),
            native_fee = fee.native_fee,
            "quoted fee"
        );
        Ok(fee)
    }

    fn send(
        &self,
        sender: Address,
        dst_eid: u32,
        payload: Vec<u8>,
        value: u128,
        refund: Address,
    ) -> Result<MessageReceipt, MigrationError> {
        let fee = self.current_fees().quote(payload.len());
        if value < fee.native_fee {
            return Err(MigrationError::InsufficientFee {
                required: fee.native_fee,
                supplied: value,
            });
        }

        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let route = routes
            .get(&dst_eid)
            .ok_or(MigrationError::NoRoute { eid: dst_eid })?;

        let nonce = self.outbound_nonce.fetch_add(1, Ordering::SeqCst);
        route
            .send(Packet {
                src_eid: self.eid,
                sender: sender.to_bytes32(),
                payload,
            })
            .map_err(|_| MigrationError::Transport {
                reason: format!("destination endpoint {} is gone", dst_eid),
            })?;

        let refunded = value - fee.native_fee;
        info!(
            src_eid = self.eid,
            dst_eid,
            nonce,
            sender = %sender,
            refund = %refund,
            refunded,
            "message sent"
        );

        Ok(MessageReceipt {
            nonce,
            fee_paid: fee,
            refunded,
        })
    }
}
