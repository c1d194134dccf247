//! Peer registry: which remote contract may inject mint payloads.
//!
//! One entry per remote endpoint id, holding the 32-byte padded address of
//! the counterpart migrator on that chain. The entry is the single source of
//! truth for inbound authentication and for addressing outbound messages;
//! absence of an entry disables migration to/from that chain.

use std::collections::HashMap;

use crate::types::Bytes32;

#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashMap<u32, Bytes32>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites the entry for a remote endpoint id.
    pub fn set(&mut self, eid: u32, peer: Bytes32) {
        self.peers.insert(eid, peer);
    }

    pub fn get(&self, eid: u32) -> Option<Bytes32> {
        self.peers.get(&eid).copied()
    }

    /// True only if an entry exists for `eid` and it equals `sender` exactly.
    pub fn is_peer(&self, eid: u32, sender: Bytes32) -> bool {
        self.peers.get(&eid) == Some(&sender)
    }
}
