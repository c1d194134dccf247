//! Wire encoding of the migration payload.
//!
//! The payload is the only state that crosses the trust boundary between
//! chains: two 32-byte words, a big-endian token id followed by the
//! left-padded recipient address. 64 bytes, fixed layout. Any transport-level
//! envelope (nonce, gas options) is the endpoint's concern, not encoded here.

use crate::error::MigrationError;
use crate::types::{Address, TokenId};

/// Fixed payload size: one token-id word plus one recipient word.
pub const PAYLOAD_LEN: usize = 64;

/// The minimal data carried across chains for one migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationPayload {
    pub token_id: TokenId,
    pub recipient: Address,
}

impl MigrationPayload {
    pub fn new(token_id: TokenId, recipient: Address) -> Self {
        Self {
            token_id,
            recipient,
        }
    }

    /// Encodes the payload into its fixed 64-byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; PAYLOAD_LEN];
        out[24..32].copy_from_slice(&self.token_id.to_be_bytes());
        out[44..64].copy_from_slice(self.recipient.as_bytes());
        out
    }

    /// Decodes a payload, rejecting anything that is not exactly the fixed
    /// layout: wrong length, a token id wider than 64 bits, or non-zero
    /// padding in the recipient word.
    pub fn decode(bytes: &[u8]) -> Result<Self, MigrationError> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(MigrationError::MalformedPayload {
                reason: format!("expected {} bytes, got {}", PAYLOAD_LEN, bytes.len()),
            });
        }

        if bytes[..24].iter().any(|b| *b != 0) {
            return Err(MigrationError::MalformedPayload {
                reason: "token id exceeds 64 bits".to_string(),
            });
        }
        let mut id_bytes = [0u8; 8];
        id_bytes.copy_from_slice(&bytes[24..32]);
        let token_id = u64::from_be_bytes(id_bytes);

        if bytes[32..44].iter().any(|b| *b != 0) {
            return Err(MigrationError::MalformedPayload {
                reason: "recipient word has non-zero padding".to_string(),
            });
        }
        let mut addr_bytes = [0u8; 20];
        addr_bytes.copy_from_slice(&bytes[44..64]);

        Ok(Self {
            token_id,
            recipient: Address(addr_bytes),
        })
    }
}
