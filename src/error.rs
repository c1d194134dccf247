//! Error definitions for the migration protocol.

use thiserror::Error;

use crate::types::{Address, Bytes32, TokenId};

/// Errors raised by the migrator, the asset registry, and the endpoint.
///
/// Every variant is a synchronous, call-aborting failure: on any of these the
/// whole operation (including a burn performed earlier in the same call) is
/// rolled back before the error is returned, so partial migration state never
/// persists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("caller {caller} is neither owner nor approved for token {token_id}")]
    NotAuthorized { caller: Address, token_id: TokenId },

    #[error("token {token_id} does not exist")]
    UnknownToken { token_id: TokenId },

    #[error("token {token_id} already exists")]
    TokenExists { token_id: TokenId },

    #[error("no peer configured for endpoint id {eid}")]
    NoPeerConfigured { eid: u32 },

    #[error("insufficient fee: required {required}, supplied {supplied}")]
    InsufficientFee { required: u128, supplied: u128 },

    #[error("unauthorized sender {sender} for source endpoint id {src_eid}")]
    UnauthorizedSender { src_eid: u32, sender: Bytes32 },

    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("no route to endpoint id {eid}")]
    NoRoute { eid: u32 },

    #[error("presented capability does not belong to this migrator")]
    InvalidCapability,

    #[error("transport failure: {reason}")]
    Transport { reason: String },
}
