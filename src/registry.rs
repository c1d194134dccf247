//! In-memory NFT ownership ledger with ERC-721 authorization semantics.
//!
//! The registry is the asset ledger the migrator burns from or mints into.
//! Only the fields relevant to migration are modeled: ownership, per-token
//! approvals, and operator approvals. Mint fails if the token id already
//! exists; that uniqueness guard doubles as the protocol's replay protection
//! on the destination side.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::MigrationError;
use crate::types::{Address, TokenId};

/// One chain's NFT collection.
#[derive(Debug, Default)]
pub struct NftRegistry {
    /// Collection name, informational only.
    pub name: String,
    /// token id -> current owner
    owners: HashMap<TokenId, Address>,
    /// token id -> approved spender (cleared on burn)
    token_approvals: HashMap<TokenId, Address>,
    /// (owner, operator) pairs with blanket approval
    operator_approvals: HashSet<(Address, Address)>,
}

impl NftRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the owner of a token, or `UnknownToken` if it does not exist.
    /// A burned token never again resolves to an owner.
    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, MigrationError> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(MigrationError::UnknownToken { token_id })
    }

    pub fn exists(&self, token_id: TokenId) -> bool {
        self.owners.contains_key(&token_id)
    }

    /// Mints a token to `to`. Fails with `TokenExists` if the id is taken.
    pub fn mint(&mut self, token_id: TokenId, to: Address) -> Result<(), MigrationError> {
        if self.owners.contains_key(&token_id) {
            return Err(MigrationError::TokenExists { token_id });
        }
        self.owners.insert(token_id, to);
        debug!(collection = %self.name, token_id, owner = %to, "minted");
        Ok(())
    }

    /// Burns a token, clearing its per-token approval. Returns the previous
    /// owner so callers can audit (or restore) it.
    pub fn burn(&mut self, token_id: TokenId) -> Result<Address, MigrationError> {
        let owner = self
            .owners
            .remove(&token_id)
            .ok_or(MigrationError::UnknownToken { token_id })?;
        self.token_approvals.remove(&token_id);
        debug!(collection = %self.name, token_id, owner = %owner, "burned");
        Ok(owner)
    }

    /// Approves `spender` for a single token. The caller must be the owner or
    /// an operator for the owner.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        token_id: TokenId,
    ) -> Result<(), MigrationError> {
        let owner = self.owner_of(token_id)?;
        if caller != owner && !self.is_operator(owner, caller) {
            return Err(MigrationError::NotAuthorized { caller, token_id });
        }
        self.token_approvals.insert(token_id, spender);
        Ok(())
    }

    /// Returns the approved spender for a token, if any.
    pub fn get_approved(&self, token_id: TokenId) -> Option<Address> {
        self.token_approvals.get(&token_id).copied()
    }

    /// Grants or revokes `operator` blanket approval over all of the caller's
    /// tokens.
    pub fn set_approval_for_all(&mut self, caller: Address, operator: Address, approved: bool) {
        if approved {
            self.operator_approvals.insert((caller, operator));
        } else {
            self.operator_approvals.remove(&(caller, operator));
        }
    }

    pub fn is_operator(&self, owner: Address, operator: Address) -> bool {
        self.operator_approvals.contains(&(owner, operator))
    }

    /// Standard transfer-authorization check: owner, per-token approved
    /// spender, or operator for the owner.
    pub fn is_authorized(&self, caller: Address, token_id: TokenId) -> Result<bool, MigrationError> {
        let owner = self.owner_of(token_id)?;
        Ok(caller == owner
            || self.get_approved(token_id) == Some(caller)
            || self.is_operator(owner, caller))
    }

    /// Restores a burned token to a prior owner (and, optionally, its prior
    /// per-token approval). Used only to roll back a burn when the send half
    /// of a migration fails in the same call.
    pub(crate) fn restore(
        &mut self,
        token_id: TokenId,
        owner: Address,
        approval: Option<Address>,
    ) -> Result<(), MigrationError> {
        self.mint(token_id, owner)?;
        if let Some(spender) = approval {
            self.token_approvals.insert(token_id, spender);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        let mut raw = [0u8; 20];
        raw[19] = last;
        Address(raw)
    }

    #[test]
    fn test_mint_then_owner_of() {
        let mut reg = NftRegistry::new("Test");
        reg.mint(1, addr(1)).unwrap();
        assert_eq!(reg.owner_of(1).unwrap(), addr(1));
    }

    #[test]
    fn test_mint_duplicate_fails() {
        let mut reg = NftRegistry::new("Test");
        reg.mint(1, addr(1)).unwrap();
        let err = reg.mint(1, addr(2)).unwrap_err();
        assert_eq!(err, MigrationError::TokenExists { token_id: 1 });
        // Ownership unchanged by the failed mint.
        assert_eq!(reg.owner_of(1).unwrap(), addr(1));
    }

    #[test]
    fn test_burn_makes_owner_lookup_fail() {
        let mut reg = NftRegistry::new("Test");
        reg.mint(1, addr(1)).unwrap();
        assert_eq!(reg.burn(1).unwrap(), addr(1));
        assert_eq!(
            reg.owner_of(1).unwrap_err(),
            MigrationError::UnknownToken { token_id: 1 }
        );
        assert!(reg.burn(1).is_err());
    }

    #[test]
    fn test_burn_clears_approval() {
        let mut reg = NftRegistry::new("Test");
        reg.mint(1, addr(1)).unwrap();
        reg.approve(addr(1), addr(2), 1).unwrap();
        assert_eq!(reg.get_approved(1), Some(addr(2)));
        reg.burn(1).unwrap();
        assert_eq!(reg.get_approved(1), None);
    }

    #[test]
    fn test_approve_requires_owner_or_operator() {
        let mut reg = NftRegistry::new("Test");
        reg.mint(1, addr(1)).unwrap();

        let err = reg.approve(addr(2), addr(3), 1).unwrap_err();
        assert!(matches!(err, MigrationError::NotAuthorized { .. }));

        // An operator may approve on the owner's behalf.
        reg.set_approval_for_all(addr(1), addr(2), true);
        reg.approve(addr(2), addr(3), 1).unwrap();
        assert_eq!(reg.get_approved(1), Some(addr(3)));
    }

    #[test]
    fn test_is_authorized_paths() {
        let mut reg = NftRegistry::new("Test");
        reg.mint(1, addr(1)).unwrap();

        assert!(reg.is_authorized(addr(1), 1).unwrap());
        assert!(!reg.is_authorized(addr(2), 1).unwrap());

        reg.approve(addr(1), addr(2), 1).unwrap();
        assert!(reg.is_authorized(addr(2), 1).unwrap());

        reg.set_approval_for_all(addr(1), addr(3), true);
        assert!(reg.is_authorized(addr(3), 1).unwrap());
        reg.set_approval_for_all(addr(1), addr(3), false);
        assert!(!reg.is_authorized(addr(3), 1).unwrap());
    }

    #[test]
    fn test_is_authorized_unknown_token() {
        let reg = NftRegistry::new("Test");
        assert_eq!(
            reg.is_authorized(addr(1), 9).unwrap_err(),
            MigrationError::UnknownToken { token_id: 9 }
        );
    }
}
