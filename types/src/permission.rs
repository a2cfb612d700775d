//! ACL permission tuples.
//!
//! A permission is the `(entity, app, role)` triple the DAO's access-control
//! list keys on. Roles are keccak-256 hashes of their Solidity constant
//! names. These types are used for encoding grant/revoke actions and for
//! post-execution assertions; no permission logic lives in this repository.

use alloy_primitives::{keccak256, Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A role identifier — the keccak-256 hash of the role constant's name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role(B256);

impl Role {
    /// Hash a role name, e.g. `Role::from_name("DEPOSIT_ROLE")`.
    pub fn from_name(name: &str) -> Self {
        Self(keccak256(name.as_bytes()))
    }

    /// Wrap an already-hashed role identifier.
    pub fn from_hash(hash: B256) -> Self {
        Self(hash)
    }

    pub fn hash(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An access-control grant: `entity` may exercise `role` on `app`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Who holds (or is denied) the permission.
    pub entity: Address,
    /// The app the permission applies to.
    pub app: Address,
    /// The role being granted or revoked.
    pub role: Role,
}

impl Permission {
    pub fn new(entity: Address, app: Address, role: Role) -> Self {
        Self { entity, app, role }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} for {}", self.role, self.app, self.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_role_hash_matches_onchain_constant() {
        // DEPOSIT_ROLE as published by the staking app.
        assert_eq!(
            Role::from_name("DEPOSIT_ROLE").hash(),
            b256!("2561bf26f818282a3be40719542054d2173eb0d38539e8a8d3cff22f29fd2384")
        );
    }

    #[test]
    fn test_permissions_compare_by_tuple() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let role = Role::from_name("DEPOSIT_ROLE");
        assert_eq!(Permission::new(a, b, role), Permission::new(a, b, role));
        assert_ne!(Permission::new(a, b, role), Permission::new(b, a, role));
    }
}
