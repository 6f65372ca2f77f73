//! # Recovery Authorization
//!
//! The off-ledger statement a holder signs to authorize a recovery sweep.
//!
//! ```text
//! struct_hash = keccak256(domain_tag ‖ pad32(account) ‖ pad32(backup) ‖ be32(amount) ‖ be32(deadline))
//! digest      = keccak256("\x19Ethereum Signed Message:\n32" ‖ struct_hash)
//! ```
//!
//! The holder signs `digest`. Authorizations are verified, never stored.

use super::value_objects::{u256_to_word, Address, Hash, U256};
use sha3::{Digest, Keccak256};

/// Struct schema the default domain tag is derived from.
pub const BACKUP_SCHEMA: &str =
    "Backup(address account,address backupAddress,uint256 amount,uint256 deadline)";

/// Personal-message prefix for a 32-byte payload.
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak-256 of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    Hash(Keccak256::digest(data).into())
}

/// Wraps a 32-byte hash in the personal-message envelope.
#[must_use]
pub fn eth_signed_message_hash(hash: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(ETH_SIGNED_MESSAGE_PREFIX);
    hasher.update(hash.as_bytes());
    Hash(hasher.finalize().into())
}

// =============================================================================
// DOMAIN TAG
// =============================================================================

/// The 32-byte constant scoping authorization hashes to this operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorizationDomain {
    tag: Hash,
}

impl AuthorizationDomain {
    /// Derives the tag as `keccak256(schema)`.
    #[must_use]
    pub fn from_schema(schema: &str) -> Self {
        Self {
            tag: keccak256(schema.as_bytes()),
        }
    }

    /// Pins an explicit tag, e.g. to accept authorizations produced by
    /// existing tooling.
    #[must_use]
    pub const fn from_tag(tag: Hash) -> Self {
        Self { tag }
    }

    /// The tag.
    #[must_use]
    pub const fn tag(&self) -> Hash {
        self.tag
    }
}

impl Default for AuthorizationDomain {
    fn default() -> Self {
        Self::from_schema(BACKUP_SCHEMA)
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

/// `(signer, backup, amount, deadline)` under a domain tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorizationMessage {
    /// The account being recovered; must be the signer.
    pub account: Address,
    /// Receiver of the sweep.
    pub backup_address: Address,
    /// Balance of `account` the signature covers.
    pub amount: U256,
    /// Last second (inclusive) at which the authorization is honored.
    pub deadline: u64,
}

impl AuthorizationMessage {
    /// ABI-encodes `(bytes32, address, address, uint256, uint256)`.
    #[must_use]
    pub fn encode(&self, domain: &AuthorizationDomain) -> [u8; 160] {
        let mut out = [0u8; 160];
        out[..32].copy_from_slice(domain.tag().as_bytes());
        out[32..64].copy_from_slice(&self.account.to_word());
        out[64..96].copy_from_slice(&self.backup_address.to_word());
        out[96..128].copy_from_slice(&u256_to_word(self.amount));
        out[128..].copy_from_slice(&u256_to_word(U256::from(self.deadline)));
        out
    }

    /// `keccak256` of the encoding.
    #[must_use]
    pub fn struct_hash(&self, domain: &AuthorizationDomain) -> Hash {
        keccak256(&self.encode(domain))
    }

    /// The digest the holder signs.
    #[must_use]
    pub fn signing_hash(&self, domain: &AuthorizationDomain) -> Hash {
        eth_signed_message_hash(&self.struct_hash(domain))
    }
}
