//! # secp256k1 Adapter
//!
//! [`K256Recovery`] implements the [`SignatureRecovery`] port with the `k256`
//! crate. [`AuthorizationSigner`] produces signatures the recovery accepts.
//!
//! ## Security Notes
//!
//! - R and S must be in `[1, n-1]`
//! - S must be strictly below `n/2` (EIP-2); high-S signatures are rejected,
//!   never normalized on the verifying side
//! - Scalar comparisons are constant-time via `subtle`

use crate::domain::authorization::{keccak256, AuthorizationDomain, AuthorizationMessage};
use crate::domain::value_objects::{Address, EcdsaSignature, Hash, U256};
use crate::errors::SignatureError;
use crate::ports::outbound::SignatureRecovery;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// secp256k1 curve order n.
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// n/2, the EIP-2 upper bound (exclusive) for S.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// RECOVERY
// =============================================================================

/// Recovers Ethereum-style signer addresses from secp256k1 signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct K256Recovery;

impl K256Recovery {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SignatureRecovery for K256Recovery {
    fn recover(&self, hash: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
        if !is_valid_scalar(&signature.r) || !is_valid_scalar(&signature.s) {
            return Err(SignatureError::InvalidFormat);
        }
        if !is_low_s(&signature.s) {
            return Err(SignatureError::MalleableSignature);
        }
        recover_address(hash, signature)
    }
}

/// Recovers the signer without the range and malleability pre-checks.
fn recover_address(hash: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::InvalidFormat)?;

    let key = VerifyingKey::recover_from_prehash(hash.as_bytes(), &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(address_from_pubkey(&key))
}

/// Ethereum address of a public key: last 20 bytes of
/// `keccak256(uncompressed_point[1..])`.
#[must_use]
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.as_bytes()[12..]);
    Address::new(address)
}

/// Valid v values: 0, 1, 27, 28.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

/// Constant-time `a < b` over big-endian bytes.
fn ct_less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (x, y) in a.iter().zip(b.iter()) {
        let not_decided = !(less | greater);
        less |= not_decided & Choice::from(u8::from(x < y));
        greater |= not_decided & Choice::from(u8::from(x > y));
    }
    less
}

/// S strictly below n/2.
fn is_low_s(s: &[u8; 32]) -> bool {
    ct_less_than(s, &SECP256K1_HALF_ORDER).into()
}

/// Scalar in `[1, n-1]`.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }
    (!is_zero & ct_less_than(scalar, &SECP256K1_ORDER)).into()
}

/// `n - s`, flipping a signature between its low and high forms.
#[must_use]
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow = 0i16;

    for i in (0..32).rev() {
        let diff = i16::from(SECP256K1_ORDER[i]) - i16::from(s[i]) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}

// =============================================================================
// SIGNER
// =============================================================================

/// Holds a secp256k1 key and signs recovery authorizations.
///
/// Used by holders (and tests) to produce what `backup_token` verifies.
pub struct AuthorizationSigner {
    signing_key: SigningKey,
}

impl AuthorizationSigner {
    /// Creates a signer from 32 secret-key bytes. The input copy is zeroized.
    ///
    /// # Errors
    ///
    /// [`SignatureError::InvalidPrivateKey`] if the bytes are zero or not
    /// below the curve order.
    pub fn from_bytes(mut bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let key = SigningKey::from_bytes((&bytes).into());
        bytes.zeroize();
        key.map(Self::from_signing_key)
            .map_err(|_| SignatureError::InvalidPrivateKey)
    }

    /// Wraps an existing key.
    #[must_use]
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// The signer's address.
    #[must_use]
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Signs a 32-byte digest, returning a low-S signature with `v` in
    /// `{27, 28}`.
    ///
    /// # Errors
    ///
    /// [`SignatureError::InvalidFormat`] if the backend rejects the digest.
    pub fn sign_hash(&self, hash: &Hash) -> Result<EcdsaSignature, SignatureError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_bytes())
            .map_err(|_| SignatureError::InvalidFormat)?;

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        let mut parity = recid.to_byte() & 1;
        if !is_low_s(&s) {
            s = invert_s(&s);
            parity ^= 1;
        }
        Ok(EcdsaSignature::new(27 + parity, r, s))
    }

    /// Signs an authorization for sweeping this signer's `amount` to
    /// `backup_address`, valid through `deadline`.
    ///
    /// # Errors
    ///
    /// As [`Self::sign_hash`].
    pub fn sign_authorization(
        &self,
        domain: &AuthorizationDomain,
        backup_address: Address,
        amount: U256,
        deadline: u64,
    ) -> Result<EcdsaSignature, SignatureError> {
        let message = AuthorizationMessage {
            account: self.address(),
            backup_address,
            amount,
            deadline,
        };
        self.sign_hash(&message.signing_hash(domain))
    }
}

impl std::fmt::Debug for AuthorizationSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
