//! # Value Objects
//!
//! Immutable domain primitives for the token ledger.
//! These types represent concepts that are defined by their value, not identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export U256 from primitive-types for 256-bit arithmetic
pub use primitive_types::U256;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte Ethereum-style account address.
///
/// Every address implicitly exists: an address that was never touched has a
/// zero balance, no allowances, no backup address and is not blacklisted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// ABI word encoding: left-padded with 12 zero bytes.
    #[must_use]
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed_hex::<20>(s).map(Self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

// =============================================================================
// HASH (32 bytes)
// =============================================================================

/// A 32-byte Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the zero hash.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Hash {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed_hex::<32>(s).map(Self)
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// ECDSA SIGNATURE
// =============================================================================

/// ECDSA signature on secp256k1 in split `(v, r, s)` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// Recovery ID (0, 1, 27, or 28).
    pub v: u8,
    /// R component (32 bytes).
    pub r: [u8; 32],
    /// S component (32 bytes).
    pub s: [u8; 32],
}

impl EcdsaSignature {
    /// Creates a signature from its components.
    #[must_use]
    pub const fn new(v: u8, r: [u8; 32], s: [u8; 32]) -> Self {
        Self { v, r, s }
    }

    /// Splits a 65-byte `r || s || v` signature.
    #[must_use]
    pub fn from_rsv(bytes: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self { v: bytes[64], r, s }
    }

    /// Joins into the 65-byte `r || s || v` form.
    #[must_use]
    pub fn to_rsv(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }
}

// =============================================================================
// HEX PARSING
// =============================================================================

/// Failure to parse a fixed-width `0x`-prefixed hex value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseHexError {
    /// Input is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded value has the wrong width.
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength {
        /// Required byte width.
        expected: usize,
        /// Decoded byte width.
        actual: usize,
    },
}

fn parse_fixed_hex<const N: usize>(s: &str) -> Result<[u8; N], ParseHexError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| ParseHexError::InvalidHex(e.to_string()))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| ParseHexError::WrongLength {
        expected: N,
        actual: bytes.len(),
    })
}

// =============================================================================
// UNITS
// =============================================================================

/// Failure to convert between human-readable and base units.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitsError {
    /// Not a decimal number.
    #[error("invalid decimal amount: {0:?}")]
    InvalidNumber(String),

    /// More fractional digits than the token has decimals.
    #[error("too many fractional digits: {digits} > {decimals}")]
    TooPrecise {
        /// Fractional digits given.
        digits: usize,
        /// Token decimals.
        decimals: u8,
    },

    /// Value does not fit in 256 bits.
    #[error("amount overflows 256 bits")]
    Overflow,
}

/// Converts a decimal string (e.g. `"10000"` or `"1.5"`) into base units.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(UnitsError::InvalidNumber(text.to_string()));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(UnitsError::TooPrecise {
            digits: fraction.len(),
            decimals,
        });
    }

    let padding = "0".repeat(usize::from(decimals) - fraction.len());
    let digits = format!("{whole}{fraction}{padding}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| UnitsError::Overflow)
}

/// Renders base units as a decimal string with `decimals` fractional digits
/// (trailing zeros trimmed).
#[must_use]
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return raw;
    }
    let padded = format!("{raw:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Big-endian 32-byte encoding of a 256-bit integer.
#[must_use]
pub fn u256_to_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

// =============================================================================
// TESTS
// =============================================================================
