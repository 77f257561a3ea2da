//! Standard chain addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::CellHash;
use crate::error::CoreError;

/// A standard address: workchain id plus the 256-bit account hash.
///
/// Text form is the raw `<workchain>:<64 hex chars>`, e.g. `0:83df...`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub workchain: i8,
    pub hash: [u8; 32],
}

impl Address {
    /// Encoded width of `addr_std` without anycast: 2 tag bits, 1 anycast
    /// bit, 8 workchain bits, 256 hash bits.
    pub const BIT_LEN: usize = 2 + 1 + 8 + 256;

    /// The basechain.
    pub const BASECHAIN: i8 = 0;

    /// The masterchain.
    pub const MASTERCHAIN: i8 = -1;

    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Address of the account whose state-init hashes to `hash`.
    pub fn from_state_init_hash(workchain: i8, hash: &CellHash) -> Self {
        Self::new(workchain, *hash.as_bytes())
    }

    /// Raw text form.
    pub fn to_raw_string(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Parse the raw text form.
    pub fn from_raw_str(s: &str) -> Result<Self, CoreError> {
        let (wc, hash_hex) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidAddress(format!("missing ':' in {s:?}")))?;
        let workchain: i8 = wc
            .parse()
            .map_err(|_| CoreError::InvalidAddress(format!("bad workchain {wc:?}")))?;
        let bytes = hex::decode(hash_hex)?;
        let hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidAddress("hash must be 32 bytes".into()))?;
        Ok(Self::new(workchain, hash))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}:{}..)", self.workchain, &hex::encode(self.hash)[..16])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw_string())
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_string_roundtrip() {
        let addr = Address::new(-1, [0xab; 32]);
        let text = addr.to_string();
        assert!(text.starts_with("-1:abab"));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_raw_string_errors() {
        assert!(Address::from_raw_str("no-colon").is_err());
        assert!(Address::from_raw_str("999:00").is_err());
        assert!(Address::from_raw_str("0:abcd").is_err());
        assert!(Address::from_raw_str("0:zz").is_err());
    }

    #[test]
    fn test_debug_is_truncated() {
        let addr = Address::new(0, [0xcd; 32]);
        assert_eq!(format!("{:?}", addr), "Address(0:cdcdcdcdcdcdcdcd..)");
    }

    #[test]
    fn test_serde_json() {
        let addr = Address::new(0, [0x11; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
