//! Standard account addresses.
//!
//! An address is a workchain id and the 256-bit hash of the account's
//! state-init. It has two text forms:
//!
//! - Raw: `workchain:hex` (e.g. `0:08e977de...`)
//! - Friendly: 48 characters of base64 over
//!   `tag(1) workchain(1) hash(32) crc16(2)`, where the tag carries the
//!   bounceable and testnet flags

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CellError, CellResult, crc16};

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

const FRIENDLY_BYTES: usize = 36;
const FRIENDLY_CHARS: usize = 48;

/// Standard internal address.
///
/// # Example
///
/// ```
/// use sbt_cell::Address;
///
/// let address: Address = "UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN".parse().unwrap();
/// assert_eq!(address.workchain, 0);
/// assert_eq!(
///     address.to_raw(),
///     "0:08e977de4262ed67cab37a8356251606f307ee590641647645e7e7941fb90389"
/// );
/// assert_eq!(
///     address.to_friendly(false, false),
///     "UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    /// Workchain ID (-1 for masterchain, 0 for basechain).
    pub workchain: i8,
    /// 256-bit account id.
    pub hash: [u8; 32],
}

/// A friendly address together with the flags its tag carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendlyAddress {
    pub address: Address,
    pub bounceable: bool,
    pub testnet: bool,
}

impl Address {
    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Address { workchain, hash }
    }

    /// Parse either text form.
    pub fn parse(s: &str) -> CellResult<Self> {
        let s = s.trim();
        if s.contains(':') {
            Self::parse_raw(s)
        } else {
            Self::parse_friendly(s).map(|friendly| friendly.address)
        }
    }

    /// Parse the raw `workchain:hex` form.
    pub fn parse_raw(s: &str) -> CellResult<Self> {
        let (workchain, hash_hex) = s
            .split_once(':')
            .ok_or_else(|| CellError::InvalidAddress(format!("missing ':' in {s}")))?;

        let workchain: i8 = workchain
            .parse()
            .map_err(|_| CellError::InvalidAddress(format!("invalid workchain: {workchain}")))?;

        if hash_hex.len() != 64 {
            return Err(CellError::InvalidAddress(format!(
                "address hex must be 64 characters, got {}",
                hash_hex.len()
            )));
        }
        let mut hash = [0u8; 32];
        hex::decode_to_slice(hash_hex, &mut hash)
            .map_err(|e| CellError::InvalidAddress(format!("invalid hex: {e}")))?;

        Ok(Address { workchain, hash })
    }

    /// Parse the friendly form, keeping its flags.
    ///
    /// Both the url-safe and the standard base64 alphabets are accepted.
    pub fn parse_friendly(s: &str) -> CellResult<FriendlyAddress> {
        if s.len() != FRIENDLY_CHARS {
            return Err(CellError::InvalidAddress(format!(
                "friendly address must be {FRIENDLY_CHARS} characters, got {}",
                s.len()
            )));
        }
        let normalized: String = s
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                c => c,
            })
            .collect();
        let bytes = URL_SAFE_NO_PAD
            .decode(normalized)
            .map_err(|e| CellError::InvalidAddress(format!("invalid base64: {e}")))?;
        if bytes.len() != FRIENDLY_BYTES {
            return Err(CellError::InvalidAddress(format!(
                "friendly address must be {FRIENDLY_BYTES} bytes, got {}",
                bytes.len()
            )));
        }

        let expected = u16::from_be_bytes([bytes[34], bytes[35]]);
        let actual = crc16(&bytes[..34]);
        if expected != actual {
            return Err(CellError::InvalidAddress(format!(
                "crc16 mismatch: expected {expected:04x}, got {actual:04x}"
            )));
        }

        let tag = bytes[0];
        let testnet = tag & TAG_TESTNET != 0;
        let bounceable = match tag & !TAG_TESTNET {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            other => {
                return Err(CellError::InvalidAddress(format!(
                    "unknown address tag 0x{other:02x}"
                )));
            }
        };

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);
        Ok(FriendlyAddress {
            address: Address::new(bytes[1] as i8, hash),
            bounceable,
            testnet,
        })
    }

    /// Raw `workchain:hex` form.
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Friendly url-safe base64 form.
    pub fn to_friendly(&self, bounceable: bool, testnet: bool) -> String {
        let mut data = Vec::with_capacity(FRIENDLY_BYTES);
        let mut tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if testnet {
            tag |= TAG_TESTNET;
        }
        data.push(tag);
        data.push(self.workchain as u8);
        data.extend_from_slice(&self.hash);
        let crc = crc16(&data);
        data.extend_from_slice(&crc.to_be_bytes());
        URL_SAFE_NO_PAD.encode(data)
    }
}

impl FromStr for Address {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_raw())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::parse(&text).map_err(serde::de::Error::custom)
    }
}
