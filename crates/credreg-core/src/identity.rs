//! # Principal and Credential Identifiers
//!
//! [`Identity`] is the principal reference used for administrators,
//! issuers and holders. It is a fixed-width 20-byte value, so equality and
//! hashing are structural and no string normalization is ever needed after
//! construction.
//!
//! [`CredentialId`] is the ledger-assigned record number. Zero is reserved
//! as the "does not exist" sentinel and cannot be constructed.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Width of an [`Identity`] in bytes.
pub const IDENTITY_LEN: usize = 20;

// ─── Identity ────────────────────────────────────────────────────────

/// A principal reference: 20 bytes, rendered as `0x` + 40 lowercase hex digits.
///
/// Parsing accepts either hex case; display always produces lowercase so
/// that the text form is canonical.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    /// Build an identity from raw bytes.
    pub const fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate a random identity.
    pub fn random() -> Self {
        let mut bytes = [0u8; IDENTITY_LEN];
        rand::thread_rng().fill(&mut bytes[..]);
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// Parse the `0x`-prefixed hex form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentity`] when the prefix is missing,
    /// the length is not exactly 40 hex digits, or a non-hex character appears.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidIdentity(s.to_string());

        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if digits.len() != IDENTITY_LEN * 2 {
            return Err(invalid());
        }

        let mut bytes = [0u8; IDENTITY_LEN];
        for (slot, pair) in bytes.iter_mut().zip(digits.as_bytes().chunks(2)) {
            let hi = hex_nibble(pair[0]).ok_or_else(invalid)?;
            let lo = hex_nibble(pair[1]).ok_or_else(invalid)?;
            *slot = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

impl FromStr for Identity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Credential Id ───────────────────────────────────────────────────

/// Ledger-assigned credential number. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CredentialId(u64);

impl CredentialId {
    /// The first id a ledger assigns.
    pub const FIRST: Self = Self(1);

    /// Create a credential id, rejecting the reserved value zero.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::ReservedCredentialId);
        }
        Ok(Self(value))
    }

    /// The numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` past `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for CredentialId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CredentialId> for u64 {
    fn from(id: CredentialId) -> Self {
        id.0
    }
}

impl FromStr for CredentialId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|_| ValidationError::InvalidCredentialId(s.to_string()))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0x00112233445566778899aabbccddeeff00112233";

    #[test]
    fn parse_and_display_round_trip() {
        let id = Identity::parse(SAMPLE).unwrap();
        assert_eq!(id.to_string(), SAMPLE);
        assert_eq!(id.as_bytes()[0], 0x00);
        assert_eq!(id.as_bytes()[19], 0x33);
    }

    #[test]
    fn parse_normalizes_case() {
        let upper = Identity::parse("0X00112233445566778899AABBCCDDEEFF00112233").unwrap();
        let lower = Identity::parse(SAMPLE).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), SAMPLE);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = Identity::parse("00112233445566778899aabbccddeeff00112233").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidIdentity(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Identity::parse("0x0011").is_err());
        assert!(Identity::parse(&format!("{SAMPLE}44")).is_err());
        assert!(Identity::parse("0x").is_err());
        assert!(Identity::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(Identity::parse("0x00112233445566778899aabbccddeeff0011223g").is_err());
        // Multi-byte characters must not be split into bogus nibbles.
        assert!(Identity::parse("0xé0112233445566778899aabbccddeeff001122").is_err());
    }

    #[test]
    fn random_identities_differ() {
        assert_ne!(Identity::random(), Identity::random());
    }

    #[test]
    fn debug_shows_hex() {
        let id = Identity::from_bytes([0xab; IDENTITY_LEN]);
        assert_eq!(
            format!("{id:?}"),
            "Identity(0xabababababababababababababababababababab)"
        );
    }

    #[test]
    fn identity_serializes_as_string() {
        let id = Identity::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn identity_deserialize_rejects_garbage() {
        let result: Result<Identity, _> = serde_json::from_str("\"alice\"");
        assert!(result.is_err());
    }

    #[test]
    fn credential_id_rejects_zero() {
        assert_eq!(
            CredentialId::new(0).unwrap_err(),
            ValidationError::ReservedCredentialId
        );
        assert_eq!(CredentialId::new(1).unwrap(), CredentialId::FIRST);
    }

    #[test]
    fn credential_id_next_increments() {
        let id = CredentialId::FIRST.next().and_then(CredentialId::next).unwrap();
        assert_eq!(id.get(), 3);
        assert!(CredentialId::FIRST < id);
    }

    #[test]
    fn credential_id_next_stops_at_max() {
        let last = CredentialId::new(u64::MAX).unwrap();
        assert_eq!(last.next(), None);
    }

    #[test]
    fn credential_id_parses_from_str() {
        assert_eq!("42".parse::<CredentialId>().unwrap().get(), 42);
        assert!("0".parse::<CredentialId>().is_err());
        assert!("-1".parse::<CredentialId>().is_err());
        assert!("abc".parse::<CredentialId>().is_err());
    }

    #[test]
    fn credential_id_serde_is_bare_integer() {
        let id = CredentialId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: CredentialId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<CredentialId>("0").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_then_parse_is_identity(bytes in proptest::array::uniform20(any::<u8>())) {
                let id = Identity::from_bytes(bytes);
                let text = id.to_string();
                prop_assert_eq!(text.len(), 2 + IDENTITY_LEN * 2);
                prop_assert_eq!(Identity::parse(&text).unwrap(), id);
            }

            #[test]
            fn arbitrary_strings_never_panic(s in ".*") {
                let _ = Identity::parse(&s);
            }
        }
    }
}
