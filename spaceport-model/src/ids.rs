use std::{fmt, str::FromStr};

use chrono::Utc;
use rand::{RngCore, rng};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::ModelError;

/// Store-assigned record identifier.
///
/// Twelve bytes rendered as 24 hexadecimal characters: a big-endian
/// seconds-since-epoch prefix followed by eight random bytes. The prefix keeps
/// freshly generated identifiers roughly ordered by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId([u8; RecordId::BYTE_LEN]);

impl RecordId {
    pub const BYTE_LEN: usize = 12;
    pub const HEX_LEN: usize = Self::BYTE_LEN * 2;

    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::BYTE_LEN];
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        rng().fill_bytes(&mut bytes[4..]);
        Self(bytes)
    }

    /// Syntactic check only; says nothing about whether a record exists.
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == Self::HEX_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        if !Self::is_valid(raw) {
            return Err(ModelError::InvalidIdentifier(raw.to_string()));
        }

        let mut bytes = [0u8; Self::BYTE_LEN];
        hex::decode_to_slice(raw, &mut bytes)
            .map_err(|_| ModelError::InvalidIdentifier(raw.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
