//! Serde helpers for `0x`-prefixed hex byte strings on the control API

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

fn encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

/// `Vec<u8>` <-> `"0x..."`
pub mod hex_bytes {
    use super::*;

    /// Serialize bytes as a hex string
    pub fn serialize<T, S>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&encode(bytes.as_ref()))
    }

    /// Deserialize bytes from a hex string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode(&s).map_err(D::Error::custom)
    }
}

/// `Vec<Vec<u8>>` <-> `["0x...", ...]`
pub mod hex_bytes_list {
    use super::*;

    /// Serialize a list of byte strings as hex strings
    pub fn serialize<S>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(items.iter().map(|item| encode(item)))
    }

    /// Deserialize a list of byte strings from hex strings
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| decode(s).map_err(D::Error::custom))
            .collect()
    }
}
