//! Serializes [`U256`] as a base-10 string, which is how vote counts and
//! election rounds travel over the API.

use core::fmt;

use ethers_core::types::U256;
use serde::de::{Error, Visitor};
use serde::{Deserializer, Serializer};

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Accepts either a decimal string or a plain JSON integer.
pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = U256;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a decimal encoded unsigned integer")
        }

        fn visit_str<E>(self, data: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            U256::from_dec_str(data).map_err(Error::custom)
        }

        fn visit_u64<E>(self, data: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(U256::from(data))
        }
    }

    deserializer.deserialize_any(DecimalVisitor)
}
