// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

// the gateway and the generated js clients disagree on how to represent 64-bit integers
// (strings vs numbers) and both happily emit `null` for absent values, so be lenient on input

use serde::{Deserialize, Deserializer};

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

pub(crate) mod lenient_u64 {
    use super::NumberOrString;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(0),
            Some(NumberOrString::Number(value)) => Ok(value),
            Some(NumberOrString::String(raw)) if raw.is_empty() => Ok(0),
            Some(NumberOrString::String(raw)) => raw.parse().map_err(D::Error::custom),
        }
    }
}

/// Like [`lenient_u64`], but absent, `null` and empty values stay `None`.
pub(crate) mod lenient_option_u64 {
    use super::NumberOrString;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        value: &Option<u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(value)) => Ok(Some(value)),
            Some(NumberOrString::String(raw)) if raw.is_empty() => Ok(None),
            Some(NumberOrString::String(raw)) => raw.parse().map(Some).map_err(D::Error::custom),
        }
    }
}

pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Vec::new()),
            Some(encoded) => STANDARD.decode(encoded).map_err(D::Error::custom),
        }
    }
}
