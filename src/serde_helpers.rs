//! Response decoding shared by every endpoint.
//!
//! With the `tracing` feature, fields the types do not know about are logged
//! instead of silently dropped, and decode failures carry the JSON path.

use serde::de::DeserializeOwned;

use crate::Result;

#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, unknown) = deserialize_tracking_unknown::<T>(bytes)?;

    if !unknown.is_empty() {
        tracing::warn!(
            response_type = std::any::type_name::<T>(),
            fields = ?unknown,
            "response contained unknown fields"
        );
    }

    Ok(value)
}

/// Decodes `bytes`, returning the paths of fields `T` ignored.
#[cfg(feature = "tracing")]
fn deserialize_tracking_unknown<T: DeserializeOwned>(bytes: &[u8]) -> Result<(T, Vec<String>)> {
    let mut unknown = Vec::new();
    let mut track = |path: serde_ignored::Path<'_>| unknown.push(path.to_string());

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let tracked = serde_ignored::Deserializer::new(&mut de, &mut track);
    let value: T = serde_path_to_error::deserialize(tracked)?;
    de.end()?;

    Ok((value, unknown))
}

#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
