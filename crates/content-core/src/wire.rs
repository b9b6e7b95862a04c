//! Serde helpers for integer fields on the lenient wire format.
//!
//! Documents produced by older admin tooling coerce numbers with
//! `Number(x)`, so an integer field may arrive spelled `3` or `3.0`. These
//! deserializers accept both; serialization always writes the plain integer.

use serde::de::{Deserializer, Error};
use serde::Deserialize;

pub(crate) fn integral_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if (0.0..=u32::MAX as f64).contains(&n) && n.fract() == 0.0 {
        Ok(n as u32)
    } else {
        Err(D::Error::custom(format!(
            "expected a non-negative integer, got {n}"
        )))
    }
}

pub(crate) fn optional_integral_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) if (0.0..=u32::MAX as f64).contains(&n) && n.fract() == 0.0 => Ok(Some(n as u32)),
        Some(n) => Err(D::Error::custom(format!(
            "expected a non-negative integer, got {n}"
        ))),
    }
}

pub(crate) fn optional_integral_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) if (i32::MIN as f64..=i32::MAX as f64).contains(&n) && n.fract() == 0.0 => {
            Ok(Some(n as i32))
        }
        Some(n) => Err(D::Error::custom(format!("expected an integer, got {n}"))),
    }
}
