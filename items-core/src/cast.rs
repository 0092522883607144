//! Lenient casts applied while deserializing a body onto a schema.
//!
//! Form bodies only carry strings, so flags and references accept their string forms
//! and text accepts any scalar. Anything else fails deserialization, which the model
//! reports as a cast error.

use crate::id::ItemId;
use optional_field::Field;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Flag(bool),
    Number(Number),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Flag(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }

    fn into_flag(self) -> Option<bool> {
        match self {
            Scalar::Flag(b) => Some(b),
            Scalar::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Scalar::Text(s) => parse_flag(&s),
        }
    }
}

/// Accepted spellings of a boolean.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

pub fn missing<T>() -> Field<T> {
    Field::Missing
}

pub fn optional_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(de)?.map(Scalar::into_text))
}

pub fn patch_text<'de, D>(de: D) -> Result<Field<String>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(de).map(Field::Present)
}

/// `null` falls back to `false`, like a missing value.
pub fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_flag(de)?.unwrap_or(false))
}

pub fn optional_flag<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(de)? {
        None => Ok(None),
        Some(s) => {
            let shown = format!("{s:?}");
            s.into_flag()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("cannot cast {shown} to a boolean")))
        }
    }
}

/// An empty string is the same as no reference.
pub fn optional_reference<'de, D>(de: D) -> Result<Option<ItemId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(D::Error::custom),
    }
}

pub fn patch_reference<'de, D>(de: D) -> Result<Field<ItemId>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_reference(de).map(Field::Present)
}
