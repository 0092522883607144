use bson::Bson;
use bson::oid::ObjectId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use utoipa::ToSchema;

/// Server assigned identifier of an item. Travels as a 24 character hex string.
#[derive(Debug, ToSchema, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(transparent)]
#[schema(value_type = String)]
pub struct ItemId(ObjectId);

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a valid item id")]
pub struct InvalidItemId(String);

impl ItemId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn new_with(id: ObjectId) -> Self {
        Self(id)
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ItemId {
    type Target = ObjectId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ObjectId> for ItemId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<ItemId> for ObjectId {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl From<ItemId> for Bson {
    fn from(value: ItemId) -> Self {
        value.0.into()
    }
}

impl FromStr for ItemId {
    type Err = InvalidItemId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidItemId(s.to_string()))
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ItemId {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.to_hex().serialize(ser)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(de)?;
        raw.parse().map_err(D::Error::custom)
    }
}
