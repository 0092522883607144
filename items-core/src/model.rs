use crate::id::ItemId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ID_KEY: &str = "_id";
pub const VERSION_KEY: &str = "__v";

/// A stored document of resource type `S`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Item<S> {
    #[serde(rename = "_id")]
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: S,
    /// Version token maintained by the store. Never taken from a request.
    #[serde(rename = "__v", default)]
    pub version: u32,
}

impl<S> Item<S> {
    pub fn new(id: ItemId, fields: S, version: u32) -> Self {
        Self {
            id,
            fields,
            version,
        }
    }

    pub fn create(fields: S) -> Self {
        Self::new(ItemId::new(), fields, 0)
    }
}

/// Raw field values sent by a client, not yet cast to any schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemBody(Map<String, Value>);

impl ItemBody {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Drop the keys owned by the store (`_id`, `__v`).
    pub fn without_reserved(mut self) -> Self {
        self.0.remove(ID_KEY);
        self.0.remove(VERSION_KEY);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl FromIterator<(String, Value)> for ItemBody {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Value> for ItemBody {
    /// Anything but a JSON object is an empty body.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

/// Raw `key=value` conditions taken from a query string. Keys are not checked
/// against any schema. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    conditions: Vec<(String, String)>,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.conditions.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.conditions.push((key, value)),
        }
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl FromIterator<(String, String)> for ItemFilter {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut filter = Self::new();
        for (key, value) in iter {
            filter.add(key, value);
        }
        filter
    }
}
