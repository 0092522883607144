use crate::cast;
use crate::id::ItemId;
use crate::model::{ID_KEY, ItemBody, ItemFilter, VERSION_KEY};
use crate::result::{ItemRepoError, RepoResult};
use error_stack::{Report, ResultExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;

/// The type values of a persisted field are cast to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    /// Identifier of another item.
    Reference,
    /// Whole number, only the store maintained `__v`.
    Integer,
}

/// A query value after it has been cast for the field it is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Flag(bool),
    Reference(ItemId),
    Integer(i64),
}

impl FilterValue {
    /// The value as it appears in a serialized item.
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Text(s) => Value::String(s.clone()),
            FilterValue::Flag(b) => Value::Bool(*b),
            FilterValue::Reference(id) => Value::String(id.to_hex()),
            FilterValue::Integer(n) => Value::from(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub value: FilterValue,
}

/// The fields of one resource type. Items of the resource are `Item<Self>`.
pub trait ItemSchema:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Resource name used in logs and metric labels.
    const NAME: &'static str;
    /// Every persisted field by its wire name.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Every field optional, for partial updates.
    type Patch: Debug + DeserializeOwned + Send + 'static;

    fn merge(&mut self, patch: Self::Patch);

    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            ID_KEY => return Some(FieldKind::Reference),
            VERSION_KEY => return Some(FieldKind::Integer),
            _ => {}
        }

        Self::FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, kind)| *kind)
    }

    /// Cast a full body. Unknown keys are dropped, missing fields get their defaults.
    fn cast(body: ItemBody) -> RepoResult<Self> {
        serde_json::from_value(body.into_value())
            .change_context(ItemRepoError::Cast)
            .attach_with(|| format!("body does not fit the {} schema", Self::NAME))
    }

    fn cast_patch(body: ItemBody) -> RepoResult<Self::Patch> {
        serde_json::from_value(body.into_value())
            .change_context(ItemRepoError::Cast)
            .attach_with(|| format!("body does not fit the {} schema", Self::NAME))
    }

    /// Cast query conditions. Keys outside the schema are kept as text. A key starting
    /// with `$` names a query operator, not a field, and is rejected.
    fn cast_filter(filter: &ItemFilter) -> RepoResult<Vec<Condition>> {
        filter
            .conditions()
            .iter()
            .map(|(key, raw)| -> RepoResult<Condition> {
                if key.starts_with('$') {
                    return Err(Report::new(ItemRepoError::Cast))
                        .attach_with(|| format!("'{key}' is an operator, not a field"));
                }

                let value = match Self::field_kind(key) {
                    None | Some(FieldKind::Text) => FilterValue::Text(raw.clone()),
                    Some(FieldKind::Flag) => cast::parse_flag(raw)
                        .map(FilterValue::Flag)
                        .ok_or_else(|| Report::new(ItemRepoError::Cast))
                        .attach_with(|| format!("'{raw}' is not a boolean (filter on {key})"))?,
                    Some(FieldKind::Reference) => raw
                        .parse()
                        .map(FilterValue::Reference)
                        .change_context(ItemRepoError::Cast)
                        .attach_with(|| format!("filter on {key}"))?,
                    Some(FieldKind::Integer) => raw
                        .parse()
                        .map(FilterValue::Integer)
                        .change_context(ItemRepoError::Cast)
                        .attach_with(|| format!("'{raw}' is not a whole number (filter on {key})"))?,
                };

                Ok(Condition {
                    key: key.clone(),
                    value,
                })
            })
            .collect()
    }
}
