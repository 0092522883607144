use crate::cast;
use crate::schema::{FieldKind, ItemSchema};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Default)]
pub struct Entity {
    #[serde(
        default,
        deserialize_with = "cast::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Plain data. Listing and reading do not look at it.
    #[serde(default, deserialize_with = "cast::flag")]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct EntityPatch {
    /// `null` clears the name.
    #[serde(default = "cast::missing", deserialize_with = "cast::patch_text")]
    pub name: optional_field::Field<String>,
    /// `null` leaves the flag as it is.
    #[serde(default, deserialize_with = "cast::optional_flag")]
    pub deleted: Option<bool>,
}

impl ItemSchema for Entity {
    const NAME: &'static str = "Entity";
    const FIELDS: &'static [(&'static str, FieldKind)] =
        &[("name", FieldKind::Text), ("deleted", FieldKind::Flag)];

    type Patch = EntityPatch;

    fn merge(&mut self, patch: Self::Patch) {
        if let optional_field::Field::Present(name) = patch.name {
            self.name = name;
        }

        if let Some(deleted) = patch.deleted {
            self.deleted = deleted;
        }
    }
}
