use crate::cast;
use crate::id::ItemId;
use crate::schema::{FieldKind, ItemSchema};
use optional_field::Field as Patched;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A field of an [`Entity`](crate::Entity). `entity` and `dsEntity` hold raw entity
/// ids; they are never expanded into the entities they point at.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Default)]
pub struct Field {
    #[serde(
        default,
        deserialize_with = "cast::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "cast::optional_reference",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub entity: Option<ItemId>,
    #[serde(
        rename = "dsEntity",
        default,
        deserialize_with = "cast::optional_reference",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub ds_entity: Option<ItemId>,
    #[serde(default, deserialize_with = "cast::flag")]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct FieldPatch {
    #[serde(default = "cast::missing", deserialize_with = "cast::patch_text")]
    pub name: Patched<String>,
    #[serde(default = "cast::missing", deserialize_with = "cast::patch_reference")]
    pub entity: Patched<ItemId>,
    #[serde(
        rename = "dsEntity",
        default = "cast::missing",
        deserialize_with = "cast::patch_reference"
    )]
    pub ds_entity: Patched<ItemId>,
    #[serde(default, deserialize_with = "cast::optional_flag")]
    pub deleted: Option<bool>,
}

impl ItemSchema for Field {
    const NAME: &'static str = "Field";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::Text),
        ("entity", FieldKind::Reference),
        ("dsEntity", FieldKind::Reference),
        ("deleted", FieldKind::Flag),
    ];

    type Patch = FieldPatch;

    fn merge(&mut self, patch: Self::Patch) {
        if let Patched::Present(name) = patch.name {
            self.name = name;
        }

        if let Patched::Present(entity) = patch.entity {
            self.entity = entity;
        }

        if let Patched::Present(ds_entity) = patch.ds_entity {
            self.ds_entity = ds_entity;
        }

        if let Some(deleted) = patch.deleted {
            self.deleted = deleted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemBody;
    use crate::result::ItemRepoError;
    use serde_json::json;

    #[test]
    fn references_round_trip_as_hex_strings() {
        let entity = ItemId::new();
        let ds_entity = ItemId::new();

        let field = Field::cast(ItemBody::from(json!({
            "name": "f1",
            "entity": entity.to_hex(),
            "dsEntity": ds_entity.to_hex(),
        })))
        .unwrap();

        assert_eq!(Some(entity), field.entity);
        assert_eq!(Some(ds_entity), field.ds_entity);
        assert_eq!(
            json!({
                "name": "f1",
                "entity": entity.to_hex(),
                "dsEntity": ds_entity.to_hex(),
                "deleted": false,
            }),
            serde_json::to_value(&field).unwrap()
        );
    }

    #[test]
    fn malformed_reference_is_a_cast_error() {
        let err = Field::cast(ItemBody::from(json!({ "entity": "not-an-id" }))).unwrap_err();

        assert!(matches!(err.current_context(), ItemRepoError::Cast));
    }

    #[test]
    fn merge_only_touches_given_fields() {
        let entity = ItemId::new();
        let mut field = Field {
            name: Some("f1".to_string()),
            entity: Some(entity),
            ds_entity: Some(ItemId::new()),
            deleted: false,
        };

        field.merge(
            Field::cast_patch(ItemBody::from(json!({ "dsEntity": null, "deleted": "true" })))
                .unwrap(),
        );

        assert_eq!(Some("f1".to_string()), field.name);
        assert_eq!(Some(entity), field.entity);
        assert_eq!(None, field.ds_entity);
        assert!(field.deleted);
    }
}
