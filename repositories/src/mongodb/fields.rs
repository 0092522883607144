use super::MongoSchema;
use bson::oid::ObjectId;
use bson::{Document, doc};
use items_core::Field;
use items_core::field::FieldPatch;
use items_core::id::ItemId;
use optional_field::Field as Patched;
use serde::{Deserialize, Serialize};

/// References are stored as ObjectIds so they can be matched against `_id`s.
#[derive(Debug, Serialize, Deserialize)]
pub struct MongoField {
    name: Option<String>,
    entity: Option<ObjectId>,
    #[serde(rename = "dsEntity")]
    ds_entity: Option<ObjectId>,
    #[serde(default)]
    deleted: bool,
}

impl From<Field> for MongoField {
    fn from(value: Field) -> Self {
        Self {
            name: value.name,
            entity: value.entity.map(ObjectId::from),
            ds_entity: value.ds_entity.map(ObjectId::from),
            deleted: value.deleted,
        }
    }
}

impl From<MongoField> for Field {
    fn from(value: MongoField) -> Self {
        Self {
            name: value.name,
            entity: value.entity.map(ItemId::new_with),
            ds_entity: value.ds_entity.map(ItemId::new_with),
            deleted: value.deleted,
        }
    }
}

impl MongoSchema for Field {
    const COLLECTION: &'static str = "fields";

    type Stored = MongoField;

    fn store(fields: Self) -> Self::Stored {
        fields.into()
    }

    fn load(stored: Self::Stored) -> Self {
        stored.into()
    }

    fn patch_document(patch: FieldPatch) -> Document {
        let mut document = Document::new();

        if let Patched::Present(name) = patch.name {
            document.insert("name", name);
        }

        if let Patched::Present(entity) = patch.entity {
            document.insert("entity", entity.map(ObjectId::from));
        }

        if let Patched::Present(ds_entity) = patch.ds_entity {
            document.insert("dsEntity", ds_entity.map(ObjectId::from));
        }

        if let Some(deleted) = patch.deleted {
            document.insert("deleted", deleted);
        }

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn stored_field_holds_references_as_object_ids() {
        let entity = ItemId::new();
        let field = Field {
            name: Some("f1".to_string()),
            entity: Some(entity),
            ds_entity: None,
            deleted: false,
        };

        assert_eq!(
            doc! {
                "name": "f1",
                "entity": ObjectId::from(entity),
                "dsEntity": Bson::Null,
                "deleted": false,
            },
            bson::to_document(&Field::store(field)).unwrap()
        );
    }

    #[test]
    fn stored_field_loads_back() {
        let stored = MongoField {
            name: None,
            entity: None,
            ds_entity: Some(ObjectId::new()),
            deleted: true,
        };
        let expected = stored.ds_entity.map(ItemId::new_with);

        let field = Field::load(stored);

        assert_eq!(expected, field.ds_entity);
        assert!(field.deleted);
    }

    #[test]
    fn patch_document_clears_null_references() {
        let patch = FieldPatch {
            name: Patched::Missing,
            entity: Patched::Present(None),
            ds_entity: Patched::Missing,
            deleted: Some(true),
        };

        assert_eq!(
            doc! { "entity": Bson::Null, "deleted": true },
            Field::patch_document(patch)
        );
    }
}
