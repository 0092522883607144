use super::MongoSchema;
use bson::{Document, doc};
use items_core::Entity;
use items_core::entity::EntityPatch;
use optional_field::Field;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MongoEntity {
    name: Option<String>,
    #[serde(default)]
    deleted: bool,
}

impl From<Entity> for MongoEntity {
    fn from(value: Entity) -> Self {
        Self {
            name: value.name,
            deleted: value.deleted,
        }
    }
}

impl From<MongoEntity> for Entity {
    fn from(value: MongoEntity) -> Self {
        Self {
            name: value.name,
            deleted: value.deleted,
        }
    }
}

impl MongoSchema for Entity {
    const COLLECTION: &'static str = "entities";

    type Stored = MongoEntity;

    fn store(fields: Self) -> Self::Stored {
        fields.into()
    }

    fn load(stored: Self::Stored) -> Self {
        stored.into()
    }

    fn patch_document(patch: EntityPatch) -> Document {
        let mut document = Document::new();

        if let Field::Present(name) = patch.name {
            document.insert("name", name);
        }

        if let Some(deleted) = patch.deleted {
            document.insert("deleted", deleted);
        }

        document
    }
}
