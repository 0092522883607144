//! Process-local [`ItemModel`] holding items in insertion order. Casting, filtering and
//! merging follow the same rules as the MongoDB backend.

use error_stack::ResultExt;
use items_core::ItemModel;
use items_core::id::ItemId;
use items_core::model::{Item, ItemBody, ItemFilter};
use items_core::result::{ItemRepoError, OptRepoResult, RepoResult};
use items_core::schema::{Condition, ItemSchema};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MemoryModel<S> {
    items: Arc<RwLock<Vec<Item<S>>>>,
}

impl<S: ItemSchema> MemoryModel<S> {
    pub fn new() -> Self {
        Self::with_items(vec![])
    }

    pub fn with_items(items: Vec<Item<S>>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }
}

impl<S: ItemSchema> Default for MemoryModel<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ItemSchema> ItemModel for MemoryModel<S> {
    type Schema = S;

    async fn find_by_id(&self, id: ItemId) -> OptRepoResult<Item<S>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn find(&self, filter: ItemFilter) -> RepoResult<Vec<Item<S>>> {
        let conditions = S::cast_filter(&filter).change_context(ItemRepoError::Find)?;

        let items = self.items.read().await;
        let mut found = Vec::new();
        for item in items.iter() {
            if matches(item, &conditions).change_context(ItemRepoError::Find)? {
                found.push(item.clone());
            }
        }

        Ok(found)
    }

    async fn create(&self, body: ItemBody) -> RepoResult<Item<S>> {
        let fields = S::cast(body).change_context(ItemRepoError::Create)?;
        let item = Item::create(fields);

        self.items.write().await.push(item.clone());

        Ok(item)
    }

    async fn replace_one(&self, id: ItemId, body: ItemBody) -> RepoResult<()> {
        let fields = S::cast(body).change_context(ItemRepoError::Replace)?;

        match self.items.write().await.iter_mut().find(|item| item.id == id) {
            Some(item) => item.fields = fields,
            None => debug!("{} {id} is gone, nothing replaced", S::NAME),
        }

        Ok(())
    }

    async fn update_one(&self, id: ItemId, body: ItemBody) -> RepoResult<()> {
        let patch = S::cast_patch(body).change_context(ItemRepoError::Update)?;

        match self.items.write().await.iter_mut().find(|item| item.id == id) {
            Some(item) => item.fields.merge(patch),
            None => debug!("{} {id} is gone, nothing updated", S::NAME),
        }

        Ok(())
    }

    async fn delete_one(&self, id: ItemId) -> RepoResult<()> {
        self.items.write().await.retain(|item| item.id != id);
        Ok(())
    }
}

/// Compares each condition against the item as it would be serialized, so keys
/// outside the schema only ever match a field that really holds that value.
fn matches<S: ItemSchema>(item: &Item<S>, conditions: &[Condition]) -> RepoResult<bool> {
    if conditions.is_empty() {
        return Ok(true);
    }

    let Value::Object(fields) = serde_json::to_value(item).change_context(ItemRepoError::Cast)?
    else {
        return Ok(false);
    };

    Ok(conditions
        .iter()
        .all(|condition| fields.get(&condition.key) == Some(&condition.value.to_json())))
}
