use crate::error::ItemServiceError;
use crate::{OptServiceResult, ServiceResult, metrics};
use error_stack::ResultExt;
use items_core::ItemModel;
use items_core::id::ItemId;
use items_core::model::{Item, ItemBody, ItemFilter};
use items_core::schema::ItemSchema;
use tracing::{debug, instrument};

type ItemOf<M> = Item<<M as ItemModel>::Schema>;

/// The operations behind every item endpoint, for one resource type.
#[derive(Debug, Clone)]
pub struct ItemService<M> {
    model: M,
}

impl<M: ItemModel> ItemService<M> {
    pub fn new(model: M) -> Self {
        ItemService { model }
    }

    fn resource() -> &'static str {
        M::Schema::NAME
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, filter: ItemFilter) -> ServiceResult<Vec<ItemOf<M>>> {
        let items = self
            .model
            .find(filter)
            .await
            .change_context(ItemServiceError)?;

        metrics::increment_items_retrieved_by(Self::resource(), items.len());
        Ok(items)
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, id: ItemId) -> OptServiceResult<ItemOf<M>> {
        let item = self
            .model
            .find_by_id(id)
            .await
            .change_context(ItemServiceError)?;

        if item.is_some() {
            metrics::increment_items_retrieved(Self::resource());
        }
        Ok(item)
    }

    /// A client supplied `_id` or `__v` is ignored, the store assigns both.
    #[instrument(skip_all, name = "service#create")]
    pub async fn create(&self, body: ItemBody) -> ServiceResult<ItemOf<M>> {
        let item = self
            .model
            .create(body.without_reserved())
            .await
            .change_context(ItemServiceError)?;

        debug!("created {} {}", Self::resource(), item.id);
        metrics::increment_items_created(Self::resource());
        Ok(item)
    }

    /// Overwrite the item, then read it back. `None` if it was removed in between.
    #[instrument(skip_all, name = "service#replace")]
    pub async fn replace(&self, id: ItemId, body: ItemBody) -> OptServiceResult<ItemOf<M>> {
        self.model
            .replace_one(id, body.without_reserved())
            .await
            .change_context(ItemServiceError)?;

        metrics::increment_items_replaced(Self::resource());
        self.reload(id).await
    }

    /// Merge into the item, then read it back. `None` if it was removed in between.
    #[instrument(skip_all, name = "service#update")]
    pub async fn update(&self, id: ItemId, body: ItemBody) -> OptServiceResult<ItemOf<M>> {
        self.model
            .update_one(id, body.without_reserved())
            .await
            .change_context(ItemServiceError)?;

        metrics::increment_items_updated(Self::resource());
        self.reload(id).await
    }

    #[instrument(skip_all, name = "service#delete")]
    pub async fn delete(&self, id: ItemId) -> ServiceResult<()> {
        self.model
            .delete_one(id)
            .await
            .change_context(ItemServiceError)?;

        debug!("deleted {} {id}", Self::resource());
        metrics::increment_items_deleted(Self::resource());
        Ok(())
    }

    async fn reload(&self, id: ItemId) -> OptServiceResult<ItemOf<M>> {
        let item = self
            .model
            .find_by_id(id)
            .await
            .change_context(ItemServiceError)
            .attach_with(|| format!("reading back {} {id}", Self::resource()))?;

        if item.is_none() {
            debug!("{} {id} disappeared after it was written", Self::resource());
        }
        Ok(item)
    }
}
