use crate::service::ItemService;
use axum::extract::FromRef;
use items_core::ItemModel;

#[derive(Debug, Clone)]
pub struct ItemAppState<M: ItemModel> {
    pub service: ItemService<M>,
}

impl<M: ItemModel> ItemAppState<M> {
    pub fn new(model: M) -> Self {
        Self {
            service: ItemService::new(model),
        }
    }
}

impl<M: ItemModel> FromRef<ItemAppState<M>> for ItemService<M> {
    fn from_ref(input: &ItemAppState<M>) -> Self {
        input.service.clone()
    }
}
