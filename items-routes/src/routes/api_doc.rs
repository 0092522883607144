use items_core::{Entity, Field};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Keys every item carries next to the fields of its resource ([`Entity`] or [`Field`]).
#[derive(Debug, Serialize, ToSchema)]
#[allow(dead_code)]
pub struct ItemDoc {
    /// Assigned by the store. Ignored when sent in a body.
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub deleted: bool,
    /// Store maintained version. Ignored when sent in a body.
    #[serde(rename = "__v")]
    pub version: u32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::list_items,
        super::create_item,
        super::get_item,
        super::replace_item,
        super::update_item,
        super::delete_item,
    ),
    components(schemas(ItemDoc, Entity, Field))
)]
pub struct ItemDocs;
