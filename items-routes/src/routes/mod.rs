use crate::error::ItemServiceError;
use crate::routes::requests::ItemPayload;
use crate::routes::responses::ItemResponse;
use crate::service::ItemService;
use crate::state::ItemAppState;
use api_doc::ItemDoc;
use axum::extract::{Extension, Query, State};
use axum::response::{IntoResponse, Response, Result};
use axum::routing::get;
use axum::{Router, middleware as axum_middleware};
use engine::error::EndpointError;
use engine::stream::StreamingResponse;
use items_core::ItemModel;
use items_core::model::{Item, ItemFilter};
use tracing::instrument;
use utoipa::OpenApi;

mod api_doc;
mod middleware;
mod requests;
mod responses;

#[cfg(test)]
mod tests;

pub use api_doc::ItemDocs;
pub use responses::ITEM_REMOVED_MESSAGE;

const COLLECTION_PATH: &str = "/";
const ITEM_PATH: &str = "/{item_id}";

type ItemOf<M> = Item<<M as ItemModel>::Schema>;

/// Routes for one resource type, meant to be nested under its mount path.
///
/// The collection root lists and creates. Every `/{item_id}` route sits behind
/// [`middleware::resolve_item`], so unknown or malformed ids end in a 404 before any
/// handler runs.
pub fn build<M: ItemModel>(app_state: ItemAppState<M>) -> Router {
    let item_routes = Router::new()
        .route(
            ITEM_PATH,
            get(get_item::<M>)
                .put(replace_item::<M>)
                .patch(update_item::<M>)
                .delete(delete_item::<M>),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::resolve_item::<M>,
        ));

    Router::new()
        .route(COLLECTION_PATH, get(list_items::<M>).post(create_item::<M>))
        .merge(item_routes)
        .with_state(app_state)
}

/// The OpenAPI description of the routes from [`build`], relative to the mount path.
pub fn openapi() -> utoipa::openapi::OpenApi {
    ItemDocs::openapi()
}

/// List every item matching the query parameters. Parameter names are not checked,
/// each one is a field that must equal the given value. Names starting with `$` are
/// refused with a 500.
#[utoipa::path(
    get,
    path = COLLECTION_PATH,
    responses(
        (status = OK, description = "Every matching item, possibly none", body = Vec<ItemDoc>),
        (status = INTERNAL_SERVER_ERROR, description = "The store failed or a parameter could not be cast", body = String),
    ),
)]
#[instrument(skip(service), err(Debug))]
pub async fn list_items<M: ItemModel>(
    State(service): State<ItemService<M>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, EndpointError<ItemServiceError>> {
    let items = service.list(params.into_iter().collect::<ItemFilter>()).await?;

    Ok(StreamingResponse::ok(items).into_response())
}

/// Create an item from the body. Schema defaults fill in what the body leaves out.
#[utoipa::path(
    post,
    path = COLLECTION_PATH,
    responses(
        (status = CREATED, description = "The stored item", body = ItemDoc),
        (status = INTERNAL_SERVER_ERROR, description = "The store failed or the body could not be cast", body = String),
    ),
    request_body = ItemDoc,
)]
#[instrument(skip(service), err(Debug))]
pub async fn create_item<M: ItemModel>(
    State(service): State<ItemService<M>>,
    ItemPayload(body): ItemPayload,
) -> Result<Response, EndpointError<ItemServiceError>> {
    let item = service.create(body).await?;

    Ok(ItemResponse::created(item).into_response())
}

#[utoipa::path(
    get,
    path = ITEM_PATH,
    responses(
        (status = OK, description = "The item", body = ItemDoc),
        (status = NOT_FOUND, description = "Malformed or unknown id", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "The store failed", body = String),
    ),
    params(
        ("item_id" = String, Path, description = "Id of the item"),
    )
)]
#[instrument(skip_all, fields(item.id = %item.id))]
pub async fn get_item<M: ItemModel>(Extension(item): Extension<ItemOf<M>>) -> Response {
    ItemResponse::ok(item).into_response()
}

/// Overwrite every field of the item. Fields left out of the body go back to their
/// defaults, `_id` and `__v` in the body are ignored.
#[utoipa::path(
    put,
    path = ITEM_PATH,
    responses(
        (status = OK, description = "The item as stored after the replace", body = ItemDoc),
        (status = NOT_FOUND, description = "Malformed or unknown id", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "The store failed or the body could not be cast", body = String),
    ),
    params(
        ("item_id" = String, Path, description = "Id of the item to replace"),
    ),
    request_body = ItemDoc,
)]
#[instrument(skip(service, item), err(Debug), fields(item.id = %item.id))]
pub async fn replace_item<M: ItemModel>(
    State(service): State<ItemService<M>>,
    Extension(item): Extension<ItemOf<M>>,
    ItemPayload(body): ItemPayload,
) -> Result<Response, EndpointError<ItemServiceError>> {
    let replaced = service
        .replace(item.id, body)
        .await?
        .ok_or(EndpointError::NotFound)?;

    Ok(ItemResponse::ok(replaced).into_response())
}

/// Merge the fields in the body into the item. Fields left out are kept.
#[utoipa::path(
    patch,
    path = ITEM_PATH,
    responses(
        (status = OK, description = "The item as stored after the update", body = ItemDoc),
        (status = NOT_FOUND, description = "Malformed or unknown id", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "The store failed or the body could not be cast", body = String),
    ),
    params(
        ("item_id" = String, Path, description = "Id of the item to update"),
    ),
    request_body = ItemDoc,
)]
#[instrument(skip(service, item), err(Debug), fields(item.id = %item.id))]
pub async fn update_item<M: ItemModel>(
    State(service): State<ItemService<M>>,
    Extension(item): Extension<ItemOf<M>>,
    ItemPayload(body): ItemPayload,
) -> Result<Response, EndpointError<ItemServiceError>> {
    let updated = service
        .update(item.id, body)
        .await?
        .ok_or(EndpointError::NotFound)?;

    Ok(ItemResponse::ok(updated).into_response())
}

/// Remove the item from the store. The `deleted` flag plays no part in this.
#[utoipa::path(
    delete,
    path = ITEM_PATH,
    responses(
        (status = NO_CONTENT, description = "The item was removed"),
        (status = NOT_FOUND, description = "Malformed or unknown id, including an item that was already removed", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "The store failed", body = String),
    ),
    params(
        ("item_id" = String, Path, description = "Id of the item to remove"),
    )
)]
#[instrument(skip(service, item), err(Debug), fields(item.id = %item.id))]
pub async fn delete_item<M: ItemModel>(
    State(service): State<ItemService<M>>,
    Extension(item): Extension<ItemOf<M>>,
) -> Result<Response, EndpointError<ItemServiceError>> {
    service.delete(item.id).await?;

    Ok(responses::removed())
}
