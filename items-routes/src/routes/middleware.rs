use crate::error::ItemServiceError;
use crate::service::ItemService;
use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use engine::error::EndpointError;
use items_core::ItemModel;
use items_core::id::ItemId;
use tracing::{debug, error, instrument};

/// Existence guard for every `/{item_id}` route. Resolves the id to a stored item and
/// hands it to the handler as an `Extension<Item<_>>`.
///
/// A malformed id is answered the same way as an unknown one.
#[instrument(skip(service, req, next))]
pub async fn resolve_item<M: ItemModel>(
    State(service): State<ItemService<M>>,
    Path(item_id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, EndpointError<ItemServiceError>> {
    let Ok(id) = item_id.parse::<ItemId>() else {
        debug!("'{item_id}' is not an item id");
        return Err(EndpointError::NotFound);
    };

    let item = match service.get(id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            debug!("no item with id {id}");
            return Err(EndpointError::NotFound);
        }
        Err(report) => {
            error!("failed to resolve item {id}: {report:?}");
            return Err(report.into());
        }
    };

    req.extensions_mut().insert(item);
    Ok(next.run(req).await)
}
