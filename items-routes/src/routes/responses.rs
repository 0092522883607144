use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use items_core::model::Item;
use serde::Serialize;

pub const ITEM_REMOVED_MESSAGE: &str = "Item removed";

#[derive(Debug, Serialize)]
pub struct ItemResponse<S> {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(flatten)]
    item: Item<S>,
}

impl<S> ItemResponse<S> {
    pub fn ok(item: Item<S>) -> Self {
        Self {
            status_code: StatusCode::OK,
            item,
        }
    }

    pub fn created(item: Item<S>) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            item,
        }
    }
}

impl<S: Serialize> IntoResponse for ItemResponse<S> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

/// The message never reaches the client, a 204 has no body on the wire.
pub fn removed() -> Response {
    (StatusCode::NO_CONTENT, ITEM_REMOVED_MESSAGE).into_response()
}
