use axum::Form;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use items_core::model::ItemBody;
use serde_json::Value;

/// The raw field values of a request body.
///
/// JSON and urlencoded form bodies are read. Any other content type, a missing one, or
/// an empty JSON body all give an empty set of fields, leaving the store to apply its
/// defaults.
#[derive(Debug)]
pub struct ItemPayload(pub ItemBody);

impl<S> FromRequest<S> for ItemPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            if bytes.is_empty() {
                return Ok(Self(ItemBody::default()));
            }

            let Json(value) =
                Json::<Value>::from_bytes(&bytes).map_err(IntoResponse::into_response)?;
            Ok(Self(ItemBody::from(value)))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            Ok(Self(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            ))
        } else {
            Ok(Self(ItemBody::default()))
        }
    }
}
