use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use std::error::Error;

pub const NOT_FOUND_MESSAGE: &str = "Item not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Every failure an endpoint can end with. The report in `Service` is for logs only,
/// the caller only ever sees the status code and a fixed message.
#[derive(thiserror::Error)]
pub enum EndpointError<T: Error + Send + Sync + 'static> {
    #[error("the requested item does not exist")]
    NotFound,
    #[error("there was an error running the endpoint")]
    Service(Report<T>),
}

impl<T: Error + Send + Sync + 'static> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointError::NotFound => write!(f, "NotFound"),
            EndpointError::Service(report) => report.fmt(f),
        }
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error + Send + Sync + 'static,
{
    fn from(value: Report<T>) -> Self {
        Self::Service(value)
    }
}

impl<T: Error + Send + Sync + 'static> IntoResponse for EndpointError<T> {
    fn into_response(self) -> Response {
        match self {
            EndpointError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
            EndpointError::Service(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}
