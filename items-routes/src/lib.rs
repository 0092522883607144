use crate::error::ItemServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<ItemServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<ItemServiceError>>;

pub mod error;
mod metrics;
pub mod routes;
pub mod service;
pub mod state;
