#[derive(Debug, thiserror::Error)]
#[error("the item service failed")]
pub struct ItemServiceError;
