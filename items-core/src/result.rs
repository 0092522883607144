use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<ItemRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<ItemRepoError>>;

#[derive(Debug, thiserror::Error)]
pub enum ItemRepoError {
    #[error("failed to find item")]
    FindById,
    #[error("failed to list items")]
    Find,
    #[error("failed to create item")]
    Create,
    #[error("failed to replace item")]
    Replace,
    #[error("failed to update item")]
    Update,
    #[error("failed to delete item")]
    Delete,
    #[error("value does not fit the item schema")]
    Cast,
}
