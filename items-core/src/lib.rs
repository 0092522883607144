use id::ItemId;
use model::{Item, ItemBody, ItemFilter};
use result::{OptRepoResult, RepoResult};
use schema::ItemSchema;

pub mod cast;
pub mod entity;
pub mod field;
pub mod id;
pub mod model;
pub mod result;
pub mod schema;

pub use entity::Entity;
pub use field::Field;

/// Storage primitives for one resource type. Implemented once per storage backend,
/// parameterised by the schema of the resource it stores.
///
/// Bodies are handed over raw. Casting them onto `Self::Schema` is the model's job,
/// and a body that does not fit surfaces as [`result::ItemRepoError::Cast`].
pub trait ItemModel: Send + Sync + Clone + 'static {
    type Schema: ItemSchema;

    fn find_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = OptRepoResult<Item<Self::Schema>>> + Send;

    /// Every item matching all `filter` conditions. An empty filter matches everything.
    fn find(
        &self,
        filter: ItemFilter,
    ) -> impl Future<Output = RepoResult<Vec<Item<Self::Schema>>>> + Send;

    fn create(&self, body: ItemBody)
    -> impl Future<Output = RepoResult<Item<Self::Schema>>> + Send;

    /// Overwrite every schema field of `id`. Fields missing from `body` go back to
    /// their defaults. The id and version are untouched.
    fn replace_one(
        &self,
        id: ItemId,
        body: ItemBody,
    ) -> impl Future<Output = RepoResult<()>> + Send;

    /// Merge the fields present in `body` into `id`.
    fn update_one(
        &self,
        id: ItemId,
        body: ItemBody,
    ) -> impl Future<Output = RepoResult<()>> + Send;

    fn delete_one(&self, id: ItemId) -> impl Future<Output = RepoResult<()>> + Send;
}
