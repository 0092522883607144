//! MongoDB backed [`ItemModel`]. Every resource type lives in its own collection of
//! the database named by the connection string.

use bson::oid::ObjectId;
use bson::{Bson, Document, doc};
use error_stack::{Report, ResultExt};
use items_core::ItemModel;
use items_core::id::ItemId;
use items_core::model::{ID_KEY, Item, ItemBody, ItemFilter, VERSION_KEY};
use items_core::result::{ItemRepoError, OptRepoResult, RepoResult};
use items_core::schema::{Condition, FilterValue, ItemSchema};
use mongodb::{Client, Collection, Database};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tokio_stream::StreamExt;
use tracing::{debug, info};

pub mod entities;
pub mod fields;

const DEFAULT_DB_NAME: &str = "items";

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create client connection to mongodb instance")]
pub struct ConnectError;

/// An open client plus the database the models read and write.
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    db: Database,
}

impl Connection {
    /// Connect and ping the server. The database is the one named in the url, or
    /// `items` when the url names none.
    pub async fn open(details: ConnectionDetails) -> Result<Self, Report<ConnectError>> {
        let client = match details {
            ConnectionDetails::Url(url) => Client::with_uri_str(url)
                .await
                .change_context(ConnectError)?,
        };

        let connection = Self::from_client(client);

        connection
            .db
            .run_command(doc! { "ping": 1 })
            .await
            .change_context(ConnectError)
            .attach_with(|| format!("database {} did not answer", connection.db.name()))?;

        info!("connected to mongodb database {}", connection.db.name());

        Ok(connection)
    }

    pub fn from_client(client: Client) -> Self {
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DB_NAME));

        Self { client, db }
    }

    pub fn model<S: MongoSchema>(&self) -> MongoModel<S> {
        MongoModel::new(&self.db)
    }

    /// Waits for in-flight operations, then drops every pooled connection.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("mongodb connection closed");
    }
}

/// Maps a schema onto its stored document shape.
pub trait MongoSchema: ItemSchema {
    const COLLECTION: &'static str;

    /// Every schema field, absent values included as null, references as ObjectIds.
    type Stored: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn store(fields: Self) -> Self::Stored;

    fn load(stored: Self::Stored) -> Self;

    /// The fields a patch sets. A null value clears the field.
    fn patch_document(patch: Self::Patch) -> Document;
}

#[derive(Debug, Clone)]
pub struct MongoModel<S: MongoSchema> {
    collection: Collection<Document>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: MongoSchema> MongoModel<S> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(S::COLLECTION),
            _schema: PhantomData,
        }
    }

    async fn update(&self, id: ItemId, update: Document) -> Result<(), mongodb::error::Error> {
        if update.is_empty() {
            debug!("nothing to write for {} {id}", S::NAME);
            return Ok(());
        }

        debug!("updating {} {id} with {update:?}", S::NAME);

        self.collection
            .update_one(doc! { "_id": id }, update)
            .await
            .map(|result| {
                debug!(
                    "{} documents matched {} {id}",
                    result.matched_count,
                    S::NAME
                )
            })
    }
}

impl<S: MongoSchema> ItemModel for MongoModel<S> {
    type Schema = S;

    async fn find_by_id(&self, id: ItemId) -> OptRepoResult<Item<S>> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .change_context(ItemRepoError::FindById)?
            .map(load_item::<S>)
            .transpose()
            .change_context(ItemRepoError::FindById)
    }

    async fn find(&self, filter: ItemFilter) -> RepoResult<Vec<Item<S>>> {
        let conditions = S::cast_filter(&filter).change_context(ItemRepoError::Find)?;

        let documents: Vec<Document> = self
            .collection
            .find(filter_document(conditions))
            .await
            .change_context(ItemRepoError::Find)?
            .collect::<Result<_, _>>()
            .await
            .change_context(ItemRepoError::Find)?;

        documents
            .into_iter()
            .map(load_item::<S>)
            .collect::<RepoResult<_>>()
            .change_context(ItemRepoError::Find)
    }

    async fn create(&self, body: ItemBody) -> RepoResult<Item<S>> {
        let fields = S::cast(body).change_context(ItemRepoError::Create)?;
        let id = ItemId::new();

        let mut document = doc! { "_id": id };
        for (key, value) in stored_document(fields.clone()).change_context(ItemRepoError::Create)? {
            if value != Bson::Null {
                document.insert(key, value);
            }
        }
        document.insert(VERSION_KEY, 0);

        self.collection
            .insert_one(document)
            .await
            .change_context(ItemRepoError::Create)?;

        Ok(Item::new(id, fields, 0))
    }

    async fn replace_one(&self, id: ItemId, body: ItemBody) -> RepoResult<()> {
        let fields = S::cast(body).change_context(ItemRepoError::Replace)?;
        let document = stored_document(fields).change_context(ItemRepoError::Replace)?;

        self.update(id, update_document(document))
            .await
            .change_context(ItemRepoError::Replace)
    }

    async fn update_one(&self, id: ItemId, body: ItemBody) -> RepoResult<()> {
        let patch = S::cast_patch(body).change_context(ItemRepoError::Update)?;

        self.update(id, update_document(S::patch_document(patch)))
            .await
            .change_context(ItemRepoError::Update)
    }

    async fn delete_one(&self, id: ItemId) -> RepoResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .change_context(ItemRepoError::Delete)?;

        debug!("deleted {} {} documents", result.deleted_count, S::NAME);

        Ok(())
    }
}

fn stored_document<S: MongoSchema>(fields: S) -> Result<Document, Report<bson::ser::Error>> {
    Ok(bson::to_document(&S::store(fields))?)
}

fn load_item<S: MongoSchema>(mut document: Document) -> RepoResult<Item<S>> {
    let id = match document.remove(ID_KEY) {
        Some(Bson::ObjectId(id)) => ItemId::new_with(id),
        other => {
            return Err(Report::new(ItemRepoError::Cast))
                .attach_with(|| format!("stored {} has a malformed _id: {other:?}", S::NAME));
        }
    };

    let raw_version = document.remove(VERSION_KEY);
    let version = match &raw_version {
        None => Some(0),
        Some(Bson::Int32(v)) => u32::try_from(*v).ok(),
        Some(Bson::Int64(v)) => u32::try_from(*v).ok(),
        Some(_) => None,
    }
    .ok_or_else(|| Report::new(ItemRepoError::Cast))
    .attach_with(|| format!("stored {} {id} has a malformed __v: {raw_version:?}", S::NAME))?;

    let stored: S::Stored = bson::from_document(document)
        .change_context(ItemRepoError::Cast)
        .attach_with(|| format!("stored {} {id} does not fit the schema", S::NAME))?;

    Ok(Item::new(id, S::load(stored), version))
}

/// `$set` for present values, `$unset` for nulls. Either operator is left out when it
/// would be empty, so an empty document means there is nothing to write.
fn update_document(fields: Document) -> Document {
    let (set, unset): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .partition(|(_, value)| *value != Bson::Null);

    let mut update = Document::new();
    if !set.is_empty() {
        update.insert("$set", set.into_iter().collect::<Document>());
    }
    if !unset.is_empty() {
        update.insert(
            "$unset",
            unset
                .into_iter()
                .map(|(key, _)| (key, Bson::String(String::new())))
                .collect::<Document>(),
        );
    }
    update
}

fn filter_document(conditions: Vec<Condition>) -> Document {
    conditions
        .into_iter()
        .map(|Condition { key, value }| {
            let value = match value {
                FilterValue::Text(text) => Bson::String(text),
                FilterValue::Flag(flag) => Bson::Boolean(flag),
                FilterValue::Reference(id) => Bson::ObjectId(ObjectId::from(id)),
                FilterValue::Integer(n) => Bson::Int64(n),
            };
            (key, value)
        })
        .collect()
}
