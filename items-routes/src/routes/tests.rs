use super::*;
use axum::http::StatusCode;
use axum_test::TestServer;
use engine::error::{INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
use error_stack::Report;
use items_core::id::ItemId;
use items_core::model::ItemBody;
use items_core::result::{ItemRepoError, OptRepoResult, RepoResult};
use items_core::{Entity, Field};
use repositories::memory::MemoryModel;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn server<M: ItemModel>(model: M) -> TestServer {
    TestServer::new(build(ItemAppState::new(model))).unwrap()
}

#[fixture]
fn entities() -> TestServer {
    server(MemoryModel::<Entity>::new())
}

/// Reads go to the wrapped model, every write fails. With `reads_fail` set, reads
/// fail as well.
#[derive(Debug, Clone)]
struct FailingModel {
    inner: MemoryModel<Entity>,
    reads_fail: bool,
}

impl FailingModel {
    fn writes(inner: MemoryModel<Entity>) -> Self {
        Self {
            inner,
            reads_fail: false,
        }
    }

    fn everything() -> Self {
        Self {
            inner: MemoryModel::new(),
            reads_fail: true,
        }
    }
}

impl ItemModel for FailingModel {
    type Schema = Entity;

    async fn find_by_id(&self, id: ItemId) -> OptRepoResult<Item<Entity>> {
        if self.reads_fail {
            return Err(Report::new(ItemRepoError::FindById).attach("secret connection detail"));
        }
        self.inner.find_by_id(id).await
    }

    async fn find(&self, filter: ItemFilter) -> RepoResult<Vec<Item<Entity>>> {
        if self.reads_fail {
            return Err(Report::new(ItemRepoError::Find).attach("secret connection detail"));
        }
        self.inner.find(filter).await
    }

    async fn create(&self, _body: ItemBody) -> RepoResult<Item<Entity>> {
        Err(Report::new(ItemRepoError::Create))
    }

    async fn replace_one(&self, _id: ItemId, _body: ItemBody) -> RepoResult<()> {
        Err(Report::new(ItemRepoError::Replace))
    }

    async fn update_one(&self, _id: ItemId, _body: ItemBody) -> RepoResult<()> {
        Err(Report::new(ItemRepoError::Update))
    }

    async fn delete_one(&self, _id: ItemId) -> RepoResult<()> {
        Err(Report::new(ItemRepoError::Delete))
    }
}

async fn create(server: &TestServer, body: Value) -> Value {
    let res = server.post("/").json(&body).await;
    res.assert_status(StatusCode::CREATED);
    res.json::<Value>()
}

fn id_of(item: &Value) -> String {
    item["_id"].as_str().unwrap().to_string()
}

#[rstest]
#[tokio::test]
async fn create_returns_item_with_id_and_defaults(entities: TestServer) {
    let created = create(&entities, json!({ "name": "item 1" })).await;

    assert_eq!("item 1", created["name"]);
    assert_eq!(false, created["deleted"]);
    assert_eq!(0, created["__v"]);
    assert!(id_of(&created).parse::<ItemId>().is_ok());
}

#[rstest]
#[tokio::test]
async fn create_then_get_returns_same_item(entities: TestServer) {
    let created = create(&entities, json!({ "name": "item 1" })).await;

    let res = entities.get(&format!("/{}", id_of(&created))).await;

    res.assert_status_ok();
    assert_eq!(created, res.json::<Value>());
}

#[rstest]
#[tokio::test]
async fn create_ignores_client_id_and_version(entities: TestServer) {
    let supplied = ItemId::new().to_hex();

    let created = create(&entities, json!({ "_id": supplied, "__v": 7, "name": "x" })).await;

    assert_ne!(supplied, id_of(&created));
    assert_eq!(0, created["__v"]);
}

#[rstest]
#[tokio::test]
async fn create_accepts_form_bodies(entities: TestServer) {
    let res = entities
        .post("/")
        .form(&[("name", "from a form"), ("deleted", "true")])
        .await;

    res.assert_status(StatusCode::CREATED);
    let created = res.json::<Value>();
    assert_eq!("from a form", created["name"]);
    assert_eq!(true, created["deleted"]);
}

#[rstest]
#[tokio::test]
async fn create_without_body_uses_defaults(entities: TestServer) {
    let res = entities.post("/").await;

    res.assert_status(StatusCode::CREATED);
    let created = res.json::<Value>();
    assert_eq!(false, created["deleted"]);
    assert!(created.get("name").is_none());
}

#[rstest]
#[tokio::test]
async fn create_with_uncastable_body_is_500(entities: TestServer) {
    let res = entities.post("/").json(&json!({ "deleted": "sometimes" })).await;

    res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    res.assert_text(INTERNAL_ERROR_MESSAGE);
}

#[rstest]
#[case::malformed("not-an-id")]
#[case::short("123")]
#[case::unknown("5f1d7f3c9b1e8a2b3c4d5e6f")]
#[tokio::test]
async fn unknown_or_malformed_id_is_404(entities: TestServer, #[case] id: &str) {
    for res in [
        entities.get(&format!("/{id}")).await,
        entities.put(&format!("/{id}")).json(&json!({})).await,
        entities.patch(&format!("/{id}")).json(&json!({})).await,
        entities.delete(&format!("/{id}")).await,
    ] {
        res.assert_status_not_found();
        res.assert_text(NOT_FOUND_MESSAGE);
    }
}

#[rstest]
#[tokio::test]
async fn replace_drops_fields_not_resent(entities: TestServer) {
    let created = create(&entities, json!({ "name": "item 1" })).await;
    let id = id_of(&created);

    let res = entities
        .put(&format!("/{id}"))
        .json(&json!({ "deleted": true }))
        .await;

    res.assert_status_ok();
    let replaced = res.json::<Value>();
    assert_eq!(json!({ "_id": id, "deleted": true, "__v": 0 }), replaced);

    let stored = entities.get(&format!("/{id}")).await.json::<Value>();
    assert_eq!(replaced, stored);
}

#[rstest]
#[tokio::test]
async fn replace_ignores_client_id_and_version(entities: TestServer) {
    let created = create(&entities, json!({ "name": "item 1" })).await;
    let id = id_of(&created);

    let replaced = entities
        .put(&format!("/{id}"))
        .json(&json!({ "_id": ItemId::new().to_hex(), "__v": 9, "name": "item 2" }))
        .await
        .json::<Value>();

    assert_eq!(json!({ "_id": id, "name": "item 2", "deleted": false, "__v": 0 }), replaced);
}

#[rstest]
#[tokio::test]
async fn update_keeps_fields_not_sent(entities: TestServer) {
    let created = create(&entities, json!({ "name": "item 1" })).await;
    let id = id_of(&created);

    let res = entities
        .patch(&format!("/{id}"))
        .json(&json!({ "deleted": true }))
        .await;

    res.assert_status_ok();
    assert_eq!(
        json!({ "_id": id, "name": "item 1", "deleted": true, "__v": 0 }),
        res.json::<Value>()
    );
}

#[rstest]
#[tokio::test]
async fn delete_is_204_then_404(entities: TestServer) {
    let created = create(&entities, json!({ "name": "item 1" })).await;
    let path = format!("/{}", id_of(&created));

    let res = entities.delete(&path).await;
    res.assert_status(StatusCode::NO_CONTENT);

    entities.delete(&path).await.assert_status_not_found();
    entities.get(&path).await.assert_status_not_found();
}

#[rstest]
#[tokio::test]
async fn list_returns_every_item_in_order(entities: TestServer) {
    for name in ["item 1", "item 2", "item 3"] {
        create(&entities, json!({ "name": name })).await;
    }

    let res = entities.get("/").await;

    res.assert_status_ok();
    let names: Vec<Value> = res
        .json::<Vec<Value>>()
        .into_iter()
        .map(|item| item["name"].clone())
        .collect();
    assert_eq!(vec![json!("item 1"), json!("item 2"), json!("item 3")], names);
}

#[rstest]
#[tokio::test]
async fn list_of_nothing_is_empty_array(entities: TestServer) {
    let res = entities.get("/").await;

    res.assert_status_ok();
    assert_eq!(json!([]), res.json::<Value>());
}

#[rstest]
#[tokio::test]
async fn list_does_not_hide_soft_deleted_items(entities: TestServer) {
    create(&entities, json!({ "name": "kept" })).await;
    create(&entities, json!({ "name": "flagged", "deleted": true })).await;

    assert_eq!(2, entities.get("/").await.json::<Vec<Value>>().len());

    let flagged = entities
        .get("/")
        .add_query_param("deleted", "true")
        .await
        .json::<Vec<Value>>();
    assert_eq!(1, flagged.len());
    assert_eq!("flagged", flagged[0]["name"]);
}

#[rstest]
#[tokio::test]
async fn list_with_uncastable_filter_is_500(entities: TestServer) {
    let res = entities.get("/").add_query_param("_id", "nope").await;

    res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[case::where_clause("$where", "sleep(5000) || true")]
#[case::comparison("$ne", "x")]
#[tokio::test]
async fn list_with_operator_key_is_500(
    entities: TestServer,
    #[case] key: &str,
    #[case] value: &str,
) {
    create(&entities, json!({ "name": "item 1" })).await;

    let res = entities.get("/").add_query_param(key, value).await;

    res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    res.assert_text(INTERNAL_ERROR_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn list_filters_on_version_as_a_number(entities: TestServer) {
    create(&entities, json!({ "name": "item 1" })).await;
    create(&entities, json!({ "name": "item 2" })).await;

    let current = entities
        .get("/")
        .add_query_param("__v", "0")
        .await
        .json::<Vec<Value>>();
    assert_eq!(2, current.len());

    let newer = entities
        .get("/")
        .add_query_param("__v", "1")
        .await
        .json::<Vec<Value>>();
    assert!(newer.is_empty());
}

#[tokio::test]
async fn field_references_are_returned_unexpanded() {
    let entities = server(MemoryModel::<Entity>::new());
    let fields = server(MemoryModel::<Field>::new());
    let entity = id_of(&create(&entities, json!({ "name": "e1" })).await);

    let created = create(
        &fields,
        json!({ "name": "f1", "entity": entity, "dsEntity": entity }),
    )
    .await;

    let fetched = fields
        .get(&format!("/{}", id_of(&created)))
        .await
        .json::<Value>();
    assert_eq!(json!(entity), fetched["entity"]);
    assert_eq!(json!(entity), fetched["dsEntity"]);
}

#[tokio::test]
async fn storage_failures_are_500_without_details() {
    let server = server(FailingModel::everything());
    let id = ItemId::new().to_hex();

    for res in [
        server.get("/").await,
        server.get(&format!("/{id}")).await,
        server.delete(&format!("/{id}")).await,
    ] {
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        res.assert_text(INTERNAL_ERROR_MESSAGE);
    }
}

#[tokio::test]
async fn write_failures_are_500() {
    let existing = Item::create(Entity {
        name: Some("e1".to_string()),
        deleted: false,
    });
    let path = format!("/{}", existing.id);
    let server = server(FailingModel::writes(MemoryModel::with_items(vec![existing])));

    server
        .post("/")
        .json(&json!({ "name": "e2" }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .put(&path)
        .json(&json!({ "name": "e2" }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .patch(&path)
        .json(&json!({ "name": "e2" }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .delete(&path)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server.get(&path).await.assert_status_ok();
}
