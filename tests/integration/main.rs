//! End-to-end tests: a real server on an ephemeral port, driven over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use cherry_crud::api::{create_router, serve, AppState, DeletedItem, Envelope, ErrorEnvelope};
use cherry_crud::items::{InMemoryItemStore, Item};

/// Running server plus the handle that stops it.
struct TestServer {
    base: String,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<cherry_crud::Result<()>>,
}

impl TestServer {
    async fn start(store: InMemoryItemStore) -> Self {
        let state = AppState::new(Arc::new(store));
        let router = create_router(state.clone(), false);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel();
        state.set_ready(true);
        let task = tokio::spawn(serve(listener, router, async {
            rx.await.ok();
        }));

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            task,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.task.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn item_lifecycle_over_http() {
    let server = TestServer::start(InMemoryItemStore::seeded()).await;
    let client = &server.client;

    // Create
    let response = client
        .post(server.url("/items"))
        .json(&json!({ "title": " Water plants ", "description": "Balcony", "category": "Personal" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Envelope<Item> = response.json().await.unwrap();
    assert!(created.success);
    let item = created.data;
    assert_eq!(item.title, "Water plants");
    assert_eq!(item.priority, "medium");
    assert_eq!(item.created_at, item.updated_at);

    // Read
    let fetched: Envelope<Item> = client
        .get(server.url(&format!("/items/{}", item.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.data, item);

    // Update
    let response = client
        .put(server.url(&format!("/items/{}", item.id)))
        .json(&json!({ "completed": true, "priority": "high" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Envelope<Item> = response.json().await.unwrap();
    assert_eq!(updated.data.id, item.id);
    assert!(updated.data.completed);
    assert_eq!(updated.data.priority, "high");
    assert_eq!(updated.data.created_at, item.created_at);
    assert!(updated.data.updated_at > item.updated_at);

    // List
    let listed: Envelope<Vec<Item>> = client
        .get(server.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = listed.data.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", item.id.as_str()]);

    // Delete
    let deleted: Envelope<DeletedItem> = client
        .delete(server.url(&format!("/items/{}", item.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        deleted.data,
        DeletedItem {
            id: item.id.clone(),
            deleted: true
        }
    );

    let response = client
        .get(server.url(&format!("/items/{}", item.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorEnvelope = response.json().await.unwrap();
    assert!(!error.success);
    assert_eq!(error.error, "Item not found");

    let listed: Envelope<Vec<Item>> = client
        .get(server.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.data.iter().all(|i| i.id != item.id));

    server.stop().await;
}

#[tokio::test]
async fn validation_and_missing_ids_use_error_envelope() {
    let server = TestServer::start(InMemoryItemStore::new()).await;
    let client = &server.client;

    let response = client
        .post(server.url("/items"))
        .json(&json!({ "title": "only a title" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "success": false, "error": "Title and description are required" })
    );

    for response in [
        client.delete(server.url("/items/ghost")).send().await.unwrap(),
        client
            .put(server.url("/items/ghost"))
            .json(&json!({ "completed": true }))
            .send()
            .await
            .unwrap(),
    ] {
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: ErrorEnvelope = response.json().await.unwrap();
        assert!(!body.success);
    }

    server.stop().await;
}

#[tokio::test]
async fn empty_store_lists_nothing_and_reports_stats() {
    let server = TestServer::start(InMemoryItemStore::new()).await;

    let listed: Envelope<Vec<Item>> = server
        .client
        .get(server.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.success);
    assert!(listed.data.is_empty());

    let status: Value = server
        .client
        .get(server.url("/api/v1/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["stats"]["total"], 0);
    assert_eq!(status["status"], "running");

    server.stop().await;
}

#[tokio::test]
async fn ui_page_is_served() {
    let server = TestServer::start(InMemoryItemStore::seeded()).await;

    let response = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Cherry CRUD API"));
    assert!(page.contains(r#""tone":"blue""#));

    server.stop().await;
}
