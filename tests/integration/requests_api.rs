use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde_json::{Value, json};

use restaurant_orders::application::ports::event_publisher::ShelfEventPublisher;
use restaurant_orders::domain::events::event::ShelfEvent;

use crate::support::TestApp;

const CHEESEBURGER: i32 = 1;
const COLA: i32 = 4;

async fn create(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let response = app
        .client
        .post(app.url("/request"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn fetch(app: &TestApp, request_id: i64) -> Value {
    app.client
        .get(app.url(&format!("/request/{request_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn request_lifecycle_against_postgres_and_kafka() {
    let app = TestApp::start().await.unwrap();

    // health and seeded menu
    let health: Value = app
        .client
        .get(app.url("/actuator/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"status": "UP"}));

    let menu: Vec<Value> = app
        .client
        .get(app.url("/request/menu-items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(menu.len(), 4);
    assert_eq!(menu[0], json!({"menuId": 1, "name": "Cheeseburger"}));

    // unknown menu items are rejected
    let (status, body) = create(
        &app,
        json!({"customerId": 7, "menuItems": [{"menuId": 999, "quantity": 1}]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["resourceType"], "MENU_ITEM");

    // a request for two burgers and a cola
    let (status, created) = create(
        &app,
        json!({
            "customerId": "1010",
            "menuItems": [
                {"menuId": CHEESEBURGER, "quantity": 2},
                {"menuId": COLA, "quantity": 1}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "NEW");
    assert_eq!(created["totalItemsCount"], 3);
    let request_id = created["requestId"].as_i64().unwrap();
    let app_ref = &app;

    // the cola is prepared on the spot, the burgers wait for the kitchen
    let in_progress = app
        .eventually(Duration::from_secs(30), move || async move {
            let dto = fetch(app_ref, request_id).await;
            (dto["preparedItemsCount"] == 1).then_some(dto)
        })
        .await
        .expect("cola was never packed");
    assert_eq!(in_progress["status"], "IN_PROGRESS");

    // the kitchen puts the burgers on the shelf
    app.ctx
        .shelf_events()
        .publish_shelf_event(&ShelfEvent::item_added(
            CHEESEBURGER,
            2,
            Some(request_id as i32),
        ))
        .await
        .unwrap();

    let ready = app
        .eventually(Duration::from_secs(30), move || async move {
            let dto = fetch(app_ref, request_id).await;
            (dto["status"] == "READY_TO_COLLECT").then_some(dto)
        })
        .await
        .expect("request never became ready");
    assert_eq!(ready["preparedItemsCount"], 3);
    assert!(
        ready["menuItems"]
            .as_array()
            .unwrap()
            .iter()
            .all(|i| i["finished"] == true)
    );

    let stored: String = sqlx::query_scalar("SELECT status FROM request WHERE id = $1")
        .bind(request_id as i32)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored, "READY_TO_COLLECT");
    let shelf: i32 = sqlx::query_scalar("SELECT quantity FROM shelf WHERE menu_item_id = $1")
        .bind(CHEESEBURGER)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(shelf, 0);

    // ready requests are still active
    let active = app
        .client
        .get(app.url("/request"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(active.contains(&format!("id: {request_id}\n")));
}

#[tokio::test]
async fn status_changes_reach_sse_subscribers() {
    let app = TestApp::start().await.unwrap();

    let response = app
        .client
        .get(app.url("/request/notification/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut stream = response.bytes_stream();

    // the status listener starts at the latest offset, so keep creating
    // requests until its partition assignment has settled
    let mut received = String::new();
    for _ in 0..10 {
        let (status, _) = create(
            &app,
            json!({"customerId": 3, "menuItems": [{"menuId": COLA, "quantity": 1}]}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
        while let Ok(Some(chunk)) = tokio::time::timeout_at(deadline, stream.next()).await {
            received.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
            if received.contains("event: request-status-update") {
                break;
            }
        }
        if received.contains("event: request-status-update") {
            break;
        }
    }

    assert!(
        received.contains("event: request-status-update"),
        "no status update in: {received}"
    );
    assert!(received.contains("\"requestId\""));
}
