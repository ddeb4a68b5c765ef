// Router tests for the Schedulink API
//
// Drive the full axum router with `oneshot` against in-memory storage.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use schedulink_control_plane::{
    app::build_app, config::ServerConfig, services::Services, storage::StorageBackend,
};
use schedulink_core::{BroadcastHub, BroadcastKind, Resource, Venue};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    hub: BroadcastHub,
    hall: Venue,
    gym: Venue,
    projector: Resource,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    async fn with_config(config: ServerConfig) -> Self {
        let backend = StorageBackend::in_memory();
        let venues = backend
            .seed_venues(&["Main Hall".to_string(), "Gym".to_string()])
            .await;
        let projector = match &backend {
            StorageBackend::InMemory(memory) => memory.resources.add(Resource::new("Projector")).await,
            StorageBackend::Postgres(_) => unreachable!("in-memory backend"),
        };

        let hub = BroadcastHub::new(16);
        let services = Services::new(backend.stores(Arc::new(hub.clone())));
        let router = build_app(&services, hub.clone(), backend.mode(), &config);

        Self {
            router,
            hub,
            hall: venues[0].clone(),
            gym: venues[1].clone(),
            projector,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_event(&self, name: &str, venue: &Venue, start: &str, end: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/v1/events",
            Some(json!({
                "name": name,
                "start_date": "2024-03-01",
                "venue_ids": [venue.id],
                "event_start_time": start,
                "event_end_time": end,
            })),
        )
        .await
    }

    async fn approval_notification_for(&self, event_id: &Value) -> String {
        let (status, body) = self.send(Method::GET, "/v1/notifications", None).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| &n["event_id"] == event_id)
            .map(|n| n["id"].as_str().unwrap().to_string())
            .unwrap()
    }

    async fn approve(&self, notification_id: &str) -> (StatusCode, Value) {
        self.send(
            Method::PUT,
            &format!("/v1/notifications/{notification_id}/approve"),
            None,
        )
        .await
    }

    async fn decline(&self, notification_id: &str) -> (StatusCode, Value) {
        self.send(
            Method::PUT,
            &format!("/v1/notifications/{notification_id}/decline"),
            None,
        )
        .await
    }
}

#[tokio::test]
async fn test_health_reports_storage_mode() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}

#[tokio::test]
async fn test_submit_event_files_approval_request() {
    let app = TestApp::new().await;

    let (status, event) = app.create_event("Science Fair", &app.hall, "10:00", "11:00").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["status"], "pending");
    assert_eq!(event["event_start_time"], "10:00");

    let (status, body) = app.send(Method::GET, "/v1/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "event_approval");
    assert_eq!(notifications[0]["status"], "pending");
    assert_eq!(notifications[0]["event_id"], event["id"]);

    let (status, fetched) = app
        .send(Method::GET, &format!("/v1/events/{}", event["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Science Fair");
}

#[tokio::test]
async fn test_submission_conflicting_with_approved_event_is_rejected() {
    let app = TestApp::new().await;

    let (_, fair) = app.create_event("Science Fair", &app.hall, "11:00", "12:00").await;
    let notification = app.approval_notification_for(&fair["id"]).await;
    let (status, decision) = app.approve(&notification).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decision["event"]["status"], "approved");
    assert_eq!(decision["notification"]["status"], "approved");

    let (status, body) = app.create_event("Band Practice", &app.hall, "10:00", "11:30").await;
    assert_eq!(status, StatusCode::CONFLICT);
    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["event_name"], "Science Fair");
    assert_eq!(conflicts[0]["start_time"], "11:00");
    assert_eq!(conflicts[0]["venues"][0]["name"], "Main Hall");

    // Touching the boundary is fine, so is another venue
    let (status, _) = app.create_event("Band Practice", &app.hall, "10:00", "11:00").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.create_event("Band Practice", &app.gym, "10:00", "11:30").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_approval_notifies_conflicting_pending_events() {
    let app = TestApp::new().await;
    let mut live = app.hub.subscribe();

    let (_, fair) = app.create_event("Science Fair", &app.hall, "11:00", "12:00").await;
    let (_, practice) = app.create_event("Band Practice", &app.hall, "10:00", "11:30").await;

    let notification = app.approval_notification_for(&fair["id"]).await;
    let (status, decision) = app.approve(&notification).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decision["conflicts_notified"], 1);

    let (status, body) = app
        .send(Method::GET, "/v1/notifications?type=event_conflict", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let conflicts = body["data"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["event_id"], practice["id"]);
    assert_eq!(conflicts[0]["status"], "unread");

    // The pending event is left pending
    let (_, practice) = app
        .send(Method::GET, &format!("/v1/events/{}", practice["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(practice["status"], "pending");

    let approved = live.recv().await.unwrap();
    assert_eq!(approved.kind, BroadcastKind::EventApproved);
    let conflict = live.recv().await.unwrap();
    assert_eq!(conflict.kind, BroadcastKind::EventConflict);

    // Approving the pending one now hits the approved event
    let notification = app.approval_notification_for(&practice["id"]).await;
    let (status, body) = app.approve(&notification).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflicts"][0]["event_name"], "Science Fair");
}

#[tokio::test]
async fn test_decline_twice_succeeds_and_approve_after_decline_fails() {
    let app = TestApp::new().await;

    let (_, fair) = app.create_event("Science Fair", &app.hall, "11:00", "12:00").await;
    let notification = app.approval_notification_for(&fair["id"]).await;

    let (status, first) = app.decline(&notification).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["event"]["status"], "declined");
    let (status, second) = app.decline(&notification).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["notification"]["status"], "declined");

    let (status, _) = app.approve(&notification).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_check_conflicts_is_advisory() {
    let app = TestApp::new().await;

    let (_, fair) = app.create_event("Science Fair", &app.hall, "11:00", "12:00").await;
    let notification = app.approval_notification_for(&fair["id"]).await;
    app.approve(&notification).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/events/check-conflicts",
            Some(json!({
                "start_date": "2024-03-01",
                "venue_ids": [app.hall.id],
                "event_start_time": "11:30",
                "event_end_time": "12:30",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_conflicts"], true);
    assert_eq!(body["conflicts"].as_array().unwrap().len(), 1);

    // Excluding the approved event itself clears it
    let (_, body) = app
        .send(
            Method::POST,
            "/v1/events/check-conflicts",
            Some(json!({
                "start_date": "2024-03-01",
                "venue_ids": [app.hall.id],
                "event_start_time": "11:30",
                "event_end_time": "12:30",
                "exclude_event_id": fair["id"],
            })),
        )
        .await;
    assert_eq!(body["has_conflicts"], false);
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let app = TestApp::new().await;

    let (_, fair) = app.create_event("Science Fair", &app.hall, "11:00", "12:00").await;
    let uri = format!("/v1/events/{}", fair["id"].as_str().unwrap());

    let (status, updated) = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({
                "name": "Science Fair 2024",
                "start_date": "2024-03-02",
                "venue_ids": [app.gym.id],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Science Fair 2024");
    assert_eq!(updated["status"], "pending");

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.send(Method::GET, "/v1/notifications", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_requests() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/events")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // End time before start time
    let (status, body) = app.create_event("Backwards", &app.hall, "12:00", "11:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = app
        .approve("0191a7f0-0000-7000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_get_venues() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/v1/venues", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Gym", "Main Hall"]);

    let (status, venue) = app
        .send(Method::GET, &format!("/v1/venues/{}", app.hall.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["name"], "Main Hall");
}

#[tokio::test]
async fn test_resource_booking_flow() {
    let app = TestApp::new().await;
    let uri = format!("/v1/resources/{}/book", app.projector.id);

    let (status, notification) = app.send(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(notification["type"], "resource_booking");

    let (status, decision) = app
        .approve(notification["id"].as_str().unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decision["resource"]["availability"], false);

    let (status, body) = app.send(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Resource \"Projector\" is not available");
}

#[tokio::test]
async fn test_api_prefix_applies_to_v1_routes_only() {
    let app = TestApp::with_config(ServerConfig {
        api_prefix: "/api".to_string(),
        ..ServerConfig::default()
    })
    .await;

    let (status, _) = app.send(Method::GET, "/api/v1/venues", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::GET, "/v1/venues", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
