#![cfg(feature = "web-interface")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rosterbot::roster::{
    Employee, PayCategory, RevenueMap, RosterRow, RosterSnapshot, SeedBook, ShiftCell,
    StaffDirectory, Weekday,
};
use rosterbot::service::RosterHandle;
use rosterbot::store::InMemoryRosterStore;
use rosterbot::web::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let staff = StaffDirectory::new(vec![
        Employee::new("Wang", 20.0, PayCategory::Cash),
        Employee::new("Lan", 25.0, PayCategory::Transfer),
    ])
    .unwrap();
    let roster = RosterHandle::new(
        Arc::new(InMemoryRosterStore::new()),
        staff,
        SeedBook::default(),
    );
    router(AppState {
        roster,
        timezone: chrono_tz::Australia::Sydney,
    })
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_staff_listing() {
    let app = app();
    let (status, body) = send(&app, empty_request("GET", "/api/staff")).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Wang", "Lan"]);
    assert_eq!(body[1]["category"], json!("transfer"));
}

#[tokio::test]
async fn test_wage_endpoint() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/wage",
            json!({ "start": "08:00", "end": "14:00", "rate": 20.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hours"], json!(5.5));
    assert_eq!(body["pay"], json!(110.0));
    assert_eq!(body["outcome"]["status"], json!("worked"));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/wage", json!({ "start": "8h", "end": "14:00", "rate": 20.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pay"], json!(0.0));
    assert_eq!(body["outcome"]["status"], json!("malformed"));

    let (_, body) = send(&app, json_request("POST", "/api/wage", json!({ "rate": 20.0 }))).await;
    assert_eq!(body["outcome"]["status"], json!("no_shift"));
}

#[tokio::test]
async fn test_week_lifecycle() {
    let app = app();

    // Never initialized
    let (status, body) = send(&app, empty_request("GET", "/api/weeks/2024-06-12")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());

    let (status, body) = send(&app, empty_request("POST", "/api/weeks/2024-06-12/init")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week"], json!("2024-06-10"));
    assert_eq!(body["snapshot"]["rows"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/api/weeks/2024-06-10/shifts",
            json!({ "employee": "Wang", "day": "monday", "start": "8:00", "end": "14:00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/weeks/2024-06-10/revenue/monday",
            json!({ "amount": 440.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, empty_request("GET", "/api/weeks/2024-06-10/report")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_day_hours"]["monday"], json!(5.5));
    assert_eq!(body["per_day_pay"]["monday"], json!(110.0));
    assert_eq!(body["cash_total"], json!(110.0));
    assert_eq!(body["labor_percent_by_day"]["monday"], json!(25.0));

    let (status, body) = send(&app, empty_request("GET", "/api/weeks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["2024-06-10"]));
}

#[tokio::test]
async fn test_bad_requests() {
    let app = app();

    let (status, _) = send(&app, empty_request("GET", "/api/weeks/not-a-date")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/weeks/2024-06-10/revenue/someday",
            json!({ "amount": 100.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/weeks/2024-06-10/shifts",
            json!({ "employee": "Wang", "day": "monday", "start": "25:00", "end": "14:00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("25:00"));

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/api/weeks/2024-06-10/shifts",
            json!({ "employee": "Ghost", "day": "monday", "start": "08:00", "end": "14:00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_week_is_initialized() {
    let app = app();
    let (status, body) = send(&app, empty_request("GET", "/api/weeks/current")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["rows"].as_array().unwrap().len(), 2);

    let (_, weeks) = send(&app, empty_request("GET", "/api/weeks")).await;
    assert_eq!(weeks.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_put_then_get_week() {
    let app = app();

    let mut wang = RosterRow::new("Wang");
    *wang.cell_mut(Weekday::Monday) = ShiftCell::new("08:00", "14:00");
    *wang.cell_mut(Weekday::Saturday) = ShiftCell::new("22:00", "02:00");
    let snapshot = RosterSnapshot {
        rows: vec![wang, RosterRow::new("Lan")],
    };
    let mut revenue = RevenueMap::new();
    revenue.insert(Weekday::Monday, 501.07723169508523);
    revenue.insert(Weekday::Saturday, 1830.5);

    let body = json!({ "snapshot": snapshot, "revenue": revenue });
    let (status, put_body) =
        send(&app, json_request("PUT", "/api/weeks/2024-06-13", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(put_body["week"], json!("2024-06-10"));

    let (status, body) = send(&app, empty_request("GET", "/api/weeks/2024-06-10")).await;
    assert_eq!(status, StatusCode::OK);
    let stored: RosterSnapshot = serde_json::from_value(body["snapshot"].clone()).unwrap();
    let stored_revenue: RevenueMap = serde_json::from_value(body["revenue"].clone()).unwrap();
    assert_eq!(stored, snapshot);
    assert_eq!(stored_revenue, revenue);
}

#[tokio::test]
async fn test_put_week_rejects_duplicate_rows() {
    let app = app();
    let snapshot = RosterSnapshot {
        rows: vec![RosterRow::new("Wang"), RosterRow::new("Wang")],
    };
    let (status, body) = send(
        &app,
        json_request("PUT", "/api/weeks/2024-06-10", json!({ "snapshot": snapshot })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Wang"));
}

#[tokio::test]
async fn test_wage_rejects_bad_rates() {
    let app = app();

    for rate in [json!(1e308), json!(-1.0), json!(10_000.5)] {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/wage",
                json!({ "start": "08:00", "end": "14:00", "rate": rate }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rate {}", rate);
        assert!(body["error"].as_str().unwrap().contains("hourly rate"));
    }
}

#[tokio::test]
async fn test_unreadable_bodies_are_bad_requests() {
    let app = app();

    // Unknown weekday inside the body
    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/weeks/2024-06-10/shifts",
            json!({ "employee": "Wang", "day": "funday", "start": "08:00", "end": "14:00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    // Not JSON at all
    let request = Request::builder()
        .method("POST")
        .uri("/api/wage")
        .header("content-type", "application/json")
        .body(Body::from("{ rate: "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    // Missing content type
    let request = Request::builder()
        .method("PUT")
        .uri("/api/weeks/2024-06-10/revenue/monday")
        .body(Body::from(r#"{"amount": 10.0}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}
