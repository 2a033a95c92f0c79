//! Payment settlement flows.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::TestFixture;

#[tokio::test]
async fn test_successful_payment_activates_ticket() {
    let fixture = TestFixture::new().await;
    let (token, user_id) = fixture.register_and_login("alice").await;
    let ticket_id = fixture.create_ticket(&token, "weekly", "A-B").await;

    let response = fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": ticket_id, "payment_method": "card" }),
            &token,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "completed");
    assert_eq!(response.body["ticket_id"], ticket_id.as_str());
    let payment_id = response.body["payment_id"].as_str().unwrap().to_string();
    let transaction_id = response.body["transaction_id"].as_str().unwrap();
    assert!(transaction_id.starts_with("TXN_"));
    assert_eq!(transaction_id.len(), "TXN_".len() + 12);

    // Ticket is active and carries a QR code derived from ticket and
    // transaction ids.
    let response = fixture
        .get_auth(&format!("/api/v1/tickets/{ticket_id}"), &token)
        .await;
    assert_eq!(response.body["status"], "active");
    let qr_code = response.body["qr_code"].as_str().unwrap();
    assert!(qr_code.contains(&ticket_id));
    assert!(qr_code.contains(transaction_id));

    // Success publishes a payment_success event.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let records = fixture.queue.records();
    assert!(
        records.contains(&format!("payment_success:{user_id}:{payment_id}")),
        "queue records: {records:?}"
    );
}

#[tokio::test]
async fn test_failed_payment_cancels_ticket() {
    let fixture = TestFixture::declining().await;
    let (token, _user_id) = fixture.register_and_login("alice").await;
    let ticket_id = fixture.create_ticket(&token, "weekly", "A-B").await;

    let response = fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": ticket_id, "payment_method": "card" }),
            &token,
        )
        .await;

    // Declined settlement is reported as a non-2xx business outcome with
    // the payment body, not an error envelope.
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "failed");
    assert!(response.body["transaction_id"].as_str().is_some());
    assert!(response.body["ticket_id"].is_null());

    let response = fixture
        .get_auth(&format!("/api/v1/tickets/{ticket_id}"), &token)
        .await;
    assert_eq!(response.body["status"], "cancelled");
    assert!(response.body["qr_code"].is_null());

    // Failures emit no event; only the ticket_created record is present.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let records = fixture.queue.records();
    assert!(
        records.iter().all(|r| !r.starts_with("payment_success:")),
        "queue records: {records:?}"
    );
}

#[tokio::test]
async fn test_payment_missing_fields() {
    let fixture = TestFixture::new().await;
    let (token, _user_id) = fixture.register_and_login("alice").await;

    let response = fixture
        .post_auth("/api/v1/payments", json!({ "ticket_id": "t-1" }), &token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Missing required fields");
}

#[tokio::test]
async fn test_payment_requires_auth() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/payments",
            json!({ "ticket_id": "t-1", "payment_method": "card" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_payment_for_unknown_ticket() {
    let fixture = TestFixture::new().await;
    let (token, _user_id) = fixture.register_and_login("alice").await;

    let response = fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": "no-such-ticket", "payment_method": "card" }),
            &token,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_for_another_users_ticket() {
    let fixture = TestFixture::new().await;
    let (alice_token, _alice) = fixture.register_and_login("alice").await;
    let (bob_token, _bob) = fixture.register_and_login("bob").await;
    let ticket_id = fixture.create_ticket(&alice_token, "single", "A-B").await;

    let response = fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": ticket_id, "payment_method": "card" }),
            &bob_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_payment_ownership() {
    let fixture = TestFixture::new().await;
    let (alice_token, _alice) = fixture.register_and_login("alice").await;
    let (bob_token, _bob) = fixture.register_and_login("bob").await;
    let ticket_id = fixture.create_ticket(&alice_token, "daily", "A-B").await;

    let response = fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": ticket_id, "payment_method": "card" }),
            &alice_token,
        )
        .await;
    let payment_id = response.body["payment_id"].as_str().unwrap().to_string();

    let response = fixture
        .get_auth(&format!("/api/v1/payments/{payment_id}"), &alice_token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["amount"], 150);
    assert_eq!(response.body["payment_method"], "card");
    assert_eq!(response.body["status"], "completed");

    // Non-owner lookups disclose existence with 403, not 404.
    let response = fixture
        .get_auth(&format!("/api/v1/payments/{payment_id}"), &bob_token)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = fixture
        .get_auth("/api/v1/payments/no-such-payment", &alice_token)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_payments_scoped_to_owner() {
    let fixture = TestFixture::new().await;
    let (alice_token, _alice) = fixture.register_and_login("alice").await;
    let (bob_token, _bob) = fixture.register_and_login("bob").await;

    let alice_ticket = fixture.create_ticket(&alice_token, "single", "A-B").await;
    let bob_ticket = fixture.create_ticket(&bob_token, "daily", "C-D").await;

    fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": alice_ticket, "payment_method": "card" }),
            &alice_token,
        )
        .await;
    fixture
        .post_auth(
            "/api/v1/payments",
            json!({ "ticket_id": bob_ticket, "payment_method": "cash" }),
            &bob_token,
        )
        .await;

    let response = fixture.get_auth("/api/v1/payments", &alice_token).await;
    assert_eq!(response.status, StatusCode::OK);
    let payments = response.body.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["ticket_id"], alice_ticket.as_str());
}
