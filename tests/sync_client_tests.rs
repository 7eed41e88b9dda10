#![cfg(feature = "sync")]

//! Sync client tests: simulated mode end-to-end, and the live HTTP path
//! against a mock server.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use verifactu::core::{Address, Customer, Invoice, InvoiceLine};
use verifactu::sync::{EngineConfig, EngineMode, VerifactuClient};

fn customer() -> Customer {
    Customer {
        local_id: "cus-1".into(),
        name: "Cliente SL".into(),
        fiscal_id: "B65410011".into(),
        address: Address {
            street: Some("Calle Mayor 1".into()),
            city: "Madrid".into(),
            postal_code: "28001".into(),
            province: Some("Madrid".into()),
            country_code: "ES".into(),
        },
        email: Some("facturas@cliente.es".into()),
        phone: None,
    }
}

fn invoice() -> Invoice {
    Invoice {
        local_id: "inv-1".into(),
        number: "FAC-2026-001".into(),
        issue_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        customer_name: "Cliente SL".into(),
        customer_fiscal_id: "B65410011".into(),
        lines: vec![InvoiceLine {
            description: "Consultoría".into(),
            quantity: dec!(10),
            unit_price: dec!(95),
            iva_rate: dec!(21),
        }],
    }
}

fn live_client(server: &MockServer) -> VerifactuClient {
    let config = EngineConfig::live(server.uri(), "test-key-123").unwrap();
    VerifactuClient::new(config).unwrap()
}

// ---------------------------------------------------------------------------
// Simulated mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn simulated_create_customer() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    let result = client.create_customer(&customer()).await;

    assert!(result.success);
    assert!(result.simulated);
    assert!(result.external_id.as_deref().unwrap().starts_with("SIM-C-"));
    assert_eq!(result.status.as_deref(), Some("registered"));
}

#[tokio::test]
async fn simulated_ids_are_distinct() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    let a = client.create_invoice(&invoice()).await;
    let b = client.create_invoice(&invoice()).await;
    assert_ne!(a.external_id, b.external_id);
}

#[tokio::test]
async fn simulated_create_then_status_needs_no_network() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    let created = client.create_invoice(&invoice()).await;
    assert!(created.success);

    let status = client.invoice_status(created.external_id.as_deref().unwrap()).await;
    assert!(status.success);
    assert!(status.simulated);
    assert_eq!(status.status.as_deref(), Some("accepted"));
}

#[tokio::test]
async fn simulated_status_is_idempotent() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    let first = client.invoice_status("SIM-F-000001").await;
    let second = client.invoice_status("SIM-F-000001").await;
    assert_eq!(first.status, second.status);
}

#[tokio::test]
async fn simulated_validates_like_live() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    let mut bad = customer();
    bad.fiscal_id = "12345678A".into();
    let result = client.create_customer(&bad).await;

    assert!(!result.success);
    assert!(result.simulated);
    assert!(result.error.as_deref().unwrap().contains("fiscal_id"));
    assert!(result.external_id.is_none());
}

#[tokio::test]
async fn simulated_cancel_requires_reason() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    let result = client.cancel_invoice("SIM-F-000001", "  ").await;
    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("reason"));
}

// ---------------------------------------------------------------------------
// Live mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_create_customer_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(header("Authorization", "Bearer test-key-123"))
        .and(body_string_contains("\"taxId\":\"B65410011\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "C-2026-0042",
            "status": "registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let result = client.create_customer(&customer()).await;

    assert!(result.success);
    assert!(!result.simulated);
    assert_eq!(result.external_id.as_deref(), Some("C-2026-0042"));
    assert_eq!(result.status.as_deref(), Some("registered"));
}

#[tokio::test]
async fn live_server_error_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let result = client.create_invoice(&invoice()).await;

    assert!(!result.success);
    assert!(!result.simulated);
    assert!(result.external_id.is_none());
    let error = result.error.unwrap();
    assert!(error.contains("500"), "unexpected error: {error}");
}

#[tokio::test]
async fn live_validation_failure_skips_network() {
    let server = MockServer::start().await;
    // no mocks mounted: any request would 404 and be counted below

    let client = live_client(&server);
    let mut bad = invoice();
    bad.lines.clear();
    let result = client.create_invoice(&bad).await;

    assert!(!result.success);
    assert!(!result.simulated);
    assert!(result.error.as_deref().unwrap().contains("lines"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn live_update_customer_uses_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/customers/C-2026-0042"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "C-2026-0042",
            "status": "registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let result = client.update_customer("C-2026-0042", &customer()).await;
    assert!(result.success);
}

#[tokio::test]
async fn live_delete_customer_tolerates_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/customers/C-2026-0042"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let result = client.delete_customer("C-2026-0042").await;
    assert!(result.success);
    assert!(result.external_id.is_none());
}

#[tokio::test]
async fn live_cancel_posts_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoices/F-2026-0007/cancel"))
        .and(body_string_contains("duplicate issue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "F-2026-0007",
            "status": "cancelled"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let result = client.cancel_invoice("F-2026-0007", "duplicate issue").await;
    assert!(result.success);
    assert_eq!(result.status.as_deref(), Some("cancelled"));
}

#[tokio::test]
async fn live_status_maps_remote_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices/F-2026-0007/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "F-2026-0007",
            "status": "rejected",
            "message": "customer tax id not registered"
        })))
        .mount(&server)
        .await;

    let client = live_client(&server);
    let result = client.invoice_status("F-2026-0007").await;
    assert!(result.success);
    assert_eq!(result.status.as_deref(), Some("rejected"));
    assert_eq!(
        result.message.as_deref(),
        Some("customer tax id not registered")
    );
}

#[tokio::test]
async fn live_timeout_is_reported_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices/F-1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "pending"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = EngineConfig::live(server.uri(), "test-key-123")
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let client = VerifactuClient::new(config).unwrap();

    let result = client.invoice_status("F-1").await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn live_unreachable_host_is_transport_error() {
    // nothing listens on this port
    let config = EngineConfig::live("http://127.0.0.1:1", "test-key-123").unwrap();
    let client = VerifactuClient::new(config).unwrap();

    let result = client.create_customer(&customer()).await;
    assert!(!result.success);
    assert!(!result.simulated);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn mode_is_reported() {
    let client = VerifactuClient::new(EngineConfig::simulated()).unwrap();
    assert_eq!(client.mode(), EngineMode::Simulated);
}
