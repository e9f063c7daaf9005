//! Integration tests for the checkout flow against a mocked Gemini API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bazar_core::Cart;
use bazar_integration_tests::{
    GENERATE_PATH, RecordingOpener, TEST_API_KEY, gemini_config, product, sample_customer,
    verdict_response,
};
use bazar_storefront::config::BazarConfig;
use bazar_storefront::services::email_gate::{
    MSG_BASIC_PASSED, MSG_DISPOSABLE, MSG_INVALID_FORMAT, MSG_LOW_REPUTATION, ValidationSource,
};
use bazar_storefront::services::{CheckoutError, CheckoutForm, FormStatus, Platform};
use bazar_storefront::state::AppState;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn state_for(server: &MockServer, opener: Arc<RecordingOpener>) -> AppState {
    let config = BazarConfig {
        gemini: Some(gemini_config(&server.uri())),
        ..BazarConfig::default()
    };
    AppState::with_opener(config, opener)
}

fn cart_with_two_x() -> Cart {
    let x = product("x", "Mochila X", 1000);
    let mut cart = Cart::new();
    cart.add(&x);
    cart.add(&x);
    cart
}

async fn mount_verdict(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// =============================================================================
// Email Gate Tests
// =============================================================================

#[tokio::test]
async fn test_request_asks_for_json_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(verdict_response(true, false, 92.0, "ok")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let result = state.checkout().gate().validate("ana@gmail.com").await;

    assert!(result.is_valid);
    assert_eq!(result.source, ValidationSource::Classifier);
    assert_eq!(result.score, Some(92.0));
}

#[tokio::test]
async fn test_disposable_email_blocks_checkout() {
    let server = MockServer::start().await;
    mount_verdict(
        &server,
        verdict_response(true, true, 95.0, "Looks fine"),
        1,
    )
    .await;

    let opener = Arc::new(RecordingOpener::default());
    let state = state_for(&server, opener.clone());
    let mut customer = sample_customer();
    customer.email = "bot@mailinator.com".to_string();

    let err = state
        .checkout()
        .submit(&cart_with_two_x(), &customer, Platform::Mobile)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmailRejected(ref msg) if msg == MSG_DISPOSABLE));
    assert!(opener.opened().is_empty());
}

#[tokio::test]
async fn test_disposable_with_out_of_range_score_is_still_rejected() {
    let server = MockServer::start().await;
    mount_verdict(&server, verdict_response(true, true, 101.0, "ok"), 1).await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let result = state.checkout().gate().validate("bot@mailinator.com").await;

    assert!(!result.is_valid);
    assert_eq!(result.message, MSG_DISPOSABLE);
    assert_eq!(result.source, ValidationSource::Classifier);
}

#[tokio::test]
async fn test_low_reputation_blocks_checkout() {
    let server = MockServer::start().await;
    mount_verdict(&server, verdict_response(true, false, 12.0, "ok"), 1).await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let err = state
        .checkout()
        .prepare(&cart_with_two_x(), &sample_customer(), Platform::Desktop)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), MSG_LOW_REPUTATION);
}

#[tokio::test]
async fn test_classifier_failure_falls_back_to_syntax_check() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "Internal error", "status": "INTERNAL" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let gate = state.checkout().gate();

    let bad = gate.validate("bad-email").await;
    assert!(!bad.is_valid);
    assert_eq!(bad.message, MSG_INVALID_FORMAT);
    assert_eq!(bad.source, ValidationSource::Fallback);

    let good = gate.validate("user@example.com").await;
    assert!(good.is_valid);
    assert_eq!(good.message, MSG_BASIC_PASSED);
}

#[tokio::test]
async fn test_unparseable_model_answer_falls_back() {
    let server = MockServer::start().await;
    let body = json!({
        "candidates": [{ "content": { "parts": [{ "text": "I think it is fine" }] } }]
    });
    mount_verdict(&server, body, 1).await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let result = state.checkout().gate().validate("user@example.com").await;

    assert!(result.is_valid);
    assert_eq!(result.source, ValidationSource::Fallback);
}

// =============================================================================
// Checkout Tests
// =============================================================================

#[tokio::test]
async fn test_end_to_end_order_message() {
    let server = MockServer::start().await;
    mount_verdict(&server, verdict_response(true, false, 90.0, "ok"), 1).await;

    let opener = Arc::new(RecordingOpener::default());
    let state = state_for(&server, opener.clone());
    let mut form = CheckoutForm::with_customer(sample_customer());

    let order = form
        .submit(state.checkout(), &cart_with_two_x(), Platform::Mobile)
        .await
        .unwrap();

    assert_eq!(opener.opened(), vec![order.link.clone()]);
    assert_eq!(form.status(), FormStatus::Sent);

    let encoded = order
        .link
        .strip_prefix("https://wa.me/5491100000000?text=")
        .unwrap();
    let message = urlencoding::decode(encoded).unwrap();
    assert_eq!(message, order.draft.message);

    assert!(message.contains("Nombre: Ana Gómez"));
    assert!(message.contains("Teléfono: +541123456789"));
    assert!(message.contains("- Mochila X (Mochilas) x2 – $2,000"));
    assert!(message.contains("💰 *Total: $2,000*"));
    assert!(message.ends_with("📝 *Comentarios:*\nSin comentarios."));
}

#[tokio::test]
async fn test_desktop_user_agent_gets_web_link() {
    let server = MockServer::start().await;
    mount_verdict(&server, verdict_response(true, false, 90.0, "ok"), 1).await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let platform = Platform::from_user_agent(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15",
    );
    let order = state
        .checkout()
        .submit(&cart_with_two_x(), &sample_customer(), platform)
        .await
        .unwrap();

    assert!(
        order
            .link
            .starts_with("https://web.whatsapp.com/send?phone=5491100000000&text=")
    );
}

#[tokio::test]
async fn test_missing_first_name_issues_no_request() {
    let server = MockServer::start().await;
    mount_verdict(&server, verdict_response(true, false, 90.0, "ok"), 0).await;

    let opener = Arc::new(RecordingOpener::default());
    let state = state_for(&server, opener.clone());
    let mut customer = sample_customer();
    customer.first_name = String::new();
    let mut form = CheckoutForm::with_customer(customer);

    let err = form
        .submit(state.checkout(), &cart_with_two_x(), Platform::Mobile)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::MissingFields));
    assert_eq!(
        form.error(),
        Some("Por favor completa todos los campos obligatorios.")
    );
    assert_eq!(form.customer().last_name, "Gómez");
    assert!(opener.opened().is_empty());
}

#[tokio::test]
async fn test_empty_cart_issues_no_request() {
    let server = MockServer::start().await;
    mount_verdict(&server, verdict_response(true, false, 90.0, "ok"), 0).await;

    let state = state_for(&server, Arc::new(RecordingOpener::default()));
    let err = state
        .checkout()
        .submit(&Cart::new(), &sample_customer(), Platform::Mobile)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
}
