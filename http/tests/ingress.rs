//! Shop ingress routes, driven directly without sockets.

use async_trait::async_trait;
use bytes::Bytes;
use greengrocer_core::prelude::*;
use greengrocer_http::ingress::{ShopState, handle};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::{Value, json};
use std::sync::Arc;

struct ApprovingTokenizer;

#[async_trait]
impl PaymentTokenizer for ApprovingTokenizer {
    async fn create_token(
        &self,
        _cardholder: &str,
        _card: &CardInput,
    ) -> Result<PaymentToken, TokenizationError> {
        Ok(PaymentToken { id: "tok_1".into() })
    }
}

struct DecliningTokenizer;

#[async_trait]
impl PaymentTokenizer for DecliningTokenizer {
    async fn create_token(
        &self,
        _cardholder: &str,
        _card: &CardInput,
    ) -> Result<PaymentToken, TokenizationError> {
        Err(TokenizationError::Rejected("card declined".into()))
    }
}

struct AcceptingGateway;

#[async_trait]
impl OrderGateway for AcceptingGateway {
    async fn place_order(
        &self,
        _order: &OrderPayload,
        _source: &str,
    ) -> Result<(), SubmissionError> {
        Ok(())
    }
}

fn shop(tokenizer: Arc<dyn PaymentTokenizer>) -> Arc<ShopState> {
    let flow = Arc::new(CheckoutFlow::new(tokenizer, Arc::new(AcceptingGateway)));
    ShopState::new(CheckoutSession::new(Catalog::produce(), flow))
}

fn get(path: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn post(path: &str, body: Value) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .body(Full::new(Bytes::from(serde_json::to_vec(&body).unwrap())))
        .unwrap()
}

async fn body_json(response: Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn fill_contact(state: &ShopState) {
    for (field, value) in [("name", "Ada Lovelace"), ("email", "ada@example.com")] {
        let response = post("/shop/contact", json!({ "field": field, "value": value }));
        assert_eq!(handle(response, state).await.status(), StatusCode::OK);
    }
    for (field, value) in [
        ("line1", "12 Fruit St"),
        ("city", "London"),
        ("state", "LDN"),
        ("country", "GB"),
        ("postal_code", "N1 9GU"),
    ] {
        let response = post("/shop/address", json!({ "field": field, "value": value }));
        assert_eq!(handle(response, state).await.status(), StatusCode::OK);
    }
}

fn card_json() -> Value {
    json!({
        "number": "4242424242424242",
        "exp_month": "12",
        "exp_year": "2030",
        "cvc": "314",
    })
}

#[tokio::test]
async fn view_renders_prices_quantities_and_total() {
    let state = shop(Arc::new(ApprovingTokenizer));

    let response = handle(post("/shop/cart", json!({ "product": "banana", "delta": 1 })), &state).await;
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(handle(get("/shop"), &state).await).await;
    assert_eq!(view["products"][0]["id"], "banana");
    assert_eq!(view["products"][0]["unit_price_display"], "$1.50");
    assert_eq!(view["products"][0]["quantity"], 1);
    assert_eq!(view["products"][1]["id"], "cucumber");
    assert_eq!(view["total_minor"], 150);
    assert_eq!(view["total_display"], "$1.50");
    assert_eq!(view["submittable"], false);
    assert_eq!(view["submission"]["status"], "idle");
}

#[tokio::test]
async fn cart_decrement_clamps_at_zero() {
    let state = shop(Arc::new(ApprovingTokenizer));

    let response = handle(post("/shop/cart", json!({ "product": "banana", "delta": -1 })), &state).await;
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(handle(get("/shop"), &state).await).await;
    assert_eq!(view["products"][0]["quantity"], 0);
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let state = shop(Arc::new(ApprovingTokenizer));
    let response = handle(post("/shop/cart", json!({ "product": "durian", "delta": 1 })), &state).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_empties_the_cart() {
    let state = shop(Arc::new(ApprovingTokenizer));
    handle(post("/shop/cart", json!({ "product": "banana", "delta": 3 })), &state).await;
    handle(post("/shop/cart/reset", json!({})), &state).await;

    let view = body_json(handle(get("/shop"), &state).await).await;
    assert_eq!(view["total_minor"], 0);
}

#[tokio::test]
async fn contact_updates_flip_submittable() {
    let state = shop(Arc::new(ApprovingTokenizer));
    handle(post("/shop/cart", json!({ "product": "cucumber", "delta": 2 })), &state).await;
    fill_contact(&state).await;

    let view = body_json(handle(get("/shop"), &state).await).await;
    assert_eq!(view["submittable"], true);
    assert_eq!(view["contact"]["address"]["postal_code"], "N1 9GU");
}

#[tokio::test]
async fn submit_without_completeness_is_unprocessable() {
    let state = shop(Arc::new(ApprovingTokenizer));
    let response = handle(
        post("/shop/submit", json!({ "cardholder": "Ada", "card": card_json() })),
        &state,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn full_checkout_succeeds() {
    let state = shop(Arc::new(ApprovingTokenizer));
    handle(post("/shop/cart", json!({ "product": "banana", "delta": 1 })), &state).await;
    fill_contact(&state).await;

    let response = handle(
        post("/shop/submit", json!({ "cardholder": "Ada Lovelace", "card": card_json() })),
        &state,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["submission"]["status"], "succeeded");
    assert_eq!(body["message"], "Thank you for your purchase!");

    // The cart is intentionally left as-is after success.
    let view = body_json(handle(get("/shop"), &state).await).await;
    assert_eq!(view["total_minor"], 150);
    assert_eq!(view["submission"]["status"], "succeeded");
}

#[tokio::test]
async fn declined_tokenization_surfaces_a_generic_error() {
    let state = shop(Arc::new(DecliningTokenizer));
    handle(post("/shop/cart", json!({ "product": "banana", "delta": 1 })), &state).await;
    fill_contact(&state).await;

    let response = handle(
        post("/shop/submit", json!({ "cardholder": "Ada Lovelace", "card": card_json() })),
        &state,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "purchase could not be completed");
    assert_eq!(body["submission"]["status"], "failed");
}

#[tokio::test]
async fn unmatched_routes_are_not_found() {
    let state = shop(Arc::new(ApprovingTokenizer));
    let response = handle(get("/inventory"), &state).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let state = shop(Arc::new(ApprovingTokenizer));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/shop/cart")
        .body(Full::new(Bytes::from_static(b"not json")))
        .unwrap();
    assert_eq!(handle(request, &state).await.status(), StatusCode::BAD_REQUEST);
}
