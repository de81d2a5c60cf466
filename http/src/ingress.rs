//! Shop ingress - the presentation surface over HTTP.
//!
//! Wires the checkout session to a Hyper 1.0 native server. Routes:
//!
//! - `GET  /shop`: prices, quantities, running total, submittability
//! - `POST /shop/cart`: `{ "product": "...", "delta": n }`
//! - `POST /shop/cart/reset`
//! - `POST /shop/contact`: `{ "field": "name|email|coupon", "value": "..." }`
//! - `POST /shop/address`: `{ "field": "line1|...|postal_code", "value": "..." }`
//! - `POST /shop/submit`: `{ "cardholder": "...", "card": { ... } }`
//!
//! The handler core is body-generic so tests drive it without sockets.
//! Submit snapshots the session under a read lock and releases it before
//! awaiting the flow, so cart and contact stay editable while an attempt
//! is in flight.

use crate::money::format_usd;
use bytes::Bytes;
use greengrocer_core::prelude::*;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;

/// Shared state behind the ingress: one checkout session per process.
///
/// Input handlers take the write lock briefly; submit never holds it
/// across an await.
pub struct ShopState {
    session: RwLock<CheckoutSession>,
}

impl ShopState {
    pub fn new(session: CheckoutSession) -> Arc<Self> {
        Arc::new(ShopState {
            session: RwLock::new(session),
        })
    }
}

#[derive(Deserialize)]
struct CartAdjust {
    product: String,
    delta: i64,
}

#[derive(Deserialize)]
struct ContactUpdate {
    field: ContactField,
    value: String,
}

#[derive(Deserialize)]
struct AddressUpdate {
    field: AddressField,
    value: String,
}

#[derive(Deserialize)]
struct SubmitRequest {
    cardholder: String,
    card: CardInput,
}

#[derive(Serialize)]
struct ProductView {
    id: ProductId,
    unit_price_minor: u32,
    unit_price_display: String,
    quantity: u64,
}

#[derive(Serialize)]
struct ShopView {
    products: Vec<ProductView>,
    total_minor: u64,
    total_display: String,
    contact: Contact,
    submittable: bool,
    submission: SubmissionState,
}

/// Route one request against the shop state.
pub async fn handle<B>(req: Request<B>, state: &ShopState) -> Response<Full<Bytes>>
where
    B: http_body::Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "ShopRequest",
        shop.http.method = %method,
        shop.http.path = %path,
        shop.http.request_id = %request_id
    );

    async move {
        let body = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, format!("unreadable body: {e}"));
            }
        };

        match (method, path.as_str()) {
            (Method::GET, "/shop") => view(state),
            (Method::POST, "/shop/cart") => adjust_cart(&body, state),
            (Method::POST, "/shop/cart/reset") => reset_cart(state),
            (Method::POST, "/shop/contact") => set_contact(&body, state),
            (Method::POST, "/shop/address") => set_address(&body, state),
            (Method::POST, "/shop/submit") => submit(&body, state).await,
            _ => error_response(StatusCode::NOT_FOUND, "no such route".into()),
        }
    }
    .instrument(span)
    .await
}

fn view(state: &ShopState) -> Response<Full<Bytes>> {
    let session = state.session.read();
    let cart = session.cart();

    let products = session
        .catalog()
        .products()
        .map(|(id, entry)| ProductView {
            id: id.clone(),
            unit_price_minor: entry.unit_price_minor,
            unit_price_display: format_usd(u64::from(entry.unit_price_minor)),
            quantity: cart.quantity(id),
        })
        .collect();

    let total_minor = match session.total() {
        Ok(total) => total,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    json_response(
        StatusCode::OK,
        &ShopView {
            products,
            total_minor,
            total_display: format_usd(total_minor),
            contact: session.contact().clone(),
            submittable: session.submittable(),
            submission: session.submission_state(),
        },
    )
}

fn adjust_cart(body: &Bytes, state: &ShopState) -> Response<Full<Bytes>> {
    let update: CartAdjust = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let mut session = state.session.write();
    match session.adjust(&ProductId::new(update.product), update.delta) {
        Ok(()) => json_response(
            StatusCode::OK,
            &serde_json::json!({ "total_quantity": session.cart().total_quantity() }),
        ),
        Err(e @ CheckoutError::UnknownProduct(_)) => {
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

fn reset_cart(state: &ShopState) -> Response<Full<Bytes>> {
    let mut session = state.session.write();
    session.reset_cart();
    json_response(StatusCode::OK, &serde_json::json!({ "total_quantity": 0 }))
}

fn set_contact(body: &Bytes, state: &ShopState) -> Response<Full<Bytes>> {
    let update: ContactUpdate = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let mut session = state.session.write();
    session.set_field(update.field, update.value);
    json_response(
        StatusCode::OK,
        &serde_json::json!({ "submittable": session.submittable() }),
    )
}

fn set_address(body: &Bytes, state: &ShopState) -> Response<Full<Bytes>> {
    let update: AddressUpdate = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let mut session = state.session.write();
    session.set_address_field(update.field, update.value);
    json_response(
        StatusCode::OK,
        &serde_json::json!({ "submittable": session.submittable() }),
    )
}

async fn submit(body: &Bytes, state: &ShopState) -> Response<Full<Bytes>> {
    let request: SubmitRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    // Snapshot under the read lock, then release it for the duration of
    // the attempt so edits keep landing while the flow is in flight.
    let (flow, cart, contact, catalog) = {
        let session = state.session.read();
        (
            session.flow(),
            session.cart().clone(),
            session.contact().clone(),
            session.catalog().clone(),
        )
    };

    match flow
        .submit(&cart, &contact, &catalog, &request.cardholder, &request.card)
        .await
    {
        Ok(outcome @ SubmissionState::Succeeded) => json_response(
            StatusCode::OK,
            &serde_json::json!({
                "submission": outcome,
                "message": "Thank you for your purchase!",
            }),
        ),
        // Generic message only; the failure detail stays in the logs and
        // the submission state.
        Ok(outcome) => json_response(
            StatusCode::BAD_GATEWAY,
            &serde_json::json!({
                "submission": outcome,
                "error": "purchase could not be completed",
            }),
        ),
        Err(e @ CheckoutError::AlreadyInFlight) => {
            error_response(StatusCode::CONFLICT, e.to_string())
        }
        Err(e @ CheckoutError::NotSubmittable) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(bytes)))
        .unwrap()
}

fn error_response(status: StatusCode, message: String) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// The shop's HTTP server.
///
/// This is a thin wiring layer: all behavior lives in [`handle`] and the
/// core session underneath it.
pub struct ShopIngress {
    addr: Option<String>,
    state: Arc<ShopState>,
}

impl ShopIngress {
    pub fn new(state: Arc<ShopState>) -> Self {
        ShopIngress { addr: None, state }
    }

    /// Set the bind address (defaults to `127.0.0.1:3000`).
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.addr = Some(addr.into());
        self
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.addr.as_deref().unwrap_or("127.0.0.1:3000").parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("shop ingress listening on http://{addr}");

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let state = self.state.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let state = state.clone();
                    async move { Ok::<_, Infallible>(handle(req, &state).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!("error serving connection: {err:?}");
                }
            });
        }
    }
}
