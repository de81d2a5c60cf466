//! Scripted checkout demo.
//!
//! Runs a full checkout against in-process stub collaborators, then a
//! declined-card attempt. Pass `serve` to run the HTTP ingress on
//! `127.0.0.1:3000` instead.

use anyhow::Result;
use async_trait::async_trait;
use greengrocer_core::prelude::*;
use greengrocer_http::{ShopIngress, ShopState, format_usd};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Issues a fresh token for every card it sees.
struct ApprovingTokenizer;

#[async_trait]
impl PaymentTokenizer for ApprovingTokenizer {
    async fn create_token(
        &self,
        cardholder: &str,
        _card: &CardInput,
    ) -> Result<PaymentToken, TokenizationError> {
        println!("\x1b[33m[Tokenizer]\x1b[0m issuing token for {cardholder}");
        Ok(PaymentToken {
            id: format!("tok_{}", uuid::Uuid::new_v4().simple()),
        })
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

/// Prints the order it would have placed.
struct PrintingGateway;

#[async_trait]
impl OrderGateway for PrintingGateway {
    async fn place_order(&self, order: &OrderPayload, source: &str) -> Result<(), SubmissionError> {
        println!(
            "\x1b[36m[Backend]\x1b[0m order with {} item(s), source {source}",
            order.items.len()
        );
        Ok(())
    }
}

fn card() -> CardInput {
    CardInput {
        number: "4242424242424242".into(),
        exp_month: "12".into(),
        exp_year: "2030".into(),
        cvc: "314".into(),
    }
}

fn fill_contact(session: &mut CheckoutSession) {
    session.set_field(ContactField::Name, "Ada Lovelace");
    session.set_field(ContactField::Email, "ada@example.com");
    session.set_address_field(AddressField::Line1, "12 Fruit St");
    session.set_address_field(AddressField::City, "London");
    session.set_address_field(AddressField::State, "LDN");
    session.set_address_field(AddressField::Country, "GB");
    session.set_address_field(AddressField::PostalCode, "N1 9GU");
}

async fn scripted_checkout() -> Result<()> {
    println!("\n=== Greengrocer Checkout Demo ===\n");

    let flow = Arc::new(CheckoutFlow::new(
        Arc::new(ApprovingTokenizer),
        Arc::new(PrintingGateway),
    ));
    let mut session = CheckoutSession::new(Catalog::produce(), flow);

    session.adjust(&"banana".into(), 1)?;
    session.adjust(&"cucumber".into(), 2)?;
    println!("cart total: {}", format_usd(session.total()?));

    println!("submittable before contact details: {}", session.submittable());
    fill_contact(&mut session);
    println!("submittable after contact details:  {}", session.submittable());

    match session.submit("Ada Lovelace", &card()).await? {
        SubmissionState::Succeeded => {
            println!("\x1b[32m[SUCCESS] Thank you for your purchase!\x1b[0m")
        }
        state => println!("\x1b[31m[UNEXPECTED] {state:?}\x1b[0m"),
    }

    // Same script against a tokenizer that declines the card.
    let flow = Arc::new(CheckoutFlow::new(
        Arc::new(DecliningTokenizer),
        Arc::new(PrintingGateway),
    ));
    let mut session = CheckoutSession::new(Catalog::produce(), flow);
    session.adjust(&"banana".into(), 1)?;
    fill_contact(&mut session);

    match session.submit("Ada Lovelace", &card()).await? {
        SubmissionState::Failed { .. } => {
            println!("\x1b[31m[FAILED] purchase could not be completed\x1b[0m")
        }
        state => println!("\x1b[31m[UNEXPECTED] {state:?}\x1b[0m"),
    }

    Ok(())
}

async fn serve() -> Result<()> {
    let flow = Arc::new(CheckoutFlow::new(
        Arc::new(ApprovingTokenizer),
        Arc::new(PrintingGateway),
    ));
    let state = ShopState::new(CheckoutSession::new(Catalog::produce(), flow));

    ShopIngress::new(state)
        .bind("127.0.0.1:3000")
        .run()
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,greengrocer_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if std::env::args().nth(1).as_deref() == Some("serve") {
        serve().await
    } else {
        scripted_checkout().await
    }
}
