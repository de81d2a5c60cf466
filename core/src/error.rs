//! Error taxonomy for the checkout flow.
//!
//! Tokenization and submission failures are collaborator outcomes: the
//! orchestrator absorbs them into [`SubmissionState::Failed`] rather than
//! propagating them to the caller. [`CheckoutError`] covers the guard
//! violations and programming errors that *are* returned to the caller.
//!
//! [`SubmissionState::Failed`]: crate::checkout::SubmissionState

use crate::catalog::ProductId;
use thiserror::Error;

/// The tokenization collaborator rejected the card or could not be reached.
///
/// Reasons are reported, never interpreted.
#[derive(Debug, Clone, Error)]
pub enum TokenizationError {
    #[error("card could not be tokenized: {0}")]
    Rejected(String),
    #[error("token service unreachable: {0}")]
    Unreachable(String),
}

/// The backend order endpoint failed.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error("could not reach the order endpoint: {0}")]
    Connection(String),
    #[error("order request timed out")]
    Timeout,
    #[error("order endpoint returned HTTP {0}")]
    Status(u16),
}

/// Guard violations and programming errors surfaced to the caller.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// A product id the catalog does not carry. Programming error.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// `submit` was invoked while the completeness predicate is false.
    #[error("checkout is not submittable: cart or contact details incomplete")]
    NotSubmittable,

    /// `submit` was invoked while a previous attempt is still in flight.
    #[error("a submission attempt is already in flight")]
    AlreadyInFlight,
}
