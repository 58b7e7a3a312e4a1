//! Error types for the shard HTTP server.
//!
//! [`ShardError`] unifies every crate's failure modes into the HTTP error
//! taxonomy from `spec.md` §7 (validation → 400, authorization → 401/403,
//! not found → 404, rule violation → 400 with a structured hint, ledger
//! failure → 500, external outage → 502, internal invariant → 500) via its
//! [`IntoResponse`] implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shard_actions::ActionError;
use shard_catalog::CatalogError;
use shard_chain::ChainError;
use shard_db::DbError;
use shard_ledger::LedgerError;
use shard_types::RejectionReason;
use shard_world::WorldError;

/// Errors that can occur anywhere in the shard HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ShardError {
    /// Malformed or missing request fields, caught before any domain logic
    /// runs.
    #[error("validation error: {0}")]
    Validation(String),

    /// No bearer token, an expired/unknown token, or a wallet mismatch.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A valid, known wallet attempted an action it does not own.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested zone, entity, wallet, or catalog entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A domain rule was violated while executing an action.
    #[error("action rejected: {0}")]
    Action(#[from] ActionError),

    /// A zone runtime operation failed outside the action pipeline.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// A static catalog lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Recording a ledger entry failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The chain driver reported a failure.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// The persistence layer reported a failure.
    #[error("persistence error: {0}")]
    Db(#[from] DbError),

    /// A required external dependency (LLM backend, chain endpoint) did not
    /// respond. Distinct from [`Self::Chain`]/[`Self::Ledger`] because the
    /// client-facing contract is "retry later", not "this action failed".
    #[error("external service unavailable: {0}")]
    ExternalUnavailable(String),

    /// An internal invariant was violated; always a bug, never a client
    /// mistake.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Map a [`RejectionReason`] to its HTTP status under §7's taxonomy.
fn rejection_status(reason: RejectionReason) -> StatusCode {
    match reason {
        RejectionReason::InvalidInput => StatusCode::BAD_REQUEST,
        RejectionReason::Unauthorized => StatusCode::UNAUTHORIZED,
        RejectionReason::NotFound => StatusCode::NOT_FOUND,
        RejectionReason::LedgerFailure => StatusCode::INTERNAL_SERVER_ERROR,
        RejectionReason::ProfessionMissing
        | RejectionReason::ToolTierTooLow
        | RejectionReason::ToolBroken
        | RejectionReason::OutOfRange
        | RejectionReason::NodeDepleted
        | RejectionReason::InsufficientResources
        | RejectionReason::OnCooldown
        | RejectionReason::InsufficientEssence
        | RejectionReason::TechniqueNotLearned
        | RejectionReason::StockOut => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ShardError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            Self::Action(action) => {
                let reason = action.rejection_reason();
                (rejection_status(reason), action.to_string(), Some(reason))
            }
            Self::World(_) | Self::Catalog(_) | Self::Ledger(_) | Self::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), None)
            }
            Self::Chain(_) | Self::ExternalUnavailable(_) => (StatusCode::BAD_GATEWAY, self.to_string(), None),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "reason": reason,
        });

        (status, Json(body)).into_response()
    }
}
