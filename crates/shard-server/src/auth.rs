//! Wallet-signature authentication (`spec.md` §6).
//!
//! A client proves control of a wallet by signing a server-issued
//! challenge message; the server exchanges a valid signature for a bearer
//! token. Mutating endpoints require that token and compare its wallet
//! against both the request body's `walletAddress` and the controlled
//! entity's owner.
//!
//! No signature-recovery crate (e.g. for EVM `secp256k1`/Keccak256
//! recovery) appears anywhere in this workspace's dependency stack, and
//! none of the reference material gives a concrete pattern to ground one
//! on. Rather than hand-roll unverified cryptography, verification is a
//! pluggable [`SignatureVerifier`], mirroring the [`ChainDriver`]
//! live/stub split: a production deployment supplies a real verifier,
//! [`StubSignatureVerifier`] accepts any well-formed signature for tests
//! and local runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::ShardError;
use crate::state::AppState;

/// How long a signed challenge remains acceptable to `/auth/verify`.
const CHALLENGE_FRESHNESS: ChronoDuration = ChronoDuration::minutes(5);

/// How long an issued bearer token remains valid.
const TOKEN_VALIDITY: ChronoDuration = ChronoDuration::hours(24);

/// Verifies that a signature over a message was produced by a wallet's key.
pub trait SignatureVerifier: Send + Sync {
    /// Return `true` if `signature` is a valid signature by `wallet` over
    /// `message`.
    fn verify(&self, wallet: &str, message: &str, signature: &str) -> bool;
}

/// Accepts any non-empty signature. For tests and deployments without a
/// live chain endpoint to verify against.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubSignatureVerifier;

impl SignatureVerifier for StubSignatureVerifier {
    fn verify(&self, _wallet: &str, _message: &str, signature: &str) -> bool {
        !signature.is_empty()
    }
}

struct ChallengeRecord {
    message: String,
    issued_at: DateTime<Utc>,
}

struct TokenRecord {
    wallet: String,
    expires_at: DateTime<Utc>,
}

/// Outstanding challenges and issued tokens for the auth flow.
pub struct AuthState {
    verifier: Arc<dyn SignatureVerifier>,
    challenges: Mutex<BTreeMap<String, ChallengeRecord>>,
    tokens: Mutex<BTreeMap<String, TokenRecord>>,
}

impl AuthState {
    /// Construct auth state around the given verifier.
    #[must_use]
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { verifier, challenges: Mutex::new(BTreeMap::new()), tokens: Mutex::new(BTreeMap::new()) }
    }

    /// Issue a fresh challenge message for `wallet`, replacing any prior
    /// outstanding challenge for the same wallet.
    pub async fn issue_challenge(&self, wallet: &str) -> (String, DateTime<Utc>) {
        let issued_at = Utc::now();
        let message = format!("Sign in to the shard server as {wallet} at {}", issued_at.timestamp());
        self.challenges.lock().await.insert(wallet.to_owned(), ChallengeRecord { message: message.clone(), issued_at });
        (message, issued_at)
    }

    /// Verify a signed challenge and, on success, issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ShardError::Unauthorized`] if no challenge is outstanding
    /// for `wallet`, the challenge has expired, or the signature does not
    /// verify.
    pub async fn verify(&self, wallet: &str, signature: &str, timestamp: i64) -> Result<String, ShardError> {
        let challenge = {
            let mut challenges = self.challenges.lock().await;
            challenges.remove(wallet).ok_or_else(|| ShardError::Unauthorized("no outstanding challenge".to_owned()))?
        };

        let submitted = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| ShardError::Validation("invalid timestamp".to_owned()))?;
        if (Utc::now() - submitted).abs() > CHALLENGE_FRESHNESS {
            return Err(ShardError::Unauthorized("challenge timestamp outside freshness window".to_owned()));
        }
        if (Utc::now() - challenge.issued_at).abs() > CHALLENGE_FRESHNESS {
            return Err(ShardError::Unauthorized("challenge expired".to_owned()));
        }
        if !self.verifier.verify(wallet, &challenge.message, signature) {
            return Err(ShardError::Unauthorized("signature does not verify".to_owned()));
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + TOKEN_VALIDITY;
        self.tokens.lock().await.insert(token.clone(), TokenRecord { wallet: wallet.to_owned(), expires_at });
        Ok(token)
    }

    /// Resolve a bearer token to its wallet, if it is present and unexpired.
    pub async fn wallet_for_token(&self, token: &str) -> Option<String> {
        let tokens = self.tokens.lock().await;
        let record = tokens.get(token)?;
        (record.expires_at > Utc::now()).then(|| record.wallet.clone())
    }
}

/// The authenticated wallet address, attached to request extensions by
/// [`require_auth`] for downstream handlers to compare against a request
/// body's `walletAddress` and the controlled entity's owner.
#[derive(Debug, Clone)]
pub struct AuthenticatedWallet(pub String);

/// Bearer-token auth middleware: resolves the `Authorization` header to a
/// wallet and attaches it to the request's extensions.
///
/// # Errors
///
/// Returns [`ShardError::Unauthorized`] if the header is missing,
/// malformed, or names an unknown/expired token.
pub async fn require_auth(State(state): State<Arc<AppState>>, mut request: Request, next: Next) -> Result<Response, ShardError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ShardError::Unauthorized("missing Authorization header".to_owned()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ShardError::Unauthorized("Authorization header must be a bearer token".to_owned()))?;

    let wallet = state
        .auth
        .wallet_for_token(token)
        .await
        .ok_or_else(|| ShardError::Unauthorized("unknown or expired token".to_owned()))?;

    request.extensions_mut().insert(AuthenticatedWallet(wallet));
    Ok(next.run(request).await)
}

/// Query parameters for `GET /auth/challenge`.
#[derive(Debug, Deserialize)]
pub struct ChallengeQuery {
    /// The wallet address requesting a challenge.
    pub wallet: String,
}

/// Response body for `GET /auth/challenge`.
#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    /// The message the client must sign.
    pub message: String,
    /// The issue time, in unix seconds, to echo back to `/auth/verify`.
    pub timestamp: i64,
}

/// `GET /auth/challenge?wallet=...`
///
/// # Errors
///
/// Never fails; always issues a fresh challenge.
pub async fn challenge(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChallengeQuery>,
) -> Result<Json<ChallengeResponse>, ShardError> {
    let (message, issued_at) = state.auth.issue_challenge(&query.wallet).await;
    Ok(Json(ChallengeResponse { message, timestamp: issued_at.timestamp() }))
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// The wallet that signed the challenge.
    pub wallet: String,
    /// The signature over the challenge message.
    pub signature: String,
    /// The challenge's issue timestamp, in unix seconds.
    pub timestamp: i64,
}

/// Response body for `POST /auth/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    /// The bearer token to use for subsequent authenticated requests.
    pub token: String,
}

/// `POST /auth/verify`
///
/// # Errors
///
/// Returns [`ShardError::Unauthorized`] if the challenge is missing,
/// stale, or the signature does not verify, or
/// [`ShardError::Validation`] for a malformed timestamp.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ShardError> {
    let token = state.auth.verify(&body.wallet, &body.signature, body.timestamp).await?;
    Ok(Json(VerifyResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn challenge_then_verify_issues_token() {
        let auth = AuthState::new(Arc::new(StubSignatureVerifier));
        let (_, issued_at) = auth.issue_challenge("0xabc").await;
        let token = auth.verify("0xabc", "0xsig", issued_at.timestamp()).await.expect("verifies");
        assert_eq!(auth.wallet_for_token(&token).await, Some("0xabc".to_owned()));
    }

    #[tokio::test]
    async fn verify_without_challenge_is_unauthorized() {
        let auth = AuthState::new(Arc::new(StubSignatureVerifier));
        let result = auth.verify("0xabc", "0xsig", Utc::now().timestamp()).await;
        assert!(matches!(result, Err(ShardError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn stale_timestamp_is_rejected() {
        let auth = AuthState::new(Arc::new(StubSignatureVerifier));
        auth.issue_challenge("0xabc").await;
        let stale = (Utc::now() - ChronoDuration::minutes(10)).timestamp();
        let result = auth.verify("0xabc", "0xsig", stale).await;
        assert!(matches!(result, Err(ShardError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let auth = AuthState::new(Arc::new(StubSignatureVerifier));
        assert_eq!(auth.wallet_for_token("nope").await, None);
    }
}
