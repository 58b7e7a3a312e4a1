//! Operator REST API handlers for runtime scheduler control.
//!
//! These endpoints are separate from the player-facing action surface in
//! [`crate::handlers`]. They provide one-way command authority from a
//! deployment operator to the tick scheduler via [`shard_core::OperatorState`].
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/operator/pause` | Pause the tick loop |
//! | `POST` | `/operator/resume` | Resume the tick loop |
//! | `POST` | `/operator/speed` | Set tick interval (ms) |
//! | `GET` | `/operator/status` | Current scheduler status |
//! | `POST` | `/operator/stop` | Trigger clean shutdown |

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use shard_core::operator::ShardStatus;

use crate::error::ShardError;
use crate::state::AppState;

/// Request body for `POST /operator/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New tick interval in milliseconds (minimum 100).
    pub tick_interval_ms: u64,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

/// Pause the tick scheduler.
///
/// # Errors
///
/// Never fails.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ShardError> {
    state.operator.pause();
    Ok(Json(OperatorResponse { ok: true, message: "scheduler paused".to_owned() }))
}

/// Resume the tick scheduler after a pause.
///
/// # Errors
///
/// Never fails.
pub async fn resume(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ShardError> {
    state.operator.resume();
    Ok(Json(OperatorResponse { ok: true, message: "scheduler resumed".to_owned() }))
}

/// Change the tick interval at runtime.
///
/// # Errors
///
/// Returns [`ShardError::Validation`] if `tick_interval_ms` is below the
/// scheduler's minimum.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSpeedRequest>,
) -> Result<impl IntoResponse, ShardError> {
    state.operator.set_tick_interval_ms(body.tick_interval_ms).map_or_else(
        || Err(ShardError::Validation("tick_interval_ms must be at least 100".to_owned())),
        |prev| {
            Ok(Json(serde_json::json!({
                "ok": true,
                "message": format!("tick interval changed from {prev}ms to {}ms", body.tick_interval_ms),
                "previous_interval_ms": prev,
                "new_interval_ms": body.tick_interval_ms,
            })))
        },
    )
}

/// Return the current scheduler status: tick, pause state, cadence, and
/// the number of currently instantiated zones.
///
/// # Errors
///
/// Never fails.
pub async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ShardError> {
    let world = state.world.lock().await;
    let tick = world.zone_ids().filter_map(|zone_id| world.zone(zone_id).ok()).map(|zone| zone.tick).max().unwrap_or(0);
    let zones_active = u64::try_from(world.zone_ids().count()).unwrap_or(u64::MAX);

    Ok(Json(ShardStatus {
        tick,
        paused: state.operator.is_paused(),
        stop_requested: state.operator.is_stop_requested(),
        tick_interval_ms: state.operator.tick_interval_ms(),
        elapsed_seconds: state.operator.elapsed_seconds(),
        zones_active,
        started_at: state.operator.started_at().to_rfc3339(),
    }))
}

/// Trigger a clean scheduler shutdown.
///
/// The tick loop finishes its current tick and stops; the HTTP server
/// continues running so clients can still query historical data.
///
/// # Errors
///
/// Never fails.
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ShardError> {
    state.operator.request_stop();
    Ok(Json(OperatorResponse { ok: true, message: "stop requested, scheduler will end after current tick".to_owned() }))
}
