//! Read-only zone state: `GET /state`, `GET /portals`, and
//! `POST /transition/auto` (`spec.md` §4.E supplemental, area-of-interest).

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use shard_types::{Entity, EntityId, ZoneId};

use crate::error::ShardError;
use crate::state::AppState;

/// Query params for `GET /state`.
#[derive(Debug, serde::Deserialize)]
pub struct StateQuery {
    /// The zone to query.
    pub zone_id: ZoneId,
    /// The subscriber to compute area-of-interest visibility for. If the
    /// subscriber isn't registered yet, it is subscribed on first query.
    pub entity_id: EntityId,
}

/// Response body for `GET /state`.
#[derive(Debug, serde::Serialize)]
pub struct StateResponse {
    /// The zone's current tick.
    pub tick: u64,
    /// Every entity currently visible to `entity_id`, including itself.
    pub visible: Vec<Entity>,
}

/// `GET /state`
///
/// Returns every entity visible to `entity_id` within `zone_id`, per the
/// area-of-interest radius recomputed each tick.
///
/// # Errors
///
/// Returns [`ShardError::NotFound`] if the zone has not been instantiated.
pub async fn state(State(state): State<Arc<AppState>>, Query(query): Query<StateQuery>) -> Result<Json<StateResponse>, ShardError> {
    let mut world = state.world.lock().await;
    let zone = world.zone(query.zone_id)?;
    let tick = zone.tick;
    let _ = zone.entity(query.entity_id)?;

    let aoi = world.aoi_mut(query.zone_id)?;
    aoi.subscribe(query.entity_id);
    let visible_ids = aoi.visible_to(query.entity_id);

    let zone = world.zone(query.zone_id)?;
    let visible = visible_ids.iter().filter_map(|id| zone.entity(*id).ok().cloned()).collect();

    Ok(Json(StateResponse { tick, visible }))
}

/// Query params for `GET /portals`.
#[derive(Debug, serde::Deserialize)]
pub struct PortalsQuery {
    /// The zone to list portals for.
    pub zone_id: ZoneId,
}

/// A portal, as seen by the client.
#[derive(Debug, serde::Serialize)]
pub struct PortalView {
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Destination zone.
    pub target_zone: ZoneId,
}

/// `GET /portals`
///
/// Lists every portal in `zone_id`'s catalog layout.
///
/// # Errors
///
/// Returns [`ShardError::NotFound`] if `zone_id` has no catalog layout.
pub async fn portals(State(state): State<Arc<AppState>>, Query(query): Query<PortalsQuery>) -> Result<Json<Vec<PortalView>>, ShardError> {
    let layout = state
        .catalog
        .zone_layout(query.zone_id)
        .map_err(|_| ShardError::NotFound(format!("no zone layout for {}", query.zone_id)))?;
    Ok(Json(
        layout.portals.iter().map(|portal| PortalView { x: portal.x, y: portal.y, target_zone: portal.target_zone }).collect(),
    ))
}

/// Maximum distance an entity may stand from a portal to use it.
const PORTAL_USE_RADIUS: f64 = 5.0;

/// Request body for `POST /transition/auto`.
#[derive(Debug, serde::Deserialize)]
pub struct TransitionRequest {
    /// The zone the entity currently occupies.
    pub zone_id: ZoneId,
    /// The entity requesting the transition.
    pub entity_id: EntityId,
}

/// Response body for `POST /transition/auto`.
#[derive(Debug, serde::Serialize)]
pub struct TransitionResponse {
    /// The zone the entity now occupies.
    pub zone_id: ZoneId,
    /// Its position after arrival.
    pub x: f64,
    /// Its position after arrival.
    pub y: f64,
}

/// `POST /transition/auto`
///
/// Moves `entity_id` through whichever portal in `zone_id` it is
/// currently standing within [`PORTAL_USE_RADIUS`] of.
///
/// # Errors
///
/// Returns [`ShardError::Validation`] if the entity is not near any
/// portal, or [`ShardError::NotFound`] if the zone/entity does not exist.
pub async fn transition_auto(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, ShardError> {
    let layout = state
        .catalog
        .zone_layout(body.zone_id)
        .map_err(|_| ShardError::NotFound(format!("no zone layout for {}", body.zone_id)))?;

    let mut world = state.world.lock().await;
    let source = world.zone_mut(body.zone_id)?;
    let mut entity = source.entity(body.entity_id)?.clone();

    let portal = layout
        .portals
        .iter()
        .find(|portal| (portal.x - entity.x).hypot(portal.y - entity.y) <= PORTAL_USE_RADIUS)
        .ok_or_else(|| ShardError::Validation("not standing near a portal".to_owned()))?;

    source.remove_entity(body.entity_id);
    entity.x = portal.target_x;
    entity.y = portal.target_y;
    let target_zone = portal.target_zone;
    let (x, y) = (entity.x, entity.y);

    let target = world.get_or_create_zone(&state.catalog, target_zone)?;
    target.insert_entity(entity);

    Ok(Json(TransitionResponse { zone_id: target_zone, x, y }))
}
