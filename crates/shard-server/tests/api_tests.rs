//! Integration tests for the shard server's HTTP surface.
//!
//! Tests drive Axum's `Router` directly via `tower::ServiceExt::oneshot`
//! without binding a TCP socket, exercising routing, auth, and handler
//! logic together.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use shard_catalog::{Catalog, MobSpawn, ZoneLayout};
use shard_chain::{ChainDriver, StubChainDriver};
use shard_core::OperatorState;
use shard_db::PersistenceStore;
use shard_server::auth::AuthState;
use shard_server::router::build_router;
use shard_server::state::AppState;
use shard_techniques::TechniqueCatalog;
use shard_types::ZoneBounds;
use shard_world::runtime::ZoneRuntime;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Builds a catalog with a single zone containing one mob, backed by a
/// throwaway temp directory of YAML fixtures -- the same pattern
/// `shard-world`'s own runtime tests use to construct a loadable catalog.
fn catalog_with_zone() -> (Catalog, shard_types::ZoneId) {
    let zone_id = shard_types::ZoneId::new();
    let layout = ZoneLayout {
        id: zone_id,
        name: String::from("wild-meadow"),
        bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 100.0 },
        mob_spawns: vec![MobSpawn {
            mob_name: String::from("Goblin"),
            x: 10.0,
            y: 10.0,
            level: 1,
            max_hp: 20,
            xp_reward: 5,
            loot_table: String::from("goblin"),
            skinnable: false,
        }],
        resource_nodes: Vec::new(),
        portals: Vec::new(),
    };
    let dir = std::env::temp_dir().join(format!("shard-server-test-{zone_id}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    std::fs::write(dir.join("items.yaml"), "[]").expect("write items");
    std::fs::write(dir.join("recipes.yaml"), "[]").expect("write recipes");
    std::fs::write(dir.join("techniques.yaml"), "[]").expect("write techniques");
    std::fs::write(dir.join("zones.yaml"), serde_yml::to_string(&vec![layout]).expect("serialize")).expect("write zones");
    std::fs::write(dir.join("loot_tables.yaml"), "{}").expect("write loot tables");
    let catalog = Catalog::load(&dir).expect("catalog loads");
    (catalog, zone_id)
}

async fn make_test_state() -> (Arc<AppState>, shard_types::ZoneId) {
    let (catalog, zone_id) = catalog_with_zone();
    let state = Arc::new(AppState::new(
        Arc::new(Mutex::new(ZoneRuntime::new())),
        Arc::new(catalog),
        Arc::new(Mutex::new(TechniqueCatalog::new())),
        Arc::new(ChainDriver::Stub(StubChainDriver::new())),
        Arc::new(PersistenceStore::in_memory()),
        Arc::new(OperatorState::new(100)),
        Arc::new(AuthState::new(Arc::new(shard_server::auth::StubSignatureVerifier))),
    ));
    (state, zone_id)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Runs the challenge/verify handshake for `wallet` and returns the bearer
/// token to attach as `Authorization: Bearer <token>` on subsequent
/// requests.
async fn authenticate(router: axum::Router, wallet: &str) -> (axum::Router, String) {
    let response = router
        .clone()
        .oneshot(Request::get(format!("/auth/challenge?wallet={wallet}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let challenge = body_to_json(response.into_body()).await;
    let timestamp = challenge["timestamp"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(
            Request::post("/auth/verify")
                .header("content-type", "application/json")
                .body(Body::from(json!({"wallet": wallet, "signature": "0xsig", "timestamp": timestamp}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let verified = body_to_json(response.into_body()).await;
    (router, verified["token"].as_str().unwrap().to_owned())
}

#[tokio::test]
async fn test_index_returns_html() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/api/nonexistent").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_challenge_then_verify_issues_token() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let (_, token) = authenticate(router, "0xabc").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_auth_verify_without_challenge_is_unauthorized() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::post("/auth/verify")
                .header("content-type", "application/json")
                .body(Body::from(json!({"wallet": "0xabc", "signature": "0xsig", "timestamp": 0}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_spawn_requires_auth() {
    let (state, zone_id) = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::post("/spawn")
                .header("content-type", "application/json")
                .body(Body::from(json!({"wallet_address": "0xabc", "zone_id": zone_id}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_spawn_creates_new_character() {
    let (state, zone_id) = make_test_state().await;
    let router = build_router(state);
    let (router, token) = authenticate(router, "0xabc").await;

    let response = router
        .oneshot(
            Request::post("/spawn")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(
                    json!({
                        "wallet_address": "0xabc",
                        "zone_id": zone_id,
                        "name": "Aveline",
                        "race_id": "Human",
                        "class_id": "Warrior",
                        "gender": "Female",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["new_character"], true);
    assert_eq!(json["zone_id"], serde_json::to_value(zone_id).unwrap());
}

#[tokio::test]
async fn test_spawn_without_required_fields_is_validation_error() {
    let (state, zone_id) = make_test_state().await;
    let router = build_router(state);
    let (router, token) = authenticate(router, "0xabc").await;

    let response = router
        .oneshot(
            Request::post("/spawn")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(json!({"wallet_address": "0xabc", "zone_id": zone_id}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_command_requires_auth() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::post("/command")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_items_catalog_is_public_and_empty_for_fresh_catalog() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/items/catalog").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_techniques_catalog_is_public_and_empty_for_fresh_catalog() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/techniques/catalog").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_leaderboard_empty_with_no_players() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/leaderboard").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_portals_for_unknown_zone_returns_not_found() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get(format!("/portals?zone_id={}", shard_types::ZoneId::new()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_portals_for_known_zone_returns_empty_list() {
    let (state, zone_id) = make_test_state().await;
    let router = build_router(state);

    let response =
        router.oneshot(Request::get(format!("/portals?zone_id={zone_id}")).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_auctionhouse_defaults_to_empty_listings() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/auctionhouse").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["listings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_guild_not_found_when_never_cached() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/guild/some-guild").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_party_status_not_found_for_unknown_party() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get(format!("/party/status?party_id={}", shard_types::PartyId::new()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_operator_status_is_public() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);

    let response = router.oneshot(Request::get("/operator/status").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_agent_status_without_agent_manager_is_bad_gateway() {
    let (state, _) = make_test_state().await;
    let router = build_router(state);
    let (router, token) = authenticate(router, "0xabc").await;

    let response = router
        .oneshot(
            Request::get("/agent/status")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_logout_of_unowned_entity_is_forbidden() {
    let (state, zone_id) = make_test_state().await;
    let router = build_router(state);
    let (router, token) = authenticate(router, "0xowner").await;

    let spawn_response = router
        .clone()
        .oneshot(
            Request::post("/spawn")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(
                    json!({
                        "wallet_address": "0xowner",
                        "zone_id": zone_id,
                        "name": "Borin",
                        "race_id": "Dwarf",
                        "class_id": "Cleric",
                        "gender": "Male",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(spawn_response.status(), StatusCode::OK);
    let spawned = body_to_json(spawn_response.into_body()).await;
    let entity_id = spawned["entity_id"].clone();

    let (router, other_token) = authenticate(router, "0xintruder").await;
    let logout_response = router
        .oneshot(
            Request::post("/logout")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {other_token}"))
                .body(Body::from(json!({"zone_id": zone_id, "entity_id": entity_id}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(logout_response.status(), StatusCode::FORBIDDEN);
}
