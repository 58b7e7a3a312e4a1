//! Mob AI behaviors run during step 4 of the zone tick: aggro onto the
//! nearest living player within range, attack if already adjacent, or
//! wander otherwise (§4.E).

use rand::Rng;
use shard_types::{EntityId, EntityKind};

use crate::events::WorldEvent;
use crate::zone::Zone;

/// Mobs aggro onto a player within this radius.
const AGGRO_RADIUS: f64 = 15.0;
/// Melee range at which a mob attacks instead of closing distance.
const ATTACK_RANGE: f64 = 3.0;
/// Distance a mob steps per tick while chasing or wandering.
const STEP_DISTANCE: f64 = 2.0;
/// Radius of a random wander step from the mob's current position.
const WANDER_RADIUS: f64 = 5.0;
/// Probability per tick that an un-aggroed mob takes a wander step.
const WANDER_CHANCE: f64 = 0.3;
/// Flat damage per mob auto-attack, independent of the player-initiated
/// combat formula in the action pipeline.
const MOB_ATTACK_DAMAGE: u32 = 4;

fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (ax - bx).hypot(ay - by)
}

/// Run one tick of mob AI across every living mob/boss in the zone.
#[allow(clippy::arithmetic_side_effects)]
pub fn run_ai(zone: &mut Zone, rng: &mut impl Rng) -> Vec<WorldEvent> {
    let mob_ids: Vec<EntityId> = zone
        .entities()
        .filter(|e| matches!(e.kind, EntityKind::Mob | EntityKind::Boss) && !e.is_dead())
        .map(|e| e.id)
        .collect();

    let mut events = Vec::new();
    for mob_id in mob_ids {
        let Ok(mob) = zone.entity(mob_id) else { continue };
        let (mx, my) = (mob.x, mob.y);

        let target = zone
            .grid
            .candidates_near(mx, my)
            .into_iter()
            .filter_map(|id| zone.entity(id).ok())
            .filter(|e| e.kind == EntityKind::Player && !e.is_dead())
            .map(|e| (e.id, e.x, e.y, distance(mx, my, e.x, e.y)))
            .filter(|&(_, _, _, dist)| dist <= AGGRO_RADIUS)
            .min_by(|a, b| a.3.total_cmp(&b.3));

        match target {
            Some((target_id, tx, ty, dist)) if dist <= ATTACK_RANGE => {
                if let Ok(player) = zone.entity_mut(target_id) {
                    let current = i64::from(player.hp);
                    player.set_hp(current.saturating_sub(i64::from(MOB_ATTACK_DAMAGE)));
                    if player.is_dead() {
                        events.push(WorldEvent::EntityDied { entity: target_id });
                    }
                }
                let _ = (tx, ty);
            }
            Some((_, tx, ty, dist)) => {
                let step = STEP_DISTANCE.min(dist);
                let (nx, ny) = step_toward(mx, my, tx, ty, step);
                let _ = zone.move_entity(mob_id, nx, ny);
            }
            None => {
                if rng.random_bool(WANDER_CHANCE) {
                    let angle = rng.random_range(0.0..std::f64::consts::TAU);
                    let nx = angle.cos().mul_add(WANDER_RADIUS, mx);
                    let ny = angle.sin().mul_add(WANDER_RADIUS, my);
                    let _ = zone.move_entity(mob_id, nx, ny);
                }
            }
        }
    }
    events
}

#[allow(clippy::arithmetic_side_effects)]
fn step_toward(fx: f64, fy: f64, tx: f64, ty: f64, step: f64) -> (f64, f64) {
    let dx = tx - fx;
    let dy = ty - fy;
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        return (fx, fy);
    }
    ((dx / len).mul_add(step, fx), (dy / len).mul_add(step, fy))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shard_catalog::{MobSpawn, ZoneLayout};
    use shard_types::{ZoneBounds, ZoneId};

    use super::*;

    fn layout_with_mob_and_player() -> ZoneLayout {
        ZoneLayout {
            id: ZoneId::new(),
            name: String::from("arena"),
            bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 100.0 },
            mob_spawns: vec![MobSpawn {
                mob_name: String::from("Wolf"),
                x: 10.0,
                y: 10.0,
                level: 1,
                max_hp: 30,
                xp_reward: 5,
                loot_table: String::from("wolf"),
                skinnable: true,
            }],
            resource_nodes: Vec::new(),
            portals: Vec::new(),
        }
    }

    fn spawn_player(zone: &mut Zone, x: f64, y: f64) -> EntityId {
        let id = EntityId::new();
        zone.insert_entity(shard_types::Entity {
            id,
            kind: EntityKind::Player,
            name: String::from("hero"),
            x,
            y,
            hp: 100,
            max_hp: 100,
            essence: Some(50),
            max_essence: Some(50),
            wallet_address: Some(String::from("0xabc")),
            character_token_id: None,
            level: Some(1),
            xp: Some(0),
            xp_reward: None,
            race_id: None,
            class_id: None,
            gender: None,
            kills: Some(0),
            stats: shard_types::Stats { strength: 5, agility: 5, intellect: 5, vitality: 5 },
            effective_stats: shard_types::Stats { strength: 5, agility: 5, intellect: 5, vitality: 5 },
            equipment: std::collections::BTreeMap::new(),
            learned_techniques: std::collections::BTreeSet::new(),
            active_effects: Vec::new(),
            cooldowns: std::collections::BTreeMap::new(),
            completed_quests: std::collections::BTreeSet::new(),
            professions: std::collections::BTreeMap::new(),
            signature_technique_id: None,
            ultimate_technique_id: None,
            party_id: None,
            charges: None,
            max_charges: None,
            node_material: None,
            node_tier: None,
            depleted_at_tick: None,
            respawn_ticks: None,
            skinned: None,
            skinnable_until: None,
            mob_name: None,
        });
        id
    }

    #[test]
    fn mob_attacks_adjacent_player() {
        let mut zone = Zone::from_layout(&layout_with_mob_and_player());
        let player_id = spawn_player(&mut zone, 11.0, 10.0);
        let mut rng = StdRng::seed_from_u64(1);
        run_ai(&mut zone, &mut rng);
        let player = zone.entity(player_id).expect("player exists");
        assert!(player.hp < 100);
    }

    #[test]
    fn mob_chases_distant_player() {
        let mut zone = Zone::from_layout(&layout_with_mob_and_player());
        let mob_id = zone.entities().find(|e| e.kind == EntityKind::Mob).expect("mob").id;
        let (ox, oy) = {
            let mob = zone.entity(mob_id).expect("mob exists");
            (mob.x, mob.y)
        };
        spawn_player(&mut zone, 14.0, 10.0);
        let mut rng = StdRng::seed_from_u64(2);
        run_ai(&mut zone, &mut rng);
        let mob = zone.entity(mob_id).expect("mob exists");
        assert!(distance(mob.x, mob.y, 14.0, 10.0) < distance(ox, oy, 14.0, 10.0));
    }
}
