//! Party formation and membership (`spec.md` §4.F `party_form`/`party_leave`).
//!
//! Grounded in the teacher's `reproduction::validate_reproduction` shape: a
//! small set of `Result<(), RejectionReason>` guards in front of a plain
//! mutating function, rather than a full validation pipeline, since party
//! membership touches only the [`Party`] record and the member entities'
//! `party_id` field.

use shard_types::{Entity, EntityId, Party, PartyId, RejectionReason, PARTY_MAX_SIZE};

/// Form a new party led by `leader`, inviting `target` as its second member.
///
/// Rejects if either entity is already in a party.
pub fn form_party(leader: &mut Entity, target: &mut Entity) -> Result<Party, RejectionReason> {
    if leader.party_id.is_some() || target.party_id.is_some() {
        return Err(RejectionReason::InvalidInput);
    }
    let party = Party {
        id: PartyId::new(),
        leader_id: leader.id,
        members: [leader.id, target.id].into_iter().collect(),
    };
    leader.party_id = Some(party.id);
    target.party_id = Some(party.id);
    Ok(party)
}

/// Add `joiner` to `party`, also setting its `party_id`.
///
/// Rejects if the party is already at [`PARTY_MAX_SIZE`] or `joiner` already
/// belongs to a party.
pub fn join_party(party: &mut Party, joiner: &mut Entity) -> Result<(), RejectionReason> {
    if joiner.party_id.is_some() {
        return Err(RejectionReason::InvalidInput);
    }
    if party.members.len() >= PARTY_MAX_SIZE {
        return Err(RejectionReason::InvalidInput);
    }
    party.members.insert(joiner.id);
    joiner.party_id = Some(party.id);
    Ok(())
}

/// The result of an entity leaving a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The party still has members and survives.
    Remained,
    /// The leaving member was the last one; the party should be deleted.
    Disbanded,
}

/// Remove `leaver` from `party`, clearing its `party_id`.
///
/// If `leaver` was the leader and other members remain, leadership passes
/// to the lowest-ordered remaining member id (a stable, deterministic
/// successor rule).
pub fn leave_party(party: &mut Party, leaver: &mut Entity) -> Result<LeaveOutcome, RejectionReason> {
    if !party.members.remove(&leaver.id) {
        return Err(RejectionReason::NotFound);
    }
    leaver.party_id = None;

    if party.members.is_empty() {
        return Ok(LeaveOutcome::Disbanded);
    }
    if party.leader_id == leaver.id {
        if let Some(&successor) = party.members.iter().next() {
            party.leader_id = successor;
        }
    }
    Ok(LeaveOutcome::Remained)
}

/// Whether `entity_id` is a member of `party`.
#[must_use]
pub fn is_member(party: &Party, entity_id: EntityId) -> bool {
    party.members.contains(&entity_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::{ClassId, EntityKind, Gender, RaceId, Stats};
    use std::collections::{BTreeMap, BTreeSet};

    fn entity() -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Player,
            name: "A".to_owned(),
            x: 0.0,
            y: 0.0,
            hp: 100,
            max_hp: 100,
            essence: Some(10),
            max_essence: Some(10),
            wallet_address: None,
            character_token_id: None,
            level: Some(1),
            xp: Some(0),
            xp_reward: None,
            race_id: Some(RaceId::Human),
            class_id: Some(ClassId::Warrior),
            gender: Some(Gender::Male),
            kills: Some(0),
            stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            effective_stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            equipment: BTreeMap::new(),
            learned_techniques: BTreeSet::new(),
            active_effects: Vec::new(),
            cooldowns: BTreeMap::new(),
            completed_quests: BTreeSet::new(),
            professions: BTreeMap::new(),
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
        }
    }

    #[test]
    fn form_party_links_both_entities() {
        let mut leader = entity();
        let mut target = entity();
        let party = form_party(&mut leader, &mut target).expect("forms");
        assert_eq!(leader.party_id, Some(party.id));
        assert_eq!(target.party_id, Some(party.id));
        assert_eq!(party.members.len(), 2);
    }

    #[test]
    fn join_rejects_when_full() {
        let mut leader = entity();
        let mut second = entity();
        let mut party = form_party(&mut leader, &mut second).expect("forms");
        for _ in 0..3 {
            let mut joiner = entity();
            join_party(&mut party, &mut joiner).expect("joins");
        }
        let mut overflow = entity();
        assert_eq!(join_party(&mut party, &mut overflow), Err(RejectionReason::InvalidInput));
    }

    #[test]
    fn leader_leaving_transfers_leadership() {
        let mut leader = entity();
        let mut second = entity();
        let mut party = form_party(&mut leader, &mut second).expect("forms");
        let outcome = leave_party(&mut party, &mut leader).expect("leaves");
        assert_eq!(outcome, LeaveOutcome::Remained);
        assert_eq!(party.leader_id, second.id);
        assert_eq!(leader.party_id, None);
    }

    #[test]
    fn last_member_leaving_disbands() {
        let mut leader = entity();
        let mut second = entity();
        let mut party = form_party(&mut leader, &mut second).expect("forms");
        leave_party(&mut party, &mut leader).expect("leaves");
        let outcome = leave_party(&mut party, &mut second).expect("leaves");
        assert_eq!(outcome, LeaveOutcome::Disbanded);
    }
}
