use crate::models::{EncounterBossMap, Fight, ResolvedBoss};

/// Picks the actor instance that graph and event queries target for a fight.
///
/// Encounters absent from `encounter_bosses`, or whose mapped creature does not
/// appear in the fight, fall back to the first enemy actor. That pick is a guess
/// and is reported through `resolved_by_fallback`.
pub fn resolve_boss(fight: &Fight, encounter_bosses: &EncounterBossMap) -> Option<ResolvedBoss> {
    if !fight.is_trackable() {
        return None;
    }

    let mapped = encounter_bosses
        .get(&fight.encounter_id)
        .and_then(|creature_id| {
            fight
                .enemy_actors
                .iter()
                .find(|actor| actor.creature_id == *creature_id)
        });

    let (actor, resolved_by_fallback) = match mapped {
        Some(actor) => (actor, false),
        None => (fight.enemy_actors.first()?, true),
    };

    Some(ResolvedBoss {
        instance_id: actor.instance_id,
        creature_id: actor.creature_id,
        name: actor.name.clone(),
        resolved_by_fallback,
    })
}
