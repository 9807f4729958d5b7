use std::time::Duration;

use hashbrown::HashMap;

use crate::boss_resolver::resolve_boss;
use crate::graph::normalize_series;
use crate::models::*;
use crate::StartOptions;

use super::*;

pub const OUTPUT_PATH: &str = "abc_boss_health_all_fights.json";

pub fn create_encounter_bosses() -> EncounterBossMap {
    let mut encounter_bosses = HashMap::new();
    encounter_bosses.insert(ENCOUNTER_ID_MAPPED, ENEMY_TEMPLATE_BOSS.creature_id);
    encounter_bosses
}

pub fn create_creature_max_health() -> HashMap<u32, u64> {
    [ENEMY_TEMPLATE_BOSS, ENEMY_TEMPLATE_ADD, ENEMY_TEMPLATE_OTHER_BOSS]
        .iter()
        .filter_map(|enemy| enemy.max_health.map(|max_health| (enemy.creature_id, max_health)))
        .collect()
}

pub fn create_tracked_debuffs() -> TrackedDebuffs {
    [DEBUFF_TEMPLATE_DAMAGE_DOWN, DEBUFF_TEMPLATE_VULNERABILITY]
        .iter()
        .map(|debuff| (debuff.ability_id, debuff.name.to_string()))
        .collect()
}

pub fn create_report_metadata(fights: Vec<&FightTemplate>) -> ReportMetadata {
    let master_enemies = [ENEMY_TEMPLATE_BOSS, ENEMY_TEMPLATE_ADD, ENEMY_TEMPLATE_OTHER_BOSS]
        .iter()
        .map(|enemy| MasterEnemy {
            actor_id: enemy.instance_id,
            creature_id: enemy.creature_id,
            name: enemy.name.to_string(),
            max_health: None,
        })
        .collect();

    let master_players = [&PLAYER_TEMPLATE_TANK, &PLAYER_TEMPLATE_HEALER]
        .iter()
        .map(|player| MasterPlayer {
            actor_id: player.actor_id,
            name: player.name.to_string(),
        })
        .collect();

    ReportMetadata {
        fights: fights.into_iter().map(FightTemplate::build).collect(),
        master_enemies,
        master_players,
    }
}

pub fn apply(timestamp: i64, target_id: u32, debuff: DebuffTemplate) -> DebuffEvent {
    DebuffEvent {
        timestamp,
        kind: DebuffEventKind::ApplyDebuff,
        target_id,
        ability_id: debuff.ability_id,
    }
}

pub fn remove(timestamp: i64, target_id: u32, debuff: DebuffTemplate) -> DebuffEvent {
    DebuffEvent {
        timestamp,
        kind: DebuffEventKind::RemoveDebuff,
        target_id,
        ability_id: debuff.ability_id,
    }
}

pub fn create_fight_result(template: &FightTemplate, with_graph: bool) -> FightResult {
    let fight = template.build();
    let boss = resolve_boss(&fight, &create_encounter_bosses()).unwrap();

    let graph_data = with_graph.then(|| normalize_series(vec![(fight.start_time, 1000.0), (fight.end_time, 0.0)], Some(1000), DataType::Resources));

    FightResult {
        fight_details: FightDetails {
            fight_id: fight.id,
            start_time: fight.start_time,
            end_time: fight.end_time,
            encounter_id: fight.encounter_id,
            boss,
        },
        graph_data,
        damage_down_debuffs: None,
    }
}

pub fn create_start_options() -> StartOptions {
    StartOptions {
        report_code: "abc".into(),
        data_type: DataType::Resources,
        track_debuffs: false,
        request_delay: Duration::ZERO,
        output_path: OUTPUT_PATH.into(),
        encounter_bosses: create_encounter_bosses(),
        tracked_debuffs: create_tracked_debuffs(),
        creature_max_health: create_creature_max_health(),
    }
}

pub fn read_output(file_system: &crate::abstractions::MemoryFileSystem, path: &std::path::Path) -> serde_json::Value {
    let contents = file_system.read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}
