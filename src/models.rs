use std::collections::BTreeMap;
use std::path::PathBuf;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TRACKED_DEBUFFS, REQUEST_DELAY, REQUEST_TIMEOUT};

pub type EncounterBossMap = HashMap<u32, u32>;
pub type TrackedDebuffs = HashMap<u32, String>;
pub type SeriesPoint = (i64, f64);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum DataType {
    #[default]
    Resources,
    DamageDone,
}

impl DataType {
    pub fn as_graphql(&self) -> &'static str {
        match self {
            DataType::Resources => "Resources",
            DataType::DamageDone => "DamageDone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnemyActorInstance {
    pub instance_id: u32,
    pub creature_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fight {
    pub id: u32,
    pub start_time: i64,
    pub end_time: i64,
    pub encounter_id: u32,
    pub enemy_actors: Vec<EnemyActorInstance>,
}

impl Fight {
    pub fn is_trackable(&self) -> bool {
        self.encounter_id != 0 && !self.enemy_actors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterEnemy {
    pub actor_id: u32,
    pub creature_id: u32,
    pub name: String,
    pub max_health: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPlayer {
    pub actor_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMetadata {
    pub fights: Vec<Fight>,
    pub master_enemies: Vec<MasterEnemy>,
    pub master_players: Vec<MasterPlayer>,
}

impl ReportMetadata {
    /// Max health of a creature type, only when a positive value is known.
    pub fn max_health_of(&self, creature_id: u32) -> Option<u64> {
        self.master_enemies
            .iter()
            .filter(|enemy| enemy.creature_id == creature_id)
            .find_map(|enemy| enemy.max_health.filter(|value| *value > 0))
    }

    /// Fills in max health from configuration, the report itself never carries it.
    pub fn apply_max_health(&mut self, creature_max_health: &HashMap<u32, u64>) {
        for enemy in &mut self.master_enemies {
            if let Some(max_health) = creature_max_health.get(&enemy.creature_id).filter(|value| **value > 0) {
                enemy.max_health = Some(*max_health);
            }
        }
    }

    pub fn player_directory(&self) -> PlayerDirectory {
        PlayerDirectory {
            names: self
                .master_players
                .iter()
                .map(|player| (player.actor_id, player.name.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    names: HashMap<u32, String>,
}

impl PlayerDirectory {
    pub fn name_of(&self, actor_id: u32) -> String {
        self.names
            .get(&actor_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown Player ({actor_id})"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBoss {
    pub instance_id: u32,
    pub creature_id: u32,
    pub name: String,
    pub resolved_by_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub data_type: DataType,
    pub is_percentage: bool,
    pub series: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuffEventKind {
    ApplyDebuff,
    RemoveDebuff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuffEvent {
    pub timestamp: i64,
    pub kind: DebuffEventKind,
    pub target_id: u32,
    pub ability_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebuffInterval {
    pub ability_name: String,
    pub player_name: String,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FightDetails {
    pub fight_id: u32,
    pub start_time: i64,
    pub end_time: i64,
    pub encounter_id: u32,
    pub boss: ResolvedBoss,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FightResult {
    pub fight_details: FightDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<GraphData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_down_debuffs: Option<Vec<DebuffInterval>>,
}

impl FightResult {
    pub fn has_data(&self) -> bool {
        self.graph_data.is_some() || self.damage_down_debuffs.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    fights: BTreeMap<u32, FightResult>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: FightResult) {
        self.fights.insert(result.fight_details.fight_id, result);
    }

    pub fn fight_count(&self) -> usize {
        self.fights.len()
    }

    pub fn fights_with_data(&self) -> usize {
        self.fights.values().filter(|fight| fight.has_data()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub credentials: Credentials,
    pub encounter_bosses: EncounterBossMap,
    pub tracked_debuffs: TrackedDebuffs,
    pub creature_max_health: HashMap<u32, u64>,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub output_directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            encounter_bosses: HashMap::new(),
            tracked_debuffs: DEFAULT_TRACKED_DEBUFFS
                .iter()
                .map(|(ability_id, name)| (*ability_id, name.to_string()))
                .collect(),
            creature_max_health: HashMap::new(),
            request_delay_ms: REQUEST_DELAY.as_millis() as u64,
            request_timeout_secs: REQUEST_TIMEOUT.as_secs(),
            output_directory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub fights_total: usize,
    pub fights_skipped: usize,
    pub fights_with_data: usize,
    pub output: Option<PathBuf>,
}
