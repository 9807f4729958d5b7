use crate::models::{EnemyActorInstance, Fight};

#[derive(Debug, Clone, Copy)]
pub struct EnemyTemplate {
    pub instance_id: u32,
    pub creature_id: u32,
    pub name: &'static str,
    pub max_health: Option<u64>,
}

impl EnemyTemplate {
    pub fn build(&self) -> EnemyActorInstance {
        EnemyActorInstance {
            instance_id: self.instance_id,
            creature_id: self.creature_id,
            name: self.name.to_string(),
        }
    }
}

pub struct FightTemplate {
    pub id: u32,
    pub start_time: i64,
    pub end_time: i64,
    pub encounter_id: u32,
    pub enemies: &'static [EnemyTemplate],
}

impl FightTemplate {
    pub fn build(&self) -> Fight {
        Fight {
            id: self.id,
            start_time: self.start_time,
            end_time: self.end_time,
            encounter_id: self.encounter_id,
            enemy_actors: self.enemies.iter().map(EnemyTemplate::build).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DebuffTemplate {
    pub ability_id: u32,
    pub name: &'static str,
}

pub const ENEMY_TEMPLATE_BOSS: EnemyTemplate = EnemyTemplate {
    instance_id: 22,
    creature_id: 15000,
    name: "The Warden",
    max_health: Some(1000),
};

pub const ENEMY_TEMPLATE_ADD: EnemyTemplate = EnemyTemplate {
    instance_id: 21,
    creature_id: 15001,
    name: "Warden's Sentry",
    max_health: None,
};

pub const ENEMY_TEMPLATE_OTHER_BOSS: EnemyTemplate = EnemyTemplate {
    instance_id: 31,
    creature_id: 16000,
    name: "Ashen Colossus",
    max_health: None,
};

pub const ENCOUNTER_ID_MAPPED: u32 = 1079;

// trash pull between bosses, never fetched
pub const FIGHT_TEMPLATE_TRASH: FightTemplate = FightTemplate {
    id: 1,
    start_time: 0,
    end_time: 5_000,
    encounter_id: 0,
    enemies: &[ENEMY_TEMPLATE_ADD],
};

// the add is listed first so a fallback pick is distinguishable
pub const FIGHT_TEMPLATE_MAPPED: FightTemplate = FightTemplate {
    id: 2,
    start_time: 6_000,
    end_time: 90_000,
    encounter_id: ENCOUNTER_ID_MAPPED,
    enemies: &[ENEMY_TEMPLATE_ADD, ENEMY_TEMPLATE_BOSS],
};

pub const FIGHT_TEMPLATE_UNMAPPED: FightTemplate = FightTemplate {
    id: 3,
    start_time: 95_000,
    end_time: 150_000,
    encounter_id: 2000,
    enemies: &[ENEMY_TEMPLATE_OTHER_BOSS],
};

pub const DEBUFF_TEMPLATE_DAMAGE_DOWN: DebuffTemplate = DebuffTemplate {
    ability_id: 2911,
    name: "Damage Down",
};

pub const DEBUFF_TEMPLATE_VULNERABILITY: DebuffTemplate = DebuffTemplate {
    ability_id: 3166,
    name: "Vulnerability Up",
};
