pub struct PlayerTemplate {
    pub actor_id: u32,
    pub name: &'static str,
}

pub const PLAYER_TEMPLATE_TANK: PlayerTemplate = PlayerTemplate {
    actor_id: 1,
    name: "Wyn Tankard",
};

pub const PLAYER_TEMPLATE_HEALER: PlayerTemplate = PlayerTemplate {
    actor_id: 2,
    name: "Aria Mender",
};
