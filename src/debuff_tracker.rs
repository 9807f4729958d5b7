use hashbrown::HashMap;
use log::debug;

use crate::models::{DebuffEvent, DebuffEventKind, DebuffInterval, PlayerDirectory, TrackedDebuffs};

/// Rebuilds active windows per (player, debuff) from a flat apply/remove stream.
///
/// A second apply while a window is open keeps the first start. Removes with
/// nothing open are dropped. Windows still open at the end close at
/// `fight_end_time`. Timestamps are clamped into `0..=fight_end_time` and the
/// result is sorted by player, then start time.
pub fn reconstruct_intervals(
    events: &[DebuffEvent],
    fight_end_time: i64,
    players: &PlayerDirectory,
    tracked_debuffs: &TrackedDebuffs,
) -> Vec<DebuffInterval> {
    let fight_end_time = fight_end_time.max(0);
    let mut open: HashMap<(String, String), i64> = HashMap::new();
    let mut intervals = Vec::new();

    for event in events {
        let key = (players.name_of(event.target_id), ability_name(tracked_debuffs, event.ability_id));
        let timestamp = event.timestamp.clamp(0, fight_end_time);

        match event.kind {
            DebuffEventKind::ApplyDebuff => {
                open.entry(key).or_insert(timestamp);
            }
            DebuffEventKind::RemoveDebuff => match open.remove(&key) {
                Some(start_time) => {
                    let (player_name, ability_name) = key;
                    intervals.push(close(player_name, ability_name, start_time, timestamp));
                }
                None => {
                    debug!("ignoring remove of {} on {} with no open apply", key.1, key.0);
                }
            },
        }
    }

    for ((player_name, ability_name), start_time) in open {
        intervals.push(close(player_name, ability_name, start_time, fight_end_time));
    }

    intervals.sort_by(|a, b| {
        a.player_name
            .cmp(&b.player_name)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.ability_name.cmp(&b.ability_name))
    });

    intervals
}

fn close(player_name: String, ability_name: String, start_time: i64, end_time: i64) -> DebuffInterval {
    // out-of-order removes collapse to a zero-length window
    let end_time = end_time.max(start_time);

    DebuffInterval {
        ability_name,
        player_name,
        start_time,
        end_time,
        duration_ms: end_time - start_time,
    }
}

fn ability_name(tracked_debuffs: &TrackedDebuffs, ability_id: u32) -> String {
    tracked_debuffs
        .get(&ability_id)
        .cloned()
        .unwrap_or_else(|| format!("Ability ({ability_id})"))
}
