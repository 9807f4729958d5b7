use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use hashbrown::HashMap;
use log::{error, info, warn};

use crate::abstractions::*;
use crate::boss_resolver::resolve_boss;
use crate::debuff_tracker::reconstruct_intervals;
use crate::error::FetchError;
use crate::graph::fetch_graph;
use crate::models::*;

pub struct StartOptions {
    pub report_code: String,
    pub data_type: DataType,
    pub track_debuffs: bool,
    pub request_delay: Duration,
    pub output_path: PathBuf,
    pub encounter_bosses: EncounterBossMap,
    pub tracked_debuffs: TrackedDebuffs,
    pub creature_max_health: HashMap<u32, u64>,
}

impl StartOptions {
    pub fn new(report_code: String, data_type: DataType, track_debuffs: bool, output_path: PathBuf, settings: Settings) -> Self {
        Self {
            report_code,
            data_type,
            track_debuffs,
            request_delay: Duration::from_millis(settings.request_delay_ms),
            output_path,
            encounter_bosses: settings.encounter_bosses,
            tracked_debuffs: settings.tracked_debuffs,
            creature_max_health: settings.creature_max_health,
        }
    }

    fn tracked_ability_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.tracked_debuffs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Fetches every trackable fight of a report one after another and writes the
/// aggregate once at the end.
///
/// Only a failure to obtain a token or the report metadata aborts the run.
/// Graph and debuff failures leave the fight recorded without that part.
pub async fn start<TP, RA, PE>(
    options: &StartOptions,
    token_provider: &TP,
    report_api: &RA,
    persister: &mut PE,
) -> Result<RunSummary>
where
    TP: TokenProvider,
    RA: ReportApi,
    PE: Persister,
{
    let report_code = options.report_code.as_str();
    info!("starting data extraction for report {}", report_code);

    let token = token_provider
        .get_token()
        .await
        .context("failed to obtain access token")?;

    let mut metadata = report_api
        .fetch_metadata(&token, report_code)
        .await
        .with_context(|| format!("failed to fetch metadata for report {report_code}"))?;

    metadata.apply_max_health(&options.creature_max_health);

    info!("found {} fights in report {}", metadata.fights.len(), report_code);

    let tracked_ability_ids = options.tracked_ability_ids();
    let track_debuffs = options.track_debuffs && !tracked_ability_ids.is_empty();

    if options.track_debuffs && !track_debuffs {
        warn!("debuff tracking requested but no tracked debuffs are configured");
    }

    let players = metadata.player_directory();
    let mut aggregate = AggregateResult::new();
    let mut fights_skipped = 0;

    for fight in &metadata.fights {
        let Some(boss) = resolve_boss(fight, &options.encounter_bosses) else {
            info!("skipping fight {} (encounter {}): no trackable boss", fight.id, fight.encounter_id);
            fights_skipped += 1;
            continue;
        };

        if boss.resolved_by_fallback {
            warn!(
                "fight {}: encounter {} has no mapped boss present, falling back to first enemy {} ({})",
                fight.id, fight.encounter_id, boss.name, boss.instance_id
            );
        }

        info!("fetching data for fight {} ({})", fight.id, boss.name);

        let max_health = metadata.max_health_of(boss.creature_id);
        let graph = fetch_graph(report_api, &token, report_code, fight, boss.instance_id, max_health, options.data_type).await;
        let graph_data = match graph {
            Ok(graph) if graph.series.is_empty() => {
                info!("fight {}: graph is empty", fight.id);
                None
            }
            Ok(graph) => {
                if !graph.is_percentage && options.data_type == DataType::Resources {
                    warn!("fight {}: max health of {} unknown, storing raw values", fight.id, boss.name);
                }
                Some(graph)
            }
            Err(err) => {
                report_fetch_error(fight.id, "graph", &err);
                None
            }
        };

        let damage_down_debuffs = if track_debuffs {
            match report_api
                .fetch_debuff_events(&token, report_code, fight, boss.instance_id, &tracked_ability_ids)
                .await
            {
                Ok(events) => {
                    let intervals = reconstruct_intervals(&events, fight.end_time, &players, &options.tracked_debuffs);
                    info!("fight {}: {} debuff intervals from {} events", fight.id, intervals.len(), events.len());
                    Some(intervals)
                }
                Err(err) => {
                    report_fetch_error(fight.id, "debuff", &err);
                    None
                }
            }
        } else {
            None
        };

        aggregate.insert(FightResult {
            fight_details: FightDetails {
                fight_id: fight.id,
                start_time: fight.start_time,
                end_time: fight.end_time,
                encounter_id: fight.encounter_id,
                boss,
            },
            graph_data,
            damage_down_debuffs,
        });

        info!("waiting {:?} before next request", options.request_delay);
        tokio::time::sleep(options.request_delay).await;
    }

    let fights_with_data = aggregate.fights_with_data();
    let output = finalize(options, persister, &aggregate);

    let summary = RunSummary {
        fights_total: metadata.fights.len(),
        fights_skipped,
        fights_with_data,
        output,
    };

    info!(
        "data download complete: {} of {} fights produced data, {} skipped",
        summary.fights_with_data, summary.fights_total, summary.fights_skipped
    );

    Ok(summary)
}

fn report_fetch_error(fight_id: u32, part: &str, err: &FetchError) {
    match err {
        err if err.is_fatal() => error!("fight {}: {} fetch rejected ({})", fight_id, part, err),
        FetchError::NotFound(_) => info!("fight {}: no {} data ({})", fight_id, part, err),
        _ => warn!("fight {}: {} fetch failed ({})", fight_id, part, err),
    }
}

fn finalize<PE: Persister>(options: &StartOptions, persister: &mut PE, aggregate: &AggregateResult) -> Option<PathBuf> {
    if aggregate.fights_with_data() == 0 {
        info!("No data was successfully fetched for any fight.");
        return None;
    }

    match persister.save(&options.output_path, aggregate) {
        Ok(()) => Some(options.output_path.clone()),
        Err(err) => {
            error!("error saving data to {}: {:#}", options.output_path.display(), err);
            info!("printing data to console instead");

            match serde_json::to_string_pretty(aggregate) {
                Ok(json) => println!("{json}"),
                Err(err) => error!("failed to serialize results: {}", err),
            }

            None
        }
    }
}
