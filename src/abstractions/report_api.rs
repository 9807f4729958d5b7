use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use hashbrown::HashMap;
use log::{debug, warn};
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::constants::{API_URL, USER_AGENT};
use crate::error::FetchError;
use crate::models::*;

#[cfg(test)]
use mockall::automock;

const METADATA_QUERY: &str = r#"
query ReportMetadata($code: String!) {
  reportData {
    report(code: $code) {
      fights { id startTime endTime encounterID enemyNPCs { id gameID } }
      masterData { actors { id gameID name type subType } }
    }
  }
}"#;

const GRAPH_QUERY: &str = r#"
query FightGraph($code: String!, $fightID: Int!, $startTime: Float!, $endTime: Float!, $dataType: GraphDataType!, $sourceID: Int, $targetID: Int, $hostilityType: HostilityType!) {
  reportData {
    report(code: $code) {
      graph(fightIDs: [$fightID], startTime: $startTime, endTime: $endTime, dataType: $dataType, sourceID: $sourceID, targetID: $targetID, hostilityType: $hostilityType)
    }
  }
}"#;

const EVENTS_QUERY: &str = r#"
query DebuffEvents($code: String!, $fightID: Int!, $startTime: Float!, $endTime: Float!, $sourceID: Int!, $filter: String!) {
  reportData {
    report(code: $code) {
      events(fightIDs: [$fightID], startTime: $startTime, endTime: $endTime, sourceID: $sourceID, dataType: Debuffs, hostilityType: Friendlies, filterExpression: $filter) {
        data
        nextPageTimestamp
      }
    }
  }
}"#;

/// Queries against the report service. Every call blocks the run until it answers.
#[cfg_attr(test, automock)]
pub trait ReportApi : Send + Sync + 'static {
    async fn fetch_metadata(&self, token: &str, report_code: &str) -> Result<ReportMetadata, FetchError>;

    async fn fetch_graph_series(
        &self,
        token: &str,
        report_code: &str,
        fight: &Fight,
        target_id: u32,
        data_type: DataType,
    ) -> Result<Vec<SeriesPoint>, FetchError>;

    async fn fetch_debuff_events(
        &self,
        token: &str,
        report_code: &str,
        fight: &Fight,
        source_id: u32,
        ability_ids: &[u32],
    ) -> Result<Vec<DebuffEvent>, FetchError>;
}

pub struct DefaultReportApi {
    client: Client,
    api_url: String,
}

impl ReportApi for DefaultReportApi {
    async fn fetch_metadata(&self, token: &str, report_code: &str) -> Result<ReportMetadata, FetchError> {
        let variables = json!({ "code": report_code });
        let data = self.query(token, METADATA_QUERY, variables, "metadata query").await?;

        parse_metadata(report_code, data)
    }

    async fn fetch_graph_series(
        &self,
        token: &str,
        report_code: &str,
        fight: &Fight,
        target_id: u32,
        data_type: DataType,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        // health is a resource of the boss itself, damage is dealt to it by the party
        let (source_id, target, hostility_type) = match data_type {
            DataType::Resources => (Some(target_id), None, "Enemies"),
            DataType::DamageDone => (None, Some(target_id), "Friendlies"),
        };

        let variables = json!({
            "code": report_code,
            "fightID": fight.id,
            "startTime": fight.start_time,
            "endTime": fight.end_time,
            "dataType": data_type.as_graphql(),
            "sourceID": source_id,
            "targetID": target,
            "hostilityType": hostility_type,
        });

        let data = self.query(token, GRAPH_QUERY, variables, "graph query").await?;

        parse_graph(data, target_id, data_type)
    }

    async fn fetch_debuff_events(
        &self,
        token: &str,
        report_code: &str,
        fight: &Fight,
        source_id: u32,
        ability_ids: &[u32],
    ) -> Result<Vec<DebuffEvent>, FetchError> {
        if ability_ids.is_empty() {
            return Ok(vec![]);
        }

        let filter = ability_filter_expression(ability_ids);
        let mut events = Vec::new();
        let mut start_time = fight.start_time;

        loop {
            let variables = json!({
                "code": report_code,
                "fightID": fight.id,
                "startTime": start_time,
                "endTime": fight.end_time,
                "sourceID": source_id,
                "filter": filter,
            });

            let data = self.query(token, EVENTS_QUERY, variables, "events query").await?;
            let page = parse_events_page(data)?;
            events.extend(page.events);

            match next_page_start(page.next_page_timestamp, start_time, fight.end_time) {
                Some(next) => {
                    debug!("fetching next events page of fight {} from {}", fight.id, next);
                    start_time = next;
                }
                None => break,
            }
        }

        Ok(events)
    }
}

impl DefaultReportApi {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            api_url: API_URL.to_string(),
        })
    }

    async fn query(&self, token: &str, query: &str, variables: Value, context: &str) -> Result<Value, FetchError> {
        let response = self.client
            .post(&self.api_url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::from_status(status, context));
        }

        let body: GraphQlResponse = response.json().await?;
        body.into_data(context)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlResponse {
    fn into_data(self, context: &str) -> Result<Value, FetchError> {
        if let Some(error) = self.errors.first() {
            warn!("{} failed: {}", context, error.message);
            return Err(FetchError::from_graphql_message(&error.message));
        }

        self.data
            .filter(|data| !data.is_null())
            .ok_or_else(|| FetchError::MalformedResponse(format!("{context} returned no data")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    fights: Option<Vec<RawFight>>,
    master_data: Option<RawMasterData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFight {
    id: u32,
    start_time: i64,
    end_time: i64,
    #[serde(rename = "encounterID", default)]
    encounter_id: u32,
    #[serde(rename = "enemyNPCs", default)]
    enemy_npcs: Option<Vec<RawFightNpc>>,
}

#[derive(Debug, Deserialize)]
struct RawFightNpc {
    id: u32,
    #[serde(rename = "gameID", default)]
    game_id: u32,
}

#[derive(Debug, Deserialize)]
struct RawMasterData {
    actors: Option<Vec<RawActor>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActor {
    id: u32,
    #[serde(rename = "gameID", default)]
    game_id: u32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    actor_type: ActorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum ActorType {
    Player,
    #[serde(rename = "NPC")]
    Npc,
    Pet,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    #[serde(default)]
    id: Option<u32>,
    #[serde(rename = "type", default = "SeriesType::other")]
    series_type: SeriesType,
    data: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum SeriesType {
    Boss,
    Player,
    Pet,
    #[serde(rename = "NPC")]
    Npc,
    #[serde(other)]
    Other,
}

impl SeriesType {
    fn other() -> Self {
        SeriesType::Other
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventsPage {
    data: Option<Vec<RawEvent>>,
    next_page_timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    timestamp: i64,
    #[serde(rename = "type")]
    event_type: RawEventType,
    #[serde(rename = "targetID", default)]
    target_id: Option<u32>,
    #[serde(rename = "abilityGameID", default)]
    ability_game_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawEventType {
    ApplyDebuff,
    RemoveDebuff,
    #[serde(other)]
    Other,
}

struct EventsPage {
    events: Vec<DebuffEvent>,
    next_page_timestamp: Option<i64>,
}

fn take_report(data: Value) -> Result<Value, FetchError> {
    let report = data
        .get("reportData")
        .and_then(|report_data| report_data.get("report"))
        .cloned()
        .ok_or_else(|| FetchError::MalformedResponse("response has no reportData.report".into()))?;

    if report.is_null() {
        return Err(FetchError::NotFound("report does not exist".into()));
    }

    Ok(report)
}

fn take_field<T: DeserializeOwned>(report: &Value, field: &str) -> Result<Option<T>, FetchError> {
    match report.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

fn parse_metadata(report_code: &str, data: Value) -> Result<ReportMetadata, FetchError> {
    let report = take_report(data).map_err(|err| match err {
        FetchError::NotFound(_) => FetchError::NotFound(format!("report {report_code} does not exist")),
        err => err,
    })?;

    let report: RawReport = serde_json::from_value(report)?;
    let fights = report.fights
        .ok_or_else(|| FetchError::MalformedResponse("report has no fights".into()))?;
    let actors = report.master_data
        .and_then(|master_data| master_data.actors)
        .ok_or_else(|| FetchError::MalformedResponse("report has no masterData.actors".into()))?;

    let names: HashMap<u32, &str> = actors
        .iter()
        .map(|actor| (actor.id, actor.name.as_str()))
        .collect();

    let fights = fights
        .into_iter()
        .map(|fight| {
            let end_time = if fight.end_time < fight.start_time {
                warn!("fight {} ends before it starts, clamping", fight.id);
                fight.start_time
            } else {
                fight.end_time
            };

            let enemy_actors = fight.enemy_npcs
                .unwrap_or_default()
                .into_iter()
                .map(|npc| EnemyActorInstance {
                    instance_id: npc.id,
                    creature_id: npc.game_id,
                    name: names
                        .get(&npc.id)
                        .map(|name| name.to_string())
                        .unwrap_or_else(|| format!("Unknown Enemy ({})", npc.id)),
                })
                .collect();

            Fight {
                id: fight.id,
                start_time: fight.start_time,
                end_time,
                encounter_id: fight.encounter_id,
                enemy_actors,
            }
        })
        .collect();

    let master_enemies = actors
        .iter()
        .filter(|actor| actor.actor_type == ActorType::Npc)
        .map(|actor| MasterEnemy {
            actor_id: actor.id,
            creature_id: actor.game_id,
            name: actor.name.clone(),
            max_health: None,
        })
        .collect();

    let master_players = actors
        .iter()
        .filter(|actor| actor.actor_type == ActorType::Player)
        .map(|actor| MasterPlayer {
            actor_id: actor.id,
            name: actor.name.clone(),
        })
        .collect();

    Ok(ReportMetadata {
        fights,
        master_enemies,
        master_players,
    })
}

fn parse_graph(data: Value, target_id: u32, data_type: DataType) -> Result<Vec<SeriesPoint>, FetchError> {
    let report = take_report(data)?;
    let graph: Value = take_field(&report, "graph")?
        .ok_or_else(|| FetchError::NotFound("response has no graph".into()))?;

    let series = graph
        .get("data")
        .and_then(|data| data.get("series"))
        .cloned()
        .ok_or_else(|| FetchError::NotFound("graph has no series".into()))?;

    let series: Vec<RawSeries> = serde_json::from_value(series)?;

    // damage done to the boss comes back as one series per party member
    if data_type == DataType::DamageDone {
        return sum_series(&series);
    }

    let boss_series = series
        .iter()
        .find(|series| series.series_type == SeriesType::Boss)
        .or_else(|| series.iter().find(|series| series.id == Some(target_id)))
        .ok_or_else(|| FetchError::NotFound("no boss series in graph".into()))?;

    let points = boss_series.data
        .as_ref()
        .ok_or_else(|| FetchError::MalformedResponse("boss series has no data".into()))?;

    points.iter().map(|point| parse_point(point)).collect()
}

fn sum_series(series: &[RawSeries]) -> Result<Vec<SeriesPoint>, FetchError> {
    let mut totals: BTreeMap<i64, f64> = BTreeMap::new();

    for points in series.iter().filter_map(|series| series.data.as_ref()) {
        for point in points {
            let (timestamp, value) = parse_point(point)?;
            *totals.entry(timestamp).or_default() += value;
        }
    }

    if totals.is_empty() {
        return Err(FetchError::NotFound("no damage series in graph".into()));
    }

    Ok(totals.into_iter().collect())
}

fn parse_point(point: &[Value]) -> Result<SeriesPoint, FetchError> {
    match point {
        [timestamp, value] => {
            let timestamp = timestamp
                .as_i64()
                .or_else(|| timestamp.as_f64().map(|value| value as i64))
                .ok_or_else(|| FetchError::MalformedResponse(format!("invalid timestamp {timestamp}")))?;

            // gaps in a series come through as null
            let value = match value {
                Value::Null => 0.0,
                value => value
                    .as_f64()
                    .ok_or_else(|| FetchError::MalformedResponse(format!("invalid value {value}")))?,
            };

            Ok((timestamp, value))
        }
        _ => Err(FetchError::MalformedResponse(format!("expected [timestamp, value], got {} items", point.len()))),
    }
}

fn parse_events_page(data: Value) -> Result<EventsPage, FetchError> {
    let report = take_report(data)?;
    let page: RawEventsPage = take_field(&report, "events")?
        .ok_or_else(|| FetchError::NotFound("response has no events".into()))?;

    let events = page.data
        .ok_or_else(|| FetchError::MalformedResponse("events have no data".into()))?
        .into_iter()
        .filter_map(|event| {
            let kind = match event.event_type {
                RawEventType::ApplyDebuff => DebuffEventKind::ApplyDebuff,
                RawEventType::RemoveDebuff => DebuffEventKind::RemoveDebuff,
                RawEventType::Other => return None,
            };

            Some(DebuffEvent {
                timestamp: event.timestamp,
                kind,
                target_id: event.target_id?,
                ability_id: event.ability_game_id?,
            })
        })
        .collect();

    Ok(EventsPage {
        events,
        next_page_timestamp: page.next_page_timestamp,
    })
}

/// Start of the next events page, `None` once the fight is exhausted.
fn next_page_start(next_page_timestamp: Option<i64>, current_start: i64, fight_end: i64) -> Option<i64> {
    next_page_timestamp.filter(|next| *next > current_start && *next < fight_end)
}

pub fn ability_filter_expression(ability_ids: &[u32]) -> String {
    let ids: Vec<String> = ability_ids.iter().map(u32::to_string).collect();
    format!("ability.id in ({})", ids.join(", "))
}
