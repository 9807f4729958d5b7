use log::debug;

use crate::abstractions::ReportApi;
use crate::error::FetchError;
use crate::models::{DataType, Fight, GraphData, SeriesPoint};

pub async fn fetch_graph<RA: ReportApi>(
    report_api: &RA,
    token: &str,
    report_code: &str,
    fight: &Fight,
    target_id: u32,
    max_health: Option<u64>,
    data_type: DataType,
) -> Result<GraphData, FetchError> {
    let raw = report_api
        .fetch_graph_series(token, report_code, fight, target_id, data_type)
        .await?;

    Ok(normalize_series(raw, max_health, data_type))
}

/// Converts health to a percentage of `max_health` when one is known.
/// Anything else passes through and is marked as not being a percentage.
pub fn normalize_series(mut raw: Vec<SeriesPoint>, max_health: Option<u64>, data_type: DataType) -> GraphData {
    if raw.windows(2).any(|pair| pair[0].0 > pair[1].0) {
        debug!("graph series out of order, sorting by timestamp");
        raw.sort_by_key(|(timestamp, _)| *timestamp);
    }

    let max_health = max_health.filter(|value| *value > 0);

    match (data_type, max_health) {
        (DataType::Resources, Some(max_health)) => {
            let max_health = max_health as f64;
            let series = raw
                .into_iter()
                .map(|(timestamp, value)| (timestamp, value / max_health * 100.0))
                .collect();

            GraphData { data_type, is_percentage: true, series }
        }
        _ => GraphData { data_type, is_percentage: false, series: raw },
    }
}
