use std::time::Duration;

pub const TOKEN_URL: &str = "https://www.fflogs.com/oauth/token";
pub const API_URL: &str = "https://www.fflogs.com/api/v2/client";
pub const USER_AGENT: &str = concat!("boss-health-fetcher/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_DELAY: Duration = Duration::from_secs(2);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CLIENT_ID_ENV: &str = "FFLOGS_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "FFLOGS_CLIENT_SECRET";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const OUTPUT_FILE_SUFFIX: &str = "_boss_health_all_fights.json";

// status effects are reported as 1_000_000 + status id
pub const DEFAULT_TRACKED_DEBUFFS: [(u32, &str); 2] = [
    (1_002_911, "Damage Down"),
    (1_002_941, "Vulnerability Up"),
];
