use std::time::Duration;

use anyhow::Result;

use crate::abstractions::*;
use crate::error::FetchError;
use crate::models::*;
use crate::{start, StartOptions};

use super::*;

pub struct RunBuilder {
    options: StartOptions,
    token_provider: MockTokenProvider,
    report_api: MockReportApi,
    persister: MockPersister,
}

impl RunBuilder {
    pub fn new() -> Self {
        let options = create_start_options();
        let token_provider = MockTokenProvider::new();
        let report_api = MockReportApi::new();
        let persister = MockPersister::new();

        Self {
            options,
            token_provider,
            report_api,
            persister,
        }
    }

    pub fn setup_token_provider(mut self) -> Self {
        self.token_provider
            .expect_get_token()
            .times(1)
            .returning(|| Ok("token".to_string()));

        self
    }

    pub fn setup_token_error(mut self, err: FetchError) -> Self {
        self.token_provider
            .expect_get_token()
            .returning(move || Err(err.clone()));

        self.report_api
            .expect_fetch_metadata()
            .never();

        self
    }

    pub fn setup_metadata(mut self, fights: Vec<&FightTemplate>) -> Self {
        let metadata = create_report_metadata(fights);

        self.report_api
            .expect_fetch_metadata()
            .withf(|token, report_code| token == "token" && report_code == "abc")
            .times(1)
            .returning(move |_, _| Ok(metadata.clone()));

        self
    }

    pub fn setup_metadata_error(mut self, err: FetchError) -> Self {
        self.report_api
            .expect_fetch_metadata()
            .times(1)
            .returning(move |_, _| Err(err.clone()));

        self.report_api
            .expect_fetch_graph_series()
            .never();

        self
    }

    pub fn setup_graph<F>(mut self, respond: F) -> Self
    where
        F: Fn(&Fight) -> Result<Vec<SeriesPoint>, FetchError> + Send + 'static,
    {
        self.report_api
            .expect_fetch_graph_series()
            .returning(move |_, _, fight, _, _| respond(fight));

        self
    }

    pub fn setup_debuff_events<F>(mut self, respond: F) -> Self
    where
        F: Fn(&Fight) -> Result<Vec<DebuffEvent>, FetchError> + Send + 'static,
    {
        let mut expected_ids: Vec<u32> = self.options.tracked_debuffs.keys().copied().collect();
        expected_ids.sort_unstable();

        self.report_api
            .expect_fetch_debuff_events()
            .withf(move |_, _, _, _, ability_ids| ability_ids == expected_ids.as_slice())
            .returning(move |_, _, fight, _, _| respond(fight));

        self
    }

    /// Replaces the fixture options with ones built from default settings.
    pub fn use_default_settings(mut self) -> Self {
        let settings = Settings {
            encounter_bosses: create_encounter_bosses(),
            ..Settings::default()
        };
        let track_debuffs = self.options.track_debuffs;

        self.options = StartOptions::new("abc".into(), DataType::Resources, track_debuffs, OUTPUT_PATH.into(), settings);
        self.options.request_delay = Duration::ZERO;
        self
    }

    pub fn set_request_delay(mut self, request_delay: Duration) -> Self {
        self.options.request_delay = request_delay;
        self
    }

    pub fn track_debuffs(mut self) -> Self {
        self.options.track_debuffs = true;
        self
    }

    pub fn set_creature_max_health(mut self, creature_id: u32, max_health: u64) -> Self {
        self.options.creature_max_health.insert(creature_id, max_health);
        self
    }

    pub async fn run_with_file_system<FS: FileSystem>(self, file_system: &mut FS) -> Result<RunSummary> {
        let mut persister = DefaultPersister::new(file_system);

        start(&self.options, &self.token_provider, &self.report_api, &mut persister).await
    }

    pub async fn run_with_mock_persister(mut self) -> Result<RunSummary> {
        self.persister
            .expect_save()
            .never();

        start(&self.options, &self.token_provider, &self.report_api, &mut self.persister).await
    }
}
