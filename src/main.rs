use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use boss_health_fetcher::abstractions::*;
use boss_health_fetcher::constants::SETTINGS_FILE_NAME;
use boss_health_fetcher::models::DataType;
use boss_health_fetcher::utils::{output_path, resolve_credentials};
use boss_health_fetcher::{start, StartOptions};
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use flexi_logger::Logger;
use log::{error, info};

#[derive(Parser)]
#[command(version, about = "Fetch boss health data for every fight of an FF Logs report")]
struct Cli {
    /// Report code, e.g. KjfFrNzXphm13VYb
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    report_code: String,

    #[arg(short, long, value_enum, default_value_t = DataType::Resources)]
    data_type: DataType,

    /// Also reconstruct tracked debuff intervals per fight
    #[arg(long)]
    debuffs: bool,

    /// Settings file, created with defaults when missing
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?
        .log_to_stderr()
        .start()?;

    let cli = Cli::parse();

    let mut file_system = DefaultFileSystem::new();
    let settings_path = match cli.settings {
        Some(path) => path,
        None => file_system.get_executable_directory()?.join(SETTINGS_FILE_NAME),
    };

    let settings = DefaultSettingsManager::new(&mut file_system, settings_path).get_or_create()?;
    let credentials = resolve_credentials(&settings.credentials, |key| std::env::var(key).ok());
    let timeout = Duration::from_secs(settings.request_timeout_secs);

    let output = cli.output
        .unwrap_or_else(|| output_path(&cli.report_code, settings.output_directory.as_deref()));

    let token_provider = DefaultTokenProvider::new(credentials, timeout)?;
    let report_api = DefaultReportApi::new(timeout)?;
    let mut persister = DefaultPersister::new(&mut file_system);
    let options = StartOptions::new(cli.report_code, cli.data_type, cli.debuffs, output, settings);

    let summary = start(&options, &token_provider, &report_api, &mut persister)
        .await
        .inspect_err(|err| error!("aborting: {:#}", err))?;

    if let Some(path) = &summary.output {
        info!("all collected boss health data saved to {}", path.display());
    }

    Ok(())
}
