use std::path::PathBuf;
use anyhow::*;
use log::info;

use crate::models::Settings;

#[cfg(test)]
use mockall::automock;

use super::FileSystem;

#[cfg_attr(test, automock)]
pub trait SettingsManager {
    fn get_or_create(&mut self) -> Result<Settings>;
    fn write(&mut self, settings: &Settings) -> Result<()>;
}

pub struct DefaultSettingsManager<'a, FS: FileSystem> {
    file_system: &'a mut FS,
    path: PathBuf
}

impl<'a, FS: FileSystem> SettingsManager for DefaultSettingsManager<'a, FS> {
    fn get_or_create(&mut self) -> Result<Settings> {

        if self.file_system.exists(&self.path) {
            let file = self.file_system.get_reader(&self.path)?;
            let settings = serde_json::from_reader(file)
                .with_context(|| format!("invalid settings file {}", self.path.display()))?;
            return Ok(settings);
        }

        let settings = Settings::default();
        self.write(&settings)?;
        info!("created default settings at {}", self.path.display());

        Ok(settings)
    }

    fn write(&mut self, settings: &Settings) -> Result<()> {
        let file = self.file_system.get_writer(&self.path)?;
        serde_json::to_writer_pretty(file, settings)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))
    }
}

impl<'a, FS: FileSystem> DefaultSettingsManager<'a, FS> {
    pub fn new(file_system: &'a mut FS, path: PathBuf) -> Self {
        Self { file_system, path }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use crate::abstractions::{FileSystem, MemoryFileSystem};
    use crate::constants::SETTINGS_FILE_NAME;
    use crate::models::Settings;

    use super::{DefaultSettingsManager, SettingsManager};

    #[test]
    fn should_write_defaults_when_missing() {
        let path = Path::new(SETTINGS_FILE_NAME);
        let mut file_system = MemoryFileSystem::new();

        let settings = DefaultSettingsManager::new(&mut file_system, path.into())
            .get_or_create()
            .unwrap();

        assert_eq!(settings, Settings::default());

        let written: Settings = serde_json::from_str(&file_system.read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, settings);
    }

    #[test]
    fn should_load_stored_settings() {
        let mut file_system = MemoryFileSystem::new();
        let mut settings_manager = DefaultSettingsManager::new(&mut file_system, SETTINGS_FILE_NAME.into());
        let mut settings = Settings::default();
        settings.encounter_bosses.insert(1079, 12345);
        settings.tracked_debuffs.clear();
        settings.request_delay_ms = 500;

        settings_manager.write(&settings).unwrap();

        assert_eq!(settings_manager.get_or_create().unwrap(), settings);
    }

    #[test]
    fn should_reject_invalid_settings_file() {
        let path = Path::new(SETTINGS_FILE_NAME);
        let mut file_system = MemoryFileSystem::new();
        file_system.get_writer(path).unwrap().write_all(b"not json").unwrap();

        let result = DefaultSettingsManager::new(&mut file_system, path.into()).get_or_create();

        assert!(result.is_err());
    }
}
