use std::io::Write;
use std::path::Path;

use anyhow::*;
use log::info;

use crate::models::AggregateResult;

use super::FileSystem;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait Persister {
    fn save(&mut self, path: &Path, result: &AggregateResult) -> Result<()>;
}

pub struct DefaultPersister<'a, FS: FileSystem> {
    file_system: &'a mut FS,
}

impl<'a, FS: FileSystem> Persister for DefaultPersister<'a, FS> {
    fn save(&mut self, path: &Path, result: &AggregateResult) -> Result<()> {
        let json_str = serde_json::to_string_pretty(result)?;
        let mut file = self.file_system.get_writer(path)?;

        file.write_all(json_str.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        file.flush()?;

        info!("saved {} fights to {}", result.fight_count(), path.display());

        Ok(())
    }
}

impl<'a, FS: FileSystem> DefaultPersister<'a, FS> {
    pub fn new(file_system: &'a mut FS) -> Self {
        Self { file_system }
    }
}
