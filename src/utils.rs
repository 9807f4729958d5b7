use std::path::{Path, PathBuf};

use crate::constants::{CLIENT_ID_ENV, CLIENT_SECRET_ENV, OUTPUT_FILE_SUFFIX};
use crate::models::Credentials;

/// Environment variables take precedence over credentials stored in settings.
pub fn resolve_credentials<F>(stored: &Credentials, lookup: F) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |key: &str, fallback: &str| {
        lookup(key)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };

    Credentials {
        client_id: pick(CLIENT_ID_ENV, &stored.client_id),
        client_secret: pick(CLIENT_SECRET_ENV, &stored.client_secret),
    }
}

pub fn output_path(report_code: &str, output_directory: Option<&Path>) -> PathBuf {
    let file_name = format!("{report_code}{OUTPUT_FILE_SUFFIX}");

    match output_directory {
        Some(directory) => directory.join(file_name),
        None => PathBuf::from(file_name),
    }
}
