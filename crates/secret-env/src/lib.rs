//! secret-env - Pull an AWS Secrets Manager secret into a .env file
//!
//! Reads its settings from the environment, fetches one secret version,
//! decodes it as a flat JSON object and appends `KEY="VALUE"` lines to
//! the output file.

pub mod config;
pub mod envfile;
pub mod fetch;
pub mod output;

pub use config::{AuthMode, Config};
pub use fetch::{AwsSecretsManager, FetchError, SecretFetcher, ServiceErrorCode};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub path: PathBuf,
    /// Number of lines appended
    pub written: usize,
    /// Whether the output file was created by this run
    pub created: bool,
}

/// Open the output file, fetch the secret, and append its entries.
///
/// Fetch failures abort before anything is written. An undecodable
/// payload is not an error and appends nothing.
pub async fn run<F>(config: &Config, fetcher: &F) -> Result<RunSummary>
where
    F: SecretFetcher + ?Sized,
{
    let path = Path::new(&config.filepath);
    let out = output::open_append(path)?;

    tracing::debug!(
        secret_id = %config.secret_id,
        version_stage = %config.version_stage,
        "fetching secret"
    );

    let payload = match fetcher.fetch(&config.secret_id, &config.version_stage).await {
        Ok(payload) => payload,
        Err(err) => {
            // message is reported by the caller
            tracing::error!(
                secret_id = %config.secret_id,
                code = %err.code().map(|c| c.as_str()).unwrap_or("none"),
                "secret fetch failed"
            );
            return Err(err)
                .with_context(|| format!("Failed to fetch secret {}", config.secret_id));
        }
    };

    let entries = envfile::parse_payload(&payload);
    let written = envfile::write_entries(&out.file, &entries)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(RunSummary {
        path: path.to_path_buf(),
        written,
        created: out.created,
    })
}
