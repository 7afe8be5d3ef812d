//! secret-env - Write an AWS Secrets Manager secret to a .env file
//!
//! Configuration is environment-only:
//! - AWS_ACCESS_KEY / AWS_SECRET_KEY: static credentials (both required)
//! - AWS_REGION: region (default us-west-2)
//! - AWS_PROFILE: profile for the default credential chain
//! - AWS_SECRET_ID: secret name or ARN (default LARAVEL-ENV)
//! - AWS_SECRET_VERSION: version stage (default AWSCURRENT)
//! - FILEPATH: output file, appended to (default .env)

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use secret_env::{AwsSecretsManager, Config};

/// SDK internals are chatty at info
const DEFAULT_FILTER: &str = "info,aws_config=warn,aws_smithy_runtime=warn,aws_sdk_secretsmanager=warn";

fn main() -> Result<()> {
    // Logs go to stderr; stdout only carries "done."
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "loaded configuration");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let summary = rt.block_on(async {
        let fetcher = AwsSecretsManager::from_config(&config).await;
        tracing::debug!(
            region = %config.region,
            auth = config.auth_mode().as_str(),
            "secrets manager client ready"
        );
        secret_env::run(&config, &fetcher).await
    })?;

    tracing::debug!(
        path = %summary.path.display(),
        written = summary.written,
        created = summary.created,
        "secret written"
    );

    println!("done.");
    Ok(())
}
