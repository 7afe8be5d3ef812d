//! Secret retrieval from AWS Secrets Manager

use async_trait::async_trait;
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use aws_sdk_secretsmanager::config::Credentials;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::Client;
use std::fmt;
use thiserror::Error;

use crate::config::{AuthMode, Config};

/// Provider name attached to credentials taken from the environment
const STATIC_PROVIDER_NAME: &str = "secret-env-static";

/// Service-side error codes returned by GetSecretValue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorCode {
    /// The secret could not be decrypted with its KMS key
    DecryptionFailure,
    InternalServiceError,
    InvalidParameterException,
    /// Parameter is valid but not for the resource's current state
    InvalidRequestException,
    ResourceNotFoundException,
    /// Any other (or missing) code
    Other(String),
}

impl ServiceErrorCode {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("DecryptionFailure") => Self::DecryptionFailure,
            Some("InternalServiceError") => Self::InternalServiceError,
            Some("InvalidParameterException") => Self::InvalidParameterException,
            Some("InvalidRequestException") => Self::InvalidRequestException,
            Some("ResourceNotFoundException") => Self::ResourceNotFoundException,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other("Unknown".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DecryptionFailure => "DecryptionFailure",
            Self::InternalServiceError => "InternalServiceError",
            Self::InvalidParameterException => "InvalidParameterException",
            Self::InvalidRequestException => "InvalidRequestException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch failures. Every variant is fatal to a run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{code}: {message}")]
    Service {
        code: ServiceErrorCode,
        message: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Secret {secret_id} has no string value")]
    MissingSecretString { secret_id: String },
}

impl FetchError {
    /// The service error code, if the service answered with one
    pub fn code(&self) -> Option<&ServiceErrorCode> {
        match self {
            FetchError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Anything that can return a secret string by id and version stage
#[async_trait]
pub trait SecretFetcher {
    async fn fetch(&self, secret_id: &str, version_stage: &str) -> Result<String, FetchError>;
}

/// Build the SDK configuration for the configured region and auth mode
pub async fn aws_sdk_config(config: &Config) -> SdkConfig {
    load_sdk_config(config, aws_config::defaults(BehaviorVersion::latest())).await
}

/// Apply region and credentials to `loader` and load it
async fn load_sdk_config(config: &Config, loader: ConfigLoader) -> SdkConfig {
    let loader = loader.region(Region::new(config.region.clone()));

    let loader = match config.auth_mode() {
        AuthMode::Static {
            access_key,
            secret_key,
        } => loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            STATIC_PROVIDER_NAME,
        )),
        AuthMode::Ambient { profile: Some(profile) } => loader.profile_name(profile),
        AuthMode::Ambient { profile: None } => loader,
    };

    loader.load().await
}

/// Secrets Manager backed fetcher
#[derive(Debug, Clone)]
pub struct AwsSecretsManager {
    client: Client,
}

impl AwsSecretsManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_sdk_config(config).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl SecretFetcher for AwsSecretsManager {
    async fn fetch(&self, secret_id: &str, version_stage: &str) -> Result<String, FetchError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .version_stage(version_stage)
            .send()
            .await
            .map_err(classify)?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| FetchError::MissingSecretString {
                secret_id: secret_id.to_string(),
            })
    }
}

fn classify<R>(err: SdkError<GetSecretValueError, R>) -> FetchError
where
    R: fmt::Debug + 'static,
{
    match err {
        SdkError::ServiceError(ctx) => classify_service_error(ctx.into_err()),
        other => FetchError::Transport(DisplayErrorContext(&other).to_string()),
    }
}

fn classify_service_error(err: GetSecretValueError) -> FetchError {
    let code = match &err {
        GetSecretValueError::DecryptionFailure(_) => ServiceErrorCode::DecryptionFailure,
        GetSecretValueError::InternalServiceError(_) => ServiceErrorCode::InternalServiceError,
        GetSecretValueError::InvalidParameterException(_) => {
            ServiceErrorCode::InvalidParameterException
        }
        GetSecretValueError::InvalidRequestException(_) => {
            ServiceErrorCode::InvalidRequestException
        }
        GetSecretValueError::ResourceNotFoundException(_) => {
            ServiceErrorCode::ResourceNotFoundException
        }
        _ => ServiceErrorCode::from_code(err.code()),
    };

    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());

    FetchError::Service { code, message }
}
