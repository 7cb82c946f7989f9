//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use common_types::SIGNED_URL_EXPIRY_SECS;

const DEFAULT_BUCKET_NAME: &str = "presignedurl-demo07";
const DEFAULT_REGION: &str = "us-east-1";

/// Fixed server-side configuration handed to the signer and handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    /// Bucket every object key is resolved against
    pub bucket_name: String,
    /// Region of the bucket
    pub region: String,
    /// Lifetime of each signed URL
    pub url_expiry: Duration,
}

impl IssuerConfig {
    /// Configuration with the default 600 second URL lifetime
    #[must_use]
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: region.into(),
            url_expiry: Duration::from_secs(SIGNED_URL_EXPIRY_SECS),
        }
    }
}

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| DEFAULT_BUCKET_NAME.to_string())
            }
        }
    }

    /// Region of the bucket, `AWS_REGION` or `us-east-1`
    #[must_use]
    pub fn region(&self) -> String {
        env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string())
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            Self::Production | Self::Staging => None,
            Self::Development { .. } => Some("http://localhost:4566"),
        }
    }

    /// Lifetime of the signed URLs
    #[must_use]
    pub fn presigned_url_expiry(&self) -> Duration {
        match self {
            Self::Production | Self::Staging => Duration::from_secs(SIGNED_URL_EXPIRY_SECS),
            Self::Development {
                presign_expiry_override,
            } => Duration::from_secs(presign_expiry_override.unwrap_or(SIGNED_URL_EXPIRY_SECS)),
        }
    }

    /// Issuer configuration resolved for this environment
    #[must_use]
    pub fn issuer_config(&self) -> IssuerConfig {
        IssuerConfig {
            bucket_name: self.s3_bucket(),
            region: self.region(),
            url_expiry: self.presigned_url_expiry(),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self, config: &IssuerConfig) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .region(Region::new(config.region.clone()))
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self, config: &IssuerConfig) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config(config).await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // LocalStack only understands path-style bucket addressing
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        env::remove_var("APP_ENV");
        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                presign_expiry_override: None
            }
        );

        env::set_var("APP_ENV", "development");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                presign_expiry_override: None
            }
        );

        env::set_var("APP_ENV", " Staging ");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    #[serial]
    fn test_presigned_url_expiry() {
        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(env.presigned_url_expiry(), Duration::from_secs(600));

        let env = Environment::Development {
            presign_expiry_override: Some(30),
        };
        assert_eq!(env.presigned_url_expiry(), Duration::from_secs(30));

        assert_eq!(
            Environment::Production.presigned_url_expiry(),
            Duration::from_secs(600)
        );
        assert_eq!(
            Environment::Staging.presigned_url_expiry(),
            Duration::from_secs(600)
        );
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        env::remove_var("APP_ENV");
        env::remove_var("S3_BUCKET_NAME");
        env::remove_var("AWS_REGION");
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "invalid");

        let config = Environment::from_env().issuer_config();
        assert_eq!(config, IssuerConfig::new("presignedurl-demo07", "us-east-1"));

        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
    }

    #[test]
    #[serial]
    fn test_bucket_and_region_from_env() {
        env::set_var("S3_BUCKET_NAME", "media-uploads");
        env::set_var("AWS_REGION", "eu-west-1");

        let config = Environment::Production.issuer_config();
        assert_eq!(config.bucket_name, "media-uploads");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.url_expiry, Duration::from_secs(600));

        env::remove_var("S3_BUCKET_NAME");
        env::remove_var("AWS_REGION");
    }

    #[test]
    fn test_only_development_overrides_endpoint() {
        let dev = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(dev.override_aws_endpoint_url(), Some("http://localhost:4566"));
        assert_eq!(Environment::Production.override_aws_endpoint_url(), None);
    }
}
