use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use issuer::{object_storage::S3UrlSigner, server, types::Environment};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON logs for deployed stages, human readable ones locally
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development { .. } => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let config = environment.issuer_config();
    tracing::info!(
        bucket = %config.bucket_name,
        region = %config.region,
        expiry_secs = config.url_expiry.as_secs(),
        "Loaded issuer configuration"
    );

    let s3_client = Arc::new(S3Client::from_conf(
        environment.s3_client_config(&config).await,
    ));
    let signer = Arc::new(S3UrlSigner::new(s3_client, config.bucket_name.clone()));
    tracing::info!(bucket = signer.bucket_name(), "S3 signer ready");

    server::start(signer, config).await
}
