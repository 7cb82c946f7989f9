use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mime::Mime;
use tracing_subscriber::EnvFilter;
use url::Url;

use uploader::{
    backend::HttpTransferBackend,
    config::UploaderConfig,
    orchestrator::Uploader,
    render::TerminalRenderer,
    state::UploadState,
    validation::{SelectedFile, MAX_FILE_SIZE},
};

/// Upload an image or video through a signed URL and print where it lives
#[derive(Parser, Debug)]
#[command(name = "uploader", version)]
struct Args {
    /// File to upload
    path: PathBuf,

    /// Base URL of the signed-URL issuer
    #[arg(long, env = "ISSUER_ENDPOINT")]
    endpoint: Url,

    /// Media type of the file, guessed from the extension when omitted
    #[arg(long)]
    content_type: Option<Mime>,

    /// Largest accepted file in bytes
    #[arg(long, default_value_t = MAX_FILE_SIZE)]
    max_file_size: u64,
}

async fn load_file(
    path: &Path,
    content_type: Option<Mime>,
    max_file_size: u64,
) -> anyhow::Result<SelectedFile> {
    let name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_string_lossy()
        .into_owned();

    let media_type =
        content_type.unwrap_or_else(|| mime_guess::from_path(path).first_or_octet_stream());

    SelectedFile::open(path, name, media_type, max_file_size)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // stdout belongs to the renderer
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = UploaderConfig::new(args.endpoint).with_max_file_size(args.max_file_size);

    let file = load_file(&args.path, args.content_type, config.max_file_size).await?;

    let mut uploader = Uploader::new(
        &config,
        HttpTransferBackend::new(&config),
        TerminalRenderer::new(std::io::stdout()),
    );

    uploader.select_file(file).await?;
    if matches!(uploader.state(), UploadState::Error { .. }) {
        return Ok(ExitCode::FAILURE);
    }

    uploader.upload().await?;

    Ok(match uploader.state() {
        UploadState::Complete { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
