//! Adapter that runs the state machine against a backend and a renderer

use crate::{
    backend::TransferBackend,
    config::UploaderConfig,
    error::TransitionError,
    render::Renderer,
    state::{Command, Effect, Event, UploadMachine, UploadState},
    validation::SelectedFile,
};

/// Drives a single file through select, upload, and display
///
/// Steps run strictly one after another; a failed step ends the attempt and
/// nothing is retried.
pub struct Uploader<B, R> {
    machine: UploadMachine,
    backend: B,
    renderer: R,
}

impl<B: TransferBackend, R: Renderer> Uploader<B, R> {
    /// Idle uploader
    pub const fn new(config: &UploaderConfig, backend: B, renderer: R) -> Self {
        Self {
            machine: UploadMachine::new(config.max_file_size),
            backend,
            renderer,
        }
    }

    /// Current state
    pub const fn state(&self) -> &UploadState {
        self.machine.state()
    }

    /// Renderer the uploader draws on
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Validates `file` and previews it; an invalid file ends in the error state
    ///
    /// # Errors
    ///
    /// [`TransitionError::Busy`] while an upload is in flight
    pub async fn select_file(&mut self, file: SelectedFile) -> Result<(), TransitionError> {
        tracing::info!(file = %file.name, media_type = %file.media_type, size = file.size, "File selected");
        self.drive(Event::FileChosen(file)).await
    }

    /// Runs the whole upload sequence for the selected file
    ///
    /// A failing step leaves the uploader in [`UploadState::Error`]; that is
    /// not an `Err` here.
    ///
    /// # Errors
    ///
    /// [`TransitionError`] when no file is selected or an upload is in flight
    pub async fn upload(&mut self) -> Result<(), TransitionError> {
        self.drive(Event::UploadRequested).await
    }

    /// Hides the error, returning to the retained file if there is one
    ///
    /// # Errors
    ///
    /// [`TransitionError`] when no error is shown
    pub async fn dismiss_error(&mut self) -> Result<(), TransitionError> {
        self.drive(Event::ErrorDismissed).await
    }

    /// Clears everything and returns to idle
    ///
    /// # Errors
    ///
    /// [`TransitionError::Busy`] while an upload is in flight
    pub async fn reset(&mut self) -> Result<(), TransitionError> {
        self.drive(Event::Reset).await
    }

    async fn drive(&mut self, event: Event) -> Result<(), TransitionError> {
        let mut next = Some(event);

        while let Some(event) = next.take() {
            for effect in self.machine.handle(event)? {
                match effect {
                    Effect::Render(view) => self.renderer.render(view),
                    Effect::Perform(command) => next = Some(self.perform(command).await),
                }
            }
        }

        Ok(())
    }

    async fn perform(&self, command: Command) -> Event {
        let outcome = match command {
            Command::RequestUploadUrl(request) => self
                .backend
                .request_upload_url(&request)
                .await
                .map(Event::UploadUrlIssued),
            Command::Transfer {
                url,
                contents,
                media_type,
            } => self
                .backend
                .transfer(&url, contents, &media_type)
                .await
                .map(|()| Event::TransferCompleted),
            Command::RequestDownloadUrl { key } => self
                .backend
                .request_download_url(&key)
                .await
                .map(Event::DownloadUrlIssued),
        };

        outcome.unwrap_or_else(|e| {
            tracing::error!("Upload error: {e}");
            Event::StepFailed(e.to_string())
        })
    }
}
