//! Upload state machine
//!
//! The machine performs no I/O. Each [`Event`] moves it to a new
//! [`UploadState`] and yields the [`Effect`]s the adapter must carry out:
//! display changes to render, and at most one network [`Command`] whose outcome
//! is fed back as the next event.
//!
//! ```text
//! Idle -> FileSelected -> Uploading(RequestingUrl) -> Uploading(Transferring)
//!      -> Finalizing -> Complete
//! ```
//!
//! `Error` is reachable from every step. `Reset` returns to `Idle` from any
//! state that has no transfer in flight.

use bytes::Bytes;
use common_types::{SignedUrlResponse, UploadUrlRequest};
use mime::Mime;

use crate::{
    error::{TransitionError, UploadError},
    render::{MediaElement, MediaSource, RenderedResult, View},
    validation::{validate, MediaKind, SelectedFile},
};

/// Coarse progress points reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Asking the issuer for an upload URL
    RequestingUrl,
    /// Sending bytes to the object store
    Transferring,
    /// Asking the issuer for a download URL
    Finalizing,
    /// Done
    Complete,
}

impl Checkpoint {
    /// Progress bar position
    #[must_use]
    pub const fn percent(self) -> u8 {
        match self {
            Self::RequestingUrl => 0,
            Self::Transferring => 25,
            Self::Finalizing => 75,
            Self::Complete => 100,
        }
    }

    /// Status line shown next to the bar
    #[must_use]
    pub const fn status(self) -> &'static str {
        match self {
            Self::RequestingUrl => "Getting upload URL...",
            Self::Transferring => "Uploading file...",
            Self::Finalizing => "Finalizing upload...",
            Self::Complete => "Upload complete!",
        }
    }
}

/// A file that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// The file itself
    pub file: SelectedFile,
    /// How it is displayed
    pub kind: MediaKind,
}

impl StagedFile {
    fn preview(&self) -> MediaElement {
        MediaElement {
            kind: self.kind,
            source: MediaSource::Local {
                file_name: self.file.name.clone(),
                size: self.file.size,
            },
        }
    }
}

/// Sub-step of [`UploadState::Uploading`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    /// Waiting for the upload URL
    RequestingUrl,
    /// Waiting for the object store to accept the bytes
    Transferring {
        /// Key the upload URL is bound to
        key: String,
    },
}

/// Where the uploader currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// Nothing selected
    Idle,
    /// A valid file is selected and previewed
    FileSelected(StagedFile),
    /// Upload URL requested or bytes in flight
    Uploading {
        /// File being uploaded
        file: StagedFile,
        /// Current sub-step
        phase: UploadPhase,
    },
    /// Bytes stored, download URL requested
    Finalizing {
        /// File being uploaded
        file: StagedFile,
        /// Key the object was stored under
        key: String,
    },
    /// Object uploaded and displayed
    Complete {
        /// Uploaded file
        file: StagedFile,
        /// What is shown to the user
        result: RenderedResult,
    },
    /// Selection rejected or a step failed
    Error {
        /// The one message shown to the user
        message: String,
        /// File to return to once the error is dismissed
        retained: Option<StagedFile>,
    },
}

impl UploadState {
    /// Short name for diagnostics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FileSelected(_) => "file selected",
            Self::Uploading {
                phase: UploadPhase::RequestingUrl,
                ..
            } => "requesting upload URL",
            Self::Uploading {
                phase: UploadPhase::Transferring { .. },
                ..
            } => "transferring",
            Self::Finalizing { .. } => "finalizing",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
        }
    }

    /// Whether a network step is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading { .. } | Self::Finalizing { .. })
    }

    /// File currently held by the machine, if any
    #[must_use]
    pub const fn staged(&self) -> Option<&StagedFile> {
        match self {
            Self::FileSelected(file)
            | Self::Uploading { file, .. }
            | Self::Finalizing { file, .. }
            | Self::Complete { file, .. } => Some(file),
            Self::Error { retained, .. } => retained.as_ref(),
            Self::Idle => None,
        }
    }
}

/// Network work requested by the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the issuer to authorize an upload
    RequestUploadUrl(UploadUrlRequest),
    /// Send the file to the object store
    Transfer {
        /// Signed upload URL
        url: String,
        /// Raw file bytes
        contents: Bytes,
        /// Media type sent along with the bytes
        media_type: Mime,
    },
    /// Ask the issuer to authorize a download
    RequestDownloadUrl {
        /// Key the object was uploaded under
        key: String,
    },
}

/// Output of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Change what the user sees
    Render(View),
    /// Perform a network step and report back
    Perform(Command),
}

/// Inputs to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// User picked a file
    FileChosen(SelectedFile),
    /// User asked to upload the selected file
    UploadRequested,
    /// Issuer returned the upload URL
    UploadUrlIssued(SignedUrlResponse),
    /// Object store accepted the bytes
    TransferCompleted,
    /// Issuer returned the download URL
    DownloadUrlIssued(SignedUrlResponse),
    /// The current network step failed
    StepFailed(String),
    /// User acknowledged the error
    ErrorDismissed,
    /// User started over
    Reset,
}

impl Event {
    /// Short name for diagnostics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FileChosen(_) => "file chosen",
            Self::UploadRequested => "upload requested",
            Self::UploadUrlIssued(_) => "upload URL issued",
            Self::TransferCompleted => "transfer completed",
            Self::DownloadUrlIssued(_) => "download URL issued",
            Self::StepFailed(_) => "step failed",
            Self::ErrorDismissed => "error dismissed",
            Self::Reset => "reset",
        }
    }
}

type Transition = Result<(UploadState, Vec<Effect>), (UploadState, TransitionError)>;

/// Drives one file at a time through the upload sequence
#[derive(Debug)]
pub struct UploadMachine {
    state: UploadState,
    max_file_size: u64,
}

impl UploadMachine {
    /// Idle machine accepting files up to `max_file_size` bytes
    #[must_use]
    pub const fn new(max_file_size: u64) -> Self {
        Self {
            state: UploadState::Idle,
            max_file_size,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &UploadState {
        &self.state
    }

    /// Applies `event`, returning the effects to carry out in order
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when `event` is not valid in the current
    /// state; the state is left untouched in that case.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let state = std::mem::replace(&mut self.state, UploadState::Idle);

        match Self::transition(state, event, self.max_file_size) {
            Ok((next, effects)) => {
                tracing::debug!(state = next.name(), "Upload state changed");
                self.state = next;
                Ok(effects)
            }
            Err((state, err)) => {
                self.state = state;
                Err(err)
            }
        }
    }

    fn transition(state: UploadState, event: Event, max_file_size: u64) -> Transition {
        match (state, event) {
            (state, Event::FileChosen(file)) => Self::select(state, file, max_file_size),

            (UploadState::FileSelected(file), Event::UploadRequested) => {
                let request = UploadUrlRequest {
                    file_name: file.file.name.clone(),
                    file_type: Some(file.file.media_type.to_string()),
                    file_size: Some(file.file.size),
                };

                Ok((
                    UploadState::Uploading {
                        file,
                        phase: UploadPhase::RequestingUrl,
                    },
                    vec![
                        Effect::Render(View::Progress(Checkpoint::RequestingUrl)),
                        Effect::Perform(Command::RequestUploadUrl(request)),
                    ],
                ))
            }
            (UploadState::Idle, Event::UploadRequested) => {
                Err((UploadState::Idle, TransitionError::NoFileSelected))
            }

            (
                UploadState::Uploading {
                    file,
                    phase: UploadPhase::RequestingUrl,
                },
                Event::UploadUrlIssued(signed),
            ) => {
                if signed.url.is_empty() {
                    return Ok(Self::fail(file, &UploadError::UploadUrl));
                }
                // The download step must address the very object being uploaded
                if signed.key != file.file.name {
                    let err = UploadError::KeyMismatch {
                        requested: file.file.name.clone(),
                        returned: signed.key,
                    };
                    return Ok(Self::fail(file, &err));
                }

                let command = Command::Transfer {
                    url: signed.url,
                    contents: file.file.contents.clone(),
                    media_type: file.file.media_type.clone(),
                };

                Ok((
                    UploadState::Uploading {
                        file,
                        phase: UploadPhase::Transferring { key: signed.key },
                    },
                    vec![
                        Effect::Render(View::Progress(Checkpoint::Transferring)),
                        Effect::Perform(command),
                    ],
                ))
            }

            (
                UploadState::Uploading {
                    file,
                    phase: UploadPhase::Transferring { key },
                },
                Event::TransferCompleted,
            ) => {
                let command = Command::RequestDownloadUrl { key: key.clone() };

                Ok((
                    UploadState::Finalizing { file, key },
                    vec![
                        Effect::Render(View::Progress(Checkpoint::Finalizing)),
                        Effect::Perform(command),
                    ],
                ))
            }

            (UploadState::Finalizing { file, key }, Event::DownloadUrlIssued(signed)) => {
                if signed.url.is_empty() || signed.key != key {
                    return Ok(Self::fail(file, &UploadError::DownloadUrl));
                }

                let result = RenderedResult::new(file.kind, signed.url);

                Ok((
                    UploadState::Complete {
                        file,
                        result: result.clone(),
                    },
                    vec![
                        Effect::Render(View::Progress(Checkpoint::Complete)),
                        Effect::Render(View::HideProgress),
                        Effect::Render(View::Result(result)),
                    ],
                ))
            }

            (
                UploadState::Uploading { file, .. } | UploadState::Finalizing { file, .. },
                Event::StepFailed(cause),
            ) => Ok(Self::fail(file, &cause)),

            (UploadState::Error { retained, .. }, Event::ErrorDismissed) => {
                let next = retained.map_or(UploadState::Idle, UploadState::FileSelected);
                Ok((next, vec![Effect::Render(View::HideError)]))
            }

            (state, Event::Reset) if state.is_busy() => Err((state, TransitionError::Busy)),
            (state, Event::Reset) => {
                let mut effects = Vec::new();
                if state.staged().is_some() {
                    effects.push(Effect::Render(View::RevokePreview));
                }
                effects.extend([
                    Effect::Render(View::HideResult),
                    Effect::Render(View::HideError),
                    Effect::Render(View::HideProgress),
                ]);
                Ok((UploadState::Idle, effects))
            }

            (state, Event::UploadRequested) if state.is_busy() => {
                Err((state, TransitionError::Busy))
            }
            (state, event) => {
                let err = TransitionError::Unexpected {
                    event: event.name(),
                    state: state.name(),
                };
                Err((state, err))
            }
        }
    }

    /// Selection abandons whatever file was held before
    fn select(state: UploadState, file: SelectedFile, max_file_size: u64) -> Transition {
        let mut effects = Vec::new();

        let previous = match state {
            UploadState::Uploading { .. } | UploadState::Finalizing { .. } => {
                return Err((state, TransitionError::Busy));
            }
            UploadState::Idle => None,
            UploadState::FileSelected(previous) => Some(previous),
            UploadState::Error { retained, .. } => retained,
            UploadState::Complete { .. } => {
                effects.push(Effect::Render(View::HideResult));
                effects.push(Effect::Render(View::RevokePreview));
                None
            }
        };

        match validate(&file, max_file_size) {
            Err(err) => {
                let message = err.to_string();
                tracing::info!(file = %file.name, "Rejected selection: {message}");
                effects.push(Effect::Render(View::Error(message.clone())));
                Ok((
                    UploadState::Error {
                        message,
                        retained: previous,
                    },
                    effects,
                ))
            }
            Ok(kind) => {
                if previous.is_some() {
                    effects.push(Effect::Render(View::RevokePreview));
                }
                let staged = StagedFile { file, kind };
                effects.push(Effect::Render(View::HideError));
                effects.push(Effect::Render(View::Preview(staged.preview())));
                Ok((UploadState::FileSelected(staged), effects))
            }
        }
    }

    /// Aborts the sequence, keeping the file so the user can start over
    fn fail(file: StagedFile, cause: &dyn std::fmt::Display) -> (UploadState, Vec<Effect>) {
        let message = format!("Upload failed: {cause}");
        (
            UploadState::Error {
                message: message.clone(),
                retained: Some(file),
            },
            vec![
                Effect::Render(View::HideProgress),
                Effect::Render(View::Error(message)),
            ],
        )
    }
}
