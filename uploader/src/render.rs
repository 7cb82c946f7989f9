//! Display side of the uploader

use std::io::Write;

use crate::{state::Checkpoint, validation::MediaKind};

/// Where a displayed element reads its bytes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// The in-memory file, no network involved
    Local {
        /// Name of the selected file
        file_name: String,
        /// Size in bytes
        size: u64,
    },
    /// A signed download URL
    Remote(String),
}

/// An inline image or video element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaElement {
    /// Image or video
    pub kind: MediaKind,
    /// Source of the element
    pub source: MediaSource,
}

impl MediaElement {
    /// Element name, `img` or `video`
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Remote source URL, if any
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        match &self.source {
            MediaSource::Remote(url) => Some(url),
            MediaSource::Local { .. } => None,
        }
    }
}

/// Final display of an uploaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    /// Inline element pointing at the download URL
    pub element: MediaElement,
    /// Direct download link, same URL as the element
    pub download_link: String,
}

impl RenderedResult {
    /// Result display for an object reachable at `download_url`
    #[must_use]
    pub fn new(kind: MediaKind, download_url: String) -> Self {
        Self {
            element: MediaElement {
                kind,
                source: MediaSource::Remote(download_url.clone()),
            },
            download_link: download_url,
        }
    }
}

/// A single change to what the user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Show a local preview of the selected file
    Preview(MediaElement),
    /// Drop the local preview and release its resources
    RevokePreview,
    /// Move the progress bar to a checkpoint
    Progress(Checkpoint),
    /// Hide the progress bar
    HideProgress,
    /// Show the uploaded object
    Result(RenderedResult),
    /// Hide the uploaded object
    HideResult,
    /// Show the one error message, replacing any previous one
    Error(String),
    /// Hide the error message
    HideError,
}

/// Applies [`View`] changes to some output surface
pub trait Renderer {
    /// Applies `view`
    fn render(&mut self, view: View);
}

/// Renders to a terminal, one line per visible change
pub struct TerminalRenderer<W> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renders into `out`
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the renderer, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!("Failed to write to terminal: {e}");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: View) {
        match view {
            View::Preview(element) => {
                if let MediaSource::Local { file_name, size } = &element.source {
                    self.line(&format!(
                        "Preview: <{}> {file_name} ({size} bytes)",
                        element.tag()
                    ));
                }
            }
            View::Progress(checkpoint) => {
                self.line(&format!("[{:>3}%] {}", checkpoint.percent(), checkpoint.status()));
            }
            View::Result(result) => {
                if let Some(src) = result.element.src() {
                    self.line(&format!("<{} src=\"{src}\">", result.element.tag()));
                }
                self.line(&format!("Download File: {}", result.download_link));
            }
            View::Error(message) => self.line(&format!("Error: {message}")),
            View::RevokePreview => tracing::debug!("Released local preview"),
            View::HideProgress | View::HideResult | View::HideError => {}
        }
    }
}
