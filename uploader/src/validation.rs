//! File checks performed before any network call

use std::{io, path::Path};

use bytes::Bytes;
use mime::Mime;
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

/// Default upper bound on the file size, 100 MiB
pub const MAX_FILE_SIZE: u64 = 100 * MIB;

/// Kind of media the uploader knows how to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Any `image/*` type
    Image,
    /// Any `video/*` type
    Video,
}

impl MediaKind {
    /// Kind for `media_type`, `None` for anything that is not image or video
    #[must_use]
    pub fn from_media_type(media_type: &Mime) -> Option<Self> {
        let top_level = media_type.type_();
        if top_level == mime::IMAGE {
            Some(Self::Image)
        } else if top_level == mime::VIDEO {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Element used to display this kind inline
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Image => "img",
            Self::Video => "video",
        }
    }
}

/// A file picked by the user, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name, used verbatim as the object key
    pub name: String,
    /// Declared media type
    pub media_type: Mime,
    /// Size in bytes
    pub size: u64,
    /// Raw contents
    pub contents: Bytes,
}

impl SelectedFile {
    /// Wraps in-memory contents, the size is taken from them
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: Mime, contents: impl Into<Bytes>) -> Self {
        let contents = contents.into();
        Self {
            name: name.into(),
            media_type,
            size: contents.len() as u64,
            contents,
        }
    }

    /// Opens a file from disk, reading its contents only if it would be accepted
    ///
    /// Files that fail [`validate`] are returned with their on-disk size and no
    /// contents, so the rejection is reported without buffering them.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be inspected or read
    pub async fn open(
        path: &Path,
        name: impl Into<String>,
        media_type: Mime,
        max_file_size: u64,
    ) -> io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let unread = Self {
            name: name.into(),
            media_type,
            size: metadata.len(),
            contents: Bytes::new(),
        };

        if validate(&unread, max_file_size).is_err() {
            return Ok(unread);
        }

        let contents = tokio::fs::read(path).await?;
        Ok(Self::new(unread.name, unread.media_type, contents))
    }
}

/// Reasons a file is refused at selection time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Media type outside `image/*` and `video/*`
    #[error("Please select an image or video file.")]
    UnsupportedType(Mime),

    /// File larger than the configured limit
    #[error("File size must be less than {}MB.", .limit / MIB)]
    TooLarge {
        /// Size of the rejected file
        size: u64,
        /// Configured limit
        limit: u64,
    },
}

/// Checks type then size, returning how the file will be displayed
///
/// # Errors
///
/// Returns [`ValidationError`] for unsupported types or oversized files
pub fn validate(file: &SelectedFile, max_file_size: u64) -> Result<MediaKind, ValidationError> {
    let kind = MediaKind::from_media_type(&file.media_type)
        .ok_or_else(|| ValidationError::UnsupportedType(file.media_type.clone()))?;

    if file.size > max_file_size {
        return Err(ValidationError::TooLarge {
            size: file.size,
            limit: max_file_size,
        });
    }

    Ok(kind)
}
