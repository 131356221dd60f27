//! Media content types and the object keys they are stored under
//!
//! Every program's media lives under `programs/{program title}/`, split by
//! kind of media:
//! - `video/src/` for source videos (mp4, quicktime)
//! - `pdf/` for documents
//! - `html/` for rendered lessons

use std::fmt;
use std::str::FromStr;

use crate::types::MediaUploadError;

/// Media types accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaContentType {
    Mp4,
    QuickTime,
    Pdf,
    Html,
}

impl MediaContentType {
    /// MIME type, as sent in the `Content-Type` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaContentType::Mp4 => "video/mp4",
            MediaContentType::QuickTime => "video/quicktime",
            MediaContentType::Pdf => "application/pdf",
            MediaContentType::Html => "text/html",
        }
    }

    /// Path prefix inside the program's folder, always ending in `/`
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaContentType::Mp4 | MediaContentType::QuickTime => "video/src/",
            MediaContentType::Pdf => "pdf/",
            MediaContentType::Html => "html/",
        }
    }
}

impl fmt::Display for MediaContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaContentType {
    type Err = MediaUploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video/mp4" => Ok(MediaContentType::Mp4),
            "video/quicktime" => Ok(MediaContentType::QuickTime),
            "application/pdf" => Ok(MediaContentType::Pdf),
            "text/html" => Ok(MediaContentType::Html),
            other => Err(MediaUploadError::UnsupportedContentType(other.to_string())),
        }
    }
}

/// Build the object key for a program media file.
///
/// Keys are not made unique: uploading the same file name twice for the same
/// program and content type targets the same object.
pub fn object_key(program_title: &str, content_type: MediaContentType, file_name: &str) -> String {
    format!(
        "programs/{}/{}{}",
        program_title,
        content_type.prefix(),
        file_name
    )
}
