//! Extension-based MIME lookup and the upload media allow-list.

use crate::constants::OCTET_STREAM;

const MIME_TABLE: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("json", "application/json"),
    ("epub", "application/epub+zip"),
    ("zip", "application/zip"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// MIME type for a file name, from its extension. `None` when unknown.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Media types accepted into the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedMedia {
    Pdf,
    Mp4,
}

impl AllowedMedia {
    /// Classifies a file by extension alone (used for renames).
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(AllowedMedia::Pdf)
        } else if ext.eq_ignore_ascii_case("mp4") {
            Some(AllowedMedia::Mp4)
        } else {
            None
        }
    }

    /// Classifies an upload: the extension must be allowed and the declared MIME type
    /// must agree with it. A missing declaration counts as `application/octet-stream`.
    pub fn from_upload(name: &str, declared_mime: Option<&str>) -> Option<Self> {
        let media = Self::from_name(name)?;
        let declared = declared_mime
            .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| OCTET_STREAM.to_string());

        let consistent = match media {
            AllowedMedia::Pdf => declared == "application/pdf" || declared == OCTET_STREAM,
            AllowedMedia::Mp4 => declared.starts_with("video/") || declared == OCTET_STREAM,
        };
        consistent.then_some(media)
    }
}
