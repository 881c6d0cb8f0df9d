use hub_types::NameError;

/// Coarse error categories exposed to API layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad name, missing field, wrong file type, wrong node type
    InvalidInput,
    /// Path resolved outside the content root
    PathConfinement,
    NotFound,
    /// Name collision with no dedup policy
    Conflict,
    UnsupportedMediaType,
    /// A disk operation failed after its fallback chain was exhausted
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),
    #[error("invalid path")]
    PathConfinement,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    NotADirectory(&'static str),
    #[error("{0}")]
    NotAFile(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("too many duplicates of {0}")]
    TooManyDuplicates(String),
    #[error("{action}: {source}")]
    Filesystem {
        action: &'static str,
        #[source]
        source: hub_files::FilesError,
    },
    #[error("{action}: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ContentError {
    pub(crate) fn io(action: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| ContentError::Io { action, source }
    }

    pub(crate) fn fs(action: &'static str) -> impl FnOnce(hub_files::FilesError) -> Self {
        move |source| ContentError::Filesystem { action, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::InvalidInput(_)
            | ContentError::InvalidName(_)
            | ContentError::NotADirectory(_)
            | ContentError::NotAFile(_) => ErrorKind::InvalidInput,
            ContentError::PathConfinement => ErrorKind::PathConfinement,
            ContentError::NotFound(_) => ErrorKind::NotFound,
            ContentError::Conflict(_) => ErrorKind::Conflict,
            ContentError::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            ContentError::TooManyDuplicates(_)
            | ContentError::Filesystem { .. }
            | ContentError::Io { .. }
            | ContentError::Join(_) => ErrorKind::Io,
        }
    }

    /// Message safe to show a client. Never contains an on-disk path or OS error text.
    pub fn public_message(&self) -> String {
        match self {
            ContentError::InvalidInput(msg) => msg.clone(),
            ContentError::InvalidName(e) => e.to_string(),
            ContentError::PathConfinement => "Invalid path".into(),
            ContentError::NotFound(msg)
            | ContentError::NotADirectory(msg)
            | ContentError::NotAFile(msg)
            | ContentError::Conflict(msg) => (*msg).into(),
            ContentError::UnsupportedMediaType(_) => "Only PDF and MP4 files are allowed".into(),
            ContentError::TooManyDuplicates(_) => "Too many files with that name".into(),
            ContentError::Filesystem { action, .. } | ContentError::Io { action, .. } => {
                (*action).into()
            }
            ContentError::Join(_) => "Internal error".into(),
        }
    }

    /// OS error code behind an I/O failure, for logs.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            ContentError::Filesystem { source, .. } => source.raw_os_error(),
            ContentError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
