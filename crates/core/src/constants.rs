//! Constants used throughout the hub core crate.
//!
//! Limits, defaults and file-type rules live here so the mutators and the HTTP
//! layer agree on them.

/// Default content root when no explicit directory is configured.
pub const DEFAULT_CONTENT_DIR: &str = "content";

/// Directory created under the system temp dir for in-flight uploads by default.
pub const DEFAULT_UPLOAD_DIR_NAME: &str = "learning-hub-uploads";

/// Largest accepted upload (1 GiB). Enforced by the upload-receiving layer.
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

/// Highest `n` probed when picking a ` (n)` suffix for a duplicate upload.
pub const MAX_DUPLICATE_PROBES: u32 = 10_000;

/// Generic MIME type browsers send when they cannot tell.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Top-level subjects walked first by the module catalogue.
pub const PREFERRED_SUBJECTS: [&str; 3] = ["english", "math", "science"];
