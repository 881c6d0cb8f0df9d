//! # Hub Core
//!
//! Content tree operations for the Learning Hub.
//!
//! This crate owns every read and write against the content root:
//! - Confinement of client virtual paths ([`PathResolver`])
//! - One-level listings and the recursive module catalogue
//! - Folder create / rename / delete and file upload / rename / delete
//! - The async [`ContentService`] façade used by the REST server and the CLI
//!
//! **No API concerns**: authentication, HTTP routing and multipart parsing belong in
//! `api-rest` and `api-shared`.

pub mod catalogue;
pub mod config;
pub mod constants;
mod error;
pub mod files;
pub mod folders;
pub mod listing;
pub mod mime;
pub mod resolver;
pub mod service;

pub use config::CoreConfig;
pub use error::{ContentError, ContentResult, ErrorKind};
pub use files::{FileMutator, IncomingFile};
pub use folders::FolderMutator;
pub use resolver::{PathResolver, ResolvedPath};
pub use service::ContentService;
