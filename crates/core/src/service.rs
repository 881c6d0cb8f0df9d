//! Async façade over the content tree.
//!
//! Each operation checks that its required inputs are present and then runs the whole
//! blocking sequence on tokio's blocking pool, so a slow disk never stalls the runtime
//! and the steps of one request stay in order.

use crate::catalogue::list_modules;
use crate::config::CoreConfig;
use crate::files::{FileMutator, IncomingFile};
use crate::folders::FolderMutator;
use crate::listing::list_nodes;
use crate::{ContentError, ContentResult};
use api_shared::wire::{ListNodesRes, ModuleRes, NodeRes};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ContentService {
    cfg: Arc<CoreConfig>,
}

impl ContentService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Where upload receivers should write scratch files before calling
    /// [`ContentService::upload_file`].
    pub fn scratch_dir(&self) -> &Path {
        self.cfg.upload_scratch_dir()
    }

    async fn blocking<T, F>(&self, op: F) -> ContentResult<T>
    where
        F: FnOnce(&CoreConfig) -> ContentResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let cfg = Arc::clone(&self.cfg);
        tokio::task::spawn_blocking(move || op(&cfg)).await?
    }

    /// Lists one folder. A missing path lists the root.
    pub async fn list_nodes(&self, path: Option<String>) -> ContentResult<ListNodesRes> {
        let path = path
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "/".to_owned());
        self.blocking(move |cfg| list_nodes(cfg.resolver(), &path))
            .await
    }

    /// Every visible file below the subject folders.
    pub async fn catalogue(&self) -> ContentResult<Vec<ModuleRes>> {
        self.blocking(|cfg| Ok(list_modules(cfg.content_root())))
            .await
    }

    pub async fn create_folder(
        &self,
        parent: Option<String>,
        name: Option<String>,
    ) -> ContentResult<NodeRes> {
        let parent = required(parent, "path")?;
        let name = required(name, "name")?;
        self.blocking(move |cfg| FolderMutator::new(cfg.resolver()).create(&parent, &name))
            .await
    }

    pub async fn rename_folder(
        &self,
        path: Option<String>,
        new_name: Option<String>,
    ) -> ContentResult<NodeRes> {
        let path = required(path, "path")?;
        let new_name = required(new_name, "newName")?;
        self.blocking(move |cfg| FolderMutator::new(cfg.resolver()).rename(&path, &new_name))
            .await
    }

    pub async fn delete_folder(&self, path: Option<String>) -> ContentResult<()> {
        let path = required(path, "path")?;
        self.blocking(move |cfg| FolderMutator::new(cfg.resolver()).delete(&path))
            .await
    }

    /// Moves a finished scratch upload into the folder at `dest`.
    ///
    /// The scratch file is removed on every failure, including a missing `dest`.
    pub async fn upload_file(
        &self,
        dest: Option<String>,
        file: Option<IncomingFile>,
    ) -> ContentResult<NodeRes> {
        let Some(file) = file else {
            return Err(ContentError::InvalidInput("Missing file".into()));
        };
        let dest = match required(dest, "path") {
            Ok(dest) => dest,
            Err(e) => {
                file.discard();
                return Err(e);
            }
        };
        self.blocking(move |cfg| FileMutator::new(cfg.resolver()).upload(&dest, &file))
            .await
    }

    pub async fn rename_file(
        &self,
        path: Option<String>,
        new_name: Option<String>,
    ) -> ContentResult<NodeRes> {
        let path = required(path, "path")?;
        let new_name = required(new_name, "newName")?;
        self.blocking(move |cfg| FileMutator::new(cfg.resolver()).rename(&path, &new_name))
            .await
    }

    pub async fn delete_file(&self, path: Option<String>) -> ContentResult<()> {
        let path = required(path, "path")?;
        self.blocking(move |cfg| FileMutator::new(cfg.resolver()).delete(&path))
            .await
    }
}

fn required(value: Option<String>, field: &str) -> ContentResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ContentError::InvalidInput(format!("Missing {field}")))
}
