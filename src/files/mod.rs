//! Static file lookup.
//!
//! - **`resolver`**: decodes request targets and keeps them inside the document root
//! - **`policy`**: the extension allow-list and its content types
//!
//! [`Site`] ties the two together with the index document name. It is built
//! once at startup and shared read-only by every connection.

pub mod policy;
pub mod resolver;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::StaticFilesConfig;
use crate::http::error::ServeError;
use policy::{ExtensionPolicy, extension_of};
use resolver::{DocumentRoot, decode_target};

#[derive(Debug, Clone)]
pub struct Site {
    root: DocumentRoot,
    policy: ExtensionPolicy,
    index: String,
}

/// A file that passed every check, with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content_type: String,
}

impl Site {
    pub fn new(root: DocumentRoot, policy: ExtensionPolicy, index: impl Into<String>) -> Self {
        Self {
            root,
            policy,
            index: index.into(),
        }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> anyhow::Result<Self> {
        let root = DocumentRoot::open(&cfg.root)
            .with_context(|| format!("document root {} is not usable", cfg.root.display()))?;

        let policy = ExtensionPolicy::new(&cfg.extensions);
        if policy.is_empty() {
            anyhow::bail!("no file extensions are allowed; nothing could be served");
        }

        Ok(Self::new(root, policy, cfg.index.clone()))
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Maps a raw request target to the canonical path it names.
    pub async fn resolve(&self, target: &str) -> Result<PathBuf, ServeError> {
        let relative = decode_target(target, &self.index)?;
        Ok(self.root.resolve(&relative).await?)
    }

    /// Applies the extension allow-list to a resolved path.
    pub fn classify(&self, path: &Path) -> Result<StaticFile, ServeError> {
        match self.policy.classify(path) {
            Some(content_type) => Ok(StaticFile {
                path: path.to_path_buf(),
                content_type: content_type.to_string(),
            }),
            None => Err(ServeError::DisallowedExtension(
                extension_of(path).unwrap_or_default(),
            )),
        }
    }

    /// Reads an allowed file whole.
    pub async fn read(&self, file: &StaticFile) -> Result<Vec<u8>, ServeError> {
        match tokio::fs::metadata(&file.path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(self.not_found(file)),
            Err(e) if is_absent(&e) => return Err(self.not_found(file)),
            Err(e) => return Err(ServeError::Io(e)),
        }

        tokio::fs::read(&file.path).await.map_err(|e| {
            if is_absent(&e) {
                self.not_found(file)
            } else {
                ServeError::Io(e)
            }
        })
    }

    /// Names the missing file by its path under the root, never the full
    /// filesystem path.
    fn not_found(&self, file: &StaticFile) -> ServeError {
        let relative = file.path.strip_prefix(self.root()).unwrap_or(&file.path);
        ServeError::NotFound(format!("/{}", relative.display()))
    }
}

/// A path that runs through a regular file (`index.html/x.html`) fails with
/// `NotADirectory`; for the client that file simply does not exist.
fn is_absent(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
