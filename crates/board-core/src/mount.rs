//! Places a rendered view can be attached to.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{BoardError, Result};

/// Receives the complete SVG document of a view every time it changes.
pub trait Mount: Send {
    fn replace_children(&mut self, svg: &str) -> std::io::Result<()>;
}

/// Where a view should be attached.
pub enum Target {
    /// An SVG file; its directory must already exist.
    Path(PathBuf),
    Mount(Box<dyn Mount>),
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Target::Mount(_) => f.write_str("Mount(..)"),
        }
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::Path(path)
    }
}

impl From<&str> for Target {
    fn from(path: &str) -> Self {
        Target::Path(PathBuf::from(path))
    }
}

impl Target {
    /// Resolve the target to something that can be rendered into.
    pub fn resolve(self) -> Result<Box<dyn Mount>> {
        match self {
            Target::Mount(mount) => Ok(mount),
            Target::Path(path) => {
                let dir_exists = match path.parent() {
                    Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
                    _ => true,
                };
                if !dir_exists || path.is_dir() {
                    return Err(BoardError::TargetNotFound(path.display().to_string()));
                }
                Ok(Box::new(FileMount { path }))
            }
        }
    }
}

/// Writes each document to a file, replacing its contents.
#[derive(Debug)]
pub struct FileMount {
    path: PathBuf,
}

impl Mount for FileMount {
    fn replace_children(&mut self, svg: &str) -> std::io::Result<()> {
        fs::write(&self.path, svg)
    }
}

/// Keeps the latest document in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryMount {
    document: Arc<Mutex<String>>,
}

impl MemoryMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> String {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Mount for MemoryMount {
    fn replace_children(&mut self, svg: &str) -> std::io::Result<()> {
        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        document.clear();
        document.push_str(svg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_not_found() {
        let target = Target::from("/definitely/not/a/real/dir/board.svg");
        assert!(matches!(target.resolve(), Err(BoardError::TargetNotFound(_))));
    }

    #[test]
    fn test_memory_mount_shares_document() {
        let mount = MemoryMount::new();
        let mut attached: Box<dyn Mount> = Box::new(mount.clone());
        attached.replace_children("<svg/>").unwrap();
        assert_eq!(mount.document(), "<svg/>");
    }
}
