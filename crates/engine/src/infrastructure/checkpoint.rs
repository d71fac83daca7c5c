//! Rebuild checkpoint file.
//!
//! Holds the name of the last descriptor whose drop+recreate began, as plain
//! text. Written before each step, so an interrupted step is repeated on the
//! next run (at-least-once), never skipped.

use std::path::{Path, PathBuf};

use crate::infrastructure::ports::FileError;

#[derive(Debug, Clone)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded descriptor name; `None` if the file is absent or blank.
    pub fn read(&self) -> Result<Option<String>, FileError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| FileError::io("read", &self.path, e))?;
        let name = contents.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    /// Overwrite the checkpoint with `name`.
    pub fn write(&self, name: &str) -> Result<(), FileError> {
        std::fs::write(&self.path, name).map_err(|e| FileError::io("write", &self.path, e))
    }

    /// Remove the checkpoint so the next run starts from the beginning.
    pub fn clear(&self) -> Result<(), FileError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileError::io("remove", &self.path, e)),
        }
    }
}
