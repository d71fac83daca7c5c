//! JSON-lines descriptor files.
//!
//! One `IndexDescriptor` object per line, in the order written. No envelope,
//! no trailing separators, so files can be concatenated or edited by hand.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use schemactl_domain::IndexDescriptor;

use crate::infrastructure::ports::FileError;

/// Read every descriptor in `path`, preserving file order.
///
/// Blank lines are skipped. Any unreadable or malformed line fails the whole
/// read; a partial catalog is never returned.
pub fn read_descriptors(path: &Path) -> Result<Vec<IndexDescriptor>, FileError> {
    let file = File::open(path).map_err(|e| FileError::io("open", path, e))?;
    let reader = BufReader::new(file);

    let mut descriptors = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FileError::io("read", path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let descriptor = serde_json::from_str(&line).map_err(|source| FileError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        descriptors.push(descriptor);
    }

    tracing::debug!(path = %path.display(), count = descriptors.len(), "Read descriptor file");
    Ok(descriptors)
}

/// Write `descriptors` to `path`, one per line, replacing any existing file.
pub fn write_descriptors(path: &Path, descriptors: &[IndexDescriptor]) -> Result<(), FileError> {
    let file = File::create(path).map_err(|e| FileError::io("create", path, e))?;
    let mut writer = BufWriter::new(file);

    for descriptor in descriptors {
        serde_json::to_writer(&mut writer, descriptor).map_err(|e| {
            FileError::io("write", path, std::io::Error::other(e))
        })?;
        writer
            .write_all(b"\n")
            .map_err(|e| FileError::io("write", path, e))?;
    }
    writer.flush().map_err(|e| FileError::io("flush", path, e))?;

    tracing::debug!(path = %path.display(), count = descriptors.len(), "Wrote descriptor file");
    Ok(())
}
