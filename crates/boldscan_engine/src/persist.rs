use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the directory that will hold the panel output exists.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Replaces the file at `target` in one step, so a reader never sees a half-written panel.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn write(&self, content: &str) -> Result<(), PersistError> {
        let dir = self
            .target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        ensure_output_dir(&dir)?;

        let mut tmp = if dir.as_os_str().is_empty() {
            NamedTempFile::new_in(".")?
        } else {
            NamedTempFile::new_in(&dir)?
        };
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parent_and_replaces_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("nested").join("panel.html");
        let writer = AtomicFileWriter::new(target.clone());

        writer.write("<div>first</div>").unwrap();
        writer.write("<div>second</div>").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "<div>second</div>");
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = ensure_output_dir(&blocker).unwrap_err();
        assert!(matches!(err, PersistError::OutputDir(_)));
    }
}
