use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scratch directory holding the run's audio files.
///
/// Purely a debugging aid: upload always works from the in-memory bytes, so
/// a failed spool write costs nothing but the local copy. File names must be
/// namespaced by record id and field kind by the caller.
pub struct AudioSpool {
    dir: PathBuf,
}

impl AudioSpool {
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write one audio artifact under the spool directory
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Remove the spool directory and everything in it
    pub fn cleanup(&self) -> io::Result<()> {
        fs::remove_dir_all(&self.dir)
    }
}
