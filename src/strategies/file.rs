//! File strategy implementation

use crate::core::{LoggerError, Result, Strategy};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o755;

/// Appends every payload to a file.
///
/// Built with [`FileStrategy::new`], a path that cannot be opened yields an
/// unavailable strategy: construction succeeds and every write fails with
/// `FileUnavailable`, which the delivery loop reports.
pub struct FileStrategy {
    path: PathBuf,
    file: Option<Mutex<File>>,
    lock_file: bool,
}

impl FileStrategy {
    /// Open `path`, degrading to an unavailable strategy on failure
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match open_log_file(&path) {
            Ok(file) => Self {
                path,
                file: Some(Mutex::new(file)),
                lock_file: false,
            },
            Err(e) => {
                eprintln!("[LOGGER WARNING] {}", e);
                Self::unavailable(path)
            }
        }
    }

    /// Open `path`, surfacing `DirectoryUnavailable` / `FileUnavailable`
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_log_file(&path)?;
        Ok(Self {
            path,
            file: Some(Mutex::new(file)),
            lock_file: false,
        })
    }

    fn unavailable(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            lock_file: false,
        }
    }

    /// Hold an exclusive advisory lock on the file for each write
    ///
    /// Useful when several processes append to the same log file.
    #[must_use]
    pub fn with_file_lock(mut self, enable: bool) -> Self {
        self.lock_file = enable;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_available(&self) -> bool {
        self.file.is_some()
    }
}

impl Strategy for FileStrategy {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| LoggerError::file_unavailable(self.path.display().to_string(), None))?;

        let mut file = file.lock();
        if self.lock_file {
            FileExt::lock_exclusive(&*file)?;
        }
        let result = file.write_all(buf);
        if self.lock_file {
            FileExt::unlock(&*file)?;
        }
        result?;
        Ok(buf.len())
    }

    fn flush(&self) -> Result<()> {
        if let Some(ref file) = self.file {
            file.lock().flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if path.as_os_str().is_empty() {
        return Err(LoggerError::directory_unavailable("", None));
    }
    create_parent_dir(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::file_unavailable(path.display().to_string(), Some(e)))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIRECTORY_MODE);
    }
    builder
        .create(dir)
        .map_err(|e| LoggerError::directory_unavailable(dir.display().to_string(), Some(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("deeper").join("info.log");

        let strategy = FileStrategy::try_new(&path).expect("open file strategy");
        assert!(strategy.is_available());
        strategy.write(b"2025-01-08T10:30:45Z;Hello, ALog!\n").expect("write");
        strategy.flush().expect("flush");

        let content = fs::read_to_string(&path).expect("read log file");
        assert_eq!(content, "2025-01-08T10:30:45Z;Hello, ALog!\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("append.log");
        fs::write(&path, "existing\n").expect("seed file");

        let strategy = FileStrategy::new(&path).with_file_lock(true);
        strategy.write(b"appended\n").expect("write");

        let content = fs::read_to_string(&path).expect("read log file");
        assert_eq!(content, "existing\nappended\n");
    }

    #[test]
    fn test_empty_path_degrades() {
        let strategy = FileStrategy::new("");
        assert!(!strategy.is_available());

        let err = strategy.write(b"dropped").unwrap_err();
        assert!(matches!(err, LoggerError::FileUnavailable { .. }));
    }

    #[test]
    fn test_try_new_surfaces_errors() {
        let err = FileStrategy::try_new("").err().expect("empty path must fail");
        assert!(matches!(err, LoggerError::DirectoryUnavailable { .. }));

        // a directory cannot be opened for appending
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = FileStrategy::try_new(temp_dir.path()).err().expect("directory must fail");
        assert!(matches!(err, LoggerError::FileUnavailable { .. }));
    }
}
