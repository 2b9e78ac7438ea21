//! Temporary-file tracking for interrupted runs.
//!
//! Reformatted intermediates accumulate in the temp directory while a batch
//! runs. They are registered here so the Ctrl-C handler can remove them even
//! when the batch loop never reaches its own cleanup.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use tracing::{debug, warn};

static TEMP_FILES: LazyLock<Mutex<Vec<PathBuf>>> = LazyLock::new(|| Mutex::new(Vec::new()));

/// Register a temporary file for removal on shutdown.
pub fn register_temp(path: &Path) {
    if let Ok(mut files) = TEMP_FILES.lock() {
        debug!("Tracking temporary file {}", path.display());
        files.push(path.to_path_buf());
    }
}

/// Remove every registered temporary file. Missing files are ignored;
/// other removal failures are logged and skipped.
pub fn cleanup_all_temps() {
    let Ok(mut files) = TEMP_FILES.lock() else {
        return;
    };
    for path in files.drain(..) {
        match std::fs::remove_file(&path) {
            Ok(()) => debug!("Removed temporary file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove temporary {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_registered_temp_is_removed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("track.reformatted.wav");
        std::fs::write(&file, b"riff").unwrap();

        register_temp(&file);
        cleanup_all_temps();
        assert!(!file.exists());
    }

    #[test]
    fn test_cleanup_tolerates_missing_files() {
        register_temp(Path::new("/nonexistent/track.reformatted.wav"));
        cleanup_all_temps();
    }
}
