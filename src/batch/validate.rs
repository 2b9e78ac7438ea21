//! Candidate path validation.

use crate::batch::ResultLog;
use crate::config::expand_user;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Basename of a path string, falling back to the whole string.
pub fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Filter candidates to existing regular files.
///
/// Rejected entries get a `<basename>-><reason>` line in the result log and a
/// warning on the operational log; they are excluded from processing without
/// aborting the batch.
pub fn validate_candidates(candidates: &[String], log: &mut ResultLog) -> Vec<PathBuf> {
    let mut accepted = Vec::new();

    for candidate in candidates {
        let resolved = expand_user(candidate);
        if !resolved.exists() {
            warn!("Skipping missing input: {candidate}");
            log.push(format!("{}->Missing input", basename(candidate)));
            continue;
        }
        if resolved.is_dir() {
            warn!("Skipping directory input: {candidate}");
            log.push(format!("{}->Input is a directory", basename(candidate)));
            continue;
        }
        accepted.push(resolved);
    }

    info!("Collected {} input file(s)", accepted.len());
    accepted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_basename() {
        assert_eq!(basename("/data/in/a.wav"), "a.wav");
        assert_eq!(basename("a.wav"), "a.wav");
    }

    #[test]
    fn test_missing_input_logged_and_excluded() {
        let mut log = ResultLog::new();
        let accepted = validate_candidates(&["/no/such/file.wav".into()], &mut log);
        assert!(accepted.is_empty());
        assert_eq!(log.lines(), ["file.wav->Missing input"]);
    }

    #[test]
    fn test_directory_input_logged_and_excluded() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("music");
        std::fs::create_dir(&sub).unwrap();

        let mut log = ResultLog::new();
        let accepted = validate_candidates(&[sub.to_string_lossy().into_owned()], &mut log);
        assert!(accepted.is_empty());
        assert_eq!(log.lines(), ["music->Input is a directory"]);
    }

    #[test]
    fn test_existing_file_accepted_without_log_line() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.wav");
        std::fs::write(&file, b"x").unwrap();

        let mut log = ResultLog::new();
        let accepted = validate_candidates(&[file.to_string_lossy().into_owned()], &mut log);
        assert_eq!(accepted, vec![file]);
        assert!(log.lines().is_empty());
    }
}
