//! Input path collection and normalization.
//!
//! A batch's inputs arrive as a free-form root string (possibly several
//! newline-delimited, optionally quoted lines naming files or directories)
//! plus an optional list of heterogeneous path-like entries. Collection
//! flattens both into one deduplicated, order-preserving candidate list.

use crate::config::expand_user;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// A path-like entry from an explicit input list.
///
/// Manifest files and API callers supply either a bare string or a mapping
/// carrying the path under a `name` or `path` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathEntry {
    /// Mapping-like entry; `name` takes priority over `path`.
    Tagged {
        /// Name-like field, checked first.
        #[serde(default)]
        name: Option<String>,
        /// Path field, used when `name` is absent or empty.
        #[serde(default)]
        path: Option<String>,
    },
    /// A bare path string.
    Raw(String),
}

impl PathEntry {
    /// Extract the candidate string: `name`, then `path`, else the raw value.
    ///
    /// `path` is consulted only when `name` is absent or exactly empty; a
    /// whitespace-only `name` is taken as the candidate and discarded once it
    /// trims to empty, shadowing any `path` value.
    fn candidate(&self) -> Option<String> {
        let raw = match self {
            Self::Tagged { name, path } => name
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(path.as_deref())?,
            Self::Raw(s) => s,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Trim surrounding whitespace and single/double quotes from a root line or
/// output-directory string.
pub fn trim_quoted(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Collect candidate paths from the root string and explicit entries.
///
/// Root lines naming a directory contribute the directory's immediate file
/// children in lexicographic order (subdirectories are not recursed into);
/// lines naming a file contribute that file; other lines are dropped.
/// Explicit entries follow the root-derived candidates. The result is
/// deduplicated by exact string equality, first occurrence winning.
pub fn collect_candidates(input_root: &str, extra: &[PathEntry]) -> Vec<String> {
    let mut candidates = Vec::new();

    for line in input_root.replace('\r', "\n").split('\n') {
        let cleaned = trim_quoted(line);
        if cleaned.is_empty() {
            continue;
        }
        let root = expand_user(cleaned);
        if root.is_dir() {
            candidates.extend(directory_children(&root));
        } else if root.is_file() {
            candidates.push(root.to_string_lossy().into_owned());
        }
        // Nonexistent root lines are dropped without a diagnostic; only
        // explicit entries get a validation line later.
    }

    for entry in extra {
        if let Some(candidate) = entry.candidate() {
            candidates.push(candidate);
        }
    }

    dedup_first_seen(candidates)
}

/// Immediate file children of a directory, lexicographically ordered.
fn directory_children(dir: &std::path::Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    children.sort();

    children
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

/// Deduplicate preserving first-seen order; exact string equality is the key.
fn dedup_first_seen(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &std::path::Path, name: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, b"x").unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_trim_quoted() {
        assert_eq!(trim_quoted("  \"/data/in\"  "), "/data/in");
        assert_eq!(trim_quoted("'/data/in'"), "/data/in");
        assert_eq!(trim_quoted(" plain "), "plain");
        assert_eq!(trim_quoted("\" padded \""), "padded");
    }

    #[test]
    fn test_directory_children_lexicographic_files_only() {
        let dir = TempDir::new().unwrap();
        let b = touch(dir.path(), "b.wav");
        let a = touch(dir.path(), "a.wav");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "nested.wav");

        let collected = collect_candidates(&dir.path().to_string_lossy(), &[]);
        assert_eq!(collected, vec![a, b]);
    }

    #[test]
    fn test_multiline_root_with_quotes() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.wav");
        let b = touch(dir.path(), "b.wav");

        let root = format!("\"{a}\"\r\n  '{b}'  \n\n");
        assert_eq!(collect_candidates(&root, &[]), vec![a, b]);
    }

    #[test]
    fn test_nonexistent_root_line_dropped_silently() {
        let collected = collect_candidates("/definitely/not/here.wav", &[]);
        assert!(collected.is_empty());
    }

    #[test]
    fn test_entry_extraction_priority() {
        let entries = vec![
            PathEntry::Tagged {
                name: Some("named.wav".into()),
                path: Some("ignored.wav".into()),
            },
            PathEntry::Tagged {
                name: None,
                path: Some("pathed.wav".into()),
            },
            PathEntry::Tagged {
                name: Some(String::new()),
                path: Some("fallback.wav".into()),
            },
            PathEntry::Raw("  raw.wav  ".into()),
            PathEntry::Raw(String::new()),
            PathEntry::Tagged {
                name: None,
                path: None,
            },
        ];
        let collected = collect_candidates("", &entries);
        assert_eq!(collected, vec!["named.wav", "pathed.wav", "fallback.wav", "raw.wav"]);
    }

    #[test]
    fn test_whitespace_name_shadows_path() {
        // A non-empty name is always the candidate; when it trims to nothing
        // the whole entry is dropped, never falling back to `path`.
        let entries = vec![
            PathEntry::Tagged {
                name: Some("   ".into()),
                path: Some("shadowed.wav".into()),
            },
            PathEntry::Raw("kept.wav".into()),
        ];
        assert_eq!(collect_candidates("", &entries), vec!["kept.wav"]);
    }

    #[test]
    fn test_dedup_first_seen_across_root_and_entries() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.wav");

        let collected = collect_candidates(
            &dir.path().to_string_lossy(),
            &[PathEntry::Raw(a.clone()), PathEntry::Raw("other.wav".into())],
        );
        assert_eq!(collected, vec![a, "other.wav".to_string()]);
    }

    #[test]
    fn test_path_entry_deserializes_from_json() {
        let entries: Vec<PathEntry> =
            serde_json::from_str(r#"["plain.wav", {"name": "n.wav"}, {"path": "p.wav"}]"#).unwrap();
        let collected = collect_candidates("", &entries);
        assert_eq!(collected, vec!["plain.wav", "n.wav", "p.wav"]);
    }
}
