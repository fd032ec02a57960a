//! In-process removal of pipeline leftovers
//!
//! Targets are resolved against the step's working directory. A target holding
//! glob metacharacters is matched against the names of the directory's direct
//! entries; any other target names a single path. Missing paths are skipped,
//! as `rm -rf` would.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::types::StepFailure;

fn is_pattern(target: &str) -> bool {
    target.contains(['*', '?', '[', '{'])
}

/// Remove every target, returning the paths that were actually deleted
pub fn remove_targets(working_dir: &Path, targets: &[String]) -> Result<Vec<PathBuf>, StepFailure> {
    let mut removed = Vec::new();

    let mut pattern_builder = GlobSetBuilder::new();
    let mut has_patterns = false;
    for target in targets {
        if is_pattern(target) {
            let glob = Glob::new(target).map_err(|e| StepFailure::Cleanup {
                path: working_dir.join(target),
                source: io::Error::new(io::ErrorKind::InvalidInput, e),
            })?;
            pattern_builder.add(glob);
            has_patterns = true;
        } else {
            let path = working_dir.join(target);
            if remove_path(&path)? {
                removed.push(path);
            }
        }
    }

    if has_patterns {
        let patterns = pattern_builder.build().map_err(|e| StepFailure::Cleanup {
            path: working_dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, e),
        })?;
        let entries = fs::read_dir(working_dir).map_err(|source| StepFailure::Cleanup {
            path: working_dir.to_path_buf(),
            source,
        })?;
        removed.extend(remove_matching(
            working_dir,
            &patterns,
            entries.map(|entry| entry.map(|entry| entry.path())),
        )?);
    }

    debug!(dir = %working_dir.display(), count = removed.len(), "removed cleanup targets");
    Ok(removed)
}

/// Remove listed entries whose file name matches. A listing error fails the cleanup.
fn remove_matching(
    working_dir: &Path,
    patterns: &GlobSet,
    entries: impl Iterator<Item = io::Result<PathBuf>>,
) -> Result<Vec<PathBuf>, StepFailure> {
    let mut removed = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| StepFailure::Cleanup {
            path: working_dir.to_path_buf(),
            source,
        })?;
        if path.file_name().is_some_and(|name| patterns.is_match(name)) && remove_path(&path)? {
            removed.push(path);
        }
    }
    Ok(removed)
}

/// Returns false when there was nothing to remove
fn remove_path(path: &Path) -> Result<bool, StepFailure> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(StepFailure::Cleanup {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|source| StepFailure::Cleanup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "x").unwrap();
    }

    #[test]
    fn test_removes_named_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let matches = temp_dir.path().join("matches");
        fs::create_dir_all(matches.join("nested")).unwrap();
        touch(&matches, "sfm_data.json");

        let removed = remove_targets(temp_dir.path(), &["matches".to_string()]).unwrap();

        assert_eq!(removed, vec![matches.clone()]);
        assert!(!matches.exists());
    }

    #[test]
    fn test_missing_targets_are_not_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let removed = remove_targets(
            temp_dir.path(),
            &["reconstruction_global".to_string(), "*.dmap".to_string()],
        )
        .unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_patterns_only_touch_matching_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        touch(dir, "depth0001.dmap");
        touch(dir, "depth0002.dmap");
        touch(dir, "scene_dense.mvs");
        touch(dir, "scene_dense_mesh_refine_texture.ply");
        touch(dir, "scene_dense_mesh_refine_texture0.png");

        let targets = vec!["*.dmap".to_string(), "scene_dense.mvs".to_string()];
        let removed = remove_targets(dir, &targets).unwrap();

        assert_eq!(removed.len(), 3);
        assert!(!dir.join("depth0001.dmap").exists());
        assert!(!dir.join("scene_dense.mvs").exists());
        assert!(dir.join("scene_dense_mesh_refine_texture.ply").exists());
        assert!(dir.join("scene_dense_mesh_refine_texture0.png").exists());
    }

    #[test]
    fn test_listing_error_fails_cleanup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        touch(dir, "depth0001.dmap");

        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("*.dmap").unwrap());
        let patterns = builder.build().unwrap();
        let entries = vec![
            Ok(dir.join("depth0001.dmap")),
            Err(io::Error::from(io::ErrorKind::PermissionDenied)),
        ];

        let err = remove_matching(dir, &patterns, entries.into_iter()).unwrap_err();

        match err {
            StepFailure::Cleanup { path, source } => {
                assert_eq!(path, dir);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected failure: {other}"),
        }
    }

    #[test]
    fn test_pattern_in_missing_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = remove_targets(&temp_dir.path().join("omvs"), &["*.logs".to_string()]).unwrap_err();
        assert!(matches!(err, StepFailure::Cleanup { .. }));
    }
}
