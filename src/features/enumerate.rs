//! Asset folder discovery.

use crate::trace::trace_warn;
use crate::util::{FrameMatchError, FrameMatchResult};
use std::path::{Path, PathBuf};

/// One candidate asset folder, identified by its basename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetFolder {
    path: PathBuf,
    id: String,
}

impl AssetFolder {
    /// Wraps a folder path; the id is the final path component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, id }
    }

    /// Returns the folder path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the folder id (basename).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the path of `file` inside this folder.
    pub fn file(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }
}

/// Expands `pattern` into candidate asset folders in glob iteration order.
///
/// Entries are not filtered by content; folders lacking images are handled by
/// the table builder. Entries that cannot be read while expanding are skipped
/// with a warning.
pub fn enumerate_folders(pattern: &str) -> FrameMatchResult<Vec<AssetFolder>> {
    let entries = glob::glob(pattern).map_err(|err| FrameMatchError::Pattern {
        pattern: pattern.to_owned(),
        reason: err.to_string(),
    })?;

    let mut folders = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => folders.push(AssetFolder::new(path)),
            Err(err) => trace_warn!("skipping unreadable entry {}: {}", err.path().display(), err),
        }
    }
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::{enumerate_folders, AssetFolder};
    use crate::FrameMatchError;

    #[test]
    fn id_is_the_basename() {
        let folder = AssetFolder::new("/data/assets/campaign_042");
        assert_eq!(folder.id(), "campaign_042");
        assert!(folder.file("_preview.png").ends_with("campaign_042/_preview.png"));
    }

    #[test]
    fn glob_lists_every_match_without_content_filtering() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("b").join("_preview.png"), b"x").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let mut ids: Vec<String> = enumerate_folders(&pattern)
            .unwrap()
            .into_iter()
            .map(|f| f.id().to_owned())
            .collect();
        ids.sort();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let err = enumerate_folders("assets/[").unwrap_err();
        assert!(matches!(err, FrameMatchError::Pattern { .. }));
    }
}
