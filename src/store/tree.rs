// src/store/tree.rs

//! Recursive directory-tree operations used for scenario clone/delete.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Recursively copy the contents of `src` into `dst`.
///
/// `dst` is created if missing. Symlinks are not followed specially; the
/// scenario trees this operates on are plain files and directories.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("creating dir {:?}", dst))?;

    for entry in fs::read_dir(src).with_context(|| format!("reading dir {:?}", src))? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to)
                .with_context(|| format!("copying {:?} to {:?}", from, to))?;
        }
    }

    Ok(())
}

/// Remove a directory tree, ignoring failures.
///
/// Used for the UI-cache directory kept alongside scenarios, which is
/// non-essential.
pub fn remove_tree_best_effort(path: &Path) {
    if let Err(err) = fs::remove_dir_all(path) {
        tracing::debug!(path = ?path, error = %err, "best-effort tree removal failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_nested_trees() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("sub/b.txt"), "b").unwrap();

        let dst = tmp.path().join("dst");
        copy_tree(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("sub/b.txt")).unwrap(), "b");
    }

    #[test]
    fn best_effort_removal_swallows_missing_path() {
        let tmp = tempfile::tempdir().unwrap();
        remove_tree_best_effort(&tmp.path().join("never-existed"));
    }
}
