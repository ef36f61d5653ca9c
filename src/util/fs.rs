//! Filesystem utilities.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Files found by [`search_files_and_symlinks`], keyed by resolved path.
///
/// Each value lists the symlinks (possibly none) that resolve to the key.
pub type FileMatches = BTreeMap<PathBuf, BTreeSet<PathBuf>>;

/// Check that `path` names an existing regular file (following symlinks).
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Check that `path` names an existing directory (following symlinks).
pub fn dir_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Render a path with forward slashes.
pub fn to_slash(path: impl AsRef<Path>) -> String {
    let s = path.as_ref().to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Join directories with the platform's path-list separator.
pub fn join_path_list<S: AsRef<str>>(dirs: &[S]) -> String {
    let sep = if cfg!(windows) { ";" } else { ":" };
    dirs.iter()
        .map(|d| d.as_ref())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Split the `PATH` environment variable into directories.
pub fn path_dirs() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect())
        .unwrap_or_default()
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}

/// Canonical form of `path`; verbatim (`\\?\`) prefixes are avoided on Windows.
#[cfg(not(windows))]
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(windows)]
fn resolve(path: &Path) -> PathBuf {
    path.to_path_buf()
}

/// Scan each directory (non-recursively) for executables whose file name
/// passes `filter`.
///
/// Symlinks are resolved: the canonical target becomes the key and the link
/// is recorded under it, so several names for one binary collapse into one
/// entry.
/// Duplicate and missing directories are skipped.
pub fn search_files_and_symlinks<F>(dirs: &[PathBuf], filter: F) -> FileMatches
where
    F: Fn(&str) -> bool,
{
    let mut found = FileMatches::new();
    let mut seen = BTreeSet::new();

    for dir in dirs {
        if dir.as_os_str().is_empty() || !seen.insert(dir.clone()) || !dir_exists(dir) {
            continue;
        }

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !filter(name) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let Ok(meta) = fs::metadata(&path) else {
                continue;
            };
            if !meta.is_file() || !is_executable(&meta) {
                continue;
            }

            // Links and files reached through symlinked directories are
            // recorded as aliases of their canonical path.
            let target = resolve(&path);
            let aliases = found.entry(target.clone()).or_default();
            if target != path {
                aliases.insert(path);
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn touch_exe(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_join_path_list() {
        let joined = join_path_list(&["/a", "/b"]);
        if cfg!(windows) {
            assert_eq!(joined, "/a;/b");
        } else {
            assert_eq!(joined, "/a:/b");
        }
        assert_eq!(join_path_list::<&str>(&[]), "");
    }

    #[test]
    fn test_file_and_dir_exists() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();

        assert!(file_exists(&file));
        assert!(!dir_exists(&file));
        assert!(dir_exists(tmp.path()));
        assert!(!file_exists(tmp.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_groups_symlinks_under_target() {
        let tmp = TempDir::new().unwrap();
        let bin = fs::canonicalize(tmp.path()).unwrap().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let real = bin.join("x86_64-linux-gnu-gcc-13");
        touch_exe(&real);
        std::os::unix::fs::symlink(&real, bin.join("gcc")).unwrap();
        fs::write(bin.join("gcc-notes.txt"), "").unwrap();

        let found = search_files_and_symlinks(&[bin.clone(), bin.clone()], |n| n.contains("gcc"));

        assert_eq!(found.len(), 1);
        let (target, links) = found.iter().next().unwrap();
        assert_eq!(target, &real);
        assert_eq!(links.len(), 1);
        assert!(links.contains(&bin.join("gcc")));
    }

    #[test]
    fn test_search_skips_missing_dirs() {
        let found = search_files_and_symlinks(&[PathBuf::from("/definitely/not/here")], |_| true);
        assert!(found.is_empty());
    }
}
