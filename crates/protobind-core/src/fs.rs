//! Path manipulation and small filesystem helpers.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{Error, Result};

/// Normalize a path by resolving `.` and `..` without hitting the filesystem.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut components = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::Prefix(_) => components.push(component),
            Component::RootDir => {
                components.clear();
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            Component::Normal(_) => components.push(component),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Resolve `path` against `base` the way a shell would, without requiring
/// the target to exist.
pub fn absolutize(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    normalize(base.as_ref().join(path))
}

/// `path` expressed relative to `base`; both are normalized first.
pub fn relative_to(path: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let shared = path
        .components()
        .zip(base.components())
        .take_while(|(p, b)| p == b)
        .count();

    let ups = base.components().skip(shared).map(|_| Component::ParentDir);
    let relative: PathBuf = ups.chain(path.components().skip(shared)).collect();

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// Path as a string with `/` separators on every platform.
pub fn to_unix_string(path: impl AsRef<Path>) -> String {
    let lossy = path.as_ref().to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        lossy.into_owned()
    } else {
        lossy.replace(MAIN_SEPARATOR, "/")
    }
}

/// File name without its last extension, if it is valid UTF-8.
pub fn stem(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Files directly inside `dir` whose name matches `*.<extension>`, sorted.
///
/// A missing directory lists as empty.
pub fn list_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = glob::Pattern::new(&format!("*.{}", glob::Pattern::escape(extension)))?;

    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries =
        std::fs::read_dir(dir).map_err(|e| Error::io("failed to read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("failed to read directory entry", dir, e))?;
        let path = entry.path();
        if pattern.matches(&entry.file_name().to_string_lossy()) && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| Error::io("failed to write file", path, e))
}
