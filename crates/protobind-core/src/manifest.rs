//! The owner package manifest (`package.json`) enclosing the working
//! directory. Read-only: it only supplies defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

pub const MANIFEST_FILE: &str = "package.json";

/// The fields of the owner manifest that feed parameter resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OwnerManifest {
    #[serde(default, deserialize_with = "string_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub version: Option<String>,
    /// Legacy `{"type": ..}` license objects are ignored.
    #[serde(default, deserialize_with = "string_field")]
    pub license: Option<String>,
}

impl OwnerManifest {
    /// Find the nearest `package.json` at or above `start`.
    pub fn locate(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(MANIFEST_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Parse a manifest from JSON text.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| Error::InvalidManifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io("failed to read package manifest", path, e))?;
        Self::parse(&content, path)
    }

    /// Locate and load the owner manifest for `cwd`.
    pub fn discover(cwd: &Path) -> Result<(PathBuf, Self)> {
        let path = Self::locate(cwd).ok_or_else(|| Error::NoManifest {
            cwd: cwd.to_path_buf(),
        })?;
        let manifest = Self::load(&path)?;
        Ok((path, manifest))
    }
}

fn string_field<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = OwnerManifest::parse(
            r#"{"name":"@acme/billing","version":"1.4.2","license":"MIT","private":true}"#,
            Path::new("package.json"),
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("@acme/billing"));
        assert_eq!(manifest.version.as_deref(), Some("1.4.2"));
        assert_eq!(manifest.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_parse_tolerates_missing_and_odd_fields() {
        let manifest = OwnerManifest::parse(
            r#"{"license":{"type":"MIT"},"version":""}"#,
            Path::new("package.json"),
        )
        .unwrap();

        assert_eq!(manifest, OwnerManifest::default());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = OwnerManifest::parse("{not json", Path::new("/srv/package.json")).unwrap_err();
        assert_eq!(err.code(), "EMANIFEST");
        assert!(err.to_string().contains("/srv/package.json"));
    }

    #[test]
    fn test_discover_walks_upward() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(MANIFEST_FILE), r#"{"name":"svc"}"#).unwrap();
        let nested = root.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, manifest) = OwnerManifest::discover(&nested).unwrap();
        assert_eq!(path, root.path().join(MANIFEST_FILE));
        assert_eq!(manifest.name.as_deref(), Some("svc"));
    }

    #[test]
    fn test_discover_prefers_nearest_manifest() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(MANIFEST_FILE), r#"{"name":"outer"}"#).unwrap();
        let inner = root.path().join("packages/inner");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(inner.join(MANIFEST_FILE), r#"{"name":"inner"}"#).unwrap();

        // The start directory itself does not need to exist.
        let (_, manifest) = OwnerManifest::discover(&inner.join("src")).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("inner"));
    }

    #[test]
    fn test_directory_named_package_json_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(MANIFEST_FILE), r#"{"name":"outer"}"#).unwrap();
        let inner = root.path().join("inner");
        std::fs::create_dir_all(inner.join(MANIFEST_FILE)).unwrap();

        assert_eq!(
            OwnerManifest::locate(&inner),
            Some(root.path().join(MANIFEST_FILE))
        );
    }
}
