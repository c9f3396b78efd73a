//! Parameter resolution: flags + owner manifest + defaults.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Defaults, Flags};
use crate::error::{Error, Result};
use crate::fs;
use crate::manifest::OwnerManifest;

/// Fully resolved configuration for one run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunParameters {
    /// Absolute input directory.
    pub proto_dir: PathBuf,
    /// Absolute output directory.
    pub out_dir: PathBuf,
    /// Scoped package name, e.g. `@protobind/billing`.
    pub name: String,
    /// Name of the package that owns the schemas.
    pub service_name: String,
    pub version: String,
    pub license: String,
    pub public: bool,
    pub readme: bool,
    pub manifest: bool,
}

impl RunParameters {
    /// Merge flags with the owner manifest.
    ///
    /// Version and license: flag, then manifest, then built-in default.
    /// Name: flag, then manifest name; either way the scope is replaced.
    pub fn resolve(
        flags: &Flags,
        owner: &OwnerManifest,
        owner_path: &Path,
        cwd: &Path,
        defaults: &Defaults,
    ) -> Result<Self> {
        let scope = flags.scope.as_deref().unwrap_or(&defaults.scope);

        let base_name = flags
            .name
            .as_deref()
            .or(owner.name.as_deref())
            .map(strip_scope)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::NoPackageName {
                path: owner_path.to_path_buf(),
            })?;

        let version = flags
            .version
            .clone()
            .or_else(|| owner.version.clone())
            .unwrap_or_else(|| defaults.version.clone());

        let license = flags
            .license
            .clone()
            .or_else(|| owner.license.clone())
            .unwrap_or_else(|| defaults.license.clone());

        Ok(Self {
            proto_dir: fs::absolutize(cwd, &flags.proto_path),
            out_dir: fs::absolutize(cwd, &flags.out_path),
            name: scoped(scope, base_name),
            service_name: owner
                .name
                .clone()
                .unwrap_or_else(|| base_name.to_string()),
            version,
            license,
            public: flags.public,
            readme: flags.readme,
            manifest: flags.manifest,
        })
    }
}

/// Drop a leading `@scope/` from an npm package name.
pub fn strip_scope(name: &str) -> &str {
    match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((_, unscoped)) => unscoped,
        None => name,
    }
}

fn scoped(scope: &str, name: &str) -> String {
    format!("@{}/{}", scope.trim_start_matches('@'), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn owner(name: Option<&str>, version: Option<&str>, license: Option<&str>) -> OwnerManifest {
        OwnerManifest {
            name: name.map(String::from),
            version: version.map(String::from),
            license: license.map(String::from),
        }
    }

    fn resolve(flags: &Flags, owner: &OwnerManifest) -> Result<RunParameters> {
        RunParameters::resolve(
            flags,
            owner,
            Path::new("/work/svc/package.json"),
            Path::new("/work/svc"),
            &Defaults::default(),
        )
    }

    #[test_case("@acme/billing", "billing"; "scoped")]
    #[test_case("billing", "billing"; "unscoped")]
    #[test_case("@acme", "@acme"; "scope without name")]
    #[test_case("@a/b/c", "b/c"; "nested slash")]
    fn test_strip_scope(input: &str, expected: &str) {
        assert_eq!(strip_scope(input), expected);
    }

    #[test]
    fn test_version_precedence() {
        let manifest = owner(Some("svc"), Some("1.0.0"), None);

        let with_flag = resolve(&Flags::new("p", "g").with_version("2.0.0"), &manifest).unwrap();
        assert_eq!(with_flag.version, "2.0.0");

        let from_manifest = resolve(&Flags::new("p", "g"), &manifest).unwrap();
        assert_eq!(from_manifest.version, "1.0.0");

        let fallback = resolve(&Flags::new("p", "g"), &owner(Some("svc"), None, None)).unwrap();
        assert_eq!(fallback.version, Defaults::default().version);
    }

    #[test]
    fn test_license_precedence() {
        let manifest = owner(Some("svc"), None, Some("MIT"));

        let flags = Flags::new("p", "g").with_license("Apache-2.0");
        let with_flag = resolve(&flags, &manifest).unwrap();
        assert_eq!(with_flag.license, "Apache-2.0");

        let from_manifest = resolve(&Flags::new("p", "g"), &manifest).unwrap();
        assert_eq!(from_manifest.license, "MIT");

        let fallback = resolve(&Flags::new("p", "g"), &owner(Some("svc"), None, None)).unwrap();
        assert_eq!(fallback.license, "UNLICENSED");
    }

    #[test]
    fn test_name_is_rescoped() {
        let manifest = owner(Some("@acme/billing"), None, None);

        let params = resolve(&Flags::new("p", "g"), &manifest).unwrap();
        assert_eq!(params.name, "@protobind/billing");
        assert_eq!(params.service_name, "@acme/billing");

        let params = resolve(&Flags::new("p", "g").with_name("@other/ledger"), &manifest).unwrap();
        assert_eq!(params.name, "@protobind/ledger");

        let params = resolve(
            &Flags::new("p", "g").with_name("ledger").with_scope("@corp"),
            &manifest,
        )
        .unwrap();
        assert_eq!(params.name, "@corp/ledger");
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let err = resolve(&Flags::new("p", "g"), &OwnerManifest::default()).unwrap_err();
        assert_eq!(err.code(), "ENONAME");

        let flags = Flags::new("p", "g").with_name("svc");
        let params = resolve(&flags, &OwnerManifest::default()).unwrap();
        assert_eq!(params.service_name, "svc");
    }

    #[test]
    fn test_paths_are_absolute() {
        let params = resolve(
            &Flags::new("../shared/proto", "./gen"),
            &owner(Some("svc"), None, None),
        )
        .unwrap();
        assert_eq!(params.proto_dir, PathBuf::from("/work/shared/proto"));
        assert_eq!(params.out_dir, PathBuf::from("/work/svc/gen"));
    }

    #[test]
    fn test_toggles_pass_through() {
        let mut flags = Flags::new("p", "g");
        flags.public = true;
        flags.readme = false;

        let params = resolve(&flags, &owner(Some("svc"), None, None)).unwrap();
        assert!(params.public);
        assert!(!params.readme);
        assert!(params.manifest);
    }
}
