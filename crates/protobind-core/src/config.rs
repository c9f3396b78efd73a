//! Raw run input and built-in defaults.

use std::path::PathBuf;

/// Built-in fallbacks used when neither a flag nor the owner manifest
/// provides a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// npm scope the generated package is published under.
    pub scope: String,
    pub version: String,
    pub license: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            scope: "protobind".to_string(),
            version: "1.0.0".to_string(),
            license: "UNLICENSED".to_string(),
        }
    }
}

/// Unresolved input as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    /// Directory holding the `*.proto` files.
    pub proto_path: PathBuf,
    /// Directory that is wiped and regenerated.
    pub out_path: PathBuf,
    pub name: Option<String>,
    pub license: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub public: bool,
    pub readme: bool,
    pub manifest: bool,
}

impl Flags {
    /// Flags with only the two required paths set; both artifacts enabled.
    pub fn new(proto_path: impl Into<PathBuf>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            proto_path: proto_path.into(),
            out_path: out_path.into(),
            name: None,
            license: None,
            version: None,
            scope: None,
            public: false,
            readme: true,
            manifest: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}
