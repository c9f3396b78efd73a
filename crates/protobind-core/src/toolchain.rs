//! External executables the generator shells out to.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// grpc-tools' protoc driver, emits CommonJS + gRPC stubs.
pub const NODE_PROTOC: &str = "grpc_tools_node_protoc";
pub const NODE_PROTOC_PLUGIN: &str = "grpc_tools_node_protoc_plugin";
/// Plain protoc, used with the ts-protoc-gen plugin for `.d.ts` output.
pub const PROTOC: &str = "protoc";
pub const TS_PLUGIN: &str = "protoc-gen-ts";

/// Resolved absolute paths of every required executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    pub node_protoc: PathBuf,
    pub node_plugin: PathBuf,
    pub protoc: PathBuf,
    pub ts_plugin: PathBuf,
}

impl Toolchain {
    /// Look every tool up on `search_path` (a `PATH`-style list).
    ///
    /// Plugins are checked first so a missing plugin reports as such even
    /// when a compiler is missing too.
    pub fn discover(search_path: Option<&OsStr>, cwd: &Path) -> Result<Self> {
        let plugin = |name: &str| {
            lookup(name, search_path, cwd).ok_or_else(|| Error::PluginNotFound {
                name: name.to_string(),
            })
        };
        let node_plugin = plugin(NODE_PROTOC_PLUGIN)?;
        let ts_plugin = plugin(TS_PLUGIN)?;

        let compiler = |name: &str| {
            lookup(name, search_path, cwd).ok_or_else(|| Error::CompilerNotFound {
                name: name.to_string(),
            })
        };
        let node_protoc = compiler(NODE_PROTOC)?;
        let protoc = compiler(PROTOC)?;

        Ok(Self {
            node_protoc,
            node_plugin,
            protoc,
            ts_plugin,
        })
    }

    /// JS + gRPC stubs for `file`, written to `out_dir`.
    pub fn js_invocation(&self, proto_dir: &Path, out_dir: &Path, file: &Path) -> Invocation {
        Invocation {
            program: self.node_protoc.clone(),
            args: vec![
                flag("--proto_path=", proto_dir),
                flag("--js_out=import_style=commonjs,binary:", out_dir),
                flag("--grpc_out=", out_dir),
                flag("--plugin=protoc-gen-grpc=", &self.node_plugin),
                file.as_os_str().to_os_string(),
            ],
        }
    }

    /// TypeScript declarations for `file`, written to `out_dir`.
    pub fn ts_invocation(&self, proto_dir: &Path, out_dir: &Path, file: &Path) -> Invocation {
        Invocation {
            program: self.protoc.clone(),
            args: vec![
                flag("--proto_path=", proto_dir),
                flag("--ts_out=", out_dir),
                flag("--plugin=", &self.ts_plugin),
                file.as_os_str().to_os_string(),
            ],
        }
    }
}

/// A fully specified external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Program file name, for messages.
    pub fn display_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

fn flag(prefix: &str, value: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(value);
    arg
}

fn lookup(name: &str, search_path: Option<&OsStr>, cwd: &Path) -> Option<PathBuf> {
    let found = which::which_in(name, search_path, cwd).ok();
    debug!(tool = name, path = ?found, "tool lookup");
    found
}
