//! Test utilities for protobind crates.
//!
//! [`Fixture`] lays out a throwaway service package: an owner
//! `package.json`, a `proto/` directory and a `bin/` directory holding fake
//! toolchain scripts. The scripts only use `/bin/sh` builtins, so they keep
//! working when `bin/` is the only entry on the search path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const NODE_PROTOC: &str = "grpc_tools_node_protoc";
pub const NODE_PROTOC_PLUGIN: &str = "grpc_tools_node_protoc_plugin";
pub const PROTOC: &str = "protoc";
pub const TS_PLUGIN: &str = "protoc-gen-ts";

/// Writes `<stem>_pb.js` and `<stem>_grpc_pb.js` like grpc-tools does.
/// `{step}` runs after argument parsing, with `$out` set to the output dir.
const FAKE_NODE_PROTOC: &str = r#"#!/bin/sh
js_out=""
grpc_out=""
file=""
for arg in "$@"; do
  case "$arg" in
    --js_out=*) js_out="${arg#*:}" ;;
    --grpc_out=*) grpc_out="${arg#--grpc_out=}" ;;
    --*) ;;
    *) file="$arg" ;;
  esac
done
out="$grpc_out"
{step}
stem="${file##*/}"
stem="${stem%.proto}"
printf "// messages for %s\n" "$stem" > "$js_out/${stem}_pb.js"
printf "// services for %s\n" "$stem" > "$grpc_out/${stem}_grpc_pb.js"
"#;

/// Writes `<stem>_pb.d.ts` like protoc-gen-ts does.
const FAKE_PROTOC: &str = r#"#!/bin/sh
ts_out=""
file=""
for arg in "$@"; do
  case "$arg" in
    --ts_out=*) ts_out="${arg#--ts_out=}" ;;
    --*) ;;
    *) file="$arg" ;;
  esac
done
out="$ts_out"
{step}
stem="${file##*/}"
stem="${stem%.proto}"
printf "// declarations for %s\n" "$stem" > "$ts_out/${stem}_pb.d.ts"
"#;

/// Marks `{me}` as started, then waits up to five seconds for `{other}`.
const RENDEZVOUS_STEP: &str = r#": > "$out/{me}.started"
i=0
while [ ! -f "$out/{other}.started" ]; do
  i=$((i + 1))
  if [ "$i" -gt 50 ]; then
    echo "{other} never started" >&2
    exit 1
  fi
  sleep 0.1
done"#;

const FAKE_PLUGIN: &str = "#!/bin/sh\nexit 0\n";

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A scratch service package for pipeline tests.
pub struct Fixture {
    root: TempDir,
}

impl Fixture {
    /// Empty fixture: no manifest, no schemas, no tools.
    pub fn empty() -> Self {
        let fixture = Self { root: temp_dir() };
        std::fs::create_dir_all(fixture.proto_dir()).expect("Failed to create proto dir");
        std::fs::create_dir_all(fixture.bin_dir()).expect("Failed to create bin dir");
        fixture
    }

    /// Fixture with an owner manifest and a working fake toolchain.
    pub fn new() -> Self {
        Self::empty()
            .with_owner_manifest(
                r#"{"name": "@acme/billing", "version": "1.0.0", "license": "MIT"}"#,
            )
            .with_fake_toolchain()
    }

    pub fn with_owner_manifest(self, json: &str) -> Self {
        std::fs::write(self.path().join("package.json"), json)
            .expect("Failed to write package.json");
        self
    }

    pub fn with_proto(self, file_name: &str) -> Self {
        let content = format!("syntax = \"proto3\";\n// {file_name}\n");
        std::fs::write(self.proto_dir().join(file_name), content).expect("Failed to write proto");
        self
    }

    pub fn with_fake_toolchain(self) -> Self {
        self.with_tool(NODE_PROTOC, &compiler_script(NODE_PROTOC, ":"))
            .with_tool(NODE_PROTOC_PLUGIN, FAKE_PLUGIN)
            .with_tool(PROTOC, &compiler_script(PROTOC, ":"))
            .with_tool(TS_PLUGIN, FAKE_PLUGIN)
    }

    /// Compilers that each wait for the other to start before writing,
    /// so they only succeed when run side by side.
    pub fn with_rendezvous_toolchain(self) -> Self {
        let step = |me: &str, other: &str| {
            RENDEZVOUS_STEP.replace("{me}", me).replace("{other}", other)
        };
        self.with_fake_toolchain()
            .with_tool(NODE_PROTOC, &compiler_script(NODE_PROTOC, &step("js", "ts")))
            .with_tool(PROTOC, &compiler_script(PROTOC, &step("ts", "js")))
    }

    /// Replace compiler `name` with one that sleeps `secs` seconds and then
    /// writes `<name>.finished` next to its output.
    pub fn with_slow_tool(self, name: &str, secs: u32) -> Self {
        let step = format!("sleep {secs}\n: > \"$out/{name}.finished\"");
        let script = compiler_script(name, &step);
        self.with_tool(name, &script)
    }

    /// Replace `name` with a script that prints to stderr and exits with `code`.
    pub fn with_failing_tool(self, name: &str, code: u8) -> Self {
        let script = format!("#!/bin/sh\necho \"{name}: simulated failure\" >&2\nexit {code}\n");
        self.with_tool(name, &script)
    }

    pub fn without_tool(self, name: &str) -> Self {
        let _ = std::fs::remove_file(self.bin_dir().join(name));
        self
    }

    /// Install an executable script into `bin/`.
    pub fn with_tool(self, name: &str, script: &str) -> Self {
        let path = self.bin_dir().join(name);
        std::fs::write(&path, script).expect("Failed to write tool script");
        make_executable(&path);
        self
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn proto_dir(&self) -> PathBuf {
        self.path().join("proto")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.path().join("gen")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path().join("bin")
    }

    /// Search path containing only the fixture's `bin/`.
    pub fn search_path(&self) -> OsString {
        self.bin_dir().into_os_string()
    }

    /// `bin/` prepended to the current `PATH`, for spawning whole binaries.
    pub fn prepended_path(&self) -> OsString {
        let mut paths = vec![self.bin_dir()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).expect("Failed to join PATH")
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fake compiler script for `name` with `step` spliced in before it writes.
fn compiler_script(name: &str, step: &str) -> String {
    let template = if name == PROTOC {
        FAKE_PROTOC
    } else {
        FAKE_NODE_PROTOC
    };
    template.replace("{step}", step)
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod tool script");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixture_layout() {
        let fixture = Fixture::new().with_proto("foo.proto");
        assert!(fixture.path().join("package.json").is_file());
        assert!(fixture.proto_dir().join("foo.proto").is_file());
        for tool in [NODE_PROTOC, NODE_PROTOC_PLUGIN, PROTOC, TS_PLUGIN] {
            assert!(fixture.bin_dir().join(tool).is_file(), "{tool} missing");
        }
        assert!(!fixture.out_dir().exists());
    }

    #[test]
    fn test_compiler_scripts_splice_their_step() {
        let fixture = Fixture::empty().with_rendezvous_toolchain();
        let node = std::fs::read_to_string(fixture.bin_dir().join(NODE_PROTOC)).unwrap();
        assert!(node.contains(r#": > "$out/js.started""#));
        assert!(!node.contains("{step}"));

        let fixture = Fixture::empty().with_fake_toolchain().with_slow_tool(PROTOC, 7);
        let protoc = std::fs::read_to_string(fixture.bin_dir().join(PROTOC)).unwrap();
        assert!(protoc.contains("sleep 7"));
        assert!(protoc.contains("_pb.d.ts"));
    }

    #[test]
    fn test_without_tool() {
        let fixture = Fixture::new().without_tool(PROTOC);
        assert!(!fixture.bin_dir().join(PROTOC).exists());
    }

    #[test]
    fn test_prepended_path_starts_with_bin() {
        let fixture = Fixture::empty();
        let path = fixture.prepended_path();
        let first = std::env::split_paths(&path).next();
        assert_eq!(first, Some(fixture.bin_dir()));
    }

    proptest! {
        #[test]
        fn test_proto_files_land_in_proto_dir(stem in "[a-z][a-z0-9_]{0,12}") {
            let name = format!("{stem}.proto");
            let fixture = Fixture::empty().with_proto(&name);
            prop_assert!(fixture.proto_dir().join(&name).is_file());
        }
    }
}
