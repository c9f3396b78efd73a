//! Generated module references and the identifier casing rules.

use convert_case::{Case, Casing};
use serde::Serialize;

/// A module re-exported by an aggregator file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// JavaScript identifier the module is bound to.
    pub name: String,
    /// Relative import specifier, e.g. `./foo_pb`.
    pub path: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Entry for a compiler-emitted file inside a schema subdirectory.
    pub fn file(stem: &str) -> Self {
        Self::new(camel_identifier(stem), format!("./{stem}"))
    }

    /// Entry for a schema subdirectory under the output root.
    pub fn submodule(base_name: &str) -> Self {
        Self::new(pascal_identifier(base_name), format!("./{base_name}"))
    }
}

/// `foo_grpc_pb` -> `fooGrpcPb`
pub fn camel_identifier(raw: &str) -> String {
    identifier(raw, Case::Camel)
}

/// `user-service` -> `UserService`
pub fn pascal_identifier(raw: &str) -> String {
    identifier(raw, Case::Pascal)
}

fn identifier(raw: &str, case: Case) -> String {
    // Anything outside [A-Za-z0-9_$] becomes a word break.
    let words: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '$' { c } else { '_' })
        .collect();

    let cased = words.to_case(case);
    match cased.chars().next() {
        None => "_".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{cased}"),
        Some(_) => cased,
    }
}
