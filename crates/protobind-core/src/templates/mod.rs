//! Aggregator file rendering.
//!
//! Each function is a pure mapping from an entry list to file contents.
//! Per-schema aggregators merge every emitted file into one CommonJS
//! module; root aggregators expose each schema under its own name.

mod renderer;

pub use renderer::{TemplateContext, TemplateRenderer};

use crate::entry::Entry;

fn require(entry: &Entry) -> String {
    format!("const {} = require('{}');", entry.name, entry.path)
}

fn lines(entries: &[Entry], f: impl Fn(&Entry) -> String) -> String {
    entries.iter().map(f).collect::<Vec<_>>().join("\n")
}

fn names(entries: &[Entry]) -> impl Iterator<Item = &str> {
    entries.iter().map(|e| e.name.as_str())
}

/// Per-schema `index.js`: spreads every emitted module into one export.
pub fn local_js_entry(entries: &[Entry]) -> String {
    let spread = names(entries)
        .map(|n| format!("...{n}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{}\n\nmodule.exports = {{{}}};\n",
        lines(entries, require),
        spread
    )
}

/// Per-schema `index.d.ts`: re-exports every emitted declaration file.
pub fn local_ts_entry(entries: &[Entry]) -> String {
    format!(
        "{}\n",
        lines(entries, |e| format!("export * from '{}';", e.path))
    )
}

/// Root `index.js`: one named export per schema subdirectory.
pub fn root_js_entry(entries: &[Entry]) -> String {
    format!(
        "{}\n\n{}\n",
        lines(entries, require),
        lines(entries, |e| format!("module.exports.{0} = {0};", e.name))
    )
}

/// Root `index.d.ts`: namespace import per subdirectory, re-exported by name.
pub fn root_ts_entry(entries: &[Entry]) -> String {
    format!(
        "{}\n\nexport {{{}}};\n",
        lines(entries, |e| format!("import * as {} from '{}';", e.name, e.path)),
        names(entries).collect::<Vec<_>>().join(", ")
    )
}
