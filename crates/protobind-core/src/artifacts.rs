//! `package.json` and `README.md` for the generated package.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::params::RunParameters;
use crate::templates::{TemplateContext, TemplateRenderer};

pub const MANIFEST_FILE: &str = "package.json";
pub const README_FILE: &str = "README.md";

const README_TEMPLATE: &str = "\
# Generated Typescript code for `{{service_name}}`.

Source *.proto files:

{{sources}}

Generated at `{{generated_at}}`
";

/// Descriptor written as the generated package's `package.json`.
#[derive(Debug, Serialize)]
pub struct PackageManifest<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub private: bool,
    pub license: &'a str,
    pub description: String,
    pub main: &'static str,
    pub types: &'static str,
}

impl<'a> PackageManifest<'a> {
    pub fn from_params(params: &'a RunParameters) -> Self {
        Self {
            name: &params.name,
            version: &params.version,
            private: !params.public,
            license: &params.license,
            description: format!(
                "Generated protobuf code for the {} package",
                params.service_name
            ),
            main: "index.js",
            types: "index.d.ts",
        }
    }
}

/// Pretty-printed manifest with a trailing newline.
pub fn render_manifest(params: &RunParameters) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&PackageManifest::from_params(params))?;
    json.push('\n');
    Ok(json)
}

/// README listing `sources` (already display-formatted) and the time of the run.
pub fn render_readme(
    service_name: &str,
    sources: &[String],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let listing = sources
        .iter()
        .map(|s| format!("  - `{s}`;"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut ctx = TemplateContext::new();
    ctx.set("service_name", service_name)
        .set("sources", listing)
        .set(
            "generated_at",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

    TemplateRenderer::new().render_string(README_TEMPLATE, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn params() -> RunParameters {
        RunParameters {
            proto_dir: PathBuf::from("/svc/proto"),
            out_dir: PathBuf::from("/svc/gen"),
            name: "@protobind/billing".to_string(),
            service_name: "@acme/billing".to_string(),
            version: "1.2.3".to_string(),
            license: "MIT".to_string(),
            public: false,
            readme: true,
            manifest: true,
        }
    }

    #[test]
    fn test_manifest_fields_in_order() {
        let json = render_manifest(&params()).unwrap();
        assert_eq!(
            json,
            r#"{
  "name": "@protobind/billing",
  "version": "1.2.3",
  "private": true,
  "license": "MIT",
  "description": "Generated protobuf code for the @acme/billing package",
  "main": "index.js",
  "types": "index.d.ts"
}
"#
        );
    }

    #[test]
    fn test_public_manifest_is_not_private() {
        let mut params = params();
        params.public = true;
        let rendered = render_manifest(&params).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["private"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_readme() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let readme = render_readme(
            "@acme/billing",
            &["../proto/bar.proto".to_string(), "../proto/foo.proto".to_string()],
            at,
        )
        .unwrap();

        assert_eq!(
            readme,
            "# Generated Typescript code for `@acme/billing`.\n\
             \n\
             Source *.proto files:\n\
             \n  - `../proto/bar.proto`;\n  - `../proto/foo.proto`;\n\
             \n\
             Generated at `2024-03-01T12:30:00.000Z`\n"
        );
    }
}
