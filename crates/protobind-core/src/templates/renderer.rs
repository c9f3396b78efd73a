//! Placeholder substitution for text artifacts.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub variables: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// Renders `{{name}}` / `{{ name }}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
    })
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Substitute every placeholder in one pass.
    ///
    /// All missing variables are reported together.
    pub fn render_string(&self, template: &str, context: &TemplateContext) -> Result<String> {
        let mut missing = Vec::new();

        let rendered = variable_pattern().replace_all(template, |caps: &regex::Captures<'_>| {
            match context.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => {
                    missing.push(caps[1].to_string());
                    String::new()
                }
            }
        });

        if !missing.is_empty() {
            missing.dedup();
            return Err(Error::Template(format!(
                "missing variable: {}",
                missing.join(", ")
            )));
        }

        Ok(rendered.into_owned())
    }
}
