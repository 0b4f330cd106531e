//! Template registry.
//!
//! # Responsibilities
//! - Compile every `*.html` template in a directory once, at startup
//! - Register the functions templates may call (`time_now`, `local_hostname`)
//! - Render a named template against a `RenderContext`
//!
//! # Design Decisions
//! - Built once, never mutated: concurrent renders need no locking
//! - An unreadable directory or a missing default template fails startup;
//!   any other unknown name is a render error (HTTP 500)
//! - `.html` templates are HTML-autoescaped

use std::collections::HashMap;
use std::error::Error as _;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tera::{Tera, Value};

use crate::http::context::RenderContext;
use crate::network::hostname;

/// Startup failure while building the registry.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template directory {} is unreadable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to compile templates: {}", chain(.source))]
    Compile {
        #[source]
        source: tera::Error,
    },
    #[error("default template '{0}' is not registered")]
    MissingDefault(String),
}

/// A single request's render failure.
#[derive(Debug, thiserror::Error)]
#[error("{}", chain(.0))]
pub struct RenderError(#[source] pub tera::Error);

/// `outer: inner: ...` for an error and all of its sources.
fn chain(err: &tera::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, ": {cause}");
        source = cause.source();
    }
    out
}

/// Compiled templates plus the name rendered for `/`.
#[derive(Debug)]
pub struct TemplateRegistry {
    tera: Tera,
    default_template: String,
}

impl TemplateRegistry {
    /// Compile every `*.html` file in `dir`.
    pub fn load(dir: &Path, default_template: &str) -> Result<Self, TemplateError> {
        fs::read_dir(dir).map_err(|source| TemplateError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let pattern = dir.join("*.html");
        let tera = Tera::new(&pattern.to_string_lossy())
            .map_err(|source| TemplateError::Compile { source })?;

        let registry = Self::from_tera(tera, default_template)?;
        tracing::info!(
            dir = %dir.display(),
            templates = registry.names().len(),
            default = %registry.default_template,
            "Templates loaded"
        );
        Ok(registry)
    }

    /// Build from in-memory `(name, body)` pairs.
    pub fn from_raw(templates: &[(&str, &str)], default_template: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .map_err(|source| TemplateError::Compile { source })?;
        Self::from_tera(tera, default_template)
    }

    fn from_tera(mut tera: Tera, default_template: &str) -> Result<Self, TemplateError> {
        register_functions(&mut tera);
        let registry = Self {
            tera,
            default_template: default_template.to_string(),
        };
        if !registry.contains(default_template) {
            return Err(TemplateError::MissingDefault(default_template.to_string()));
        }
        Ok(registry)
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Sorted template names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Render `name` against `context`.
    pub fn render(&self, name: &str, context: &RenderContext<'_>) -> Result<String, RenderError> {
        let context = tera::Context::from_serialize(context).map_err(RenderError)?;
        self.tera.render(name, &context).map_err(RenderError)
    }
}

fn register_functions(tera: &mut Tera) {
    tera.register_function("time_now", time_now);
    tera.register_function("local_hostname", local_hostname);
}

/// Current local time; RFC 3339 unless a strftime `format` is given.
fn time_now(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let now = chrono::Local::now();
    match args.get("format") {
        None => Ok(Value::String(now.to_rfc3339())),
        Some(Value::String(format)) => {
            let mut out = String::new();
            write!(out, "{}", now.format(format))
                .map_err(|_| tera::Error::msg(format!("invalid time format '{format}'")))?;
            Ok(Value::String(out))
        }
        Some(other) => Err(tera::Error::msg(format!(
            "time_now: `format` must be a string, got {other}"
        ))),
    }
}

fn local_hostname(_args: &HashMap<String, Value>) -> tera::Result<Value> {
    hostname::local_hostname()
        .map(Value::String)
        .map_err(|e| tera::Error::msg(format!("local_hostname: {e}")))
}
