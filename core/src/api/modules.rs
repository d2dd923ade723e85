//! CommonJS-style `require` for evaluated scripts.
//!
//! `require(id)` resolves `host/<name>` to a host value registered on the
//! [`ModuleLoader`] and any other id to `<search path>/<id>.js`. Source
//! modules run with `require`, `exports` and `module` in scope. Every id is
//! loaded once per context; later calls return the cached `module.exports`.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::host::{HostError, HostValue};

/// Prefix of ids that name registered host values.
pub const HOST_PREFIX: &str = "host/";

/// Script factory for the global `require`, called with the resolver.
pub(crate) const REQUIRE_SOURCE: &str = r#"
(function (resolve) {
    "use strict";
    var cache = Object.create(null);
    var compile = Function;
    function require(id) {
        id = String(id);
        if (id in cache) return cache[id].exports;
        var found = resolve(id);
        var module = { id: id, exports: {} };
        cache[id] = module;
        try {
            if (found.kind === "host") {
                module.exports = found.value;
            } else {
                compile("require", "exports", "module", found.source)(require, module.exports, module);
            }
        } catch (e) {
            delete cache[id];
            throw e;
        }
        return module.exports;
    }
    return require;
})
"#;

/// A resolved module.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// A registered host value, exported as is.
    Host(HostValue),
    /// Script source read from a search path.
    Source { path: PathBuf, source: String },
}

impl Resolved {
    /// The record handed to the script-side `require`.
    fn into_record(self) -> HostValue {
        match self {
            Resolved::Host(value) => {
                HostValue::dict([("kind", HostValue::str("host")), ("value", value)])
            }
            Resolved::Source { source, .. } => HostValue::dict([
                ("kind", HostValue::str("source")),
                ("source", HostValue::str(source)),
            ]),
        }
    }
}

/// Resolves `require` ids for one context.
#[derive(Debug, Clone, Default)]
pub struct ModuleLoader {
    search_paths: Vec<PathBuf>,
    host_modules: HashMap<String, HostValue>,
}

impl ModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory searched for `<id>.js`, after those already added.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Expose `value` to scripts as `require("host/<name>")`.
    pub fn with_host_module(mut self, name: impl Into<String>, value: HostValue) -> Self {
        self.host_modules.insert(name.into(), value);
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn resolve(&self, id: &str) -> Result<Resolved, HostError> {
        if let Some(name) = id.strip_prefix(HOST_PREFIX) {
            return self
                .host_modules
                .get(name)
                .cloned()
                .map(Resolved::Host)
                .ok_or_else(|| unable_to_load(id));
        }

        let file_name = if id.ends_with(".js") {
            id.to_string()
        } else {
            format!("{id}.js")
        };
        for dir in &self.search_paths {
            let path = dir.join(&file_name);
            if !path.is_file() {
                continue;
            }
            return read_module(&path).map(|source| Resolved::Source { path, source });
        }
        tracing::debug!(id, "module not found on any search path");
        Err(unable_to_load(id))
    }

    /// The host callable the script-side `require` resolves ids through.
    pub(crate) fn into_resolver(self) -> HostValue {
        HostValue::function("resolve", move |args| {
            let id = args
                .first()
                .and_then(HostValue::as_str)
                .ok_or_else(|| HostError::type_error("require() expects a module id"))?;
            self.resolve(id).map(Resolved::into_record)
        })
    }
}

fn read_module(path: &Path) -> Result<String, HostError> {
    tracing::debug!(path = %path.display(), "loading module");
    fs::read_to_string(path).map_err(|e| {
        HostError::new("ImportError", format!("Unable to load {}: {e}", path.display()))
    })
}

fn unable_to_load(id: &str) -> HostError {
    HostError::new("ImportError", format!("Unable to load {id}"))
}
