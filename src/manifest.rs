//! Package manifests (`package.json`).
//!
//! A [`Manifest`] keeps the whole JSON object in its original key order and
//! only touches the fields it is asked to change, so rewriting a manifest
//! produces a minimal diff.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";

const OPTIONAL_DEPENDENCIES: &str = "optionalDependencies";

/// The `bin` field: either a single path or a map of command name to path.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum BinField {
    Single(String),
    Commands(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("Invalid JSON")?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => bail!("Manifest is not a JSON object"),
        }
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Two-space indentation and a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut content = serde_json::to_string_pretty(&self.fields)?;
        content.push('\n');
        Ok(content)
    }

    /// Overwrite `path` with this manifest.
    ///
    /// The content goes to a sibling temporary file first and is renamed over
    /// the target, so `path` is never left half written.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        let content = self.to_pretty_string()?;
        let tmp = path.with_extension("json.tmp");
        runtime.write(&tmp, content.as_bytes())?;
        runtime
            .rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn version(&self) -> Option<&str> {
        self.str_field("version")
    }

    pub fn license(&self) -> Option<&str> {
        self.str_field("license")
    }

    pub fn set_version(&mut self, version: &str) {
        self.fields
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Version pin of `package` in `optionalDependencies`, if declared.
    pub fn optional_dependency(&self, package: &str) -> Option<&str> {
        self.fields
            .get(OPTIONAL_DEPENDENCIES)
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(package))
            .and_then(Value::as_str)
    }

    /// Pin `package` to `version` in `optionalDependencies`, adding the
    /// entry (and the map) when missing. Other entries are left alone.
    pub fn set_optional_dependency(&mut self, package: &str, version: &str) {
        let deps = self
            .fields
            .entry(OPTIONAL_DEPENDENCIES)
            .or_insert_with(|| Value::Object(Map::new()));
        if !deps.is_object() {
            *deps = Value::Object(Map::new());
        }
        if let Value::Object(deps) = deps {
            deps.insert(package.to_string(), Value::String(version.to_string()));
        }
    }

    /// First command name declared in `bin`.
    ///
    /// A plain string `bin` names the command after the package (without
    /// its scope).
    pub fn bin_command(&self) -> Option<String> {
        let bin = self.fields.get("bin")?;
        match serde_json::from_value::<BinField>(bin.clone()).ok()? {
            BinField::Commands(commands) => commands.keys().next().cloned(),
            BinField::Single(_) => self
                .name()
                .map(|name| name.rsplit('/').next().unwrap_or(name).to_string()),
        }
    }
}
