//! Program metadata, built in code or loaded from a JSON manifest.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::action::ArgDef;
use crate::error::ManifestError;

/// Name, version and help texts of a program.
///
/// The manifest shape follows package manifests: `bin` maps executable names
/// to paths, and its first key wins over `name` as the displayed program name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramInfo {
    pub name: String,
    pub version: String,
    #[serde(alias = "desc")]
    pub description: String,
    pub args: Vec<ArgDef>,
    pub examples: Vec<String>,
    pub notes: String,
    pub documentation: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub bin: IndexMap<String, String>,
}

impl ProgramInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<ArgDef>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = url.into();
        self
    }

    /// Displayed program name: the first `bin` key, else `name`.
    pub fn program_name(&self) -> &str {
        self.bin
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn from_manifest_str(json: &str) -> Result<Self, ManifestError> {
        let info: Self = serde_json::from_str(json)?;
        if info.program_name().trim().is_empty() {
            return Err(ManifestError::MissingName);
        }
        Ok(info)
    }

    pub fn from_manifest_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading program manifest");
        Self::from_manifest_str(&json)
    }
}

impl From<&str> for ProgramInfo {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProgramInfo {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
