// Engine configuration
// Chosen when an engine is built and fixed for its lifetime.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens to `current` after an operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplacementPolicy {
    /// Every result becomes the new `current`.
    #[default]
    AlwaysReplace,
    /// Only results of the same runtime kind as `current` replace it. Any
    /// other result is returned to the caller and the chain keeps its value.
    ReplaceIfSameType,
}

/// How the engine settles a name both scopes implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Only an outer receiver equal to the original continues the chain.
    /// Anything else cannot be dispatched.
    Strict,
    /// As `Strict`, but an unrelated outer receiver that handles the name
    /// takes the call.
    #[default]
    Escape,
    /// As `Escape`, and an outer receiver of the same kind as the original
    /// also continues the chain.
    Permissive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub replacement: ReplacementPolicy,
    pub ambiguity: AmbiguityPolicy,
}

impl EngineConfig {
    pub fn with_replacement(mut self, replacement: ReplacementPolicy) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }

    pub fn from_toml_str(content: &str) -> RuntimeResult<Self> {
        toml::from_str(content).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> RuntimeResult<String> {
        toml::to_string_pretty(self).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> RuntimeResult<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| {
            RuntimeError::ConfigError(format!("failed to write {}: {}", path.display(), e))
        })
    }
}
