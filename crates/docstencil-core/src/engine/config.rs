use serde::{Deserialize, Serialize};

/// Engine settings, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub resolution: ResolutionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Whether an unknown variable name is an error. Replacers that treat
    /// missing data as meaningful still catch it either way.
    #[serde(default = "default_strict_variables")]
    pub strict_variables: bool,
    /// How many levels of deferred work one pass may queue. Guards against
    /// self-referential payloads; 0 disables the check.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            strict_variables: true,
            max_depth: 64,
        }
    }
}

fn default_strict_variables() -> bool {
    true
}

fn default_max_depth() -> u32 {
    64
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Keep the control wrappers after a pass. Turn off to flatten the
    /// document into plain content.
    #[serde(default = "default_keep_controls")]
    pub keep_controls: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            keep_controls: true,
        }
    }
}

fn default_keep_controls() -> bool {
    true
}

impl EngineConfig {
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| crate::error::EngineError::ConfigParseError(e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| crate::error::EngineError::ConfigParseError(e.to_string()))
    }

    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::EngineError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| crate::error::EngineError::ConfigParseError(e.to_string()))?;

        Ok(())
    }
}
