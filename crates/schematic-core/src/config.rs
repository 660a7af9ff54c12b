use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::{Naming, TransformOptions};

/// Project configuration loaded from `.schematic.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchematicConfig {
    /// Schema path, or `-` for standard input.
    pub input: String,
    /// Output file; standard output when unset.
    pub output: Option<String>,
    /// Package name; derived from the schema title when unset.
    pub package: Option<String>,
    /// Base URL; taken from the root `self` link when unset.
    pub base_url: Option<String>,
    /// Emit description comments on generated declarations.
    pub comments: bool,
    /// Extra initialisms on top of the built-in list.
    pub acronyms: Vec<String>,
}

impl Default for SchematicConfig {
    fn default() -> Self {
        Self {
            input: "schema.json".to_string(),
            output: None,
            package: None,
            base_url: None,
            comments: true,
            acronyms: Vec::new(),
        }
    }
}

impl SchematicConfig {
    pub fn naming(&self) -> Naming {
        Naming::with_acronyms(&self.acronyms)
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            package: self.package.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".schematic.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SchematicConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let config: SchematicConfig = serde_yaml_ng::from_str(&content)?;
    log::debug!("loaded config from {}", path.display());
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# schematic configuration
input: schema.json
# output: client.go      # omit to write to stdout
# package: heroku        # defaults to the first word of the schema title
# base_url: https://api.example.com   # defaults to the root self link
comments: true
acronyms: []
  # - Ip
  # - Sku
"#
}
