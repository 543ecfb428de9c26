//! Schema templates
//!
//! A template names a data type and its ordered field list, plus the optional
//! sync metadata. Format is chosen by file extension:
//!
//! ```toml
//! target_type = "contact"
//! fields = ["type", "id", "name", "email", "status"]
//! version = "1.2"
//! status_options = ["open", "closed"]
//!
//! [bindings]
//! email = "col-email"
//!
//! [id]
//! prefix = "C"
//! digits = 3
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use doc_blocks::{IdConfig, SyncOptions, Version, parse_version};
use serde::Deserialize;

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaTemplate {
    /// Value of the `type` field this template governs
    pub target_type: String,
    /// Field keys in order
    pub fields: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub bindings: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub status_options: Option<serde_json::Value>,
    #[serde(default)]
    pub id: Option<IdConfig>,
}

impl SchemaTemplate {
    /// Load a template, detecting the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let template: Self = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| config_error(path, "TOML", e))?,
            "json" => serde_json::from_str(&content).map_err(|e| config_error(path, "JSON", e))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| config_error(path, "YAML", e))?
            }
            _ => return Err(CliError::UnsupportedFormat { extension }),
        };

        if template.target_type.trim().is_empty() {
            return Err(config_error(path, "template", "target_type must not be empty"));
        }
        tracing::debug!(
            path = %path.display(),
            target_type = %template.target_type,
            fields = template.fields.len(),
            "Loaded schema template"
        );
        Ok(template)
    }

    /// The template's version, `1.0` when it declares none
    pub fn version(&self) -> Result<Version> {
        Ok(parse_version(self.version.as_deref())?)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            bindings: self.bindings.clone(),
            status_options: self.status_options.clone(),
            id_config: self.id.clone(),
        }
    }
}

fn config_error(path: &Path, format: &str, message: impl ToString) -> CliError {
    CliError::Config {
        path: path.to_path_buf(),
        format: format.to_string(),
        message: message.to_string(),
    }
}
