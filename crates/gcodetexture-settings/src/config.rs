//! Configuration file handling
//!
//! A configuration holds the processing switches and the ordered list of
//! modifiers. It can be stored as TOML or JSON:
//!
//! ```toml
//! [processing]
//! invalid_state_policy = "emit_unmodified"
//! output_filter = "all"
//! annotate_z_changes = true
//!
//! [[modifiers]]
//! type = "radial_ripple"
//! min_height = 5.0
//! increase_per_unit_height = 0.05
//! cycles_per_revolution = 4.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gcodetexture_core::TextureError;
use gcodetexture_processing::{
    Modifier, ModifierKind, ModifierPipeline, ProcessingSettings, TextureEngine,
};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Directory name under the platform config directory
const CONFIG_DIR_NAME: &str = "gcodetexture";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

fn default_extrusion_only() -> bool {
    true
}

/// One modifier entry as written in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierConfig {
    /// Transform type tag (`radial_ripple`, `flow_wave`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional name for logs; defaults to the type tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Height at which the modifier starts to apply
    pub min_height: f64,
    /// Only apply to moves with an explicit E word
    #[serde(default = "default_extrusion_only")]
    pub extrusion_only: bool,
    /// Transform-specific parameters
    #[serde(flatten)]
    pub params: BTreeMap<String, f64>,
}

impl ModifierConfig {
    /// Create an entry with no parameters
    pub fn new(kind: impl Into<String>, min_height: f64) -> Self {
        Self {
            kind: kind.into(),
            label: None,
            min_height,
            extrusion_only: true,
            params: BTreeMap::new(),
        }
    }

    /// Set a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name used in logs and error messages
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.kind)
    }

    /// Build the typed modifier
    ///
    /// # Errors
    /// Fails on an unknown type tag, a missing or unknown parameter, or a
    /// parameter value the modifier rejects.
    pub fn build(&self) -> SettingsResult<Modifier> {
        let label = self.display_label().to_string();
        let names = ModifierKind::parameter_names(&self.kind).ok_or_else(|| {
            TextureError::UnknownModifierType {
                kind: self.kind.clone(),
            }
        })?;

        if let Some(unknown) = self.params.keys().find(|k| !names.contains(&k.as_str())) {
            return Err(ConfigError::UnknownParameter {
                modifier: label,
                param: unknown.clone(),
            }
            .into());
        }

        let param = |name: &str| {
            self.params
                .get(name)
                .copied()
                .ok_or_else(|| TextureError::MissingParameter {
                    modifier: label.clone(),
                    param: name.to_string(),
                })
        };

        let kind = match self.kind.as_str() {
            "radial_ripple" => ModifierKind::RadialRipple {
                increase_per_unit_height: param("increase_per_unit_height")?,
                cycles_per_revolution: param("cycles_per_revolution")?,
            },
            "flow_wave" => ModifierKind::FlowWave {
                frequency_per_unit_height: param("frequency_per_unit_height")?,
                amplitude_fraction: param("amplitude_fraction")?,
            },
            other => {
                return Err(TextureError::UnknownModifierType {
                    kind: other.to_string(),
                }
                .into())
            }
        };

        Ok(Modifier::new(kind, self.min_height, self.extrusion_only, label)?)
    }
}

impl From<&Modifier> for ModifierConfig {
    fn from(modifier: &Modifier) -> Self {
        let mut config = ModifierConfig::new(modifier.type_tag(), modifier.min_height);
        config.extrusion_only = modifier.extrusion_only;
        if modifier.label != modifier.type_tag() {
            config.label = Some(modifier.label.clone());
        }
        match modifier.kind {
            ModifierKind::RadialRipple {
                increase_per_unit_height,
                cycles_per_revolution,
            } => config
                .with_param("increase_per_unit_height", increase_per_unit_height)
                .with_param("cycles_per_revolution", cycles_per_revolution),
            ModifierKind::FlowWave {
                frequency_per_unit_height,
                amplitude_fraction,
            } => config
                .with_param("frequency_per_unit_height", frequency_per_unit_height)
                .with_param("amplitude_fraction", amplitude_fraction),
        }
    }
}

/// Complete texture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Processing switches
    pub processing: ProcessingSettings,
    /// Modifiers in application order
    pub modifiers: Vec<ModifierConfig>,
}

impl Default for Config {
    /// Radial ripple from 5 mm (0.05 mm per mm, 4 per revolution) followed
    /// by a flow wave from 5 mm (1 band per mm, 2 % amplitude)
    fn default() -> Self {
        Self {
            processing: ProcessingSettings::default(),
            modifiers: vec![
                ModifierConfig::new("radial_ripple", 5.0)
                    .with_param("increase_per_unit_height", 0.05)
                    .with_param("cycles_per_revolution", 4.0),
                ModifierConfig::new("flow_wave", 5.0)
                    .with_param("frequency_per_unit_height", 1.0)
                    .with_param("amplitude_fraction", 0.02),
            ],
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/gcodetexture/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(
            "Loaded {} modifier(s) from {}",
            config.modifiers.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load the given file, or the default file if it exists, or the defaults
    pub fn discover(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Serialize as TOML
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration by building every modifier
    pub fn validate(&self) -> SettingsResult<()> {
        self.modifiers.iter().try_for_each(|m| m.build().map(|_| ()))
    }

    /// Build the modifier pipeline in configuration order
    pub fn build_pipeline(&self) -> SettingsResult<ModifierPipeline> {
        let modifiers = self
            .modifiers
            .iter()
            .map(ModifierConfig::build)
            .collect::<SettingsResult<Vec<_>>>()?;
        for modifier in &modifiers {
            tracing::info!("Modifier {}", modifier);
        }

        let mut pipeline = ModifierPipeline::new();
        pipeline.register_all(modifiers);
        Ok(pipeline)
    }

    /// Build a fresh engine for one stream
    pub fn build_engine(&self) -> SettingsResult<TextureEngine> {
        Ok(TextureEngine::with_settings(
            self.build_pipeline()?,
            self.processing,
        ))
    }
}
