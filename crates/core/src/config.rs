//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the plugins and the REST layer. Nothing here reads environment variables: the
//! binaries collect overrides into [`ConfigOverrides`] and hand them over explicitly.
//!
//! Settings are read from an optional YAML file using the same property names the server has
//! always used (`hapi.fhir.fhir_version`, `hello.world.message`), then overridden field by field.

use crate::constants::{
    DEFAULT_FHIR_VERSION, DEFAULT_HELLO_WORLD_MESSAGE, DEFAULT_REST_ADDR,
};
use crate::{RulerError, RulerResult};
use fhir::FhirVersion;
use serde::Deserialize;
use std::path::Path;

/// Settings for the hello-world plugin (`hello.world.*`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelloWorldProperties {
    /// Message returned by `$hello-world`.
    pub message: String,
}

impl Default for HelloWorldProperties {
    fn default() -> Self {
        Self {
            message: DEFAULT_HELLO_WORLD_MESSAGE.to_string(),
        }
    }
}

/// Values that take precedence over the config file, typically taken from the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub fhir_version: Option<String>,
    pub hello_world_message: Option<String>,
    pub rest_addr: Option<String>,
}

/// Ruler configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct RulerConfig {
    fhir_version: FhirVersion,
    rest_addr: String,
    hello_world: HelloWorldProperties,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            fhir_version: DEFAULT_FHIR_VERSION,
            rest_addr: DEFAULT_REST_ADDR.to_string(),
            hello_world: HelloWorldProperties::default(),
        }
    }
}

impl RulerConfig {
    /// Create a new `RulerConfig`.
    pub fn new(
        fhir_version: FhirVersion,
        rest_addr: String,
        hello_world: HelloWorldProperties,
    ) -> RulerResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(RulerError::Config("rest_addr cannot be empty".into()));
        }

        Ok(Self {
            fhir_version,
            rest_addr,
            hello_world,
        })
    }

    pub fn fhir_version(&self) -> FhirVersion {
        self.fhir_version
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn hello_world(&self) -> &HelloWorldProperties {
        &self.hello_world
    }

    /// Parse configuration from YAML text. Absent settings keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError::Config`] if the YAML does not match the expected layout (unknown
    /// keys included) or names an unsupported FHIR version.
    pub fn from_yaml_str(yaml_text: &str) -> RulerResult<Self> {
        let file = if yaml_text.trim().is_empty() {
            RulerConfigFile::default()
        } else {
            let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
            match serde_path_to_error::deserialize::<_, RulerConfigFile>(deserializer) {
                Ok(parsed) => parsed,
                Err(err) => {
                    let path = err.path().to_string();
                    let source = err.into_inner();
                    let path = if path.is_empty() || path == "." {
                        "<root>"
                    } else {
                        path.as_str()
                    };
                    return Err(RulerError::Config(format!(
                        "config schema mismatch at {path}: {source}"
                    )));
                }
            }
        };

        let fhir_version = fhir_version_from_env_value(file.hapi.fhir.fhir_version)?;
        Self::new(
            fhir_version,
            file.rest_addr
                .unwrap_or_else(|| DEFAULT_REST_ADDR.to_string()),
            file.hello.world,
        )
    }

    /// Load configuration from an optional YAML file and apply `overrides` on top.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError`] if the file cannot be read or parsed, or an override is invalid.
    pub fn load(file: Option<&Path>, overrides: ConfigOverrides) -> RulerResult<Self> {
        let mut cfg = match file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(RulerError::ConfigRead)?;
                tracing::info!(path = %path.display(), "loaded ruler config file");
                Self::from_yaml_str(&text)?
            }
            None => Self::default(),
        };

        if overrides.fhir_version.is_some() {
            cfg.fhir_version = fhir_version_from_env_value(overrides.fhir_version)?;
        }
        if let Some(message) = overrides.hello_world_message {
            cfg.hello_world.message = message;
        }
        if let Some(addr) = overrides.rest_addr {
            cfg = Self::new(cfg.fhir_version, addr, cfg.hello_world)?;
        }

        Ok(cfg)
    }
}

/// Parse the FHIR version from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_FHIR_VERSION`].
pub fn fhir_version_from_env_value(value: Option<String>) -> RulerResult<FhirVersion> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<FhirVersion>()).transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_FHIR_VERSION))
}

// ============================================================================
// File layout (internal)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulerConfigFile {
    hapi: HapiSection,
    hello: HelloSection,
    rest_addr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HapiSection {
    fhir: HapiFhirSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HapiFhirSection {
    fhir_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HelloSection {
    world: HelloWorldProperties,
}
