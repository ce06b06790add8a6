//! Constants used throughout the ruler core crate.
//!
//! Defaults and environment variable names live here so the binaries and the config loader
//! agree on them.

use fhir::FhirVersion;

/// FHIR release used when none is configured.
pub const DEFAULT_FHIR_VERSION: FhirVersion = FhirVersion::R4;

/// Address the REST server binds to when none is configured.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8080";

/// Default value of `hello.world.message`.
pub const DEFAULT_HELLO_WORLD_MESSAGE: &str = "Bye";

/// Environment variable naming an optional YAML config file.
pub const ENV_CONFIG_FILE: &str = "RULER_CONFIG_FILE";

/// Environment variable overriding `hapi.fhir.fhir_version`.
pub const ENV_FHIR_VERSION: &str = "HAPI_FHIR_FHIR_VERSION";

/// Environment variable overriding `hello.world.message`.
pub const ENV_HELLO_WORLD_MESSAGE: &str = "HELLO_WORLD_MESSAGE";

/// Environment variable overriding the REST bind address.
pub const ENV_REST_ADDR: &str = "RULER_REST_ADDR";

/// Reference prefix applied to Composition subjects.
pub const PATIENT_REFERENCE_TYPE: &str = "Patient";

/// Reference prefix applied to Composition custodians.
pub const ORGANIZATION_REFERENCE_TYPE: &str = "Organization";

/// Maximum length of a FHIR logical id.
pub const MAX_RESOURCE_ID_LEN: usize = 64;
