//! Release-independent resource settings.
//!
//! Every builder embeds a [`ResourceBuilder`] for the fields all resources share: logical id,
//! profiles and a business identifier.

use crate::constants::MAX_RESOURCE_ID_LEN;
use crate::{RulerError, RulerResult};
use fhir::{FhirVersion, Identifier, Meta};
use uuid::Uuid;

/// Shared settings for a resource under construction.
#[derive(Clone, Debug)]
pub struct ResourceBuilder {
    version: FhirVersion,
    id: Option<String>,
    profiles: Vec<String>,
    identifier: Option<(String, String)>,
}

/// Base fields rendered from a [`ResourceBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceBase {
    pub id: String,
    pub meta: Option<Meta>,
    pub identifier: Option<Identifier>,
}

impl ResourceBuilder {
    /// Settings for a resource targeting `version`.
    pub fn new(version: FhirVersion) -> Self {
        Self {
            version,
            id: None,
            profiles: Vec::new(),
            identifier: None,
        }
    }

    /// Set the logical id. A fresh UUID is used when this is never called.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a `meta.profile` canonical URL.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        if !self.profiles.contains(&profile) {
            self.profiles.push(profile);
        }
        self
    }

    /// Set the business identifier.
    pub fn with_identifier(mut self, system: impl Into<String>, value: impl Into<String>) -> Self {
        self.identifier = Some((system.into(), value.into()));
        self
    }

    pub fn version(&self) -> FhirVersion {
        self.version
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// Render the shared fields.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError::InvalidId`] if the id is not a valid FHIR logical id
    /// (1-64 characters from `A-Z a-z 0-9 - .`).
    pub fn build_base(&self) -> RulerResult<ResourceBase> {
        let id = match &self.id {
            Some(id) => {
                validate_resource_id(id)?;
                id.clone()
            }
            None => Uuid::new_v4().to_string(),
        };

        Ok(ResourceBase {
            id,
            meta: Meta::with_profiles(&self.profiles),
            identifier: self.identifier.as_ref().map(|(system, value)| Identifier {
                system: Some(system.clone()),
                value: Some(value.clone()),
            }),
        })
    }
}

fn validate_resource_id(id: &str) -> RulerResult<()> {
    let ok = !id.is_empty()
        && id.len() <= MAX_RESOURCE_ID_LEN
        && id
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-'));

    if !ok {
        return Err(RulerError::InvalidId(id.to_string()));
    }
    Ok(())
}
