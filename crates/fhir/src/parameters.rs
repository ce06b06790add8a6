//! R4 Parameters wire model.
//!
//! Operation inputs arrive as a Parameters resource. Only the value types the ruler's
//! operations read are modelled; embedded resources are kept as raw JSON.

use crate::{expect_resource_type, parse_json, FhirResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named operation parameter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametersParameter {
    pub name: String,

    #[serde(rename = "valueString", skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,

    #[serde(rename = "valueCode", skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,

    #[serde(rename = "valueDate", skip_serializing_if = "Option::is_none")]
    pub value_date: Option<String>,

    #[serde(rename = "valueDateTime", skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl ParametersParameter {
    /// The parameter's value as text, whichever primitive slot carries it.
    pub fn primitive_value(&self) -> Option<&str> {
        self.value_string
            .as_deref()
            .or(self.value_code.as_deref())
            .or(self.value_date.as_deref())
            .or(self.value_date_time.as_deref())
    }
}

/// An R4 Parameters resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<ParametersParameter>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            resource_type: "Parameters".to_string(),
            parameter: Vec::new(),
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `valueString` parameter.
    pub fn add_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameter.push(ParametersParameter {
            name: name.into(),
            value_string: Some(value.into()),
            ..ParametersParameter::default()
        });
        self
    }

    /// Add a `valueDate` parameter.
    pub fn add_date(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameter.push(ParametersParameter {
            name: name.into(),
            value_date: Some(value.into()),
            ..ParametersParameter::default()
        });
        self
    }

    /// Add a parameter carrying an embedded resource.
    pub fn add_resource(mut self, name: impl Into<String>, resource: Value) -> Self {
        self.parameter.push(ParametersParameter {
            name: name.into(),
            resource: Some(resource),
            ..ParametersParameter::default()
        });
        self
    }

    /// First parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&ParametersParameter> {
        self.parameter.iter().find(|p| p.name == name)
    }

    /// Primitive value of the first parameter called `name`.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParametersParameter::primitive_value)
    }

    /// Embedded resource of the first parameter called `name`.
    pub fn get_resource(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(|p| p.resource.as_ref())
    }

    /// Parse a Parameters resource from FHIR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if the JSON does not match the wire shape or the
    /// resourceType is not `Parameters`.
    pub fn parse(json_text: &str) -> FhirResult<Self> {
        let parameters: Parameters = parse_json(json_text, "Parameters")?;
        expect_resource_type(&parameters.resource_type, "Parameters")?;
        Ok(parameters)
    }
}
