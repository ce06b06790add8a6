//! Coding settings consumed by the builders.
//!
//! Builders take codes as plain settings rather than FHIR datatypes so one value can be
//! rendered into any release's resource.

use fhir::{CodeableConcept, Coding};

/// A single coding: system, code and optional display.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodingSettings {
    system: String,
    code: String,
    display: Option<String>,
}

impl CodingSettings {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            code: code.into(),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn to_coding(&self) -> Coding {
        Coding::new(&self.system, &self.code, self.display.clone())
    }
}

/// A set of codings plus optional text.
///
/// Codings keep insertion order. A coding whose system and code are already present replaces
/// nothing and is dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeableConceptSettings {
    codings: Vec<CodingSettings>,
    text: Option<String>,
}

impl CodeableConceptSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coding.
    pub fn add(mut self, coding: CodingSettings) -> Self {
        let duplicate = self
            .codings
            .iter()
            .any(|c| c.system == coding.system && c.code == coding.code);
        if !duplicate {
            self.codings.push(coding);
        }
        self
    }

    /// Add a coding from its parts.
    pub fn add_coding(
        self,
        system: impl Into<String>,
        code: impl Into<String>,
        display: Option<&str>,
    ) -> Self {
        let mut coding = CodingSettings::new(system, code);
        if let Some(display) = display {
            coding = coding.with_display(display);
        }
        self.add(coding)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn coding_settings(&self) -> &[CodingSettings] {
        &self.codings
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn to_codeable_concept(&self) -> CodeableConcept {
        CodeableConcept {
            coding: self.codings.iter().map(CodingSettings::to_coding).collect(),
            text: self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOINC: &str = "http://loinc.org";

    #[test]
    fn duplicate_codings_are_dropped() {
        let settings = CodeableConceptSettings::new()
            .add_coding(LOINC, "11488-4", Some("Consult note"))
            .add_coding(LOINC, "11488-4", Some("Consultation note"));

        assert_eq!(settings.coding_settings().len(), 1);
        assert_eq!(settings.coding_settings()[0].display(), Some("Consult note"));
    }

    #[test]
    fn same_code_in_another_system_is_kept() {
        let settings = CodeableConceptSettings::new()
            .add_coding(LOINC, "123", None)
            .add_coding("http://snomed.info/sct", "123", None);
        assert_eq!(settings.coding_settings().len(), 2);
    }

    #[test]
    fn renders_codeable_concept() {
        let cc = CodeableConceptSettings::new()
            .add(CodingSettings::new(LOINC, "11488-4").with_display("Consult note"))
            .with_text("Consult")
            .to_codeable_concept();

        assert_eq!(cc.text.as_deref(), Some("Consult"));
        let coding = cc.coding_first_rep().expect("one coding");
        assert_eq!(coding.system.as_deref(), Some(LOINC));
        assert_eq!(coding.code.as_deref(), Some("11488-4"));
        assert_eq!(coding.display.as_deref(), Some("Consult note"));
    }
}
