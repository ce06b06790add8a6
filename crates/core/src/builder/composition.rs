//! Composition builder.
//!
//! One fluent surface produces a Composition for any supported FHIR release. Reference
//! arguments are normalised as they are set; required fields and the status code are checked
//! when [`CompositionBuilder::build`] runs, against the release the builder targets.

use super::reference::{normalize_reference, validate_author_reference};
use super::{CodeableConceptSettings, ResourceBase, ResourceBuilder};
use crate::constants::{ORGANIZATION_REFERENCE_TYPE, PATIENT_REFERENCE_TYPE};
use crate::{RulerError, RulerResult};
use chrono::{DateTime, SecondsFormat, Utc};
use fhir::composition::{r5, stu};
use fhir::{CodeableConcept, Composition, FhirVersion, Reference};

/// Builder for a Composition resource.
///
/// ```ignore
/// let composition = CompositionBuilder::new(FhirVersion::R4)
///     .with_status("final")
///     .with_title("Discharge summary")
///     .with_type(note_type)
///     .with_subject("p1")
///     .with_author("Practitioner/a1")?
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct CompositionBuilder {
    resource: ResourceBuilder,
    status: Option<String>,
    title: Option<String>,
    type_: Option<CodeableConceptSettings>,
    subject: Option<String>,
    author: Option<String>,
    custodian: Option<String>,
    date: DateTime<Utc>,
}

/// Fields that passed the build-time checks.
struct Validated<'a> {
    base: ResourceBase,
    status: &'a str,
    title: &'a str,
    type_: CodeableConcept,
    author: &'a str,
    date: String,
}

impl CompositionBuilder {
    /// A builder targeting `version`, dated now.
    pub fn new(version: FhirVersion) -> Self {
        Self {
            resource: ResourceBuilder::new(version),
            status: None,
            title: None,
            type_: None,
            subject: None,
            author: None,
            custodian: None,
            date: Utc::now(),
        }
    }

    /// A builder with every required field supplied up front.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError::InvalidAuthor`] if `author` is not an allowed reference.
    pub fn with_required(
        version: FhirVersion,
        id: impl Into<String>,
        type_: CodeableConceptSettings,
        status: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
    ) -> RulerResult<Self> {
        Self::new(version)
            .with_id(id)
            .with_type(type_)
            .with_status(status)
            .with_title(title)
            .with_author(author)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.resource = self.resource.with_id(id);
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.resource = self.resource.with_profile(profile);
        self
    }

    pub fn with_identifier(mut self, system: impl Into<String>, value: impl Into<String>) -> Self {
        self.resource = self.resource.with_identifier(system, value);
        self
    }

    /// Set the status code. Whether the code exists in the target release is checked by
    /// [`build`](Self::build).
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_type(mut self, type_: CodeableConceptSettings) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Set the subject, prefixing bare ids with `Patient/`.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(normalize_reference(PATIENT_REFERENCE_TYPE, subject.into()));
        self
    }

    /// Set the author.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError::InvalidAuthor`] unless the reference starts with Practitioner,
    /// PractitionerRole, Device, Patient, RelatedPerson or Organization.
    pub fn with_author(mut self, author: impl Into<String>) -> RulerResult<Self> {
        let author = author.into();
        validate_author_reference(&author)?;
        self.author = Some(author);
        Ok(self)
    }

    /// Set the custodian, prefixing bare ids with `Organization/`.
    pub fn with_custodian(mut self, custodian: impl Into<String>) -> Self {
        self.custodian = Some(normalize_reference(
            ORGANIZATION_REFERENCE_TYPE,
            custodian.into(),
        ));
        self
    }

    pub fn version(&self) -> FhirVersion {
        self.resource.version()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn custodian(&self) -> Option<&str> {
        self.custodian.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Build the Composition for the target release.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError`] if:
    /// - type, status, author or title was never set,
    /// - the type does not carry exactly one coding,
    /// - the status is not a Composition status in the target release,
    /// - the id is not a valid FHIR logical id.
    pub fn build(self) -> RulerResult<Composition> {
        let version = self.version();
        let validated = self.validate()?;

        let composition = match version {
            FhirVersion::Dstu2 => Composition::Dstu2(self.initialize_stu(version, validated)?),
            FhirVersion::Dstu2_1 => Composition::Dstu2_1(self.initialize_stu(version, validated)?),
            FhirVersion::Dstu2Hl7Org => {
                Composition::Dstu2Hl7Org(self.initialize_stu(version, validated)?)
            }
            FhirVersion::Dstu3 => Composition::Dstu3(self.initialize_stu(version, validated)?),
            FhirVersion::R4 => Composition::R4(self.initialize_stu(version, validated)?),
            FhirVersion::R5 => Composition::R5(self.initialize_r5(validated)?),
        };

        tracing::debug!(
            version = %version,
            id = composition.id().unwrap_or_default(),
            "built Composition"
        );

        Ok(composition)
    }

    fn validate(&self) -> RulerResult<Validated<'_>> {
        let type_ = self.type_.as_ref().ok_or(RulerError::MissingField("type"))?;
        let status = self
            .status
            .as_deref()
            .ok_or(RulerError::MissingField("status"))?;
        let author = self
            .author
            .as_deref()
            .ok_or(RulerError::MissingField("author"))?;
        let title = self
            .title
            .as_deref()
            .ok_or(RulerError::MissingField("title"))?;

        ensure_single_coding(type_)?;

        Ok(Validated {
            base: self.resource.build_base()?,
            status,
            title,
            type_: type_.to_codeable_concept(),
            author,
            date: self.date.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    fn initialize_stu(
        &self,
        version: FhirVersion,
        validated: Validated<'_>,
    ) -> RulerResult<stu::Composition> {
        Ok(stu::Composition {
            resource_type: "Composition".to_string(),
            id: Some(validated.base.id),
            meta: validated.base.meta,
            identifier: validated.base.identifier,
            status: stu::CompositionStatus::from_code(validated.status, version)?,
            type_: validated.type_,
            subject: Reference::from_literal(self.subject.as_deref()),
            date: validated.date,
            author: Reference::from_literal(Some(validated.author))
                .into_iter()
                .collect(),
            title: validated.title.to_string(),
            custodian: Reference::from_literal(self.custodian.as_deref()),
        })
    }

    fn initialize_r5(&self, validated: Validated<'_>) -> RulerResult<r5::Composition> {
        Ok(r5::Composition {
            resource_type: "Composition".to_string(),
            id: Some(validated.base.id),
            meta: validated.base.meta,
            identifier: validated.base.identifier.into_iter().collect(),
            status: r5::CompositionStatus::from_code(validated.status)?,
            type_: validated.type_,
            subject: Reference::from_literal(self.subject.as_deref())
                .into_iter()
                .collect(),
            date: validated.date,
            author: Reference::from_literal(Some(validated.author))
                .into_iter()
                .collect(),
            title: validated.title.to_string(),
            custodian: Reference::from_literal(self.custodian.as_deref()),
        })
    }
}

fn ensure_single_coding(type_: &CodeableConceptSettings) -> RulerResult<()> {
    match type_.coding_settings() {
        [_] => Ok(()),
        codings => Err(RulerError::TypeCodingCount(codings.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LOINC: &str = "http://loinc.org";

    fn note_type() -> CodeableConceptSettings {
        CodeableConceptSettings::new().add_coding(LOINC, "11488-4", Some("Consult note"))
    }

    fn complete(version: FhirVersion) -> CompositionBuilder {
        CompositionBuilder::new(version)
            .with_id("comp-1")
            .with_status("final")
            .with_title("Consult note")
            .with_type(note_type())
            .with_subject("p1")
            .with_custodian("org1")
            .with_date(Utc.with_ymd_and_hms(2022, 3, 4, 5, 6, 7).unwrap())
            .with_author("Practitioner/a1")
            .expect("valid author")
    }

    #[test]
    fn builds_for_every_release() {
        for version in FhirVersion::ALL {
            let composition = complete(version).build().expect("build composition");
            assert_eq!(composition.version(), version);
            assert_eq!(composition.id(), Some("comp-1"));
            assert_eq!(composition.title(), "Consult note");
            assert_eq!(composition.status_code(), "final");
        }
    }

    #[test]
    fn pre_r5_output_shape() {
        let composition = complete(FhirVersion::R4).build().expect("build");
        let json: serde_json::Value =
            serde_json::from_str(&composition.to_json().expect("json")).expect("valid json");

        assert_eq!(json["resourceType"], "Composition");
        assert_eq!(json["subject"]["reference"], "Patient/p1");
        assert_eq!(json["custodian"]["reference"], "Organization/org1");
        assert_eq!(json["author"][0]["reference"], "Practitioner/a1");
        assert_eq!(json["type"]["coding"][0]["system"], LOINC);
        assert_eq!(json["type"]["coding"][0]["code"], "11488-4");
        assert_eq!(json["type"]["coding"][0]["display"], "Consult note");
        assert_eq!(json["date"], "2022-03-04T05:06:07Z");
    }

    #[test]
    fn r5_output_uses_subject_array() {
        let composition = complete(FhirVersion::R5)
            .with_identifier("urn:ietf:rfc:3986", "urn:uuid:1")
            .build()
            .expect("build");
        let json = serde_json::to_value(&composition).expect("json");

        assert_eq!(json["subject"][0]["reference"], "Patient/p1");
        assert_eq!(json["identifier"][0]["value"], "urn:uuid:1");
        assert_eq!(json["custodian"]["reference"], "Organization/org1");
    }

    #[test]
    fn fails_when_required_field_missing() {
        let cases: [(&str, CompositionBuilder); 4] = [
            (
                "status",
                CompositionBuilder::new(FhirVersion::R4)
                    .with_title("t")
                    .with_type(note_type())
                    .with_author("Device/d1")
                    .unwrap(),
            ),
            (
                "title",
                CompositionBuilder::new(FhirVersion::R4)
                    .with_status("final")
                    .with_type(note_type())
                    .with_author("Device/d1")
                    .unwrap(),
            ),
            (
                "type",
                CompositionBuilder::new(FhirVersion::R4)
                    .with_status("final")
                    .with_title("t")
                    .with_author("Device/d1")
                    .unwrap(),
            ),
            (
                "author",
                CompositionBuilder::new(FhirVersion::R4)
                    .with_status("final")
                    .with_title("t")
                    .with_type(note_type()),
            ),
        ];

        for (field, builder) in cases {
            let err = builder.build().expect_err("missing field");
            assert!(
                matches!(err, RulerError::MissingField(f) if f == field),
                "expected MissingField({field}), got {err:?}"
            );
        }
    }

    #[test]
    fn fails_unless_type_has_exactly_one_coding() {
        let empty = complete(FhirVersion::R4).with_type(CodeableConceptSettings::new());
        let err = empty.build().expect_err("no codings");
        assert!(matches!(err, RulerError::TypeCodingCount(0)));

        let two = complete(FhirVersion::R4).with_type(
            note_type().add_coding(LOINC, "34133-9", Some("Summary of episode note")),
        );
        let err = two.build().expect_err("two codings");
        assert!(matches!(err, RulerError::TypeCodingCount(2)));
    }

    #[test]
    fn type_text_is_kept() {
        let composition = complete(FhirVersion::R5)
            .with_type(note_type().with_text("Consultation"))
            .build()
            .expect("build");
        let json = serde_json::to_value(&composition).expect("json");
        assert_eq!(json["type"]["text"], "Consultation");
        assert_eq!(json["type"]["coding"][0]["code"], "11488-4");
    }

    #[test]
    fn subject_normalisation() {
        let b = CompositionBuilder::new(FhirVersion::R4).with_subject("p1");
        assert_eq!(b.subject(), Some("Patient/p1"));

        let b = CompositionBuilder::new(FhirVersion::R4).with_subject("Patient/p1");
        assert_eq!(b.subject(), Some("Patient/p1"));

        let b = CompositionBuilder::new(FhirVersion::R4).with_subject("");
        assert_eq!(b.subject(), Some(""));
    }

    #[test]
    fn custodian_normalisation() {
        let b = CompositionBuilder::new(FhirVersion::R4).with_custodian("o1");
        assert_eq!(b.custodian(), Some("Organization/o1"));

        let b = CompositionBuilder::new(FhirVersion::R4).with_custodian("Organization/o1");
        assert_eq!(b.custodian(), Some("Organization/o1"));

        let b = CompositionBuilder::new(FhirVersion::R4).with_custodian("");
        assert_eq!(b.custodian(), Some(""));
    }

    #[test]
    fn empty_subject_is_omitted_from_output() {
        let composition = complete(FhirVersion::Dstu2)
            .with_subject("")
            .build()
            .expect("build");
        let json = serde_json::to_value(&composition).expect("json");
        assert!(json.get("subject").is_none());
    }

    #[test]
    fn author_must_be_allowed_type() {
        let err = CompositionBuilder::new(FhirVersion::R4)
            .with_author("Encounter/e1")
            .expect_err("Encounter is not an author type");
        assert!(matches!(err, RulerError::InvalidAuthor(_)));

        let b = CompositionBuilder::new(FhirVersion::R4)
            .with_author("PractitionerRole/r1")
            .expect("PractitionerRole is allowed");
        assert_eq!(b.author(), Some("PractitionerRole/r1"));
    }

    #[test]
    fn status_is_checked_against_release() {
        let r5 = complete(FhirVersion::R5)
            .with_status("registered")
            .build()
            .expect("registered is an R5 status");
        assert_eq!(r5.status_code(), "registered");

        let err = complete(FhirVersion::R4)
            .with_status("registered")
            .build()
            .expect_err("registered is not an R4 status");
        assert!(matches!(
            err,
            RulerError::Fhir(fhir::FhirError::InvalidCode {
                version: FhirVersion::R4,
                ..
            })
        ));
    }

    #[test]
    fn appended_builds_only_for_dstu2() {
        let dstu2 = complete(FhirVersion::Dstu2)
            .with_status("appended")
            .build()
            .expect("appended is a DSTU2 status");
        assert_eq!(dstu2.status_code(), "appended");

        for version in [FhirVersion::Dstu3, FhirVersion::R4] {
            let err = complete(version)
                .with_status("appended")
                .build()
                .expect_err("appended is not a status after DSTU2");
            assert!(matches!(
                err,
                RulerError::Fhir(fhir::FhirError::InvalidCode { .. })
            ));
        }
    }

    #[test]
    fn with_required_sets_all_mandatory_fields() {
        let composition = CompositionBuilder::with_required(
            FhirVersion::Dstu3,
            "comp-2",
            note_type(),
            "preliminary",
            "Organization/o1",
            "Draft note",
        )
        .expect("valid author")
        .build()
        .expect("build");

        assert_eq!(composition.id(), Some("comp-2"));
        assert_eq!(composition.status_code(), "preliminary");
        let stu = composition.as_stu().expect("dstu3 shape");
        assert!(stu.subject.is_none());
        assert_eq!(stu.author.len(), 1);
    }

    #[test]
    fn generated_id_when_unset() {
        let composition = CompositionBuilder::new(FhirVersion::R4)
            .with_status("amended")
            .with_title("t")
            .with_type(note_type())
            .with_author("RelatedPerson/rp1")
            .expect("valid author")
            .build()
            .expect("build");
        let id = composition.id().expect("id present");
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
}
