use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{Age, Annotation, CodeableConcept, Identifier, Period, Range, Reference};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

choice_type! {
    /// `Condition.onset[x]`
    pub enum ConditionOnset {
        DateTime(Primitive<String>),
        Age(Age),
        Period(Period),
        Range(Range),
        String(Primitive<String>),
    }
}

choice_type! {
    /// `Condition.abatement[x]`
    pub enum ConditionAbatement {
        DateTime(Primitive<String>),
        Age(Age),
        Period(Period),
        Range(Range),
        String(Primitive<String>),
    }
}

/// A clinical condition, problem, diagnosis, or other event of clinical
/// concern
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// External Ids for this condition
    pub identifier: Vec<Identifier>,

    /// active | recurrence | relapse | inactive | remission | resolved
    pub clinical_status: Option<CodeableConcept>,

    /// unconfirmed | provisional | differential | confirmed | refuted | entered-in-error
    pub verification_status: Option<CodeableConcept>,

    /// problem-list-item | encounter-diagnosis
    pub category: Vec<CodeableConcept>,

    /// Subjective severity of condition
    pub severity: Option<CodeableConcept>,

    /// Identification of the condition, problem or diagnosis
    pub code: Option<CodeableConcept>,

    /// Anatomical location, if relevant
    pub body_site: Vec<CodeableConcept>,

    /// Who has the condition?
    pub subject: Reference,

    /// Encounter created as part of
    pub encounter: Option<Reference>,

    /// Estimated or actual date, date-time, or age
    pub onset: Option<ConditionOnset>,

    /// When in resolution/remission
    pub abatement: Option<ConditionAbatement>,

    /// Date record was first recorded
    pub recorded_date: Option<Primitive<String>>,

    /// Who recorded the condition
    pub recorder: Option<Reference>,

    /// Person who asserts this condition
    pub asserter: Option<Reference>,

    /// Stage/grade, usually assessed formally
    pub stage: Vec<ConditionStage>,

    /// Supporting evidence
    pub evidence: Vec<ConditionEvidence>,

    /// Additional information about the Condition
    pub note: Vec<Annotation>,
}

impl TypedResource for Condition {
    const RESOURCE_TYPE: &'static str = "Condition";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Condition {
            identifier: r.list("identifier")?,
            clinical_status: r.optional("clinicalStatus")?,
            verification_status: r.optional("verificationStatus")?,
            category: r.list("category")?,
            severity: r.optional("severity")?,
            code: r.optional("code")?,
            body_site: r.list("bodySite")?,
            subject: r.required("subject")?,
            encounter: r.optional("encounter")?,
            onset: r.choice("onset")?,
            abatement: r.choice("abatement")?,
            recorded_date: r.primitive("recordedDate")?,
            recorder: r.optional("recorder")?,
            asserter: r.optional("asserter")?,
            stage: r.list("stage")?,
            evidence: r.list("evidence")?,
            note: r.list("note")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.optional("clinicalStatus", &self.clinical_status);
        w.optional("verificationStatus", &self.verification_status);
        w.list("category", &self.category);
        w.optional("severity", &self.severity);
        w.optional("code", &self.code);
        w.list("bodySite", &self.body_site);
        w.value("subject", &self.subject);
        w.optional("encounter", &self.encounter);
        w.choice("onset", &self.onset);
        w.choice("abatement", &self.abatement);
        w.primitive("recordedDate", &self.recorded_date);
        w.optional("recorder", &self.recorder);
        w.optional("asserter", &self.asserter);
        w.list("stage", &self.stage);
        w.list("evidence", &self.evidence);
        w.list("note", &self.note);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionStage {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Simple summary (disease specific)
    pub summary: Option<CodeableConcept>,

    /// Formal record of assessment
    pub assessment: Vec<Reference>,

    /// Kind of staging
    pub type_: Option<CodeableConcept>,
}

impl FhirType for ConditionStage {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ConditionStage {
            summary: r.optional("summary")?,
            assessment: r.list("assessment")?,
            type_: r.optional("type")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("summary", &self.summary);
        w.list("assessment", &self.assessment);
        w.optional("type", &self.type_);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionEvidence {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Manifestation/symptom
    pub code: Vec<CodeableConcept>,

    /// Supporting information found elsewhere
    pub detail: Vec<Reference>,
}

impl FhirType for ConditionEvidence {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ConditionEvidence {
            code: r.list("code")?,
            detail: r.list("detail")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.list("code", &self.code);
        w.list("detail", &self.detail);
        w.finish(&self.base.unmodeled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FhirJsonCodec;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_onset_variants() {
        let codec = FhirJsonCodec::r4();
        let raw = json!({
            "resourceType": "Condition",
            "subject": {"reference": "Patient/example"},
            "onsetAge": {"value": 52, "unit": "years", "system": "http://unitsofmeasure.org", "code": "a"},
            "abatementString": "around April 9, 2013"
        });
        let condition = codec.decode_value_as::<Condition>(raw.clone()).unwrap().value;
        assert!(matches!(condition.onset, Some(ConditionOnset::Age(_))));
        assert!(matches!(
            condition.abatement,
            Some(ConditionAbatement::String(_))
        ));
        assert_eq!(codec.encode_value(&condition), raw);
    }

    #[test]
    fn test_onset_conflict_names_both_keys() {
        let err = FhirJsonCodec::r4()
            .decode_value(json!({
                "resourceType": "Condition",
                "subject": {"reference": "Patient/example"},
                "onsetDateTime": "2020-02-01",
                "onsetAge": {"value": 40}
            }))
            .unwrap_err();
        assert_eq!(
            err,
            crate::DecodeError::ChoiceConflict {
                path: "Condition.onset[x]".to_string(),
                keys: vec!["onsetDateTime".to_string(), "onsetAge".to_string()],
            }
        );
    }

    #[test]
    fn test_subject_required() {
        let err = FhirJsonCodec::r4()
            .decode_str(r#"{"resourceType":"Condition","code":{"text":"Asthma"}}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("Condition.subject"));
    }
}
