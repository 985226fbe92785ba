use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{
    Annotation, CodeableConcept, Identifier, Period, Quantity, Range, Ratio, Reference,
    SampledData, SimpleQuantity, Timing,
};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

value_set! {
    /// Status of an observation result
    pub enum ObservationStatus("http://hl7.org/fhir/ValueSet/observation-status") {
        Registered = "registered",
        Preliminary = "preliminary",
        Final = "final",
        Amended = "amended",
        Corrected = "corrected",
        Cancelled = "cancelled",
        EnteredInError = "entered-in-error",
        Unknown = "unknown",
    }
}

choice_type! {
    /// `Observation.effective[x]`
    pub enum ObservationEffective {
        DateTime(Primitive<String>),
        Period(Period),
        Timing(Timing),
        Instant(Primitive<String>),
    }
}

choice_type! {
    /// `Observation.value[x]` and `Observation.component.value[x]`
    pub enum ObservationValue {
        Quantity(Quantity),
        CodeableConcept(CodeableConcept),
        String(Primitive<String>),
        Boolean(Primitive<bool>),
        Integer(Primitive<i32>),
        Range(Range),
        Ratio(Ratio),
        SampledData(SampledData),
        Time(Primitive<String>),
        DateTime(Primitive<String>),
        Period(Period),
    }
}

/// Measurements and simple assertions made about a patient, device or
/// other subject
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// Business Identifier for observation
    pub identifier: Vec<Identifier>,

    /// Fulfills plan, proposal or order
    pub based_on: Vec<Reference>,

    /// Part of referenced event
    pub part_of: Vec<Reference>,

    /// registered | preliminary | final | amended +
    pub status: Primitive<ObservationStatus>,

    /// Classification of  type of observation
    pub category: Vec<CodeableConcept>,

    /// Type of observation (code / type)
    pub code: CodeableConcept,

    /// Who and/or what the observation is about
    pub subject: Option<Reference>,

    /// What the observation is about, when it is not about the subject of record
    pub focus: Vec<Reference>,

    /// Healthcare event during which this observation is made
    pub encounter: Option<Reference>,

    /// Clinically relevant time/time-period for observation
    pub effective: Option<ObservationEffective>,

    /// Date/Time this version was made available
    pub issued: Option<Primitive<String>>,

    /// Who is responsible for the observation
    pub performer: Vec<Reference>,

    /// Actual result
    pub value: Option<ObservationValue>,

    /// Why the result is missing
    pub data_absent_reason: Option<CodeableConcept>,

    /// High, low, normal, etc.
    pub interpretation: Vec<CodeableConcept>,

    /// Comments about the observation
    pub note: Vec<Annotation>,

    /// Observed body part
    pub body_site: Option<CodeableConcept>,

    /// How it was done
    pub method: Option<CodeableConcept>,

    /// Specimen used for this observation
    pub specimen: Option<Reference>,

    /// (Measurement) Device
    pub device: Option<Reference>,

    /// Provides guide for interpretation
    pub reference_range: Vec<ObservationReferenceRange>,

    /// Related resource that belongs to the Observation group
    pub has_member: Vec<Reference>,

    /// Related measurements the observation is made from
    pub derived_from: Vec<Reference>,

    /// Component results
    pub component: Vec<ObservationComponent>,
}

impl Observation {
    pub fn new(status: ObservationStatus, code: CodeableConcept) -> Self {
        Self {
            status: Primitive::new(status),
            code,
            ..Default::default()
        }
    }

    pub fn status(&self) -> Option<&ObservationStatus> {
        self.status.value()
    }
}

impl TypedResource for Observation {
    const RESOURCE_TYPE: &'static str = "Observation";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Observation {
            identifier: r.list("identifier")?,
            based_on: r.list("basedOn")?,
            part_of: r.list("partOf")?,
            status: r.required_primitive("status")?,
            category: r.list("category")?,
            code: r.required("code")?,
            subject: r.optional("subject")?,
            focus: r.list("focus")?,
            encounter: r.optional("encounter")?,
            effective: r.choice("effective")?,
            issued: r.primitive("issued")?,
            performer: r.list("performer")?,
            value: r.choice("value")?,
            data_absent_reason: r.optional("dataAbsentReason")?,
            interpretation: r.list("interpretation")?,
            note: r.list("note")?,
            body_site: r.optional("bodySite")?,
            method: r.optional("method")?,
            specimen: r.optional("specimen")?,
            device: r.optional("device")?,
            reference_range: r.list("referenceRange")?,
            has_member: r.list("hasMember")?,
            derived_from: r.list("derivedFrom")?,
            component: r.list("component")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.list("basedOn", &self.based_on);
        w.list("partOf", &self.part_of);
        w.required_primitive("status", &self.status);
        w.list("category", &self.category);
        w.value("code", &self.code);
        w.optional("subject", &self.subject);
        w.list("focus", &self.focus);
        w.optional("encounter", &self.encounter);
        w.choice("effective", &self.effective);
        w.primitive("issued", &self.issued);
        w.list("performer", &self.performer);
        w.choice("value", &self.value);
        w.optional("dataAbsentReason", &self.data_absent_reason);
        w.list("interpretation", &self.interpretation);
        w.list("note", &self.note);
        w.optional("bodySite", &self.body_site);
        w.optional("method", &self.method);
        w.optional("specimen", &self.specimen);
        w.optional("device", &self.device);
        w.list("referenceRange", &self.reference_range);
        w.list("hasMember", &self.has_member);
        w.list("derivedFrom", &self.derived_from);
        w.list("component", &self.component);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationReferenceRange {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Low Range, if relevant
    pub low: Option<SimpleQuantity>,

    /// High Range, if relevant
    pub high: Option<SimpleQuantity>,

    /// Reference range qualifier
    pub type_: Option<CodeableConcept>,

    /// Reference range population
    pub applies_to: Vec<CodeableConcept>,

    /// Applicable age range, if relevant
    pub age: Option<Range>,

    /// Text based reference range in an observation
    pub text: Option<Primitive<String>>,
}

impl FhirType for ObservationReferenceRange {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ObservationReferenceRange {
            low: r.optional("low")?,
            high: r.optional("high")?,
            type_: r.optional("type")?,
            applies_to: r.list("appliesTo")?,
            age: r.optional("age")?,
            text: r.primitive("text")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("low", &self.low);
        w.optional("high", &self.high);
        w.optional("type", &self.type_);
        w.list("appliesTo", &self.applies_to);
        w.optional("age", &self.age);
        w.primitive("text", &self.text);
        w.finish(&self.base.unmodeled)
    }
}

/// One of several results reported together, e.g. systolic and diastolic
/// blood pressure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationComponent {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Type of component observation (code / type)
    pub code: CodeableConcept,

    /// Actual component result
    pub value: Option<ObservationValue>,

    /// Why the result is missing
    pub data_absent_reason: Option<CodeableConcept>,

    /// High, low, normal, etc.
    pub interpretation: Vec<CodeableConcept>,

    /// Provides guide for interpretation
    pub reference_range: Vec<ObservationReferenceRange>,
}

impl FhirType for ObservationComponent {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ObservationComponent {
            code: r.required("code")?,
            value: r.choice("value")?,
            data_absent_reason: r.optional("dataAbsentReason")?,
            interpretation: r.list("interpretation")?,
            reference_range: r.list("referenceRange")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("code", &self.code);
        w.choice("value", &self.value);
        w.optional("dataAbsentReason", &self.data_absent_reason);
        w.list("interpretation", &self.interpretation);
        w.list("referenceRange", &self.reference_range);
        w.finish(&self.base.unmodeled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FhirJsonCodec;
    use crate::datatypes::Coding;
    use crate::error::ErrorKind;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_minimal_observation() {
        let input = r#"{"resourceType":"Observation","status":"final","code":{"text":"x"}}"#;
        let codec = FhirJsonCodec::r4();
        let obs = codec.decode_str_as::<Observation>(input).unwrap().value;
        assert_eq!(obs.status(), Some(&ObservationStatus::Final));
        assert_eq!(obs.code.text(), Some("x"));
        assert_eq!(codec.encode_string(&obs), input);
    }

    #[test]
    fn test_value_quantity() {
        let raw = json!({
            "resourceType": "Observation",
            "status": "final",
            "category": [{"coding": [{"system": "http://terminology.hl7.org/CodeSystem/observation-category", "code": "vital-signs"}]}],
            "code": {"coding": [{"system": "http://loinc.org", "code": "8867-4", "display": "Heart rate"}]},
            "subject": {"reference": "Patient/example"},
            "effectiveDateTime": "1999-07-02",
            "valueQuantity": {"value": 44, "unit": "beats/minute", "system": "http://unitsofmeasure.org", "code": "/min"}
        });
        let codec = FhirJsonCodec::r4();
        let obs = codec.decode_value_as::<Observation>(raw.clone()).unwrap().value;
        match &obs.value {
            Some(ObservationValue::Quantity(q)) => assert_eq!(q.value(), Some(Decimal::from(44))),
            other => panic!("unexpected value {other:?}"),
        }
        assert!(obs.code.has_coding("http://loinc.org", "8867-4"));
        assert_eq!(codec.encode_value(&obs), raw);
    }

    #[test]
    fn test_components() {
        let mut obs = Observation::new(
            ObservationStatus::Final,
            CodeableConcept::from_coding(Coding::new("http://loinc.org", "85354-9")),
        );
        obs.component.push(ObservationComponent {
            code: CodeableConcept::from_coding(Coding::new("http://loinc.org", "8480-6")),
            value: Some(ObservationValue::Quantity(Quantity::ucum(
                Decimal::from_str("107").unwrap(),
                "mm[Hg]",
            ))),
            ..Default::default()
        });
        let codec = FhirJsonCodec::r4();
        let value = codec.encode_value(&obs);
        let back = codec.decode_value_as::<Observation>(value).unwrap().value;
        assert_eq!(back, obs);
    }

    #[test]
    fn test_value_conflict() {
        let err = FhirJsonCodec::r4()
            .decode_value(json!({
                "resourceType": "Observation",
                "status": "final",
                "code": {"text": "x"},
                "valueString": "high",
                "valueQuantity": {"value": 1}
            }))
            .unwrap_err();
        assert_eq!(
            err,
            crate::DecodeError::ChoiceConflict {
                path: "Observation.value[x]".to_string(),
                keys: vec!["valueQuantity".to_string(), "valueString".to_string()],
            }
        );
    }

    #[test]
    fn test_status_and_code_required() {
        let codec = FhirJsonCodec::r4();
        let err = codec
            .decode_str(r#"{"resourceType":"Observation","code":{"text":"x"}}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("Observation.status"));

        let err = codec
            .decode_str(r#"{"resourceType":"Observation","status":"final"}"#)
            .unwrap_err();
        assert_eq!(err.path(), Some("Observation.code"));
    }
}
