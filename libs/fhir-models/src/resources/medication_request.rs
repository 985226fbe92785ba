use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{
    Annotation, CodeableConcept, Dosage, Duration, Identifier, Period, Reference, SimpleQuantity,
};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

value_set! {
    pub enum MedicationRequestStatus("http://hl7.org/fhir/ValueSet/medicationrequest-status") {
        Active = "active",
        OnHold = "on-hold",
        Cancelled = "cancelled",
        Completed = "completed",
        EnteredInError = "entered-in-error",
        Stopped = "stopped",
        Draft = "draft",
        Unknown = "unknown",
    }
}

value_set! {
    pub enum MedicationRequestIntent("http://hl7.org/fhir/ValueSet/medicationrequest-intent") {
        Proposal = "proposal",
        Plan = "plan",
        Order = "order",
        OriginalOrder = "original-order",
        ReflexOrder = "reflex-order",
        FillerOrder = "filler-order",
        InstanceOrder = "instance-order",
        Option = "option",
    }
}

value_set! {
    pub enum MedicationRequestPriority("http://hl7.org/fhir/ValueSet/request-priority") {
        Routine = "routine",
        Urgent = "urgent",
        Asap = "asap",
        Stat = "stat",
    }
}

choice_type! {
    /// `MedicationRequest.reported[x]`
    pub enum MedicationRequestReported {
        Boolean(Primitive<bool>),
        Reference(Reference),
    }
}

choice_type! {
    /// `MedicationRequest.medication[x]`
    pub enum MedicationRequestMedication {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

choice_type! {
    /// `MedicationRequest.substitution.allowed[x]`
    pub enum MedicationRequestSubstitutionAllowed {
        Boolean(Primitive<bool>),
        CodeableConcept(CodeableConcept),
    }
}

/// An order or request for both supply of the medication and the
/// instructions for administration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationRequest {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// External ids for this request
    pub identifier: Vec<Identifier>,

    /// active | on-hold | cancelled | completed | entered-in-error | stopped | draft | unknown
    pub status: Primitive<MedicationRequestStatus>,

    /// Reason for current status
    pub status_reason: Option<CodeableConcept>,

    /// proposal | plan | order | original-order | reflex-order | filler-order | instance-order | option
    pub intent: Primitive<MedicationRequestIntent>,

    /// Type of medication usage
    pub category: Vec<CodeableConcept>,

    /// routine | urgent | asap | stat
    pub priority: Option<Primitive<MedicationRequestPriority>>,

    /// True if request is prohibiting action
    pub do_not_perform: Option<Primitive<bool>>,

    /// Reported rather than primary record
    pub reported: Option<MedicationRequestReported>,

    /// Medication to be taken
    pub medication: Option<MedicationRequestMedication>,

    /// Who or group medication request is for
    pub subject: Reference,

    /// Encounter created as part of encounter/admission/stay
    pub encounter: Option<Reference>,

    /// Information to support ordering of the medication
    pub supporting_information: Vec<Reference>,

    /// When request was initially authored
    pub authored_on: Option<Primitive<String>>,

    /// Who/What requested the Request
    pub requester: Option<Reference>,

    /// Intended performer of administration
    pub performer: Option<Reference>,

    /// Desired kind of performer of the medication administration
    pub performer_type: Option<CodeableConcept>,

    /// Person who entered the request
    pub recorder: Option<Reference>,

    /// Reason or indication for ordering or not ordering the medication
    pub reason_code: Vec<CodeableConcept>,

    /// Condition or observation that supports why the prescription is being written
    pub reason_reference: Vec<Reference>,

    /// Instantiates FHIR protocol or definition
    pub instantiates_canonical: Vec<Primitive<String>>,

    /// Instantiates external protocol or definition
    pub instantiates_uri: Vec<Primitive<String>>,

    /// What request fulfills
    pub based_on: Vec<Reference>,

    /// Composite request this is part of
    pub group_identifier: Option<Identifier>,

    /// Overall pattern of medication administration
    pub course_of_therapy_type: Option<CodeableConcept>,

    /// Associated insurance coverage
    pub insurance: Vec<Reference>,

    /// Information about the prescription
    pub note: Vec<Annotation>,

    /// How the medication should be taken
    pub dosage_instruction: Vec<Dosage>,

    /// Medication supply authorization
    pub dispense_request: Option<MedicationRequestDispense>,

    /// Any restrictions on medication substitution
    pub substitution: Option<MedicationRequestSubstitution>,

    /// An order/prescription that is being replaced
    pub prior_prescription: Option<Reference>,

    /// Clinical Issue with action
    pub detected_issue: Vec<Reference>,

    /// A list of events of interest in the lifecycle
    pub event_history: Vec<Reference>,
}

impl TypedResource for MedicationRequest {
    const RESOURCE_TYPE: &'static str = "MedicationRequest";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(MedicationRequest {
            identifier: r.list("identifier")?,
            status: r.required_primitive("status")?,
            status_reason: r.optional("statusReason")?,
            intent: r.required_primitive("intent")?,
            category: r.list("category")?,
            priority: r.primitive("priority")?,
            do_not_perform: r.primitive("doNotPerform")?,
            reported: r.choice("reported")?,
            medication: Some(r.required_choice("medication")?),
            subject: r.required("subject")?,
            encounter: r.optional("encounter")?,
            supporting_information: r.list("supportingInformation")?,
            authored_on: r.primitive("authoredOn")?,
            requester: r.optional("requester")?,
            performer: r.optional("performer")?,
            performer_type: r.optional("performerType")?,
            recorder: r.optional("recorder")?,
            reason_code: r.list("reasonCode")?,
            reason_reference: r.list("reasonReference")?,
            instantiates_canonical: r.primitive_list("instantiatesCanonical")?,
            instantiates_uri: r.primitive_list("instantiatesUri")?,
            based_on: r.list("basedOn")?,
            group_identifier: r.optional("groupIdentifier")?,
            course_of_therapy_type: r.optional("courseOfTherapyType")?,
            insurance: r.list("insurance")?,
            note: r.list("note")?,
            dosage_instruction: r.list("dosageInstruction")?,
            dispense_request: r.optional("dispenseRequest")?,
            substitution: r.optional("substitution")?,
            prior_prescription: r.optional("priorPrescription")?,
            detected_issue: r.list("detectedIssue")?,
            event_history: r.list("eventHistory")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.required_primitive("status", &self.status);
        w.optional("statusReason", &self.status_reason);
        w.required_primitive("intent", &self.intent);
        w.list("category", &self.category);
        w.primitive("priority", &self.priority);
        w.primitive("doNotPerform", &self.do_not_perform);
        w.choice("reported", &self.reported);
        w.choice("medication", &self.medication);
        w.value("subject", &self.subject);
        w.optional("encounter", &self.encounter);
        w.list("supportingInformation", &self.supporting_information);
        w.primitive("authoredOn", &self.authored_on);
        w.optional("requester", &self.requester);
        w.optional("performer", &self.performer);
        w.optional("performerType", &self.performer_type);
        w.optional("recorder", &self.recorder);
        w.list("reasonCode", &self.reason_code);
        w.list("reasonReference", &self.reason_reference);
        w.primitive_list("instantiatesCanonical", &self.instantiates_canonical);
        w.primitive_list("instantiatesUri", &self.instantiates_uri);
        w.list("basedOn", &self.based_on);
        w.optional("groupIdentifier", &self.group_identifier);
        w.optional("courseOfTherapyType", &self.course_of_therapy_type);
        w.list("insurance", &self.insurance);
        w.list("note", &self.note);
        w.list("dosageInstruction", &self.dosage_instruction);
        w.optional("dispenseRequest", &self.dispense_request);
        w.optional("substitution", &self.substitution);
        w.optional("priorPrescription", &self.prior_prescription);
        w.list("detectedIssue", &self.detected_issue);
        w.list("eventHistory", &self.event_history);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationRequestDispense {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// First fill details
    pub initial_fill: Option<MedicationRequestInitialFill>,

    /// Minimum period of time between dispenses
    pub dispense_interval: Option<Duration>,

    /// Time period supply is authorized for
    pub validity_period: Option<Period>,

    /// Number of refills authorized
    pub number_of_repeats_allowed: Option<Primitive<u32>>,

    /// Amount of medication to supply per dispense
    pub quantity: Option<SimpleQuantity>,

    /// Number of days supply per dispense
    pub expected_supply_duration: Option<Duration>,

    /// Intended dispenser
    pub performer: Option<Reference>,
}

impl FhirType for MedicationRequestDispense {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(MedicationRequestDispense {
            initial_fill: r.optional("initialFill")?,
            dispense_interval: r.optional("dispenseInterval")?,
            validity_period: r.optional("validityPeriod")?,
            number_of_repeats_allowed: r.primitive("numberOfRepeatsAllowed")?,
            quantity: r.optional("quantity")?,
            expected_supply_duration: r.optional("expectedSupplyDuration")?,
            performer: r.optional("performer")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("initialFill", &self.initial_fill);
        w.optional("dispenseInterval", &self.dispense_interval);
        w.optional("validityPeriod", &self.validity_period);
        w.primitive("numberOfRepeatsAllowed", &self.number_of_repeats_allowed);
        w.optional("quantity", &self.quantity);
        w.optional("expectedSupplyDuration", &self.expected_supply_duration);
        w.optional("performer", &self.performer);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationRequestInitialFill {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// First fill quantity
    pub quantity: Option<SimpleQuantity>,

    /// First fill duration
    pub duration: Option<Duration>,
}

impl FhirType for MedicationRequestInitialFill {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(MedicationRequestInitialFill {
            quantity: r.optional("quantity")?,
            duration: r.optional("duration")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("quantity", &self.quantity);
        w.optional("duration", &self.duration);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationRequestSubstitution {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Whether substitution is allowed or not
    pub allowed: Option<MedicationRequestSubstitutionAllowed>,

    /// Why should (not) substitution be made
    pub reason: Option<CodeableConcept>,
}

impl FhirType for MedicationRequestSubstitution {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(MedicationRequestSubstitution {
            allowed: Some(r.required_choice("allowed")?),
            reason: r.optional("reason")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.choice("allowed", &self.allowed);
        w.optional("reason", &self.reason);
        w.finish(&self.base.unmodeled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FhirJsonCodec;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "resourceType": "MedicationRequest",
            "id": "medrx0311",
            "status": "active",
            "intent": "order",
            "medicationCodeableConcept": {
                "coding": [{"system": "http://www.nlm.nih.gov/research/umls/rxnorm", "code": "1049621"}],
                "text": "Oxycodone 5mg tablet"
            },
            "subject": {"reference": "Patient/pat1"},
            "authoredOn": "2015-01-15",
            "dosageInstruction": [{
                "sequence": 1,
                "timing": {"repeat": {"frequency": 1, "period": 4, "periodUnit": "h"}},
                "asNeededCodeableConcept": {"text": "pain"},
                "doseAndRate": [{"doseQuantity": {"value": 1, "unit": "TAB"}}]
            }],
            "dispenseRequest": {
                "validityPeriod": {"start": "2015-01-15", "end": "2016-01-15"},
                "numberOfRepeatsAllowed": 0,
                "quantity": {"value": 30, "unit": "TAB"}
            },
            "substitution": {"allowedBoolean": true}
        })
    }

    #[test]
    fn test_medication_request_round_trip() {
        let codec = FhirJsonCodec::r4();
        let request = codec.decode_value_as::<MedicationRequest>(sample()).unwrap().value;
        assert_eq!(request.intent.value, Some(MedicationRequestIntent::Order));
        assert!(matches!(
            request.medication,
            Some(MedicationRequestMedication::CodeableConcept(_))
        ));
        assert_eq!(request.dosage_instruction.len(), 1);
        assert_eq!(codec.encode_value(&request), sample());
    }

    #[test]
    fn test_medication_required() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("medicationCodeableConcept");
        let err = FhirJsonCodec::r4().decode_value(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("MedicationRequest.medication[x]"));
    }

    #[test]
    fn test_substitution_allowed_conflict() {
        let mut raw = sample();
        raw["substitution"] = json!({"allowedBoolean": true, "allowedCodeableConcept": {"text": "yes"}});
        let err = FhirJsonCodec::r4().decode_value(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
        assert_eq!(
            err.path(),
            Some("MedicationRequest.substitution.allowed[x]")
        );
    }
}
