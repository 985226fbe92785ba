use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{CodeableConcept, Coding, Duration, Identifier, Period, Reference};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

value_set! {
    pub enum EncounterStatus("http://hl7.org/fhir/ValueSet/encounter-status") {
        Planned = "planned",
        Arrived = "arrived",
        Triaged = "triaged",
        InProgress = "in-progress",
        Onleave = "onleave",
        Finished = "finished",
        Cancelled = "cancelled",
        EnteredInError = "entered-in-error",
        Unknown = "unknown",
    }
}

value_set! {
    pub enum EncounterLocationStatus("http://hl7.org/fhir/ValueSet/encounter-location-status") {
        Planned = "planned",
        Active = "active",
        Reserved = "reserved",
        Completed = "completed",
    }
}

/// An interaction between a patient and healthcare provider(s)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encounter {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// Identifier(s) by which this encounter is known
    pub identifier: Vec<Identifier>,

    /// planned | arrived | triaged | in-progress | onleave | finished | cancelled +
    pub status: Primitive<EncounterStatus>,

    /// List of past encounter statuses
    pub status_history: Vec<EncounterStatusHistory>,

    /// Classification of patient encounter
    pub class_: Coding,

    /// List of past encounter classes
    pub class_history: Vec<EncounterClassHistory>,

    /// Specific type of encounter
    pub type_: Vec<CodeableConcept>,

    /// Specific type of service
    pub service_type: Option<CodeableConcept>,

    /// Indicates the urgency of the encounter
    pub priority: Option<CodeableConcept>,

    /// The patient or group present at the encounter
    pub subject: Option<Reference>,

    /// Episode(s) of care that this encounter should be recorded against
    pub episode_of_care: Vec<Reference>,

    /// The ServiceRequest that initiated this encounter
    pub based_on: Vec<Reference>,

    /// List of participants involved in the encounter
    pub participant: Vec<EncounterParticipant>,

    /// The appointment that scheduled this encounter
    pub appointment: Vec<Reference>,

    /// The start and end time of the encounter
    pub period: Option<Period>,

    /// Quantity of time the encounter lasted (less time absent)
    pub length: Option<Duration>,

    /// Coded reason the encounter takes place
    pub reason_code: Vec<CodeableConcept>,

    /// Reason the encounter takes place (reference)
    pub reason_reference: Vec<Reference>,

    /// The list of diagnosis relevant to this encounter
    pub diagnosis: Vec<EncounterDiagnosis>,

    /// The set of accounts that may be used for billing for this Encounter
    pub account: Vec<Reference>,

    /// Details about the admission to a healthcare service
    pub hospitalization: Option<EncounterHospitalization>,

    /// List of locations where the patient has been
    pub location: Vec<EncounterLocation>,

    /// The organization (facility) responsible for this encounter
    pub service_provider: Option<Reference>,

    /// Another Encounter this encounter is part of
    pub part_of: Option<Reference>,
}

impl TypedResource for Encounter {
    const RESOURCE_TYPE: &'static str = "Encounter";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Encounter {
            identifier: r.list("identifier")?,
            status: r.required_primitive("status")?,
            status_history: r.list("statusHistory")?,
            class_: r.required("class")?,
            class_history: r.list("classHistory")?,
            type_: r.list("type")?,
            service_type: r.optional("serviceType")?,
            priority: r.optional("priority")?,
            subject: r.optional("subject")?,
            episode_of_care: r.list("episodeOfCare")?,
            based_on: r.list("basedOn")?,
            participant: r.list("participant")?,
            appointment: r.list("appointment")?,
            period: r.optional("period")?,
            length: r.optional("length")?,
            reason_code: r.list("reasonCode")?,
            reason_reference: r.list("reasonReference")?,
            diagnosis: r.list("diagnosis")?,
            account: r.list("account")?,
            hospitalization: r.optional("hospitalization")?,
            location: r.list("location")?,
            service_provider: r.optional("serviceProvider")?,
            part_of: r.optional("partOf")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.required_primitive("status", &self.status);
        w.list("statusHistory", &self.status_history);
        w.value("class", &self.class_);
        w.list("classHistory", &self.class_history);
        w.list("type", &self.type_);
        w.optional("serviceType", &self.service_type);
        w.optional("priority", &self.priority);
        w.optional("subject", &self.subject);
        w.list("episodeOfCare", &self.episode_of_care);
        w.list("basedOn", &self.based_on);
        w.list("participant", &self.participant);
        w.list("appointment", &self.appointment);
        w.optional("period", &self.period);
        w.optional("length", &self.length);
        w.list("reasonCode", &self.reason_code);
        w.list("reasonReference", &self.reason_reference);
        w.list("diagnosis", &self.diagnosis);
        w.list("account", &self.account);
        w.optional("hospitalization", &self.hospitalization);
        w.list("location", &self.location);
        w.optional("serviceProvider", &self.service_provider);
        w.optional("partOf", &self.part_of);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterStatusHistory {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// planned | arrived | triaged | in-progress | onleave | finished | cancelled +
    pub status: Primitive<EncounterStatus>,

    /// The time that the episode was in the specified status
    pub period: Period,
}

impl FhirType for EncounterStatusHistory {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(EncounterStatusHistory {
            status: r.required_primitive("status")?,
            period: r.required("period")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.required_primitive("status", &self.status);
        w.value("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterClassHistory {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// inpatient | outpatient | ambulatory | emergency +
    pub class_: Coding,

    /// The time that the episode was in the specified class
    pub period: Period,
}

impl FhirType for EncounterClassHistory {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(EncounterClassHistory {
            class_: r.required("class")?,
            period: r.required("period")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("class", &self.class_);
        w.value("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterParticipant {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Role of participant in encounter
    pub type_: Vec<CodeableConcept>,

    /// Period of time during the encounter that the participant participated
    pub period: Option<Period>,

    /// Persons involved in the encounter other than the patient
    pub individual: Option<Reference>,
}

impl FhirType for EncounterParticipant {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(EncounterParticipant {
            type_: r.list("type")?,
            period: r.optional("period")?,
            individual: r.optional("individual")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.list("type", &self.type_);
        w.optional("period", &self.period);
        w.optional("individual", &self.individual);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterDiagnosis {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// The diagnosis or procedure relevant to the encounter
    pub condition: Reference,

    /// Role that this diagnosis has within the encounter (e.g. admission, billing, discharge …)
    pub use_: Option<CodeableConcept>,

    /// Ranking of the diagnosis (for each role type)
    pub rank: Option<Primitive<u32>>,
}

impl FhirType for EncounterDiagnosis {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(EncounterDiagnosis {
            condition: r.required("condition")?,
            use_: r.optional("use")?,
            rank: r.primitive("rank")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("condition", &self.condition);
        w.optional("use", &self.use_);
        w.primitive("rank", &self.rank);
        w.finish(&self.base.unmodeled)
    }
}

/// Details about the admission to a healthcare service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterHospitalization {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Pre-admission identifier
    pub pre_admission_identifier: Option<Identifier>,

    /// The location/organization from which the patient came before admission
    pub origin: Option<Reference>,

    /// From where patient was admitted (physician referral, transfer)
    pub admit_source: Option<CodeableConcept>,

    /// The type of hospital re-admission that has occurred (if any). If the value is absent, then this is not identified as a readmission
    pub re_admission: Option<CodeableConcept>,

    /// Diet preferences reported by the patient
    pub diet_preference: Vec<CodeableConcept>,

    /// Special courtesies (VIP, board member)
    pub special_courtesy: Vec<CodeableConcept>,

    /// Wheelchair, translator, stretcher, etc.
    pub special_arrangement: Vec<CodeableConcept>,

    /// Location/organization to which the patient is discharged
    pub destination: Option<Reference>,

    /// Category or kind of location after discharge
    pub discharge_disposition: Option<CodeableConcept>,
}

impl FhirType for EncounterHospitalization {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(EncounterHospitalization {
            pre_admission_identifier: r.optional("preAdmissionIdentifier")?,
            origin: r.optional("origin")?,
            admit_source: r.optional("admitSource")?,
            re_admission: r.optional("reAdmission")?,
            diet_preference: r.list("dietPreference")?,
            special_courtesy: r.list("specialCourtesy")?,
            special_arrangement: r.list("specialArrangement")?,
            destination: r.optional("destination")?,
            discharge_disposition: r.optional("dischargeDisposition")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("preAdmissionIdentifier", &self.pre_admission_identifier);
        w.optional("origin", &self.origin);
        w.optional("admitSource", &self.admit_source);
        w.optional("reAdmission", &self.re_admission);
        w.list("dietPreference", &self.diet_preference);
        w.list("specialCourtesy", &self.special_courtesy);
        w.list("specialArrangement", &self.special_arrangement);
        w.optional("destination", &self.destination);
        w.optional("dischargeDisposition", &self.discharge_disposition);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterLocation {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// Location the encounter takes place
    pub location: Reference,

    /// planned | active | reserved | completed
    pub status: Option<Primitive<EncounterLocationStatus>>,

    /// The physical type of the location (usually the level in the location hierachy - bed room ward etc.)
    pub physical_type: Option<CodeableConcept>,

    /// Time period during which the patient was present at the location
    pub period: Option<Period>,
}

impl FhirType for EncounterLocation {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(EncounterLocation {
            location: r.required("location")?,
            status: r.primitive("status")?,
            physical_type: r.optional("physicalType")?,
            period: r.optional("period")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("location", &self.location);
        w.primitive("status", &self.status);
        w.optional("physicalType", &self.physical_type);
        w.optional("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}
