use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{
    Address, AdministrativeGender, Attachment, CodeableConcept, ContactPoint, HumanName,
    Identifier, Period, Reference,
};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

value_set! {
    /// The type of link between this patient resource and another
    pub enum LinkType("http://hl7.org/fhir/ValueSet/link-type") {
        ReplacedBy = "replaced-by",
        Replaces = "replaces",
        Refer = "refer",
        Seealso = "seealso",
    }
}

choice_type! {
    /// `Patient.deceased[x]`
    pub enum PatientDeceased {
        Boolean(Primitive<bool>),
        DateTime(Primitive<String>),
    }
}

choice_type! {
    /// `Patient.multipleBirth[x]`
    pub enum PatientMultipleBirth {
        Boolean(Primitive<bool>),
        Integer(Primitive<i32>),
    }
}

/// Demographics and administrative information about a person receiving
/// care
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patient {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// An identifier for this patient
    pub identifier: Vec<Identifier>,

    /// Whether this patient's record is in active use
    pub active: Option<Primitive<bool>>,

    /// A name associated with the patient
    pub name: Vec<HumanName>,

    /// A contact detail for the individual
    pub telecom: Vec<ContactPoint>,

    /// male | female | other | unknown
    pub gender: Option<Primitive<AdministrativeGender>>,

    /// The date of birth for the individual
    pub birth_date: Option<Primitive<String>>,

    /// Indicates if the individual is deceased or not
    pub deceased: Option<PatientDeceased>,

    /// An address for the individual
    pub address: Vec<Address>,

    /// Marital (civil) status of a patient
    pub marital_status: Option<CodeableConcept>,

    /// Whether patient is part of a multiple birth
    pub multiple_birth: Option<PatientMultipleBirth>,

    /// Image of the patient
    pub photo: Vec<Attachment>,

    /// A contact party (e.g. guardian, partner, friend) for the patient
    pub contact: Vec<PatientContact>,

    /// A language which may be used to communicate with the patient about his or her health
    pub communication: Vec<PatientCommunication>,

    /// Patient's nominated primary care provider
    pub general_practitioner: Vec<Reference>,

    /// Organization that is the custodian of the patient record
    pub managing_organization: Option<Reference>,

    /// Link to another patient resource that concerns the same actual person
    pub link: Vec<PatientLink>,
}

impl Patient {
    pub fn gender(&self) -> Option<&AdministrativeGender> {
        self.gender.as_ref().and_then(Primitive::value)
    }

    /// The first `official` name, falling back to the first name
    pub fn official_name(&self) -> Option<&HumanName> {
        self.name
            .iter()
            .find(|n| {
                n.use_.as_ref().and_then(Primitive::value)
                    == Some(&crate::datatypes::NameUse::Official)
            })
            .or_else(|| self.name.first())
    }
}

impl TypedResource for Patient {
    const RESOURCE_TYPE: &'static str = "Patient";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Patient {
            identifier: r.list("identifier")?,
            active: r.primitive("active")?,
            name: r.list("name")?,
            telecom: r.list("telecom")?,
            gender: r.primitive("gender")?,
            birth_date: r.primitive("birthDate")?,
            deceased: r.choice("deceased")?,
            address: r.list("address")?,
            marital_status: r.optional("maritalStatus")?,
            multiple_birth: r.choice("multipleBirth")?,
            photo: r.list("photo")?,
            contact: r.list("contact")?,
            communication: r.list("communication")?,
            general_practitioner: r.list("generalPractitioner")?,
            managing_organization: r.optional("managingOrganization")?,
            link: r.list("link")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.primitive("active", &self.active);
        w.list("name", &self.name);
        w.list("telecom", &self.telecom);
        w.primitive("gender", &self.gender);
        w.primitive("birthDate", &self.birth_date);
        w.choice("deceased", &self.deceased);
        w.list("address", &self.address);
        w.optional("maritalStatus", &self.marital_status);
        w.choice("multipleBirth", &self.multiple_birth);
        w.list("photo", &self.photo);
        w.list("contact", &self.contact);
        w.list("communication", &self.communication);
        w.list("generalPractitioner", &self.general_practitioner);
        w.optional("managingOrganization", &self.managing_organization);
        w.list("link", &self.link);
    }

    domain_resource_accessors!();
}

/// A contact party (guardian, partner, friend) for the patient
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientContact {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// The kind of relationship
    pub relationship: Vec<CodeableConcept>,

    /// A name associated with the contact person
    pub name: Option<HumanName>,

    /// A contact detail for the person
    pub telecom: Vec<ContactPoint>,

    /// Address for the contact person
    pub address: Option<Address>,

    /// male | female | other | unknown
    pub gender: Option<Primitive<AdministrativeGender>>,

    /// Organization that is associated with the contact
    pub organization: Option<Reference>,

    /// The period during which this contact person or organization is valid to be contacted relating to this patient
    pub period: Option<Period>,
}

impl FhirType for PatientContact {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(PatientContact {
            relationship: r.list("relationship")?,
            name: r.optional("name")?,
            telecom: r.list("telecom")?,
            address: r.optional("address")?,
            gender: r.primitive("gender")?,
            organization: r.optional("organization")?,
            period: r.optional("period")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.list("relationship", &self.relationship);
        w.optional("name", &self.name);
        w.list("telecom", &self.telecom);
        w.optional("address", &self.address);
        w.primitive("gender", &self.gender);
        w.optional("organization", &self.organization);
        w.optional("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientCommunication {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// The language which can be used to communicate with the patient about his or her health
    pub language: CodeableConcept,

    /// Language preference indicator
    pub preferred: Option<Primitive<bool>>,
}

impl FhirType for PatientCommunication {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(PatientCommunication {
            language: r.required("language")?,
            preferred: r.primitive("preferred")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("language", &self.language);
        w.primitive("preferred", &self.preferred);
        w.finish(&self.base.unmodeled)
    }
}

/// Link to another patient resource that concerns the same actual person
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientLink {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// The other patient or related person resource that the link refers to
    pub other: Reference,

    /// replaced-by | replaces | refer | seealso
    pub type_: Primitive<LinkType>,
}

impl FhirType for PatientLink {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(PatientLink {
            other: r.required("other")?,
            type_: r.required_primitive("type")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.value("other", &self.other);
        w.required_primitive("type", &self.type_);
        w.finish(&self.base.unmodeled)
    }
}
