use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{
    Address, AdministrativeGender, Attachment, CodeableConcept, ContactPoint, HumanName,
    Identifier, Period, Reference,
};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

/// A person with a formal responsibility in the provisioning of care
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Practitioner {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// An identifier for the person as this agent
    pub identifier: Vec<Identifier>,

    /// Whether this record is in active use
    pub active: Option<Primitive<bool>>,

    /// The name(s) associated with the practitioner
    pub name: Vec<HumanName>,

    /// A contact detail for the practitioner (that apply to all roles)
    pub telecom: Vec<ContactPoint>,

    /// Address(es) of the practitioner that are not role specific (typically home address)
    pub address: Vec<Address>,

    /// male | female | other | unknown
    pub gender: Option<Primitive<AdministrativeGender>>,

    /// The date on which the practitioner was born
    pub birth_date: Option<Primitive<String>>,

    /// Image of the person
    pub photo: Vec<Attachment>,

    /// Certification, licenses, or training pertaining to the provision of care
    pub qualification: Vec<PractitionerQualification>,

    /// A language the practitioner can use in patient communication
    pub communication: Vec<CodeableConcept>,
}

impl TypedResource for Practitioner {
    const RESOURCE_TYPE: &'static str = "Practitioner";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Practitioner {
            identifier: r.list("identifier")?,
            active: r.primitive("active")?,
            name: r.list("name")?,
            telecom: r.list("telecom")?,
            address: r.list("address")?,
            gender: r.primitive("gender")?,
            birth_date: r.primitive("birthDate")?,
            photo: r.list("photo")?,
            qualification: r.list("qualification")?,
            communication: r.list("communication")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.primitive("active", &self.active);
        w.list("name", &self.name);
        w.list("telecom", &self.telecom);
        w.list("address", &self.address);
        w.primitive("gender", &self.gender);
        w.primitive("birthDate", &self.birth_date);
        w.list("photo", &self.photo);
        w.list("qualification", &self.qualification);
        w.list("communication", &self.communication);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PractitionerQualification {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// An identifier for this qualification for the practitioner
    pub identifier: Vec<Identifier>,

    /// Coded representation of the qualification
    pub code: CodeableConcept,

    /// Period during which the qualification is valid
    pub period: Option<Period>,

    /// Organization that regulates and issues the qualification
    pub issuer: Option<Reference>,
}

impl FhirType for PractitionerQualification {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(PractitionerQualification {
            identifier: r.list("identifier")?,
            code: r.required("code")?,
            period: r.optional("period")?,
            issuer: r.optional("issuer")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.list("identifier", &self.identifier);
        w.value("code", &self.code);
        w.optional("period", &self.period);
        w.optional("issuer", &self.issuer);
        w.finish(&self.base.unmodeled)
    }
}
