use crate::codec::{DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value};
use crate::datatypes::{Address, CodeableConcept, ContactPoint, HumanName, Identifier, Reference};
use crate::element::BackboneElement;
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

/// A formally or informally recognized grouping of people or organizations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organization {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// Identifies this organization across multiple systems
    pub identifier: Vec<Identifier>,

    /// Whether the organization's record is still in active use
    pub active: Option<Primitive<bool>>,

    /// Kind of organization
    pub type_: Vec<CodeableConcept>,

    /// Name used for the organization
    pub name: Option<Primitive<String>>,

    /// A list of alternate names that the organization is known as, or was known as in the past
    pub alias: Vec<Primitive<String>>,

    /// A contact detail for the organization
    pub telecom: Vec<ContactPoint>,

    /// An address for the organization
    pub address: Vec<Address>,

    /// The organization of which this organization forms a part
    pub part_of: Option<Reference>,

    /// Contact for the organization for a certain purpose
    pub contact: Vec<OrganizationContact>,

    /// Technical endpoints providing access to services operated for the organization
    pub endpoint: Vec<Reference>,
}

impl Organization {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Primitive::as_str)
    }
}

impl TypedResource for Organization {
    const RESOURCE_TYPE: &'static str = "Organization";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Organization {
            identifier: r.list("identifier")?,
            active: r.primitive("active")?,
            type_: r.list("type")?,
            name: r.primitive("name")?,
            alias: r.primitive_list("alias")?,
            telecom: r.list("telecom")?,
            address: r.list("address")?,
            part_of: r.optional("partOf")?,
            contact: r.list("contact")?,
            endpoint: r.list("endpoint")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.primitive("active", &self.active);
        w.list("type", &self.type_);
        w.primitive("name", &self.name);
        w.primitive_list("alias", &self.alias);
        w.list("telecom", &self.telecom);
        w.list("address", &self.address);
        w.optional("partOf", &self.part_of);
        w.list("contact", &self.contact);
        w.list("endpoint", &self.endpoint);
    }

    domain_resource_accessors!();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationContact {
    /// Element id, extensions and modifier extensions
    pub base: BackboneElement,

    /// The type of contact
    pub purpose: Option<CodeableConcept>,

    /// A name associated with the contact
    pub name: Option<HumanName>,

    /// Contact details (telephone, email, etc.) for a contact
    pub telecom: Vec<ContactPoint>,

    /// Visiting or postal addresses for the contact
    pub address: Option<Address>,
}

impl FhirType for OrganizationContact {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(OrganizationContact {
            purpose: r.optional("purpose")?,
            name: r.optional("name")?,
            telecom: r.list("telecom")?,
            address: r.optional("address")?,
            base: r.finish_backbone()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(&self.base);
        w.optional("purpose", &self.purpose);
        w.optional("name", &self.name);
        w.list("telecom", &self.telecom);
        w.optional("address", &self.address);
        w.finish(&self.base.unmodeled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FhirJsonCodec;
    use serde_json::json;

    #[test]
    fn test_organization_round_trip() {
        let raw = json!({
            "resourceType": "Organization",
            "id": "hl7",
            "name": "Health Level Seven International",
            "alias": ["HL7 International"],
            "telecom": [{"system": "phone", "value": "(+1) 734-677-7777"}],
            "address": [{"line": ["3300 Washtenaw Avenue, Suite 227"], "city": "Ann Arbor", "state": "MI"}],
            "contact": [{"purpose": {"text": "Press"}, "telecom": [{"system": "email", "value": "press@hl7.org"}]}]
        });
        let codec = FhirJsonCodec::r4();
        let org = codec.decode_value_as::<Organization>(raw.clone()).unwrap().value;
        assert_eq!(org.name(), Some("Health Level Seven International"));
        assert_eq!(org.contact.len(), 1);
        assert_eq!(codec.encode_value(&org), raw);
    }
}
