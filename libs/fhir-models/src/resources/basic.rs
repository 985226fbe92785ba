use crate::codec::{ObjectReader, ObjectWriter, Primitive};
use crate::datatypes::{CodeableConcept, Identifier, Reference};
use crate::error::Result;
use crate::resource::{DomainResource, TypedResource};

/// A resource for concepts that have no dedicated resource type; the
/// meaning is carried by `code` and extensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basic {
    /// Resource id, meta, narrative, contained resources and extensions
    pub base: DomainResource,

    /// Business identifiers
    pub identifier: Vec<Identifier>,

    /// Kind of resource
    pub code: CodeableConcept,

    /// Identifies the focus of this resource
    pub subject: Option<Reference>,

    /// When created
    pub created: Option<Primitive<String>>,

    /// Who created
    pub author: Option<Reference>,
}

impl TypedResource for Basic {
    const RESOURCE_TYPE: &'static str = "Basic";

    fn decode_fields(mut r: ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Basic {
            identifier: r.list("identifier")?,
            code: r.required("code")?,
            subject: r.optional("subject")?,
            created: r.primitive("created")?,
            author: r.optional("author")?,
            base: r.finish_domain_resource()?,
        })
    }

    fn encode_fields(&self, w: &mut ObjectWriter) {
        w.domain_resource(&self.base);
        w.list("identifier", &self.identifier);
        w.value("code", &self.code);
        w.optional("subject", &self.subject);
        w.primitive("created", &self.created);
        w.optional("author", &self.author);
    }

    domain_resource_accessors!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FhirJsonCodec;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_basic_keeps_extensions_and_unknown_fields() {
        let raw = json!({
            "resourceType": "Basic",
            "id": "referral",
            "extension": [{
                "url": "http://example.org/do-not-use/fhir-extensions/referral#requestingPractitioner",
                "valueReference": {"reference": "Practitioner/f201", "display": "Dokter Bronsig"}
            }],
            "modifierExtension": [{
                "url": "http://example.org/do-not-use/fhir-extensions/referral#referredForService",
                "valueCodeableConcept": {"coding": [{"system": "http://snomed.info/sct", "code": "11429006"}]}
            }],
            "code": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/basic-resource-type", "code": "referral"}]},
            "subject": {"reference": "Patient/f201"},
            "created": "2013-05-14",
            "vendorField": {"anything": [1, 2, 3]}
        });
        let codec = FhirJsonCodec::r4();
        let basic = codec.decode_value_as::<Basic>(raw.clone()).unwrap().value;
        assert!(basic.base.has_modifier_extensions());
        assert!(basic.base.unmodeled.contains_key("vendorField"));
        assert_eq!(codec.encode_value(&basic), raw);
    }

    #[test]
    fn test_basic_requires_code() {
        let err = FhirJsonCodec::r4()
            .decode_str(r#"{"resourceType":"Basic"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("Basic.code"));
    }
}
