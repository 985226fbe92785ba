//! Element, BackboneElement and Extension
//!
//! Every complex datatype embeds an [`Element`] (or, for backbone elements
//! declared inside a resource, a [`BackboneElement`]) as its `base` field.
//! The base owns the `id`, the `extension` list and the bag of keys the
//! type does not model.

use crate::codec::{
    DecodeContext, ExtensionBag, FhirType, ObjectReader, ObjectWriter, Primitive, RawComplex,
    Value,
};
use crate::datatypes::{
    Address, Age, Annotation, Attachment, CodeableConcept, Coding, ContactPoint, Count,
    Distance, Dosage, Duration, HumanName, Identifier, Meta, Money, Period, Quantity, Range,
    Ratio, Reference, SampledData, Signature, Timing,
};
use crate::error::Result;
use rust_decimal::Decimal;

/// Base of every complex datatype, and the payload of a `_field` primitive
/// sibling
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub unmodeled: ExtensionBag,
}

impl Element {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_empty() && self.unmodeled.is_empty()
    }

    /// Extensions with the given url
    pub fn extensions_by_url<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Extension> {
        self.extension.iter().filter(move |e| e.url == url)
    }
}

impl FhirType for Element {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        ObjectReader::new(value, ctx)?.finish_element()
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(self);
        w.finish(&self.unmodeled)
    }
}

/// Base of elements declared inline in a resource (`Patient.contact`,
/// `Bundle.entry`, ...).
///
/// `modifierExtension` is kept apart from `extension`: a consumer that does
/// not understand a modifier extension must not process the element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackboneElement {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub unmodeled: ExtensionBag,
}

impl BackboneElement {
    pub fn has_modifier_extensions(&self) -> bool {
        !self.modifier_extension.is_empty()
    }
}

impl FhirType for BackboneElement {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        ObjectReader::new(value, ctx)?.finish_backbone()
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.backbone(self);
        w.finish(&self.unmodeled)
    }
}

/// An extension: a url plus at most one `value[x]`, or nested extensions.
///
/// Extensions are kept whether or not their url is known. A `value[x]` of a
/// suffix outside [`ExtensionValue`] is not a FHIR R4 value type; it lands in
/// the base's bag and is written back as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extension {
    pub base: Element,
    pub url: String,
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            url: url.into(),
            value: Some(value),
            ..Default::default()
        }
    }

    /// Nested extensions of a complex extension
    pub fn children(&self) -> &[Extension] {
        &self.base.extension
    }
}

impl FhirType for Extension {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Extension {
            url: r.required("url")?,
            value: r.choice("value")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.value("url", &self.url);
        w.choice("value", &self.value);
        w.finish(&self.base.unmodeled)
    }
}

choice_type! {
    /// `Extension.value[x]`
    pub enum ExtensionValue {
        Base64Binary(Primitive<String>),
        Boolean(Primitive<bool>),
        Canonical(Primitive<String>),
        Code(Primitive<String>),
        Date(Primitive<String>),
        DateTime(Primitive<String>),
        Decimal(Primitive<Decimal>),
        Id(Primitive<String>),
        Instant(Primitive<String>),
        Integer(Primitive<i32>),
        Markdown(Primitive<String>),
        Oid(Primitive<String>),
        PositiveInt(Primitive<u32>),
        String(Primitive<String>),
        Time(Primitive<String>),
        UnsignedInt(Primitive<u32>),
        Uri(Primitive<String>),
        Url(Primitive<String>),
        Uuid(Primitive<String>),
        Address(Address),
        Age(Age),
        Annotation(Annotation),
        Attachment(Attachment),
        CodeableConcept(CodeableConcept),
        Coding(Coding),
        ContactPoint(ContactPoint),
        Count(Count),
        Distance(Distance),
        Duration(Duration),
        HumanName(HumanName),
        Identifier(Identifier),
        Money(Money),
        Period(Period),
        Quantity(Quantity),
        Range(Range),
        Ratio(Ratio),
        Reference(Reference),
        SampledData(SampledData),
        Signature(Signature),
        Timing(Timing),
        ContactDetail(RawComplex),
        Contributor(RawComplex),
        DataRequirement(RawComplex),
        Expression(RawComplex),
        ParameterDefinition(RawComplex),
        RelatedArtifact(RawComplex),
        TriggerDefinition(RawComplex),
        UsageContext(RawComplex),
        Dosage(Dosage),
        Meta(Meta),
    }
}
