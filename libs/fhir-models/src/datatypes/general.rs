use super::{
    AddressType, AddressUse, ContactPointSystem, ContactPointUse, IdentifierUse, NameUse,
    QuantityComparator,
};
use crate::codec::{
    complex_choice_variant, DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value,
};
use crate::element::Element;
use crate::error::Result;
use rust_decimal::Decimal;

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coding {
    /// Element id and extensions
    pub base: Element,

    /// Identity of the terminology system
    pub system: Option<Primitive<String>>,

    /// Version of the system - if relevant
    pub version: Option<Primitive<String>>,

    /// Symbol in syntax defined by the system
    pub code: Option<Primitive<String>>,

    /// Representation defined by the system
    pub display: Option<Primitive<String>>,

    /// If this coding was chosen directly by the user
    pub user_selected: Option<Primitive<bool>>,
}

impl Coding {
    pub fn new(system: &str, code: &str) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_ref().and_then(Primitive::as_str)
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_ref().and_then(Primitive::as_str)
    }

    /// Whether this coding carries `code` from `system`
    pub fn is(&self, system: &str, code: &str) -> bool {
        self.system() == Some(system) && self.code() == Some(code)
    }
}

impl FhirType for Coding {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Coding {
            system: r.primitive("system")?,
            version: r.primitive("version")?,
            code: r.primitive("code")?,
            display: r.primitive("display")?,
            user_selected: r.primitive("userSelected")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("system", &self.system);
        w.primitive("version", &self.version);
        w.primitive("code", &self.code);
        w.primitive("display", &self.display);
        w.primitive("userSelected", &self.user_selected);
        w.finish(&self.base.unmodeled)
    }
}

/// A concept given by zero or more codings and/or free text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeableConcept {
    /// Element id and extensions
    pub base: Element,

    /// Code defined by a terminology system
    pub coding: Vec<Coding>,

    /// Plain text representation of the concept
    pub text: Option<Primitive<String>>,
}

impl CodeableConcept {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            ..Default::default()
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_ref().and_then(Primitive::as_str)
    }

    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|c| c.is(system, code))
    }
}

impl FhirType for CodeableConcept {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(CodeableConcept {
            coding: r.list("coding")?,
            text: r.primitive("text")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.list("coding", &self.coding);
        w.primitive("text", &self.text);
        w.finish(&self.base.unmodeled)
    }
}

/// A business identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identifier {
    /// Element id and extensions
    pub base: Element,

    /// usual | official | temp | secondary | old (If known)
    pub use_: Option<Primitive<IdentifierUse>>,

    /// Description of identifier
    pub type_: Option<CodeableConcept>,

    /// The namespace for the identifier value
    pub system: Option<Primitive<String>>,

    /// The value that is unique
    pub value: Option<Primitive<String>>,

    /// Time period when id is/was valid for use
    pub period: Option<Period>,

    /// Organization that issued id (may be just text)
    pub assigner: Option<Box<Reference>>,
}

impl Identifier {
    pub fn new(system: &str, value: &str) -> Self {
        Self {
            system: Some(system.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_ref().and_then(Primitive::as_str)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_ref().and_then(Primitive::as_str)
    }
}

impl FhirType for Identifier {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Identifier {
            use_: r.primitive("use")?,
            type_: r.optional("type")?,
            system: r.primitive("system")?,
            value: r.primitive("value")?,
            period: r.optional("period")?,
            assigner: r.optional("assigner")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("use", &self.use_);
        w.optional("type", &self.type_);
        w.primitive("system", &self.system);
        w.primitive("value", &self.value);
        w.optional("period", &self.period);
        w.optional("assigner", &self.assigner);
        w.finish(&self.base.unmodeled)
    }
}

/// A non-owning pointer to another resource, by literal reference, by
/// logical identifier, or both
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    /// Element id and extensions
    pub base: Element,

    /// Literal reference, Relative, internal or absolute URL
    pub reference: Option<Primitive<String>>,

    /// Type the reference refers to (e.g. "Patient")
    pub type_: Option<Primitive<String>>,

    /// Logical reference, when literal reference is not known
    pub identifier: Option<Identifier>,

    /// Text alternative for the resource
    pub display: Option<Primitive<String>>,
}

impl Reference {
    /// A literal reference such as `Patient/123` or `#contained-id`
    pub fn new(reference: &str) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_ref().and_then(Primitive::as_str)
    }

    /// Whether the reference points at a resource in the parent's `contained`
    pub fn is_contained(&self) -> bool {
        self.reference().is_some_and(|r| r.starts_with('#'))
    }

    /// Split a relative literal reference into `(type, id)`
    pub fn type_and_id(&self) -> Option<(&str, &str)> {
        let reference = self.reference()?;
        let mut parts = reference.rsplitn(3, '/');
        let id = parts.next()?;
        let resource_type = parts.next()?;
        if id.is_empty() || resource_type.is_empty() {
            return None;
        }
        Some((resource_type, id))
    }
}

impl FhirType for Reference {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Reference {
            reference: r.primitive("reference")?,
            type_: r.primitive("type")?,
            identifier: r.optional("identifier")?,
            display: r.primitive("display")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("reference", &self.reference);
        w.primitive("type", &self.type_);
        w.optional("identifier", &self.identifier);
        w.primitive("display", &self.display);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Period {
    /// Element id and extensions
    pub base: Element,

    /// Starting time with inclusive boundary
    pub start: Option<Primitive<String>>,

    /// End time with inclusive boundary, if not ongoing
    pub end: Option<Primitive<String>>,
}

impl FhirType for Period {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Period {
            start: r.primitive("start")?,
            end: r.primitive("end")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("start", &self.start);
        w.primitive("end", &self.end);
        w.finish(&self.base.unmodeled)
    }
}

/// A measured amount.
///
/// `Age`, `Count`, `Distance`, `Duration` and `SimpleQuantity` share this
/// representation; their extra constraints are profile rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quantity {
    /// Element id and extensions
    pub base: Element,

    /// Numerical value (with implicit precision)
    pub value: Option<Primitive<Decimal>>,

    /// < | <= | >= | > - how to understand the value
    pub comparator: Option<Primitive<QuantityComparator>>,

    /// Unit representation
    pub unit: Option<Primitive<String>>,

    /// System that defines coded unit form
    pub system: Option<Primitive<String>>,

    /// Coded form of the unit
    pub code: Option<Primitive<String>>,
}

pub type Age = Quantity;
pub type Count = Quantity;
pub type Distance = Quantity;
pub type Duration = Quantity;
pub type SimpleQuantity = Quantity;

impl Quantity {
    /// A UCUM quantity
    pub fn ucum(value: Decimal, code: &str) -> Self {
        Self {
            value: Some(value.into()),
            unit: Some(code.into()),
            system: Some("http://unitsofmeasure.org".into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value.as_ref().and_then(|v| v.value)
    }
}

impl FhirType for Quantity {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Quantity {
            value: r.primitive("value")?,
            comparator: r.primitive("comparator")?,
            unit: r.primitive("unit")?,
            system: r.primitive("system")?,
            code: r.primitive("code")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("value", &self.value);
        w.primitive("comparator", &self.comparator);
        w.primitive("unit", &self.unit);
        w.primitive("system", &self.system);
        w.primitive("code", &self.code);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    /// Element id and extensions
    pub base: Element,

    /// Low limit
    pub low: Option<SimpleQuantity>,

    /// High limit
    pub high: Option<SimpleQuantity>,
}

impl FhirType for Range {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Range {
            low: r.optional("low")?,
            high: r.optional("high")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.optional("low", &self.low);
        w.optional("high", &self.high);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ratio {
    /// Element id and extensions
    pub base: Element,

    /// Numerator value
    pub numerator: Option<Quantity>,

    /// Denominator value
    pub denominator: Option<Quantity>,
}

impl FhirType for Ratio {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Ratio {
            numerator: r.optional("numerator")?,
            denominator: r.optional("denominator")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.optional("numerator", &self.numerator);
        w.optional("denominator", &self.denominator);
        w.finish(&self.base.unmodeled)
    }
}

/// A series of measurements taken by a device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledData {
    /// Element id and extensions
    pub base: Element,

    /// Zero value and units
    pub origin: SimpleQuantity,

    /// Number of milliseconds between samples
    pub period: Primitive<Decimal>,

    /// Multiply data by this before adding to origin
    pub factor: Option<Primitive<Decimal>>,

    /// Lower limit of detection
    pub lower_limit: Option<Primitive<Decimal>>,

    /// Upper limit of detection
    pub upper_limit: Option<Primitive<Decimal>>,

    /// Number of sample points at each time point
    pub dimensions: Primitive<u32>,

    /// Decimal values with spaces, or "E" | "U" | "L"
    pub data: Option<Primitive<String>>,
}

impl FhirType for SampledData {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(SampledData {
            origin: r.required("origin")?,
            period: r.required_primitive("period")?,
            factor: r.primitive("factor")?,
            lower_limit: r.primitive("lowerLimit")?,
            upper_limit: r.primitive("upperLimit")?,
            dimensions: r.required_primitive("dimensions")?,
            data: r.primitive("data")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.value("origin", &self.origin);
        w.required_primitive("period", &self.period);
        w.primitive("factor", &self.factor);
        w.primitive("lowerLimit", &self.lower_limit);
        w.primitive("upperLimit", &self.upper_limit);
        w.required_primitive("dimensions", &self.dimensions);
        w.primitive("data", &self.data);
        w.finish(&self.base.unmodeled)
    }
}

/// Content in a format defined elsewhere, inline (`data`) or by `url`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachment {
    /// Element id and extensions
    pub base: Element,

    /// Mime type of the content, with charset etc.
    pub content_type: Option<Primitive<String>>,

    /// Human language of the content (BCP-47)
    pub language: Option<Primitive<String>>,

    /// Data inline, base64ed
    pub data: Option<Primitive<String>>,

    /// Uri where the data can be found
    pub url: Option<Primitive<String>>,

    /// Number of bytes of content (if url provided)
    pub size: Option<Primitive<u32>>,

    /// Hash of the data (sha-1, base64ed)
    pub hash: Option<Primitive<String>>,

    /// Label to display in place of the data
    pub title: Option<Primitive<String>>,

    /// Date attachment was first created
    pub creation: Option<Primitive<String>>,
}

impl FhirType for Attachment {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Attachment {
            content_type: r.primitive("contentType")?,
            language: r.primitive("language")?,
            data: r.primitive("data")?,
            url: r.primitive("url")?,
            size: r.primitive("size")?,
            hash: r.primitive("hash")?,
            title: r.primitive("title")?,
            creation: r.primitive("creation")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("contentType", &self.content_type);
        w.primitive("language", &self.language);
        w.primitive("data", &self.data);
        w.primitive("url", &self.url);
        w.primitive("size", &self.size);
        w.primitive("hash", &self.hash);
        w.primitive("title", &self.title);
        w.primitive("creation", &self.creation);
        w.finish(&self.base.unmodeled)
    }
}

choice_type! {
    /// `Annotation.author[x]`
    pub enum AnnotationAuthor {
        Reference(Reference),
        String(Primitive<String>),
    }
}

/// A text note with attribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    /// Element id and extensions
    pub base: Element,

    /// Individual responsible for the annotation
    pub author: Option<AnnotationAuthor>,

    /// When the annotation was made
    pub time: Option<Primitive<String>>,

    /// The annotation - text content (as markdown)
    pub text: Primitive<String>,
}

impl Annotation {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

impl FhirType for Annotation {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Annotation {
            author: r.choice("author")?,
            time: r.primitive("time")?,
            text: r.required_primitive("text")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.choice("author", &self.author);
        w.primitive("time", &self.time);
        w.required_primitive("text", &self.text);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HumanName {
    /// Element id and extensions
    pub base: Element,

    /// usual | official | temp | nickname | anonymous | old | maiden
    pub use_: Option<Primitive<NameUse>>,

    /// Text representation of the full name
    pub text: Option<Primitive<String>>,

    /// Family name (often called 'Surname')
    pub family: Option<Primitive<String>>,

    /// Given names (not always 'first'). Includes middle names
    pub given: Vec<Primitive<String>>,

    /// Parts that come before the name
    pub prefix: Vec<Primitive<String>>,

    /// Parts that come after the name
    pub suffix: Vec<Primitive<String>>,

    /// Time period when name was/is in use
    pub period: Option<Period>,
}

impl HumanName {
    pub fn new(family: &str, given: &[&str]) -> Self {
        Self {
            family: Some(family.into()),
            given: given.iter().map(|g| Primitive::<String>::from(*g)).collect(),
            ..Default::default()
        }
    }

    /// `text` if present, otherwise the given names followed by the family
    /// name
    pub fn display(&self) -> String {
        if let Some(text) = self.text.as_ref().and_then(Primitive::as_str) {
            return text.to_string();
        }
        self.given
            .iter()
            .filter_map(Primitive::as_str)
            .chain(self.family.as_ref().and_then(Primitive::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FhirType for HumanName {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(HumanName {
            use_: r.primitive("use")?,
            text: r.primitive("text")?,
            family: r.primitive("family")?,
            given: r.primitive_list("given")?,
            prefix: r.primitive_list("prefix")?,
            suffix: r.primitive_list("suffix")?,
            period: r.optional("period")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("use", &self.use_);
        w.primitive("text", &self.text);
        w.primitive("family", &self.family);
        w.primitive_list("given", &self.given);
        w.primitive_list("prefix", &self.prefix);
        w.primitive_list("suffix", &self.suffix);
        w.optional("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    /// Element id and extensions
    pub base: Element,

    /// home | work | temp | old | billing - purpose of this address
    pub use_: Option<Primitive<AddressUse>>,

    /// postal | physical | both
    pub type_: Option<Primitive<AddressType>>,

    /// Text representation of the address
    pub text: Option<Primitive<String>>,

    /// Street name, number, direction & P.O. Box etc.
    pub line: Vec<Primitive<String>>,

    /// Name of city, town etc.
    pub city: Option<Primitive<String>>,

    /// District name (aka county)
    pub district: Option<Primitive<String>>,

    /// Sub-unit of country (abbreviations ok)
    pub state: Option<Primitive<String>>,

    /// Postal code for area
    pub postal_code: Option<Primitive<String>>,

    /// Country (e.g. can be ISO 3166 2 or 3 letter code)
    pub country: Option<Primitive<String>>,

    /// Time period when address was/is in use
    pub period: Option<Period>,
}

impl FhirType for Address {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Address {
            use_: r.primitive("use")?,
            type_: r.primitive("type")?,
            text: r.primitive("text")?,
            line: r.primitive_list("line")?,
            city: r.primitive("city")?,
            district: r.primitive("district")?,
            state: r.primitive("state")?,
            postal_code: r.primitive("postalCode")?,
            country: r.primitive("country")?,
            period: r.optional("period")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("use", &self.use_);
        w.primitive("type", &self.type_);
        w.primitive("text", &self.text);
        w.primitive_list("line", &self.line);
        w.primitive("city", &self.city);
        w.primitive("district", &self.district);
        w.primitive("state", &self.state);
        w.primitive("postalCode", &self.postal_code);
        w.primitive("country", &self.country);
        w.optional("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}

/// Phone, email and other telecom contact details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPoint {
    /// Element id and extensions
    pub base: Element,

    /// phone | fax | email | pager | url | sms | other
    pub system: Option<Primitive<ContactPointSystem>>,

    /// The actual contact point details
    pub value: Option<Primitive<String>>,

    /// home | work | temp | old | mobile - purpose of this contact point
    pub use_: Option<Primitive<ContactPointUse>>,

    /// Specify preferred order of use (1 = highest)
    pub rank: Option<Primitive<u32>>,

    /// Time period when the contact point was/is in use
    pub period: Option<Period>,
}

impl FhirType for ContactPoint {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(ContactPoint {
            system: r.primitive("system")?,
            value: r.primitive("value")?,
            use_: r.primitive("use")?,
            rank: r.primitive("rank")?,
            period: r.optional("period")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("system", &self.system);
        w.primitive("value", &self.value);
        w.primitive("use", &self.use_);
        w.primitive("rank", &self.rank);
        w.optional("period", &self.period);
        w.finish(&self.base.unmodeled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Money {
    /// Element id and extensions
    pub base: Element,

    /// Numerical value (with implicit precision)
    pub value: Option<Primitive<Decimal>>,

    /// ISO 4217 Currency Code
    pub currency: Option<Primitive<String>>,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            value: Some(Primitive::new(amount)),
            currency: Some(Primitive::new(currency.into())),
            ..Default::default()
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.value.as_ref().and_then(Primitive::value).copied()
    }
}

impl FhirType for Money {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Money {
            value: r.primitive("value")?,
            currency: r.primitive("currency")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("value", &self.value);
        w.primitive("currency", &self.currency);
        w.finish(&self.base.unmodeled)
    }
}

/// A digital or written signature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    /// Element id and extensions
    pub base: Element,

    /// Indication of the reason the entity signed the object(s)
    pub type_: Vec<Coding>,

    /// When the signature was created
    pub when: Primitive<String>,

    /// Who signed
    pub who: Reference,

    /// The party represented
    pub on_behalf_of: Option<Reference>,

    /// The technical format of the signed resources
    pub target_format: Option<Primitive<String>>,

    /// The technical format of the signature
    pub sig_format: Option<Primitive<String>>,

    /// The actual signature content (XML DigSig. JWS, picture, etc.)
    pub data: Option<Primitive<String>>,
}

impl FhirType for Signature {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Signature {
            type_: r.required_list("type")?,
            when: r.required_primitive("when")?,
            who: r.required("who")?,
            on_behalf_of: r.optional("onBehalfOf")?,
            target_format: r.primitive("targetFormat")?,
            sig_format: r.primitive("sigFormat")?,
            data: r.primitive("data")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.list("type", &self.type_);
        w.required_primitive("when", &self.when);
        w.value("who", &self.who);
        w.optional("onBehalfOf", &self.on_behalf_of);
        w.primitive("targetFormat", &self.target_format);
        w.primitive("sigFormat", &self.sig_format);
        w.primitive("data", &self.data);
        w.finish(&self.base.unmodeled)
    }
}

complex_choice_variant!(
    Address,
    Annotation,
    Attachment,
    CodeableConcept,
    Coding,
    ContactPoint,
    HumanName,
    Identifier,
    Money,
    Period,
    Quantity,
    Range,
    Ratio,
    Reference,
    SampledData,
    Signature,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::error::ErrorKind;
    use crate::registry::ResourceRegistry;
    use serde_json::json;
    use std::str::FromStr;

    fn decode<T: FhirType>(value: Value) -> Result<T> {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        T::decode(value, &mut ctx)
    }

    #[test]
    fn test_coding_round_trip() {
        let raw = json!({
            "system": "http://loinc.org",
            "code": "8867-4",
            "display": "Heart rate",
            "userSelected": false
        });
        let coding: Coding = decode(raw.clone()).unwrap();
        assert!(coding.is("http://loinc.org", "8867-4"));
        assert_eq!(coding.encode(), raw);
    }

    #[test]
    fn test_identifier_with_assigner() {
        let raw = json!({
            "use": "official",
            "system": "urn:oid:1.2.36.146.595.217.0.1",
            "value": "12345",
            "assigner": {"display": "Acme Healthcare"}
        });
        let identifier: Identifier = decode(raw.clone()).unwrap();
        assert_eq!(
            identifier.use_.as_ref().and_then(|u| u.value.clone()),
            Some(IdentifierUse::Official)
        );
        assert_eq!(
            identifier.assigner.as_ref().and_then(|a| a.display.clone()),
            Some(Primitive::from("Acme Healthcare"))
        );
        assert_eq!(identifier.encode(), raw);
    }

    #[test]
    fn test_reference_parts() {
        assert_eq!(
            Reference::new("Patient/123").type_and_id(),
            Some(("Patient", "123"))
        );
        assert_eq!(
            Reference::new("http://example.org/fhir/Patient/123").type_and_id(),
            Some(("Patient", "123"))
        );
        assert_eq!(Reference::new("#p1").type_and_id(), None);
        assert!(Reference::new("#p1").is_contained());
    }

    #[test]
    fn test_quantity_comparator() {
        let raw = json!({"value": 5.5, "comparator": "<", "unit": "mmol/L"});
        let quantity: Quantity = decode(raw.clone()).unwrap();
        assert_eq!(quantity.value(), Some(Decimal::from_str("5.5").unwrap()));
        assert_eq!(
            quantity.comparator.as_ref().and_then(|c| c.value.clone()),
            Some(QuantityComparator::LessThan)
        );
        assert_eq!(quantity.encode(), raw);
    }

    #[test]
    fn test_sampled_data_requires_origin() {
        let err = decode::<SampledData>(json!({"period": 10, "dimensions": 1})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("origin"));
    }

    #[test]
    fn test_annotation_author_choice() {
        let raw = json!({"authorString": "Dr. Who", "text": "Seen today"});
        let note: Annotation = decode(raw.clone()).unwrap();
        assert!(matches!(note.author, Some(AnnotationAuthor::String(_))));
        assert_eq!(note.encode(), raw);

        let err = decode::<Annotation>(json!({
            "authorString": "Dr. Who",
            "authorReference": {"reference": "Practitioner/1"},
            "text": "Seen today"
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChoiceConflict);
    }

    #[test]
    fn test_human_name_display() {
        let name = HumanName::new("Chalmers", &["Peter", "James"]);
        assert_eq!(name.display(), "Peter James Chalmers");
        assert_eq!(
            name.encode(),
            json!({"family": "Chalmers", "given": ["Peter", "James"]})
        );
    }

    #[test]
    fn test_address_unknown_use_is_kept() {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        let raw = json!({"use": "holiday", "line": ["1 Main St"], "city": "Springfield"});
        let address = Address::decode(raw.clone(), &mut ctx).unwrap();
        assert_eq!(
            address.use_.as_ref().and_then(|u| u.value.clone()),
            Some(AddressUse::Unrecognized("holiday".to_string()))
        );
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].path(), "use");
        assert_eq!(address.encode(), raw);
    }
}
