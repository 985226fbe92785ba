//! FHIR R4 general-purpose datatypes
//!
//! Every complex datatype carries an [`Element`](crate::Element) `base`
//! holding its `id`, its extensions and any keys it does not model.

mod general;
mod meta;
mod timing;

pub use general::{
    Address, Age, Annotation, AnnotationAuthor, Attachment, CodeableConcept, Coding, ContactPoint,
    Count, Distance, Duration, HumanName, Identifier, Money, Period, Quantity, Range, Ratio,
    Reference, SampledData, Signature, SimpleQuantity,
};
pub use meta::{Meta, Narrative};
pub use timing::{
    Dosage, DosageAsNeeded, DosageDose, DosageDoseAndRate, DosageRate, Timing, TimingBounds,
    TimingRepeat,
};

value_set! {
    /// The gender of a person used for administrative purposes
    pub enum AdministrativeGender("http://hl7.org/fhir/ValueSet/administrative-gender") {
        Male = "male",
        Female = "female",
        Other = "other",
        Unknown = "unknown",
    }
}

value_set! {
    pub enum IdentifierUse("http://hl7.org/fhir/ValueSet/identifier-use") {
        Usual = "usual",
        Official = "official",
        Temp = "temp",
        Secondary = "secondary",
        Old = "old",
    }
}

value_set! {
    pub enum NameUse("http://hl7.org/fhir/ValueSet/name-use") {
        Usual = "usual",
        Official = "official",
        Temp = "temp",
        Nickname = "nickname",
        Anonymous = "anonymous",
        Old = "old",
        Maiden = "maiden",
    }
}

value_set! {
    pub enum AddressUse("http://hl7.org/fhir/ValueSet/address-use") {
        Home = "home",
        Work = "work",
        Temp = "temp",
        Old = "old",
        Billing = "billing",
    }
}

value_set! {
    pub enum AddressType("http://hl7.org/fhir/ValueSet/address-type") {
        Postal = "postal",
        Physical = "physical",
        Both = "both",
    }
}

value_set! {
    pub enum ContactPointSystem("http://hl7.org/fhir/ValueSet/contact-point-system") {
        Phone = "phone",
        Fax = "fax",
        Email = "email",
        Pager = "pager",
        Url = "url",
        Sms = "sms",
        Other = "other",
    }
}

value_set! {
    pub enum ContactPointUse("http://hl7.org/fhir/ValueSet/contact-point-use") {
        Home = "home",
        Work = "work",
        Temp = "temp",
        Old = "old",
        Mobile = "mobile",
    }
}

value_set! {
    /// How the `Quantity.value` should be understood
    pub enum QuantityComparator("http://hl7.org/fhir/ValueSet/quantity-comparator") {
        LessThan = "<",
        LessOrEqual = "<=",
        GreaterOrEqual = ">=",
        GreaterThan = ">",
    }
}

value_set! {
    pub enum NarrativeStatus("http://hl7.org/fhir/ValueSet/narrative-status") {
        Generated = "generated",
        Extensions = "extensions",
        Additional = "additional",
        Empty = "empty",
    }
}

value_set! {
    pub enum UnitsOfTime("http://hl7.org/fhir/ValueSet/units-of-time") {
        Second = "s",
        Minute = "min",
        Hour = "h",
        Day = "d",
        Week = "wk",
        Month = "mo",
        Year = "a",
    }
}

value_set! {
    pub enum DaysOfWeek("http://hl7.org/fhir/ValueSet/days-of-week") {
        Mon = "mon",
        Tue = "tue",
        Wed = "wed",
        Thu = "thu",
        Fri = "fri",
        Sat = "sat",
        Sun = "sun",
    }
}
