use super::{Coding, NarrativeStatus};
use crate::codec::{
    complex_choice_variant, DecodeContext, FhirType, ObjectReader, ObjectWriter, Primitive, Value,
};
use crate::element::Element;
use crate::error::Result;

/// Metadata about a resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    pub base: Element,
    pub version_id: Option<Primitive<String>>,
    pub last_updated: Option<Primitive<String>>,
    pub source: Option<Primitive<String>>,
    pub profile: Vec<Primitive<String>>,
    pub security: Vec<Coding>,
    pub tag: Vec<Coding>,
}

impl Meta {
    /// Profile canonicals the resource claims to conform to
    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.profile.iter().filter_map(Primitive::as_str)
    }
}

impl FhirType for Meta {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Meta {
            version_id: r.primitive("versionId")?,
            last_updated: r.primitive("lastUpdated")?,
            source: r.primitive("source")?,
            profile: r.primitive_list("profile")?,
            security: r.list("security")?,
            tag: r.list("tag")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.primitive("versionId", &self.version_id);
        w.primitive("lastUpdated", &self.last_updated);
        w.primitive("source", &self.source);
        w.primitive_list("profile", &self.profile);
        w.list("security", &self.security);
        w.list("tag", &self.tag);
        w.finish(&self.base.unmodeled)
    }
}

complex_choice_variant!(Meta);

/// Human-readable summary of a resource.
///
/// `div` is limited XHTML and cannot carry extensions, so it is a plain
/// string rather than a [`Primitive`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrative {
    pub base: Element,
    pub status: Primitive<NarrativeStatus>,
    pub div: String,
}

impl Narrative {
    pub fn generated(div: impl Into<String>) -> Self {
        Self {
            base: Element::default(),
            status: Primitive::new(NarrativeStatus::Generated),
            div: div.into(),
        }
    }
}

impl FhirType for Narrative {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut r = ObjectReader::new(value, ctx)?;
        Ok(Narrative {
            status: r.required_primitive("status")?,
            div: r.required("div")?,
            base: r.finish_element()?,
        })
    }

    fn encode(&self) -> Value {
        let mut w = ObjectWriter::new();
        w.element(&self.base);
        w.required_primitive("status", &self.status);
        w.value("div", &self.div);
        w.finish(&self.base.unmodeled)
    }
}
