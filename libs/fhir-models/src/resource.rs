//! Resource base types and the typed/dynamic resource traits
//!
//! A concrete resource implements [`TypedResource`]: its name, how to read
//! its fields from an [`ObjectReader`] and how to write them to an
//! [`ObjectWriter`]. The shared `resourceType` handling lives in
//! [`decode_resource`] and [`encode_resource`].
//!
//! [`AnyResource`] is the owned, type-erased form used wherever FHIR allows
//! "any resource": `DomainResource.contained` and `Bundle.entry.resource`.

use crate::codec::{
    json_kind, DecodeContext, ExtensionBag, FhirType, ObjectReader, ObjectWriter, Primitive,
    Value,
};
use crate::datatypes::{Meta, Narrative};
use crate::element::Extension;
use crate::error::{DecodeError, Result};
use std::any::Any;
use std::fmt;
use std::ops::Deref;

/// Fields shared by every resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBase {
    pub id: Option<String>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Primitive<String>>,
    pub language: Option<Primitive<String>>,
    pub unmodeled: ExtensionBag,
}

/// Fields shared by every resource that carries narrative, contained
/// resources and extensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainResource {
    pub id: Option<String>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Primitive<String>>,
    pub language: Option<Primitive<String>>,
    pub text: Option<Narrative>,
    pub contained: Vec<AnyResource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub unmodeled: ExtensionBag,
}

impl DomainResource {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Whether any modifier extension is present. A consumer that does not
    /// know every modifier extension must not treat the resource as safe to
    /// process.
    pub fn has_modifier_extensions(&self) -> bool {
        !self.modifier_extension.is_empty()
    }

    /// Resolve a local reference (`#id`) against `contained`
    pub fn contained_by_id(&self, reference: &str) -> Option<&AnyResource> {
        let id = reference.strip_prefix('#')?;
        self.contained.iter().find(|r| r.id() == Some(id))
    }
}

/// A concrete resource type with a fixed `resourceType` name
pub trait TypedResource: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const RESOURCE_TYPE: &'static str;

    /// Read every field except `resourceType`, which the caller has
    /// already checked
    fn decode_fields(r: ObjectReader<'_, '_>) -> Result<Self>;

    /// Write every field except `resourceType`
    fn encode_fields(&self, w: &mut ObjectWriter);

    fn unmodeled(&self) -> &ExtensionBag;

    fn id(&self) -> Option<&str>;

    fn modifier_extensions(&self) -> &[Extension] {
        &[]
    }
}

/// Decode a resource of a known type, checking its `resourceType`
pub fn decode_resource<T: TypedResource>(value: Value, ctx: &mut DecodeContext<'_>) -> Result<T> {
    let mut r = ObjectReader::new(value, ctx)?;
    match r.take("resourceType") {
        Some(Value::String(name)) if name == T::RESOURCE_TYPE => {}
        Some(Value::String(name)) => {
            return Err(DecodeError::TypeMismatch {
                path: r.context().path_with("resourceType"),
                expected: T::RESOURCE_TYPE.to_string(),
                found: name,
            })
        }
        Some(other) => {
            return Err(DecodeError::TypeMismatch {
                path: r.context().path_with("resourceType"),
                expected: "string".to_string(),
                found: json_kind(&other).to_string(),
            })
        }
        None => {
            return Err(DecodeError::MissingRequiredField {
                path: r.context().path_with("resourceType"),
            })
        }
    }
    T::decode_fields(r)
}

/// Encode a resource with `resourceType` as its first key
pub fn encode_resource<T: TypedResource>(resource: &T) -> Value {
    let mut w = ObjectWriter::new();
    w.resource_type(T::RESOURCE_TYPE);
    resource.encode_fields(&mut w);
    w.finish(resource.unmodeled())
}

/// Object-safe view of a [`TypedResource`]
pub trait Resource: fmt::Debug + Send + Sync + 'static {
    fn resource_type(&self) -> &'static str;
    fn id(&self) -> Option<&str>;
    fn modifier_extensions(&self) -> &[Extension];
    fn to_value(&self) -> Value;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_boxed(&self) -> Box<dyn Resource>;
    fn eq_dyn(&self, other: &dyn Resource) -> bool;
}

impl<T: TypedResource> Resource for T {
    fn resource_type(&self) -> &'static str {
        T::RESOURCE_TYPE
    }

    fn id(&self) -> Option<&str> {
        TypedResource::id(self)
    }

    fn modifier_extensions(&self) -> &[Extension] {
        TypedResource::modifier_extensions(self)
    }

    fn to_value(&self) -> Value {
        encode_resource(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Resource) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }
}

/// An owned resource of any registered type
#[derive(Debug)]
pub struct AnyResource(Box<dyn Resource>);

impl AnyResource {
    pub fn new<T: TypedResource>(resource: T) -> Self {
        Self(Box::new(resource))
    }

    pub fn from_boxed(resource: Box<dyn Resource>) -> Self {
        Self(resource)
    }

    pub fn is<T: TypedResource>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    pub fn downcast_ref<T: TypedResource>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }

    /// Take the concrete resource out; `None` if it is of another type
    pub fn downcast<T: TypedResource>(self) -> Option<T> {
        self.0.into_any().downcast::<T>().ok().map(|r| *r)
    }

    pub fn has_modifier_extensions(&self) -> bool {
        !self.0.modifier_extensions().is_empty()
    }

    pub fn into_inner(self) -> Box<dyn Resource> {
        self.0
    }
}

impl Deref for AnyResource {
    type Target = dyn Resource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Clone for AnyResource {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for AnyResource {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl<T: TypedResource> From<T> for AnyResource {
    fn from(resource: T) -> Self {
        Self::new(resource)
    }
}

/// Decoded through the registry of the current [`DecodeContext`]
impl FhirType for AnyResource {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let registry = ctx.registry();
        registry.decode(value, ctx)
    }

    fn encode(&self) -> Value {
        self.0.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::error::ErrorKind;
    use crate::registry::ResourceRegistry;
    use crate::resources::{Basic, Patient};
    use serde_json::json;

    fn decode<T: TypedResource>(value: Value) -> Result<T> {
        let registry = ResourceRegistry::r4();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);
        ctx.scoped(T::RESOURCE_TYPE, |ctx| decode_resource::<T>(value, ctx))
    }

    #[test]
    fn test_resource_type_must_match() {
        let err = decode::<Patient>(json!({"resourceType": "Practitioner"})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                path: "Patient.resourceType".to_string(),
                expected: "Patient".to_string(),
                found: "Practitioner".to_string(),
            }
        );
    }

    #[test]
    fn test_resource_type_is_required() {
        let err = decode::<Patient>(json!({"id": "p1"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.path(), Some("Patient.resourceType"));
    }

    #[test]
    fn test_resource_type_written_first() {
        let mut patient = Patient::default();
        patient.base.id = Some("p1".to_string());
        let value = encode_resource(&patient);
        let first = value.as_object().unwrap().keys().next().cloned();
        assert_eq!(first.as_deref(), Some("resourceType"));
        assert_eq!(value, json!({"resourceType": "Patient", "id": "p1"}));
    }

    #[test]
    fn test_any_resource_equality_and_downcast() {
        let mut patient = Patient::default();
        patient.base.id = Some("p1".to_string());
        let any = AnyResource::from(patient.clone());

        assert_eq!(any.resource_type(), "Patient");
        assert_eq!(any.id(), Some("p1"));
        assert!(any.is::<Patient>());
        assert!(!any.is::<Basic>());
        assert_eq!(any.clone(), any);
        assert_ne!(any, AnyResource::from(Patient::default()));
        assert_eq!(any.downcast_ref::<Patient>(), Some(&patient));
        assert_eq!(any.clone().downcast::<Basic>(), None);
        assert_eq!(any.downcast::<Patient>(), Some(patient));
    }

    #[test]
    fn test_contained_lookup() {
        let patient: Patient = decode(json!({
            "resourceType": "Patient",
            "contained": [{"resourceType": "Patient", "id": "mom"}],
            "link": [{"other": {"reference": "#mom"}, "type": "seealso"}]
        }))
        .unwrap();
        let mom = patient.base.contained_by_id("#mom").unwrap();
        assert_eq!(mom.resource_type(), "Patient");
        assert!(patient.base.contained_by_id("mom").is_none());
    }
}
