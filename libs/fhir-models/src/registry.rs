//! Resource registry for polymorphic slots
//!
//! Maps a `resourceType` name to the function that decodes it. The registry
//! is a plain value: build it once, share it behind an `Arc`, and hand it to
//! every [`FhirJsonCodec`](crate::FhirJsonCodec) that should know about
//! those types.

use crate::codec::{DecodeContext, Value};
use crate::error::{DecodeError, Result};
use crate::resource::{decode_resource, AnyResource, TypedResource};
use crate::resources::{
    Basic, Bundle, Claim, Condition, Encounter, MedicationRequest, Observation,
    OperationOutcome, Organization, Patient, Practitioner,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Decode function for one resource type
pub type ResourceFactory =
    Arc<dyn Fn(Value, &mut DecodeContext<'_>) -> Result<AnyResource> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ResourceRegistry {
    factories: HashMap<String, ResourceFactory>,
}

impl ResourceRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every resource type defined in this crate
    pub fn r4() -> Self {
        let mut registry = Self::new();
        registry
            .register::<Patient>()
            .register::<Practitioner>()
            .register::<Organization>()
            .register::<Observation>()
            .register::<Condition>()
            .register::<Encounter>()
            .register::<MedicationRequest>()
            .register::<Claim>()
            .register::<Basic>()
            .register::<Bundle>()
            .register::<OperationOutcome>();
        registry
    }

    /// Register a typed resource under its own `resourceType`
    pub fn register<T: TypedResource>(&mut self) -> &mut Self {
        self.register_with(T::RESOURCE_TYPE, |value, ctx| {
            decode_resource::<T>(value, ctx).map(AnyResource::new)
        })
    }

    /// Register an arbitrary decode function under `name`. A later
    /// registration for the same name replaces the earlier one.
    pub fn register_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Value, &mut DecodeContext<'_>) -> Result<AnyResource> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(resource_type = %name, "Replaced resource factory");
        } else {
            tracing::debug!(resource_type = %name, "Registered resource factory");
        }
        self
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.factories.contains_key(resource_type)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered type names, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decode a resource of whatever type its `resourceType` names.
    ///
    /// A missing, non-string or unregistered `resourceType` yields
    /// `UnknownResourceType`.
    pub fn decode(&self, value: Value, ctx: &mut DecodeContext<'_>) -> Result<AnyResource> {
        let Value::Object(fields) = &value else {
            return Err(ctx.type_mismatch("object", &value));
        };
        let Some(Value::String(resource_type)) = fields.get("resourceType") else {
            return Err(DecodeError::UnknownResourceType {
                path: ctx.path(),
                resource_type: None,
            });
        };
        let resource_type = resource_type.clone();
        let Some(factory) = self.factories.get(&resource_type) else {
            return Err(DecodeError::UnknownResourceType {
                path: ctx.path(),
                resource_type: Some(resource_type),
            });
        };
        tracing::debug!(path = %ctx.path(), resource_type = %resource_type, "Dispatching resource");
        factory(value, ctx)
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_r4_registry_contents() {
        let registry = ResourceRegistry::r4();
        assert_eq!(registry.len(), 11);
        assert!(registry.contains("Patient"));
        assert!(registry.contains("Bundle"));
        assert!(!registry.contains("Foo"));
        assert_eq!(registry.resource_types()[0], "Basic");
    }

    #[test]
    fn test_dispatch_by_resource_type() {
        let registry = ResourceRegistry::r4();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);

        let resource = registry
            .decode(json!({"resourceType": "Patient", "id": "p1"}), &mut ctx)
            .unwrap();
        assert!(resource.is::<Patient>());
        assert_eq!(resource.id(), Some("p1"));
    }

    #[test]
    fn test_unregistered_type() {
        let registry = ResourceRegistry::r4();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);

        let err = ctx
            .scoped("Bundle", |ctx| {
                ctx.scoped("entry", |ctx| {
                    ctx.scoped("[2]", |ctx| {
                        ctx.scoped("resource", |ctx| {
                            registry.decode(json!({"resourceType": "Foo"}), ctx)
                        })
                    })
                })
            })
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownResourceType {
                path: "Bundle.entry[2].resource".to_string(),
                resource_type: Some("Foo".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_resource_type() {
        let registry = ResourceRegistry::r4();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);

        let err = registry.decode(json!({"id": "x"}), &mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownResourceType);
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = ResourceRegistry::new();
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);

        assert!(registry.is_empty());
        let err = registry
            .decode(json!({"resourceType": "Patient"}), &mut ctx)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownResourceType);
    }

    #[test]
    fn test_register_with_custom_factory() {
        let mut registry = ResourceRegistry::new();
        registry.register_with("Patient", |value, ctx| {
            let mut patient = decode_resource::<Patient>(value, ctx)?;
            patient.base.id = Some("overridden".to_string());
            Ok(AnyResource::new(patient))
        });
        let options = DecodeOptions::default();
        let mut ctx = DecodeContext::new(&registry, &options);

        let resource = registry
            .decode(json!({"resourceType": "Patient", "id": "p1"}), &mut ctx)
            .unwrap();
        assert_eq!(resource.id(), Some("overridden"));
    }
}
