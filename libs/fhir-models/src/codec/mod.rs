//! JSON codec core
//!
//! Everything a typed FHIR structure needs to read itself from, and write
//! itself to, the FHIR JSON representation:
//!
//! - [`ObjectReader`] / [`ObjectWriter`]: field-by-field access to a JSON
//!   object, including `_field` primitive metadata and `value[x]` choices
//! - [`Primitive`]: a primitive value plus its optional `_field` element
//! - [`ChoiceType`]: closed sum types for choice elements
//! - [`ExtensionBag`]: keys an object does not model, preserved verbatim
//! - [`RawComplex`]: a legal complex choice payload kept as plain JSON
//! - [`ValueSet`]: closed code lists with lenient/strict handling
//! - [`FhirJsonCodec`]: the entry point, holding a registry and options

mod bag;
mod choice;
mod primitive;
mod raw;
mod reader;
mod value_set;
mod writer;

pub use bag::ExtensionBag;
pub use choice::{decode_complex_variant, ChoiceSuffix, ChoiceType, ChoiceVariant};
pub(crate) use choice::complex_choice_variant;
pub use primitive::{Primitive, PrimitiveValue};
pub use raw::RawComplex;
pub use reader::ObjectReader;
pub use value_set::{decode_code, ValueSet};
pub use writer::ObjectWriter;

pub use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeWarning, Result};
use crate::registry::ResourceRegistry;
use crate::resource::{decode_resource, AnyResource, Resource, TypedResource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A type with a FHIR JSON representation.
///
/// Implemented by complex datatypes, backbone elements, resources wrapped in
/// [`AnyResource`], and the handful of plain strings FHIR does not allow to
/// carry extensions (`Element.id`, `Extension.url`, `Narrative.div`).
pub trait FhirType: Sized {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self>;
    fn encode(&self) -> Value;
}

impl FhirType for String {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ctx.type_mismatch("string", &other)),
        }
    }

    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: FhirType> FhirType for Box<T> {
    fn decode(value: Value, ctx: &mut DecodeContext<'_>) -> Result<Self> {
        T::decode(value, ctx).map(Box::new)
    }

    fn encode(&self) -> Value {
        self.as_ref().encode()
    }
}

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Reject codes outside a closed value set instead of warning
    pub strict_codes: bool,
    /// Maximum nesting depth of objects and arrays
    pub max_depth: usize,
    /// Maximum size of a raw JSON document
    pub max_document_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_codes: false,
            max_depth: 64,
            max_document_bytes: 16 * 1024 * 1024,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            strict_codes: true,
            ..Self::default()
        }
    }

    pub fn with_strict_codes(mut self, strict: bool) -> Self {
        self.strict_codes = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_document_bytes(mut self, max_document_bytes: usize) -> Self {
        self.max_document_bytes = max_document_bytes;
        self
    }
}

/// Per-call decode state: registry, options, current element path and the
/// warnings collected so far.
#[derive(Debug)]
pub struct DecodeContext<'r> {
    registry: &'r ResourceRegistry,
    options: &'r DecodeOptions,
    path: Vec<String>,
    warnings: Vec<DecodeWarning>,
}

impl<'r> DecodeContext<'r> {
    pub fn new(registry: &'r ResourceRegistry, options: &'r DecodeOptions) -> Self {
        Self {
            registry,
            options,
            path: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'r ResourceRegistry {
        self.registry
    }

    pub fn options(&self) -> &'r DecodeOptions {
        self.options
    }

    /// Current element path, e.g. `Patient.name[0].given`
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            push_segment(&mut out, segment);
        }
        out
    }

    /// Path of a child of the current element
    pub fn path_with(&self, segment: &str) -> String {
        let mut out = self.path();
        push_segment(&mut out, segment);
        out
    }

    /// Run `f` one level deeper in the element tree.
    ///
    /// The segment is popped again whether or not `f` succeeds, so a caller
    /// that recovers from an error keeps a consistent path.
    pub fn scoped<T>(
        &mut self,
        segment: impl Into<String>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment.into());
        let result = if self.path.len() > self.options.max_depth {
            Err(DecodeError::DepthLimitExceeded {
                path: self.path(),
                limit: self.options.max_depth,
            })
        } else {
            f(self)
        };
        self.path.pop();
        result
    }

    pub fn warn(&mut self, warning: DecodeWarning) {
        tracing::warn!(path = %warning.path(), "{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<DecodeWarning> {
        self.warnings
    }

    /// Number of warnings recorded so far, for use with
    /// [`truncate_warnings`](Self::truncate_warnings)
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Drop warnings recorded after `mark`
    pub fn truncate_warnings(&mut self, mark: usize) {
        self.warnings.truncate(mark);
    }

    /// Build a `TypeMismatch` for the current path
    pub fn type_mismatch(&self, expected: impl Into<String>, found: &Value) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.path(),
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }
}

fn push_segment(out: &mut String, segment: &str) {
    if !out.is_empty() && !segment.starts_with('[') {
        out.push('.');
    }
    out.push_str(segment);
}

/// JSON type name of a value, as used in diagnostics
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A decoded value together with the warnings raised while decoding it
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<DecodeWarning>,
}

impl<T> Decoded<T> {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// FHIR JSON decoder/encoder bound to one registry and one set of options.
///
/// Cheap to clone; codecs with different options can share a registry.
///
/// # Example
///
/// ```rust
/// use ferrum_models::{FhirJsonCodec, Observation, ObservationStatus};
///
/// let codec = FhirJsonCodec::r4();
/// let decoded = codec
///     .decode_str_as::<Observation>(
///         r#"{"resourceType":"Observation","status":"final","code":{"text":"x"}}"#,
///     )
///     .unwrap();
///
/// let obs = decoded.value;
/// assert_eq!(obs.status.value, Some(ObservationStatus::Final));
/// assert_eq!(obs.code.text.as_ref().and_then(|t| t.value.as_deref()), Some("x"));
/// ```
#[derive(Debug, Clone)]
pub struct FhirJsonCodec {
    registry: Arc<ResourceRegistry>,
    options: DecodeOptions,
}

impl FhirJsonCodec {
    pub fn new(registry: Arc<ResourceRegistry>) -> Self {
        Self {
            registry,
            options: DecodeOptions::default(),
        }
    }

    /// Codec over every resource type defined in this crate
    pub fn r4() -> Self {
        Self::new(Arc::new(ResourceRegistry::r4()))
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Parse raw input into a JSON tree, enforcing the document size limit
    pub fn parse(&self, input: &[u8]) -> Result<Value> {
        if input.len() > self.options.max_document_bytes {
            return Err(DecodeError::DocumentTooLarge {
                size: input.len(),
                limit: self.options.max_document_bytes,
            });
        }
        Ok(serde_json::from_slice(input)?)
    }

    /// Decode any registered resource from a JSON string
    pub fn decode_str(&self, input: &str) -> Result<Decoded<AnyResource>> {
        self.decode_value(self.parse(input.as_bytes())?)
    }

    pub fn decode_slice(&self, input: &[u8]) -> Result<Decoded<AnyResource>> {
        self.decode_value(self.parse(input)?)
    }

    /// Decode any registered resource, dispatching on `resourceType`
    pub fn decode_value(&self, value: Value) -> Result<Decoded<AnyResource>> {
        let mut ctx = DecodeContext::new(&self.registry, &self.options);
        let registry = ctx.registry();
        let root = value
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or("Resource")
            .to_string();
        let resource = ctx.scoped(root, |ctx| registry.decode(value, ctx))?;
        Ok(Decoded {
            value: resource,
            warnings: ctx.into_warnings(),
        })
    }

    /// Decode a resource of a statically known type
    pub fn decode_str_as<T: TypedResource>(&self, input: &str) -> Result<Decoded<T>> {
        self.decode_value_as(self.parse(input.as_bytes())?)
    }

    pub fn decode_value_as<T: TypedResource>(&self, value: Value) -> Result<Decoded<T>> {
        let mut ctx = DecodeContext::new(&self.registry, &self.options);
        let resource = ctx.scoped(T::RESOURCE_TYPE, |ctx| decode_resource::<T>(value, ctx))?;
        Ok(Decoded {
            value: resource,
            warnings: ctx.into_warnings(),
        })
    }

    pub fn encode_value(&self, resource: &dyn Resource) -> Value {
        resource.to_value()
    }

    pub fn encode_string(&self, resource: &dyn Resource) -> String {
        resource.to_value().to_string()
    }

    pub fn encode_string_pretty(&self, resource: &dyn Resource) -> String {
        format!("{:#}", resource.to_value())
    }
}
