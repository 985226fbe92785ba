use super::{ChoiceType, ExtensionBag, FhirType, Primitive, PrimitiveValue};
use crate::element::{BackboneElement, Element};
use crate::resource::{DomainResource, ResourceBase};
use serde_json::{Map, Value};

/// Builds the JSON object of one typed structure.
///
/// Absent optional fields and empty lists are omitted. Fields are emitted in
/// call order, with the base element fields written by `element`,
/// `backbone`, `resource` or `domain_resource`.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    fields: Map<String, Value>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_type(&mut self, name: &str) {
        self.fields
            .insert("resourceType".to_string(), Value::String(name.to_string()));
    }

    /// Insert an already encoded value
    pub fn raw(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn value<T: FhirType>(&mut self, key: &str, value: &T) {
        self.raw(key, value.encode());
    }

    pub fn optional<T: FhirType>(&mut self, key: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.value(key, value);
        }
    }

    pub fn list<T: FhirType>(&mut self, key: &str, values: &[T]) {
        if !values.is_empty() {
            let items = values.iter().map(FhirType::encode).collect();
            self.raw(key, Value::Array(items));
        }
    }

    pub fn primitive<T: PrimitiveValue>(&mut self, key: &str, value: &Option<Primitive<T>>) {
        if let Some(value) = value {
            self.required_primitive(key, value);
        }
    }

    pub fn required_primitive<T: PrimitiveValue>(&mut self, key: &str, value: &Primitive<T>) {
        let (value, element) = value.encode_parts();
        if let Some(value) = value {
            self.raw(key, value);
        }
        if let Some(element) = element {
            self.raw(&format!("_{key}"), element);
        }
    }

    /// Write a repeating primitive as parallel `key` and `_key` arrays,
    /// padding with `null` so positions line up. Either array is left out
    /// when it would hold nothing but nulls.
    pub fn primitive_list<T: PrimitiveValue>(&mut self, key: &str, values: &[Primitive<T>]) {
        if values.is_empty() {
            return;
        }
        let mut plain = Vec::with_capacity(values.len());
        let mut meta = Vec::with_capacity(values.len());
        for item in values {
            let (value, element) = item.encode_parts();
            plain.push(value.unwrap_or(Value::Null));
            meta.push(element.unwrap_or(Value::Null));
        }
        if plain.iter().any(|v| !v.is_null()) {
            self.raw(key, Value::Array(plain));
        }
        if meta.iter().any(|v| !v.is_null()) {
            self.raw(&format!("_{key}"), Value::Array(meta));
        }
    }

    /// Write the populated variant of `prefix[x]` under its suffixed key
    pub fn choice<C: ChoiceType>(&mut self, prefix: &str, value: &Option<C>) {
        let Some(value) = value else {
            return;
        };
        let key = format!("{prefix}{}", value.suffix());
        let (value, element) = value.encode_variant();
        if let Some(value) = value {
            self.raw(&key, value);
        }
        if let Some(element) = element {
            self.raw(&format!("_{key}"), element);
        }
    }

    pub fn element(&mut self, base: &Element) {
        self.optional("id", &base.id);
        self.list("extension", &base.extension);
    }

    pub fn backbone(&mut self, base: &BackboneElement) {
        self.optional("id", &base.id);
        self.list("extension", &base.extension);
        self.list("modifierExtension", &base.modifier_extension);
    }

    pub fn resource(&mut self, base: &ResourceBase) {
        self.optional("id", &base.id);
        self.optional("meta", &base.meta);
        self.primitive("implicitRules", &base.implicit_rules);
        self.primitive("language", &base.language);
    }

    pub fn domain_resource(&mut self, base: &DomainResource) {
        self.optional("id", &base.id);
        self.optional("meta", &base.meta);
        self.primitive("implicitRules", &base.implicit_rules);
        self.primitive("language", &base.language);
        self.optional("text", &base.text);
        self.list("contained", &base.contained);
        self.list("extension", &base.extension);
        self.list("modifierExtension", &base.modifier_extension);
    }

    /// Append the unmodeled keys and return the finished object
    pub fn finish(mut self, unmodeled: &ExtensionBag) -> Value {
        unmodeled.reemit(&mut self.fields);
        Value::Object(self.fields)
    }
}
