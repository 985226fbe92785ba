use super::{
    json_kind, ChoiceType, DecodeContext, ExtensionBag, FhirType, Primitive, PrimitiveValue,
};
use crate::datatypes::{Meta, Narrative};
use crate::element::{BackboneElement, Element, Extension};
use crate::error::{DecodeError, Result};
use crate::resource::{AnyResource, DomainResource, ResourceBase};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Field-by-field reader over one JSON object.
///
/// Every key a typed structure asks for is recorded as known; whatever is
/// left when the reader is finished goes into the structure's
/// [`ExtensionBag`]. The `finish_*` methods read the base element fields and
/// consume the reader, so they go last in a struct literal:
///
/// ```rust,ignore
/// Ok(Period {
///     start: r.primitive("start")?,
///     end: r.primitive("end")?,
///     base: r.finish_element()?,
/// })
/// ```
pub struct ObjectReader<'a, 'r> {
    ctx: &'a mut DecodeContext<'r>,
    fields: Map<String, Value>,
    known: HashSet<String>,
}

impl<'a, 'r> ObjectReader<'a, 'r> {
    pub fn new(value: Value, ctx: &'a mut DecodeContext<'r>) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                ctx,
                fields,
                known: HashSet::new(),
            }),
            other => Err(ctx.type_mismatch("object", &other)),
        }
    }

    pub fn context(&mut self) -> &mut DecodeContext<'r> {
        self.ctx
    }

    /// Whether `key` holds a non-null value
    pub fn has(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|v| !v.is_null())
    }

    /// Take the raw value of `key`, marking it known. Null counts as absent.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.known.insert(key.to_string());
        match self.fields.get_mut(key) {
            Some(value) if !value.is_null() => Some(value.take()),
            _ => None,
        }
    }

    fn mismatch(&self, key: &str, expected: &str, found: &Value) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.ctx.path_with(key),
            expected: expected.to_string(),
            found: json_kind(found).to_string(),
        }
    }

    fn missing(&self, key: &str) -> DecodeError {
        DecodeError::MissingRequiredField {
            path: self.ctx.path_with(key),
        }
    }

    pub fn optional<T: FhirType>(&mut self, key: &str) -> Result<Option<T>> {
        match self.take(key) {
            Some(value) => self.ctx.scoped(key, |ctx| T::decode(value, ctx)).map(Some),
            None => Ok(None),
        }
    }

    pub fn required<T: FhirType>(&mut self, key: &str) -> Result<T> {
        match self.optional(key)? {
            Some(value) => Ok(value),
            None => Err(self.missing(key)),
        }
    }

    /// A repeating element; absent decodes to an empty vector
    pub fn list<T: FhirType>(&mut self, key: &str) -> Result<Vec<T>> {
        let Some(value) = self.take(key) else {
            return Ok(Vec::new());
        };
        self.ctx.scoped(key, |ctx| {
            let items = match value {
                Value::Array(items) => items,
                other => return Err(ctx.type_mismatch("array", &other)),
            };
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| ctx.scoped(format!("[{i}]"), |ctx| T::decode(item, ctx)))
                .collect()
        })
    }

    /// A repeating element with a minimum cardinality of one
    pub fn required_list<T: FhirType>(&mut self, key: &str) -> Result<Vec<T>> {
        let items = self.list(key)?;
        if items.is_empty() {
            return Err(self.missing(key));
        }
        Ok(items)
    }

    /// A primitive together with its `_key` sibling
    pub fn primitive<T: PrimitiveValue>(&mut self, key: &str) -> Result<Option<Primitive<T>>> {
        let meta_key = format!("_{key}");
        let value = self.take(key);
        let element = self.take(&meta_key);
        if value.is_none() && element.is_none() {
            return Ok(None);
        }
        let value = match value {
            Some(v) => Some(self.ctx.scoped(key, |ctx| T::decode_primitive(v, ctx))?),
            None => None,
        };
        let element = match element {
            Some(e) => Some(self.ctx.scoped(meta_key, |ctx| Element::decode(e, ctx))?),
            None => None,
        };
        Ok(Some(Primitive { value, element }))
    }

    /// A mandatory primitive; a value-less primitive that carries extensions
    /// satisfies the requirement
    pub fn required_primitive<T: PrimitiveValue>(&mut self, key: &str) -> Result<Primitive<T>> {
        match self.primitive(key)? {
            Some(p) => Ok(p),
            None => Err(self.missing(key)),
        }
    }

    /// A repeating primitive. The `_key` array is aligned with the `key`
    /// array by position; `null` in either marks a missing half. A position
    /// where both halves are null carries nothing and is dropped.
    pub fn primitive_list<T: PrimitiveValue>(&mut self, key: &str) -> Result<Vec<Primitive<T>>> {
        let meta_key = format!("_{key}");
        let values = self.take(key);
        let elements = self.take(&meta_key);

        let values = match values {
            None => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.mismatch(key, "array", &other)),
        };
        let elements = match elements {
            None => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.mismatch(&meta_key, "array", &other)),
        };

        let len = values.len().max(elements.len());
        let mut values = values.into_iter();
        let mut elements = elements.into_iter();
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let value = values.next().filter(|v| !v.is_null());
            let element = elements.next().filter(|v| !v.is_null());
            if value.is_none() && element.is_none() {
                continue;
            }
            let index = format!("[{i}]");
            let value = match value {
                Some(v) => Some(self.ctx.scoped(key, |ctx| {
                    ctx.scoped(index.clone(), |ctx| T::decode_primitive(v, ctx))
                })?),
                None => None,
            };
            let element = match element {
                Some(e) => Some(self.ctx.scoped(meta_key.clone(), |ctx| {
                    ctx.scoped(index.clone(), |ctx| Element::decode(e, ctx))
                })?),
                None => None,
            };
            out.push(Primitive { value, element });
        }
        Ok(out)
    }

    /// Decode the choice group `prefix[x]`.
    ///
    /// Fails with `ChoiceConflict` when more than one type suffix is
    /// populated; a `_prefixType` sibling alone marks its variant present.
    pub fn choice<C: ChoiceType>(&mut self, prefix: &str) -> Result<Option<C>> {
        let mut present: Vec<(&'static str, String)> = Vec::new();
        let mut conflicting_keys = Vec::new();

        for suffix in C::SUFFIXES {
            let key = format!("{prefix}{}", suffix.name);
            let meta_key = format!("_{key}");
            let has_value = self.has(&key);
            let has_meta = suffix.primitive && self.has(&meta_key);

            self.known.insert(key.clone());
            if suffix.primitive {
                self.known.insert(meta_key.clone());
            }

            if has_value || has_meta {
                conflicting_keys.push(if has_value { key.clone() } else { meta_key });
                present.push((suffix.name, key));
            }
        }

        match present.len() {
            0 => Ok(None),
            1 => {
                let (suffix, key) = present.remove(0);
                let value = self.take(&key);
                let primitive = C::SUFFIXES
                    .iter()
                    .any(|s| s.name == suffix && s.primitive);
                let element = if primitive {
                    self.take(&format!("_{key}"))
                } else {
                    None
                };
                self.ctx
                    .scoped(key, |ctx| C::decode_variant(suffix, value, element, ctx))
                    .map(Some)
            }
            _ => Err(DecodeError::ChoiceConflict {
                path: self.ctx.path_with(&format!("{prefix}[x]")),
                keys: conflicting_keys,
            }),
        }
    }

    /// A choice group with a minimum cardinality of one
    pub fn required_choice<C: ChoiceType>(&mut self, prefix: &str) -> Result<C> {
        match self.choice(prefix)? {
            Some(choice) => Ok(choice),
            None => Err(self.missing(&format!("{prefix}[x]"))),
        }
    }

    /// Keys not consumed so far
    pub fn finish(mut self) -> ExtensionBag {
        let fields = std::mem::take(&mut self.fields);
        ExtensionBag::capture(fields, &self.known)
    }

    /// Read `id` and `extension`, then capture the rest
    pub fn finish_element(mut self) -> Result<Element> {
        let id = self.optional("id")?;
        let extension = self.list::<Extension>("extension")?;
        Ok(Element {
            id,
            extension,
            unmodeled: self.finish(),
        })
    }

    /// Read `id`, `extension` and `modifierExtension`, then capture the rest
    pub fn finish_backbone(mut self) -> Result<BackboneElement> {
        let id = self.optional("id")?;
        let extension = self.list::<Extension>("extension")?;
        let modifier_extension = self.list::<Extension>("modifierExtension")?;
        Ok(BackboneElement {
            id,
            extension,
            modifier_extension,
            unmodeled: self.finish(),
        })
    }

    /// Read the Resource fields, then capture the rest
    pub fn finish_resource(mut self) -> Result<ResourceBase> {
        let id = self.optional("id")?;
        let meta = self.optional::<Meta>("meta")?;
        let implicit_rules = self.primitive("implicitRules")?;
        let language = self.primitive("language")?;
        Ok(ResourceBase {
            id,
            meta,
            implicit_rules,
            language,
            unmodeled: self.finish(),
        })
    }

    /// Read the DomainResource fields, then capture the rest.
    ///
    /// Contained resources are dispatched through the registry.
    pub fn finish_domain_resource(mut self) -> Result<DomainResource> {
        let id = self.optional("id")?;
        let meta = self.optional::<Meta>("meta")?;
        let implicit_rules = self.primitive("implicitRules")?;
        let language = self.primitive("language")?;
        let text = self.optional::<Narrative>("text")?;
        let contained = self.list::<AnyResource>("contained")?;
        let extension = self.list::<Extension>("extension")?;
        let modifier_extension = self.list::<Extension>("modifierExtension")?;
        Ok(DomainResource {
            id,
            meta,
            implicit_rules,
            language,
            text,
            contained,
            extension,
            modifier_extension,
            unmodeled: self.finish(),
        })
    }
}
