use super::DecodeContext;
use crate::error::{DecodeError, DecodeWarning, Result};
use serde_json::Value;

/// A closed FHIR code list, generated by [`value_set!`](crate::value_set)
pub trait ValueSet: Sized {
    /// Canonical URL of the value set
    const SYSTEM: &'static str;
    /// Every code the value set defines
    const CODES: &'static [&'static str];

    fn from_code(code: &str) -> Option<Self>;
    fn unrecognized(code: String) -> Self;
    fn code(&self) -> &str;
}

/// Decode a code against a closed value set.
///
/// Unknown codes are preserved as `Unrecognized` with a warning; in strict
/// mode they fail with `InvalidCode`.
pub fn decode_code<V: ValueSet>(value: Value, ctx: &mut DecodeContext<'_>) -> Result<V> {
    let code = match value {
        Value::String(code) => code,
        other => return Err(ctx.type_mismatch("code", &other)),
    };
    if let Some(known) = V::from_code(&code) {
        return Ok(known);
    }
    if ctx.options().strict_codes {
        return Err(DecodeError::InvalidCode {
            path: ctx.path(),
            code,
            value_set: V::SYSTEM,
        });
    }
    ctx.warn(DecodeWarning::UnrecognizedCode {
        path: ctx.path(),
        code: code.clone(),
        value_set: V::SYSTEM,
    });
    Ok(V::unrecognized(code))
}
