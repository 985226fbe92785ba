//! Declarative macros for the two generated shapes in the model: choice
//! elements and closed value sets.

/// Define a choice element as a closed enum.
///
/// Each variant name is the JSON type suffix, so `DateTime(Primitive<String>)`
/// inside a group read with prefix `onset` maps to the `onsetDateTime` key
/// (and its `_onsetDateTime` sibling).
///
/// ```rust
/// use ferrum_models::{choice_type, Primitive, Quantity};
///
/// choice_type! {
///     /// Dose given as a number or as a quantity
///     pub enum Dose {
///         Integer(Primitive<i32>),
///         Quantity(Quantity),
///     }
/// }
/// ```
#[macro_export]
macro_rules! choice_type {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        impl $crate::codec::ChoiceType for $name {
            const SUFFIXES: &'static [$crate::codec::ChoiceSuffix] = &[
                $(
                    $crate::codec::ChoiceSuffix {
                        name: stringify!($variant),
                        primitive: <$ty as $crate::codec::ChoiceVariant>::IS_PRIMITIVE,
                    },
                )+
            ];

            fn decode_variant(
                suffix: &str,
                value: Option<$crate::codec::Value>,
                element: Option<$crate::codec::Value>,
                ctx: &mut $crate::codec::DecodeContext<'_>,
            ) -> $crate::Result<Self> {
                $(
                    if suffix == stringify!($variant) {
                        return <$ty as $crate::codec::ChoiceVariant>::decode_variant(value, element, ctx)
                            .map($name::$variant);
                    }
                )+
                Err($crate::DecodeError::TypeMismatch {
                    path: ctx.path(),
                    expected: stringify!($name).to_string(),
                    found: suffix.to_string(),
                })
            }

            fn suffix(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => stringify!($variant), )+
                }
            }

            fn encode_variant(&self) -> (Option<$crate::codec::Value>, Option<$crate::codec::Value>) {
                match self {
                    $( $name::$variant(v) => $crate::codec::ChoiceVariant::encode_variant(v), )+
                }
            }
        }
    };
}

/// Define a closed code list bound to a FHIR value set.
///
/// Codes outside the list decode to `Unrecognized(code)` with a warning, or
/// fail with `InvalidCode` when strict decoding is enabled.
///
/// ```rust
/// use ferrum_models::{value_set, ValueSet};
///
/// value_set! {
///     /// Traffic light
///     pub enum Light("http://example.org/ValueSet/light") {
///         Red = "red",
///         Green = "green",
///     }
/// }
///
/// assert_eq!(Light::from_code("red"), Some(Light::Red));
/// assert_eq!(Light::Unrecognized("blue".into()).code(), "blue");
/// ```
#[macro_export]
macro_rules! value_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($system:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A code this value set does not define, kept verbatim
            Unrecognized(String),
        }

        impl $crate::codec::ValueSet for $name {
            const SYSTEM: &'static str = $system;
            const CODES: &'static [&'static str] = &[$($code),+];

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn unrecognized(code: String) -> Self {
                $name::Unrecognized(code)
            }

            fn code(&self) -> &str {
                match self {
                    $( $name::$variant => $code, )+
                    $name::Unrecognized(code) => code.as_str(),
                }
            }
        }

        impl $crate::codec::PrimitiveValue for $name {
            const EXPECTED: &'static str = "code";

            fn decode_primitive(
                value: $crate::codec::Value,
                ctx: &mut $crate::codec::DecodeContext<'_>,
            ) -> $crate::Result<Self> {
                $crate::codec::decode_code(value, ctx)
            }

            fn encode_primitive(&self) -> $crate::codec::Value {
                $crate::codec::Value::String($crate::codec::ValueSet::code(self).to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::codec::ValueSet::code(self))
            }
        }
    };
}
