//! Type coercion: keep a value when its runtime tag matches the expected
//! type, otherwise substitute the canonical default for that type.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::kind::{classify, TypeName};
use crate::value::{Function, Map, Value};

static MATCH_ANYTHING: Lazy<Regex> =
    Lazy::new(|| Regex::new(".*").expect("static pattern compiles"));

/// Outcome of a coercion, for callers that need to know a substitution
/// happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Kept(Value),
    Replaced { found: TypeName, value: Value },
}

impl Coerced {
    pub fn is_kept(&self) -> bool {
        matches!(self, Coerced::Kept(_))
    }

    pub fn value(&self) -> &Value {
        match self {
            Coerced::Kept(value) | Coerced::Replaced { value, .. } => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Coerced::Kept(value) | Coerced::Replaced { value, .. } => value,
        }
    }
}

pub fn default_for(type_name: TypeName) -> Value {
    match type_name {
        TypeName::Array => Value::Array(Vec::new()),
        TypeName::Boolean => Value::Bool(false),
        TypeName::Function => Value::Function(Function::identity()),
        TypeName::Object => Value::Object(Map::new()),
        TypeName::Null => Value::Null,
        TypeName::Number => Value::Number(0.0),
        TypeName::RegularExpression => Value::Pattern(MATCH_ANYTHING.clone()),
        TypeName::String => Value::String(String::new()),
        TypeName::Undefined => Value::Undefined,
    }
}

/// Coerce against a type given by name. Fails only on an unknown name.
pub fn coerce(type_name: &str, value: Value) -> Result<Value> {
    let expected = type_name.parse::<TypeName>()?;
    Ok(coerce_to(expected, value))
}

pub fn coerce_to(expected: TypeName, value: Value) -> Value {
    coerce_checked(expected, value).into_value()
}

pub fn coerce_checked(expected: TypeName, value: Value) -> Coerced {
    let found = classify(&value);
    if found == expected {
        return Coerced::Kept(value);
    }
    tracing::trace!(%expected, %found, "substituting default");
    Coerced::Replaced { found, value: default_for(expected) }
}

/// Partially applied `coerce_to`.
pub fn coercer(expected: TypeName) -> impl Fn(Value) -> Value + Copy {
    move |value| coerce_to(expected, value)
}

pub fn coerce_array(value: Value) -> Value {
    coerce_to(TypeName::Array, value)
}

pub fn coerce_boolean(value: Value) -> Value {
    coerce_to(TypeName::Boolean, value)
}

pub fn coerce_function(value: Value) -> Value {
    coerce_to(TypeName::Function, value)
}

pub fn coerce_object(value: Value) -> Value {
    coerce_to(TypeName::Object, value)
}

pub fn coerce_null(value: Value) -> Value {
    coerce_to(TypeName::Null, value)
}

pub fn coerce_number(value: Value) -> Value {
    coerce_to(TypeName::Number, value)
}

pub fn coerce_regular_expression(value: Value) -> Value {
    coerce_to(TypeName::RegularExpression, value)
}

pub fn coerce_string(value: Value) -> Value {
    coerce_to(TypeName::String, value)
}

pub fn coerce_undefined(value: Value) -> Value {
    coerce_to(TypeName::Undefined, value)
}
