//! Runtime type tags and the classifier that assigns them.
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeName {
    Array,
    Boolean,
    Function,
    Object,
    Null,
    Number,
    RegularExpression,
    String,
    Undefined,
}

impl TypeName {
    pub const ALL: [TypeName; 9] = [
        TypeName::Array,
        TypeName::Boolean,
        TypeName::Function,
        TypeName::Object,
        TypeName::Null,
        TypeName::Number,
        TypeName::RegularExpression,
        TypeName::String,
        TypeName::Undefined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Array => "Array",
            TypeName::Boolean => "Boolean",
            TypeName::Function => "Function",
            TypeName::Object => "Object",
            TypeName::Null => "Null",
            TypeName::Number => "Number",
            TypeName::RegularExpression => "RegularExpression",
            TypeName::String => "String",
            TypeName::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the first character is case-folded: `"number"` parses, `"NUMBER"`
/// does not. `RegExp` is accepted next to `RegularExpression`.
impl FromStr for TypeName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match capitalize_first(name).as_str() {
            "Array" => Ok(TypeName::Array),
            "Boolean" => Ok(TypeName::Boolean),
            "Function" => Ok(TypeName::Function),
            "Object" => Ok(TypeName::Object),
            "Null" => Ok(TypeName::Null),
            "Number" => Ok(TypeName::Number),
            "RegExp" | "RegularExpression" => Ok(TypeName::RegularExpression),
            "String" => Ok(TypeName::String),
            "Undefined" => Ok(TypeName::Undefined),
            _ => Err(Error::InvalidTypeName(name.to_string())),
        }
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Runtime tag of `value`.
///
/// Checked in a fixed order: absent, null, sequence, boolean, callable,
/// pattern, numeric, textual, mapping. `NaN` is still a `Number`.
pub fn classify(value: &Value) -> TypeName {
    match value {
        Value::Undefined => TypeName::Undefined,
        Value::Null => TypeName::Null,
        Value::Array(_) => TypeName::Array,
        Value::Bool(_) => TypeName::Boolean,
        Value::Function(_) => TypeName::Function,
        Value::Pattern(_) => TypeName::RegularExpression,
        Value::Number(_) => TypeName::Number,
        Value::String(_) => TypeName::String,
        Value::Object(_) => TypeName::Object,
    }
}
