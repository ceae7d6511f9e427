//! Safe invocation of values that may or may not be callable.
use crate::value::{Function, Value};

/// A value split at the boundary into "can be called" and "cannot".
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Callable(Function),
    NotCallable(Value),
}

impl From<Value> for Candidate {
    fn from(value: Value) -> Self {
        match value {
            Value::Function(f) => Candidate::Callable(f),
            other => Candidate::NotCallable(other),
        }
    }
}

impl From<Function> for Candidate {
    fn from(f: Function) -> Self {
        Candidate::Callable(f)
    }
}

impl Candidate {
    /// The callable itself, or identity when there is nothing to call.
    pub fn into_function(self) -> Function {
        match self {
            Candidate::Callable(f) => f,
            Candidate::NotCallable(other) => {
                tracing::debug!(value = %other, "not callable, using identity");
                Function::identity()
            }
        }
    }
}

/// `safe_invoke(x).call(args)` is `x(args)` when `x` is callable and
/// `args[0]` (or `Undefined`) otherwise.
pub fn safe_invoke(candidate: impl Into<Candidate>) -> Function {
    candidate.into().into_function()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add() -> Function {
        Function::new("add", |args| {
            Value::Number(args.iter().filter_map(Value::as_f64).sum())
        })
    }

    #[test]
    fn callable_is_invoked_with_all_arguments() {
        let f = safe_invoke(Value::Function(add()));
        assert_eq!(f.call(&[1.into(), 2.into()]), Value::Number(3.0));
        assert_eq!(f.call(&[3.into(), 2.into()]), Value::Number(5.0));
    }

    #[test]
    fn non_callable_falls_back_to_identity() {
        for v in [Value::Null, Value::from("f"), Value::from(json!({"call": 1}))] {
            let f = safe_invoke(v);
            assert_eq!(f.call(&["x".into(), "y".into()]), Value::from("x"));
            assert_eq!(f.call(&[]), Value::Undefined);
        }
    }

    #[test]
    fn candidate_splits_at_boundary() {
        assert!(matches!(Candidate::from(Value::Function(add())), Candidate::Callable(_)));
        assert_eq!(
            Candidate::from(Value::Number(1.0)),
            Candidate::NotCallable(Value::Number(1.0))
        );
        let f = add();
        assert_eq!(safe_invoke(f.clone()), f);
        assert_eq!(safe_invoke(Value::from("not a function")), Function::identity());
    }
}
