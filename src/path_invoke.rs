//! Invoke a function found at a path inside a container.
//!
//! Curried: `path_invoke(path).on(&container).call(&args)`. Every misuse
//! degrades to a no-op callable returning `Null` plus one diagnostic line
//! on the `safecall` tracing target; nothing here returns an error unless
//! the caller asks for one through `resolve`.
use crate::error::{Error, Result};
use crate::invoke::safe_invoke;
use crate::path::Path;
use crate::value::{Function, Value};

/// Prefix of every diagnostic line.
pub const DIAGNOSTIC_TAG: &str = "safecall";

#[derive(Debug, Clone)]
pub struct PathInvoker {
    path: Result<Path>,
    path_text: String,
}

/// Prepare a path. A malformed path is reported here, once; the invoker it
/// returns then yields the no-op for every container without further noise.
pub fn path_invoke(path: impl Into<Value>) -> PathInvoker {
    let raw = path.into();
    let invoker = PathInvoker { path: Path::parse(&raw), path_text: raw.to_json_text() };
    if let Err(err) = &invoker.path {
        emit_diagnostic(err);
    }
    invoker
}

/// Structured form of `path_invoke(path).on(container)`: no logging.
pub fn try_path_invoke(container: &Value, path: impl Into<Value>) -> Result<Function> {
    let raw = path.into();
    let invoker = PathInvoker { path: Path::parse(&raw), path_text: raw.to_json_text() };
    invoker.resolve(container)
}

impl PathInvoker {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref().ok()
    }

    pub fn resolve(&self, container: &Value) -> Result<Function> {
        let path = self.path.as_ref().map_err(|err| err.clone())?;
        if !container.is_truthy() {
            return Err(Error::BadObject(container.to_json_text()));
        }
        match path.lookup(container) {
            Some(Value::Function(found)) => Ok(safe_invoke(found.clone())),
            _ => Err(Error::MissingTarget(self.path_text.clone())),
        }
    }

    pub fn on(&self, container: &Value) -> Function {
        match self.resolve(container) {
            Ok(found) => found,
            Err(Error::BadPath(_)) => Function::noop(),
            Err(err) => {
                emit_diagnostic(&err);
                Function::noop()
            }
        }
    }
}

fn emit_diagnostic(err: &Error) {
    tracing::error!(target: "safecall", "{DIAGNOSTIC_TAG} -- {err}");
}
