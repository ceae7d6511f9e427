//! Safe coercion and invocation helpers over a dynamic value model.
//!
//! - `coerce`: keep a value if its runtime type matches, else substitute
//!   the type's canonical default.
//! - `invoke`: call a value if it is callable, else treat it as identity.
//! - `path_invoke`: call a function found at a flat key path inside a
//!   container, degrading to a logged no-op on any misuse.
//! - `text`: end-quote stripping and status-code parsing.
pub mod coerce;
pub mod error;
pub mod invoke;
pub mod kind;
pub mod path;
pub mod path_de;
pub mod path_invoke;
pub mod text;
pub mod value;

pub use coerce::{
    coerce, coerce_array, coerce_boolean, coerce_checked, coerce_function, coerce_null,
    coerce_number, coerce_object, coerce_regular_expression, coerce_string, coerce_to,
    coerce_undefined, coercer, default_for, Coerced,
};
pub use error::{Error, Result};
pub use invoke::{safe_invoke, Candidate};
pub use kind::{classify, TypeName};
pub use path::{Key, Path};
pub use path_invoke::{path_invoke, try_path_invoke, PathInvoker};
pub use text::{parse_status_code, parse_status_code_str, strip_end_quotes};
pub use value::{Function, Map, Value};
