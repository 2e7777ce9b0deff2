//! Placeholder expression compilation for cukeplan.
//!
//! Step patterns such as `I have {int} items` are lexed into literal and
//! placeholder tokens, compiled into anchored regular expressions with one
//! uniquely named capture group per placeholder, and matched against concrete
//! step text to produce typed [`Value`]s in left-to-right placeholder order.
//!
//! Custom placeholders live in an [`ExpressionRegistry`] owned by the caller,
//! so registrations never leak between unrelated configurations.
//!
//! # Examples
//! ```
//! use cukeplan_patterns::{ExpressionRegistry, Value};
//!
//! let registry = ExpressionRegistry::new();
//! let values = registry
//!     .match_text("I love {string} {number}", r#"I love "Vue" 3"#)
//!     .expect("text matches the expression");
//! assert_eq!(values, vec![Value::from("Vue"), Value::Number(3.0)]);
//! ```

mod capture;
mod errors;
mod kind;
mod pattern;
mod registry;
mod specificity;
mod value;

pub use capture::extract_named_captures;
pub use errors::{ExpressionError, NoMatch};
pub use kind::{BuiltinKind, CustomPlaceholder, Transformer};
pub use pattern::{CompiledPattern, build_regex_from_pattern};
pub use registry::ExpressionRegistry;
pub use specificity::SpecificityScore;
pub use value::Value;
