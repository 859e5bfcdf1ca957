//! Action recording protocol.
//!
//! Handlers are recorded rather than run on the server. A handler sees an
//! [`ActionArgument`] wherever the client will later pass a real argument, and
//! any value can travel together with its source text as an
//! [`ExpressionReference`]. Downstream code matches on [`RecordedValue`]
//! instead of relying on coercion tricks.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// ActionArgument
// ============================================================================

/// Placeholder for "argument N of this handler".
///
/// Serializes as `{"type":"arg","index":N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename = "arg")]
pub struct ActionArgument {
    index: u32,
}

impl ActionArgument {
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    pub const fn index(self) -> u32 {
        self.index
    }

    /// Numeric value seen by accidental arithmetic during recording. Always 0.
    pub const fn to_number(self) -> i64 {
        0
    }

    /// Placeholders for a handler taking `arity` arguments.
    pub fn list(arity: u32) -> Vec<Self> {
        (0..arity).map(Self::new).collect()
    }
}

impl fmt::Display for ActionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{arg:{}}}}}", self.index)
    }
}

impl From<ActionArgument> for i64 {
    fn from(arg: ActionArgument) -> Self {
        arg.to_number()
    }
}

impl From<ActionArgument> for f64 {
    fn from(_: ActionArgument) -> Self {
        0.0
    }
}

// ============================================================================
// ExpressionReference
// ============================================================================

/// A resolved value paired with the source text that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "expr")]
pub struct ExpressionReference {
    value: Value,
    expression: String,
}

impl ExpressionReference {
    /// Pair `value` with `expression`.
    ///
    /// When `is_encoded` is set the expression is expected in transport form
    /// (see [`ExpressionReference::encode`]); if it does not decode to UTF-8
    /// text it is kept verbatim.
    pub fn new(value: impl Into<Value>, expression: impl Into<String>, is_encoded: bool) -> Self {
        let expression = expression.into();
        let expression = if is_encoded {
            decode(&expression).unwrap_or(expression)
        } else {
            expression
        };

        Self {
            value: value.into(),
            expression,
        }
    }

    /// Shorthand for a plain (not encoded) expression.
    pub fn plain(value: impl Into<Value>, expression: impl Into<String>) -> Self {
        Self::new(value, expression, false)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Transport form of an expression source.
    pub fn encode(expression: &str) -> String {
        STANDARD.encode(expression)
    }
}

fn decode(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

// ============================================================================
// RecordedValue
// ============================================================================

/// Anything a recorded handler call can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedValue {
    ArgumentRef(ActionArgument),
    Expression(ExpressionReference),
    Literal(Value),
}

impl RecordedValue {
    /// Value usable on the server, if there is one.
    ///
    /// Argument references resolve only on the client.
    pub fn server_value(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Expression(expr) => Some(expr.value()),
            Self::ArgumentRef(_) => None,
        }
    }
}

impl From<ActionArgument> for RecordedValue {
    fn from(arg: ActionArgument) -> Self {
        Self::ArgumentRef(arg)
    }
}

impl From<ExpressionReference> for RecordedValue {
    fn from(expr: ExpressionReference) -> Self {
        Self::Expression(expr)
    }
}

impl From<Value> for RecordedValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}
