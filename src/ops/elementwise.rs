use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba;
use crate::foundation::error::{RasterError, RasterResult};

/// Component-wise binary operator between two colors.
///
/// Results are not clamped here; region operations clamp once after applying the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementwiseOp {
    /// `a * b`
    Multiply,
    /// `a / b` with IEEE semantics for zero divisors.
    Divide,
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
}

impl ElementwiseOp {
    /// Apply the operator to every channel.
    pub fn apply(self, a: Rgba, b: Rgba) -> Rgba {
        let f = |x: f64, y: f64| match self {
            Self::Multiply => x * y,
            Self::Divide => x / y,
            Self::Add => x + y,
            Self::Subtract => x - y,
        };
        Rgba::new(f(a.r, b.r), f(a.g, b.g), f(a.b, b.b), f(a.a, b.a))
    }

    /// Method name of the operator.
    pub fn name(self) -> &'static str {
        match self {
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Add => "add",
            Self::Subtract => "subtract",
        }
    }

    /// Parse a method name.
    pub fn from_name(name: &str) -> RasterResult<Self> {
        match name {
            "multiply" => Ok(Self::Multiply),
            "divide" => Ok(Self::Divide),
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            other => Err(RasterError::validation(format!(
                "unknown elementwise op \"{other}\" (expected multiply, divide, add or subtract)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/elementwise.rs"]
mod tests;
