//! Error types for the formula engine.
//!
//! Most failure modes in this engine are deliberately recoverable and
//! never surface as errors: unresolvable references substitute a
//! neutral default, broken property paths resolve to nothing, and
//! malformed dice terms are left as literal text. Only arithmetic
//! parsing and simulation parameter validation can fail hard, and even
//! those are scoped to the single formula or run being processed.

/// Errors that can occur during formula evaluation or simulation.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    /// The arithmetic expression contains a character outside the
    /// allowed set (`+ - * / ( )`, digits, decimal point).
    #[error("unexpected character in formula at byte {0}")]
    UnexpectedCharacter(usize),

    /// A token appeared where the arithmetic grammar does not allow it.
    #[error("unexpected token in formula: {0}")]
    UnexpectedToken(String),

    /// The arithmetic expression ended mid-parse.
    #[error("formula ended unexpectedly")]
    UnexpectedEnd,

    /// Simulation parameters violate their invariants.
    #[error("invalid simulation parameters: {0}")]
    InvalidSimulation(String),
}

/// Convenience result type for formula operations.
pub type FormulaResult<T> = Result<T, FormulaError>;
