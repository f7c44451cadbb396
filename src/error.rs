//! Error types for the minirv compiler

use thiserror::Error;

/// Compiler errors
///
/// Every backend error is fatal: the pipeline aborts the current compilation
/// and no assembly is produced. Diagnostics carry the offending instruction
/// index and/or variable name where one exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Lexical errors
    /// Unexpected character in the source text
    ///
    /// **Triggered by:** any character outside the toy language's alphabet
    /// **Example:** `int x; x = 1 @ 2;`
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where the error occurred (1-indexed)
        line: usize,
        /// Column number where the error occurred (1-indexed)
        col: usize,
        /// Error description
        message: String,
    },

    // Parse errors
    /// Unexpected token encountered during parsing
    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        /// Expected token description
        expected: String,
        /// Actual token received
        got: String,
    },

    /// Unexpected end of file during parsing
    #[error("Unexpected end of file")]
    UnexpectedEof,

    // Semantic errors
    /// Use or assignment of a variable that was never declared
    ///
    /// **Triggered by:** referencing an identifier with no prior `int` declaration
    /// **Example:** `x = 1;` without `int x;`
    #[error("Undeclared variable: {name}")]
    UndeclaredVariable {
        /// Variable name
        name: String,
    },

    /// A variable declared more than once
    #[error("Duplicate declaration of variable: {name}")]
    DuplicateDeclaration {
        /// Variable name
        name: String,
    },

    // Backend errors
    /// The IR list is not a well-formed straight-line procedure
    ///
    /// **Triggered by:** an empty instruction list, or a list with no
    /// terminating return
    #[error("Malformed program: {reason}")]
    MalformedProgram {
        /// What made the program ill-formed
        reason: String,
    },

    /// The legalizer has no lowering rule for an operator/operand-shape pair
    #[error("Unsupported operation at instruction {index}: {operation}")]
    UnsupportedOperation {
        /// Index of the offending instruction
        index: usize,
        /// Description of the operator and operand shapes
        operation: String,
    },

    /// An operand was read before any definition of it was seen
    ///
    /// **Triggered by:** malformed input IR, or a renaming defect
    #[error("Use of undefined variable {name} at instruction {index}")]
    UseOfUndefinedVariable {
        /// Index of the instruction reading the operand
        index: usize,
        /// The undefined variable version
        name: String,
    },

    /// Internal register-allocation bookkeeping inconsistency
    ///
    /// **Triggered by:** releasing a version that is resident nowhere, or an
    /// operand shape the legalizer guarantees cannot reach the emitter
    #[error("Register allocation invariant violated: {message}")]
    AllocationInvariant {
        /// What went wrong
        message: String,
    },

    // I/O
    /// Failed to write the assembly listing
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create an internal allocation-invariant error with a message
    pub fn invariant(msg: impl Into<String>) -> Self {
        Error::AllocationInvariant {
            message: msg.into(),
        }
    }

    /// Create a malformed-program error with a reason
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedProgram {
            reason: reason.into(),
        }
    }
}

/// Result type for minirv operations
pub type Result<T> = std::result::Result<T, Error>;
