//! # minirv - A Toy-Language Compiler Targeting RV32 Assembly
//!
//! Compiles a straight-line arithmetic toy language to RV32-style assembly
//! text. The source language has integer variables, `+`/`-`/`*` expressions,
//! and a single `return`:
//!
//! ```text
//! int a;
//! int b;
//! a = 5;
//! b = a * 2 + 3;
//! return b - 1;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source → Scanner → Tokens → Parser → IR
//!        → Legalize → Rename → Liveness → RegAlloc + Emit → Assembly
//! ```
//!
//! The backend allocates a file of seven scratch registers (`t0..t6`) with
//! least-recently-used spilling to a stack area, and places the return value
//! in `a0`.
//!
//! ## Usage
//!
//! ```rust
//! use minirv::compile;
//!
//! # fn main() -> minirv::Result<()> {
//! let asm = compile("return 2 + 3;")?;
//! assert_eq!(asm, vec!["LI t0, 5", "MV a0, t0"]);
//! # Ok(())
//! # }
//! ```
//!
//! IR can also be built directly and lowered with
//! [`AssemblyGenerator`](codegen::AssemblyGenerator):
//!
//! ```rust
//! use minirv::codegen::AssemblyGenerator;
//! use minirv::ir::{Instruction, IrValue};
//!
//! # fn main() -> minirv::Result<()> {
//! let mut generator = AssemblyGenerator::new();
//! generator.load(vec![Instruction::ret(IrValue::Immediate(7))])?;
//! generator.generate()?;
//! assert_eq!(generator.assembly(), ["LI a0, 7"]);
//! # Ok(())
//! # }
//! ```

/// Version of the minirv compiler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod codegen;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;

// Re-export main types
pub use codegen::AssemblyGenerator;
pub use error::{Error, Result};
pub use ir::{BinOp, Instruction, IrValue};
pub use lexer::{Scanner, Token, TokenKind};
pub use parser::{Parser, SymbolTable};

/// Compile toy-language source text to assembly lines
///
/// Runs the whole pipeline: scan, parse, legalize, rename, liveness,
/// allocate, emit. Any error aborts the compilation with no partial output.
pub fn compile(source: &str) -> Result<Vec<String>> {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens()?;

    let mut parser = Parser::new(tokens);
    let ir = parser.parse()?;

    let mut generator = AssemblyGenerator::new();
    generator.load(ir)?;
    generator.generate()?;
    Ok(generator.assembly().to_vec())
}
