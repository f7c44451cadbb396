//! Parsing for the minirv toy language
//!
//! Parses the token stream into flat three-address IR, maintaining a symbol
//! table for declaration checking along the way. There is no separate AST:
//! expression parsing returns operand values and emits an IR instruction per
//! operator, assigning each intermediate result to a fresh temporary.

mod program_parser;
mod symbol_table;

pub use program_parser::Parser;
pub use symbol_table::SymbolTable;
