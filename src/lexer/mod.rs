//! Lexical analysis for the minirv toy language
//!
//! Converts source text into a stream of tokens.

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};
