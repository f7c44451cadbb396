use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

/// All possible token types in the toy language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    IntConst(i32),

    // Identifiers
    /// Identifier (variable name)
    Identifier(String),

    // Keywords
    /// `int` type keyword
    Int,
    /// `return` keyword
    Return,

    // Operators
    /// Assignment operator (=)
    Assign,
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Star,
    /// Slash operator (/)
    Slash,

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,

    // Special
    /// End of file marker
    Eof,
}

impl TokenKind {
    /// Get keyword kind from an identifier spelling, if it is one
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "int" => Some(TokenKind::Int),
            "return" => Some(TokenKind::Return),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::IntConst(n) => write!(f, "{}", n),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Int => write!(f, "int"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Eof => write!(f, "<eof>"),
        }
    }
}
