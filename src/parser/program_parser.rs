use super::symbol_table::SymbolTable;
use crate::error::{Error, Result};
use crate::ir::{BinOp, Instruction, IrValue};
use crate::lexer::{Token, TokenKind};

/// Recursive-descent parser emitting three-address IR
///
/// Grammar (straight-line; every statement ends in a semicolon):
///
/// ```text
/// program := { stmt } EOF
/// stmt    := "int" Identifier ";"
///          | Identifier "=" expr ";"
///          | "return" expr ";"
/// expr    := term { ("+" | "-") term }
/// term    := factor { "*" factor }
/// factor  := "(" expr ")" | Identifier | IntConst
/// ```
///
/// Each binary operator yields one IR instruction whose destination is a
/// fresh temporary (`$0`, `$1`, ...). `$` is not a legal identifier
/// character, so temporaries can never collide with source names.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    symbols: SymbolTable,
    instructions: Vec<Instruction>,
    next_temp: u32,
}

impl Parser {
    /// Creates a new parser over a token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            current: 0,
            symbols: SymbolTable::new(),
            instructions: Vec::new(),
            next_temp: 0,
        }
    }

    /// Parses the whole program, returning the emitted IR
    pub fn parse(&mut self) -> Result<Vec<Instruction>> {
        while !self.check(&TokenKind::Eof) {
            self.parse_statement()?;
        }
        Ok(std::mem::take(&mut self.instructions))
    }

    /// The symbol table populated during parsing
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn parse_statement(&mut self) -> Result<()> {
        match self.peek().kind.clone() {
            TokenKind::Int => {
                self.advance();
                let name = self.consume_identifier()?;
                self.symbols.declare(&name)?;
                self.consume(&TokenKind::Semicolon)?;
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.symbols.check_declared(&name)?;
                self.consume(&TokenKind::Assign)?;
                let value = self.parse_expr()?;
                self.consume(&TokenKind::Semicolon)?;
                self.instructions.push(Instruction::mov(name, value));
            }
            TokenKind::Return => {
                self.advance();
                let value = self.parse_expr()?;
                self.consume(&TokenKind::Semicolon)?;
                self.instructions.push(Instruction::ret(value));
            }
            TokenKind::Eof => return Err(Error::UnexpectedEof),
            other => {
                return Err(Error::UnexpectedToken {
                    expected: "statement (declaration, assignment, or return)".to_string(),
                    got: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<IrValue> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = self.emit_binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<IrValue> {
        let mut lhs = self.parse_factor()?;
        while self.check(&TokenKind::Star) {
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = self.emit_binary(BinOp::Mul, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<IrValue> {
        match self.peek().kind.clone() {
            TokenKind::LeftParen => {
                self.advance();
                let value = self.parse_expr()?;
                self.consume(&TokenKind::RightParen)?;
                Ok(value)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.symbols.check_declared(&name)?;
                Ok(IrValue::Variable(name))
            }
            TokenKind::IntConst(v) => {
                self.advance();
                Ok(IrValue::Immediate(v))
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            other => Err(Error::UnexpectedToken {
                expected: "expression".to_string(),
                got: other.to_string(),
            }),
        }
    }

    /// Emit a binary instruction into a fresh temporary, returning it
    fn emit_binary(&mut self, op: BinOp, lhs: IrValue, rhs: IrValue) -> IrValue {
        let dst = format!("${}", self.next_temp);
        self.next_temp += 1;
        self.instructions
            .push(Instruction::binary(op, dst.clone(), lhs, rhs));
        IrValue::Variable(dst)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current];
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else if self.check(&TokenKind::Eof) {
            Err(Error::UnexpectedEof)
        } else {
            Err(Error::UnexpectedToken {
                expected: kind.to_string(),
                got: self.peek().kind.to_string(),
            })
        }
    }

    fn consume_identifier(&mut self) -> Result<String> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            other => Err(Error::UnexpectedToken {
                expected: "identifier".to_string(),
                got: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;

    fn parse(source: &str) -> Result<Vec<Instruction>> {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens()?;
        Parser::new(tokens).parse()
    }

    #[test]
    fn test_declaration_and_assignment() {
        let ir = parse("int x; x = 5; return x;").unwrap();
        assert_eq!(
            ir,
            vec![
                Instruction::mov("x", IrValue::Immediate(5)),
                Instruction::ret(IrValue::var("x")),
            ]
        );
    }

    #[test]
    fn test_precedence() {
        // a + b * 2 multiplies first
        let ir = parse("int a; int b; a = 1; b = 2; return a + b * 2;").unwrap();
        assert_eq!(
            ir[2],
            Instruction::binary(BinOp::Mul, "$0", IrValue::var("b"), IrValue::Immediate(2))
        );
        assert_eq!(
            ir[3],
            Instruction::binary(BinOp::Add, "$1", IrValue::var("a"), IrValue::var("$0"))
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let ir = parse("int a; a = 3; return (a + 1) * 2;").unwrap();
        assert_eq!(
            ir[1],
            Instruction::binary(BinOp::Add, "$0", IrValue::var("a"), IrValue::Immediate(1))
        );
        assert_eq!(
            ir[2],
            Instruction::binary(BinOp::Mul, "$1", IrValue::var("$0"), IrValue::Immediate(2))
        );
    }

    #[test]
    fn test_undeclared_variable() {
        assert!(matches!(
            parse("x = 1;"),
            Err(Error::UndeclaredVariable { .. })
        ));
        assert!(matches!(
            parse("int x; x = y;"),
            Err(Error::UndeclaredVariable { .. })
        ));
    }

    #[test]
    fn test_duplicate_declaration() {
        assert!(matches!(
            parse("int x; int x;"),
            Err(Error::DuplicateDeclaration { .. })
        ));
    }

    #[test]
    fn test_division_rejected() {
        // '/' tokenizes but the grammar has no production for it
        assert!(matches!(
            parse("int a; a = 4; return a / 2;"),
            Err(Error::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_missing_semicolon() {
        assert!(parse("int x x = 1;").is_err());
    }
}
