use crate::error::{Error, Result};
use std::collections::HashSet;

/// Symbol table for the toy language
///
/// The language has a single type (`int`), so an entry only records that the
/// name was declared. Declarations must precede any use or assignment.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: HashSet<String>,
}

impl SymbolTable {
    /// Creates an empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a name; redeclaration is an error
    pub fn declare(&mut self, name: &str) -> Result<()> {
        if !self.names.insert(name.to_string()) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Check that a name has been declared
    pub fn check_declared(&self, name: &str) -> Result<()> {
        if self.names.contains(name) {
            Ok(())
        } else {
            Err(Error::UndeclaredVariable {
                name: name.to_string(),
            })
        }
    }

    /// Whether a name has been declared
    pub fn has(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_check() {
        let mut table = SymbolTable::new();
        table.declare("x").unwrap();
        assert!(table.has("x"));
        assert!(table.check_declared("x").is_ok());
        assert!(matches!(
            table.check_declared("y"),
            Err(Error::UndeclaredVariable { .. })
        ));
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut table = SymbolTable::new();
        table.declare("x").unwrap();
        assert!(matches!(
            table.declare("x"),
            Err(Error::DuplicateDeclaration { .. })
        ));
    }
}
