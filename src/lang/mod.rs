//! Playground language toolchain: lexer, parser, AST, code generator.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

/// Surface syntax for the record/tuple literal delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `#{ … }` and `#[ … ]`
    Hash,
    /// `{| … |}` and `[| … |]`
    Bar,
}

impl Dialect {
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Hash => "hash",
            Dialect::Bar => "bar",
        }
    }
}
