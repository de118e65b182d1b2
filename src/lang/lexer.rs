//! Hand-written scanner for the playground language.
//!
//! Produces a flat token stream for the parser. The record/tuple literal
//! delimiters are dialect-specific: under `Dialect::Hash` the lexer accepts
//! `#{` and `#[`, under `Dialect::Bar` it accepts `{|`, `|}`, `[|` and `|]`.
//! The other dialect's delimiters are a lex error, which is how a source
//! written in the wrong dialect surfaces as a transform failure.

use crate::lang::error::{LangError, LangResult};
use crate::lang::token::{Span, Token, TokenKind};
use crate::lang::Dialect;

pub struct Lexer<'a> {
    source: &'a str,
    /// (byte offset, char) pairs, so slicing stays valid for any UTF-8.
    chars: Vec<(usize, char)>,
    dialect: Dialect,
    pos: usize,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Lexer {
            source,
            chars: source.char_indices().collect(),
            dialect,
            pos: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self) -> LangResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> LangResult<Token> {
        self.skip_whitespace_and_comments();

        self.token_line = self.line;
        self.token_column = self.column;

        if self.is_eof() {
            return Ok(self.make(TokenKind::Eof));
        }

        let ch = self.current();

        if ch.is_ascii_digit() || (ch == '.' && self.peek().is_ascii_digit()) {
            return self.scan_number();
        }
        if ch == '"' || ch == '\'' {
            return self.scan_string(ch);
        }
        if is_ident_start(ch) {
            return self.scan_identifier();
        }

        self.scan_punctuator()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while !self.is_eof() && self.current().is_whitespace() {
                self.advance();
            }
            if self.current() == '/' && self.peek() == '/' {
                while !self.is_eof() && self.current() != '\n' {
                    self.advance();
                }
                continue;
            }
            if self.current() == '/' && self.peek() == '*' {
                self.advance();
                self.advance();
                while !self.is_eof() && !(self.current() == '*' && self.peek() == '/') {
                    self.advance();
                }
                self.advance();
                self.advance();
                continue;
            }
            break;
        }
    }

    fn scan_number(&mut self) -> LangResult<Token> {
        let start = self.byte_pos();
        let start_pos = self.pos;
        while self.current().is_ascii_digit() {
            self.advance();
        }
        if self.current() == '.' && self.peek().is_ascii_digit() {
            self.advance();
            while self.current().is_ascii_digit() {
                self.advance();
            }
        } else if self.current() == '.' && start_pos < self.pos {
            // trailing dot: `1.`
            self.advance();
        }
        if self.current() == 'e' || self.current() == 'E' {
            let mark = (self.pos, self.column);
            self.advance();
            if self.current() == '+' || self.current() == '-' {
                self.advance();
            }
            if self.current().is_ascii_digit() {
                while self.current().is_ascii_digit() {
                    self.advance();
                }
            } else {
                // not an exponent after all, e.g. `2event`
                (self.pos, self.column) = mark;
            }
        }

        let text = &self.source[start..self.byte_pos()];
        match text.parse::<f64>() {
            Ok(n) => Ok(self.make(TokenKind::Number(n))),
            Err(_) => Err(self.error(format!("Invalid number literal '{}'", text))),
        }
    }

    fn scan_string(&mut self, quote: char) -> LangResult<Token> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            if self.is_eof() || self.current() == '\n' {
                return Err(self.error("Unterminated string literal"));
            }
            let ch = self.current();
            if ch == quote {
                self.advance();
                break;
            }
            if ch == '\\' {
                self.advance();
                let esc = self.current();
                self.advance();
                match esc {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    '\\' => value.push('\\'),
                    '\'' => value.push('\''),
                    '"' => value.push('"'),
                    other => value.push(other),
                }
                continue;
            }
            value.push(ch);
            self.advance();
        }
        Ok(self.make(TokenKind::String(value)))
    }

    fn scan_identifier(&mut self) -> LangResult<Token> {
        let start = self.byte_pos();
        while is_ident_part(self.current()) {
            self.advance();
        }
        let text = &self.source[start..self.byte_pos()];
        let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()));
        Ok(self.make(kind))
    }

    fn scan_punctuator(&mut self) -> LangResult<Token> {
        let ch = self.current();
        let kind = match ch {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => {
                if self.dialect == Dialect::Bar && self.peek() == '|' {
                    self.advance();
                    self.advance();
                    TokenKind::RecordOpen
                } else {
                    self.single(TokenKind::LBrace)
                }
            }
            '}' => self.single(TokenKind::RBrace),
            '[' => {
                if self.dialect == Dialect::Bar && self.peek() == '|' {
                    self.advance();
                    self.advance();
                    TokenKind::TupleOpen
                } else {
                    self.single(TokenKind::LBracket)
                }
            }
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '.' => self.single(TokenKind::Dot),
            '?' => self.single(TokenKind::Question),
            '#' => {
                if self.dialect == Dialect::Hash && self.peek() == '{' {
                    self.advance();
                    self.advance();
                    TokenKind::RecordOpen
                } else if self.dialect == Dialect::Hash && self.peek() == '[' {
                    self.advance();
                    self.advance();
                    TokenKind::TupleOpen
                } else {
                    return Err(self.error("Unexpected character '#'"));
                }
            }
            '|' => match self.peek() {
                '|' => {
                    self.advance();
                    self.advance();
                    TokenKind::OrOr
                }
                '}' if self.dialect == Dialect::Bar => {
                    self.advance();
                    self.advance();
                    TokenKind::BarRecordClose
                }
                ']' if self.dialect == Dialect::Bar => {
                    self.advance();
                    self.advance();
                    TokenKind::BarTupleClose
                }
                _ => return Err(self.error("Unexpected character '|'")),
            },
            '&' => {
                if self.peek() == '&' {
                    self.advance();
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    return Err(self.error("Unexpected character '&'"));
                }
            }
            '=' => {
                if self.peek() == '=' {
                    self.advance();
                    self.advance();
                    if self.current() == '=' {
                        self.advance();
                        TokenKind::StrictEq
                    } else {
                        TokenKind::LooseEq
                    }
                } else if self.peek() == '>' {
                    self.advance();
                    self.advance();
                    TokenKind::Arrow
                } else {
                    self.single(TokenKind::Assign)
                }
            }
            '!' => {
                if self.peek() == '=' {
                    self.advance();
                    self.advance();
                    if self.current() == '=' {
                        self.advance();
                        TokenKind::StrictNe
                    } else {
                        TokenKind::LooseNe
                    }
                } else {
                    self.single(TokenKind::Bang)
                }
            }
            '<' => {
                if self.peek() == '=' {
                    self.advance();
                    self.advance();
                    TokenKind::LtEq
                } else {
                    self.single(TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == '=' {
                    self.advance();
                    self.advance();
                    TokenKind::GtEq
                } else {
                    self.single(TokenKind::Gt)
                }
            }
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            other => return Err(self.error(format!("Unexpected character '{}'", other))),
        };
        Ok(self.make(kind))
    }

    // ── Cursor helpers ──

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn current(&self) -> char {
        self.chars.get(self.pos).map(|&(_, c)| c).unwrap_or('\0')
    }

    fn peek(&self) -> char {
        self.chars
            .get(self.pos + 1)
            .map(|&(_, c)| c)
            .unwrap_or('\0')
    }

    /// Byte offset of the cursor, for slicing the source.
    fn byte_pos(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn advance(&mut self) {
        if let Some(&(_, c)) = self.chars.get(self.pos) {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.token_line, self.token_column))
    }

    fn error<S: Into<String>>(&self, message: S) -> LangError {
        LangError::syntax(message, self.token_line, self.token_column)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str, dialect: Dialect) -> Vec<TokenKind> {
        Lexer::new(source, dialect)
            .tokenize()
            .expect("lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_hash_dialect_delimiters() {
        let toks = kinds("#{ a: 1 } #[1, 2]", Dialect::Hash);
        assert_eq!(toks[0], TokenKind::RecordOpen);
        assert!(toks.contains(&TokenKind::TupleOpen));
        assert!(toks.contains(&TokenKind::RBrace));
        assert!(toks.contains(&TokenKind::RBracket));
    }

    #[test]
    fn lexes_bar_dialect_delimiters() {
        let toks = kinds("{| a: 1 |} [|1|]", Dialect::Bar);
        assert_eq!(
            toks,
            vec![
                TokenKind::RecordOpen,
                TokenKind::Ident("a".into()),
                TokenKind::Colon,
                TokenKind::Number(1.0),
                TokenKind::BarRecordClose,
                TokenKind::TupleOpen,
                TokenKind::Number(1.0),
                TokenKind::BarTupleClose,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn hash_delimiter_is_an_error_under_bar_dialect() {
        let err = Lexer::new("#{ a: 1 }", Dialect::Bar).tokenize().unwrap_err();
        assert!(err.message.contains('#'));
        assert_eq!((err.line, err.column), (1, 1));
    }

    #[test]
    fn bar_delimiter_is_an_error_under_hash_dialect() {
        let err = Lexer::new("const x = {| a: 1 |};", Dialect::Hash)
            .tokenize()
            .unwrap_err();
        assert!(err.message.contains('|'));
    }

    #[test]
    fn logical_or_still_lexes_in_both_dialects() {
        assert!(kinds("a || b", Dialect::Hash).contains(&TokenKind::OrOr));
        assert!(kinds("a || b", Dialect::Bar).contains(&TokenKind::OrOr));
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let toks = kinds("// hi\n/* block\nstill */ 42", Dialect::Hash);
        assert_eq!(toks, vec![TokenKind::Number(42.0), TokenKind::Eof]);
    }

    #[test]
    fn string_escapes() {
        let toks = kinds(r#""a\n\"b\"""#, Dialect::Hash);
        assert_eq!(toks[0], TokenKind::String("a\n\"b\"".into()));
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = Lexer::new("\n  \"oops", Dialect::Hash).tokenize().unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));
    }

    #[test]
    fn operators_and_arrows() {
        let toks = kinds("a === b !== c => <= >=", Dialect::Hash);
        assert!(toks.contains(&TokenKind::StrictEq));
        assert!(toks.contains(&TokenKind::StrictNe));
        assert!(toks.contains(&TokenKind::Arrow));
        assert!(toks.contains(&TokenKind::LtEq));
        assert!(toks.contains(&TokenKind::GtEq));
    }

    #[test]
    fn non_ascii_string_contents_lex_intact() {
        let toks = kinds("log(\"héllo ✓\");", Dialect::Hash);
        assert_eq!(toks[2], TokenKind::String("héllo ✓".into()));
    }

    #[test]
    fn non_ascii_in_comments_does_not_shift_positions() {
        let err = Lexer::new("// café\n  \"oops", Dialect::Hash)
            .tokenize()
            .unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));
    }

    #[test]
    fn numbers_with_fraction_and_exponent() {
        let toks = kinds("0 1.5 .25 2e3", Dialect::Hash);
        assert_eq!(
            toks,
            vec![
                TokenKind::Number(0.0),
                TokenKind::Number(1.5),
                TokenKind::Number(0.25),
                TokenKind::Number(2000.0),
                TokenKind::Eof,
            ]
        );
    }
}
