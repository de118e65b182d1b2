//! Recursive-descent parser for the playground language.

use crate::lang::ast::*;
use crate::lang::error::{LangError, LangResult};
use crate::lang::lexer::Lexer;
use crate::lang::token::{Span, Token, TokenKind};
use crate::lang::Dialect;

/// Parse a source string under the given dialect.
pub fn parse(source: &str, dialect: Dialect) -> LangResult<Program> {
    Parser::new(source, dialect)?.parse_program()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    dialect: Dialect,
}

impl Parser {
    pub fn new(source: &str, dialect: Dialect) -> LangResult<Self> {
        let tokens = Lexer::new(source, dialect).tokenize()?;
        Ok(Parser {
            tokens,
            pos: 0,
            dialect,
        })
    }

    pub fn parse_program(&mut self) -> LangResult<Program> {
        let mut body = Vec::new();
        while !self.is_eof() {
            body.push(self.parse_statement()?);
        }
        Ok(Program { body })
    }

    // ── Statements ──

    fn parse_statement(&mut self) -> LangResult<Statement> {
        match &self.current().kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(Statement::Empty)
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                let stmt = self.parse_variable_declaration()?;
                self.eat_semicolon();
                Ok(stmt)
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                self.advance();
                self.eat_semicolon();
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.advance();
                self.eat_semicolon();
                Ok(Statement::Continue)
            }
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Import => self.parse_import(),
            _ => {
                let expr = self.parse_expression()?;
                self.eat_semicolon();
                Ok(Statement::Expression(expr))
            }
        }
    }

    fn parse_block(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            body.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Statement::Block(body))
    }

    fn parse_variable_declaration(&mut self) -> LangResult<Statement> {
        let kind = match self.current().kind {
            TokenKind::Const => VariableKind::Const,
            TokenKind::Let => VariableKind::Let,
            _ => VariableKind::Var,
        };
        self.advance();

        let mut declarations = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let init = if self.check(&TokenKind::Assign) {
                self.advance();
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(Declarator { name, init });
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(Statement::Variable(VariableDecl { kind, declarations }))
    }

    fn parse_if(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If(IfStmt {
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_while(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While(WhileStmt { test, body }))
    }

    fn parse_for(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        let init = if self.check(&TokenKind::Semicolon) {
            self.advance();
            None
        } else if matches!(
            self.current().kind,
            TokenKind::Const | TokenKind::Let | TokenKind::Var
        ) {
            let decl = self.parse_variable_declaration()?;
            self.expect(&TokenKind::Semicolon)?;
            Some(Box::new(decl))
        } else {
            let expr = self.parse_expression()?;
            self.expect(&TokenKind::Semicolon)?;
            Some(Box::new(Statement::Expression(expr)))
        };

        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For(ForStmt {
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_return(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_eof()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat_semicolon();
        Ok(Statement::Return(value))
    }

    fn parse_throw(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::Throw)?;
        let value = self.parse_expression()?;
        self.eat_semicolon();
        Ok(Statement::Throw(value))
    }

    fn parse_import(&mut self) -> LangResult<Statement> {
        self.expect(&TokenKind::Import)?;
        self.expect(&TokenKind::LBrace)?;
        let mut names = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            names.push(self.expect_ident()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        self.expect(&TokenKind::From)?;
        let module = match &self.current().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => return Err(self.unexpected("module name string")),
        };
        self.eat_semicolon();
        Ok(Statement::Import(ImportDecl { names, module }))
    }

    // ── Expressions (precedence climbing) ──

    pub fn parse_expression(&mut self) -> LangResult<Expression> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> LangResult<Expression> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }

        let target = self.parse_conditional()?;
        if self.check(&TokenKind::Assign) {
            if !matches!(target, Expression::Identifier(_) | Expression::Member(_)) {
                return Err(self.error_here("Invalid assignment target"));
            }
            self.advance();
            let value = self.parse_assignment()?;
            return Ok(Expression::Assignment(Box::new(AssignmentExpr {
                target,
                value,
            })));
        }
        Ok(target)
    }

    /// Arrow functions need lookahead: `x => …` or `(a, b) => …`.
    fn try_parse_arrow(&mut self) -> LangResult<Option<Expression>> {
        let params = if let TokenKind::Ident(name) = &self.current().kind {
            if self.peek_kind() == Some(&TokenKind::Arrow) {
                let name = name.clone();
                self.advance();
                vec![name]
            } else {
                return Ok(None);
            }
        } else if self.check(&TokenKind::LParen) && self.paren_starts_arrow() {
            self.advance();
            let mut params = Vec::new();
            while !self.check(&TokenKind::RParen) {
                params.push(self.expect_ident()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
            params
        } else {
            return Ok(None);
        };

        self.expect(&TokenKind::Arrow)?;
        let body = if self.check(&TokenKind::LBrace) {
            match self.parse_block()? {
                Statement::Block(body) => ArrowBody::Block(body),
                _ => unreachable!(),
            }
        } else {
            ArrowBody::Expr(self.parse_assignment()?)
        };
        Ok(Some(Expression::Arrow(Box::new(ArrowExpr { params, body }))))
    }

    /// Looks ahead from a `(` to see whether the matching `)` is followed
    /// by `=>`.
    fn paren_starts_arrow(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        while i < self.tokens.len() {
            match &self.tokens[i].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::Arrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parse_conditional(&mut self) -> LangResult<Expression> {
        let test = self.parse_logical_or()?;
        if self.check(&TokenKind::Question) {
            self.advance();
            let consequent = self.parse_assignment()?;
            self.expect(&TokenKind::Colon)?;
            let alternate = self.parse_assignment()?;
            return Ok(Expression::Conditional(Box::new(ConditionalExpr {
                test,
                consequent,
                alternate,
            })));
        }
        Ok(test)
    }

    fn parse_logical_or(&mut self) -> LangResult<Expression> {
        let mut left = self.parse_logical_and()?;
        while self.check(&TokenKind::OrOr) {
            self.advance();
            let right = self.parse_logical_and()?;
            left = Expression::Logical(Box::new(LogicalExpr {
                op: LogicalOp::Or,
                left,
                right,
            }));
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> LangResult<Expression> {
        let mut left = self.parse_equality()?;
        while self.check(&TokenKind::AndAnd) {
            self.advance();
            let right = self.parse_equality()?;
            left = Expression::Logical(Box::new(LogicalExpr {
                op: LogicalOp::And,
                left,
                right,
            }));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> LangResult<Expression> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current().kind {
                TokenKind::StrictEq => BinaryOp::StrictEq,
                TokenKind::StrictNe => BinaryOp::StrictNe,
                TokenKind::LooseEq => BinaryOp::LooseEq,
                TokenKind::LooseNe => BinaryOp::LooseNe,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = Expression::Binary(Box::new(BinaryExpr { op, left, right }));
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> LangResult<Expression> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::Binary(Box::new(BinaryExpr { op, left, right }));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> LangResult<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary(Box::new(BinaryExpr { op, left, right }));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> LangResult<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Binary(Box::new(BinaryExpr { op, left, right }));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> LangResult<Expression> {
        let op = match self.current().kind {
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::Unary(Box::new(UnaryExpr { op, operand })));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> LangResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    expr = Expression::Member(Box::new(MemberExpr {
                        object: expr,
                        property: MemberProp::Dot(name),
                    }));
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = Expression::Member(Box::new(MemberExpr {
                        object: expr,
                        property: MemberProp::Computed(index),
                    }));
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut arguments = Vec::new();
                    while !self.check(&TokenKind::RParen) {
                        arguments.push(self.parse_assignment()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    self.expect(&TokenKind::RParen)?;
                    expr = Expression::Call(Box::new(CallExpr {
                        callee: expr,
                        arguments,
                    }));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> LangResult<Expression> {
        let expr = match &self.current().kind {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Expression::Number(n)
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Expression::String(s)
            }
            TokenKind::True => {
                self.advance();
                Expression::Boolean(true)
            }
            TokenKind::False => {
                self.advance();
                Expression::Boolean(false)
            }
            TokenKind::Null => {
                self.advance();
                Expression::Null
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Expression::Identifier(name)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                inner
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_elements(&TokenKind::RBracket)?;
                Expression::Array(elements)
            }
            TokenKind::LBrace => {
                self.advance();
                let props = self.parse_properties(&TokenKind::RBrace)?;
                Expression::Object(props)
            }
            TokenKind::RecordOpen => {
                self.advance();
                let close = self.record_close();
                let props = self.parse_properties(&close)?;
                Expression::Record(props)
            }
            TokenKind::TupleOpen => {
                self.advance();
                let close = self.tuple_close();
                let elements = self.parse_elements(&close)?;
                Expression::Tuple(elements)
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(expr)
    }

    fn parse_elements(&mut self, close: &TokenKind) -> LangResult<Vec<Expression>> {
        let mut elements = Vec::new();
        while !self.check(close) {
            elements.push(self.parse_assignment()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(close)?;
        Ok(elements)
    }

    fn parse_properties(&mut self, close: &TokenKind) -> LangResult<Vec<(PropertyKey, Expression)>> {
        let mut props = Vec::new();
        while !self.check(close) {
            let key = match &self.current().kind {
                TokenKind::Ident(name) => {
                    let name = name.clone();
                    self.advance();
                    PropertyKey::Ident(name)
                }
                TokenKind::String(s) => {
                    let s = s.clone();
                    self.advance();
                    PropertyKey::String(s)
                }
                _ => return Err(self.unexpected("property key")),
            };
            let value = if self.check(&TokenKind::Colon) {
                self.advance();
                self.parse_assignment()?
            } else {
                // shorthand `{ a }`
                Expression::Identifier(key.as_str().to_string())
            };
            props.push((key, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(close)?;
        Ok(props)
    }

    fn record_close(&self) -> TokenKind {
        match self.dialect {
            Dialect::Hash => TokenKind::RBrace,
            Dialect::Bar => TokenKind::BarRecordClose,
        }
    }

    fn tuple_close(&self) -> TokenKind {
        match self.dialect {
            Dialect::Hash => TokenKind::RBracket,
            Dialect::Bar => TokenKind::BarTupleClose,
        }
    }

    // ── Token helpers ──

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn expect(&mut self, kind: &TokenKind) -> LangResult<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&describe(kind)))
        }
    }

    fn expect_ident(&mut self) -> LangResult<String> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn eat_semicolon(&mut self) {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn is_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn span(&self) -> Span {
        self.current().span
    }

    fn unexpected(&self, expected: &str) -> LangError {
        let span = self.span();
        LangError::syntax(
            format!(
                "Unexpected token {}, expected {}",
                describe(&self.current().kind),
                expected
            ),
            span.line,
            span.column,
        )
    }

    fn error_here<S: Into<String>>(&self, message: S) -> LangError {
        let span = self.span();
        LangError::syntax(message, span.line, span.column)
    }
}

/// Human-readable token name for diagnostics.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(_) => "number".to_string(),
        TokenKind::String(_) => "string".to_string(),
        TokenKind::Ident(name) => format!("'{}'", name),
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::RecordOpen => "record literal".to_string(),
        TokenKind::TupleOpen => "tuple literal".to_string(),
        TokenKind::BarRecordClose => "'|}'".to_string(),
        TokenKind::BarTupleClose => "'|]'".to_string(),
        TokenKind::Const => "'const'".to_string(),
        TokenKind::Let => "'let'".to_string(),
        TokenKind::Var => "'var'".to_string(),
        TokenKind::If => "'if'".to_string(),
        TokenKind::Else => "'else'".to_string(),
        TokenKind::While => "'while'".to_string(),
        TokenKind::For => "'for'".to_string(),
        TokenKind::Return => "'return'".to_string(),
        TokenKind::Break => "'break'".to_string(),
        TokenKind::Continue => "'continue'".to_string(),
        TokenKind::Throw => "'throw'".to_string(),
        TokenKind::Import => "'import'".to_string(),
        TokenKind::From => "'from'".to_string(),
        TokenKind::True => "'true'".to_string(),
        TokenKind::False => "'false'".to_string(),
        TokenKind::Null => "'null'".to_string(),
        TokenKind::Typeof => "'typeof'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::LBrace => "'{'".to_string(),
        TokenKind::RBrace => "'}'".to_string(),
        TokenKind::LBracket => "'['".to_string(),
        TokenKind::RBracket => "']'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Semicolon => "';'".to_string(),
        TokenKind::Colon => "':'".to_string(),
        TokenKind::Dot => "'.'".to_string(),
        TokenKind::Question => "'?'".to_string(),
        TokenKind::Arrow => "'=>'".to_string(),
        TokenKind::Assign => "'='".to_string(),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Percent => "'%'".to_string(),
        TokenKind::StrictEq => "'==='".to_string(),
        TokenKind::StrictNe => "'!=='".to_string(),
        TokenKind::LooseEq => "'=='".to_string(),
        TokenKind::LooseNe => "'!='".to_string(),
        TokenKind::Lt => "'<'".to_string(),
        TokenKind::LtEq => "'<='".to_string(),
        TokenKind::Gt => "'>'".to_string(),
        TokenKind::GtEq => "'>='".to_string(),
        TokenKind::AndAnd => "'&&'".to_string(),
        TokenKind::OrOr => "'||'".to_string(),
        TokenKind::Bang => "'!'".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_hash(src: &str) -> Program {
        parse(src, Dialect::Hash).expect("parse")
    }

    #[test]
    fn parses_const_with_record_literal() {
        let program = parse_hash("const record = #{ prop: 1 };");
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Statement::Variable(decl) => {
                assert_eq!(decl.kind, VariableKind::Const);
                assert_eq!(decl.declarations[0].name, "record");
                assert!(matches!(
                    decl.declarations[0].init,
                    Some(Expression::Record(_))
                ));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn parses_bar_literals() {
        let program = parse("[|1, {| a: 2 |}|]", Dialect::Bar).expect("parse");
        match &program.body[0] {
            Statement::Expression(Expression::Tuple(elems)) => {
                assert_eq!(elems.len(), 2);
                assert!(matches!(elems[1], Expression::Record(_)));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn parses_arrow_functions() {
        let program = parse_hash("const nl = () => log(\" \"); const id = x => x;");
        assert_eq!(program.body.len(), 2);
        for stmt in &program.body {
            let Statement::Variable(decl) = stmt else {
                panic!("expected declaration")
            };
            assert!(matches!(
                decl.declarations[0].init,
                Some(Expression::Arrow(_))
            ));
        }
    }

    #[test]
    fn parses_arrow_with_block_body_and_params() {
        let program = parse_hash("const add = (a, b) => { return a + b; };");
        let Statement::Variable(decl) = &program.body[0] else {
            panic!("expected declaration")
        };
        let Some(Expression::Arrow(arrow)) = &decl.declarations[0].init else {
            panic!("expected arrow")
        };
        assert_eq!(arrow.params, vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(arrow.body, ArrowBody::Block(_)));
    }

    #[test]
    fn parenthesized_expression_is_not_an_arrow() {
        let program = parse_hash("(1 + 2) * 3;");
        assert!(matches!(
            program.body[0],
            Statement::Expression(Expression::Binary(_))
        ));
    }

    #[test]
    fn parses_import_declaration() {
        let program = parse_hash(
            "import { Record, Tuple } from \"record-and-tuple-polyfill\";",
        );
        match &program.body[0] {
            Statement::Import(decl) => {
                assert_eq!(decl.names, vec!["Record".to_string(), "Tuple".to_string()]);
                assert_eq!(decl.module, "record-and-tuple-polyfill");
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn equality_binds_looser_than_addition() {
        let program = parse_hash("1 + 2 === 3;");
        let Statement::Expression(Expression::Binary(bin)) = &program.body[0] else {
            panic!("expected binary")
        };
        assert_eq!(bin.op, BinaryOp::StrictEq);
        assert!(matches!(bin.left, Expression::Binary(_)));
    }

    #[test]
    fn member_chains_and_calls() {
        let program = parse_hash("console.log(record.prop, tuple[0]);");
        let Statement::Expression(Expression::Call(call)) = &program.body[0] else {
            panic!("expected call")
        };
        assert!(matches!(call.callee, Expression::Member(_)));
        assert_eq!(call.arguments.len(), 2);
    }

    #[test]
    fn error_carries_position() {
        let err = parse("const = 1;", Dialect::Hash).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("identifier"));
    }

    #[test]
    fn statements_without_semicolons() {
        let program = parse_hash("const a = 1\nconst b = 2\nlog(a, b)");
        assert_eq!(program.body.len(), 3);
    }
}
