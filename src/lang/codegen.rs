//! Deterministic source printer for the playground AST.
//!
//! The transform pipeline relies on this printer being a pure function of
//! the AST: transforming the same (source, options) pair twice must yield
//! byte-identical output.

use crate::lang::ast::*;

/// Binding strengths used to decide where parentheses are required.
mod prec {
    pub const ASSIGN: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const OR: u8 = 4;
    pub const AND: u8 = 5;
    pub const EQUALITY: u8 = 6;
    pub const RELATIONAL: u8 = 7;
    pub const ADDITIVE: u8 = 8;
    pub const MULTIPLICATIVE: u8 = 9;
    pub const UNARY: u8 = 10;
    pub const POSTFIX: u8 = 11;
    pub const PRIMARY: u8 = 12;
}

/// Render a program to source text.
pub fn emit(program: &Program) -> String {
    let mut printer = Printer::new();
    for stmt in &program.body {
        printer.statement(stmt);
    }
    printer.out
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Printer {
            out: String::new(),
            indent: 0,
        }
    }

    fn line_start(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Empty => {}
            Statement::Expression(expr) => {
                self.line_start();
                self.expr(expr, prec::ASSIGN);
                self.out.push_str(";\n");
            }
            Statement::Variable(decl) => {
                self.line_start();
                self.variable(decl);
                self.out.push_str(";\n");
            }
            Statement::Block(body) => {
                self.line_start();
                self.block(body);
                self.out.push('\n');
            }
            Statement::If(if_stmt) => {
                self.line_start();
                self.if_stmt(if_stmt);
                self.out.push('\n');
            }
            Statement::While(while_stmt) => {
                self.line_start();
                self.out.push_str("while (");
                self.expr(&while_stmt.test, prec::ASSIGN);
                self.out.push_str(") ");
                self.nested_body(&while_stmt.body);
                self.out.push('\n');
            }
            Statement::For(for_stmt) => {
                self.line_start();
                self.out.push_str("for (");
                match for_stmt.init.as_deref() {
                    Some(Statement::Variable(decl)) => self.variable(decl),
                    Some(Statement::Expression(expr)) => self.expr(expr, prec::ASSIGN),
                    _ => {}
                }
                self.out.push(';');
                if let Some(test) = &for_stmt.test {
                    self.out.push(' ');
                    self.expr(test, prec::ASSIGN);
                }
                self.out.push(';');
                if let Some(update) = &for_stmt.update {
                    self.out.push(' ');
                    self.expr(update, prec::ASSIGN);
                }
                self.out.push_str(") ");
                self.nested_body(&for_stmt.body);
                self.out.push('\n');
            }
            Statement::Return(value) => {
                self.line_start();
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value, prec::ASSIGN);
                }
                self.out.push_str(";\n");
            }
            Statement::Break => {
                self.line_start();
                self.out.push_str("break;\n");
            }
            Statement::Continue => {
                self.line_start();
                self.out.push_str("continue;\n");
            }
            Statement::Throw(value) => {
                self.line_start();
                self.out.push_str("throw ");
                self.expr(value, prec::ASSIGN);
                self.out.push_str(";\n");
            }
            Statement::Import(decl) => {
                self.line_start();
                self.out.push_str("import { ");
                for (i, name) in decl.names.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(name);
                }
                self.out.push_str(" } from ");
                self.string_literal(&decl.module);
                self.out.push_str(";\n");
            }
        }
    }

    fn variable(&mut self, decl: &VariableDecl) {
        self.out.push_str(decl.kind.as_str());
        self.out.push(' ');
        for (i, declarator) in decl.declarations.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&declarator.name);
            if let Some(init) = &declarator.init {
                self.out.push_str(" = ");
                self.expr(init, prec::ASSIGN);
            }
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.out.push_str("if (");
        self.expr(&if_stmt.test, prec::ASSIGN);
        self.out.push_str(") ");
        self.nested_body(&if_stmt.consequent);
        if let Some(alternate) = &if_stmt.alternate {
            self.out.push_str(" else ");
            match alternate.as_ref() {
                Statement::If(nested) => self.if_stmt(nested),
                other => self.nested_body(other),
            }
        }
    }

    /// Loop/conditional bodies print as blocks so the output never relies
    /// on single-statement bodies.
    fn nested_body(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(body) => self.block(body),
            other => {
                self.out.push_str("{\n");
                self.indent += 1;
                self.statement(other);
                self.indent -= 1;
                self.line_start();
                self.out.push('}');
            }
        }
    }

    fn block(&mut self, body: &[Statement]) {
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in body {
            self.statement(stmt);
        }
        self.indent -= 1;
        self.line_start();
        self.out.push('}');
    }

    fn expr(&mut self, expr: &Expression, min_prec: u8) {
        let own = precedence(expr);
        let needs_parens = own < min_prec;
        if needs_parens {
            self.out.push('(');
        }
        match expr {
            Expression::Number(n) => self.out.push_str(&format_number(*n)),
            Expression::String(s) => self.string_literal(s),
            Expression::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Expression::Null => self.out.push_str("null"),
            Expression::Identifier(name) => self.out.push_str(name),
            Expression::Array(elements) => {
                self.out.push('[');
                self.comma_list(elements);
                self.out.push(']');
            }
            Expression::Object(props) => self.properties(props, "{", "}"),
            Expression::Record(props) => self.properties(props, "#{", "}"),
            Expression::Tuple(elements) => {
                self.out.push_str("#[");
                self.comma_list(elements);
                self.out.push(']');
            }
            Expression::Member(member) => {
                self.expr(&member.object, prec::POSTFIX);
                match &member.property {
                    MemberProp::Dot(name) => {
                        self.out.push('.');
                        self.out.push_str(name);
                    }
                    MemberProp::Computed(index) => {
                        self.out.push('[');
                        self.expr(index, prec::ASSIGN);
                        self.out.push(']');
                    }
                }
            }
            Expression::Call(call) => {
                self.expr(&call.callee, prec::POSTFIX);
                self.out.push('(');
                self.comma_list(&call.arguments);
                self.out.push(')');
            }
            Expression::Arrow(arrow) => {
                if arrow.params.len() == 1 {
                    self.out.push_str(&arrow.params[0]);
                } else {
                    self.out.push('(');
                    for (i, param) in arrow.params.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.out.push_str(param);
                    }
                    self.out.push(')');
                }
                self.out.push_str(" => ");
                match &arrow.body {
                    ArrowBody::Expr(body) => {
                        // `=> ({})` — an object body needs parentheses.
                        if matches!(body, Expression::Object(_)) {
                            self.out.push('(');
                            self.expr(body, prec::ASSIGN);
                            self.out.push(')');
                        } else {
                            self.expr(body, prec::ASSIGN);
                        }
                    }
                    ArrowBody::Block(body) => self.block(body),
                }
            }
            Expression::Unary(unary) => {
                self.out.push_str(unary.op.as_str());
                if unary.op == UnaryOp::Typeof {
                    self.out.push(' ');
                }
                // `--x` would lex as a different token sequence.
                if matches!(&unary.operand, Expression::Unary(inner)
                    if matches!(inner.op, UnaryOp::Minus | UnaryOp::Plus))
                {
                    self.out.push('(');
                    self.expr(&unary.operand, prec::ASSIGN);
                    self.out.push(')');
                } else {
                    self.expr(&unary.operand, prec::UNARY);
                }
            }
            Expression::Binary(binary) => {
                let own_prec = precedence(expr);
                self.expr(&binary.left, own_prec);
                self.out.push(' ');
                self.out.push_str(binary.op.as_str());
                self.out.push(' ');
                self.expr(&binary.right, own_prec + 1);
            }
            Expression::Logical(logical) => {
                let own_prec = precedence(expr);
                self.expr(&logical.left, own_prec);
                self.out.push(' ');
                self.out.push_str(logical.op.as_str());
                self.out.push(' ');
                self.expr(&logical.right, own_prec + 1);
            }
            Expression::Conditional(cond) => {
                self.expr(&cond.test, prec::OR);
                self.out.push_str(" ? ");
                self.expr(&cond.consequent, prec::ASSIGN);
                self.out.push_str(" : ");
                self.expr(&cond.alternate, prec::ASSIGN);
            }
            Expression::Assignment(assign) => {
                self.expr(&assign.target, prec::POSTFIX);
                self.out.push_str(" = ");
                self.expr(&assign.value, prec::ASSIGN);
            }
        }
        if needs_parens {
            self.out.push(')');
        }
    }

    fn comma_list(&mut self, elements: &[Expression]) {
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(element, prec::ASSIGN);
        }
    }

    fn properties(&mut self, props: &[(PropertyKey, Expression)], open: &str, close: &str) {
        if props.is_empty() {
            self.out.push_str(open);
            self.out.push_str(close);
            return;
        }
        self.out.push_str(open);
        self.out.push(' ');
        for (i, (key, value)) in props.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            match key {
                PropertyKey::Ident(name) => self.out.push_str(name),
                PropertyKey::String(s) => self.string_literal(s),
            }
            self.out.push_str(": ");
            self.expr(value, prec::ASSIGN);
        }
        self.out.push(' ');
        self.out.push_str(close);
    }

    fn string_literal(&mut self, s: &str) {
        self.out.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                other => self.out.push(other),
            }
        }
        self.out.push('"');
    }
}

fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::Assignment(_) => prec::ASSIGN,
        Expression::Conditional(_) => prec::CONDITIONAL,
        Expression::Arrow(_) => prec::ASSIGN,
        Expression::Logical(logical) => match logical.op {
            LogicalOp::Or => prec::OR,
            LogicalOp::And => prec::AND,
        },
        Expression::Binary(binary) => match binary.op {
            BinaryOp::StrictEq | BinaryOp::StrictNe | BinaryOp::LooseEq | BinaryOp::LooseNe => {
                prec::EQUALITY
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => prec::RELATIONAL,
            BinaryOp::Add | BinaryOp::Sub => prec::ADDITIVE,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => prec::MULTIPLICATIVE,
        },
        Expression::Unary(_) => prec::UNARY,
        Expression::Member(_) | Expression::Call(_) => prec::POSTFIX,
        _ => prec::PRIMARY,
    }
}

/// JS-style number rendering: no fraction for integral values, `NaN`,
/// `Infinity` and `-0` spelled out.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return format!("{}", n as i64);
    }
    format!("{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parser;
    use crate::lang::Dialect;

    fn roundtrip(src: &str) -> String {
        emit(&parser::parse(src, Dialect::Hash).expect("parse"))
    }

    #[test]
    fn emits_declaration_and_call() {
        assert_eq!(
            roundtrip("const log = console.log; log(1, \"a\");"),
            "const log = console.log;\nlog(1, \"a\");\n"
        );
    }

    #[test]
    fn emit_is_deterministic() {
        let src = "const a = #{ x: 1, y: #[1, 2] };\nlog(a === a);";
        assert_eq!(roundtrip(src), roundtrip(src));
    }

    #[test]
    fn preserves_precedence_with_parens() {
        assert_eq!(roundtrip("(1 + 2) * 3;"), "(1 + 2) * 3;\n");
        assert_eq!(roundtrip("1 + 2 * 3;"), "1 + 2 * 3;\n");
        assert_eq!(roundtrip("!(a === b);"), "!(a === b);\n");
    }

    #[test]
    fn renders_special_numbers() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(-0.0), "-0");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn negative_zero_survives_the_roundtrip() {
        assert_eq!(roundtrip("log(-0, +0);"), "log(-0, +0);\n");
    }

    #[test]
    fn arrow_bodies() {
        assert_eq!(roundtrip("const nl = () => log(\" \");"), "const nl = () => log(\" \");\n");
        assert_eq!(roundtrip("const id = x => x;"), "const id = x => x;\n");
        assert_eq!(
            roundtrip("const mk = () => ({ a: 1 });"),
            "const mk = () => ({ a: 1 });\n"
        );
    }

    #[test]
    fn while_body_prints_as_block() {
        assert_eq!(
            roundtrip("while (x < 3) x = x + 1;"),
            "while (x < 3) {\n  x = x + 1;\n}\n"
        );
    }
}
