//! Source-to-source transform: parse under a dialect, rewrite the
//! experimental literal forms into polyfill constructor calls, rewrite
//! equality operators per the selected mode, and print the result.
//!
//! The call is a pure function of (source, options); identical inputs
//! always produce byte-identical output.

use crate::lang::ast::*;
use crate::lang::error::{LangError, LangResult};
use crate::lang::{codegen, parser, Dialect};

/// The module name the canned examples import the polyfill from. The
/// import is erased: the executor injects the polyfill bindings directly
/// into the execution scope.
pub const POLYFILL_MODULE: &str = "record-and-tuple-polyfill";

/// How `===` / `!==` comparisons are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityMode {
    /// Leave comparisons untouched: records and tuples compare by
    /// identity, which is the demo's control case.
    Strict,
    /// Rewrite to `sameValueZero(a, b)` value-based equality.
    SameValueZero,
    /// Rewriting disabled.
    Off,
}

impl EqualityMode {
    pub fn label(&self) -> &'static str {
        match self {
            EqualityMode::Strict => "===",
            EqualityMode::SameValueZero => "sameValueZero",
            EqualityMode::Off => "off",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub dialect: Dialect,
    pub equality: EqualityMode,
}

/// Transform a source program. Errors cover both bad syntax (including
/// the other dialect's delimiters) and imports that cannot be erased.
pub fn transform(source: &str, options: &TransformOptions) -> LangResult<String> {
    let program = parser::parse(source, options.dialect)?;

    let mut body = Vec::with_capacity(program.body.len() + 1);
    body.push(Statement::Expression(Expression::String(
        "use strict".to_string(),
    )));
    for stmt in program.body {
        if let Some(stmt) = rewrite_statement(stmt, options)? {
            body.push(stmt);
        }
    }

    Ok(codegen::emit(&Program { body }))
}

fn rewrite_statement(stmt: Statement, options: &TransformOptions) -> LangResult<Option<Statement>> {
    let stmt = match stmt {
        Statement::Import(decl) => {
            if decl.module != POLYFILL_MODULE {
                return Err(LangError::type_error(format!(
                    "Cannot resolve module \"{}\"",
                    decl.module
                )));
            }
            for name in &decl.names {
                if name != "Record" && name != "Tuple" {
                    return Err(LangError::type_error(format!(
                        "\"{}\" does not export \"{}\"",
                        POLYFILL_MODULE, name
                    )));
                }
            }
            // The bindings are injected at execution time.
            return Ok(None);
        }
        Statement::Empty => return Ok(None),
        Statement::Expression(expr) => Statement::Expression(rewrite_expr(expr, options)?),
        Statement::Variable(decl) => {
            let declarations = decl
                .declarations
                .into_iter()
                .map(|d| {
                    Ok(Declarator {
                        name: d.name,
                        init: d.init.map(|e| rewrite_expr(e, options)).transpose()?,
                    })
                })
                .collect::<LangResult<Vec<_>>>()?;
            Statement::Variable(VariableDecl {
                kind: decl.kind,
                declarations,
            })
        }
        Statement::Block(body) => Statement::Block(rewrite_body(body, options)?),
        Statement::If(if_stmt) => Statement::If(IfStmt {
            test: rewrite_expr(if_stmt.test, options)?,
            consequent: Box::new(
                rewrite_statement(*if_stmt.consequent, options)?.unwrap_or(Statement::Empty),
            ),
            alternate: match if_stmt.alternate {
                Some(alt) => rewrite_statement(*alt, options)?.map(Box::new),
                None => None,
            },
        }),
        Statement::While(while_stmt) => Statement::While(WhileStmt {
            test: rewrite_expr(while_stmt.test, options)?,
            body: Box::new(
                rewrite_statement(*while_stmt.body, options)?.unwrap_or(Statement::Empty),
            ),
        }),
        Statement::For(for_stmt) => Statement::For(ForStmt {
            init: match for_stmt.init {
                Some(init) => rewrite_statement(*init, options)?.map(Box::new),
                None => None,
            },
            test: for_stmt.test.map(|e| rewrite_expr(e, options)).transpose()?,
            update: for_stmt
                .update
                .map(|e| rewrite_expr(e, options))
                .transpose()?,
            body: Box::new(
                rewrite_statement(*for_stmt.body, options)?.unwrap_or(Statement::Empty),
            ),
        }),
        Statement::Return(value) => {
            Statement::Return(value.map(|e| rewrite_expr(e, options)).transpose()?)
        }
        Statement::Break => Statement::Break,
        Statement::Continue => Statement::Continue,
        Statement::Throw(value) => Statement::Throw(rewrite_expr(value, options)?),
    };
    Ok(Some(stmt))
}

fn rewrite_body(body: Vec<Statement>, options: &TransformOptions) -> LangResult<Vec<Statement>> {
    let mut out = Vec::with_capacity(body.len());
    for stmt in body {
        if let Some(stmt) = rewrite_statement(stmt, options)? {
            out.push(stmt);
        }
    }
    Ok(out)
}

fn rewrite_expr(expr: Expression, options: &TransformOptions) -> LangResult<Expression> {
    let expr = match expr {
        Expression::Record(props) => {
            let props = rewrite_props(props, options)?;
            call("Record", vec![Expression::Object(props)])
        }
        Expression::Tuple(elements) => {
            let elements = rewrite_exprs(elements, options)?;
            call("Tuple", elements)
        }
        Expression::Binary(binary) => {
            let left = rewrite_expr(binary.left, options)?;
            let right = rewrite_expr(binary.right, options)?;
            if options.equality == EqualityMode::SameValueZero {
                match binary.op {
                    BinaryOp::StrictEq => call("sameValueZero", vec![left, right]),
                    BinaryOp::StrictNe => Expression::Unary(Box::new(UnaryExpr {
                        op: UnaryOp::Not,
                        operand: call("sameValueZero", vec![left, right]),
                    })),
                    op => Expression::Binary(Box::new(BinaryExpr { op, left, right })),
                }
            } else {
                Expression::Binary(Box::new(BinaryExpr {
                    op: binary.op,
                    left,
                    right,
                }))
            }
        }
        Expression::Array(elements) => Expression::Array(rewrite_exprs(elements, options)?),
        Expression::Object(props) => Expression::Object(rewrite_props(props, options)?),
        Expression::Member(member) => Expression::Member(Box::new(MemberExpr {
            object: rewrite_expr(member.object, options)?,
            property: match member.property {
                MemberProp::Dot(name) => MemberProp::Dot(name),
                MemberProp::Computed(index) => {
                    MemberProp::Computed(rewrite_expr(index, options)?)
                }
            },
        })),
        Expression::Call(call_expr) => Expression::Call(Box::new(CallExpr {
            callee: rewrite_expr(call_expr.callee, options)?,
            arguments: rewrite_exprs(call_expr.arguments, options)?,
        })),
        Expression::Arrow(arrow) => Expression::Arrow(Box::new(ArrowExpr {
            params: arrow.params,
            body: match arrow.body {
                ArrowBody::Expr(body) => ArrowBody::Expr(rewrite_expr(body, options)?),
                ArrowBody::Block(body) => ArrowBody::Block(rewrite_body(body, options)?),
            },
        })),
        Expression::Unary(unary) => Expression::Unary(Box::new(UnaryExpr {
            op: unary.op,
            operand: rewrite_expr(unary.operand, options)?,
        })),
        Expression::Logical(logical) => Expression::Logical(Box::new(LogicalExpr {
            op: logical.op,
            left: rewrite_expr(logical.left, options)?,
            right: rewrite_expr(logical.right, options)?,
        })),
        Expression::Conditional(cond) => Expression::Conditional(Box::new(ConditionalExpr {
            test: rewrite_expr(cond.test, options)?,
            consequent: rewrite_expr(cond.consequent, options)?,
            alternate: rewrite_expr(cond.alternate, options)?,
        })),
        Expression::Assignment(assign) => Expression::Assignment(Box::new(AssignmentExpr {
            target: rewrite_expr(assign.target, options)?,
            value: rewrite_expr(assign.value, options)?,
        })),
        leaf @ (Expression::Number(_)
        | Expression::String(_)
        | Expression::Boolean(_)
        | Expression::Null
        | Expression::Identifier(_)) => leaf,
    };
    Ok(expr)
}

fn rewrite_exprs(
    exprs: Vec<Expression>,
    options: &TransformOptions,
) -> LangResult<Vec<Expression>> {
    exprs
        .into_iter()
        .map(|e| rewrite_expr(e, options))
        .collect()
}

fn rewrite_props(
    props: Vec<(PropertyKey, Expression)>,
    options: &TransformOptions,
) -> LangResult<Vec<(PropertyKey, Expression)>> {
    props
        .into_iter()
        .map(|(k, v)| Ok((k, rewrite_expr(v, options)?)))
        .collect()
}

fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Call(Box::new(CallExpr {
        callee: Expression::Identifier(name.to_string()),
        arguments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_strict() -> TransformOptions {
        TransformOptions {
            dialect: Dialect::Hash,
            equality: EqualityMode::Strict,
        }
    }

    fn hash_svz() -> TransformOptions {
        TransformOptions {
            dialect: Dialect::Hash,
            equality: EqualityMode::SameValueZero,
        }
    }

    #[test]
    fn rewrites_record_and_tuple_literals() {
        let out = transform("const r = #{ a: 1 }; const t = #[1, 2];", &hash_strict())
            .expect("transform");
        assert!(out.contains("const r = Record({ a: 1 });"), "{}", out);
        assert!(out.contains("const t = Tuple(1, 2);"), "{}", out);
        assert!(!out.contains('#'), "{}", out);
    }

    #[test]
    fn output_starts_with_use_strict() {
        let out = transform("1;", &hash_strict()).expect("transform");
        assert!(out.starts_with("\"use strict\";\n"), "{}", out);
    }

    #[test]
    fn bar_dialect_rewrites_to_the_same_constructors() {
        let out = transform(
            "const r = {| a: 1 |}; const t = [|1|];",
            &TransformOptions {
                dialect: Dialect::Bar,
                equality: EqualityMode::Strict,
            },
        )
        .expect("transform");
        assert!(out.contains("Record({ a: 1 })"), "{}", out);
        assert!(out.contains("Tuple(1)"), "{}", out);
    }

    #[test]
    fn wrong_dialect_is_a_transform_error() {
        let err = transform("const r = {| a: 1 |};", &hash_strict()).unwrap_err();
        assert!(err.to_string().starts_with("SyntaxError"), "{}", err);
    }

    #[test]
    fn nested_literals_rewrite_recursively() {
        let out = transform("log(#{ a: #{ b: #[1] } });", &hash_strict()).expect("transform");
        assert!(
            out.contains("log(Record({ a: Record({ b: Tuple(1) }) }));"),
            "{}",
            out
        );
    }

    #[test]
    fn strict_mode_leaves_comparisons_untouched() {
        let out = transform("log(#{ a: 1 } === #{ a: 1 });", &hash_strict()).expect("transform");
        assert!(
            out.contains("log(Record({ a: 1 }) === Record({ a: 1 }));"),
            "{}",
            out
        );
        assert!(!out.contains("sameValueZero"), "{}", out);
    }

    #[test]
    fn same_value_zero_mode_rewrites_equality() {
        let out = transform("log(a === b, a !== b);", &hash_svz()).expect("transform");
        assert!(out.contains("log(sameValueZero(a, b), !sameValueZero(a, b));"), "{}", out);
    }

    #[test]
    fn off_mode_never_rewrites() {
        let out = transform(
            "log(a === b);",
            &TransformOptions {
                dialect: Dialect::Hash,
                equality: EqualityMode::Off,
            },
        )
        .expect("transform");
        assert!(out.contains("log(a === b);"), "{}", out);
    }

    #[test]
    fn polyfill_import_is_erased() {
        let out = transform(
            "import { Record, Tuple } from \"record-and-tuple-polyfill\";\nconst r = #{ a: 1 };",
            &hash_strict(),
        )
        .expect("transform");
        assert!(!out.contains("import"), "{}", out);
        assert!(out.contains("Record({ a: 1 })"), "{}", out);
    }

    #[test]
    fn other_imports_are_rejected() {
        let err = transform(
            "import { x } from \"lodash\";",
            &hash_strict(),
        )
        .unwrap_err();
        assert!(err.message.contains("lodash"), "{}", err);
    }

    #[test]
    fn unknown_polyfill_export_is_rejected() {
        let err = transform(
            "import { Box } from \"record-and-tuple-polyfill\";",
            &hash_strict(),
        )
        .unwrap_err();
        assert!(err.message.contains("Box"), "{}", err);
    }

    #[test]
    fn non_ascii_strings_pass_through_unchanged() {
        let out = transform("log(\"héllo ✓\");", &hash_strict()).expect("transform");
        assert!(out.contains("log(\"héllo ✓\");"), "{}", out);
    }

    #[test]
    fn transform_is_idempotent_over_repeated_calls() {
        let src = "const r = #{ b: 2, a: 1 };\nlog(r === r);";
        let first = transform(src, &hash_svz()).expect("transform");
        let second = transform(src, &hash_svz()).expect("transform");
        assert_eq!(first, second);
    }
}
