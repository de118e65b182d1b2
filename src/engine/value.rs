//! Runtime values for the sandboxed executor.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::lang::ast::ArrowBody;
use crate::lang::codegen::format_number;
use crate::lang::error::LangError;

use super::interp::Scope;
use super::EngineError;

/// A runtime value.
///
/// Composite values are reference-counted; strict equality on them is
/// identity (`Rc::ptr_eq`). Records and tuples are immutable once built,
/// with record entries kept sorted by key.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(Rc<RefCell<Vec<(String, Value)>>>),
    Array(Rc<RefCell<Vec<Value>>>),
    Record(Rc<Vec<(String, Value)>>),
    Tuple(Rc<Vec<Value>>),
    Native(NativeFn),
    Closure(Rc<Closure>),
}

/// A built-in function (console methods, polyfill constructors).
#[derive(Clone)]
pub struct NativeFn {
    pub name: &'static str,
    pub func: Rc<dyn Fn(&[Value]) -> Result<Value, EngineError>>,
}

/// A user arrow function with its captured environment.
pub struct Closure {
    pub params: Vec<String>,
    pub body: ArrowBody,
    pub env: Rc<RefCell<Scope>>,
}

impl Value {
    pub fn object(entries: Vec<(String, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn native(
        name: &'static str,
        func: impl Fn(&[Value]) -> Result<Value, EngineError> + 'static,
    ) -> Self {
        Value::Native(NativeFn {
            name,
            func: Rc::new(func),
        })
    }

    /// `typeof` result. Records and tuples report their own type names,
    /// matching how the playground's polyfill brands them.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) | Value::Array(_) => "object",
            Value::Record(_) => "record",
            Value::Tuple(_) => "tuple",
            Value::Native(_) | Value::Closure(_) => "function",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// `===`: IEEE semantics for numbers (NaN is unequal to itself, -0
    /// equals +0), value comparison for strings, identity for every
    /// composite value including records and tuples.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `==` for the supported subset: strict equality plus the
    /// null/undefined pairing and number/string coercion.
    pub fn loose_equals(&self, other: &Value) -> bool {
        if self.strict_equals(other) {
            return true;
        }
        match (self, other) {
            (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => true,
            (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
                s.trim().parse::<f64>().map(|p| p == *n).unwrap_or(false)
            }
            (Value::Boolean(b), other) | (other, Value::Boolean(b)) => {
                Value::Number(if *b { 1.0 } else { 0.0 }).loose_equals(other)
            }
            _ => false,
        }
    }

    pub fn as_number(&self) -> Result<f64, EngineError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(LangError::type_error(format!(
                "Expected a number, got {}",
                other.type_of()
            ))
            .into()),
        }
    }

    /// Render for display in the captured console log. Top-level strings
    /// print bare; nested strings print quoted.
    pub fn render(&self, nested: bool) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => {
                if nested {
                    format!("\"{}\"", s)
                } else {
                    s.clone()
                }
            }
            Value::Object(entries) => {
                let entries = entries.borrow();
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let body = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.render(true)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{ {} }}", body)
            }
            Value::Array(elements) => {
                let body = elements
                    .borrow()
                    .iter()
                    .map(|v| v.render(true))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", body)
            }
            Value::Record(entries) => {
                if entries.is_empty() {
                    return "#{}".to_string();
                }
                let body = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.render(true)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("#{{ {} }}", body)
            }
            Value::Tuple(elements) => {
                let body = elements
                    .iter()
                    .map(|v| v.render(true))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("#[{}]", body)
            }
            Value::Native(f) => format!("[Function: {}]", f.name),
            Value::Closure(_) => "[Function (anonymous)]".to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_not_strictly_equal_to_itself() {
        let nan = Value::Number(f64::NAN);
        assert!(!nan.strict_equals(&nan));
    }

    #[test]
    fn negative_zero_strictly_equals_positive_zero() {
        assert!(Value::Number(-0.0).strict_equals(&Value::Number(0.0)));
    }

    #[test]
    fn composites_compare_by_identity() {
        let a = Value::Record(Rc::new(vec![("a".to_string(), Value::Number(1.0))]));
        let b = Value::Record(Rc::new(vec![("a".to_string(), Value::Number(1.0))]));
        assert!(!a.strict_equals(&b));
        assert!(a.strict_equals(&a.clone()));
    }

    #[test]
    fn render_strings_bare_at_top_level() {
        let v = Value::String("hi".to_string());
        assert_eq!(v.render(false), "hi");
        assert_eq!(v.render(true), "\"hi\"");
    }

    #[test]
    fn render_record_and_tuple() {
        let record = Value::Record(Rc::new(vec![
            ("a".to_string(), Value::Number(1.0)),
            ("b".to_string(), Value::Tuple(Rc::new(vec![Value::Number(-0.0)]))),
        ]));
        assert_eq!(record.render(false), "#{ a: 1, b: #[-0] }");
    }

    #[test]
    fn loose_equality_pairs_null_and_undefined() {
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
    }
}
