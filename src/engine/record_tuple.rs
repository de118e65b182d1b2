//! The injected Record/Tuple polyfill.
//!
//! `Record` and `Tuple` build deeply immutable values; `same_value_zero`
//! is the value-based equality the transform injects for rewritten
//! comparisons: recursively structural over records and tuples,
//! key-order independent, NaN-aware and signed-zero-insensitive.

use std::rc::Rc;

use crate::lang::error::LangError;

use super::value::Value;
use super::EngineError;

/// `Record(obj)` — copy an object's entries into a key-sorted record.
pub fn record_constructor(args: &[Value]) -> Result<Value, EngineError> {
    match args.first() {
        Some(Value::Object(entries)) => {
            let mut out: Vec<(String, Value)> = Vec::new();
            for (key, value) in entries.borrow().iter() {
                check_member(value)?;
                // later duplicate keys win, like object literals
                out.retain(|(k, _)| k != key);
                out.push((key.clone(), value.clone()));
            }
            out.sort_by(|(a, _), (b, _)| a.cmp(b));
            Ok(Value::Record(Rc::new(out)))
        }
        Some(Value::Record(r)) => Ok(Value::Record(r.clone())),
        Some(other) => Err(LangError::type_error(format!(
            "Record constructor expects an object, got {}",
            other.type_of()
        ))
        .into()),
        None => Err(LangError::type_error("Record constructor expects an object").into()),
    }
}

/// `Tuple(...elements)`.
pub fn tuple_constructor(args: &[Value]) -> Result<Value, EngineError> {
    for value in args {
        check_member(value)?;
    }
    Ok(Value::Tuple(Rc::new(args.to_vec())))
}

/// Records and tuples may only hold primitives and other records/tuples.
fn check_member(value: &Value) -> Result<(), EngineError> {
    match value {
        Value::Undefined
        | Value::Null
        | Value::Boolean(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Record(_)
        | Value::Tuple(_) => Ok(()),
        other => Err(LangError::type_error(format!(
            "Record and Tuple may only contain primitives, records and tuples, got {}",
            other.type_of()
        ))
        .into()),
    }
}

/// SameValueZero extended structurally over records and tuples.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::Record(x), Value::Record(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && same_value_zero(va, vb))
        }
        (Value::Tuple(x), Value::Tuple(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(va, vb)| same_value_zero(va, vb))
        }
        _ => a.strict_equals(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, Value)]) -> Value {
        let obj = Value::object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        );
        record_constructor(&[obj]).expect("record")
    }

    fn tuple(elements: &[Value]) -> Value {
        tuple_constructor(elements).expect("tuple")
    }

    #[test]
    fn structurally_equal_records_are_same_value_zero() {
        let a = record(&[("a", Value::Number(1.0))]);
        let b = record(&[("a", Value::Number(1.0))]);
        assert!(!a.strict_equals(&b));
        assert!(same_value_zero(&a, &b));
    }

    #[test]
    fn record_equality_ignores_key_order() {
        let a = record(&[("a", Value::Number(1.0)), ("b", Value::Number(2.0))]);
        let b = record(&[("b", Value::Number(2.0)), ("a", Value::Number(1.0))]);
        assert!(same_value_zero(&a, &b));
    }

    #[test]
    fn nested_records_compare_recursively() {
        let a = record(&[("a", record(&[("b", Value::Number(123.0))]))]);
        let b = record(&[("a", record(&[("b", Value::Number(123.0))]))]);
        assert!(same_value_zero(&a, &b));
        let c = record(&[("a", record(&[("b", Value::Number(124.0))]))]);
        assert!(!same_value_zero(&a, &c));
    }

    #[test]
    fn tuples_with_nan_and_signed_zero() {
        let nan_a = tuple(&[Value::Number(f64::NAN)]);
        let nan_b = tuple(&[Value::Number(f64::NAN)]);
        assert!(same_value_zero(&nan_a, &nan_b));

        let neg = tuple(&[Value::Number(-0.0)]);
        let pos = tuple(&[Value::Number(0.0)]);
        assert!(same_value_zero(&neg, &pos));
    }

    #[test]
    fn bare_nan_is_same_value_zero_to_itself() {
        assert!(same_value_zero(
            &Value::Number(f64::NAN),
            &Value::Number(f64::NAN)
        ));
    }

    #[test]
    fn records_and_tuples_never_equal_each_other() {
        let r = record(&[]);
        let t = tuple(&[]);
        assert!(!same_value_zero(&r, &t));
    }

    #[test]
    fn record_rejects_mutable_members() {
        let obj = Value::object(vec![("a".to_string(), Value::array(vec![]))]);
        let outer = Value::object(vec![("x".to_string(), obj)]);
        let err = record_constructor(&[outer]).unwrap_err();
        assert!(err.to_display().1.contains("TypeError"));
    }

    #[test]
    fn later_duplicate_keys_win_and_keys_sort() {
        let obj = Value::object(vec![
            ("b".to_string(), Value::Number(1.0)),
            ("a".to_string(), Value::Number(2.0)),
            ("b".to_string(), Value::Number(3.0)),
        ]);
        let Value::Record(entries) = record_constructor(&[obj]).expect("record") else {
            panic!("expected record");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(matches!(entries[1].1, Value::Number(n) if n == 3.0));
    }
}
