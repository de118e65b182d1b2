//! Sandboxed executor for transformed programs.
//!
//! `execute` builds a fresh interpreter per invocation — no state survives
//! between runs — and injects exactly the globals the generated code
//! assumes: a console object wired to the capture sink plus the
//! record/tuple polyfill. Every failure is caught here and reported as two
//! entries through the sink's error channel (the message, then the failure
//! value), so program output and execution failure share one log view.

pub mod interp;
pub mod record_tuple;
pub mod value;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::console::{ConsoleSink, Level};
use crate::lang::error::LangError;
use crate::lang::{parser, Dialect};

use interp::Interpreter;
use value::Value;

/// Default per-run step budget. Generous for playground programs, small
/// enough that an infinite loop fails within a frame or two.
pub const FUEL_BUDGET: u64 = 1_000_000;

/// An execution failure: either an engine-raised error or a user `throw`.
pub enum EngineError {
    Lang(LangError),
    Thrown(Value),
}

impl EngineError {
    /// The two console entries a failure turns into: the bare message,
    /// then the failure value's display form.
    pub fn to_display(&self) -> (String, String) {
        match self {
            EngineError::Lang(err) => (err.message.clone(), err.to_string()),
            EngineError::Thrown(value) => {
                let message = match value {
                    Value::String(s) => s.clone(),
                    other => other.render(false),
                };
                (message, value.render(false))
            }
        }
    }
}

impl From<LangError> for EngineError {
    fn from(err: LangError) -> Self {
        EngineError::Lang(err)
    }
}

impl fmt::Debug for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, value) = self.to_display();
        write!(f, "{}", value)
    }
}

/// Run a transformed program against the shared console sink.
pub fn execute(code: &str, sink: &Rc<RefCell<ConsoleSink>>) {
    if let Err(err) = run(code, sink, FUEL_BUDGET) {
        let (message, value) = err.to_display();
        debug!("execution failed: {}", value);
        sink.borrow_mut()
            .push(Level::Error, &[Value::String(message)]);
        sink.borrow_mut().push(Level::Error, &[Value::String(value)]);
    }
}

fn run(code: &str, sink: &Rc<RefCell<ConsoleSink>>, fuel: u64) -> Result<(), EngineError> {
    // Generated code carries no dialect delimiters; the dialect choice
    // here only affects which delimiters would be *accepted*.
    let program = parser::parse(code, Dialect::Hash)?;

    let mut interp = Interpreter::new(fuel);
    install_globals(&mut interp, sink);
    interp.run(&program)
}

/// The execution scope's injected bindings: the virtualized console and
/// the polyfill, passed in explicitly instead of patching any module
/// resolution the generated code might otherwise need.
fn install_globals(interp: &mut Interpreter, sink: &Rc<RefCell<ConsoleSink>>) {
    let console_entries = Level::ALL
        .iter()
        .map(|level| {
            let level = *level;
            let sink = sink.clone();
            (
                level.method_name().to_string(),
                Value::native(level.method_name(), move |args: &[Value]| {
                    sink.borrow_mut().push(level, args);
                    Ok(Value::Undefined)
                }),
            )
        })
        .collect();
    interp.define_global("console", Value::object(console_entries));

    interp.define_global("Record", Value::native("Record", record_tuple::record_constructor));
    interp.define_global("Tuple", Value::native("Tuple", record_tuple::tuple_constructor));
    interp.define_global(
        "sameValueZero",
        Value::native("sameValueZero", |args: &[Value]| {
            let a = args.first().cloned().unwrap_or(Value::Undefined);
            let b = args.get(1).cloned().unwrap_or(Value::Undefined);
            Ok(Value::Boolean(record_tuple::same_value_zero(&a, &b)))
        }),
    );

    interp.define_global("undefined", Value::Undefined);
    interp.define_global("NaN", Value::Number(f64::NAN));
    interp.define_global("Infinity", Value::Number(f64::INFINITY));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ValueKind;

    fn run_code(code: &str) -> Vec<(Level, Vec<String>)> {
        let sink = Rc::new(RefCell::new(ConsoleSink::new()));
        execute(code, &sink);
        let sink = sink.borrow();
        sink.entries()
            .iter()
            .map(|e| {
                (
                    e.level,
                    e.parts.iter().map(|p| p.text.clone()).collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn console_methods_feed_the_sink_in_order() {
        let out = run_code(
            "console.log(\"a\", 1); console.warn(\"w\"); console.info(true);",
        );
        assert_eq!(
            out,
            vec![
                (Level::Log, vec!["a".to_string(), "1".to_string()]),
                (Level::Warn, vec!["w".to_string()]),
                (Level::Info, vec!["true".to_string()]),
            ]
        );
    }

    #[test]
    fn bound_console_methods_keep_working() {
        let out = run_code("const log = console.log; log(\" \");");
        assert_eq!(out, vec![(Level::Log, vec![" ".to_string()])]);
    }

    #[test]
    fn a_throw_produces_exactly_two_error_entries() {
        let out = run_code("console.log(\"before\"); throw \"boom\";");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], (Level::Log, vec!["before".to_string()]));
        assert_eq!(out[1], (Level::Error, vec!["boom".to_string()]));
        assert_eq!(out[2], (Level::Error, vec!["boom".to_string()]));
    }

    #[test]
    fn runtime_errors_report_message_then_value() {
        let out = run_code("missing();");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, Level::Error);
        assert_eq!(out[0].1, vec!["missing is not defined".to_string()]);
        assert_eq!(
            out[1].1,
            vec!["ReferenceError: missing is not defined".to_string()]
        );
    }

    #[test]
    fn syntax_errors_in_generated_code_are_caught_too() {
        let out = run_code("const = ;");
        assert_eq!(out.len(), 2);
        assert!(out[1].1[0].starts_with("SyntaxError"));
    }

    #[test]
    fn infinite_loops_end_with_a_budget_error() {
        let out = run_code("while (true) {}");
        assert_eq!(out.len(), 2);
        assert!(out[1].1[0].starts_with("RangeError"));
    }

    #[test]
    fn no_state_is_retained_between_runs() {
        let sink = Rc::new(RefCell::new(ConsoleSink::new()));
        execute("const x = 1; console.log(x);", &sink);
        sink.borrow_mut().clear();
        // `x` from the previous run must not be visible.
        execute("console.log(typeof x);", &sink);
        let texts: Vec<String> = sink.borrow().entries()[0]
            .parts
            .iter()
            .map(|p| p.text.clone())
            .collect();
        assert_eq!(texts, vec!["undefined".to_string()]);
    }

    #[test]
    fn polyfill_constructors_are_injected() {
        let out = run_code(
            "console.log(Record({ a: 1 }), Tuple(1, 2), sameValueZero(Tuple(NaN), Tuple(NaN)));",
        );
        assert_eq!(
            out,
            vec![(
                Level::Log,
                vec![
                    "#{ a: 1 }".to_string(),
                    "#[1, 2]".to_string(),
                    "true".to_string()
                ]
            )]
        );
    }

    #[test]
    fn literal_and_constructor_forms_behave_alike() {
        let out = run_code(
            "console.log(sameValueZero(#{ a: #[1] }, Record({ a: Tuple(1) })), \
             #{ a: 1 } === Record({ a: 1 }));",
        );
        assert_eq!(
            out,
            vec![(
                Level::Log,
                vec!["true".to_string(), "false".to_string()]
            )]
        );
    }

    #[test]
    fn decoded_entries_carry_display_kinds() {
        let sink = Rc::new(RefCell::new(ConsoleSink::new()));
        execute("console.log(\"s\", 1, true, null, #[1]);", &sink);
        let sink = sink.borrow();
        let kinds: Vec<ValueKind> = sink.entries()[0].parts.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValueKind::String,
                ValueKind::Number,
                ValueKind::Boolean,
                ValueKind::Nullish,
                ValueKind::Composite,
            ]
        );
    }
}
