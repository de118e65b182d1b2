//! Console capture sink.
//!
//! The executor's virtualized console appends here; the orchestrator is
//! the only code allowed to clear it between cycles. Arguments are
//! decoded into display form at capture time so entries never hold live
//! runtime values. No forwarding to a real console, no dedup, no cap.

use crate::engine::value::Value;

/// The virtualized console channels, in the order the console object
/// exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Warn,
    Error,
    Info,
    Debug,
    Command,
    Result,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Log,
        Level::Warn,
        Level::Error,
        Level::Info,
        Level::Debug,
        Level::Command,
        Level::Result,
    ];

    pub fn method_name(&self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Command => "command",
            Level::Result => "result",
        }
    }
}

/// Display type of a decoded argument, used for log coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Nullish,
    Composite,
    Function,
}

/// One decoded console argument.
#[derive(Debug, Clone, PartialEq)]
pub struct LogValue {
    pub kind: ValueKind,
    pub text: String,
}

impl LogValue {
    fn decode(value: &Value) -> Self {
        let kind = match value {
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Undefined | Value::Null => ValueKind::Nullish,
            Value::Object(_) | Value::Array(_) | Value::Record(_) | Value::Tuple(_) => {
                ValueKind::Composite
            }
            Value::Native(_) | Value::Closure(_) => ValueKind::Function,
        };
        LogValue {
            kind,
            text: value.render(false),
        }
    }
}

/// One captured console call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub parts: Vec<LogValue>,
}

/// Ordered, append-only log of one execution cycle.
#[derive(Default)]
pub struct ConsoleSink {
    entries: Vec<LogEntry>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        ConsoleSink::default()
    }

    pub fn push(&mut self, level: Level, args: &[Value]) {
        self.entries.push(LogEntry {
            level,
            parts: args.iter().map(LogValue::decode).collect(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_call_order_within_a_cycle() {
        let mut sink = ConsoleSink::new();
        sink.push(Level::Log, &[Value::Number(1.0)]);
        sink.push(Level::Error, &[Value::Number(2.0)]);
        sink.push(Level::Log, &[Value::Number(3.0)]);
        let texts: Vec<&str> = sink
            .entries()
            .iter()
            .map(|e| e.parts[0].text.as_str())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn clear_empties_without_replacing() {
        let mut sink = ConsoleSink::new();
        sink.push(Level::Log, &[Value::Boolean(true)]);
        sink.clear();
        assert!(sink.is_empty());
        sink.push(Level::Info, &[]);
        assert_eq!(sink.len(), 1);
        assert!(sink.entries()[0].parts.is_empty());
    }

    #[test]
    fn decodes_each_argument_separately() {
        let mut sink = ConsoleSink::new();
        sink.push(
            Level::Log,
            &[Value::String("simple".to_string()), Value::Boolean(false)],
        );
        let entry = &sink.entries()[0];
        assert_eq!(entry.parts.len(), 2);
        assert_eq!(entry.parts[0].kind, ValueKind::String);
        assert_eq!(entry.parts[0].text, "simple");
        assert_eq!(entry.parts[1].kind, ValueKind::Boolean);
    }
}
