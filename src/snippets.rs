//! Canned example programs, one per dialect.
//!
//! Loaded into the source buffer on startup and whenever the dialect
//! changes; each must transform cleanly under its own dialect option,
//! which the tests below pin down.

use crate::lang::Dialect;

const PREFIX: &str = r##"import { Record, Tuple } from "record-and-tuple-polyfill";
const log = console.log;
const nl = () => log(" ");
"##;

const HASH_BODY: &str = r##"
const record = #{ prop: 1 };
const tuple = #[1, 2, 3];

// Simple Equality
log("simple",
    #{ a: 1 } === #{ a: 1 },
    #[1] === #[1]);

nl();

// Nested Equality
log("nested", #{ a: #{ b: 123 } } === #{ a: #{ b: 123 } });

nl();

// Order Independent
log("!order", #{ a: 1, b: 2 } === #{ b: 2, a: 1 });

nl();

// -0, +0
log("-0 === +0", -0 === +0);
log("#[-0] === #[+0]", #[-0] === #[+0]);

nl();

// NaN
log("NaN === NaN", NaN === NaN);
log("#[NaN] === #[NaN]", #[NaN] === #[NaN]);
"##;

const BAR_BODY: &str = r##"
const record = {| prop: 1 |};
const tuple = [|1, 2, 3|];

// Simple Equality
log("simple",
    {| a: 1 |} === {| a: 1 |},
    [|1|] === [|1|]);

nl();

// Nested Equality
log("nested", {| a: {| b: 123 |} |} === {| a: {| b: 123 |} |});

nl();

// Order Independent
log("!order", {| a: 1, b: 2 |} === {| b: 2, a: 1 |});

nl();

// -0, +0
log("-0 === +0", -0 === +0);
log("[|-0|] === [|+0|]", [|-0|] === [|+0|]);

nl();

// NaN
log("NaN === NaN", NaN === NaN);
log("[|NaN|] === [|NaN|]", [|NaN|] === [|NaN|]);
"##;

/// Default program text for a dialect.
pub fn default_source(dialect: Dialect) -> String {
    match dialect {
        Dialect::Hash => format!("{}{}", PREFIX, HASH_BODY),
        Dialect::Bar => format!("{}{}", PREFIX, BAR_BODY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{transform, EqualityMode, TransformOptions};

    #[test]
    fn each_canned_example_transforms_under_its_own_dialect() {
        for dialect in [Dialect::Hash, Dialect::Bar] {
            for equality in [
                EqualityMode::Strict,
                EqualityMode::SameValueZero,
                EqualityMode::Off,
            ] {
                let source = default_source(dialect);
                let options = TransformOptions { dialect, equality };
                let result = transform(&source, &options);
                assert!(
                    result.is_ok(),
                    "{:?}/{:?}: {}",
                    dialect,
                    equality,
                    result.unwrap_err()
                );
            }
        }
    }

    #[test]
    fn canned_examples_fail_under_the_other_dialect() {
        let hash = default_source(Dialect::Hash);
        let options = TransformOptions {
            dialect: Dialect::Bar,
            equality: EqualityMode::Strict,
        };
        assert!(transform(&hash, &options).is_err());
    }

    #[test]
    fn hash_example_keeps_its_quote_hash_lines() {
        // `"#` inside the literal must survive the string delimiters.
        let source = default_source(Dialect::Hash);
        assert!(source.contains("log(\"#[-0] === #[+0]\", #[-0] === #[+0]);"));
        assert!(source.contains("log(\"#[NaN] === #[NaN]\", #[NaN] === #[NaN]);"));
    }

    // ── Full transform → execute cycle over the canned examples ──

    fn run_example(dialect: Dialect, equality: EqualityMode) -> Vec<Vec<String>> {
        use crate::console::ConsoleSink;
        use std::cell::RefCell;
        use std::rc::Rc;

        let source = default_source(dialect);
        let code =
            transform(&source, &TransformOptions { dialect, equality }).expect("transform");
        let sink = Rc::new(RefCell::new(ConsoleSink::new()));
        crate::engine::execute(&code, &sink);
        let sink = sink.borrow();
        sink.entries()
            .iter()
            .map(|e| e.parts.iter().map(|p| p.text.clone()).collect())
            .collect()
    }

    #[test]
    fn strict_mode_logs_false_for_structurally_equal_literals() {
        for dialect in [Dialect::Hash, Dialect::Bar] {
            let out = run_example(dialect, EqualityMode::Strict);
            let texts: Vec<Vec<&str>> = out
                .iter()
                .map(|e| e.iter().map(String::as_str).collect())
                .collect();
            assert_eq!(texts.len(), 11, "{:?}", dialect);
            assert_eq!(texts[0][0], "simple");
            assert_eq!(texts[0][1..], ["false", "false"]);
            assert_eq!(texts[2][1], "false"); // nested
            assert_eq!(texts[4][1], "false"); // key order
            assert_eq!(texts[6][1], "true"); // bare -0 === +0
            assert_eq!(texts[7][1], "false"); // boxed zeros compare by identity
            assert_eq!(texts[9][1], "false"); // bare NaN === NaN
            assert_eq!(texts[10][1], "false"); // boxed NaN
        }
    }

    #[test]
    fn same_value_zero_mode_logs_true_across_the_board() {
        for dialect in [Dialect::Hash, Dialect::Bar] {
            let out = run_example(dialect, EqualityMode::SameValueZero);
            let texts: Vec<Vec<&str>> = out
                .iter()
                .map(|e| e.iter().map(String::as_str).collect())
                .collect();
            assert_eq!(texts.len(), 11, "{:?}", dialect);
            assert_eq!(texts[0][1..], ["true", "true"]);
            assert_eq!(texts[2][1], "true"); // nested
            assert_eq!(texts[4][1], "true"); // key order
            assert_eq!(texts[6][1], "true"); // -0 and +0 are same-value-zero
            assert_eq!(texts[7][1], "true"); // boxed zeros too
            assert_eq!(texts[9][1], "true"); // NaN is same-value-zero to itself
            assert_eq!(texts[10][1], "true"); // boxed NaN too
        }
    }

    #[test]
    fn off_mode_logs_the_same_values_as_strict() {
        assert_eq!(
            run_example(Dialect::Hash, EqualityMode::Off),
            run_example(Dialect::Hash, EqualityMode::Strict)
        );
    }
}
