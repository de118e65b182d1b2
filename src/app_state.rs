//! Application state and the edit→transform→execute→observe cycle.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::console::ConsoleSink;
use crate::engine;
use crate::lang::Dialect;
use crate::pipeline::{Pipeline, PipelineState};
use crate::snippets;
use crate::transform::{EqualityMode, TransformOptions};

/// Trailing-edge debounce applied to source edits, in seconds.
pub const EDIT_DEBOUNCE: f64 = 0.5;

/// What the output pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputState {
    Empty,
    /// Transformed program text.
    Code(String),
    /// Transform error text, shown in place of code.
    Error(String),
}

pub struct AppState {
    pub source: String,
    pub dialect: Dialect,
    pub equality: EqualityMode,
    pub output: OutputState,
    /// Bumped whenever the output pane content is replaced, so the view
    /// resets its scroll position to the start.
    pub output_revision: u64,
    /// Shared with the injected console functions; only this struct
    /// clears it.
    pub sink: Rc<RefCell<ConsoleSink>>,
    pub pipeline: Pipeline,
    /// Wall-clock time of the most recent not-yet-flushed edit.
    pub last_edit_time: Option<f64>,
}

impl AppState {
    pub fn new() -> Self {
        let mut state = AppState {
            source: snippets::default_source(Dialect::Hash),
            dialect: Dialect::Hash,
            equality: EqualityMode::Strict,
            output: OutputState::Empty,
            output_revision: 0,
            sink: Rc::new(RefCell::new(ConsoleSink::new())),
            pipeline: Pipeline::spawn(),
            last_edit_time: None,
        };
        // Run the canned example once on startup.
        state.submit();
        state
    }

    fn options(&self) -> TransformOptions {
        TransformOptions {
            dialect: self.dialect,
            equality: self.equality,
        }
    }

    /// Record an edit; the transform is submitted from `tick` once the
    /// debounce window has passed without further edits.
    pub fn on_edit(&mut self, now: f64) {
        self.last_edit_time = Some(now);
    }

    /// Debounce tick, called every frame. Returns true if a transform
    /// was submitted.
    pub fn tick(&mut self, now: f64) -> bool {
        if let Some(last_edit) = self.last_edit_time {
            if now - last_edit > EDIT_DEBOUNCE {
                self.last_edit_time = None;
                self.submit();
                return true;
            }
        }
        false
    }

    /// Switching dialect replaces the buffer with that dialect's canned
    /// example and reruns immediately.
    pub fn set_dialect(&mut self, dialect: Dialect) {
        if self.dialect == dialect {
            return;
        }
        info!("dialect -> {}", dialect.label());
        self.dialect = dialect;
        self.source = snippets::default_source(dialect);
        self.clear_output();
        self.last_edit_time = None;
        self.submit();
    }

    /// Switching equality mode keeps the buffer and reruns immediately.
    pub fn set_equality(&mut self, equality: EqualityMode) {
        if self.equality == equality {
            return;
        }
        info!("equality mode -> {}", equality.label());
        self.equality = equality;
        self.clear_output();
        self.last_edit_time = None;
        self.submit();
    }

    fn clear_output(&mut self) {
        self.output = OutputState::Empty;
        self.output_revision += 1;
        self.sink.borrow_mut().clear();
    }

    fn submit(&mut self) {
        self.pipeline.submit(self.source.clone(), self.options());
    }

    /// Apply the latest transform completion, if one arrived: on failure
    /// show the error text in the output pane with an empty log, on
    /// success show the code and repopulate the log by running it.
    pub fn poll(&mut self) {
        let Some(result) = self.pipeline.poll() else {
            return;
        };
        match result {
            Err(err) => {
                self.output = OutputState::Error(err.to_string());
                self.output_revision += 1;
                self.sink.borrow_mut().clear();
                self.pipeline.state = PipelineState::Failed;
            }
            Ok(code) => {
                self.output = OutputState::Code(code.clone());
                self.output_revision += 1;
                self.sink.borrow_mut().clear();
                self.pipeline.state = PipelineState::Executing;
                engine::execute(&code, &self.sink);
                self.pipeline.state = PipelineState::Idle;
            }
        }
    }

    /// True while a repaint should be scheduled without user input.
    pub fn busy(&self) -> bool {
        self.last_edit_time.is_some() || self.pipeline.state == PipelineState::Transforming
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    fn drain(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            state.poll();
            if state.pipeline.state != PipelineState::Transforming {
                return;
            }
            assert!(Instant::now() < deadline, "pipeline never settled");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn startup_runs_the_hash_example_once() {
        let mut state = AppState::new();
        assert_eq!(state.pipeline.issued(), 1);
        drain(&mut state);
        assert!(matches!(state.output, OutputState::Code(_)));
        // The canned demo logs eleven lines: seven log calls plus four
        // nl() spacers.
        assert_eq!(state.sink.borrow().len(), 11);
    }

    #[test]
    fn rapid_edits_collapse_into_one_transform() {
        let mut state = AppState::new();
        drain(&mut state);
        let before = state.pipeline.issued();

        state.on_edit(10.0);
        assert!(!state.tick(10.1));
        state.on_edit(10.2);
        assert!(!state.tick(10.3));
        state.on_edit(10.4);
        // Still inside the debounce window of the last edit.
        assert!(!state.tick(10.8));
        // Past it now.
        assert!(state.tick(11.0));
        assert_eq!(state.pipeline.issued(), before + 1);
        // No pending edit remains.
        assert!(!state.tick(12.0));
    }

    #[test]
    fn dialect_switch_replaces_source_and_reruns() {
        let mut state = AppState::new();
        drain(&mut state);
        state.source.push_str("\n// scratch");

        state.set_dialect(Dialect::Bar);
        assert_eq!(state.source, snippets::default_source(Dialect::Bar));
        drain(&mut state);
        assert!(matches!(state.output, OutputState::Code(_)));
    }

    #[test]
    fn transform_failure_shows_error_and_empty_log() {
        let mut state = AppState::new();
        drain(&mut state);

        state.source = "const = ;".to_string();
        state.on_edit(0.0);
        state.tick(1.0);
        drain(&mut state);

        assert_eq!(state.pipeline.state, PipelineState::Failed);
        match &state.output {
            OutputState::Error(text) => assert!(text.starts_with("SyntaxError"), "{}", text),
            other => panic!("expected error output, got {:?}", other),
        }
        assert!(state.sink.borrow().is_empty());

        // A failed cycle does not block the next one.
        state.source = snippets::default_source(Dialect::Hash);
        state.on_edit(2.0);
        state.tick(3.0);
        drain(&mut state);
        assert!(matches!(state.output, OutputState::Code(_)));
        assert!(!state.sink.borrow().is_empty());
    }

    #[test]
    fn equality_switch_keeps_source() {
        let mut state = AppState::new();
        drain(&mut state);
        let source = state.source.clone();
        state.set_equality(EqualityMode::SameValueZero);
        assert_eq!(state.source, source);
        drain(&mut state);
        match &state.output {
            OutputState::Code(code) => assert!(code.contains("sameValueZero"), "{}", code),
            other => panic!("expected code output, got {:?}", other),
        }
    }
}
