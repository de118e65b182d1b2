//! Transform pipeline: a long-lived worker thread runs the transform off
//! the UI thread; results come back over a channel and are gated by a
//! sequence number so a superseded request can never overwrite a newer
//! one, whatever order the completions arrive in.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use log::{debug, info, warn};

use crate::lang::error::LangError;
use crate::transform::{transform, TransformOptions};

/// Orchestrator states. `Executing` is only observable for the duration
/// of one synchronous fuel-bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Transforming,
    Executing,
    Failed,
}

impl PipelineState {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Transforming => "transforming",
            PipelineState::Executing => "executing",
            PipelineState::Failed => "failed",
        }
    }
}

struct TransformJob {
    seq: u64,
    source: String,
    options: TransformOptions,
}

struct TransformDone {
    seq: u64,
    result: Result<String, LangError>,
}

pub struct Pipeline {
    job_tx: Sender<TransformJob>,
    done_rx: Receiver<TransformDone>,
    latest_seq: u64,
    pub state: PipelineState,
}

impl Pipeline {
    /// Spawn the worker thread. It exits when the job channel closes.
    pub fn spawn() -> Self {
        let (job_tx, job_rx) = channel::<TransformJob>();
        let (done_tx, done_rx) = channel::<TransformDone>();

        thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                debug!("transforming request #{}", job.seq);
                let result = transform(&job.source, &job.options);
                if done_tx
                    .send(TransformDone {
                        seq: job.seq,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Pipeline {
            job_tx,
            done_rx,
            latest_seq: 0,
            state: PipelineState::Idle,
        }
    }

    /// Queue a transform of the given source. Any outstanding request is
    /// superseded: its completion will be discarded on arrival.
    pub fn submit(&mut self, source: String, options: TransformOptions) {
        self.latest_seq += 1;
        self.state = PipelineState::Transforming;
        info!("submitting transform #{}", self.latest_seq);
        let job = TransformJob {
            seq: self.latest_seq,
            source,
            options,
        };
        if self.job_tx.send(job).is_err() {
            warn!("transform worker is gone");
            self.state = PipelineState::Failed;
        }
    }

    /// Number of requests issued so far.
    pub fn issued(&self) -> u64 {
        self.latest_seq
    }

    /// Non-blocking poll: returns the completion of the *latest* request
    /// if it has arrived; completions of superseded requests are dropped
    /// without touching anything.
    pub fn poll(&mut self) -> Option<Result<String, LangError>> {
        let mut latest = None;
        while let Ok(done) = self.done_rx.try_recv() {
            if done.seq == self.latest_seq {
                latest = Some(done.result);
            } else {
                debug!("discarding stale transform #{}", done.seq);
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Dialect;
    use crate::transform::EqualityMode;
    use std::time::{Duration, Instant};

    fn options() -> TransformOptions {
        TransformOptions {
            dialect: Dialect::Hash,
            equality: EqualityMode::Strict,
        }
    }

    fn wait_for(pipeline: &mut Pipeline) -> Result<String, LangError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = pipeline.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "transform never completed");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn transform_round_trips_through_the_worker() {
        let mut pipeline = Pipeline::spawn();
        pipeline.submit("const r = #{ a: 1 };".to_string(), options());
        let code = wait_for(&mut pipeline).expect("transform ok");
        assert!(code.contains("Record({ a: 1 })"));
    }

    #[test]
    fn errors_come_back_as_errors() {
        let mut pipeline = Pipeline::spawn();
        pipeline.submit("const = ;".to_string(), options());
        let err = wait_for(&mut pipeline).unwrap_err();
        assert!(err.to_string().starts_with("SyntaxError"));
    }

    #[test]
    fn only_the_latest_submission_wins() {
        let mut pipeline = Pipeline::spawn();
        pipeline.submit("const a = 1;".to_string(), options());
        pipeline.submit("const b = 2;".to_string(), options());
        assert_eq!(pipeline.issued(), 2);
        let code = wait_for(&mut pipeline).expect("transform ok");
        assert!(code.contains("const b = 2;"), "{}", code);
        // Nothing further arrives for the superseded request.
        assert!(pipeline.poll().is_none());
    }
}
