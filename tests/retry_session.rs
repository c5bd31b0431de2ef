//! Integration test: a full retry session against a scripted flaky transport.
//!
//! Drives the orchestrator, the configured backoff composition, and the
//! output sink contract together the way deployment code uses them: a unit
//! of work that writes captured output per attempt, fails transiently a few
//! times, then succeeds.

use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use rexec::config::RetryConfig;
use rexec::output::{MemorySink, OutputSink};
use rexec::retry::{run_session, ExecError, Retryable};

/// Writes diagnostic output into a sink on every attempt; the first
/// `failures` attempts end with a refused connection after partial output.
struct FlakyStep {
    sink: MemorySink,
    failures: u32,
    attempts: Arc<AtomicU32>,
    releases: Arc<AtomicU32>,
}

impl FlakyStep {
    fn new(failures: u32) -> Self {
        Self {
            sink: MemorySink::new(),
            failures,
            attempts: Arc::new(AtomicU32::new(0)),
            releases: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl Retryable for FlakyStep {
    type Output = String;

    async fn invoke(&mut self) -> Result<String, ExecError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let mut out = self.sink.output_stream()?;

        if attempt <= self.failures {
            // Partial output from a dropped connection.
            write!(out, "starting step (attempt {attempt})...")?;
            return Err(ExecError::Connect {
                endpoint: "root@10.0.0.5:22".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
            });
        }

        writeln!(out, "step completed on attempt {attempt}")?;
        drop(out);
        Ok(self.sink.stdout())
    }

    async fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn flaky_step_recovers_with_clean_output() {
    let step = FlakyStep::new(2);
    let attempts = Arc::clone(&step.attempts);
    let releases = Arc::clone(&step.releases);

    // Tight policy so the test does not sleep noticeably.
    let cfg = RetryConfig {
        max_attempts: 5,
        min_delay_ms: 1,
        max_delay_ms: 4,
        step_ms: 1,
        growth_cap_ms: 4,
    };
    let mut backoff = cfg.backoff();

    let captured = run_session(step, cfg.max_attempts, &mut backoff)
        .await
        .expect("session should recover after transient failures");

    // Earlier attempts' partial output must not leak into the capture.
    assert_eq!(captured, "step completed on attempt 3\n");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fatal_failure_ends_session_after_one_attempt() {
    struct DeniedStep {
        attempts: Arc<AtomicU32>,
        releases: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Retryable for DeniedStep {
        type Output = ();

        async fn invoke(&mut self) -> Result<(), ExecError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(ExecError::Auth("publickey rejected".into()))
        }

        async fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    let attempts = Arc::new(AtomicU32::new(0));
    let releases = Arc::new(AtomicU32::new(0));
    let step = DeniedStep {
        attempts: Arc::clone(&attempts),
        releases: Arc::clone(&releases),
    };

    let mut backoff = RetryConfig::default().backoff();
    let err = run_session(step, 10, &mut backoff).await.unwrap_err();

    assert!(matches!(err, ExecError::Auth(_)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1, "auth failures must not retry");
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_session_surfaces_the_final_error() {
    let step = FlakyStep::new(u32::MAX);
    let attempts = Arc::clone(&step.attempts);
    let releases = Arc::clone(&step.releases);

    let cfg = RetryConfig {
        max_attempts: 3,
        min_delay_ms: 1,
        max_delay_ms: 2,
        step_ms: 1,
        growth_cap_ms: 2,
    };
    let mut backoff = cfg.backoff();

    let err = run_session(step, cfg.max_attempts, &mut backoff)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Connect { .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}
