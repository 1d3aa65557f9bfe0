use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
};

/// The two server-backed lists on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Searches,
    Records,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Searches => "searches",
            ListKind::Records => "records",
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coalescing single-flight gate.
///
/// At most one run is in flight. Calls arriving meanwhile collapse into a
/// single follow-up run once the current one finishes, so the final run
/// always starts after the latest call.
#[derive(Debug, Default)]
pub struct SingleFlight {
    running: AtomicBool,
    pending: AtomicBool,
}

/// Clears `running` even if the run is dropped halfway.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request a run of `task`. Returns `true` if this call drove the
    /// run(s), `false` if it was folded into one already in flight.
    pub async fn run<F, Fut>(&self, mut task: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.pending.store(true, Ordering::Release);

        let mut drove = false;
        loop {
            if self
                .running
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return drove;
            }
            drove = true;

            {
                let _guard = RunningGuard(&self.running);
                while self.pending.swap(false, Ordering::AcqRel) {
                    task().await;
                }
            }

            // A request may have landed between the last swap and the release.
            if !self.pending.load(Ordering::Acquire) {
                return drove;
            }
        }
    }
}
