//! # Producer threads publishing synthetic events.
//!
//! Each producer is a named OS thread (`producer-1`, `producer-2`, ...) that
//! loops until stopped:
//!
//! ```text
//! while !token.is_cancelled() {
//!   ├─► bus.publish(Event("Thread #i"))     (listeners run on this thread)
//!   │     └─ Err(ListenerError) ─► log, exit with error
//!   └─► park for random delay in [min, max) ms   (unparked early by stop())
//! }
//! ```
//!
//! Stopping cancels the shared token and unparks every producer, so a
//! sleeping producer exits without finishing its delay.

use std::ops::Range;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{ListenerError, RuntimeError};
use crate::events::{Event, EventBus};

struct Producer {
    name: String,
    thread: JoinHandle<Result<u64, ListenerError>>,
}

/// Group of producer threads sharing one stop token.
pub struct ProducerPool {
    producers: Vec<Producer>,
    token: CancellationToken,
}

impl ProducerPool {
    /// Validates `cfg` and starts `cfg.producer_count` producers publishing on `bus`.
    ///
    /// If a thread cannot be spawned, the producers started so far are stopped
    /// and joined before the error is returned.
    pub fn spawn(cfg: &Config, bus: Arc<EventBus>) -> Result<Self, RuntimeError> {
        cfg.validate()?;

        let mut pool = Self {
            producers: Vec::with_capacity(cfg.producer_count),
            token: CancellationToken::new(),
        };

        for index in 1..=cfg.producer_count {
            let name = format!("producer-{index}");
            let bus = Arc::clone(&bus);
            let token = pool.token.clone();
            let delays = cfg.delay_range();

            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn(move || produce(index, &bus, delays, &token));

            match spawned {
                Ok(thread) => pool.producers.push(Producer { name, thread }),
                Err(source) => {
                    let _ = pool.shutdown();
                    return Err(RuntimeError::Spawn {
                        thread: name,
                        source,
                    });
                }
            }
        }
        Ok(pool)
    }

    /// Number of producer threads.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// True if the pool has no producers.
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Token shared by all producers.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Requests all producers to stop and wakes sleeping ones.
    pub fn stop(&self) {
        self.token.cancel();
        for p in &self.producers {
            p.thread.thread().unpark();
        }
    }

    /// Waits for every producer; returns the number of events each published.
    ///
    /// All threads are joined even if one failed; the first failure is returned.
    pub fn join(self) -> Result<Vec<u64>, RuntimeError> {
        let mut counts = Vec::with_capacity(self.producers.len());
        let mut first_err = None;

        for Producer { name, thread } in self.producers {
            match thread.join() {
                Ok(Ok(published)) => counts.push(published),
                Ok(Err(source)) => {
                    first_err.get_or_insert(RuntimeError::ProducerFailed {
                        thread: name,
                        source,
                    });
                }
                Err(_) => {
                    first_err.get_or_insert(RuntimeError::ThreadPanicked { thread: name });
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(counts),
        }
    }

    /// Stops all producers and waits for them.
    pub fn shutdown(self) -> Result<Vec<u64>, RuntimeError> {
        self.stop();
        self.join()
    }
}

fn produce(
    index: usize,
    bus: &EventBus,
    delays: Range<u64>,
    token: &CancellationToken,
) -> Result<u64, ListenerError> {
    let label: Arc<str> = format!("Thread #{index}").into();
    let mut rng = rand::rng();
    let mut published = 0_u64;

    while !token.is_cancelled() {
        let event = Event::new(Arc::clone(&label));
        debug!(seq = event.seq, "sending event");
        if let Err(err) = bus.publish(event) {
            error!(error = err.as_label(), "listener failed, producer stops: {err}");
            return Err(err);
        }
        published += 1;

        let delay = Duration::from_millis(rng.random_range(delays.clone()));
        sleep_unless_stopped(delay, token);
    }

    debug!(published, "producer stopped");
    Ok(published)
}

/// Parks the current thread for `delay`, returning early once `token` is cancelled.
///
/// `park_timeout` may return spuriously, so the deadline is re-checked.
fn sleep_unless_stopped(delay: Duration, token: &CancellationToken) {
    let deadline = Instant::now() + delay;
    while !token.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::park_timeout(deadline - now);
    }
}
