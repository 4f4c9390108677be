//! # Looper: single-threaded consume loop over a blocking task queue.
//!
//! The [`Looper`] owns a [`TaskQueue`], registers itself as an
//! [`EventBus`] listener that turns each event into a task, and runs an
//! unbounded consume loop on one thread.
//!
//! ## State machine
//! ```text
//!            enqueue / wake                       stop()
//!   ┌──────┐ ───────────────► ┌─────────┐        ┌─────────┐
//!   │ Idle │                  │ Running │ ─────► │ Stopped │
//!   └──────┘ ◄─────────────── └─────────┘        └─────────┘
//!       ▲      queue empty          (also reachable from Idle)
//!       └── initial state
//! ```
//!
//! ## Consume loop
//! ```text
//! emit Started
//! while !token.is_cancelled() {
//!   ├─► dequeue_front()
//!   │     ├─ Some(task) ─► Running: emit TaskStarted
//!   │     │                run_task(task)   (panic/err caught here)
//!   │     │                emit TaskCompleted | TaskFailed
//!   │     └─ None ───────► Idle: emit QueueEmpty, Waiting
//!   │                      wait_for_work()  (condvar, no spinning)
//!   │                      emit Woken, exit if the queue was closed
//! }
//! emit Stopped
//! ```
//!
//! ## Hand-off (on the publisher's thread)
//! ```text
//! bus.publish(ev) ─► LooperListener::on_event(ev)
//!                      ├─► emit EventReceived
//!                      ├─► queue.enqueue(Task(handler(ev)))   (signals)
//!                      ├─► emit TaskEnqueued, Notified
//!                      └─► (queue closed) emit TaskDiscarded
//! ```
//!
//! ## Rules
//! - A looper is started once; it has exactly one consumer thread.
//! - At most one task runs at a time, in queue-append order.
//! - A failing task never ends the loop.
//! - `stop()` lets the running task finish, discards pending ones and wakes an idle looper.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::thread;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::builder::LooperBuilder;
use super::handle::LooperHandle;
use super::runner::run_task;
use crate::error::{ListenerError, RuntimeError, TaskError};
use crate::events::{Event, EventBus, Listener, ListenerRef};
use crate::observers::{ObserverSet, Trace, TraceKind};
use crate::tasks::{Task, TaskQueue, Wake};

/// Work performed on the looper thread for each received event.
pub type EventHandler = Arc<dyn Fn(&Event) -> Result<(), TaskError> + Send + Sync + 'static>;

/// Observable looper state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperState {
    /// Queue empty, thread blocked (or about to block) in `wait_for_work`.
    Idle,
    /// Thread executing a task.
    Running,
    /// Loop exited after a stop request.
    Stopped,
}

impl LooperState {
    fn from_u8(v: u8) -> Self {
        match v {
            IDLE => LooperState::Idle,
            RUNNING => LooperState::Running,
            _ => LooperState::Stopped,
        }
    }
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// Snapshot of looper counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LooperStats {
    /// Events received through the bus listener and queued as tasks.
    pub received: u64,
    /// Tasks executed (successful or not).
    pub executed: u64,
    /// Tasks that returned an error or panicked.
    pub failed: u64,
    /// Tasks currently queued.
    pub pending: usize,
}

/// Single-consumer task loop.
pub struct Looper {
    pub(super) name: Arc<str>,
    pub(super) queue: TaskQueue,
    pub(super) observers: ObserverSet,
    pub(super) handler: EventHandler,
    pub(super) token: CancellationToken,
    started: AtomicBool,
    state: AtomicU8,
    received: AtomicU64,
    executed: AtomicU64,
    failed: AtomicU64,
}

impl Looper {
    pub(super) fn new_internal(
        name: Arc<str>,
        observers: ObserverSet,
        handler: EventHandler,
        token: CancellationToken,
    ) -> Self {
        Self {
            name,
            queue: TaskQueue::new(),
            observers,
            handler,
            token,
            started: AtomicBool::new(false),
            state: AtomicU8::new(IDLE),
            received: AtomicU64::new(0),
            executed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Returns a builder for configuring a looper.
    pub fn builder() -> LooperBuilder {
        LooperBuilder::new()
    }

    /// Name of the looper (and of its dedicated thread when spawned).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers with `bus`, then runs the consume loop on the calling thread until stopped.
    ///
    /// A looper starts once: a second `start` or [`spawn`](Self::spawn)
    /// returns [`RuntimeError::AlreadyStarted`] and registers nothing.
    pub fn start(self: &Arc<Self>, bus: &EventBus) -> Result<(), RuntimeError> {
        self.attach(bus)?;
        self.run();
        Ok(())
    }

    /// Registers with `bus` on the calling thread, then runs the consume loop
    /// on a dedicated thread named after the looper.
    ///
    /// Fails with [`RuntimeError::AlreadyStarted`] if the looper was started before.
    pub fn spawn(self: &Arc<Self>, bus: &EventBus) -> Result<LooperHandle, RuntimeError> {
        self.attach(bus)?;
        let looper = Arc::clone(self);
        let thread = thread::Builder::new()
            .name(self.name.to_string())
            .spawn(move || looper.run())
            .map_err(|source| RuntimeError::Spawn {
                thread: self.name.to_string(),
                source,
            })?;
        Ok(LooperHandle::new(Arc::clone(self), thread))
    }

    /// Enqueues a task directly, bypassing the bus.
    ///
    /// Returns the task id, or `None` if the looper is stopped and the task was dropped.
    pub fn post<F>(&self, label: impl Into<Arc<str>>, job: F) -> Option<u64>
    where
        F: FnOnce() -> Result<(), TaskError> + Send + 'static,
    {
        self.enqueue(Task::new(label, job))
    }

    /// Requests a cooperative stop.
    ///
    /// The running task (if any) finishes; pending tasks are discarded; an
    /// idle looper is woken so it can observe the request. Idempotent.
    pub fn stop(&self) {
        if self.token.is_cancelled() {
            return;
        }
        // close before cancelling: once closed, nothing can be dequeued
        let discarded = self.queue.close();
        self.token.cancel();
        debug!(looper = %self.name, discarded, "stop requested");
    }

    /// True once [`stop`](Self::stop) was requested.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token cancelled by [`stop`](Self::stop).
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Current state.
    pub fn state(&self) -> LooperState {
        LooperState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Snapshot of counters.
    pub fn stats(&self) -> LooperStats {
        LooperStats {
            received: self.received.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            pending: self.queue.len(),
        }
    }

    /// Claims the single start and registers the bus listener.
    fn attach(self: &Arc<Self>, bus: &EventBus) -> Result<(), RuntimeError> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RuntimeError::AlreadyStarted {
                looper: self.name.to_string(),
            });
        }
        let listener: ListenerRef = Arc::new(LooperListener {
            looper: Arc::clone(self),
        });
        bus.register_listener(listener);
        Ok(())
    }

    /// Consume loop; callers guarantee a single running thread via `attach`.
    fn run(&self) {
        self.state.store(IDLE, Ordering::Release);
        self.emit(Trace::new(TraceKind::Started));

        while !self.token.is_cancelled() {
            match self.queue.dequeue_front() {
                Some(task) => self.execute(task),
                None => {
                    if self.idle() == Wake::Closed {
                        break;
                    }
                }
            }
        }

        self.state.store(STOPPED, Ordering::Release);
        self.emit(Trace::new(TraceKind::Stopped).with_pending(self.queue.discarded()));
    }

    fn idle(&self) -> Wake {
        self.state.store(IDLE, Ordering::Release);
        self.emit(Trace::new(TraceKind::QueueEmpty));
        self.emit(Trace::new(TraceKind::Waiting));

        let wake = self.queue.wait_for_work();
        self.emit(Trace::new(TraceKind::Woken).with_pending(self.queue.len()));
        if wake == Wake::Closed {
            debug!(looper = %self.name, "woken by close");
        }
        wake
    }

    fn execute(&self, task: Task) {
        self.state.store(RUNNING, Ordering::Release);
        let id = task.id();
        let label = task.label_arc();
        self.emit(
            Trace::new(TraceKind::TaskStarted)
                .with_task(id)
                .with_event(Arc::clone(&label))
                .with_pending(self.queue.len()),
        );

        let res = run_task(task);
        self.executed.fetch_add(1, Ordering::Relaxed);

        match res {
            Ok(()) => {
                self.emit(
                    Trace::new(TraceKind::TaskCompleted)
                        .with_task(id)
                        .with_event(label),
                );
            }
            Err(err) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    looper = %self.name,
                    task = id,
                    label = %label,
                    error = err.as_label(),
                    "task failed: {}",
                    err.as_message()
                );
                self.emit(
                    Trace::new(TraceKind::TaskFailed)
                        .with_task(id)
                        .with_event(label)
                        .with_reason(err.to_string()),
                );
            }
        }
    }

    fn accept(&self, event: Event) {
        self.emit(Trace::new(TraceKind::EventReceived).with_event(event.label_arc()));

        let handler = Arc::clone(&self.handler);
        let label = event.label_arc();
        if self.enqueue(Task::new(label, move || handler(&event))).is_some() {
            self.received.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn enqueue(&self, task: Task) -> Option<u64> {
        let id = task.id();
        let label = task.label_arc();
        if !self.queue.enqueue(task) {
            self.emit(
                Trace::new(TraceKind::TaskDiscarded)
                    .with_task(id)
                    .with_event(label)
                    .with_reason("looper stopped"),
            );
            return None;
        }
        self.emit(
            Trace::new(TraceKind::TaskEnqueued)
                .with_task(id)
                .with_event(label),
        );
        self.emit(Trace::new(TraceKind::Notified).with_task(id));
        Some(id)
    }

    #[inline]
    fn emit(&self, trace: Trace) {
        self.observers.emit(&trace);
    }
}

/// Bus listener translating events into looper tasks.
struct LooperListener {
    looper: Arc<Looper>,
}

impl Listener for LooperListener {
    fn on_event(&self, event: Event) -> Result<(), ListenerError> {
        self.looper.accept(event);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "looper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::Observe;
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    /// Forwards traces into a channel; with a thread name, only that thread's.
    struct Forward(Mutex<mpsc::Sender<Trace>>, Option<&'static str>);

    impl Observe for Forward {
        fn on_trace(&self, trace: &Trace) {
            if self.1.is_none_or(|name| &*trace.thread == name) {
                let _ = self.0.lock().unwrap().send(trace.clone());
            }
        }
    }

    fn looper_with_forward(name: &'static str) -> (Arc<Looper>, mpsc::Receiver<Trace>) {
        let (tx, rx) = mpsc::channel();
        let looper = Looper::builder()
            .with_name(name)
            .with_observer(Arc::new(Forward(Mutex::new(tx), Some(name))))
            .build();
        (looper, rx)
    }

    fn wait_for(rx: &mpsc::Receiver<Trace>, kind: TraceKind) -> Trace {
        loop {
            let got = rx.recv_timeout(WAIT).expect("looper stalled");
            if got.kind == kind {
                return got;
            }
        }
    }

    #[test]
    fn test_runs_posted_tasks_in_order() {
        let (looper, rx) = looper_with_forward("looper-order");
        let bus = EventBus::new();
        let out = Arc::new(Mutex::new(Vec::new()));

        for name in ["A", "B", "C"] {
            let out = Arc::clone(&out);
            looper.post(name, move || {
                out.lock().unwrap().push(name);
                Ok(())
            });
        }

        let handle = looper.spawn(&bus).unwrap();
        wait_for(&rx, TraceKind::Waiting);

        assert_eq!(*out.lock().unwrap(), vec!["A", "B", "C"]);
        assert_eq!(looper.state(), LooperState::Idle);
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_failing_tasks_do_not_stop_the_loop() {
        let (looper, rx) = looper_with_forward("looper-failures");
        let bus = EventBus::new();

        looper.post("err", || Err(TaskError::fail("boom")));
        looper.post("panic", || panic!("task exploded"));
        let (done_tx, done_rx) = mpsc::channel();
        looper.post("ok", move || {
            done_tx.send(()).unwrap();
            Ok(())
        });

        // all three are queued before the loop starts, so the first Waiting follows the last of them
        let handle = looper.spawn(&bus).unwrap();
        done_rx.recv_timeout(WAIT).expect("task after failures must run");
        wait_for(&rx, TraceKind::Waiting);

        let stats = looper.stats();
        assert_eq!(stats.executed, 3);
        assert_eq!(stats.failed, 2);
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_bus_events_become_tasks() {
        let handled = Arc::new(Mutex::new(Vec::new()));
        let handled_in = Arc::clone(&handled);
        let looper = Looper::builder()
            .with_name("looper-bus")
            .with_handler(move |ev: &Event| {
                handled_in.lock().unwrap().push(ev.label().to_string());
                Ok(())
            })
            .build();
        let bus = EventBus::new();
        let handle = looper.spawn(&bus).unwrap();
        assert_eq!(bus.len(), 1);

        bus.publish(Event::new("Thread #1")).unwrap();
        bus.publish(Event::new("Thread #2")).unwrap();

        for _ in 0..500 {
            if looper.stats().executed == 2 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(*handled.lock().unwrap(), vec!["Thread #1", "Thread #2"]);
        assert_eq!(looper.stats().received, 2);
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_second_spawn_is_rejected() {
        let (tx, rx) = mpsc::channel();
        let looper = Looper::builder()
            .with_name("looper-twice")
            .with_handler(move |ev: &Event| {
                let _ = tx.send(ev.label().to_string());
                Ok(())
            })
            .build();
        let bus = EventBus::new();
        let handle = looper.spawn(&bus).unwrap();

        let err = looper.spawn(&bus).err().expect("second spawn must fail");
        assert!(matches!(
            err,
            RuntimeError::AlreadyStarted { ref looper } if looper == "looper-twice"
        ));
        assert!(matches!(
            looper.start(&bus),
            Err(RuntimeError::AlreadyStarted { .. })
        ));
        assert_eq!(bus.len(), 1, "rejected starts register nothing");

        bus.publish(Event::new("one")).unwrap();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), "one");
        assert!(
            rx.recv_timeout(Duration::from_millis(100)).is_err(),
            "one publish, one execution"
        );
        assert_eq!(looper.stats().executed, 1);
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_stop_wakes_idle_looper() {
        let (looper, rx) = looper_with_forward("looper-stop");
        let bus = EventBus::new();
        let handle = looper.spawn(&bus).unwrap();
        wait_for(&rx, TraceKind::Waiting);

        handle.stop();
        let stopped = wait_for(&rx, TraceKind::Stopped);
        assert_eq!(stopped.pending, Some(0));
        handle.join().unwrap();
        assert_eq!(looper.state(), LooperState::Stopped);
        assert!(looper.is_stopped());
    }

    #[test]
    fn test_stop_reports_discarded_tasks() {
        const QUEUED: usize = 4;
        let (looper, rx) = looper_with_forward("looper-discard");
        let bus = EventBus::new();

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        looper.post("blocker", move || {
            entered_tx.send(()).unwrap();
            let _ = release_rx.recv_timeout(WAIT);
            Ok(())
        });
        let ran = Arc::new(AtomicU64::new(0));
        for i in 0..QUEUED {
            let ran = Arc::clone(&ran);
            looper.post(format!("queued-{i}"), move || {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        let handle = looper.spawn(&bus).unwrap();
        entered_rx.recv_timeout(WAIT).expect("blocker must start");
        looper.stop();
        release_tx.send(()).unwrap();

        let stopped = wait_for(&rx, TraceKind::Stopped);
        handle.join().unwrap();
        assert_eq!(stopped.pending, Some(QUEUED));
        assert_eq!(ran.load(Ordering::SeqCst), 0, "discarded tasks never run");
        assert_eq!(looper.stats().executed, 1);
    }

    #[test]
    fn test_hand_off_after_stop_is_reported_as_discarded() {
        let (tx, rx) = mpsc::channel();
        let looper = Looper::builder()
            .with_name("looper-late")
            .with_observer(Arc::new(Forward(Mutex::new(tx), None)))
            .build();
        let bus = EventBus::new();
        looper.spawn(&bus).unwrap().shutdown().unwrap();
        while rx.try_recv().is_ok() {}

        bus.publish(Event::new("late")).unwrap();
        assert_eq!(looper.post("later", || Ok(())), None);

        let kinds: Vec<TraceKind> = rx.try_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TraceKind::EventReceived,
                TraceKind::TaskDiscarded,
                TraceKind::TaskDiscarded
            ]
        );
        let stats = looper.stats();
        assert_eq!(stats.received, 0);
        assert_eq!(stats.executed, 0);
    }

    #[test]
    fn test_stop_before_run_exits_immediately() {
        let looper = Looper::builder().build();
        assert!(looper.post("never", || Ok(())).is_some());
        looper.stop();
        looper.run();

        assert_eq!(looper.state(), LooperState::Stopped);
        assert_eq!(looper.stats().executed, 0);
        assert_eq!(looper.stats().pending, 0);
        assert_eq!(looper.queue.discarded(), 1);
    }
}
