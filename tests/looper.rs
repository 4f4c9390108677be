//! End-to-end behaviour of the bus → listener → queue → looper path,
//! asserted on the trace stream rather than on thread identities.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use looper::{
    Config, Event, EventBus, Looper, LooperHandle, LooperState, Observe, ProducerPool, TaskError,
    Trace, TraceKind,
};
use rand::Rng;

const WAIT: Duration = Duration::from_secs(5);

/// Records every trace and forwards looper-thread kinds to a channel.
struct Recorder {
    looper_thread: &'static str,
    all: Mutex<Vec<Trace>>,
    tx: Mutex<Sender<TraceKind>>,
}

impl Recorder {
    fn new(looper_thread: &'static str) -> (Arc<Self>, Receiver<TraceKind>) {
        let (tx, rx) = mpsc::channel();
        let rec = Arc::new(Self {
            looper_thread,
            all: Mutex::new(Vec::new()),
            tx: Mutex::new(tx),
        });
        (rec, rx)
    }

    fn looper_kinds(&self) -> Vec<TraceKind> {
        self.all
            .lock()
            .unwrap()
            .iter()
            .filter(|t| &*t.thread == self.looper_thread)
            .map(|t| t.kind)
            .collect()
    }

    fn count(&self, kind: TraceKind) -> usize {
        self.all
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.kind == kind)
            .count()
    }
}

impl Observe for Recorder {
    fn on_trace(&self, trace: &Trace) {
        self.all.lock().unwrap().push(trace.clone());
        if &*trace.thread == self.looper_thread {
            let _ = self.tx.lock().unwrap().send(trace.kind);
        }
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn wait_for(rx: &Receiver<TraceKind>, kind: TraceKind) {
    loop {
        let got = rx.recv_timeout(WAIT).expect("looper stalled");
        if got == kind {
            return;
        }
    }
}

type Recorded = (
    Arc<Looper>,
    Arc<Recorder>,
    Receiver<TraceKind>,
    LooperHandle,
    Arc<EventBus>,
);

fn spawn_recorded(name: &'static str) -> Recorded {
    let (rec, rx) = Recorder::new(name);
    let looper = Looper::builder()
        .with_name(name)
        .with_observer(rec.clone())
        .build();
    let bus = Arc::new(EventBus::new());
    let handle = looper.spawn(&bus).unwrap();
    (looper, rec, rx, handle, bus)
}

#[test]
fn idle_enqueue_run_idle_transitions() {
    let (looper, rec, rx, handle, _bus) = spawn_recorded("looper-transitions");
    wait_for(&rx, TraceKind::Waiting);
    assert_eq!(looper.state(), LooperState::Idle);

    looper.post("X", || Ok(()));
    wait_for(&rx, TraceKind::TaskCompleted);
    wait_for(&rx, TraceKind::Waiting);

    assert_eq!(
        rec.looper_kinds(),
        vec![
            TraceKind::Started,
            TraceKind::QueueEmpty,
            TraceKind::Waiting,
            TraceKind::Woken,
            TraceKind::TaskStarted,
            TraceKind::TaskCompleted,
            TraceKind::QueueEmpty,
            TraceKind::Waiting,
        ]
    );
    handle.shutdown().unwrap();
}

#[test]
fn idle_looper_does_not_spin() {
    let (looper, rec, rx, handle, _bus) = spawn_recorded("looper-idle");
    wait_for(&rx, TraceKind::Waiting);

    let before = rec.looper_kinds().len();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(
        rec.looper_kinds().len(),
        before,
        "idle looper must stay blocked until work arrives"
    );
    assert_eq!(rec.count(TraceKind::Waiting), 1);

    looper.post("wake", || Ok(()));
    wait_for(&rx, TraceKind::TaskCompleted);
    handle.shutdown().unwrap();
}

#[test]
fn one_producer_abc_runs_in_order() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let out_in = Arc::clone(&out);
    let (done_tx, done_rx) = mpsc::channel();
    let looper = Looper::builder()
        .with_name("looper-abc")
        .with_handler(move |ev: &Event| {
            out_in.lock().unwrap().push(ev.label().to_string());
            if ev.label() == "C" {
                let _ = done_tx.send(());
            }
            Ok(())
        })
        .build();
    let bus = Arc::new(EventBus::new());
    let handle = looper.spawn(&bus).unwrap();

    let publisher = {
        let bus = Arc::clone(&bus);
        thread::spawn(move || {
            for label in ["A", "B", "C"] {
                bus.publish(Event::new(label)).unwrap();
            }
        })
    };
    publisher.join().unwrap();

    done_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(*out.lock().unwrap(), vec!["A", "B", "C"]);
    handle.shutdown().unwrap();
}

#[test]
fn two_producers_each_task_runs_exactly_once() {
    const PER_PRODUCER: usize = 200;
    let (tx, rx) = mpsc::channel::<String>();
    let looper = Looper::builder()
        .with_name("looper-two")
        .with_handler(move |ev: &Event| {
            let _ = tx.send(ev.label().to_string());
            Ok(())
        })
        .build();
    let bus = Arc::new(EventBus::new());
    let handle = looper.spawn(&bus).unwrap();

    let publishers: Vec<_> = ["p1", "p2"]
        .into_iter()
        .map(|p| {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    bus.publish(Event::new(format!("{p}:{i}"))).unwrap();
                }
            })
        })
        .collect();
    for p in publishers {
        p.join().unwrap();
    }

    let mut p1 = Vec::new();
    let mut p2 = Vec::new();
    for _ in 0..2 * PER_PRODUCER {
        let label = rx.recv_timeout(WAIT).expect("missing task");
        let (p, i) = label.split_once(':').unwrap();
        let i: usize = i.parse().unwrap();
        match p {
            "p1" => p1.push(i),
            _ => p2.push(i),
        }
    }
    assert!(
        rx.recv_timeout(Duration::from_millis(100)).is_err(),
        "no duplicates"
    );

    let expected: Vec<usize> = (0..PER_PRODUCER).collect();
    assert_eq!(p1, expected, "per-producer order");
    assert_eq!(p2, expected, "per-producer order");
    assert_eq!(looper.stats().executed, (2 * PER_PRODUCER) as u64);
    handle.shutdown().unwrap();
}

#[test]
fn no_lost_wakeup_under_random_interleavings() {
    let mut rng = rand::rng();
    for round in 0..100 {
        let looper = Looper::builder().with_name("looper-race").build();
        let bus = EventBus::new();
        let handle = looper.spawn(&bus).unwrap();

        // race the enqueue against the looper's first transition into wait_for_work
        let delay = Duration::from_micros(rng.random_range(0..300));
        let (tx, rx) = mpsc::channel();
        let poster = {
            let looper = Arc::clone(&looper);
            thread::spawn(move || {
                thread::sleep(delay);
                looper.post("race", move || {
                    let _ = tx.send(());
                    Ok(())
                });
            })
        };

        rx.recv_timeout(WAIT)
            .unwrap_or_else(|_| panic!("round {round}: task stalled after {delay:?}"));
        poster.join().unwrap();
        handle.shutdown().unwrap();
    }
}

#[test]
fn failing_task_does_not_block_later_tasks() {
    let (looper, rec, rx, handle, _bus) = spawn_recorded("looper-fail");
    wait_for(&rx, TraceKind::Waiting);

    looper.post("bad", || Err(TaskError::fail("nope")));
    looper.post("worse", || panic!("task panicked on purpose"));
    looper.post("good", || Ok(()));
    wait_for(&rx, TraceKind::TaskCompleted);

    assert_eq!(rec.count(TraceKind::TaskFailed), 2);
    let reasons: Vec<String> = rec
        .all
        .lock()
        .unwrap()
        .iter()
        .filter(|t| t.kind == TraceKind::TaskFailed)
        .filter_map(|t| t.reason.as_deref().map(str::to_owned))
        .collect();
    assert_eq!(
        reasons,
        vec![
            "execution failed: nope".to_string(),
            "task panicked: task panicked on purpose".to_string()
        ]
    );
    handle.shutdown().unwrap();
}

#[test]
fn hand_off_traces_come_from_the_publisher_thread() {
    let (_looper, rec, rx, handle, bus) = spawn_recorded("looper-handoff");
    wait_for(&rx, TraceKind::Waiting);

    let publisher = {
        let bus = Arc::clone(&bus);
        thread::Builder::new()
            .name("publisher-x".into())
            .spawn(move || bus.publish(Event::new("Thread #1")).unwrap())
            .unwrap()
    };
    publisher.join().unwrap();
    wait_for(&rx, TraceKind::TaskCompleted);

    let handoff: Vec<TraceKind> = rec
        .all
        .lock()
        .unwrap()
        .iter()
        .filter(|t| &*t.thread == "publisher-x")
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        handoff,
        vec![
            TraceKind::EventReceived,
            TraceKind::TaskEnqueued,
            TraceKind::Notified
        ]
    );
    handle.shutdown().unwrap();
}

#[test]
fn producer_pool_feeds_the_looper_until_stopped() {
    let (looper, _rec, rx, handle, bus) = spawn_recorded("looper-pool");
    wait_for(&rx, TraceKind::Waiting);

    let cfg = Config {
        producer_count: 2,
        min_delay_ms: 1,
        max_delay_ms: 10,
    };
    let producers = ProducerPool::spawn(&cfg, Arc::clone(&bus)).unwrap();
    thread::sleep(Duration::from_millis(150));
    let published: u64 = producers.shutdown().unwrap().iter().sum();

    for _ in 0..500 {
        if looper.stats().executed == published {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    let stats = looper.stats();
    assert_eq!(stats.received, published);
    assert_eq!(stats.executed, published);
    assert_eq!(stats.failed, 0);

    handle.shutdown().unwrap();
    wait_for(&rx, TraceKind::Stopped);
    assert_eq!(looper.state(), LooperState::Stopped);
}
