use std::cell::RefCell;
use std::rc::Rc;

use map_metrics::error::{new_error, Error, ErrorKind};
use map_metrics::{CounterSource, SampleTick};
use map_muscle2::*;

/// What the fake library reports; shared so tests can move it on between
/// samples while the plugin owns the source.
#[derive(Debug, Default)]
struct State {
    counters: [u64; MuscleCounter::COUNT],
    active: Option<ActiveCall>,
    fail: bool,
    reads: usize,
}

#[derive(Debug, Clone, Default)]
struct Fake(Rc<RefCell<State>>);

impl Fake {
    fn add(&self, counter: MuscleCounter, by: u64) {
        self.0.borrow_mut().counters[usize::from(counter)] += by;
    }

    fn set(&self, counter: MuscleCounter, value: u64) {
        self.0.borrow_mut().counters[usize::from(counter)] = value;
    }

    fn set_active(&self, call: Option<ActiveCall>) {
        self.0.borrow_mut().active = call;
    }

    fn set_fail(&self, fail: bool) {
        self.0.borrow_mut().fail = fail;
    }

    fn reads(&self) -> usize {
        self.0.borrow().reads
    }
}

impl CounterSource<{ MuscleCounter::COUNT }> for Fake {
    fn read(&mut self) -> Result<[u64; MuscleCounter::COUNT], Error> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            return Err(new_error(ErrorKind::ReadFailed));
        }
        state.reads += 1;
        Ok(state.counters)
    }
}

impl MuscleSource for Fake {
    fn active_call(&mut self) -> Option<ActiveCall> {
        self.0.borrow().active
    }
}

fn tick(sec: i64, nsec: i64) -> SampleTick {
    SampleTick::new(sec, nsec)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_counts_per_sample() {
    let fake = Fake::default();
    fake.add(MuscleCounter::SendCalls, 3);
    fake.add(MuscleCounter::SendSize, 4096);

    let mut plugin = Muscle2Plugin::new(fake.clone());
    assert_eq!(plugin.count(tick(1, 0), MuscleCounter::SendCalls).unwrap(), 0);
    assert_eq!(plugin.count(tick(1, 0), MuscleCounter::SendSize).unwrap(), 0);

    fake.add(MuscleCounter::SendCalls, 2);
    fake.add(MuscleCounter::SendSize, 1000);
    fake.add(MuscleCounter::BarrierCalls, 1);

    let t = tick(2, 0);
    assert_eq!(plugin.count(t, MuscleCounter::SendCalls).unwrap(), 2);
    assert_eq!(plugin.count(t, MuscleCounter::SendSize).unwrap(), 1000);
    assert_eq!(plugin.count(t, MuscleCounter::BarrierCalls).unwrap(), 1);
    assert_eq!(plugin.count(t, MuscleCounter::ReceiveSize).unwrap(), 0);

    // Eleven accessors share a sample; the library is read once per sample
    assert_eq!(fake.reads(), 2);
}

#[test]
fn test_seconds_per_call() {
    let fake = Fake::default();
    let mut plugin = Muscle2Plugin::new(fake.clone());
    plugin.sample(tick(1, 0)).unwrap();

    fake.add(MuscleCounter::ReceiveCalls, 4);
    fake.add(MuscleCounter::ReceiveDuration, 2_000_000_000);

    let t = tick(2, 0);
    assert_eq!(plugin.count(t, MuscleCounter::ReceiveCalls).unwrap(), 4);
    assert_close(plugin.seconds_per_call(t, CallKind::Receive).unwrap(), 0.5);
    assert_close(plugin.cumulative_seconds(t, CallKind::Receive).unwrap(), 2.0);

    // No sends happened
    assert_eq!(plugin.seconds_per_call(t, CallKind::Send).unwrap(), 0.0);

    // A quiet sample reports zero per call but keeps the cumulative time
    let t = tick(3, 0);
    assert_eq!(plugin.seconds_per_call(t, CallKind::Receive).unwrap(), 0.0);
    assert_close(plugin.cumulative_seconds(t, CallKind::Receive).unwrap(), 2.0);
}

#[test]
fn test_call_in_progress() {
    let fake = Fake::default();
    let mut plugin = Muscle2Plugin::new(fake.clone());
    plugin.sample(tick(1, 0)).unwrap();

    fake.add(MuscleCounter::BarrierCalls, 1);
    fake.add(MuscleCounter::BarrierDuration, 250_000_000);
    plugin.sample(tick(2, 0)).unwrap();

    // A barrier entered at 2.5s is still waiting at the 4s sample
    fake.set_active(Some(ActiveCall {
        kind: CallKind::Barrier,
        started: tick(2, 500_000_000),
    }));

    let t = tick(4, 0);
    assert_close(plugin.seconds_per_call(t, CallKind::Barrier).unwrap(), 1.5);
    assert_close(plugin.cumulative_seconds(t, CallKind::Barrier).unwrap(), 1.75);

    // Other call kinds are unaffected
    assert_eq!(plugin.seconds_per_call(t, CallKind::Send).unwrap(), 0.0);
    assert_eq!(plugin.cumulative_seconds(t, CallKind::Send).unwrap(), 0.0);

    // The barrier returns; its duration lands in the counter
    fake.set_active(None);
    fake.add(MuscleCounter::BarrierCalls, 1);
    fake.add(MuscleCounter::BarrierDuration, 2_000_000_000);

    let t = tick(5, 0);
    assert_close(plugin.seconds_per_call(t, CallKind::Barrier).unwrap(), 2.0);
    assert_close(plugin.cumulative_seconds(t, CallKind::Barrier).unwrap(), 2.25);
}

#[test]
fn test_in_call_state_is_sampled_with_counters() {
    let fake = Fake::default();
    let mut plugin = Muscle2Plugin::new(fake.clone());

    let t = tick(1, 0);
    assert_eq!(plugin.seconds_per_call(t, CallKind::Send).unwrap(), 0.0);

    // A call starting after the sample was read does not change its answers
    fake.set_active(Some(ActiveCall {
        kind: CallKind::Send,
        started: tick(0, 0),
    }));
    assert_eq!(plugin.seconds_per_call(t, CallKind::Send).unwrap(), 0.0);
    assert_eq!(fake.reads(), 1);
}

#[test]
fn test_read_failure() {
    let fake = Fake::default();
    let mut plugin = Muscle2Plugin::new(fake.clone());
    plugin.sample(tick(1, 0)).unwrap();

    fake.set_fail(true);
    fake.set_active(Some(ActiveCall {
        kind: CallKind::Send,
        started: tick(1, 0),
    }));

    let err = plugin.count(tick(2, 0), MuscleCounter::SendCalls).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ReadFailed);

    // Nothing from the failed read is kept, and the tick is read again
    fake.set_fail(false);
    fake.set_active(None);
    fake.add(MuscleCounter::SendCalls, 1);
    assert_eq!(plugin.count(tick(2, 0), MuscleCounter::SendCalls).unwrap(), 1);
    assert_eq!(plugin.seconds_per_call(tick(2, 0), CallKind::Send).unwrap(), 0.0);
}

#[test]
fn test_regressed_read_keeps_previous_call_state() {
    let fake = Fake::default();
    fake.add(MuscleCounter::SendCalls, 5);

    let mut plugin = Muscle2Plugin::new(fake.clone());
    plugin.sample(tick(1, 0)).unwrap();
    plugin.sample(tick(2, 0)).unwrap();

    // The counter restarts while a send is running; the snapshot is rejected
    fake.set(MuscleCounter::SendCalls, 1);
    fake.set_active(Some(ActiveCall {
        kind: CallKind::Send,
        started: tick(0, 0),
    }));

    let err = plugin.sample(tick(3, 0)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::CounterRegressed);

    // Answers for the last accepted sample are unchanged
    assert_eq!(plugin.seconds_per_call(tick(2, 0), CallKind::Send).unwrap(), 0.0);
    assert_eq!(plugin.cumulative_seconds(tick(2, 0), CallKind::Send).unwrap(), 0.0);
    assert_eq!(fake.reads(), 3);
}
