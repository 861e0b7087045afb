use map_metrics::error::*;
use map_metrics::*;

#[derive(Clone, Copy)]
enum Io {
    Cycles,
    Ops,
}

impl From<Io> for usize {
    fn from(k: Io) -> usize {
        k as usize
    }
}

struct Device {
    readings: Vec<Result<[u64; 2], ErrorKind>>,
    reads: usize,
}

impl CounterSource<2> for Device {
    fn read(&mut self) -> Result<[u64; 2], Error> {
        let r = self.readings[self.reads];
        self.reads += 1;
        r.map_err(new_error)
    }
}

fn cycles_per_op(tracker: &mut Tracker<2>, dev: &mut Device, tick: SampleTick) -> Result<f64, Error> {
    let s = tracker.observe_source(tick, dev)?;
    Ok(ratio(s.delta(Io::Cycles), s.delta(Io::Ops)))
}

#[test]
fn test_accessors_share_one_read_per_tick() {
    let mut tracker = Tracker::<2>::new();
    let mut dev = Device {
        readings: vec![Ok([1_000, 10]), Ok([1_600, 13]), Ok([1_600, 13])],
        reads: 0,
    };

    let t1 = SampleTick::new(1, 0);
    assert_eq!(cycles_per_op(&mut tracker, &mut dev, t1).unwrap(), 0.0);
    let s = tracker.observe_source(t1, &mut dev).unwrap();
    assert_eq!(s.cumulative(Io::Cycles), 0);

    let t2 = SampleTick::new(1, 500_000_000);
    assert_eq!(cycles_per_op(&mut tracker, &mut dev, t2).unwrap(), 200.0);
    let s = tracker.observe_source(t2, &mut dev).unwrap();
    assert_eq!(s.delta(Io::Cycles), 600);
    assert_eq!(s.cumulative(Io::Ops), 3);
    assert_eq!(dev.reads, 2);

    // An idle sample gives a zero ratio, not a division fault
    let t3 = SampleTick::new(2, 0);
    assert_eq!(cycles_per_op(&mut tracker, &mut dev, t3).unwrap(), 0.0);
    assert_eq!(dev.reads, 3);
}

#[test]
fn test_read_failure_is_per_tick() {
    let mut tracker = Tracker::<2>::new();
    let mut dev = Device {
        readings: vec![
            Ok([0, 0]),
            Err(ErrorKind::ReadFailed),
            Ok([50, 5]),
            Ok([80, 6]),
        ],
        reads: 0,
    };

    tracker.observe_source(SampleTick::new(1, 0), &mut dev).unwrap();

    let err = tracker
        .observe_source(SampleTick::new(2, 0), &mut dev)
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ReadFailed);
    assert_eq!(tracker.last_tick(), Some(SampleTick::new(1, 0)));

    let s = tracker.observe_source(SampleTick::new(3, 0), &mut dev).unwrap();
    assert_eq!(s.deltas(), &[50, 5]);

    let s = tracker.observe_source(SampleTick::new(4, 0), &mut dev).unwrap();
    assert_eq!(s.deltas(), &[30, 1]);
    assert_eq!(s.cumulatives(), &[80, 6]);
}
