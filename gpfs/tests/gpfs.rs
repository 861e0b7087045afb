use map_gpfs::*;
use map_metrics::error::{new_error, Error, ErrorKind};
use map_metrics::{CounterSource, SampleTick};
use map_metrics_sys::gpfs::*;

/// Replays shared segment buffers, one per read.
struct Replay {
    buffers: Vec<PerCpuCounters_t>,
    reads: usize,
}

impl CounterSource<{ GpfsCounter::COUNT }> for Replay {
    fn read(&mut self) -> Result<[u64; GpfsCounter::COUNT], Error> {
        let b = self
            .buffers
            .get(self.reads)
            .ok_or_else(|| new_error(ErrorKind::ReadFailed))?;
        self.reads += 1;
        Ok(totals(b))
    }
}

fn buffer(cycles: u64, opens: u64, lookups: u64) -> PerCpuCounters_t {
    let mut b = PerCpuCounters_t::default();
    b.vfsstat_count[openCall] = VfsStatCount_t {
        count: opens,
        cycles,
    };
    b.vfsstat_count[lookupCall].count = lookups;
    b
}

fn tick(sec: i64) -> SampleTick {
    SampleTick::new(sec, 0)
}

#[test]
fn test_counter_progression() {
    // Counters already hold activity from before the plugin loaded
    let (c0, o0, l0) = (123_456_789, 1_000, 77);

    let mut plugin = GpfsPlugin::new(Replay {
        buffers: vec![
            buffer(c0, o0, l0),
            buffer(c0 + 58_424_594_407, o0 + 340, l0 + 9),
            buffer(c0 + 998_009_963_537, o0 + 4318, l0 + 170),
        ],
        reads: 0,
    });

    let expected = [
        // cycles, cycles total, opens, opens total, lookups, lookups total
        (0, 0, 0, 0, 0, 0),
        (58_424_594_407, 58_424_594_407, 340, 340, 9, 9),
        (939_585_369_130, 998_009_963_537, 3978, 4318, 161, 170),
    ];

    for (i, want) in expected.iter().enumerate() {
        let t = tick(i as i64 + 1);
        let got = (
            plugin.delta(t, GpfsCounter::IoCycles).unwrap(),
            plugin.total(t, GpfsCounter::IoCycles).unwrap(),
            plugin.delta(t, GpfsCounter::Opens).unwrap(),
            plugin.total(t, GpfsCounter::Opens).unwrap(),
            plugin.delta(t, GpfsCounter::InodeLookups).unwrap(),
            plugin.total(t, GpfsCounter::InodeLookups).unwrap(),
        );
        assert_eq!(&got, want, "sample {}", i + 1);
    }

    // Six accessors per sample, one device read per sample
    assert_eq!(plugin.source().reads, 3);
}

#[test]
fn test_cycles_per_iop() {
    let mut plugin = GpfsPlugin::new(Replay {
        buffers: vec![
            buffer(1_000, 10, 0),
            buffer(1_000, 10, 0),
            buffer(5_000, 14, 4),
        ],
        reads: 0,
    });

    assert_eq!(plugin.cycles_per_iop(tick(1)).unwrap(), 0.0);
    // No calls during the sample
    assert_eq!(plugin.cycles_per_iop(tick(2)).unwrap(), 0.0);
    // 4000 cycles over 4 opens and 4 lookups
    assert_eq!(plugin.cycles_per_iop(tick(3)).unwrap(), 500.0);
    assert_eq!(plugin.delta(tick(3), GpfsCounter::Iops).unwrap(), 8);
}

#[test]
fn test_read_failure_keeps_totals() {
    let mut plugin = GpfsPlugin::new(Replay {
        buffers: vec![buffer(0, 0, 0), buffer(10, 2, 0)],
        reads: 0,
    });

    plugin.sample(tick(1)).unwrap();
    plugin.sample(tick(2)).unwrap();

    let err = plugin.sample(tick(3)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ReadFailed);

    // The previous sample's values are still served for its own tick
    assert_eq!(plugin.total(tick(2), GpfsCounter::Opens).unwrap(), 2);
}
