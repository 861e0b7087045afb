use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;

use log::debug;
use map_metrics::error::{new_error_with_message, new_os_error, Error, ErrorKind};
use map_metrics::CounterSource;
use map_metrics_sys::gpfs::*;

use crate::config::GpfsConfig;
use crate::GpfsCounter;

/// An open handle to the GPFS shared segment device.
///
/// Closing the device happens on drop.
#[derive(Debug)]
pub struct SharedSegment {
    device: File,
}

impl SharedSegment {
    /// Open the device named by `config` read-only.
    pub fn open(config: &GpfsConfig) -> Result<Self, Error> {
        let path = config.device();
        let device = File::open(path).map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => "no GPFS filesystem detected",
                _ => "can't access GPFS shared segment device",
            };
            new_error_with_message(
                ErrorKind::SourceUnavailable,
                format!("{}: {}", path.display(), reason),
            )
        })?;

        debug!("opened GPFS shared segment {}", path.display());
        Ok(SharedSegment { device })
    }

    /// Fetch the per-CPU VFS call statistics.
    pub fn counters(&self) -> Result<PerCpuCounters_t, Error> {
        let mut buffer = PerCpuCounters_t::default();
        let mut args: [usize; 6] = [0; 6];
        args[0] = cxiCounterTypeVfsStatsGetAll;
        args[1] = std::mem::size_of::<PerCpuCounters_t>();
        args[2] = &mut buffer as *mut PerCpuCounters_t as usize;

        if unsafe { libc::ioctl(self.device.as_raw_fd(), GetCounters as _, args.as_mut_ptr()) } != 0 {
            return Err(new_os_error(ErrorKind::ReadFailed));
        }

        Ok(buffer)
    }
}

impl CounterSource<{ GpfsCounter::COUNT }> for SharedSegment {
    fn read(&mut self) -> Result<[u64; GpfsCounter::COUNT], Error> {
        Ok(totals(&self.counters()?))
    }
}

/// Collapse the VFS statistics into the counters the plugin reports,
/// indexed by [`GpfsCounter`].
pub fn totals(buffer: &PerCpuCounters_t) -> [u64; GpfsCounter::COUNT] {
    let stat = &buffer.vfsstat_count;

    let mut out = [0; GpfsCounter::COUNT];
    out[GpfsCounter::IoCycles as usize] = stat.iter().map(|s| s.cycles).sum();
    out[GpfsCounter::Iops as usize] = stat.iter().map(|s| s.count).sum();
    out[GpfsCounter::InodeLookups as usize] = sum_counts(stat, &[lookupCall]);
    out[GpfsCounter::Opens as usize] = sum_counts(stat, &[openCall]);
    out[GpfsCounter::Reads as usize] =
        sum_counts(stat, &[readCall, mmapReadCall, aioReadSyncCall, aioReadAsyncCall]);
    out[GpfsCounter::Writes as usize] =
        sum_counts(stat, &[writeCall, mmapWriteCall, aioWriteSyncCall, aioWriteAsyncCall]);
    out
}

fn sum_counts(stat: &[VfsStatCount_t], items: &[usize]) -> u64 {
    items.iter().map(|i| stat[*i].count).sum()
}
