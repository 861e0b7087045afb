//! Layout of the GPFS shared segment counter interface (`cxiSharedSeg.h`,
//! built with `INCLUDE_PER_CPU_COUNTERS`).
//!
//! The values below mirror the header shipped with the GPFS portability
//! layer and must be kept in step with the installed GPFS release.

use libc::c_ulong;

/// Shared segment device exported by the GPFS kernel module.
pub const DEV_SS0: &str = "/dev/ss0";

/// ioctl request reading a counter block from `/dev/ss0`.
pub const GetCounters: c_ulong = 0x4b;

/// Counter block selector: all VFS call statistics.
pub const cxiCounterTypeVfsStatsGetAll: usize = 2;

// Indices into `PerCpuCounters_t::vfsstat_count`.
pub const accessCall: usize = 0;
pub const closeCall: usize = 1;
pub const createCall: usize = 2;
pub const fclearCall: usize = 3;
pub const fgetattrCall: usize = 4;
pub const fsetattrCall: usize = 5;
pub const fsyncCall: usize = 6;
pub const ftruncCall: usize = 7;
pub const getattrCall: usize = 8;
pub const linkCall: usize = 9;
pub const lookupCall: usize = 10;
pub const mapLloffCall: usize = 11;
pub const mkdirCall: usize = 12;
pub const mknodCall: usize = 13;
pub const openCall: usize = 14;
pub const readCall: usize = 15;
pub const writeCall: usize = 16;
pub const mmapReadCall: usize = 17;
pub const mmapWriteCall: usize = 18;
pub const aioReadSyncCall: usize = 19;
pub const aioWriteSyncCall: usize = 20;
pub const aioReadAsyncCall: usize = 21;
pub const aioWriteAsyncCall: usize = 22;
pub const readdirCall: usize = 23;
pub const readlinkCall: usize = 24;
pub const readpageCall: usize = 25;
pub const removeCall: usize = 26;
pub const renameCall: usize = 27;
pub const rmdirCall: usize = 28;
pub const setaclCall: usize = 29;
pub const getaclCall: usize = 30;
pub const setattrCall: usize = 31;
pub const symlinkCall: usize = 32;
pub const unmapCall: usize = 33;
pub const writepageCall: usize = 34;
pub const tsfattrCall: usize = 35;
pub const tsfsattrCall: usize = 36;
pub const flockCall: usize = 37;
pub const nVFSStatItems: usize = 38;

/// Call count and cycles spent for one kind of VFS call.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VfsStatCount_t {
    pub count: u64,
    pub cycles: u64,
}

/// Buffer filled by the `GetCounters` ioctl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerCpuCounters_t {
    pub vfsstat_count: [VfsStatCount_t; nVFSStatItems],
}

impl Default for PerCpuCounters_t {
    fn default() -> Self {
        Self {
            vfsstat_count: [VfsStatCount_t::default(); nVFSStatItems],
        }
    }
}
