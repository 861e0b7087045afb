use crate::error::Error;

/// Something that can produce a snapshot of `N` monotonic raw counters.
///
/// Implementations wrap the external read (a device ioctl, a PMU read, a
/// library call). The [`Tracker`] decides when to call [`read`], and calls
/// it at most once per sample.
///
/// [`Tracker`]: crate::Tracker
/// [`read`]: CounterSource::read
pub trait CounterSource<const N: usize> {
    /// Read all counters.
    fn read(&mut self) -> Result<[u64; N], Error>;
}

impl<const N: usize, S: CounterSource<N> + ?Sized> CounterSource<N> for &mut S {
    fn read(&mut self) -> Result<[u64; N], Error> {
        (**self).read()
    }
}

impl<const N: usize, S: CounterSource<N> + ?Sized> CounterSource<N> for Box<S> {
    fn read(&mut self) -> Result<[u64; N], Error> {
        (**self).read()
    }
}
