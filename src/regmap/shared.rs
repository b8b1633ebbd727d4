use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

use crate::regmap::{
    RegmapError, cache::CacheStore, classify::RegClassifier, map::Regmap,
    transport::ControlTransport,
};

/// A [`Regmap`] that can be shared between contexts.
///
/// The guard is held for the whole call, transport round trip included, so
/// at most one exchange is ever in flight. What holding it costs depends on
/// the raw mutex `M`:
///
/// - [`CriticalSectionRawMutex`](embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex)
///   masks interrupts for the duration. Only use it when the transport
///   completes without interrupts (polled peripheral, hosted `std` transport)
///   or when the map is shared with interrupt handlers and the latency of one
///   bounded exchange is acceptable.
/// - [`ThreadModeRawMutex`](embassy_sync::blocking_mutex::raw::ThreadModeRawMutex)
///   and [`NoopRawMutex`](embassy_sync::blocking_mutex::raw::NoopRawMutex)
///   leave interrupts enabled, so interrupt-driven transports keep working.
///
/// # Type Parameters
/// - `M`: Raw mutex guarding the map
/// - `T`, `C`, `RC`: As for [`Regmap`]
pub struct SharedRegmap<M: RawMutex, T, C, RC> {
    inner: Mutex<M, RefCell<Regmap<T, C, RC>>>,
}

impl<M: RawMutex, T, C, RC> core::fmt::Debug for SharedRegmap<M, T, C, RC> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedRegmap").finish_non_exhaustive()
    }
}

impl<M, T, C, RC> SharedRegmap<M, T, C, RC>
where
    M: RawMutex,
    T: ControlTransport,
    C: RegClassifier,
    RC: CacheStore,
{
    /// Wraps `map`. Usable in a `static` initializer.
    pub const fn new(map: Regmap<T, C, RC>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(map)),
        }
    }

    /// Runs `f` with exclusive access to the map, guard held throughout.
    ///
    /// # Panics
    /// Panics if called re-entrantly from within `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Regmap<T, C, RC>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn read(&self, reg: u16) -> Result<u32, RegmapError> {
        self.with(|map| map.read(reg))
    }

    pub fn write(&self, reg: u16, val: u32) -> Result<(), RegmapError> {
        self.with(|map| map.write(reg, val))
    }

    pub fn update_bits(&self, reg: u16, mask: u32, val: u32) -> Result<bool, RegmapError> {
        self.with(|map| map.update_bits(reg, mask, val))
    }

    /// Unwraps the map.
    pub fn into_inner(self) -> Regmap<T, C, RC> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    #![allow(unsafe_code)]

    use core::sync::atomic::{AtomicUsize, Ordering};
    use core::time::Duration;

    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    use super::*;
    use crate::regmap::{
        RegmapBuilder, TransportFault,
        cache::SlotCache,
        test_support::{DEFAULTED_REG, NORMAL_REG, SimDevice, TestClassifier, test_map},
        transport::ControlRequest,
    };

    type LocalShared = SharedRegmap<NoopRawMutex, SimDevice, TestClassifier, SlotCache<16>>;

    #[test]
    fn shared_access_uses_the_same_cache() {
        let shared = LocalShared::new(test_map());

        shared.write(NORMAL_REG, 0x1234).unwrap();
        assert_eq!(shared.read(NORMAL_REG), Ok(0x1234));
        assert_eq!(shared.with(|map| map.transport().calls()), 1);
    }

    #[test]
    fn with_spans_several_calls() {
        let shared = LocalShared::new(test_map());

        let (a, b) = shared.with(|map| {
            let a = map.read(DEFAULTED_REG).unwrap();
            map.write(DEFAULTED_REG, a + 1).unwrap();
            (a, map.read(DEFAULTED_REG).unwrap())
        });

        assert_eq!((a, b), (0xA5, 0xA6));
    }

    #[test]
    fn update_bits_through_shared_map() {
        let shared = SharedRegmap::<CriticalSectionRawMutex, _, _, _>::new(test_map());
        assert_eq!(shared.update_bits(DEFAULTED_REG, 0xF0, 0x10), Ok(true));

        let map = shared.into_inner();
        assert_eq!(map.transport().hw(DEFAULTED_REG), 0x15);
    }

    static LOCK_DEPTH: AtomicUsize = AtomicUsize::new(0);

    /// Raw mutex that only counts how deep the caller is inside it.
    struct DepthRawMutex;

    unsafe impl RawMutex for DepthRawMutex {
        const INIT: Self = DepthRawMutex;

        fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
            LOCK_DEPTH.fetch_add(1, Ordering::SeqCst);
            let ret = f();
            LOCK_DEPTH.fetch_sub(1, Ordering::SeqCst);
            ret
        }
    }

    /// Records the lock depth seen by each exchange.
    #[derive(Default)]
    struct DepthRecorder {
        dev: SimDevice,
        depths: heapless::Vec<usize, 8>,
    }

    impl DepthRecorder {
        fn note(&mut self) {
            let _ = self.depths.push(LOCK_DEPTH.load(Ordering::SeqCst));
        }
    }

    impl ControlTransport for DepthRecorder {
        fn read_control(
            &mut self,
            req: ControlRequest,
            buf: &mut [u8],
            timeout: Duration,
        ) -> Result<usize, TransportFault> {
            self.note();
            self.dev.read_control(req, buf, timeout)
        }

        fn write_control(
            &mut self,
            req: ControlRequest,
            buf: &[u8],
            timeout: Duration,
        ) -> Result<usize, TransportFault> {
            self.note();
            self.dev.write_control(req, buf, timeout)
        }
    }

    #[test]
    fn exchanges_run_under_the_chosen_mutex() {
        let map = RegmapBuilder::new(DepthRecorder::default())
            .slot_cache::<4>()
            .build()
            .unwrap();
        let shared = SharedRegmap::<DepthRawMutex, _, _, _>::new(map);

        shared.write(NORMAL_REG, 1).unwrap();
        shared.with(|map| map.raw_read(NORMAL_REG)).unwrap();
        assert_eq!(LOCK_DEPTH.load(Ordering::SeqCst), 0);

        let map = shared.into_inner();
        assert_eq!(map.transport().depths.as_slice(), &[1, 1]);
    }
}
