//! Test support utilities - only compiled in test builds.

use core::time::Duration;

use heapless::Vec;

use crate::regmap::{
    Regmap, RegmapBuilder, TransportFault,
    adapter::{REG_WIDTH, REQ_READ_REG, REQ_WRITE_REG},
    cache::SlotCache,
    classify::{RegRange, TableClassifier},
    defaults::RegDefault,
    transport::{ControlRequest, ControlTransport, Direction},
};

/// Volatile register that counts up on every read.
pub const VOLATILE_REG: u16 = 0x1004;
/// Precious register.
pub const PRECIOUS_REG: u16 = 0x3000;
/// Register that is both precious and volatile.
pub const BOTH_REG: u16 = 0x4000;
/// Plain cacheable register.
pub const NORMAL_REG: u16 = 0x2000;
/// Cacheable register with a reset value in [`TEST_DEFAULTS`].
pub const DEFAULTED_REG: u16 = 0x0040;

pub static TEST_PRECIOUS: [RegRange; 2] = [RegRange::single(PRECIOUS_REG), RegRange::single(BOTH_REG)];
pub static TEST_VOLATILE: [RegRange; 2] = [RegRange::single(VOLATILE_REG), RegRange::single(BOTH_REG)];
pub static TEST_DEFAULTS: [RegDefault; 2] = [
    RegDefault::new(DEFAULTED_REG, 0x0000_00A5),
    RegDefault::new(VOLATILE_REG, 0x0000_0077),
];
static COUNTERS: [u16; 3] = [VOLATILE_REG, PRECIOUS_REG, BOTH_REG];

pub type TestClassifier = TableClassifier<'static>;
pub type TestMap = Regmap<SimDevice, TestClassifier, SlotCache<16>>;

pub fn test_classifier() -> TestClassifier {
    TableClassifier::new(&TEST_PRECIOUS, &TEST_VOLATILE)
}

/// Helper to create a cached map over a fresh simulated device.
pub fn test_map() -> TestMap {
    test_map_with(SimDevice::with_counters(&COUNTERS))
}

/// Helper to create a cached map over a prepared simulated device.
pub fn test_map_with(dev: SimDevice) -> TestMap {
    RegmapBuilder::new(dev)
        .classifier(test_classifier())
        .slot_cache::<16>()
        .defaults(&TEST_DEFAULTS)
        .build()
        .unwrap()
}

/// Simulated device answering register requests from an in-memory table.
///
/// Values are stored in wire order, so what a test reads back through
/// [`SimDevice::hw`] is exactly what crossed the transport.
pub struct SimDevice {
    regs: Vec<(u16, [u8; REG_WIDTH]), 64>,
    counters: &'static [u16],
    pub reads: usize,
    pub writes: usize,
    /// Fails the next exchange with this fault.
    pub fail_next: Option<TransportFault>,
    /// Reports this byte count for the next exchange, short or overlong.
    pub len_next: Option<usize>,
    pub last_request: Option<ControlRequest>,
    pub last_timeout: Option<Duration>,
}

impl SimDevice {
    pub fn new() -> Self {
        Self::with_counters(&[])
    }

    /// Registers in `counters` increment after every read, like a status counter.
    pub fn with_counters(counters: &'static [u16]) -> Self {
        Self {
            regs: Vec::new(),
            counters,
            reads: 0,
            writes: 0,
            fail_next: None,
            len_next: None,
            last_request: None,
            last_timeout: None,
        }
    }

    /// Total exchanges seen in either direction.
    pub fn calls(&self) -> usize {
        self.reads + self.writes
    }

    pub fn wire(&self, reg: u16) -> Option<[u8; REG_WIDTH]> {
        self.regs.iter().find(|(r, _)| *r == reg).map(|(_, b)| *b)
    }

    /// Hardware value of `reg` decoded big-endian; unwritten registers read zero.
    pub fn hw(&self, reg: u16) -> u32 {
        u32::from_be_bytes(self.wire(reg).unwrap_or([0; REG_WIDTH]))
    }

    pub fn set_hw(&mut self, reg: u16, val: u32) {
        self.store(reg, val.to_be_bytes());
    }

    fn store(&mut self, reg: u16, bytes: [u8; REG_WIDTH]) {
        match self.regs.iter_mut().find(|(r, _)| *r == reg) {
            Some((_, b)) => *b = bytes,
            None => self
                .regs
                .push((reg, bytes))
                .unwrap_or_else(|_| panic!("simulated device full")),
        }
    }

    fn record(&mut self, req: ControlRequest, timeout: Duration) -> Result<(), TransportFault> {
        self.last_request = Some(req);
        self.last_timeout = Some(timeout);
        match self.fail_next.take() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }
}

impl Default for SimDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlTransport for SimDevice {
    fn read_control(
        &mut self,
        req: ControlRequest,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportFault> {
        self.reads += 1;
        self.record(req, timeout)?;
        if req.direction() != Direction::In || req.request != REQ_READ_REG {
            return Err(TransportFault::Stall);
        }

        let bytes = self.wire(req.index).unwrap_or([0; REG_WIDTH]);
        let len = self.len_next.take().unwrap_or(REG_WIDTH);
        let copied = len.min(REG_WIDTH).min(buf.len());
        buf[..copied].copy_from_slice(&bytes[..copied]);

        if self.counters.contains(&req.index) {
            let next = u32::from_be_bytes(bytes).wrapping_add(1);
            self.store(req.index, next.to_be_bytes());
        }
        Ok(len)
    }

    fn write_control(
        &mut self,
        req: ControlRequest,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportFault> {
        self.writes += 1;
        self.record(req, timeout)?;
        if req.direction() != Direction::Out || req.request != REQ_WRITE_REG {
            return Err(TransportFault::Stall);
        }
        if let Some(len) = self.len_next.take() {
            return Ok(len);
        }

        let mut bytes = [0u8; REG_WIDTH];
        let len = buf.len().min(REG_WIDTH);
        bytes[..len].copy_from_slice(&buf[..len]);
        self.store(req.index, bytes);
        Ok(buf.len())
    }
}

/// Device that only latches the last written word.
///
/// A read answers with the latched payload when it targets the latched
/// register and stalls otherwise, so write-then-read sweeps over the whole
/// address space need no storage.
#[derive(Debug, Default)]
pub struct LatchDevice {
    latch: Option<(u16, [u8; REG_WIDTH])>,
    pub exchanges: usize,
}

impl LatchDevice {
    pub fn latched(&self) -> Option<(u16, [u8; REG_WIDTH])> {
        self.latch
    }
}

impl ControlTransport for LatchDevice {
    fn read_control(
        &mut self,
        req: ControlRequest,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, TransportFault> {
        self.exchanges += 1;
        match self.latch {
            Some((reg, bytes)) if reg == req.index && req.direction() == Direction::In => {
                buf.copy_from_slice(&bytes);
                Ok(REG_WIDTH)
            }
            _ => Err(TransportFault::Stall),
        }
    }

    fn write_control(
        &mut self,
        req: ControlRequest,
        buf: &[u8],
        _timeout: Duration,
    ) -> Result<usize, TransportFault> {
        self.exchanges += 1;
        let bytes: [u8; REG_WIDTH] = buf.try_into().map_err(|_| TransportFault::Io)?;
        self.latch = Some((req.index, bytes));
        Ok(REG_WIDTH)
    }
}

/// Asserts that the result is a transport error.
pub fn assert_transport_err<T: core::fmt::Debug>(result: Result<T, crate::regmap::RegmapError>) {
    assert!(
        matches!(result, Err(crate::regmap::RegmapError::Transport(_))),
        "expected transport error, got {:?}",
        result
    );
}
