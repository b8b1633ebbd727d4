//! Register-word exchanges over a [`ControlTransport`].

use core::time::Duration;

use crate::regmap::{
    RegmapError, TransportFault,
    transport::{ControlRequest, ControlTransport},
};

/// Size of one register word on the wire.
pub const REG_WIDTH: usize = 4;

/// Vendor request code for a register read.
pub const REQ_READ_REG: u8 = 64;

/// Vendor request code for a register write.
pub const REQ_WRITE_REG: u8 = 65;

/// Default budget for a single control exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Byte order of the value payload on the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
    /// Host byte order, whatever it is.
    Native,
}

impl Endian {
    /// Lays `val` out in this byte order.
    #[inline]
    pub fn encode(self, val: u32) -> [u8; REG_WIDTH] {
        match self {
            Endian::Big => val.to_be_bytes(),
            Endian::Little => val.to_le_bytes(),
            Endian::Native => val.to_ne_bytes(),
        }
    }

    /// Reassembles a word received in this byte order.
    #[inline]
    pub fn decode(self, bytes: [u8; REG_WIDTH]) -> u32 {
        match self {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Native => u32::from_ne_bytes(bytes),
        }
    }
}

/// Request codes, timeouts and payload format used by [`ControlAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlConfig {
    /// `bRequest` of a register read.
    pub read_request: u8,
    /// `bRequest` of a register write.
    pub write_request: u8,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Byte order of the value payload. The address is not affected.
    pub val_endian: Endian,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            read_request: REQ_READ_REG,
            write_request: REQ_WRITE_REG,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
            val_endian: Endian::Big,
        }
    }
}

/// Turns register reads and writes into single control exchanges.
///
/// The register address travels in the `index` field of the request and the
/// value as a [`REG_WIDTH`]-byte data stage. Exactly one exchange is made per
/// call: no retries, no batching. Anything other than exactly one word moved
/// is a [`TransportFault::LengthMismatch`].
pub struct ControlAdapter<T> {
    transport: T,
    config: ControlConfig,
}

impl<T> core::fmt::Debug for ControlAdapter<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: ControlTransport> ControlAdapter<T> {
    /// Wraps `transport`. No exchange is made.
    pub fn new(transport: T, config: ControlConfig) -> Self {
        Self { transport, config }
    }

    /// Request codes, timeouts and byte order in use.
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Shared access to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exclusive access to the underlying transport.
    ///
    /// Exchanges made directly through it are not seen by any cache above.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Gives the transport back.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Reads one register word from the device.
    pub fn read(&mut self, reg: u16) -> Result<u32, RegmapError> {
        let mut buf = [0u8; REG_WIDTH];
        let req = ControlRequest::vendor_in(self.config.read_request, 0, reg);

        let result = self
            .transport
            .read_control(req, &mut buf, self.config.read_timeout);
        check_word("RD", reg, result)?;

        let val = self.config.val_endian.decode(buf);
        log::debug!("RD: {:#06x} - {:#010x}", reg, val);
        Ok(val)
    }

    /// Writes one register word to the device.
    pub fn write(&mut self, reg: u16, val: u32) -> Result<(), RegmapError> {
        let buf = self.config.val_endian.encode(val);
        let req = ControlRequest::vendor_out(self.config.write_request, 0, reg);

        log::debug!("WR: {:#06x} - {:#010x}", reg, val);
        let result = self
            .transport
            .write_control(req, &buf, self.config.write_timeout);
        check_word("WR", reg, result)
    }
}

fn check_word(op: &str, reg: u16, result: Result<usize, TransportFault>) -> Result<(), RegmapError> {
    match result {
        Ok(REG_WIDTH) => Ok(()),
        Ok(len) => {
            log::warn!("{}: {:#06x} moved {} bytes, expected {}", op, reg, len, REG_WIDTH);
            Err(TransportFault::LengthMismatch { len }.into())
        }
        Err(fault) => {
            log::warn!("{}: {:#06x} failed: {}", op, reg, fault);
            Err(fault.into())
        }
    }
}
