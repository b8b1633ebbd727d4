//! Transport boundary consumed by the register map.
//!
//! A transport is a bounded request/response command channel in the shape of a
//! USB control pipe: a small setup header (request type, request code, value
//! and index fields) followed by an optional data stage moving at most
//! `buf.len()` bytes in one direction.

use core::time::Duration;

use crate::regmap::TransportFault;

/// Direction bit of `bmRequestType`: device to host.
pub const DIR_IN: u8 = 0x80;
/// Direction bit of `bmRequestType`: host to device.
pub const DIR_OUT: u8 = 0x00;
/// Vendor request type.
pub const TYPE_VENDOR: u8 = 0x40;
/// Request addressed to the device itself.
pub const RECIPIENT_DEVICE: u8 = 0x00;

/// Data stage direction of a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Device to host.
    In,
    /// Host to device.
    Out,
}

/// Setup header of a single control exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRequest {
    /// `bmRequestType`: direction, type and recipient bits.
    pub request_type: u8,
    /// `bRequest`: the request code.
    pub request: u8,
    /// `wValue`.
    pub value: u16,
    /// `wIndex`.
    pub index: u16,
}

impl ControlRequest {
    /// Vendor request with a device-to-host data stage.
    pub const fn vendor_in(request: u8, value: u16, index: u16) -> Self {
        Self {
            request_type: DIR_IN | TYPE_VENDOR | RECIPIENT_DEVICE,
            request,
            value,
            index,
        }
    }

    /// Vendor request with a host-to-device data stage.
    pub const fn vendor_out(request: u8, value: u16, index: u16) -> Self {
        Self {
            request_type: DIR_OUT | TYPE_VENDOR | RECIPIENT_DEVICE,
            request,
            value,
            index,
        }
    }

    /// Returns the data stage direction encoded in `request_type`.
    #[inline]
    pub const fn direction(&self) -> Direction {
        if self.request_type & DIR_IN != 0 {
            Direction::In
        } else {
            Direction::Out
        }
    }
}

/// Bounded command-exchange primitive.
///
/// Each call performs exactly one exchange and blocks until it completes,
/// fails, or `timeout` expires. Implementations return the number of data
/// bytes actually moved; the caller decides whether that count is acceptable.
pub trait ControlTransport {
    /// Performs a device-to-host exchange, filling at most `buf.len()` bytes.
    fn read_control(
        &mut self,
        req: ControlRequest,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportFault>;

    /// Performs a host-to-device exchange carrying `buf`.
    fn write_control(
        &mut self,
        req: ControlRequest,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportFault>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for &mut T {
    fn read_control(
        &mut self,
        req: ControlRequest,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportFault> {
        (**self).read_control(req, buf, timeout)
    }

    fn write_control(
        &mut self,
        req: ControlRequest,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportFault> {
        (**self).write_control(req, buf, timeout)
    }
}
