/// Failure reported by a [`ControlTransport`](crate::regmap::ControlTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFault {
    /// Generic channel error reported by the transport.
    Io,
    /// The exchange did not complete within its timeout budget.
    Timeout,
    /// The device stalled the request.
    Stall,
    /// The device is no longer attached.
    Disconnected,
    /// The transport could not obtain a buffer to stage the exchange.
    NoBuffer,
    /// The device moved fewer or more bytes than one register word.
    LengthMismatch {
        /// Bytes actually transferred.
        len: usize,
    },
}

impl core::fmt::Display for TransportFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportFault::Io => write!(f, "transport channel error"),
            TransportFault::Timeout => write!(f, "transport exchange timed out"),
            TransportFault::Stall => write!(f, "device stalled the request"),
            TransportFault::Disconnected => write!(f, "device disconnected"),
            TransportFault::NoBuffer => write!(f, "no transfer buffer available"),
            TransportFault::LengthMismatch { len } => {
                write!(f, "transferred {} bytes, expected 4", len)
            }
        }
    }
}

/// Errors that can occur during register map operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegmapError {
    /// The bounded exchange failed. No partial value is ever returned.
    Transport(TransportFault),
    /// A fixed-capacity resource (cache slot or transfer buffer) was exhausted.
    Alloc,
    /// Address is above `max_register`, misaligned to the register stride,
    /// or does not fit the 16-bit addressing field.
    InvalidAddress,
    /// Text given to a debug endpoint could not be parsed as a register value.
    Parse,
}

impl From<TransportFault> for RegmapError {
    fn from(fault: TransportFault) -> Self {
        match fault {
            TransportFault::NoBuffer => RegmapError::Alloc,
            other => RegmapError::Transport(other),
        }
    }
}

impl core::fmt::Display for RegmapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegmapError::Transport(fault) => write!(f, "register transfer failed: {}", fault),
            RegmapError::Alloc => write!(f, "register map resource exhausted"),
            RegmapError::InvalidAddress => write!(f, "invalid register address"),
            RegmapError::Parse => write!(f, "invalid register value text"),
        }
    }
}

impl core::error::Error for TransportFault {}

impl core::error::Error for RegmapError {}
