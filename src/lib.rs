//! A `no_std`, no-alloc cached register map for devices behind a control transport.
//!
//! This crate turns a narrow request/response command channel (typically a USB
//! vendor control pipe) into an addressed 32-bit register interface, with a
//! selective cache that never serves a value the hardware may have changed.
//!
//! # Features
//!
//! - **Zero heap allocation** - Transfer buffers live on the stack, the cache is fixed-size
//! - **Precious/volatile classification** - Side-effecting and self-changing registers always hit hardware
//! - **Default seeding** - Known reset values answer first reads without a round trip
//! - **Transport-agnostic** - Anything implementing [`ControlTransport`](regmap::ControlTransport)
//! - **Diagnostics** - Raw pass-through access, plus text endpoints behind `debug-regs`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  read/write   ┌─────────────────────────┐
//! │  Driver      │──────────────▶│  Regmap                 │
//! │              │◀──────────────│  classify ─▶ cache?     │
//! └──────────────┘  value/error  │              │ miss     │
//!                                │              ▼          │
//! ┌──────────────┐  raw_read/    │  ControlAdapter         │
//! │  RegDebug    │──raw_write───▶│  (4-byte word, endian,  │
//! └──────────────┘               │   timeouts)             │
//!                                └───────────┬─────────────┘
//!                                            │ one exchange
//!                                            ▼
//!                                ┌─────────────────────────┐
//!                                │  ControlTransport       │
//!                                └─────────────────────────┘
//! ```
//!
//! - **Reads** of normal registers are served from cache when a valid value is known
//! - **Reads** of precious or volatile registers always cost one exchange
//! - **Writes** always reach the transport and update the cache only on success
//! - **Failures** leave the cache untouched and never poison the map
//!
//! # Example
//!
//! ```rust,no_run
//! use core::time::Duration;
//! use embedded_regmap::prelude::*;
//!
//! struct UsbDevice;
//!
//! impl ControlTransport for UsbDevice {
//!     fn read_control(
//!         &mut self,
//!         _req: ControlRequest,
//!         _buf: &mut [u8],
//!         _timeout: Duration,
//!     ) -> Result<usize, TransportFault> {
//!         // Hand the request to the USB stack here...
//!         Err(TransportFault::Disconnected)
//!     }
//!
//!     fn write_control(
//!         &mut self,
//!         _req: ControlRequest,
//!         _buf: &[u8],
//!         _timeout: Duration,
//!     ) -> Result<usize, TransportFault> {
//!         Err(TransportFault::Disconnected)
//!     }
//! }
//!
//! static PRECIOUS: [RegRange; 1] = [RegRange::single(0x8048)];
//! static VOLATILE: [RegRange; 2] = [RegRange::new(0x8000, 0x800C), RegRange::single(0x8048)];
//! static DEFAULTS: [RegDefault; 1] = [RegDefault::new(0x0040, 0x0000_0010)];
//!
//! let mut map = RegmapBuilder::new(UsbDevice)
//!     .classifier(TableClassifier::new(&PRECIOUS, &VOLATILE))
//!     .slot_cache::<64>()
//!     .defaults(&DEFAULTS)
//!     .build()
//!     .unwrap();
//!
//! // Served from the seeded default, no I/O
//! let ctrl = map.read(0x0040).unwrap();
//!
//! // Always goes to hardware
//! map.write(0x0040, ctrl | 1).unwrap();
//! let status = map.read(0x8004).unwrap();
//! let _ = status;
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod regmap;

#[doc(hidden)]
pub use paste as __paste;

pub mod prelude {
    pub use crate::regmap::prelude::*;
}
