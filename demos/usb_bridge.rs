//! USB bridge example: cached register map over a simulated vendor control pipe
//!
//! This example demonstrates:
//! - Implementing `ControlTransport` for a device
//! - Classifying status registers as volatile and clear-on-read registers as precious
//! - Seeding reset values and reading them without I/O
//! - Field access and the debug endpoints

use std::collections::HashMap;
use std::time::Duration;

use embedded_regmap::prelude::*;
use embedded_regmap::reg_fields;

reg_fields! {
    IRQ_STATUS @ 0x8000 {
        VSYNC: 0..=0,
        UNDERFLOW: 1..=1,
    }
    VGA_CTRL @ 0x8004 {
        ENABLE: 0..=0,
        BPP: 4..=7,
    }
    FRAME_COUNT @ 0x8008 {}
    IRQ_ACK @ 0x8048 {}
}

static PRECIOUS: [RegRange; 1] = [RegRange::single(IRQ_ACK)];
static VOLATILE: [RegRange; 3] = [
    RegRange::single(IRQ_STATUS),
    RegRange::single(FRAME_COUNT),
    RegRange::single(IRQ_ACK),
];
static DEFAULTS: [RegDefault; 1] = [RegDefault::new(VGA_CTRL, 0x0000_0080)];

/// Pretend bridge chip: registers live in a map, the frame counter ticks on every read.
#[derive(Default)]
struct FakeBridge {
    regs: HashMap<u16, [u8; 4]>,
    exchanges: usize,
}

impl ControlTransport for FakeBridge {
    fn read_control(
        &mut self,
        req: ControlRequest,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, TransportFault> {
        self.exchanges += 1;
        let bytes = self.regs.get(&req.index).copied().unwrap_or([0; 4]);
        buf.copy_from_slice(&bytes);
        if req.index == FRAME_COUNT {
            let next = u32::from_be_bytes(bytes) + 1;
            self.regs.insert(FRAME_COUNT, next.to_be_bytes());
        }
        Ok(buf.len())
    }

    fn write_control(
        &mut self,
        req: ControlRequest,
        buf: &[u8],
        _timeout: Duration,
    ) -> Result<usize, TransportFault> {
        self.exchanges += 1;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(buf);
        self.regs.insert(req.index, bytes);
        Ok(buf.len())
    }
}

fn main() -> Result<(), RegmapError> {
    let mut map = RegmapBuilder::new(FakeBridge::default())
        .classifier(TableClassifier::new(&PRECIOUS, &VOLATILE))
        .slot_cache::<32>()
        .defaults(&DEFAULTS)
        .build()?;

    // Reset value, no exchange
    let bpp = map.read_field(VGA_CTRL_BPP)?;
    println!("bpp field at reset: {bpp} ({} exchanges)", map.transport().exchanges);

    // Read-modify-write of a single bit
    map.write_field(VGA_CTRL_ENABLE, 1)?;
    println!("VGA_CTRL = {:#010x}", map.read(VGA_CTRL)?);

    // Volatile: every read is a fresh exchange
    for _ in 0..3 {
        println!("frame {}", map.read(FRAME_COUNT)?);
    }

    // Precious: reading acknowledges, so it is never answered from cache
    let vsync = map.read_field(IRQ_STATUS_VSYNC)?;
    let underflow = map.read_field(IRQ_STATUS_UNDERFLOW)?;
    let ack = map.read(IRQ_ACK)?;
    println!("irq: vsync={vsync} underflow={underflow} ack={ack:#x}");

    // Debug endpoints poke by address, bypassing the cache
    let mut dbg = RegDebug::new();
    dbg.store_address("0x8004")?;
    print!("{}{}", dbg.show_address(), dbg.show_value(&mut map)?);

    println!("total exchanges: {}", map.transport().exchanges);
    Ok(())
}
