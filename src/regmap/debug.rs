//! Diagnostic register endpoints.
//!
//! [`RegDebug`] backs two endpoints a file or console layer can expose: an
//! address selector and a value accessor. Values move through the raw
//! pass-through of the map, so any 16-bit address can be inspected or poked,
//! including ones no classifier or default table knows about.
//!
//! Text formats follow the usual debugfs conventions: the address shows as
//! `0x%08x\n`, the value as `%08x\n`, and input accepts `0x`-prefixed hex,
//! `0`-prefixed octal or decimal with surrounding whitespace.

use core::fmt::Write;

use heapless::String;

use crate::regmap::{
    RegmapError, cache::CacheStore, classify::RegClassifier, map::Regmap,
    transport::ControlTransport,
};

/// Text produced by the debug endpoints.
pub type DebugText = String<16>;

/// Address selector plus value accessor for one register map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegDebug {
    address: u16,
}

impl RegDebug {
    pub const fn new() -> Self {
        Self { address: 0 }
    }

    /// Currently selected register.
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn set_address(&mut self, reg: u16) {
        self.address = reg;
    }

    pub fn show_address(&self) -> DebugText {
        let mut out = DebugText::new();
        // "0x" + 8 digits + newline always fits.
        let _ = writeln!(out, "{:#010x}", self.address);
        out
    }

    /// Selects a register from text.
    ///
    /// # Errors
    /// * [`RegmapError::Parse`] - if `text` is not a number
    /// * [`RegmapError::InvalidAddress`] - if the number does not fit 16 bits
    pub fn store_address(&mut self, text: &str) -> Result<(), RegmapError> {
        let reg = parse_number(text)?;
        self.address = u16::try_from(reg).map_err(|_| RegmapError::InvalidAddress)?;
        Ok(())
    }

    /// Reads the selected register from hardware.
    pub fn read<T, C, RC>(&self, map: &mut Regmap<T, C, RC>) -> Result<u32, RegmapError>
    where
        T: ControlTransport,
        C: RegClassifier,
        RC: CacheStore,
    {
        map.raw_read(self.address)
    }

    /// Writes the selected register to hardware.
    pub fn write<T, C, RC>(&self, map: &mut Regmap<T, C, RC>, val: u32) -> Result<(), RegmapError>
    where
        T: ControlTransport,
        C: RegClassifier,
        RC: CacheStore,
    {
        map.raw_write(self.address, val)
    }

    /// Reads the selected register and formats it as text.
    pub fn show_value<T, C, RC>(&self, map: &mut Regmap<T, C, RC>) -> Result<DebugText, RegmapError>
    where
        T: ControlTransport,
        C: RegClassifier,
        RC: CacheStore,
    {
        let val = self.read(map)?;
        let mut out = DebugText::new();
        let _ = writeln!(out, "{:08x}", val);
        Ok(out)
    }

    /// Parses `text` and writes it to the selected register.
    ///
    /// # Errors
    /// * [`RegmapError::Parse`] - if `text` is not a number or does not fit 32 bits
    /// * any error from the write itself
    pub fn store_value<T, C, RC>(
        &self,
        map: &mut Regmap<T, C, RC>,
        text: &str,
    ) -> Result<(), RegmapError>
    where
        T: ControlTransport,
        C: RegClassifier,
        RC: CacheStore,
    {
        let val = u32::try_from(parse_number(text)?).map_err(|_| RegmapError::Parse)?;
        self.write(map, val)
    }
}

fn parse_number(text: &str) -> Result<u64, RegmapError> {
    let text = text.trim();
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(RegmapError::Parse);
    }
    u64::from_str_radix(digits, radix).map_err(|_| RegmapError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regmap::{
        TransportFault,
        test_support::{DEFAULTED_REG, test_map},
    };

    #[test]
    fn address_endpoint_round_trip() {
        let mut dbg = RegDebug::new();
        assert_eq!(dbg.show_address().as_str(), "0x00000000\n");

        dbg.store_address("0x8004\n").unwrap();
        assert_eq!(dbg.address(), 0x8004);
        assert_eq!(dbg.show_address().as_str(), "0x00008004\n");
    }

    #[test]
    fn number_formats() {
        assert_eq!(parse_number("0x1F"), Ok(0x1F));
        assert_eq!(parse_number("0XfF"), Ok(0xFF));
        assert_eq!(parse_number("010"), Ok(8));
        assert_eq!(parse_number("0"), Ok(0));
        assert_eq!(parse_number("  42 \n"), Ok(42));
    }

    #[test]
    fn bad_numbers_rejected() {
        assert_eq!(parse_number(""), Err(RegmapError::Parse));
        assert_eq!(parse_number("0x"), Err(RegmapError::Parse));
        assert_eq!(parse_number("zz"), Err(RegmapError::Parse));
        assert_eq!(parse_number("09"), Err(RegmapError::Parse));
        assert_eq!(parse_number("-1"), Err(RegmapError::Parse));
        assert_eq!(parse_number("0x+1"), Err(RegmapError::Parse));
    }

    #[test]
    fn address_must_fit_sixteen_bits() {
        let mut dbg = RegDebug::new();
        dbg.set_address(0x40);

        assert_eq!(dbg.store_address("0x10000"), Err(RegmapError::InvalidAddress));
        assert_eq!(dbg.address(), 0x40);
    }

    #[test]
    fn value_endpoint_reads_hardware() {
        let mut map = test_map();
        map.transport_mut().set_hw(0x8004, 0xDEAD_BEEF);

        let mut dbg = RegDebug::new();
        dbg.set_address(0x8004);

        assert_eq!(dbg.show_value(&mut map).unwrap().as_str(), "deadbeef\n");
        assert_eq!(map.transport().reads, 1);
    }

    #[test]
    fn value_endpoint_bypasses_cache() {
        let mut map = test_map();
        map.transport_mut().set_hw(DEFAULTED_REG, 0x1);

        let mut dbg = RegDebug::new();
        dbg.set_address(DEFAULTED_REG);

        // The cache still holds the default, the endpoint shows the hardware
        assert_eq!(dbg.read(&mut map), Ok(0x1));
        assert_eq!(map.cached(DEFAULTED_REG), Some(0xA5));
    }

    #[test]
    fn value_endpoint_writes_any_address() {
        let mut map = test_map();
        let mut dbg = RegDebug::new();

        dbg.store_address("3").unwrap();
        dbg.store_value(&mut map, "0xcafe").unwrap();
        assert_eq!(map.transport().hw(0x0003), 0xCAFE);

        assert_eq!(
            dbg.store_value(&mut map, "0x100000000"),
            Err(RegmapError::Parse)
        );
        assert_eq!(map.transport().writes, 1);
    }

    #[test]
    fn failures_surface_as_errors_not_zero() {
        let mut map = test_map();
        map.transport_mut().fail_next = Some(TransportFault::Timeout);

        let dbg = RegDebug::new();
        assert_eq!(
            dbg.show_value(&mut map),
            Err(RegmapError::Transport(TransportFault::Timeout))
        );
    }
}
