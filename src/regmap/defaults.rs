/// Known reset value of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegDefault {
    pub reg: u16,
    pub def: u32,
}

impl RegDefault {
    pub const fn new(reg: u16, def: u32) -> Self {
        Self { reg, def }
    }
}

/// Static table of register reset values.
///
/// Entries seed the register cache at construction so that normal registers
/// with a known reset value need no round trip on first read. Later entries
/// win if a register is listed twice.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTable {
    entries: &'static [RegDefault],
}

impl DefaultTable {
    pub const EMPTY: Self = Self { entries: &[] };

    pub const fn new(entries: &'static [RegDefault]) -> Self {
        Self { entries }
    }

    /// Returns the reset value of `reg`, if known.
    pub fn lookup(&self, reg: u16) -> Option<u32> {
        self.entries
            .iter()
            .rev()
            .find(|d| d.reg == reg)
            .map(|d| d.def)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static RegDefault> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&'static [RegDefault]> for DefaultTable {
    fn from(entries: &'static [RegDefault]) -> Self {
        Self::new(entries)
    }
}
